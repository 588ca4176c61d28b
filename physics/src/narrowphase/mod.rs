//! Narrow-phase collision detection on convex hulls.
//!
//! [`gjk`] decides intersection and hands an overlapping simplex to [`epa`],
//! which recovers a penetration normal and depth; [`manifold`] then clips
//! the two hulls' faces into up to four contact points.
use glam::DVec3;

use crate::collider::Collider;
use crate::error::SolveWarning;

pub mod epa;
pub mod gjk;
pub mod manifold;

/// One point of contact between two colliders, already in world space.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    pub point_on_a_world: DVec3,
    pub point_on_b_world: DVec3,
    pub normal_world: DVec3,
    pub depth: f64,
}

/// Runs GJK, then EPA, then manifold clipping for a single hull pair.
/// Returns an empty vec for separated hulls or on detector non-convergence,
/// treated as "no contact" for that pair this frame.
pub fn hull_pair_contacts(
    a: &Collider,
    b: &Collider,
    gjk_max_iter: usize,
    epa_max_iter: usize,
    epa_tolerance: f64,
) -> Vec<Contact> {
    let simplex = match gjk::gjk_intersect(a, b, gjk_max_iter) {
        gjk::GjkResult::Separated => return Vec::new(),
        gjk::GjkResult::NoConvergence => {
            SolveWarning::GjkNoConvergence.log("hull_pair_contacts");
            return Vec::new();
        }
        gjk::GjkResult::Intersecting(simplex) => simplex,
    };

    let (normal, depth) = match epa::epa_penetration(a, b, &simplex, epa_max_iter, epa_tolerance) {
        epa::EpaResult::NoConvergence => {
            SolveWarning::EpaNoConvergence.log("hull_pair_contacts");
            return Vec::new();
        }
        epa::EpaResult::Penetration { normal, depth } => (normal, depth),
    };

    manifold::build_manifold(a, b, normal, depth)
}

/// All-pairs contact generation between two collider lists belonging to
/// two different entities.
pub fn colliders_get_contacts(
    colliders_a: &[Collider],
    colliders_b: &[Collider],
    gjk_max_iter: usize,
    epa_max_iter: usize,
    epa_tolerance: f64,
) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for a in colliders_a {
        for b in colliders_b {
            contacts.extend(hull_pair_contacts(
                a,
                b,
                gjk_max_iter,
                epa_max_iter,
                epa_tolerance,
            ));
        }
    }
    contacts
}
