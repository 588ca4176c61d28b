//! Gilbert–Johnson–Keerthi intersection test.
use glam::DVec3;

use crate::collider::Collider;

/// A point of the Minkowski difference `A ⊖ B`, together with the support
/// points on each hull that produced it. EPA needs the latter to
/// reconstruct contact points once it finds the closest polytope face.
#[derive(Clone, Copy, Debug)]
pub struct SupportPoint {
    pub point: DVec3,
    pub on_a: DVec3,
    pub on_b: DVec3,
}

/// A 1–4 vertex simplex in the Minkowski difference. [`gjk_intersect`]
/// returns a full tetrahedron (4 vertices) enclosing the origin on
/// intersection.
#[derive(Clone, Debug)]
pub struct Simplex {
    pub points: Vec<SupportPoint>,
}

pub enum GjkResult {
    Separated,
    Intersecting(Simplex),
    /// The iteration cap was hit without the simplex resolving either way.
    NoConvergence,
}

fn support_point(hull: &Collider, dir: DVec3) -> DVec3 {
    hull.vertices_world
        .iter()
        .copied()
        .fold(hull.vertices_world[0], |best, v| {
            if v.dot(dir) > best.dot(dir) {
                v
            } else {
                best
            }
        })
}

fn support(a: &Collider, b: &Collider, dir: DVec3) -> SupportPoint {
    let on_a = support_point(a, dir);
    let on_b = support_point(b, -dir);
    SupportPoint {
        point: on_a - on_b,
        on_a,
        on_b,
    }
}

fn same_direction(v: DVec3, dir: DVec3) -> bool {
    v.dot(dir) > 0.0
}

/// Runs GJK on two world-space convex hulls. Returns the terminal
/// tetrahedral simplex on intersection, `Separated` when a separating axis
/// is actually found, or `NoConvergence` if `max_iter` runs out first.
pub fn gjk_intersect(a: &Collider, b: &Collider, max_iter: usize) -> GjkResult {
    if a.vertices_world.is_empty() || b.vertices_world.is_empty() {
        return GjkResult::Separated;
    }

    let centroid_a: DVec3 = a.vertices_world.iter().copied().sum::<DVec3>() / a.vertices_world.len() as f64;
    let centroid_b: DVec3 = b.vertices_world.iter().copied().sum::<DVec3>() / b.vertices_world.len() as f64;
    let mut direction = crate::math::safe_normalize(centroid_b - centroid_a).unwrap_or(DVec3::X);

    let mut simplex = vec![support(a, b, direction)];
    direction = -simplex[0].point;
    if direction == DVec3::ZERO {
        direction = DVec3::X;
    }

    for _ in 0..max_iter {
        let new_point = support(a, b, direction);
        if new_point.point.dot(direction) <= 0.0 {
            return GjkResult::Separated;
        }
        simplex.insert(0, new_point);
        if next_simplex(&mut simplex, &mut direction) {
            return GjkResult::Intersecting(Simplex { points: simplex });
        }
    }
    GjkResult::NoConvergence
}

/// Dispatches to the line/triangle/tetrahedron Voronoi-region tests.
/// Returns `true` once a tetrahedron encloses the origin.
fn next_simplex(simplex: &mut Vec<SupportPoint>, direction: &mut DVec3) -> bool {
    match simplex.len() {
        2 => line_case(simplex, direction),
        3 => triangle_case(simplex, direction),
        4 => tetrahedron_case(simplex, direction),
        _ => unreachable!("simplex should never exceed 4 points"),
    }
}

fn line_case(simplex: &mut Vec<SupportPoint>, direction: &mut DVec3) -> bool {
    let a = simplex[0];
    let b = simplex[1];
    let ab = b.point - a.point;
    let ao = -a.point;

    if same_direction(ab, ao) {
        *direction = ab.cross(ao).cross(ab);
        if *direction == DVec3::ZERO {
            // Origin lies on the segment; any perpendicular works.
            *direction = ab.cross(DVec3::X).cross(ab);
            if *direction == DVec3::ZERO {
                *direction = ab.cross(DVec3::Y).cross(ab);
            }
        }
    } else {
        *simplex = vec![a];
        *direction = ao;
    }
    false
}

fn triangle_case(simplex: &mut Vec<SupportPoint>, direction: &mut DVec3) -> bool {
    let a = simplex[0];
    let b = simplex[1];
    let c = simplex[2];
    let ab = b.point - a.point;
    let ac = c.point - a.point;
    let ao = -a.point;
    let abc = ab.cross(ac);

    if same_direction(abc.cross(ac), ao) {
        if same_direction(ac, ao) {
            *simplex = vec![a, c];
            *direction = ac.cross(ao).cross(ac);
        } else {
            *simplex = vec![a, b];
            return line_case(simplex, direction);
        }
    } else if same_direction(ab.cross(abc), ao) {
        *simplex = vec![a, b];
        return line_case(simplex, direction);
    } else if same_direction(abc, ao) {
        *direction = abc;
    } else {
        *simplex = vec![a, c, b];
        *direction = -abc;
    }
    false
}

fn tetrahedron_case(simplex: &mut Vec<SupportPoint>, direction: &mut DVec3) -> bool {
    let a = simplex[0];
    let b = simplex[1];
    let c = simplex[2];
    let d = simplex[3];
    let ab = b.point - a.point;
    let ac = c.point - a.point;
    let ad = d.point - a.point;
    let ao = -a.point;

    let abc = ab.cross(ac);
    let acd = ac.cross(ad);
    let adb = ad.cross(ab);

    if same_direction(abc, ao) {
        *simplex = vec![a, b, c];
        return triangle_case(simplex, direction);
    }
    if same_direction(acd, ao) {
        *simplex = vec![a, c, d];
        return triangle_case(simplex, direction);
    }
    if same_direction(adb, ao) {
        *simplex = vec![a, d, b];
        return triangle_case(simplex, direction);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::{primitives, Collider};

    fn cube_at(center: DVec3) -> Collider {
        let (positions, faces, normals) = primitives::cuboid(DVec3::splat(0.5));
        let mut hull = Collider::from_mesh(&positions, &faces, &normals).unwrap();
        hull.update(center, glam::DQuat::IDENTITY);
        hull
    }

    #[test]
    fn separated_cubes_report_no_intersection() {
        let a = cube_at(DVec3::ZERO);
        let b = cube_at(DVec3::new(3.0, 0.0, 0.0));
        assert!(matches!(gjk_intersect(&a, &b, 64), GjkResult::Separated));
    }

    #[test]
    fn overlapping_cubes_report_intersection() {
        let a = cube_at(DVec3::ZERO);
        let b = cube_at(DVec3::new(0.5, 0.0, 0.0));
        match gjk_intersect(&a, &b, 64) {
            GjkResult::Intersecting(simplex) => assert_eq!(simplex.points.len(), 4),
            GjkResult::Separated => panic!("expected intersection"),
            GjkResult::NoConvergence => panic!("expected intersection, got no convergence"),
        }
    }

    #[test]
    fn touching_boundary_gap_flips_result() {
        // Just separated.
        let a = cube_at(DVec3::ZERO);
        let b = cube_at(DVec3::new(1.01, 0.0, 0.0));
        assert!(matches!(gjk_intersect(&a, &b, 64), GjkResult::Separated));

        // Shrinking the gap below zero must flip the result.
        let b_overlapping = cube_at(DVec3::new(0.99, 0.0, 0.0));
        assert!(matches!(
            gjk_intersect(&a, &b_overlapping, 64),
            GjkResult::Intersecting(_)
        ));
    }
}
