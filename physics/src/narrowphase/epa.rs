//! Expanding Polytope Algorithm. Recovers `(normal, depth)` from the
//! overlapping tetrahedral simplex GJK leaves behind.
use glam::DVec3;

use crate::collider::Collider;
use crate::math::safe_normalize;

use super::gjk::{Simplex, SupportPoint};

pub enum EpaResult {
    Penetration { normal: DVec3, depth: f64 },
    NoConvergence,
}

#[derive(Clone, Copy, Debug)]
struct PolytopeFace {
    a: usize,
    b: usize,
    c: usize,
    normal: DVec3,
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

/// Builds a face from `(i, j, k)`, flipping winding if needed so the
/// normal points away from `interior` (the polytope's centroid).
fn make_face(vertices: &[SupportPoint], i: usize, j: usize, k: usize, interior: DVec3) -> Option<PolytopeFace> {
    let (vi, vj, vk) = (vertices[i].point, vertices[j].point, vertices[k].point);
    let raw_normal = (vj - vi).cross(vk - vi);
    let normal = safe_normalize(raw_normal)?;
    if normal.dot(vi - interior) < 0.0 {
        Some(PolytopeFace { a: i, b: k, c: j, normal: -normal })
    } else {
        Some(PolytopeFace { a: i, b: j, c: k, normal })
    }
}

/// Builds the new face `(i, j, new)` continuing a horizon edge's existing
/// outward winding — no interior flip-check needed, the horizon edge's
/// orientation already encodes which side is outward.
fn make_horizon_face(vertices: &[SupportPoint], i: usize, j: usize, new: usize) -> Option<PolytopeFace> {
    let (vi, vj, vn) = (vertices[i].point, vertices[j].point, vertices[new].point);
    let normal = safe_normalize((vj - vi).cross(vn - vi))?;
    Some(PolytopeFace { a: i, b: j, c: new, normal })
}

/// Given the overlapping tetrahedron GJK produced, walks the polytope
/// outward until the support in the closest face's direction stops making
/// progress, returning the penetration normal and depth.
pub fn epa_penetration(
    a: &Collider,
    b: &Collider,
    simplex: &Simplex,
    max_iter: usize,
    tolerance: f64,
) -> EpaResult {
    let mut vertices: Vec<SupportPoint> = simplex.points.clone();
    if vertices.len() != 4 {
        return EpaResult::NoConvergence;
    }

    let interior: DVec3 =
        vertices.iter().map(|s| s.point).sum::<DVec3>() / vertices.len() as f64;

    let tetra_faces = [(1, 2, 3), (0, 3, 2), (0, 1, 3), (0, 2, 1)];
    let mut faces: Vec<PolytopeFace> = Vec::new();
    for (i, j, k) in tetra_faces {
        match make_face(&vertices, i, j, k, interior) {
            Some(f) => faces.push(f),
            None => return EpaResult::NoConvergence,
        }
    }

    for _ in 0..max_iter {
        // 1. Closest face to the origin, skipping degenerate (near-zero
        // area) faces.
        let mut closest_idx = None;
        let mut closest_dist = f64::INFINITY;
        for (idx, face) in faces.iter().enumerate() {
            let area2 = (vertices[face.b].point - vertices[face.a].point)
                .cross(vertices[face.c].point - vertices[face.a].point)
                .length_squared();
            if area2 < 1e-18 {
                continue;
            }
            let dist = face.normal.dot(vertices[face.a].point);
            if dist < closest_dist {
                closest_dist = dist;
                closest_idx = Some(idx);
            }
        }
        let Some(closest_idx) = closest_idx else {
            return EpaResult::NoConvergence;
        };
        let closest = faces[closest_idx];
        let normal = closest.normal;
        if normal == DVec3::ZERO {
            return EpaResult::NoConvergence;
        }

        // 2. Query Minkowski support along the face's outward normal.
        let new_point = support(a, b, normal);
        let support_dist = new_point.point.dot(normal);

        // 3. Converged.
        if support_dist - closest_dist < tolerance {
            return EpaResult::Penetration {
                normal,
                depth: closest_dist,
            };
        }

        // 4. Expand: remove faces visible from the new point, collect the
        // horizon, re-close with the new vertex.
        let new_idx = vertices.len();
        vertices.push(new_point);

        let mut removed_edges: Vec<(usize, usize)> = Vec::new();
        faces.retain(|face| {
            let visible = face.normal.dot(new_point.point - vertices[face.a].point) > 1e-10;
            if visible {
                for (x, y) in [(face.a, face.b), (face.b, face.c), (face.c, face.a)] {
                    if let Some(pos) = removed_edges.iter().position(|&(p, q)| p == y && q == x) {
                        removed_edges.remove(pos);
                    } else {
                        removed_edges.push((x, y));
                    }
                }
            }
            !visible
        });

        if removed_edges.is_empty() {
            return EpaResult::NoConvergence;
        }

        for (i, j) in removed_edges {
            if let Some(face) = make_horizon_face(&vertices, i, j, new_idx) {
                faces.push(face);
            }
        }
    }

    EpaResult::NoConvergence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::{primitives, Collider};
    use crate::narrowphase::gjk::gjk_intersect;
    use crate::narrowphase::gjk::GjkResult;

    fn cube_at(center: DVec3) -> Collider {
        let (positions, faces, normals) = primitives::cuboid(DVec3::splat(0.5));
        let mut hull = Collider::from_mesh(&positions, &faces, &normals).unwrap();
        hull.update(center, glam::DQuat::IDENTITY);
        hull
    }

    #[test]
    fn epa_recovers_depth_for_known_overlap() {
        let a = cube_at(DVec3::ZERO);
        // Overlap of 0.2 along X: half extents 0.5 each, centers 0.8 apart.
        let b = cube_at(DVec3::new(0.8, 0.0, 0.0));
        let simplex = match gjk_intersect(&a, &b, 64) {
            GjkResult::Intersecting(s) => s,
            GjkResult::Separated => panic!("expected overlap"),
            GjkResult::NoConvergence => panic!("expected overlap, got no convergence"),
        };
        match epa_penetration(&a, &b, &simplex, 64, 1e-6) {
            EpaResult::Penetration { normal, depth } => {
                assert!((depth - 0.2).abs() < 1e-3, "depth was {depth}");
                assert!(normal.dot(DVec3::X).abs() > 0.99, "normal was {normal}");
            }
            EpaResult::NoConvergence => panic!("expected convergence"),
        }
    }

    #[test]
    fn epa_depth_matches_shrinking_gap() {
        let a = cube_at(DVec3::ZERO);
        for overlap in [0.01, 0.05, 0.3] {
            let b = cube_at(DVec3::new(1.0 - overlap, 0.0, 0.0));
            let simplex = match gjk_intersect(&a, &b, 64) {
                GjkResult::Intersecting(s) => s,
                GjkResult::Separated => panic!("expected overlap for {overlap}"),
                GjkResult::NoConvergence => panic!("expected overlap for {overlap}, got no convergence"),
            };
            match epa_penetration(&a, &b, &simplex, 64, 1e-6) {
                EpaResult::Penetration { depth, .. } => {
                    assert!((depth - overlap).abs() < 1e-3, "overlap {overlap} got depth {depth}");
                }
                EpaResult::NoConvergence => panic!("expected convergence for {overlap}"),
            }
        }
    }
}
