//! Contact manifold construction by Sutherland–Hodgman clipping.
use glam::DVec3;

use crate::collider::{Collider, Face};

use super::Contact;

struct ClippedPoint {
    on_incident: DVec3,
    on_reference: DVec3,
    depth: f64,
}

fn best_face<'a>(hull: &'a Collider, direction: DVec3) -> (usize, &'a Face, f64) {
    hull.faces
        .iter()
        .enumerate()
        .map(|(i, f)| (i, f, f.normal_world.dot(direction)))
        .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap())
        .expect("hull has at least one face")
}

fn face_polygon_world(hull: &Collider, face: &Face) -> Vec<DVec3> {
    face.indices.iter().map(|&i| hull.vertices_world[i]).collect()
}

/// Clips `polygon` against the half-space `{p : (p - plane_point)·plane_normal <= 0}`.
fn clip_against_plane(polygon: &[DVec3], plane_point: DVec3, plane_normal: DVec3) -> Vec<DVec3> {
    if polygon.is_empty() {
        return Vec::new();
    }
    let mut output = Vec::with_capacity(polygon.len() + 1);
    let n = polygon.len();
    for i in 0..n {
        let current = polygon[i];
        let prev = polygon[(i + n - 1) % n];
        let current_dist = (current - plane_point).dot(plane_normal);
        let prev_dist = (prev - plane_point).dot(plane_normal);

        if current_dist <= 0.0 {
            if prev_dist > 0.0 {
                let t = prev_dist / (prev_dist - current_dist);
                output.push(prev + t * (current - prev));
            }
            output.push(current);
        } else if prev_dist <= 0.0 {
            let t = prev_dist / (prev_dist - current_dist);
            output.push(prev + t * (current - prev));
        }
    }
    output
}

/// Clips the incident polygon against every side-plane of the reference
/// face, using the reference face's own edges to build each side-plane.
fn clip_to_reference_face(incident_polygon: &[DVec3], reference_polygon: &[DVec3], reference_normal: DVec3) -> Vec<DVec3> {
    let n = reference_polygon.len();
    let centroid: DVec3 = reference_polygon.iter().copied().sum::<DVec3>() / n as f64;

    let mut polygon = incident_polygon.to_vec();
    for i in 0..n {
        let v0 = reference_polygon[i];
        let v1 = reference_polygon[(i + 1) % n];
        let edge_dir = v1 - v0;
        let mut side_normal = edge_dir.cross(reference_normal);
        if let Some(normalized) = crate::math::safe_normalize(side_normal) {
            side_normal = normalized;
        } else {
            continue;
        }
        // Ensure the polygon's own centroid is on the "inside" (<=0) side.
        if (centroid - v0).dot(side_normal) > 0.0 {
            side_normal = -side_normal;
        }
        polygon = clip_against_plane(&polygon, v0, side_normal);
        if polygon.is_empty() {
            break;
        }
    }
    polygon
}

/// Keeps at most 4 points: the deepest, then three more maximizing the
/// enclosed quadrilateral area.
fn reduce_to_four(points: Vec<ClippedPoint>) -> Vec<ClippedPoint> {
    if points.len() <= 4 {
        return points;
    }

    let idx0 = (0..points.len())
        .max_by(|&a, &b| points[a].depth.partial_cmp(&points[b].depth).unwrap())
        .unwrap();

    let idx1 = (0..points.len())
        .filter(|&i| i != idx0)
        .max_by(|&a, &b| {
            let da = (points[a].on_incident - points[idx0].on_incident).length_squared();
            let db = (points[b].on_incident - points[idx0].on_incident).length_squared();
            da.partial_cmp(&db).unwrap()
        })
        .unwrap();

    let idx2 = (0..points.len())
        .filter(|&i| i != idx0 && i != idx1)
        .max_by(|&a, &b| {
            let area = |i: usize| {
                (points[i].on_incident - points[idx0].on_incident)
                    .cross(points[i].on_incident - points[idx1].on_incident)
                    .length_squared()
            };
            area(a).partial_cmp(&area(b)).unwrap()
        })
        .unwrap();

    let idx3 = (0..points.len())
        .filter(|&i| i != idx0 && i != idx1 && i != idx2)
        .max_by(|&a, &b| {
            let tri_area = |p: usize, q: usize, r: usize| {
                (points[q].on_incident - points[p].on_incident)
                    .cross(points[r].on_incident - points[p].on_incident)
                    .length()
            };
            let total = |i: usize| {
                tri_area(idx0, idx1, i) + tri_area(idx1, idx2, i) + tri_area(idx2, idx0, i)
            };
            total(a).partial_cmp(&total(b)).unwrap()
        })
        .unwrap();

    let mut chosen = vec![idx0, idx1, idx2, idx3];
    chosen.sort_unstable();
    let mut out = Vec::with_capacity(4);
    for (i, p) in points.into_iter().enumerate() {
        if chosen.contains(&i) {
            out.push(p);
        }
    }
    out
}

/// Builds up to 4 contact points between two hulls given the EPA-derived
/// `(normal, depth)`. `normal` points from `a` towards `b`.
pub fn build_manifold(a: &Collider, b: &Collider, normal: DVec3, depth: f64) -> Vec<Contact> {
    // `a`'s candidate reference face is the one facing into `b` (along
    // `normal`); `b`'s is the one facing back into `a` (along `-normal`).
    let (_, face_a, score_a) = best_face(a, normal);
    let (_, face_b, score_b) = best_face(b, -normal);

    let (reference_hull, reference_face, incident_hull, incident_face, incident_is_a) =
        if score_a >= score_b {
            (a, face_a, b, face_b, false)
        } else {
            (b, face_b, a, face_a, true)
        };

    let reference_polygon = face_polygon_world(reference_hull, reference_face);
    let incident_polygon = face_polygon_world(incident_hull, incident_face);

    let clipped = clip_to_reference_face(&incident_polygon, &reference_polygon, reference_face.normal_world);

    let ref_plane_point = reference_polygon[0];
    let ref_normal = reference_face.normal_world;
    const PENETRATION_TOLERANCE: f64 = 1e-4;

    let mut points: Vec<ClippedPoint> = clipped
        .into_iter()
        .filter_map(|p| {
            let signed_dist = (p - ref_plane_point).dot(ref_normal);
            let point_depth = -signed_dist;
            if point_depth >= -PENETRATION_TOLERANCE {
                let on_reference = p + point_depth * ref_normal;
                Some(ClippedPoint {
                    on_incident: p,
                    on_reference,
                    depth: point_depth,
                })
            } else {
                None
            }
        })
        .collect();

    if points.is_empty() {
        // EPA already told us these hulls overlap by `depth`; fall back to
        // a single contact at the deepest support point pair so a
        // degenerate clip never silently drops the contact.
        points.push(ClippedPoint {
            on_incident: incident_polygon[0],
            on_reference: incident_polygon[0] + depth * ref_normal,
            depth,
        });
    }

    let points = reduce_to_four(points);

    points
        .into_iter()
        .map(|p| {
            let (point_on_a, point_on_b) = if incident_is_a {
                (p.on_incident, p.on_reference)
            } else {
                (p.on_reference, p.on_incident)
            };
            Contact {
                point_on_a_world: point_on_a,
                point_on_b_world: point_on_b,
                normal_world: normal,
                depth: p.depth,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::primitives;

    fn cube_at(center: DVec3) -> Collider {
        let (positions, faces, normals) = primitives::cuboid(DVec3::splat(0.5));
        let mut hull = Collider::from_mesh(&positions, &faces, &normals).unwrap();
        hull.update(center, glam::DQuat::IDENTITY);
        hull
    }

    #[test]
    fn stacked_cubes_yield_four_contacts() {
        // `normal` points from `a` (bottom) towards `b` (top), i.e. up.
        let bottom = cube_at(DVec3::ZERO);
        let top = cube_at(DVec3::new(0.0, 0.9, 0.0));
        let normal = DVec3::Y;
        let depth = 0.1;
        let contacts = build_manifold(&bottom, &top, normal, depth);
        assert_eq!(contacts.len(), 4);
        for c in &contacts {
            assert!((c.depth - 0.1).abs() < 1e-6);
            assert!(c.normal_world.abs_diff_eq(DVec3::Y, 1e-9));
            assert!((c.point_on_a_world.y - 0.5).abs() < 1e-6);
            assert!((c.point_on_b_world.y - 0.4).abs() < 1e-6);
            // A genuine overlap must push the solver's `(p_a - p_b)·n` positive.
            assert!((c.point_on_a_world - c.point_on_b_world).dot(c.normal_world) > 0.0);
        }
    }
}
