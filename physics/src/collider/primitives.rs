//! Inline vertex/face/normal generators standing in for an external mesh
//! parser, out of scope here. Feeds [`super::Collider::from_mesh`].
use glam::DVec3;

/// An axis-aligned box hull, `half_extents` from center to each face.
///
/// Returns `(positions, face_indices, face_normals)` ready for
/// [`super::Collider::from_mesh`]. Each face is wound counter-clockwise
/// when viewed from outside the box.
pub fn cuboid(half_extents: DVec3) -> (Vec<DVec3>, Vec<Vec<usize>>, Vec<DVec3>) {
    let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
    let positions = vec![
        DVec3::new(-x, -y, -z), // 0
        DVec3::new(x, -y, -z),  // 1
        DVec3::new(x, y, -z),   // 2
        DVec3::new(-x, y, -z),  // 3
        DVec3::new(-x, -y, z),  // 4
        DVec3::new(x, -y, z),   // 5
        DVec3::new(x, y, z),    // 6
        DVec3::new(-x, y, z),   // 7
    ];
    let faces = vec![
        vec![1, 2, 6, 5], // +X
        vec![4, 7, 3, 0], // -X
        vec![3, 7, 6, 2], // +Y
        vec![0, 1, 5, 4], // -Y
        vec![5, 6, 7, 4], // +Z
        vec![0, 3, 2, 1], // -Z
    ];
    let normals = vec![
        DVec3::X,
        -DVec3::X,
        DVec3::Y,
        -DVec3::Y,
        DVec3::Z,
        -DVec3::Z,
    ];
    (positions, faces, normals)
}

/// A thin box used as a static ground plane: wide in X/Z, `half_thickness`
/// in Y.
pub fn ground_plane(half_width: f64, half_thickness: f64) -> (Vec<DVec3>, Vec<Vec<usize>>, Vec<DVec3>) {
    cuboid(DVec3::new(half_width, half_thickness, half_width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::Collider;

    #[test]
    fn cuboid_faces_wind_outward() {
        let (positions, faces, normals) = cuboid(DVec3::splat(1.0));
        let hull = Collider::from_mesh(&positions, &faces, &normals).unwrap();
        for face in &hull.faces {
            let centroid: DVec3 = face
                .indices
                .iter()
                .map(|&i| hull.vertices_local[i])
                .sum::<DVec3>()
                / face.indices.len() as f64;
            // The face normal should point away from the hull's center (origin).
            assert!(face.normal_local.dot(centroid) > 0.0);
        }
    }
}
