//! Convex-hull collider model.
use glam::{DMat3, DQuat, DVec3};

use crate::error::PhysicsError;

pub mod primitives;

/// One planar face of a convex hull.
#[derive(Clone, Debug)]
pub struct Face {
    pub normal_local: DVec3,
    pub normal_world: DVec3,
    /// Indices into the hull's vertex arrays, in polygon winding order.
    pub indices: Vec<usize>,
}

/// A convex hull in a rigid body's local frame, with cached world-space
/// vertices and face normals refreshed by [`Collider::update`].
#[derive(Clone, Debug)]
pub struct Collider {
    pub vertices_local: Vec<DVec3>,
    pub vertices_world: Vec<DVec3>,
    pub faces: Vec<Face>,
    /// Undirected edges, each a pair of vertex indices.
    pub edges: Vec<(usize, usize)>,
}

const PLANARITY_TOLERANCE: f64 = 1e-4;

impl Collider {
    /// Builds a hull from an OBJ-like `(positions, face_indices,
    /// face_normals)` triple already parsed by an external collaborator.
    /// Deduplicates vertices, derives the edge list from the face
    /// polygons, and validates planarity.
    pub fn from_mesh(
        positions: &[DVec3],
        face_indices: &[Vec<usize>],
        face_normals: &[DVec3],
    ) -> Result<Collider, PhysicsError> {
        if face_indices.len() != face_normals.len() {
            return Err(PhysicsError::InvalidGeometry(format!(
                "{} faces but {} face normals",
                face_indices.len(),
                face_normals.len()
            )));
        }

        // Deduplicate vertices by exact position; inputs are expected to
        // already share indices for coincident vertices, but we don't
        // trust that here.
        let mut vertices_local: Vec<DVec3> = Vec::new();
        let mut remap: Vec<usize> = Vec::with_capacity(positions.len());
        for &p in positions {
            let existing = vertices_local
                .iter()
                .position(|&v| (v - p).length_squared() < 1e-12);
            match existing {
                Some(idx) => remap.push(idx),
                None => {
                    remap.push(vertices_local.len());
                    vertices_local.push(p);
                }
            }
        }

        if vertices_local.len() < 4 {
            return Err(PhysicsError::InvalidGeometry(format!(
                "hull has only {} unique vertices, need at least 4",
                vertices_local.len()
            )));
        }

        let mut faces = Vec::with_capacity(face_indices.len());
        let mut edge_set = std::collections::BTreeSet::new();
        for (face, &normal_local) in face_indices.iter().zip(face_normals.iter()) {
            let mut seen = std::collections::HashSet::new();
            let mut remapped = Vec::with_capacity(face.len());
            for &raw in face {
                let idx = remap[raw];
                if !seen.insert(idx) {
                    return Err(PhysicsError::InvalidGeometry(format!(
                        "face has duplicate vertex index {idx}"
                    )));
                }
                remapped.push(idx);
            }

            if remapped.len() < 3 {
                return Err(PhysicsError::InvalidGeometry(
                    "face has fewer than 3 vertices".into(),
                ));
            }

            let origin = vertices_local[remapped[0]];
            let normal = crate::math::safe_normalize(normal_local).ok_or_else(|| {
                PhysicsError::InvalidGeometry("face normal has zero length".into())
            })?;
            for &idx in &remapped {
                let offset = (vertices_local[idx] - origin).dot(normal);
                if offset.abs() > PLANARITY_TOLERANCE {
                    return Err(PhysicsError::InvalidGeometry(format!(
                        "face vertex {idx} is {offset} off the face plane"
                    )));
                }
            }

            for i in 0..remapped.len() {
                let a = remapped[i];
                let b = remapped[(i + 1) % remapped.len()];
                edge_set.insert((a.min(b), a.max(b)));
            }

            faces.push(Face {
                normal_local: normal,
                normal_world: normal,
                indices: remapped,
            });
        }

        let vertices_world = vertices_local.clone();
        Ok(Collider {
            vertices_local,
            vertices_world,
            faces,
            edges: edge_set.into_iter().collect(),
        })
    }

    /// Refreshes world-space vertices and face normals from the owning
    /// body's current pose.
    pub fn update(&mut self, world_position: DVec3, world_rotation: DQuat) {
        let r = DMat3::from_quat(world_rotation);
        for (local, world) in self.vertices_local.iter().zip(self.vertices_world.iter_mut()) {
            *world = world_position + r * *local;
        }
        for face in &mut self.faces {
            face.normal_world = r * face.normal_local;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_hull_has_expected_counts() {
        let (positions, faces, normals) = primitives::cuboid(DVec3::splat(0.5));
        let hull = Collider::from_mesh(&positions, &faces, &normals).unwrap();
        assert_eq!(hull.vertices_local.len(), 8);
        assert_eq!(hull.faces.len(), 6);
        assert_eq!(hull.edges.len(), 12);
    }

    #[test]
    fn update_transforms_vertices_and_normals() {
        let (positions, faces, normals) = primitives::cuboid(DVec3::splat(0.5));
        let mut hull = Collider::from_mesh(&positions, &faces, &normals).unwrap();
        let rotation = crate::math::quat_from_axis_angle_degrees(DVec3::Y, 90.0);
        hull.update(DVec3::new(1.0, 2.0, 3.0), rotation);
        for v in &hull.vertices_world {
            assert!(v.is_finite());
        }
        // A +X local face should now point roughly along -Z (90 deg about Y).
        let x_face = hull
            .faces
            .iter()
            .find(|f| f.normal_local.abs_diff_eq(DVec3::X, 1e-9))
            .unwrap();
        assert!(x_face.normal_world.abs_diff_eq(-DVec3::Z, 1e-6));
    }

    #[test]
    fn too_few_vertices_is_invalid_geometry() {
        let positions = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let faces = vec![vec![0usize, 1, 2]];
        let normals = vec![DVec3::Z];
        let err = Collider::from_mesh(&positions, &faces, &normals).unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidGeometry(_)));
    }

    #[test]
    fn non_planar_face_is_invalid_geometry() {
        let positions = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.5), // off-plane
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![vec![0usize, 1, 2, 3]];
        let normals = vec![DVec3::Z];
        let err = Collider::from_mesh(&positions, &faces, &normals).unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidGeometry(_)));
    }
}
