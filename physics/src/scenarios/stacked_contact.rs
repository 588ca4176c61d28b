//! Two unit cubes resting on the floor, stacked.
use glam::{DMat3, DVec3};

use crate::collider::{primitives, Collider};
use crate::World;

use super::Scenario;

fn unit_cube() -> Collider {
    let (positions, faces, normals) = primitives::cuboid(DVec3::splat(0.5));
    Collider::from_mesh(&positions, &faces, &normals).unwrap()
}

fn cube_inverse_inertia(mass: f64, half_extent: f64) -> DMat3 {
    let side = half_extent * 2.0;
    let i = mass / 6.0 * side * side;
    DMat3::from_diagonal(DVec3::splat(1.0 / i))
}

pub struct StackedContact {}

impl Scenario for StackedContact {
    fn name(&self) -> &str {
        "Stacked Contact"
    }

    fn create(&self) -> World {
        let mut world = World::new();
        world.config.n_substeps = 10;
        world.config.n_pos_iters = 6;
        world.gravity = DVec3::new(0.0, -10.0, 0.0);
        world.config.gravity_magnitude = 10.0;

        let (ground_positions, ground_faces, ground_normals) = primitives::ground_plane(20.0, 0.5);
        let ground = Collider::from_mesh(&ground_positions, &ground_faces, &ground_normals).unwrap();
        world.entities.create_fixed(DVec3::new(0.0, -0.5, 0.0), vec![ground]);

        world.entities.create(DVec3::new(0.0, 0.55, 0.0), 1.0, cube_inverse_inertia(1.0, 0.5), vec![unit_cube()]);
        world.entities.create(DVec3::new(0.0, 1.6, 0.0), 1.0, cube_inverse_inertia(1.0, 0.5), vec![unit_cube()]);
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubes_settle_exactly_one_unit_apart() {
        let mut world = StackedContact {}.create();
        let bottom = world.entities.iter().nth(1).unwrap().id;
        let top = world.entities.iter().nth(2).unwrap().id;

        for _ in 0..(60 * 2) {
            world.step(1.0 / 60.0);
        }

        let bottom_y = world.entities.get(bottom).unwrap().world_position.y;
        let top_y = world.entities.get(top).unwrap().world_position.y;
        assert!(((top_y - bottom_y) - 1.0).abs() < 1e-2, "separation was {}", top_y - bottom_y);

        for id in [bottom, top] {
            let speed = world.entities.get(id).unwrap().linear_velocity.length();
            assert!(speed < 1e-2, "entity {id:?} still moving at {speed}");
        }
    }
}
