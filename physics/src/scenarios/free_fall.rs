//! A unit cube falls onto a fixed floor and settles.
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

pub struct FreeFall {}

impl Scenario for FreeFall {
    fn name(&self) -> &str {
        "Free Fall"
    }

    fn create(&self) -> World {
        let mut world = World::new();
        world.config.n_substeps = 1;
        world.config.n_pos_iters = 20;
        world.gravity = DVec3::new(0.0, -10.0, 0.0);
        world.config.gravity_magnitude = 10.0;

        let (ground_positions, ground_faces, ground_normals) = primitives::ground_plane(20.0, 0.5);
        let ground = Collider::from_mesh(&ground_positions, &ground_faces, &ground_normals).unwrap();
        world.entities.create_fixed(DVec3::new(0.0, -2.0, 0.0), vec![ground]);

        world.entities.create(DVec3::new(0.0, 10.0, 0.0), 1.0, cube_inverse_inertia(1.0, 0.5), vec![unit_cube()]);
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_settles_near_the_floor() {
        let mut world = FreeFall {}.create();
        let cube_id = world.entities.iter().nth(1).unwrap().id;

        // Falling from y=10 to the floor top at y=-1.5 takes ~1.48s under
        // g=10; give it 3s to fall and settle before checking the rest band.
        for _ in 0..180 {
            world.step(1.0 / 60.0);
        }
        let y = world.entities.get(cube_id).unwrap().world_position.y;
        assert!((-1.5..=0.5).contains(&y), "y was {y}");

        for _ in 0..120 {
            world.step(1.0 / 60.0);
        }
        let e = world.entities.get(cube_id).unwrap();
        assert!(e.linear_velocity.length() < 0.05, "speed was {}", e.linear_velocity.length());
    }
}
