//! A cube thrown at the floor and bouncing back up.
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

pub const DROP_HEIGHT: f64 = 3.0;
pub const IMPACT_RESTITUTION: f64 = 0.5;

pub struct ObliqueImpact {}

impl Scenario for ObliqueImpact {
    fn name(&self) -> &str {
        "Oblique Impact"
    }

    fn create(&self) -> World {
        let mut world = World::new();
        world.config.n_substeps = 10;
        world.config.n_pos_iters = 4;
        world.gravity = DVec3::new(0.0, -10.0, 0.0);
        world.config.gravity_magnitude = 10.0;

        let (ground_positions, ground_faces, ground_normals) = primitives::ground_plane(20.0, 0.5);
        let ground = Collider::from_mesh(&ground_positions, &ground_faces, &ground_normals).unwrap();
        world.entities.create_fixed(DVec3::new(0.0, -0.5, 0.0), vec![ground]);

        let cube = world.entities.create(
            DVec3::new(0.0, DROP_HEIGHT, 0.0),
            1.0,
            cube_inverse_inertia(1.0, 0.5),
            vec![unit_cube()],
        );
        let e = world.entities.get_mut(cube).unwrap();
        e.linear_velocity = DVec3::new(0.0, -5.0, 0.0);
        e.restitution_coefficient = IMPACT_RESTITUTION;
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounce_height_matches_restitution_squared() {
        let mut world = ObliqueImpact {}.create();
        let cube = world.entities.iter().nth(1).unwrap().id;
        let dt = 1.0 / 240.0;

        let mut touched_floor = false;
        let mut peak_after_bounce = f64::MIN;
        for _ in 0..(240 * 4) {
            world.step(dt);
            let e = world.entities.get(cube).unwrap();
            if e.world_position.y < 0.55 {
                touched_floor = true;
            }
            if touched_floor && e.linear_velocity.y < 0.0 {
                // past the post-bounce peak, descending again
                break;
            }
            if touched_floor {
                peak_after_bounce = peak_after_bounce.max(e.world_position.y);
            }
        }

        assert!(touched_floor, "cube never reached the floor");
        let initial_drop = DROP_HEIGHT - 0.5;
        let bounce_height = peak_after_bounce - 0.5;
        let expected = IMPACT_RESTITUTION.powi(2) * initial_drop;
        let relative_error = (bounce_height - expected).abs() / expected;
        assert!(relative_error < 0.10, "bounce height {bounce_height}, expected {expected}");
    }
}
