//! A compliant positional constraint acting as a spring, oscillating a
//! cube about its loaded equilibrium.
use glam::{DMat3, DVec3};

use crate::collider::{primitives, Collider};
use crate::constraint::{Constraint, PositionalConstraint};
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

pub const SPRING_COMPLIANCE: f64 = 1e-3;
pub const SPRING_MASS: f64 = 1.0;

pub struct Spring {}

impl Scenario for Spring {
    fn name(&self) -> &str {
        "Spring"
    }

    fn create(&self) -> World {
        let mut world = World::new();
        world.config.n_substeps = 20;
        world.config.n_pos_iters = 4;
        world.config.enable_collisions = false;
        world.gravity = DVec3::new(0.0, -10.0, 0.0);
        world.config.gravity_magnitude = 10.0;

        let anchor = world.entities.create_fixed(DVec3::ZERO, Vec::new());
        let cube = world.entities.create(
            DVec3::new(0.0, -3.0, 0.0),
            1.0 / SPRING_MASS,
            cube_inverse_inertia(SPRING_MASS, 0.5),
            vec![unit_cube()],
        );

        let spring = PositionalConstraint::new(anchor, cube, DVec3::ZERO, DVec3::ZERO)
            .with_distance(DVec3::new(0.0, -3.0, 0.0))
            .with_compliance(SPRING_COMPLIANCE);
        world.constraints.push(Constraint::Positional(spring));
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn cube_oscillates_about_loaded_equilibrium() {
        let mut world = Spring {}.create();
        let cube = world.entities.iter().nth(1).unwrap().id;
        let dt = 1.0 / 960.0;

        let mut prev_velocity = 0.0;
        let mut zero_crossings = Vec::new();
        let mut t = 0.0;
        for _ in 0..(960 * 2) {
            world.step(dt);
            t += dt;
            let v = world.entities.get(cube).unwrap().linear_velocity.y;
            if prev_velocity != 0.0 && prev_velocity.signum() != v.signum() {
                zero_crossings.push(t);
            }
            prev_velocity = v;
        }

        assert!(zero_crossings.len() >= 2, "need at least two velocity zero crossings");
        let half_period = zero_crossings[1] - zero_crossings[0];
        let measured_period = 2.0 * half_period;
        let expected_period = 2.0 * PI * (SPRING_COMPLIANCE * SPRING_MASS).sqrt();
        let relative_error = (measured_period - expected_period).abs() / expected_period;
        assert!(relative_error < 0.15, "measured {measured_period}, expected {expected_period}");
    }
}
