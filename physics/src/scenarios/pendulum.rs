//! A single hinge about +Z, swinging under gravity with no angular limit.
use glam::{DMat3, DVec3};

use crate::collider::{primitives, Collider};
use crate::constraint::{Constraint, HingeConstraint};
use crate::math::quat_from_axis_angle_degrees;
use crate::{EntityId, World};

use super::Scenario;

pub const PENDULUM_LENGTH: f64 = 2.0;
const PENDULUM_GRAVITY: f64 = 10.0;
/// Small enough that the lever's swing approximates the point-mass period
/// `2*pi*sqrt(L/g)`.
const INITIAL_SWING_DEGREES: f64 = 8.0;

fn lever_collider() -> Collider {
    let (positions, faces, normals) = primitives::cuboid(DVec3::splat(0.1));
    Collider::from_mesh(&positions, &faces, &normals).unwrap()
}

fn lever_inverse_inertia(mass: f64, half_extent: f64) -> DMat3 {
    let side = half_extent * 2.0;
    let i = mass / 6.0 * side * side;
    DMat3::from_diagonal(DVec3::splat(1.0 / i))
}

/// Shared rig for the unlimited pendulum and the limited variant: a fixed
/// pivot and a lever joined by a hinge about +Z, released from
/// `initial_degrees` off vertical.
pub(crate) fn build_hinge_pendulum_at(initial_degrees: f64, limit: Option<(f64, f64)>) -> (World, EntityId, EntityId) {
    let mut world = World::new();
    world.config.n_substeps = 8;
    world.config.n_pos_iters = 4;
    world.gravity = DVec3::new(0.0, -PENDULUM_GRAVITY, 0.0);
    world.config.gravity_magnitude = PENDULUM_GRAVITY;

    let pivot = world.entities.create_fixed(DVec3::ZERO, Vec::new());

    let rest_rotation = quat_from_axis_angle_degrees(DVec3::Z, initial_degrees);
    let rest_offset = rest_rotation * DVec3::new(0.0, -PENDULUM_LENGTH, 0.0);
    let lever = world.entities.create(
        rest_offset,
        1.0,
        lever_inverse_inertia(1.0, 0.1),
        vec![lever_collider()],
    );
    world.entities.get_mut(lever).unwrap().world_rotation = rest_rotation;

    let mut hinge = HingeConstraint::new(
        pivot,
        lever,
        DVec3::ZERO,
        DVec3::new(0.0, PENDULUM_LENGTH, 0.0),
        DVec3::Z,
        DVec3::new(0.0, -1.0, 0.0),
        DVec3::X,
        DVec3::Z,
        DVec3::new(0.0, -1.0, 0.0),
        DVec3::X,
    );
    if let Some((theta_min, theta_max)) = limit {
        hinge = hinge.with_limit(theta_min, theta_max);
    }
    world.constraints.push(Constraint::Hinge(hinge));

    (world, pivot, lever)
}

pub(crate) fn build_hinge_pendulum(limit: Option<(f64, f64)>) -> (World, EntityId, EntityId) {
    build_hinge_pendulum_at(INITIAL_SWING_DEGREES, limit)
}

pub struct Pendulum {}

impl Scenario for Pendulum {
    fn name(&self) -> &str {
        "Pendulum"
    }

    fn create(&self) -> World {
        build_hinge_pendulum(None).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn swing_angle(world: &World, lever: EntityId) -> f64 {
        let e = world.entities.get(lever).unwrap();
        let arm = e.world_rotation * DVec3::new(0.0, -1.0, 0.0);
        let x = arm.dot(DVec3::new(0.0, -1.0, 0.0));
        let y = arm.dot(DVec3::X);
        y.atan2(x)
    }

    #[test]
    fn amplitude_decreases_monotonically() {
        let (mut world, _pivot, lever) = build_hinge_pendulum(None);
        let dt = 1.0 / 240.0;

        let mut peaks = Vec::new();
        let mut prev_angle = swing_angle(&world, lever);
        let mut prev_velocity_sign = 0.0f64;
        for _ in 0..(240 * 8) {
            world.step(dt);
            let angle = swing_angle(&world, lever);
            let velocity_sign = (angle - prev_angle).signum();
            if prev_velocity_sign > 0.0 && velocity_sign <= 0.0 {
                peaks.push(prev_angle);
            }
            prev_velocity_sign = velocity_sign;
            prev_angle = angle;
        }

        assert!(peaks.len() >= 2, "expected at least two swing peaks, got {}", peaks.len());
        for pair in peaks.windows(2) {
            assert!(pair[1].abs() <= pair[0].abs() + 1e-6, "amplitude grew: {:?}", pair);
        }
    }

    #[test]
    fn period_matches_small_angle_formula() {
        let (mut world, _pivot, lever) = build_hinge_pendulum(None);
        let dt = 1.0 / 240.0;

        let mut prev_angle = swing_angle(&world, lever);
        let mut zero_crossings = Vec::new();
        let mut t = 0.0;
        for _ in 0..(240 * 6) {
            world.step(dt);
            t += dt;
            let angle = swing_angle(&world, lever);
            if prev_angle.signum() != angle.signum() {
                zero_crossings.push(t);
            }
            prev_angle = angle;
        }

        assert!(zero_crossings.len() >= 2, "need at least two zero crossings");
        let half_period = zero_crossings[1] - zero_crossings[0];
        let measured_period = 2.0 * half_period;
        let expected_period = 2.0 * PI * (PENDULUM_LENGTH / PENDULUM_GRAVITY).sqrt();
        let relative_error = (measured_period - expected_period).abs() / expected_period;
        assert!(relative_error < 0.10, "measured {measured_period}, expected {expected_period}");
    }
}
