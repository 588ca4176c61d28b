//! The same hinge pendulum, with a swing angle clamped to
//! `[-0.9*pi, 0.9*pi]`.
use std::f64::consts::PI;

use glam::DVec3;

use crate::World;

use super::pendulum::build_hinge_pendulum_at;
use super::Scenario;

const LIMIT: f64 = 0.9 * PI;
/// Released just past the limit angle, so the unlimited swing would
/// overshoot it and the clamp has to engage on every pass.
const INITIAL_DEGREES: f64 = 170.0;

pub struct HingeLimit {}

impl Scenario for HingeLimit {
    fn name(&self) -> &str {
        "Hinge Limit"
    }

    fn create(&self) -> World {
        build_hinge_pendulum_at(INITIAL_DEGREES, Some((-LIMIT, LIMIT))).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swing_angle(world: &World, lever: crate::EntityId) -> f64 {
        let e = world.entities.get(lever).unwrap();
        let arm = e.world_rotation * DVec3::new(0.0, -1.0, 0.0);
        let x = arm.dot(DVec3::new(0.0, -1.0, 0.0));
        let y = arm.dot(DVec3::X);
        y.atan2(x)
    }

    #[test]
    fn swing_saturates_at_the_configured_limit() {
        let (mut world, _pivot, lever) = build_hinge_pendulum_at(INITIAL_DEGREES, Some((-LIMIT, LIMIT)));
        let dt = 1.0 / 480.0;

        let mut max_angle = f64::MIN;
        let mut min_angle = f64::MAX;
        for _ in 0..(480 * 6) {
            world.step(dt);
            let angle = swing_angle(&world, lever);
            max_angle = max_angle.max(angle);
            min_angle = min_angle.min(angle);
        }

        assert!((max_angle - LIMIT).abs() < 2e-2, "max angle was {max_angle}, limit {LIMIT}");
        assert!((min_angle + LIMIT).abs() < 2e-2, "min angle was {min_angle}, limit {}", -LIMIT);
    }
}
