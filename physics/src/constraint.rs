//! The tagged constraint model. Generalizes the original `ConstraintEnum`
//! match-dispatch shape from 2D scalar Jacobians to 3D XPBD
//! compliance/lambda projections.
use glam::DVec3;

use crate::entity::EntityId;

/// Two entities joined so that `p1 - p2 == R1 * distance_local` (default
/// zero offset, a ball joint). `lambda` is the accumulated Lagrange
/// multiplier, reset to zero at the start of every substep.
#[derive(Clone, Copy, Debug)]
pub struct PositionalConstraint {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub r1_lc: DVec3,
    pub r2_lc: DVec3,
    pub distance_local: DVec3,
    pub compliance: f64,
    pub lambda: f64,
}

impl PositionalConstraint {
    pub fn new(entity_a: EntityId, entity_b: EntityId, r1_lc: DVec3, r2_lc: DVec3) -> PositionalConstraint {
        PositionalConstraint {
            entity_a,
            entity_b,
            r1_lc,
            r2_lc,
            distance_local: DVec3::ZERO,
            compliance: 0.0,
            lambda: 0.0,
        }
    }

    pub fn with_distance(mut self, distance_local: DVec3) -> PositionalConstraint {
        self.distance_local = distance_local;
        self
    }

    pub fn with_compliance(mut self, compliance: f64) -> PositionalConstraint {
        self.compliance = compliance;
        self
    }
}

/// Drives `rotation(entity_b) == rotation(entity_a)`.
#[derive(Clone, Copy, Debug)]
pub struct MutualOrientationConstraint {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub compliance: f64,
    pub lambda: f64,
}

impl MutualOrientationConstraint {
    pub fn new(entity_a: EntityId, entity_b: EntityId) -> MutualOrientationConstraint {
        MutualOrientationConstraint {
            entity_a,
            entity_b,
            compliance: 0.0,
            lambda: 0.0,
        }
    }
}

/// An optional angular range about the hinge axis, `[theta_min, theta_max]`.
#[derive(Clone, Copy, Debug)]
pub struct HingeLimit {
    pub theta_min: f64,
    pub theta_max: f64,
}

/// Positional component plus per-body `(axis, swing_b, swing_c)` local
/// triples and an optional angular limit.
#[derive(Clone, Copy, Debug)]
pub struct HingeConstraint {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub r1_lc: DVec3,
    pub r2_lc: DVec3,
    pub axis_a_lc: DVec3,
    pub swing_b_a_lc: DVec3,
    pub swing_c_a_lc: DVec3,
    pub axis_b_lc: DVec3,
    pub swing_b_b_lc: DVec3,
    pub swing_c_b_lc: DVec3,
    pub compliance: f64,
    pub limit: Option<HingeLimit>,
    /// Shared by axis alignment and limit clamping — both are rotation-only
    /// corrections about/around the swing plane, reset together each substep
    /// the way the original `lambda_rot` accumulator does.
    pub rotation_lambda: f64,
    pub position_lambda: f64,
}

impl HingeConstraint {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entity_a: EntityId,
        entity_b: EntityId,
        r1_lc: DVec3,
        r2_lc: DVec3,
        axis_a_lc: DVec3,
        swing_b_a_lc: DVec3,
        swing_c_a_lc: DVec3,
        axis_b_lc: DVec3,
        swing_b_b_lc: DVec3,
        swing_c_b_lc: DVec3,
    ) -> HingeConstraint {
        HingeConstraint {
            entity_a,
            entity_b,
            r1_lc,
            r2_lc,
            axis_a_lc,
            swing_b_a_lc,
            swing_c_a_lc,
            axis_b_lc,
            swing_b_b_lc,
            swing_c_b_lc,
            compliance: 0.0,
            limit: None,
            rotation_lambda: 0.0,
            position_lambda: 0.0,
        }
    }

    pub fn with_limit(mut self, theta_min: f64, theta_max: f64) -> HingeConstraint {
        self.limit = Some(HingeLimit { theta_min, theta_max });
        self
    }

    pub fn with_compliance(mut self, compliance: f64) -> HingeConstraint {
        self.compliance = compliance;
        self
    }
}

/// Generated fresh per substep from the current contact manifold, and
/// discarded afterwards — never persists across frames.
#[derive(Clone, Copy, Debug)]
pub struct CollisionConstraint {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub r1_lc: DVec3,
    pub r2_lc: DVec3,
    /// The contact normal, stored in `entity_a`'s local frame at
    /// generation time so it can be re-derived in world space each
    /// positional iteration as the bodies rotate.
    pub normal_lc_on_a: DVec3,
    /// `v1(collision_point) - v2(collision_point)` captured once, before
    /// any solving this outer step, needed by the velocity-level
    /// restitution pass.
    pub pre_contact_velocity: DVec3,
    pub lambda_n: f64,
    pub lambda_t: f64,
}

/// A tagged variant over every constraint kind the solver understands.
/// User constraints (`Positional`, `MutualOrientation`,
/// `Hinge`) are supplied by the scene and outlive a single `World::step`;
/// `Collision` is ephemeral, rebuilt every call.
#[derive(Clone, Copy, Debug)]
pub enum Constraint {
    Positional(PositionalConstraint),
    MutualOrientation(MutualOrientationConstraint),
    Hinge(HingeConstraint),
    Collision(CollisionConstraint),
}

impl Constraint {
    pub fn ids(&self) -> (EntityId, EntityId) {
        match self {
            Constraint::Positional(c) => (c.entity_a, c.entity_b),
            Constraint::MutualOrientation(c) => (c.entity_a, c.entity_b),
            Constraint::Hinge(c) => (c.entity_a, c.entity_b),
            Constraint::Collision(c) => (c.entity_a, c.entity_b),
        }
    }

    /// Resets every accumulator to zero, run at the start of every substep
    /// for both user and collision constraints.
    pub fn reset_lambda(&mut self) {
        match self {
            Constraint::Positional(c) => c.lambda = 0.0,
            Constraint::MutualOrientation(c) => c.lambda = 0.0,
            Constraint::Hinge(c) => {
                c.rotation_lambda = 0.0;
                c.position_lambda = 0.0;
            }
            Constraint::Collision(c) => {
                c.lambda_n = 0.0;
                c.lambda_t = 0.0;
            }
        }
    }
}
