//! A 3D XPBD rigid-body physics engine over convex-hull colliders — spec
//! overview. See [`world::World`] for the entry point.
#![feature(get_many_mut)]

pub mod collider;
pub mod constraint;
pub mod entity;
pub mod error;
pub mod math;
pub mod narrowphase;
pub mod scenarios;
pub mod solver;
pub mod world;

pub use collider::Collider;
pub use constraint::{
    CollisionConstraint, Constraint, HingeConstraint, HingeLimit, MutualOrientationConstraint, PositionalConstraint,
};
pub use entity::{AppliedForce, Entity, EntityId, EntityRegistry};
pub use error::PhysicsError;
pub use world::World;

/// Tunable solver parameters. Every field has a default matching the
/// values exercised throughout the scenarios below.
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    /// Substeps per outer `World::step` call.
    pub n_substeps: usize,
    /// Gauss-Seidel sweeps of the positional solve per substep.
    pub n_pos_iters: usize,
    /// When `false`, `World::step` skips narrow-phase entirely and only
    /// solves user constraints.
    pub enable_collisions: bool,
    /// Below this linear speed (and [`Self::sleep_angular_eps`] angular
    /// speed) for [`Self::sleep_frames`] consecutive frames, an entity is
    /// put to sleep.
    pub sleep_linear_eps: f64,
    pub sleep_angular_eps: f64,
    pub sleep_frames: u32,
    pub gjk_max_iter: usize,
    pub epa_max_iter: usize,
    pub epa_tolerance: f64,
    /// Magnitude of the world's gravitational acceleration, used only by
    /// the restitution deadband (`e = 0` below `2·g·h`).
    /// The actual force applied each step comes from [`world::World::gravity`];
    /// keep the two consistent when overriding gravity.
    pub gravity_magnitude: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            n_substeps: 10,
            n_pos_iters: 1,
            enable_collisions: true,
            sleep_linear_eps: 0.01,
            sleep_angular_eps: 0.01,
            sleep_frames: 60,
            gjk_max_iter: 64,
            epa_max_iter: 64,
            epa_tolerance: 1e-6,
            gravity_magnitude: 10.0,
        }
    }
}
