//! End-to-end scenes exercising the engine against concrete, checkable
//! outcomes.
use crate::World;

pub mod free_fall;
pub mod hinge_limit;
pub mod oblique_impact;
pub mod pendulum;
pub mod spring;
pub mod stacked_contact;

pub use free_fall::*;
pub use hinge_limit::*;
pub use oblique_impact::*;
pub use pendulum::*;
pub use spring::*;
pub use stacked_contact::*;

/// A named, reproducible scene — mirrors the driver's old `Scenario` shape
/// (`name` + `create`), generalized from a 2D `Engine` to a 3D `World`.
pub trait Scenario {
    fn name(&self) -> &str;

    fn create(&self) -> World;
}
