//! The owning scene value: no process-wide state, a `World` is passed
//! explicitly and holds everything `simulate` touches.
use glam::DVec3;
use tracing::instrument;

use crate::constraint::Constraint;
use crate::entity::{AppliedForce, EntityRegistry};
use crate::solver;
use crate::SolverConfig;

/// Entities, user constraints, solver tuning and gravity, all in one place.
#[derive(Clone, Debug)]
pub struct World {
    pub entities: EntityRegistry,
    pub constraints: Vec<Constraint>,
    pub config: SolverConfig,
    pub gravity: DVec3,
}

impl Default for World {
    fn default() -> Self {
        World {
            entities: EntityRegistry::new(),
            constraints: Vec::new(),
            config: SolverConfig::default(),
            gravity: DVec3::new(0.0, -10.0, 0.0),
        }
    }
}

impl World {
    pub fn new() -> World {
        World::default()
    }

    /// Advances the scene by `dt` seconds: accumulates gravity alongside
    /// whatever forces the driver already queued, hands everything to
    /// [`solver::simulate`], then clears the per-step force accumulators.
    #[instrument(level = "trace", skip(self))]
    pub fn step(&mut self, dt: f64) {
        for e in self.entities.iter_mut() {
            if e.is_fixed() || !e.active {
                continue;
            }
            let weight = self.gravity * (1.0 / e.inverse_mass);
            e.accumulated_forces.push(AppliedForce::AtPoint {
                point_world: e.world_position,
                force_world: weight,
            });
        }

        solver::simulate(&mut self.entities, &mut self.constraints, &self.config, dt);

        for e in self.entities.iter_mut() {
            e.accumulated_forces.clear();
        }
    }

    /// Snapshot of every entity's pose. Just iterates the registry in
    /// place.
    pub fn get_all(&self) -> impl Iterator<Item = &crate::entity::Entity> {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::{primitives, Collider};
    use glam::DMat3;

    fn cube_collider() -> Collider {
        let (positions, faces, normals) = primitives::cuboid(DVec3::splat(0.5));
        Collider::from_mesh(&positions, &faces, &normals).unwrap()
    }

    #[test]
    fn gravity_pulls_free_body_down() {
        let mut world = World::new();
        world.entities.create(DVec3::new(0.0, 5.0, 0.0), 1.0, DMat3::IDENTITY, vec![cube_collider()]);
        let before = world.entities.iter().next().unwrap().world_position.y;
        world.step(1.0 / 60.0);
        let after = world.entities.iter().next().unwrap().world_position.y;
        assert!(after < before);
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut world = World::new();
        let id = world.entities.create(DVec3::new(1.0, 2.0, 3.0), 1.0, DMat3::IDENTITY, vec![cube_collider()]);
        world.step(0.0);
        let e = world.entities.get(id).unwrap();
        assert_eq!(e.world_position, DVec3::new(1.0, 2.0, 3.0));
    }
}
