//! Rigid-body state and the entity registry.
use glam::{DMat3, DQuat, DVec3};

use crate::collider::Collider;
use crate::math::world_inverse_inertia;

/// Stable, dense, increasing identifier. Never reused within a session,
/// even across [`EntityRegistry::destroy`] calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

/// A force or torque queued for the next [`crate::world::World::step`],
/// cleared after the predictor consumes it. Two variants rather than a
/// `force + is_torque: bool` pair, so a pure torque can never accidentally
/// contribute a translational component.
#[derive(Clone, Copy, Debug)]
pub enum AppliedForce {
    AtPoint { point_world: DVec3, force_world: DVec3 },
    Torque(DVec3),
}

/// One rigid body. Mutated exclusively by the solver during `simulate`
/// (pose, velocity) and by the scene between calls (forces, constraints,
/// direct pose/velocity setters).
#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub world_position: DVec3,
    pub world_rotation: DQuat,
    pub linear_velocity: DVec3,
    pub angular_velocity: DVec3,
    pub inverse_mass: f64,
    pub inverse_inertia_tensor_local: DMat3,
    pub colliders: Vec<Collider>,
    pub static_friction_coefficient: f64,
    pub dynamic_friction_coefficient: f64,
    pub restitution_coefficient: f64,
    pub accumulated_forces: Vec<AppliedForce>,
    pub active: bool,
    pub inactive_frame_count: u32,
    /// Saved at the start of each substep; read back by the velocity
    /// update and by the positional rollback on persistent non-finite
    /// state.
    pub(crate) prev_position: DVec3,
    pub(crate) prev_rotation: DQuat,
}

impl Entity {
    /// A free (movable) body.
    pub fn new(
        id: EntityId,
        world_position: DVec3,
        inverse_mass: f64,
        inverse_inertia_tensor_local: DMat3,
        colliders: Vec<Collider>,
    ) -> Entity {
        Entity {
            id,
            world_position,
            world_rotation: DQuat::IDENTITY,
            linear_velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
            inverse_mass,
            inverse_inertia_tensor_local,
            colliders,
            static_friction_coefficient: 0.5,
            dynamic_friction_coefficient: 0.3,
            restitution_coefficient: 0.0,
            accumulated_forces: Vec::new(),
            active: true,
            inactive_frame_count: 0,
            prev_position: world_position,
            prev_rotation: DQuat::IDENTITY,
        }
    }

    /// A fixed (infinite mass/inertia) body. Always `active`
    /// but the solver never mutates its pose or velocity.
    pub fn new_fixed(id: EntityId, world_position: DVec3, colliders: Vec<Collider>) -> Entity {
        Entity {
            inverse_mass: 0.0,
            inverse_inertia_tensor_local: DMat3::ZERO,
            ..Entity::new(id, world_position, 0.0, DMat3::ZERO, colliders)
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// `R · I_local⁻¹ · R^T` at the entity's current orientation.
    pub fn world_inverse_inertia(&self) -> DMat3 {
        world_inverse_inertia(self.inverse_inertia_tensor_local, self.world_rotation)
    }

    /// `R · I_local · R^T`, recovered by inverting the stored inverse
    /// tensor. `None` for a fixed body (whose inverse tensor is singular) —
    /// the predictor's gyroscopic term is skipped there anyway.
    pub fn world_inertia(&self) -> Option<DMat3> {
        if self.inverse_inertia_tensor_local.determinant().abs() < 1e-18 {
            return None;
        }
        let local = self.inverse_inertia_tensor_local.inverse();
        let r = DMat3::from_quat(self.world_rotation);
        Some(r * local * r.transpose())
    }

    /// Re-activates a sleeping entity.
    pub fn activate(&mut self) {
        self.active = true;
        self.inactive_frame_count = 0;
    }

    /// Refreshes every collider's cached world-space vertices/normals from
    /// the current pose, called once per `World::step`.
    pub fn update_colliders(&mut self) {
        for collider in &mut self.colliders {
            collider.update(self.world_position, self.world_rotation);
        }
    }

    /// Velocity of the material point currently at `point_world`.
    pub fn point_velocity(&self, point_world: DVec3) -> DVec3 {
        let r = point_world - self.world_position;
        self.linear_velocity + self.angular_velocity.cross(r)
    }
}

/// Owns entity lifecycles. A plain struct held by [`crate::world::World`],
/// not a process-wide singleton.
#[derive(Clone, Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    next_id: u64,
}

impl EntityRegistry {
    pub fn new() -> EntityRegistry {
        EntityRegistry {
            entities: Vec::new(),
            next_id: 0,
        }
    }

    fn alloc_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn create(
        &mut self,
        world_position: DVec3,
        inverse_mass: f64,
        inverse_inertia_tensor_local: DMat3,
        colliders: Vec<Collider>,
    ) -> EntityId {
        let id = self.alloc_id();
        self.entities.push(Entity::new(
            id,
            world_position,
            inverse_mass,
            inverse_inertia_tensor_local,
            colliders,
        ));
        id
    }

    pub fn create_fixed(&mut self, world_position: DVec3, colliders: Vec<Collider>) -> EntityId {
        let id = self.alloc_id();
        self.entities.push(Entity::new_fixed(id, world_position, colliders));
        id
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let idx = self.index_of(id)?;
        Some(&mut self.entities[idx])
    }

    /// Simultaneous mutable access to two distinct entities, for a
    /// constraint projection that updates both sides at once — mirrors
    /// the `particles.get_many_mut([..])` idiom the sequential-impulse
    /// solver already uses.
    pub fn get_pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<[&mut Entity; 2]> {
        if a == b {
            return None;
        }
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        self.entities.get_many_mut([ia, ib]).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Destroys `id` if present. Never reuses the freed slot's id; the
    /// caller is responsible for invalidating any constraint referencing
    /// it — the solver also defensively skips unresolvable ids.
    pub fn destroy(&mut self, id: EntityId) {
        if let Some(idx) = self.index_of(id) {
            self.entities.remove(idx);
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_ids_never_reused() {
        let mut registry = EntityRegistry::new();
        let a = registry.create(DVec3::ZERO, 1.0, DMat3::IDENTITY, Vec::new());
        let b = registry.create(DVec3::ZERO, 1.0, DMat3::IDENTITY, Vec::new());
        registry.destroy(a);
        let c = registry.create(DVec3::ZERO, 1.0, DMat3::IDENTITY, Vec::new());
        assert_eq!(a, EntityId(0));
        assert_eq!(b, EntityId(1));
        assert_eq!(c, EntityId(2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn fixed_entity_has_zero_generalized_mass() {
        let mut registry = EntityRegistry::new();
        let id = registry.create_fixed(DVec3::ZERO, Vec::new());
        let e = registry.get(id).unwrap();
        assert!(e.is_fixed());
        assert_eq!(e.inverse_mass, 0.0);
        assert_eq!(e.inverse_inertia_tensor_local, DMat3::ZERO);
    }

    #[test]
    fn get_pair_mut_rejects_identical_ids() {
        let mut registry = EntityRegistry::new();
        let a = registry.create(DVec3::ZERO, 1.0, DMat3::IDENTITY, Vec::new());
        assert!(registry.get_pair_mut(a, a).is_none());
    }

    #[test]
    fn get_pair_mut_gives_both_entities() {
        let mut registry = EntityRegistry::new();
        let a = registry.create(DVec3::ZERO, 1.0, DMat3::IDENTITY, Vec::new());
        let b = registry.create(DVec3::X, 1.0, DMat3::IDENTITY, Vec::new());
        let [ea, eb] = registry.get_pair_mut(a, b).unwrap();
        ea.world_position.y = 5.0;
        eb.world_position.y = 6.0;
        assert_eq!(registry.get(a).unwrap().world_position.y, 5.0);
        assert_eq!(registry.get(b).unwrap().world_position.y, 6.0);
    }
}
