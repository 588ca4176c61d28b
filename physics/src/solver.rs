//! The XPBD solver, the centerpiece of this crate.
//!
//! [`simulate`] runs one outer step: a single narrow-phase pass, then
//! `n_substeps` rounds of predict / reset / positional solve / velocity
//! update / velocity-level solve, finishing with the sleeping heuristic.
use glam::{DMat3, DQuat, DVec3};
use tracing::{instrument, trace, trace_span, warn};

use crate::constraint::{CollisionConstraint, Constraint, HingeConstraint, MutualOrientationConstraint, PositionalConstraint};
use crate::entity::{Entity, EntityId, EntityRegistry, AppliedForce};
use crate::error::SolveWarning;
use crate::math::{quat_integrate, safe_normalize};
use crate::narrowphase;
use crate::SolverConfig;

/// Relative approach speed, in multiples of `sleep_linear_eps`, above which
/// a freshly-detected contact wakes a sleeping entity.
const WAKE_SPEED_FACTOR: f64 = 4.0;

/// An entity the solver is free to move: not fixed, and not asleep.
/// Sleeping entities are treated as kinematic at rest — every projection
/// below contributes zero generalized inverse mass for them and skips
/// applying any correction.
fn movable(e: &Entity) -> bool {
    !e.is_fixed() && e.active
}

/// Runs one outer simulation step of `dt` seconds.
/// `user_constraints` persist across calls; their Lagrange accumulators
/// are reset here every substep. Collision constraints are generated once
/// per call and discarded at the end of it.
#[instrument(level = "trace", skip_all)]
pub fn simulate(entities: &mut EntityRegistry, user_constraints: &mut [Constraint], config: &SolverConfig, dt: f64) {
    if dt <= 0.0 {
        return;
    }

    let mut collisions = if config.enable_collisions {
        generate_collision_constraints(entities, config)
    } else {
        Vec::new()
    };
    trace!(count = collisions.len(), "generated collision constraints");

    let n_substeps = config.n_substeps.max(1);
    let h = dt / n_substeps as f64;

    for substep in 0..n_substeps {
        let span = trace_span!("substep", substep);
        let _enter = span.enter();

        predict(entities, h);

        for c in user_constraints.iter_mut() {
            c.reset_lambda();
        }
        for c in &mut collisions {
            c.lambda_n = 0.0;
            c.lambda_t = 0.0;
        }

        for _ in 0..config.n_pos_iters.max(1) {
            for c in user_constraints.iter_mut() {
                solve_positional_user_constraint(entities, c, h);
            }
            for c in &mut collisions {
                solve_collision_positional(entities, c, h);
            }
        }

        update_velocities(entities, h);
        solve_collision_velocities(entities, &mut collisions, config, h);
    }

    update_sleeping(entities, config);
}

#[instrument(level = "trace", skip_all)]
fn generate_collision_constraints(entities: &mut EntityRegistry, config: &SolverConfig) -> Vec<CollisionConstraint> {
    for e in entities.iter_mut() {
        e.update_colliders();
    }

    let ids: Vec<EntityId> = entities.iter().map(|e| e.id).collect();
    let mut out = Vec::new();

    struct Snapshot {
        fixed: bool,
        active: bool,
        pos: DVec3,
        rot: DQuat,
    }

    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            let id_a = ids[i];
            let id_b = ids[j];

            let (snap_a, snap_b, contacts) = {
                let a = entities.get(id_a).unwrap();
                let b = entities.get(id_b).unwrap();
                if (a.is_fixed() && b.is_fixed()) || a.colliders.is_empty() || b.colliders.is_empty() {
                    continue;
                }
                let contacts = narrowphase::colliders_get_contacts(
                    &a.colliders,
                    &b.colliders,
                    config.gjk_max_iter,
                    config.epa_max_iter,
                    config.epa_tolerance,
                );
                let snap_a = Snapshot { fixed: a.is_fixed(), active: a.active, pos: a.world_position, rot: a.world_rotation };
                let snap_b = Snapshot { fixed: b.is_fixed(), active: b.active, pos: b.world_position, rot: b.world_rotation };
                (snap_a, snap_b, contacts)
            };

            if contacts.is_empty() {
                continue;
            }

            let r_a = DMat3::from_quat(snap_a.rot).transpose();
            let r_b = DMat3::from_quat(snap_b.rot).transpose();
            let mut wake_worthy = false;

            for contact in &contacts {
                let point_vel_a = entities.get(id_a).unwrap().point_velocity(contact.point_on_a_world);
                let point_vel_b = entities.get(id_b).unwrap().point_velocity(contact.point_on_b_world);
                let pre_contact_velocity = point_vel_a - point_vel_b;

                if pre_contact_velocity.length() > config.sleep_linear_eps * WAKE_SPEED_FACTOR {
                    wake_worthy = true;
                }

                out.push(CollisionConstraint {
                    entity_a: id_a,
                    entity_b: id_b,
                    r1_lc: r_a * (contact.point_on_a_world - snap_a.pos),
                    r2_lc: r_b * (contact.point_on_b_world - snap_b.pos),
                    normal_lc_on_a: r_a * contact.normal_world,
                    pre_contact_velocity,
                    lambda_n: 0.0,
                    lambda_t: 0.0,
                });
            }

            if wake_worthy {
                if !snap_a.fixed && !snap_a.active {
                    entities.get_mut(id_a).unwrap().activate();
                }
                if !snap_b.fixed && !snap_b.active {
                    entities.get_mut(id_b).unwrap().activate();
                }
            }
        }
    }

    out
}

/// Saves the scratch pose, integrates forces into velocity, then velocity
/// into position; same shape for angular quantities, including the
/// gyroscopic term.
fn predict(entities: &mut EntityRegistry, h: f64) {
    for e in entities.iter_mut() {
        if !movable(e) {
            continue;
        }
        e.prev_position = e.world_position;
        e.prev_rotation = e.world_rotation;

        let mut force_total = DVec3::ZERO;
        let mut torque_total = DVec3::ZERO;
        for force in &e.accumulated_forces {
            match *force {
                AppliedForce::AtPoint { point_world, force_world } => {
                    force_total += force_world;
                    torque_total += (point_world - e.world_position).cross(force_world);
                }
                AppliedForce::Torque(t) => torque_total += t,
            }
        }

        e.linear_velocity += h * e.inverse_mass * force_total;
        e.world_position += h * e.linear_velocity;

        let inv_inertia_world = e.world_inverse_inertia();
        let gyroscopic = match e.world_inertia() {
            Some(inertia_world) => e.angular_velocity.cross(inertia_world * e.angular_velocity),
            None => DVec3::ZERO,
        };
        e.angular_velocity += h * (inv_inertia_world * (torque_total - gyroscopic));
        e.world_rotation = quat_integrate(e.world_rotation, h * e.angular_velocity);

        if !e.world_position.is_finite() || !e.angular_velocity.is_finite() || !e.world_rotation.is_finite() {
            SolveWarning::SolverDegeneracy.log("predictor produced non-finite state; rolling back and deactivating");
            e.world_position = e.prev_position;
            e.world_rotation = e.prev_rotation;
            e.linear_velocity = DVec3::ZERO;
            e.angular_velocity = DVec3::ZERO;
            e.active = false;
        }
    }
}

/// Re-derives velocities from the position delta over the substep instead
/// of carrying the predictor's estimate forward.
fn update_velocities(entities: &mut EntityRegistry, h: f64) {
    for e in entities.iter_mut() {
        if !movable(e) {
            continue;
        }
        e.linear_velocity = (e.world_position - e.prev_position) / h;
        let delta_q = e.world_rotation * e.prev_rotation.inverse();
        let mut omega = 2.0 * DVec3::new(delta_q.x, delta_q.y, delta_q.z) / h;
        if delta_q.w < 0.0 {
            omega = -omega;
        }
        e.angular_velocity = omega;
    }
}

fn generalized_inverse_mass_positional(e: &Entity, r_world: DVec3, n: DVec3) -> f64 {
    if !movable(e) {
        return 0.0;
    }
    let rn = r_world.cross(n);
    e.inverse_mass + rn.dot(e.world_inverse_inertia() * rn)
}

fn generalized_inverse_mass_angular(e: &Entity, n: DVec3) -> f64 {
    if !movable(e) {
        return 0.0;
    }
    n.dot(e.world_inverse_inertia() * n)
}

fn apply_positional_correction(e: &mut Entity, r_world: DVec3, n: DVec3, delta_lambda: f64, sign: f64) {
    if !movable(e) {
        return;
    }
    let impulse = sign * delta_lambda * n;
    e.world_position += e.inverse_mass * impulse;
    let angular_impulse = r_world.cross(impulse);
    let rot_vec = e.world_inverse_inertia() * angular_impulse;
    e.world_rotation = quat_integrate(e.world_rotation, rot_vec);
}

fn apply_angular_correction(e: &mut Entity, n: DVec3, delta_lambda: f64, sign: f64) {
    if !movable(e) {
        return;
    }
    let rot_vec = e.world_inverse_inertia() * (sign * delta_lambda * n);
    e.world_rotation = quat_integrate(e.world_rotation, rot_vec);
}

fn apply_velocity_impulse(e: &mut Entity, r_world: DVec3, n: DVec3, impulse_mag: f64, sign: f64) {
    if !movable(e) {
        return;
    }
    let impulse = sign * impulse_mag * n;
    e.linear_velocity += e.inverse_mass * impulse;
    let angular_impulse = r_world.cross(impulse);
    e.angular_velocity += e.world_inverse_inertia() * angular_impulse;
}

/// The generic projection: given the two arms, a unit direction and a
/// scalar constraint value, accumulates `lambda` and
/// applies the correction to both bodies. Returns the substep's
/// `delta_lambda`, used by collision friction thresholding.
fn project_point_pair(
    ea: &mut Entity,
    eb: &mut Entity,
    r1_world: DVec3,
    r2_world: DVec3,
    n: DVec3,
    c_value: f64,
    compliance: f64,
    lambda: &mut f64,
    h: f64,
) -> Option<f64> {
    let w = generalized_inverse_mass_positional(ea, r1_world, n) + generalized_inverse_mass_positional(eb, r2_world, n);
    if w <= 1e-12 {
        SolveWarning::SolverDegeneracy.log("zero generalized inverse mass in positional projection");
        return None;
    }
    let alpha_tilde = compliance / (h * h);
    let delta_lambda = (-c_value - alpha_tilde * *lambda) / (w + alpha_tilde);
    *lambda += delta_lambda;
    apply_positional_correction(ea, r1_world, n, delta_lambda, 1.0);
    apply_positional_correction(eb, r2_world, n, delta_lambda, -1.0);
    Some(delta_lambda)
}

fn project_angular_pair(
    ea: &mut Entity,
    eb: &mut Entity,
    n: DVec3,
    c_value: f64,
    compliance: f64,
    lambda: &mut f64,
    h: f64,
) -> Option<f64> {
    let w = generalized_inverse_mass_angular(ea, n) + generalized_inverse_mass_angular(eb, n);
    if w <= 1e-12 {
        SolveWarning::SolverDegeneracy.log("zero generalized inverse mass in angular projection");
        return None;
    }
    let alpha_tilde = compliance / (h * h);
    let delta_lambda = (-c_value - alpha_tilde * *lambda) / (w + alpha_tilde);
    *lambda += delta_lambda;
    apply_angular_correction(ea, n, delta_lambda, 1.0);
    apply_angular_correction(eb, n, delta_lambda, -1.0);
    Some(delta_lambda)
}

fn solve_positional_user_constraint(entities: &mut EntityRegistry, c: &mut Constraint, h: f64) {
    match c {
        Constraint::Positional(pc) => solve_positional(entities, pc, h),
        Constraint::MutualOrientation(mc) => solve_mutual_orientation(entities, mc, h),
        Constraint::Hinge(hc) => solve_hinge(entities, hc, h),
        Constraint::Collision(_) => {}
    }
}

/// Solves a positional (ball-joint-style) constraint.
fn solve_positional(entities: &mut EntityRegistry, c: &mut PositionalConstraint, h: f64) {
    let Some([ea, eb]) = entities.get_pair_mut(c.entity_a, c.entity_b) else {
        SolveWarning::InvalidConstraint.log("positional constraint references a missing entity");
        return;
    };
    let r1_world = ea.world_rotation * c.r1_lc;
    let r2_world = eb.world_rotation * c.r2_lc;
    let p1 = ea.world_position + r1_world;
    let p2 = eb.world_position + r2_world;
    let d_world = ea.world_rotation * c.distance_local;
    let delta = p1 - p2 - d_world;
    let Some(n) = safe_normalize(delta) else { return };
    let magnitude = delta.length();
    project_point_pair(ea, eb, r1_world, r2_world, n, magnitude, c.compliance, &mut c.lambda, h);
}

/// Solves a mutual-orientation constraint.
fn solve_mutual_orientation(entities: &mut EntityRegistry, c: &mut MutualOrientationConstraint, h: f64) {
    let Some([ea, eb]) = entities.get_pair_mut(c.entity_a, c.entity_b) else {
        SolveWarning::InvalidConstraint.log("mutual orientation constraint references a missing entity");
        return;
    };
    let delta_q = ea.world_rotation * eb.world_rotation.inverse();
    let mut xyz = DVec3::new(delta_q.x, delta_q.y, delta_q.z);
    if delta_q.w < 0.0 {
        xyz = -xyz;
    }
    let Some(n) = safe_normalize(xyz) else { return };
    let c_value = 2.0 * xyz.length();
    project_angular_pair(ea, eb, n, c_value, c.compliance, &mut c.lambda, h);
}

fn project_onto_plane(v: DVec3, plane_normal: DVec3) -> DVec3 {
    v - plane_normal * v.dot(plane_normal)
}

/// Solves a hinge joint: axis alignment, then the optional swing limit,
/// then the positional attachment — applied in that order each substep.
fn solve_hinge(entities: &mut EntityRegistry, c: &mut HingeConstraint, h: f64) {
    {
        let Some([ea, eb]) = entities.get_pair_mut(c.entity_a, c.entity_b) else {
            SolveWarning::InvalidConstraint.log("hinge constraint references a missing entity");
            return;
        };
        let axis_a = ea.world_rotation * c.axis_a_lc;
        let axis_b = eb.world_rotation * c.axis_b_lc;
        let cross = axis_a.cross(axis_b);
        if let Some(n) = safe_normalize(cross) {
            project_angular_pair(ea, eb, n, cross.length(), c.compliance, &mut c.rotation_lambda, h);
        }
    }

    if let Some(limit) = c.limit {
        let Some([ea, eb]) = entities.get_pair_mut(c.entity_a, c.entity_b) else {
            return;
        };
        let axis_world = ea.world_rotation * c.axis_a_lc;
        // Swing angle between the two bodies' in-plane reference frames,
        // read off both bodies' stored (b, c) pairs symmetrically rather
        // than a single cross product, grounded on the original `pbd.h`'s
        // `e1_b`/`e1_c`/`e2_b`/`e2_c` fields.
        if let Some(axis_hat) = safe_normalize(axis_world) {
            let b1 = ea.world_rotation * c.swing_b_a_lc;
            let c1 = ea.world_rotation * c.swing_c_a_lc;
            let b2 = eb.world_rotation * c.swing_b_b_lc;
            let c2 = eb.world_rotation * c.swing_c_b_lc;
            let cos_theta = b1.dot(b2) + c1.dot(c2);
            let sin_theta = c1.dot(b2) - b1.dot(c2);
            let theta = sin_theta.atan2(cos_theta);
            let violation = if theta > limit.theta_max {
                theta - limit.theta_max
            } else if theta < limit.theta_min {
                theta - limit.theta_min
            } else {
                0.0
            };
            if violation.abs() > 1e-9 {
                project_angular_pair(ea, eb, axis_hat, violation, 0.0, &mut c.rotation_lambda, h);
            }
        }
    }

    {
        let Some([ea, eb]) = entities.get_pair_mut(c.entity_a, c.entity_b) else {
            return;
        };
        let r1_world = ea.world_rotation * c.r1_lc;
        let r2_world = eb.world_rotation * c.r2_lc;
        let delta = (ea.world_position + r1_world) - (eb.world_position + r2_world);
        if let Some(n) = safe_normalize(delta) {
            project_point_pair(ea, eb, r1_world, r2_world, n, delta.length(), c.compliance, &mut c.position_lambda, h);
        }
    }
}

/// Positional push-out plus position-level static friction.
fn solve_collision_positional(entities: &mut EntityRegistry, c: &mut CollisionConstraint, h: f64) {
    let Some([ea, eb]) = entities.get_pair_mut(c.entity_a, c.entity_b) else {
        SolveWarning::InvalidConstraint.log("collision constraint references a missing entity");
        return;
    };
    let r1_world = ea.world_rotation * c.r1_lc;
    let r2_world = eb.world_rotation * c.r2_lc;
    let Some(n) = safe_normalize(ea.world_rotation * c.normal_lc_on_a) else {
        SolveWarning::SolverDegeneracy.log("zero-length collision normal");
        return;
    };
    let d = ((ea.world_position + r1_world) - (eb.world_position + r2_world)).dot(n);
    if d <= 0.0 {
        return;
    }

    project_point_pair(ea, eb, r1_world, r2_world, n, d, 0.0, &mut c.lambda_n, h);

    let r1_world = ea.world_rotation * c.r1_lc;
    let r2_world = eb.world_rotation * c.r2_lc;
    let p1_prev = ea.prev_position + ea.prev_rotation * c.r1_lc;
    let p2_prev = eb.prev_position + eb.prev_rotation * c.r2_lc;
    let p1_now = ea.world_position + r1_world;
    let p2_now = eb.world_position + r2_world;
    let delta_p = (p1_now - p1_prev) - (p2_now - p2_prev);
    let delta_p_t = project_onto_plane(delta_p, n);
    let mag_t = delta_p_t.length();
    let mu_s = ea.static_friction_coefficient.min(eb.static_friction_coefficient);
    if mag_t > 1e-9 && mag_t < mu_s * d {
        if let Some(t_hat) = safe_normalize(delta_p_t) {
            project_point_pair(ea, eb, r1_world, r2_world, t_hat, mag_t, 0.0, &mut c.lambda_t, h);
        }
    }
}

/// Velocity-level restitution and dynamic friction.
fn solve_collision_velocities(entities: &mut EntityRegistry, collisions: &mut [CollisionConstraint], config: &SolverConfig, h: f64) {
    for c in collisions {
        let Some([ea, eb]) = entities.get_pair_mut(c.entity_a, c.entity_b) else {
            SolveWarning::InvalidConstraint.log("collision constraint references a missing entity (velocity pass)");
            continue;
        };
        if !movable(ea) && !movable(eb) {
            continue;
        }
        let r1_world = ea.world_rotation * c.r1_lc;
        let r2_world = eb.world_rotation * c.r2_lc;
        let Some(n) = safe_normalize(ea.world_rotation * c.normal_lc_on_a) else {
            continue;
        };

        let v = ea.linear_velocity + ea.angular_velocity.cross(r1_world) - (eb.linear_velocity + eb.angular_velocity.cross(r2_world));
        let v_n = v.dot(n);
        let v_t = project_onto_plane(v, n);

        let v_n_pre = c.pre_contact_velocity.dot(n);
        let restitution = ea.restitution_coefficient.min(eb.restitution_coefficient);
        let e = if v_n_pre.abs() < 2.0 * config.gravity_magnitude * h { 0.0 } else { restitution };
        let v_n_target = -e * v_n_pre;

        let w_n = generalized_inverse_mass_positional(ea, r1_world, n) + generalized_inverse_mass_positional(eb, r2_world, n);
        if w_n > 1e-12 {
            let impulse_n = (v_n_target - v_n) / w_n;
            apply_velocity_impulse(ea, r1_world, n, impulse_n, 1.0);
            apply_velocity_impulse(eb, r2_world, n, impulse_n, -1.0);
        } else {
            warn!("zero generalized inverse mass in velocity-level restitution pass");
        }

        let v_t_mag = v_t.length();
        if v_t_mag > 1e-9 {
            let mu_d = ea.dynamic_friction_coefficient.min(eb.dynamic_friction_coefficient);
            let factor = (mu_d * c.lambda_n.abs() / (h * v_t_mag)).min(1.0);
            if let Some(t_hat) = safe_normalize(v_t) {
                let w_t = generalized_inverse_mass_positional(ea, r1_world, t_hat) + generalized_inverse_mass_positional(eb, r2_world, t_hat);
                if w_t > 1e-12 {
                    let impulse_t = -factor * v_t_mag / w_t;
                    apply_velocity_impulse(ea, r1_world, t_hat, impulse_t, 1.0);
                    apply_velocity_impulse(eb, r2_world, t_hat, impulse_t, -1.0);
                }
            }
        }
    }
}

/// Inactive entities skip predictor, velocity update and the
/// velocity-level solve entirely (handled by [`movable`] upstream).
fn update_sleeping(entities: &mut EntityRegistry, config: &SolverConfig) {
    for e in entities.iter_mut() {
        if e.is_fixed() || !e.active {
            continue;
        }
        if e.linear_velocity.length() < config.sleep_linear_eps && e.angular_velocity.length() < config.sleep_angular_eps {
            e.inactive_frame_count += 1;
            if e.inactive_frame_count >= config.sleep_frames {
                e.active = false;
                e.linear_velocity = DVec3::ZERO;
                e.angular_velocity = DVec3::ZERO;
            }
        } else {
            e.inactive_frame_count = 0;
        }
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

    fn cube_inertia(mass: f64, half_extent: f64) -> DMat3 {
        // Solid cube inertia about its center: I = m/6 * s^2 per axis (s = side length).
        let side = half_extent * 2.0;
        let i = mass / 6.0 * side * side;
        DMat3::from_diagonal(DVec3::splat(1.0 / i))
    }

    #[test]
    fn free_fall_matches_projectile_motion() {
        let mut entities = EntityRegistry::new();
        let id = entities.create(DVec3::new(0.0, 10.0, 0.0), 1.0, cube_inertia(1.0, 0.5), vec![cube_collider()]);
        let config = SolverConfig { enable_collisions: false, ..SolverConfig::default() };
        let gravity = DVec3::new(0.0, -10.0, 0.0);

        let mut constraints: Vec<Constraint> = Vec::new();
        let dt = 1.0 / 60.0;
        for _ in 0..60 {
            {
                let e = entities.get_mut(id).unwrap();
                e.accumulated_forces.push(AppliedForce::AtPoint { point_world: e.world_position, force_world: gravity * (1.0 / e.inverse_mass) });
            }
            simulate(&mut entities, &mut constraints, &config, dt);
            entities.get_mut(id).unwrap().accumulated_forces.clear();
        }

        let e = entities.get(id).unwrap();
        // Analytic: y = 10 - 0.5*g*t^2 over 1s with g=10 -> y = 5.0 (semi-implicit Euler drifts a little).
        assert!((e.world_position.y - 5.0).abs() < 0.5, "y was {}", e.world_position.y);
    }

    #[test]
    fn fixed_entity_never_moves() {
        let mut entities = EntityRegistry::new();
        let id = entities.create_fixed(DVec3::new(1.0, 2.0, 3.0), vec![cube_collider()]);
        let config = SolverConfig::default();
        let mut constraints: Vec<Constraint> = Vec::new();
        simulate(&mut entities, &mut constraints, &config, 1.0 / 60.0);
        let e = entities.get(id).unwrap();
        assert_eq!(e.world_position, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(e.world_rotation, DQuat::IDENTITY);
    }

    #[test]
    fn positional_constraint_converges_under_zero_compliance() {
        let mut entities = EntityRegistry::new();
        let fixed = entities.create_fixed(DVec3::ZERO, Vec::new());
        let free = entities.create(DVec3::new(5.0, 0.0, 0.0), 1.0, cube_inertia(1.0, 0.5), Vec::new());

        let mut constraints = vec![Constraint::Positional(PositionalConstraint::new(fixed, free, DVec3::ZERO, DVec3::ZERO))];
        let config = SolverConfig { enable_collisions: false, n_substeps: 1, n_pos_iters: 20, ..SolverConfig::default() };
        simulate(&mut entities, &mut constraints, &config, 1.0 / 60.0);

        let e = entities.get(free).unwrap();
        assert!(e.world_position.length() < 1e-3, "distance was {}", e.world_position.length());
    }

    #[test]
    fn rotation_stays_unit_norm() {
        let mut entities = EntityRegistry::new();
        let id = entities.create(DVec3::ZERO, 1.0, cube_inertia(1.0, 0.5), Vec::new());
        entities.get_mut(id).unwrap().angular_velocity = DVec3::new(3.0, -2.0, 1.0);
        let config = SolverConfig { enable_collisions: false, ..SolverConfig::default() };
        let mut constraints: Vec<Constraint> = Vec::new();
        for _ in 0..120 {
            simulate(&mut entities, &mut constraints, &config, 1.0 / 60.0);
        }
        let e = entities.get(id).unwrap();
        assert!((e.world_rotation.length() - 1.0).abs() < 1e-9);
    }
}
