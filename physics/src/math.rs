//! Double-precision math kernel, built directly on `glam`'s `f64` types.
//!
//! The engine never defines its own vector/matrix/quaternion types; `glam`
//! already provides `DVec3`, `DMat3` and `DQuat`. This module only adds a
//! handful of domain helpers that don't already have a direct `glam`
//! equivalent: degree-based axis-angle construction, rotated basis
//! vector extraction, and the skew-symmetric cross-product matrix used by
//! the solver's generalized inverse mass.

use glam::{DMat3, DQuat, DVec3};

/// Builds a unit quaternion rotating by `degrees` about `axis` (right-handed).
///
/// `axis` need not be normalized; a near-zero axis returns the identity
/// rotation rather than producing NaNs.
pub fn quat_from_axis_angle_degrees(axis: DVec3, degrees: f64) -> DQuat {
    match safe_normalize(axis) {
        Some(axis) => DQuat::from_axis_angle(axis, degrees.to_radians()),
        None => DQuat::IDENTITY,
    }
}

/// The rotated local +X axis.
pub fn quat_right(q: DQuat) -> DVec3 {
    q * DVec3::X
}

/// The rotated local +Y axis.
pub fn quat_up(q: DQuat) -> DVec3 {
    q * DVec3::Y
}

/// The rotated local +Z axis ("forward" in the original source's convention).
pub fn quat_forward(q: DQuat) -> DVec3 {
    q * DVec3::Z
}

/// Normalizes `v`, returning `None` for a zero-length (or otherwise
/// non-finite) vector instead of propagating NaN into the solver.
pub fn safe_normalize(v: DVec3) -> Option<DVec3> {
    let len = v.length();
    if len > 1e-12 && len.is_finite() {
        Some(v / len)
    } else {
        None
    }
}

/// Normalizes `q`, returning `None` when its norm is degenerate.
pub fn safe_normalize_quat(q: DQuat) -> Option<DQuat> {
    let len = q.length();
    if len > 1e-12 && len.is_finite() {
        Some(q / len)
    } else {
        None
    }
}

/// The skew-symmetric matrix `[v]_x` such that `[v]_x * w == v.cross(w)`.
pub fn skew(v: DVec3) -> DMat3 {
    DMat3::from_cols_array(&[
        0.0, v.z, -v.y, //
        -v.z, 0.0, v.x, //
        v.y, -v.x, 0.0,
    ])
}

/// World-space inverse inertia tensor `R * I_local^-1 * R^T` at the body's
/// current orientation.
pub fn world_inverse_inertia(inv_inertia_local: DMat3, rotation: DQuat) -> DMat3 {
    let r = DMat3::from_quat(rotation);
    r * inv_inertia_local * r.transpose()
}

/// Integrates `q` by the angular increment `half_vec`, following XPBD's
/// `q += 0.5 * (w, 0) ⊗ q` update (the predictor and the constraint
/// rotation corrections share this exact form; callers pre-scale
/// `half_vec` by `h` or by a Lagrange-multiplier impulse as appropriate).
/// Renormalizes
/// afterwards; falls back to `q` unchanged on a degenerate result.
pub fn quat_integrate(q: DQuat, half_vec: DVec3) -> DQuat {
    let p = DQuat::from_xyzw(half_vec.x, half_vec.y, half_vec.z, 0.0);
    let pq = p * q;
    let summed = DQuat::from_xyzw(q.x + 0.5 * pq.x, q.y + 0.5 * pq.y, q.z + 0.5 * pq.z, q.w + 0.5 * pq.w);
    safe_normalize_quat(summed).unwrap_or(q)
}
