//! Error taxonomy.
//!
//! Only [`PhysicsError::InvalidGeometry`] is ever returned from a public
//! call. `InvalidConstraint`, `SolverDegeneracy`, `GjkNoConvergence` and
//! `EpaNoConvergence` are internal, recoverable-in-place conditions: the
//! solver logs a `tracing::warn!` and skips the offending projection or
//! treats the pair as "no contact" for that frame, rather than surfacing
//! an `Err`. They're kept here as an enum anyway so the log messages stay
//! centralized and the taxonomy is discoverable from one place.
use thiserror::Error;

/// Structural error returned at collider ingest time. Never produced
/// during [`crate::world::World::step`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("invalid collider geometry: {0}")]
    InvalidGeometry(String),
}

/// Internal, non-fatal conditions logged during a solve. These never leave
/// the crate as `Err` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SolveWarning {
    InvalidConstraint,
    SolverDegeneracy,
    GjkNoConvergence,
    EpaNoConvergence,
}

impl SolveWarning {
    pub(crate) fn log(self, context: &str) {
        match self {
            SolveWarning::InvalidConstraint => {
                tracing::warn!(%context, "constraint references an entity that no longer exists; skipping")
            }
            SolveWarning::SolverDegeneracy => {
                tracing::warn!(%context, "degenerate projection (zero generalized inverse mass or non-finite state); skipping iteration")
            }
            SolveWarning::GjkNoConvergence => {
                tracing::warn!(%context, "GJK hit its iteration cap; treating pair as not touching this frame")
            }
            SolveWarning::EpaNoConvergence => {
                tracing::warn!(%context, "EPA hit its iteration cap; treating pair as not touching this frame")
            }
        }
    }
}
