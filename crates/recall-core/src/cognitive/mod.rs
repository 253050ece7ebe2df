//! Memory-modeling core.
//!
//! Ebbinghaus retention, the adaptive strength rule, the Forgettable Topic
//! Index and revision scheduling. Everything here is synchronous and free of
//! persistence; time enters only through explicit `as_of` arguments.

mod forgettability;
mod retention;
mod scheduler;
mod strength;

pub use forgettability::{ForgettabilityScorer, StressSplit, MAX_SIGNAL};
pub use retention::RetentionModel;
pub use scheduler::{CurvePoint, RevisionCheckpoint, RevisionSchedule, RevisionScheduler};
pub use strength::StrengthUpdater;
