use serde::{Deserialize, Serialize};

/// Order management system regime an `Engine` operates under.
///
/// `UNDEFINED` has no representation here - it is rejected at construction by requiring callers
/// to pick a variant (see [`crate::engine::EngineBuildError`]).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum OmsType {
    /// Fills for the same symbol/strategy collapse into one net [`crate::position::Position`].
    Netting,
    /// Each fill without an existing position identifier opens a distinct
    /// [`crate::position::Position`].
    Hedging,
}
