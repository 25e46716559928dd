//! Defines the [`ExecutionClient`] contract: the outbound adapter that talks to a venue.

use crate::command::{BracketOrder, CancelOrder, ModifyOrder, SubmitOrder};

/// The venue-facing boundary. Calls are fire-and-forget from the engine's perspective; results
/// return asynchronously as [`crate::event::Event`]s via `process()`.
pub trait ExecutionClient: Send + Sync {
    fn account_inquiry(&self);

    fn submit_order(&self, command: &SubmitOrder);

    fn submit_bracket_order(&self, command: &BracketOrder);

    fn modify_order(&self, command: &ModifyOrder);

    fn cancel_order(&self, command: &CancelOrder);
}
