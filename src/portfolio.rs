//! Defines the [`Portfolio`] contract: aggregates positions into P&L/exposure.

use crate::identifiers::Currency;
use crate::position::PositionEvent;

/// Consumed by the Event Dispatcher ahead of strategy routing for every derived
/// [`PositionEvent`], and once per matching [`crate::account::AccountState`] to learn the
/// account's base currency.
pub trait Portfolio: Send {
    fn update(&mut self, event: &PositionEvent);

    fn set_base_currency(&mut self, currency: Currency);
}
