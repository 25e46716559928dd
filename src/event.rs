//! Defines the [`Event`]s the Event Dispatcher classifies and routes.

use crate::account::AccountState;
use crate::identifiers::{ClOrdId, OrderId, PositionId, StrategyId};
use crate::position::PositionEvent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A fill reported against a [`ClOrdId`]. Carries the executed `quantity` and, if the venue
/// supplies one, the [`PositionId`] it should be correlated against.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Fill {
    pub quantity: Decimal,
    pub position_id: Option<PositionId>,
}

/// The non-terminal-at-submission-time kinds of [`OrderEvent`], all of which require the order
/// to already be persisted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum OrderEventKind {
    Submitted,
    Accepted { venue_order_id: OrderId },
    Working,
    Filled(Fill),
    Cancelled,
    Expired,
    Rejected { reason: String },
    /// Venue denied an already-accepted order, eg/ a post-trade risk check failure.
    Denied { reason: String },
    /// Venue invalidated an already-accepted order, eg/ the instrument was delisted mid-session.
    Invalid { reason: String },
}

/// A venue-originated event applying to an order already persisted in the database.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrderEvent {
    pub cl_ord_id: ClOrdId,
    pub kind: OrderEventKind,
}

/// Everything the Event Dispatcher accepts via `process()`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum Event {
    /// Emitted by the Command Dispatcher's pre-trade checks for an order that was never
    /// persisted; carries enough context to reach the strategy without a database lookup.
    OrderInvalid {
        cl_ord_id: ClOrdId,
        strategy_id: StrategyId,
        reason: String,
    },
    /// Venue rejected a cancel/modify request. Routed directly by `cl_ord_id`.
    OrderCancelReject { cl_ord_id: ClOrdId, reason: String },
    OrderEvent(OrderEvent),
    PositionEvent(PositionEvent),
    AccountState(AccountState),
}
