//! Defines the [`Command`]s a [`crate::strategy::Strategy`] issues to the engine.

use crate::identifiers::{ClOrdId, PositionId, Side, StrategyId, Symbol};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single order submission, standalone or as one leg of a [`BracketOrder`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SubmitOrder {
    pub cl_ord_id: ClOrdId,
    pub strategy_id: StrategyId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Decimal,
    /// If supplied and not yet known to the database, the submission is invalidated.
    pub position_id: Option<PositionId>,
}

/// Tags which leg of a [`BracketOrder`] a [`SubmitOrder`] represents, so that an invalidation
/// reason can be derived from the tag rather than duplicated as a literal at each call site.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize, Display)]
pub enum OrderLegRole {
    Entry,
    StopLoss,
    TakeProfit,
}

/// An entry order plus its protective stop-loss and optional take-profit. All three legs share
/// a single validation fate: if any one identifier collides, every leg is invalidated.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BracketOrder {
    pub entry: SubmitOrder,
    pub stop_loss: SubmitOrder,
    pub take_profit: Option<SubmitOrder>,
}

impl BracketOrder {
    /// Iterates every leg present, tagged with its [`OrderLegRole`].
    pub fn legs(&self) -> impl Iterator<Item = (OrderLegRole, &SubmitOrder)> {
        [
            Some((OrderLegRole::Entry, &self.entry)),
            Some((OrderLegRole::StopLoss, &self.stop_loss)),
            self.take_profit
                .as_ref()
                .map(|leg| (OrderLegRole::TakeProfit, leg)),
        ]
        .into_iter()
        .flatten()
    }
}

/// Request to modify a working order's quantity. The venue is authoritative for whether the
/// order is still modifiable; the engine performs no local validation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModifyOrder {
    pub cl_ord_id: ClOrdId,
    pub quantity: Decimal,
}

/// Request to cancel a working order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CancelOrder {
    pub cl_ord_id: ClOrdId,
}

/// Inbound intent from a [`crate::strategy::Strategy`], dispatched by the Command Dispatcher.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum Command {
    AccountInquiry,
    SubmitOrder(SubmitOrder),
    SubmitBracketOrder(BracketOrder),
    ModifyOrder(ModifyOrder),
    CancelOrder(CancelOrder),
}

impl OrderLegRole {
    /// Invalidation reason for the leg that directly collided.
    pub const COLLIDER_REASON: &'static str = "cl_ord_id already exists";

    /// Invalidation reason for the other two legs, derived from which role collided: an entry
    /// collision orphans its stop-loss/take-profit children, while either protective leg
    /// colliding invalidates its one-cancels-other sibling.
    pub fn sibling_reason(self) -> &'static str {
        match self {
            OrderLegRole::Entry => "parent cl_ord_id already exists",
            OrderLegRole::StopLoss | OrderLegRole::TakeProfit => "OCO cl_ord_id already exists",
        }
    }
}
