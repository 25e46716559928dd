//! Defines the [`Position`] aggregate derived from correlated fills.

use crate::identifiers::{PositionId, Side, StrategyId, Symbol};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Directional sign of a [`Position`]'s net quantity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize, Display)]
pub enum Direction {
    Long,
    Short,
    Flat,
}

/// A held position, owned by exactly one strategy for its lifetime. Derived from one opening
/// fill; subsequent fills for the same [`PositionId`] mutate it in place.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub position_id: PositionId,
    pub strategy_id: StrategyId,
    pub symbol: Symbol,
    signed_quantity: Decimal,
}

impl Position {
    /// Opens a new position from the opening `side`/`quantity` of a fill.
    pub fn open(
        position_id: PositionId,
        strategy_id: StrategyId,
        symbol: Symbol,
        side: Side,
        quantity: Decimal,
    ) -> Self {
        Self {
            position_id,
            strategy_id,
            symbol,
            signed_quantity: side.sign() * quantity,
        }
    }

    /// Signed net quantity: positive when long, negative when short, zero when flat/closed.
    pub fn signed_quantity(&self) -> Decimal {
        self.signed_quantity
    }

    pub fn direction(&self) -> Direction {
        use std::cmp::Ordering;
        match self.signed_quantity.cmp(&Decimal::ZERO) {
            Ordering::Greater => Direction::Long,
            Ordering::Less => Direction::Short,
            Ordering::Equal => Direction::Flat,
        }
    }

    /// A position is closed once its net quantity reaches zero.
    pub fn is_closed(&self) -> bool {
        self.signed_quantity.is_zero()
    }

    /// Applies an additional fill's `side`/`quantity` to this position's net quantity.
    pub fn apply_fill(&mut self, side: Side, quantity: Decimal) {
        self.signed_quantity += side.sign() * quantity;
    }
}

/// Discriminates the [`PositionEvent`] emitted by the Fill Correlator.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum PositionEventKind {
    Opened,
    Modified,
    Closed,
}

/// Derived event the engine constructs and re-enters through `process()`, delivered to the
/// Portfolio and then routed to the owning strategy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PositionEvent {
    pub kind: PositionEventKind,
    pub position: Position,
}

impl PositionEvent {
    pub fn new(kind: PositionEventKind, position: Position) -> Self {
        Self { kind, position }
    }
}
