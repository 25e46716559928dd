//! Defines the [`Order`] aggregate and its [`state`] machine.

pub mod state;

use crate::identifiers::{ClOrdId, OrderId, Side, StrategyId, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use state::{InvalidTransition, OrderState, OrderTrigger};

/// An order owned by exactly one strategy, tracked through its [`OrderState`] lifecycle.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Order {
    pub cl_ord_id: ClOrdId,
    pub strategy_id: StrategyId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Decimal,
    pub filled_quantity: Decimal,
    pub state: OrderState,
    /// Venue-assigned identifier, populated once the venue acknowledges the order.
    pub venue_order_id: Option<OrderId>,
}

impl Order {
    pub fn new(
        cl_ord_id: ClOrdId,
        strategy_id: StrategyId,
        symbol: Symbol,
        side: Side,
        quantity: Decimal,
    ) -> Self {
        Self {
            cl_ord_id,
            strategy_id,
            symbol,
            side,
            quantity,
            filled_quantity: Decimal::ZERO,
            state: OrderState::Initialized,
            venue_order_id: None,
        }
    }

    pub fn remaining_quantity(&self) -> Decimal {
        self.quantity - self.filled_quantity
    }

    /// Applies a non-fill transition. On an illegal transition, `self` is left unchanged.
    pub fn apply(&mut self, trigger: OrderTrigger) -> Result<(), InvalidTransition> {
        let state = self.state.apply(trigger)?;
        self.state = state;
        Ok(())
    }

    /// Applies an executed `fill_quantity` against this order. Computes whether the fill
    /// exhausts the remaining quantity and drives the state machine accordingly. On an illegal
    /// transition neither `filled_quantity` nor `state` are mutated.
    pub fn apply_fill(&mut self, fill_quantity: Decimal) -> Result<(), InvalidTransition> {
        let filled_quantity = self.filled_quantity + fill_quantity;
        let remaining_zero = filled_quantity >= self.quantity;
        let state = self.state.apply(OrderTrigger::Fill { remaining_zero })?;
        self.filled_quantity = filled_quantity;
        self.state = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order() -> Order {
        Order::new(
            ClOrdId::new("E-1"),
            StrategyId::new("S-1"),
            Symbol::new("AAPL.NASDAQ"),
            Side::Buy,
            Decimal::ONE_HUNDRED,
        )
    }

    #[test]
    fn partial_then_full_fill_transitions_and_accumulates() {
        let mut order = new_order();
        order.apply(OrderTrigger::Submit).unwrap();
        order.apply(OrderTrigger::Accept).unwrap();
        order.apply(OrderTrigger::Work).unwrap();

        order.apply_fill(Decimal::from(40)).unwrap();
        assert_eq!(order.state, OrderState::PartiallyFilled);
        assert_eq!(order.filled_quantity, Decimal::from(40));

        order.apply_fill(Decimal::from(60)).unwrap();
        assert_eq!(order.state, OrderState::Filled);
        assert_eq!(order.filled_quantity, Decimal::ONE_HUNDRED);
        assert_eq!(order.remaining_quantity(), Decimal::ZERO);
    }

    #[test]
    fn illegal_fill_leaves_filled_quantity_unchanged() {
        let mut order = new_order();
        assert!(order.apply_fill(Decimal::from(10)).is_err());
        assert_eq!(order.filled_quantity, Decimal::ZERO);
        assert_eq!(order.state, OrderState::Initialized);
    }
}
