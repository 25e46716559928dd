//! Defines the [`ExecutionDatabase`] contract and an in-memory reference implementation.

use crate::account::Account;
use crate::identifiers::{AccountId, ClOrdId, PositionId, StrategyId, Symbol, TraderId};
use crate::order::Order;
use crate::position::Position;
use std::collections::HashMap;

/// Durable/cacheable persistence of orders, positions, and accounts; identifier indexes. The
/// engine performs all database access from a single path (the consumer path in the live
/// variant), so implementations need not guard against concurrent writers.
pub trait ExecutionDatabase: Send {
    fn trader_id(&self) -> &TraderId;

    fn get_account(&self, account_id: &AccountId) -> Option<Account>;
    fn add_account(&mut self, account: Account);
    fn update_account(&mut self, account: Account);

    fn order_exists(&self, cl_ord_id: &ClOrdId) -> bool;
    fn add_order(&mut self, order: Order, position_id: Option<PositionId>);
    fn get_order(&self, cl_ord_id: &ClOrdId) -> Option<Order>;
    fn update_order(&mut self, order: Order);

    fn position_exists(&self, position_id: &PositionId) -> bool;
    fn add_position(&mut self, position: Position);
    fn get_position(&self, position_id: &PositionId) -> Option<Position>;
    fn update_position(&mut self, position: Position);
    fn get_position_id(&self, cl_ord_id: &ClOrdId) -> Option<PositionId>;
    /// Stamps the [`PositionId`] the Fill Correlator resolved for a `cl_ord_id`'s fills.
    fn set_position_id(&mut self, cl_ord_id: ClOrdId, position_id: PositionId);

    fn get_strategy_for_order(&self, cl_ord_id: &ClOrdId) -> Option<StrategyId>;

    fn get_positions_open(
        &self,
        symbol: Option<&Symbol>,
        strategy_id: Option<&StrategyId>,
    ) -> Vec<Position>;
    fn positions_open_count(
        &self,
        symbol: Option<&Symbol>,
        strategy_id: Option<&StrategyId>,
    ) -> usize {
        self.get_positions_open(symbol, strategy_id).len()
    }

    fn get_symbol_position_counts(&self) -> HashMap<Symbol, u64>;

    /// True if an open position or a non-terminal order is outstanding at this checkpoint.
    fn check_residuals(&self) -> bool;

    fn reset(&mut self);
}

/// In-memory [`ExecutionDatabase`]. Not a durable store - state is lost on process exit. Useful
/// for tests and as a minimal usage example.
pub struct InMemoryExecutionDatabase {
    trader_id: TraderId,
    accounts: HashMap<AccountId, Account>,
    orders: HashMap<ClOrdId, Order>,
    order_position_ids: HashMap<ClOrdId, PositionId>,
    positions: HashMap<PositionId, Position>,
    symbol_position_counts: HashMap<Symbol, u64>,
}

impl InMemoryExecutionDatabase {
    pub fn new(trader_id: TraderId) -> Self {
        Self {
            trader_id,
            accounts: HashMap::new(),
            orders: HashMap::new(),
            order_position_ids: HashMap::new(),
            positions: HashMap::new(),
            symbol_position_counts: HashMap::new(),
        }
    }
}

impl ExecutionDatabase for InMemoryExecutionDatabase {
    fn trader_id(&self) -> &TraderId {
        &self.trader_id
    }

    fn get_account(&self, account_id: &AccountId) -> Option<Account> {
        self.accounts.get(account_id).cloned()
    }

    fn add_account(&mut self, account: Account) {
        self.accounts.insert(account.account_id.clone(), account);
    }

    fn update_account(&mut self, account: Account) {
        self.accounts.insert(account.account_id.clone(), account);
    }

    fn order_exists(&self, cl_ord_id: &ClOrdId) -> bool {
        self.orders.contains_key(cl_ord_id)
    }

    fn add_order(&mut self, order: Order, position_id: Option<PositionId>) {
        if let Some(position_id) = position_id {
            self.order_position_ids
                .insert(order.cl_ord_id.clone(), position_id);
        }
        self.orders.insert(order.cl_ord_id.clone(), order);
    }

    fn get_order(&self, cl_ord_id: &ClOrdId) -> Option<Order> {
        self.orders.get(cl_ord_id).cloned()
    }

    fn update_order(&mut self, order: Order) {
        self.orders.insert(order.cl_ord_id.clone(), order);
    }

    fn position_exists(&self, position_id: &PositionId) -> bool {
        self.positions.contains_key(position_id)
    }

    fn add_position(&mut self, position: Position) {
        *self
            .symbol_position_counts
            .entry(position.symbol.clone())
            .or_insert(0) += 1;
        self.positions
            .insert(position.position_id.clone(), position);
    }

    fn get_position(&self, position_id: &PositionId) -> Option<Position> {
        self.positions.get(position_id).cloned()
    }

    fn update_position(&mut self, position: Position) {
        self.positions
            .insert(position.position_id.clone(), position);
    }

    fn get_position_id(&self, cl_ord_id: &ClOrdId) -> Option<PositionId> {
        self.order_position_ids.get(cl_ord_id).cloned()
    }

    fn set_position_id(&mut self, cl_ord_id: ClOrdId, position_id: PositionId) {
        self.order_position_ids.insert(cl_ord_id, position_id);
    }

    fn get_strategy_for_order(&self, cl_ord_id: &ClOrdId) -> Option<StrategyId> {
        self.orders
            .get(cl_ord_id)
            .map(|order| order.strategy_id.clone())
    }

    fn get_positions_open(
        &self,
        symbol: Option<&Symbol>,
        strategy_id: Option<&StrategyId>,
    ) -> Vec<Position> {
        self.positions
            .values()
            .filter(|position| !position.is_closed())
            .filter(|position| symbol.is_none_or(|symbol| &position.symbol == symbol))
            .filter(|position| {
                strategy_id.is_none_or(|strategy_id| &position.strategy_id == strategy_id)
            })
            .cloned()
            .collect()
    }

    fn get_symbol_position_counts(&self) -> HashMap<Symbol, u64> {
        self.symbol_position_counts.clone()
    }

    fn check_residuals(&self) -> bool {
        let open_position = self.positions.values().any(|position| !position.is_closed());
        let working_order = self
            .orders
            .values()
            .any(|order| !order.state.is_terminal());
        open_position || working_order
    }

    fn reset(&mut self) {
        self.accounts.clear();
        self.orders.clear();
        self.order_position_ids.clear();
        self.positions.clear();
        self.symbol_position_counts.clear();
    }
}
