//! Defines the in-process [`Engine`]: the Command Dispatcher, Event Dispatcher, Fill Correlator,
//! Account Updater and Strategy Router described by the system overview. [`live`] layers a
//! thread-safe message-queue boundary over the same dispatch logic.

pub mod live;

use crate::account::{Account, AccountState};
use crate::client::ExecutionClient;
use crate::command::{BracketOrder, Command, OrderLegRole, SubmitOrder};
use crate::database::ExecutionDatabase;
use crate::event::{Event, Fill, OrderEvent, OrderEventKind};
use crate::identifiers::{AccountId, ClOrdId, OrderId, PositionId, Side, StrategyId, Symbol, TraderId};
use crate::oms::OmsType;
use crate::order::state::OrderTrigger;
use crate::order::Order;
use crate::portfolio::Portfolio;
use crate::position::{Position, PositionEvent, PositionEventKind};
use crate::position_id::PositionIdGenerator;
use crate::strategy::{CommandSink, Strategy, StrategyRegistry, StrategyRegistryError};
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// Caps the in-process variant's recursive re-entry of derived position events, defensively
/// (fill → position event → strategy is the only chain the engine itself produces).
const MAX_REENTRY_DEPTH: usize = 8;

/// Construction-time configuration. Validated by [`Engine::new`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub trader_id: TraderId,
    pub account_id: AccountId,
    pub oms_type: OmsType,
    pub debug: bool,
}

/// Returned by [`Engine::new`] when the engine cannot be safely constructed.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EngineBuildError {
    #[error("engine configured for trader {expected}, but database is stamped with {actual}")]
    TraderIdMismatch { expected: TraderId, actual: TraderId },
}

/// The Execution Engine. Generic over its three external collaborators so that tests can supply
/// in-memory/mock implementations while production code supplies real ones.
pub struct Engine<Db, Client, Pf> {
    config: EngineConfig,
    database: Db,
    client: Client,
    portfolio: Pf,
    strategies: StrategyRegistry,
    position_id_generator: PositionIdGenerator,
    account: Option<Account>,
    command_count: u64,
    event_count: u64,
}

impl<Db, Client, Pf> Engine<Db, Client, Pf>
where
    Db: ExecutionDatabase,
    Client: ExecutionClient,
    Pf: Portfolio,
{
    /// Constructs an engine, seeding the Position ID Generator from the database's persisted
    /// per-symbol counts. Fails if the database is stamped with a different trader.
    pub fn new(
        config: EngineConfig,
        database: Db,
        client: Client,
        portfolio: Pf,
    ) -> Result<Self, EngineBuildError> {
        if database.trader_id() != &config.trader_id {
            return Err(EngineBuildError::TraderIdMismatch {
                expected: config.trader_id,
                actual: database.trader_id().clone(),
            });
        }

        let mut position_id_generator = PositionIdGenerator::new(&config.trader_id);
        position_id_generator.set_counts(database.get_symbol_position_counts());

        Ok(Self {
            config,
            database,
            client,
            portfolio,
            strategies: StrategyRegistry::new(),
            position_id_generator,
            account: None,
            command_count: 0,
            event_count: 0,
        })
    }

    pub fn register_strategy(
        &mut self,
        strategy: Box<dyn Strategy>,
        commands: Arc<dyn CommandSink>,
    ) -> Result<(), StrategyRegistryError> {
        let strategy_id = strategy.strategy_id().clone();
        let result = self.strategies.register(strategy, commands);
        if result.is_ok() {
            tracing::info!(%strategy_id, "strategy registered");
        }
        result
    }

    pub fn deregister_strategy(
        &mut self,
        strategy_id: &StrategyId,
    ) -> Result<(), StrategyRegistryError> {
        self.strategies.deregister(strategy_id)
    }

    pub fn registered_strategies(&self) -> Vec<StrategyId> {
        self.strategies.list()
    }

    pub fn command_count(&self) -> u64 {
        self.command_count
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn is_net_long(&self, symbol: &Symbol, strategy_id: Option<&StrategyId>) -> bool {
        self.net_signed_quantity(symbol, strategy_id) > Decimal::ZERO
    }

    pub fn is_net_short(&self, symbol: &Symbol, strategy_id: Option<&StrategyId>) -> bool {
        self.net_signed_quantity(symbol, strategy_id) < Decimal::ZERO
    }

    pub fn is_flat(&self, symbol: Option<&Symbol>, strategy_id: Option<&StrategyId>) -> bool {
        self.database.positions_open_count(symbol, strategy_id) == 0
    }

    fn net_signed_quantity(&self, symbol: &Symbol, strategy_id: Option<&StrategyId>) -> Decimal {
        self.database
            .get_positions_open(Some(symbol), strategy_id)
            .iter()
            .map(Position::signed_quantity)
            .sum()
    }

    /// Clears counters, the strategy registry, the position id generator and the database.
    pub fn reset(&mut self) {
        self.command_count = 0;
        self.event_count = 0;
        self.strategies.clear();
        self.position_id_generator.reset();
        self.account = None;
        self.database.reset();
    }

    // ---- Command Dispatcher (§4.3) ----

    pub fn execute(&mut self, command: Command) {
        self.command_count += 1;
        if self.config.debug {
            tracing::debug!(?command, "executing command");
        }
        match command {
            Command::AccountInquiry => self.client.account_inquiry(),
            Command::SubmitOrder(submit) => self.handle_submit_order(submit),
            Command::SubmitBracketOrder(bracket) => self.handle_submit_bracket_order(bracket),
            Command::ModifyOrder(modify) => self.client.modify_order(&modify),
            Command::CancelOrder(cancel) => self.client.cancel_order(&cancel),
        }
    }

    fn handle_submit_order(&mut self, submit: SubmitOrder) {
        if self.database.order_exists(&submit.cl_ord_id) {
            self.process(Event::OrderInvalid {
                cl_ord_id: submit.cl_ord_id,
                strategy_id: submit.strategy_id,
                reason: "cl_ord_id already exists".to_string(),
            });
            return;
        }

        if let Some(position_id) = &submit.position_id {
            if !self.database.position_exists(position_id) {
                self.process(Event::OrderInvalid {
                    cl_ord_id: submit.cl_ord_id,
                    strategy_id: submit.strategy_id,
                    reason: "position_id does not exist".to_string(),
                });
                return;
            }
        }

        let order = Order::new(
            submit.cl_ord_id.clone(),
            submit.strategy_id.clone(),
            submit.symbol.clone(),
            submit.side,
            submit.quantity,
        );
        self.database.add_order(order, submit.position_id.clone());
        self.client.submit_order(&submit);
    }

    fn handle_submit_bracket_order(&mut self, bracket: BracketOrder) {
        let collider_role = bracket
            .legs()
            .find(|(_, leg)| self.database.order_exists(&leg.cl_ord_id))
            .map(|(role, _)| role);

        if let Some(collider_role) = collider_role {
            for (role, leg) in bracket.legs() {
                let reason = if role == collider_role {
                    OrderLegRole::COLLIDER_REASON
                } else {
                    collider_role.sibling_reason()
                };
                self.process(Event::OrderInvalid {
                    cl_ord_id: leg.cl_ord_id.clone(),
                    strategy_id: leg.strategy_id.clone(),
                    reason: reason.to_string(),
                });
            }
            return;
        }

        for (_, leg) in bracket.legs() {
            let order = Order::new(
                leg.cl_ord_id.clone(),
                leg.strategy_id.clone(),
                leg.symbol.clone(),
                leg.side,
                leg.quantity,
            );
            self.database.add_order(order, None);
        }
        self.client.submit_bracket_order(&bracket);
    }

    // ---- Event Dispatcher (§4.4) ----

    pub fn process(&mut self, event: Event) {
        self.process_with_depth(event, 0)
    }

    fn process_with_depth(&mut self, event: Event, depth: usize) {
        self.event_count += 1;
        if self.config.debug {
            tracing::debug!(?event, depth, "processing event");
        }
        if depth > MAX_REENTRY_DEPTH {
            tracing::error!("event re-entry depth exceeded, dropping event");
            return;
        }

        match event {
            Event::OrderInvalid {
                cl_ord_id,
                strategy_id,
                reason,
            } => {
                let route_strategy_id = strategy_id.clone();
                self.route_to_strategy(
                    &route_strategy_id,
                    Event::OrderInvalid {
                        cl_ord_id,
                        strategy_id,
                        reason,
                    },
                );
            }
            Event::OrderCancelReject { cl_ord_id, reason } => {
                self.handle_cancel_reject(cl_ord_id, reason)
            }
            Event::OrderEvent(order_event) => self.handle_order_event(order_event, depth),
            Event::PositionEvent(position_event) => self.handle_position_event(position_event),
            Event::AccountState(state) => self.handle_account_state(state),
        }
    }

    fn handle_cancel_reject(&mut self, cl_ord_id: ClOrdId, reason: String) {
        match self.database.get_strategy_for_order(&cl_ord_id) {
            Some(strategy_id) => self.route_to_strategy(
                &strategy_id,
                Event::OrderCancelReject { cl_ord_id, reason },
            ),
            None => tracing::error!(%cl_ord_id, "cancel-reject for unknown order, dropping"),
        }
    }

    fn handle_order_event(&mut self, order_event: OrderEvent, depth: usize) {
        let OrderEvent { cl_ord_id, kind } = order_event;

        let mut order = match self.database.get_order(&cl_ord_id) {
            Some(order) => order,
            None => {
                tracing::warn!(%cl_ord_id, "event for unknown order, dropping");
                return;
            }
        };

        if let OrderEventKind::Filled(fill) = kind {
            if let Err(err) = order.apply_fill(fill.quantity) {
                tracing::warn!(%err, "illegal order state transition");
            }
            let strategy_id = order.strategy_id.clone();
            let symbol = order.symbol.clone();
            let side = order.side;
            self.database.update_order(order);
            self.correlate_fill(cl_ord_id, strategy_id, symbol, side, fill, depth);
            return;
        }

        let trigger = match &kind {
            OrderEventKind::Submitted => OrderTrigger::Submit,
            OrderEventKind::Accepted { .. } => OrderTrigger::Accept,
            OrderEventKind::Working => OrderTrigger::Work,
            OrderEventKind::Cancelled => OrderTrigger::Cancel,
            OrderEventKind::Expired => OrderTrigger::Expire,
            OrderEventKind::Rejected { .. } => OrderTrigger::Reject,
            OrderEventKind::Denied { .. } => OrderTrigger::Deny,
            OrderEventKind::Invalid { .. } => OrderTrigger::Invalidate,
            OrderEventKind::Filled(_) => unreachable!("handled above"),
        };
        match order.apply(trigger) {
            Ok(()) => {
                if let OrderEventKind::Accepted { venue_order_id } = &kind {
                    order.venue_order_id = Some(venue_order_id.clone());
                }
            }
            Err(err) => tracing::warn!(%err, "illegal order state transition"),
        }

        let strategy_id = order.strategy_id.clone();
        self.database.update_order(order);
        self.route_to_strategy(&strategy_id, Event::OrderEvent(OrderEvent { cl_ord_id, kind }));
    }

    fn handle_position_event(&mut self, position_event: PositionEvent) {
        self.portfolio.update(&position_event);
        let strategy_id = position_event.position.strategy_id.clone();
        self.route_to_strategy(&strategy_id, Event::PositionEvent(position_event));
    }

    fn handle_account_state(&mut self, state: AccountState) {
        if state.account_id != self.config.account_id {
            tracing::warn!(account_id = %state.account_id, "account state for a different account, dropping");
            return;
        }

        match &mut self.account {
            None => {
                let account = Account::from_state(state);
                self.database.add_account(account.clone());
                if let Some(currency) = account.base_currency.clone() {
                    self.portfolio.set_base_currency(currency);
                }
                self.account = Some(account);
            }
            Some(account) => {
                account.apply(state);
                self.database.update_account(account.clone());
            }
        }
    }

    // ---- Fill Correlator (§4.5) ----

    fn indexed_position_id(
        &self,
        cl_ord_id: &ClOrdId,
        symbol: &Symbol,
        strategy_id: &StrategyId,
    ) -> Option<PositionId> {
        match self.config.oms_type {
            // NETTING consolidates fills for the same symbol/strategy into whichever position
            // is currently open for that pair, regardless of which order the fill belongs to.
            OmsType::Netting => self
                .database
                .get_positions_open(Some(symbol), Some(strategy_id))
                .into_iter()
                .next()
                .map(|position| position.position_id),
            // HEDGING keys strictly by cl_ord_id: repeated fills of the same order build the
            // same position, but a different order never shares one.
            OmsType::Hedging => self.database.get_position_id(cl_ord_id),
        }
    }

    fn correlate_fill(
        &mut self,
        cl_ord_id: ClOrdId,
        strategy_id: StrategyId,
        symbol: Symbol,
        side: Side,
        mut fill: Fill,
        depth: usize,
    ) {
        let indexed_position_id = self.indexed_position_id(&cl_ord_id, &symbol, &strategy_id);

        match (indexed_position_id, fill.position_id.clone()) {
            (None, None) => {
                let minted = self.position_id_generator.generate(&symbol);
                self.database
                    .set_position_id(cl_ord_id.clone(), minted.clone());
                fill.position_id = Some(minted.clone());
                let fill_event = Event::OrderEvent(OrderEvent {
                    cl_ord_id,
                    kind: OrderEventKind::Filled(fill.clone()),
                });
                self.open_position(
                    minted,
                    strategy_id,
                    symbol,
                    side,
                    fill.quantity,
                    fill_event,
                    depth,
                );
            }
            (None, Some(venue_position_id)) => {
                self.database
                    .set_position_id(cl_ord_id.clone(), venue_position_id.clone());
                let fill_event = Event::OrderEvent(OrderEvent {
                    cl_ord_id,
                    kind: OrderEventKind::Filled(fill.clone()),
                });
                self.open_position(
                    venue_position_id,
                    strategy_id,
                    symbol,
                    side,
                    fill.quantity,
                    fill_event,
                    depth,
                );
            }
            (Some(position_id), None) => {
                self.database
                    .set_position_id(cl_ord_id.clone(), position_id.clone());
                fill.position_id = Some(position_id.clone());
                let fill_event = Event::OrderEvent(OrderEvent {
                    cl_ord_id,
                    kind: OrderEventKind::Filled(fill.clone()),
                });
                self.update_position(position_id, strategy_id, side, fill.quantity, fill_event, depth);
            }
            (Some(_), Some(venue_position_id)) => {
                self.database
                    .set_position_id(cl_ord_id.clone(), venue_position_id.clone());
                let fill_event = Event::OrderEvent(OrderEvent {
                    cl_ord_id,
                    kind: OrderEventKind::Filled(fill.clone()),
                });
                self.update_position(
                    venue_position_id,
                    strategy_id,
                    side,
                    fill.quantity,
                    fill_event,
                    depth,
                );
            }
        }
    }

    fn open_position(
        &mut self,
        position_id: PositionId,
        strategy_id: StrategyId,
        symbol: Symbol,
        side: Side,
        quantity: Decimal,
        fill_event: Event,
        depth: usize,
    ) {
        let position = Position::open(position_id, strategy_id.clone(), symbol, side, quantity);
        self.database.add_position(position.clone());
        self.route_to_strategy(&strategy_id, fill_event);
        self.process_with_depth(
            Event::PositionEvent(PositionEvent::new(PositionEventKind::Opened, position)),
            depth + 1,
        );
    }

    fn update_position(
        &mut self,
        position_id: PositionId,
        strategy_id: StrategyId,
        side: Side,
        quantity: Decimal,
        fill_event: Event,
        depth: usize,
    ) {
        let mut position = match self.database.get_position(&position_id) {
            Some(position) => position,
            None => {
                tracing::error!(%position_id, "fill for unknown position, dropping (consistency violation)");
                return;
            }
        };
        position.apply_fill(side, quantity);
        self.database.update_position(position.clone());

        let kind = if position.is_closed() {
            PositionEventKind::Closed
        } else {
            PositionEventKind::Modified
        };

        self.route_to_strategy(&strategy_id, fill_event);
        self.process_with_depth(
            Event::PositionEvent(PositionEvent::new(kind, position)),
            depth + 1,
        );
    }

    // ---- Strategy Router (§4.7) ----

    fn route_to_strategy(&mut self, strategy_id: &StrategyId, event: Event) {
        match self.strategies.get_mut(strategy_id) {
            Some(strategy) => strategy.handle_event(event),
            None => tracing::error!(%strategy_id, "event for unknown or unregistered strategy, dropping"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountBalance;
    use crate::command::{CancelOrder, ModifyOrder};
    use crate::database::InMemoryExecutionDatabase;
    use crate::identifiers::Currency;
    use std::sync::Mutex;

    struct NoopClient {
        submitted: Mutex<Vec<SubmitOrder>>,
        submitted_brackets: Mutex<usize>,
    }

    impl NoopClient {
        fn new() -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
                submitted_brackets: Mutex::new(0),
            }
        }
    }

    impl ExecutionClient for NoopClient {
        fn account_inquiry(&self) {}

        fn submit_order(&self, command: &SubmitOrder) {
            self.submitted.lock().unwrap().push(command.clone());
        }

        fn submit_bracket_order(&self, _command: &BracketOrder) {
            *self.submitted_brackets.lock().unwrap() += 1;
        }

        fn modify_order(&self, _command: &ModifyOrder) {}

        fn cancel_order(&self, _command: &CancelOrder) {}
    }

    struct NoopPortfolio;
    impl Portfolio for NoopPortfolio {
        fn update(&mut self, _event: &PositionEvent) {}
        fn set_base_currency(&mut self, _currency: Currency) {}
    }

    struct NoopSink;
    impl CommandSink for NoopSink {
        fn submit(&self, _command: Command) {}
    }

    struct RecordingStrategy {
        id: StrategyId,
        events: Vec<Event>,
    }

    impl Strategy for RecordingStrategy {
        fn strategy_id(&self) -> &StrategyId {
            &self.id
        }

        fn register_execution_engine(&mut self, _commands: Arc<dyn CommandSink>) {}

        fn handle_event(&mut self, event: Event) {
            self.events.push(event);
        }
    }

    /// Like [`RecordingStrategy`] but shares its captured events out through an `Arc<Mutex<_>>`
    /// so a test can inspect them after the strategy has been moved into the engine's registry.
    struct SharedRecordingStrategy {
        id: StrategyId,
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl Strategy for SharedRecordingStrategy {
        fn strategy_id(&self) -> &StrategyId {
            &self.id
        }

        fn register_execution_engine(&mut self, _commands: Arc<dyn CommandSink>) {}

        fn handle_event(&mut self, event: Event) {
            self.events.lock().unwrap().push(event);
        }
    }

    type TestEngine = Engine<InMemoryExecutionDatabase, NoopClient, NoopPortfolio>;

    fn new_engine(oms_type: OmsType) -> TestEngine {
        let config = EngineConfig {
            trader_id: TraderId::new("TRADER-001"),
            account_id: AccountId::new("A-1"),
            oms_type,
            debug: false,
        };
        let database = InMemoryExecutionDatabase::new(TraderId::new("TRADER-001"));
        Engine::new(config, database, NoopClient::new(), NoopPortfolio).unwrap()
    }

    fn submit(cl_ord_id: &str, strategy_id: &str, symbol: &str, side: Side, qty: i64) -> Command {
        Command::SubmitOrder(SubmitOrder {
            cl_ord_id: ClOrdId::new(cl_ord_id),
            strategy_id: StrategyId::new(strategy_id),
            symbol: Symbol::new(symbol),
            side,
            quantity: Decimal::from(qty),
            position_id: None,
        })
    }

    fn filled(cl_ord_id: &str, qty: i64) -> Event {
        Event::OrderEvent(OrderEvent {
            cl_ord_id: ClOrdId::new(cl_ord_id),
            kind: OrderEventKind::Filled(Fill {
                quantity: Decimal::from(qty),
                position_id: None,
            }),
        })
    }

    fn lifecycle_to_working(engine: &mut TestEngine, cl_ord_id: &str) {
        for kind in [
            OrderEventKind::Submitted,
            OrderEventKind::Accepted {
                venue_order_id: OrderId::new("V-1"),
            },
            OrderEventKind::Working,
        ] {
            engine.process(Event::OrderEvent(OrderEvent {
                cl_ord_id: ClOrdId::new(cl_ord_id),
                kind,
            }));
        }
    }

    #[test]
    fn s1_duplicate_submit_emits_order_invalid_and_counts_commands() {
        let mut engine = new_engine(OmsType::Netting);
        let sink: Arc<dyn CommandSink> = Arc::new(NoopSink);
        engine
            .register_strategy(
                Box::new(RecordingStrategy {
                    id: StrategyId::new("S-1"),
                    events: Vec::new(),
                }),
                sink,
            )
            .unwrap();

        engine.execute(submit("E-1", "S-1", "AAPL.NASDAQ", Side::Buy, 100));
        engine.execute(submit("E-1", "S-1", "AAPL.NASDAQ", Side::Buy, 100));

        assert_eq!(engine.command_count(), 2);
    }

    #[test]
    fn s2_open_then_close_under_netting() {
        let mut engine = new_engine(OmsType::Netting);
        let sink: Arc<dyn CommandSink> = Arc::new(NoopSink);
        engine
            .register_strategy(
                Box::new(RecordingStrategy {
                    id: StrategyId::new("S-1"),
                    events: Vec::new(),
                }),
                sink,
            )
            .unwrap();

        engine.execute(submit("E-1", "S-1", "AAPL.NASDAQ", Side::Buy, 100));
        lifecycle_to_working(&mut engine, "E-1");
        engine.process(filled("E-1", 100));

        let symbol = Symbol::new("AAPL.NASDAQ");
        assert!(engine.is_net_long(&symbol, None));

        engine.execute(submit("E-2", "S-1", "AAPL.NASDAQ", Side::Sell, 100));
        lifecycle_to_working(&mut engine, "E-2");
        engine.process(Event::OrderEvent(OrderEvent {
            cl_ord_id: ClOrdId::new("E-2"),
            kind: OrderEventKind::Filled(Fill {
                quantity: Decimal::from(100),
                position_id: None,
            }),
        }));

        assert!(engine.is_flat(Some(&symbol), None));
    }

    #[test]
    fn s3_bracket_collision_invalidates_all_legs_with_leg_specific_reasons() {
        let mut engine = new_engine(OmsType::Netting);
        let sink: Arc<dyn CommandSink> = Arc::new(NoopSink);
        engine
            .register_strategy(
                Box::new(RecordingStrategy {
                    id: StrategyId::new("S-1"),
                    events: Vec::new(),
                }),
                sink,
            )
            .unwrap();

        engine.execute(submit("TP-1", "S-1", "AAPL.NASDAQ", Side::Buy, 10));

        let bracket = BracketOrder {
            entry: SubmitOrder {
                cl_ord_id: ClOrdId::new("E-2"),
                strategy_id: StrategyId::new("S-1"),
                symbol: Symbol::new("AAPL.NASDAQ"),
                side: Side::Buy,
                quantity: Decimal::from(10),
                position_id: None,
            },
            stop_loss: SubmitOrder {
                cl_ord_id: ClOrdId::new("SL-2"),
                strategy_id: StrategyId::new("S-1"),
                symbol: Symbol::new("AAPL.NASDAQ"),
                side: Side::Sell,
                quantity: Decimal::from(10),
                position_id: None,
            },
            take_profit: Some(SubmitOrder {
                cl_ord_id: ClOrdId::new("TP-1"),
                strategy_id: StrategyId::new("S-1"),
                symbol: Symbol::new("AAPL.NASDAQ"),
                side: Side::Sell,
                quantity: Decimal::from(10),
                position_id: None,
            }),
        };
        engine.execute(Command::SubmitBracketOrder(bracket));

        assert!(!engine.database.order_exists(&ClOrdId::new("E-2")));
        assert!(!engine.database.order_exists(&ClOrdId::new("SL-2")));
    }

    #[test]
    fn s4_account_event_for_wrong_account_is_dropped() {
        let mut engine = new_engine(OmsType::Netting);
        engine.process(Event::AccountState(AccountState::new(
            AccountId::new("A-2"),
            None,
            vec![AccountBalance::new(Currency::new("USD"), Decimal::ONE, Decimal::ONE)],
        )));
        assert!(engine.account.is_none());
    }

    #[test]
    fn s5_cancel_reject_for_unknown_order_is_dropped_without_panicking() {
        let mut engine = new_engine(OmsType::Netting);
        engine.process(Event::OrderCancelReject {
            cl_ord_id: ClOrdId::new("X-Z"),
            reason: "too late to cancel".to_string(),
        });
        assert_eq!(engine.event_count(), 1);
    }

    #[test]
    fn hedging_opens_a_distinct_position_per_order() {
        let mut engine = new_engine(OmsType::Hedging);
        let sink: Arc<dyn CommandSink> = Arc::new(NoopSink);
        engine
            .register_strategy(
                Box::new(RecordingStrategy {
                    id: StrategyId::new("S-1"),
                    events: Vec::new(),
                }),
                sink,
            )
            .unwrap();

        engine.execute(submit("E-1", "S-1", "AAPL.NASDAQ", Side::Buy, 100));
        lifecycle_to_working(&mut engine, "E-1");
        engine.process(filled("E-1", 50));

        engine.execute(submit("E-2", "S-1", "AAPL.NASDAQ", Side::Buy, 100));
        lifecycle_to_working(&mut engine, "E-2");
        engine.process(filled("E-2", 50));

        let symbol = Symbol::new("AAPL.NASDAQ");
        assert_eq!(engine.database.positions_open_count(Some(&symbol), None), 2);
    }

    #[test]
    fn reset_zeroes_counters_and_clears_registry() {
        let mut engine = new_engine(OmsType::Netting);
        let sink: Arc<dyn CommandSink> = Arc::new(NoopSink);
        engine
            .register_strategy(
                Box::new(RecordingStrategy {
                    id: StrategyId::new("S-1"),
                    events: Vec::new(),
                }),
                sink,
            )
            .unwrap();
        engine.execute(submit("E-1", "S-1", "AAPL.NASDAQ", Side::Buy, 100));

        engine.reset();

        assert_eq!(engine.command_count(), 0);
        assert_eq!(engine.event_count(), 0);
        assert!(engine.registered_strategies().is_empty());
        assert!(!engine.database.order_exists(&ClOrdId::new("E-1")));
    }

    #[test]
    fn venue_supplied_position_id_is_honoured_on_first_fill() {
        let mut engine = new_engine(OmsType::Hedging);
        let sink: Arc<dyn CommandSink> = Arc::new(NoopSink);
        engine
            .register_strategy(
                Box::new(RecordingStrategy {
                    id: StrategyId::new("S-1"),
                    events: Vec::new(),
                }),
                sink,
            )
            .unwrap();

        engine.execute(submit("E-1", "S-1", "AAPL.NASDAQ", Side::Buy, 100));
        lifecycle_to_working(&mut engine, "E-1");
        engine.process(Event::OrderEvent(OrderEvent {
            cl_ord_id: ClOrdId::new("E-1"),
            kind: OrderEventKind::Filled(Fill {
                quantity: Decimal::from(100),
                position_id: Some(PositionId::new("VENUE-P-1")),
            }),
        }));

        assert!(engine.database.position_exists(&PositionId::new("VENUE-P-1")));
    }

    #[test]
    fn engine_resolved_position_id_is_stamped_onto_the_fill_routed_to_the_strategy() {
        let mut engine = new_engine(OmsType::Netting);
        let sink: Arc<dyn CommandSink> = Arc::new(NoopSink);
        let events = Arc::new(Mutex::new(Vec::new()));
        engine
            .register_strategy(
                Box::new(SharedRecordingStrategy {
                    id: StrategyId::new("S-1"),
                    events: Arc::clone(&events),
                }),
                sink,
            )
            .unwrap();

        engine.execute(submit("E-1", "S-1", "AAPL.NASDAQ", Side::Buy, 100));
        lifecycle_to_working(&mut engine, "E-1");
        engine.process(filled("E-1", 100));

        let minted = engine
            .database
            .get_position_id(&ClOrdId::new("E-1"))
            .expect("fill correlator mints a position id for an unindexed order");

        let routed_fill = events
            .lock()
            .unwrap()
            .iter()
            .find_map(|event| match event {
                Event::OrderEvent(OrderEvent {
                    kind: OrderEventKind::Filled(fill),
                    ..
                }) => Some(fill.clone()),
                _ => None,
            })
            .expect("a Filled order event was routed to the strategy");

        assert_eq!(routed_fill.position_id, Some(minted));
    }
}
