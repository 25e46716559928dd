//! Defines the thread-safe Live Loop: a single-consumer message queue that serializes all
//! command/event processing so that the deterministic [`Engine`] dispatch logic above can be
//! driven from multiple producer threads with identical semantics.

use super::{Engine, EngineConfig};
use crate::client::ExecutionClient;
use crate::command::Command;
use crate::database::ExecutionDatabase;
use crate::event::Event;
use crate::portfolio::Portfolio;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A unit of work accepted onto the live queue. Commands and events share one queue; there is
/// no priority between them.
enum Message {
    Command(Command),
    Event(Event),
}

/// Thread-safe handle producers use to enqueue work. Cloning is cheap (it clones an
/// `mpsc::UnboundedSender`).
#[derive(Clone)]
pub struct LiveHandle {
    tx: mpsc::UnboundedSender<Message>,
}

impl LiveHandle {
    /// Non-blocking enqueue; returns once the message is accepted onto the queue. Per-producer
    /// FIFO is preserved by the channel; total order over processing is preserved by the single
    /// consumer worker.
    pub fn execute(&self, command: Command) {
        if self.tx.send(Message::Command(command)).is_err() {
            tracing::error!("live loop worker has shut down, command dropped");
        }
    }

    pub fn process(&self, event: Event) {
        if self.tx.send(Message::Event(event)).is_err() {
            tracing::error!("live loop worker has shut down, event dropped");
        }
    }
}

/// Owns the dedicated consumer task draining the queue. Dropping this does not abort the
/// worker - it is a daemon, by design, so it never blocks process shutdown; call
/// [`LiveEngine::shutdown`] to stop it explicitly.
pub struct LiveEngine<Db, Client, Pf> {
    handle: LiveHandle,
    engine: Arc<Mutex<Engine<Db, Client, Pf>>>,
    worker: JoinHandle<()>,
}

impl<Db, Client, Pf> LiveEngine<Db, Client, Pf>
where
    Db: ExecutionDatabase + 'static,
    Client: ExecutionClient + 'static,
    Pf: Portfolio + 'static,
{
    /// Spawns the dedicated worker task and returns a [`LiveEngine`] plus the [`LiveHandle`]
    /// producers clone to submit work.
    pub fn spawn(
        config: EngineConfig,
        database: Db,
        client: Client,
        portfolio: Pf,
    ) -> Result<Self, super::EngineBuildError> {
        let engine = Arc::new(Mutex::new(Engine::new(config, database, client, portfolio)?));
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

        let worker_engine = Arc::clone(&engine);
        let worker = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let mut engine = worker_engine.lock();
                match message {
                    Message::Command(command) => engine.execute(command),
                    Message::Event(event) => engine.process(event),
                }
            }
        });

        Ok(Self {
            handle: LiveHandle { tx },
            engine,
            worker,
        })
    }

    pub fn handle(&self) -> LiveHandle {
        self.handle.clone()
    }

    /// Read-only queries served directly from the shared engine state, bypassing the queue.
    pub fn with_engine<R>(&self, f: impl FnOnce(&Engine<Db, Client, Pf>) -> R) -> R {
        f(&self.engine.lock())
    }

    /// Stops accepting new work and waits for the worker to drain the queue and exit.
    pub async fn shutdown(self) {
        drop(self.handle);
        let _ = self.worker.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountState;
    use crate::command::{CancelOrder, ModifyOrder, SubmitOrder};
    use crate::database::InMemoryExecutionDatabase;
    use crate::identifiers::{AccountId, ClOrdId, Currency, Side, StrategyId, Symbol, TraderId};
    use crate::oms::OmsType;
    use crate::position::PositionEvent;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingClient {
        submits: Arc<AtomicUsize>,
    }

    impl ExecutionClient for CountingClient {
        fn account_inquiry(&self) {}
        fn submit_order(&self, _command: &SubmitOrder) {
            self.submits.fetch_add(1, Ordering::SeqCst);
        }
        fn submit_bracket_order(&self, _command: &crate::command::BracketOrder) {}
        fn modify_order(&self, _command: &ModifyOrder) {}
        fn cancel_order(&self, _command: &CancelOrder) {}
    }

    struct NoopPortfolio;
    impl Portfolio for NoopPortfolio {
        fn update(&mut self, _event: &PositionEvent) {}
        fn set_base_currency(&mut self, _currency: Currency) {}
    }

    #[tokio::test]
    async fn fifo_per_producer_and_total_order_over_processing() {
        let submits = Arc::new(AtomicUsize::new(0));
        let config = EngineConfig {
            trader_id: TraderId::new("TRADER-001"),
            account_id: AccountId::new("A-1"),
            oms_type: OmsType::Netting,
            debug: false,
        };
        let database = InMemoryExecutionDatabase::new(TraderId::new("TRADER-001"));
        let client = CountingClient {
            submits: submits.clone(),
        };
        let live = LiveEngine::spawn(config, database, client, NoopPortfolio).unwrap();

        let mut producers = Vec::new();
        for producer in 0..4 {
            let handle = live.handle();
            producers.push(tokio::spawn(async move {
                for i in 0..250 {
                    handle.execute(Command::SubmitOrder(SubmitOrder {
                        cl_ord_id: ClOrdId::new(format!("P{producer}-{i}")),
                        strategy_id: StrategyId::new("S-1"),
                        symbol: Symbol::new("AAPL.NASDAQ"),
                        side: Side::Buy,
                        quantity: Decimal::ONE,
                        position_id: None,
                    }));
                }
            }));
        }
        for producer in producers {
            producer.await.unwrap();
        }

        live.shutdown().await;
        assert_eq!(submits.load(Ordering::SeqCst), 1000);
    }

    #[tokio::test]
    async fn queries_are_served_from_shared_state_without_touching_the_queue() {
        let config = EngineConfig {
            trader_id: TraderId::new("TRADER-001"),
            account_id: AccountId::new("A-1"),
            oms_type: OmsType::Netting,
            debug: false,
        };
        let database = InMemoryExecutionDatabase::new(TraderId::new("TRADER-001"));
        let client = CountingClient {
            submits: Arc::new(AtomicUsize::new(0)),
        };
        let live = LiveEngine::spawn(config, database, client, NoopPortfolio).unwrap();

        live.handle().process(Event::AccountState(AccountState::new(
            AccountId::new("A-1"),
            None,
            vec![],
        )));

        // Give the worker a chance to drain before reading shared state.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let flat = live.with_engine(|engine| engine.is_flat(None, None));
        assert!(flat);

        live.shutdown().await;
    }
}
