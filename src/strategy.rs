//! Defines the [`Strategy`] contract and the [`StrategyRegistry`] that binds strategies back to
//! the engine.

use crate::command::Command;
use crate::event::Event;
use crate::identifiers::StrategyId;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// The engine-back-reference a [`Strategy`] receives on registration, letting it emit
/// [`Command`]s without the registry handing out a borrow of the engine itself.
pub trait CommandSink: Send + Sync {
    fn submit(&self, command: Command);
}

/// Opaque consumer of [`Event`]s, identified by a [`StrategyId`], registered with the engine.
pub trait Strategy: Send {
    fn strategy_id(&self) -> &StrategyId;

    /// Called once at registration time with a handle the strategy can use to submit commands.
    fn register_execution_engine(&mut self, commands: Arc<dyn CommandSink>);

    fn handle_event(&mut self, event: Event);
}

/// Error returned by [`StrategyRegistry::register`]/[`StrategyRegistry::deregister`].
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum StrategyRegistryError {
    #[error("strategy {0} is already registered")]
    AlreadyRegistered(StrategyId),
    #[error("strategy {0} is not registered")]
    NotRegistered(StrategyId),
}

/// Mapping from [`StrategyId`] to registered [`Strategy`] handle. No concurrency control is
/// applied at this layer - serialization is the Live Loop's job.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: HashMap<StrategyId, Box<dyn Strategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        mut strategy: Box<dyn Strategy>,
        commands: Arc<dyn CommandSink>,
    ) -> Result<(), StrategyRegistryError> {
        let strategy_id = strategy.strategy_id().clone();
        if self.strategies.contains_key(&strategy_id) {
            return Err(StrategyRegistryError::AlreadyRegistered(strategy_id));
        }
        strategy.register_execution_engine(commands);
        self.strategies.insert(strategy_id, strategy);
        Ok(())
    }

    pub fn deregister(&mut self, strategy_id: &StrategyId) -> Result<(), StrategyRegistryError> {
        self.strategies
            .remove(strategy_id)
            .map(|_| ())
            .ok_or_else(|| StrategyRegistryError::NotRegistered(strategy_id.clone()))
    }

    pub fn list(&self) -> Vec<StrategyId> {
        self.strategies.keys().cloned().collect()
    }

    pub fn get_mut(&mut self, strategy_id: &StrategyId) -> Option<&mut Box<dyn Strategy>> {
        self.strategies.get_mut(strategy_id)
    }

    pub fn clear(&mut self) {
        self.strategies.clear();
    }
}
