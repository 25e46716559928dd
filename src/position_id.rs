//! Defines the [`PositionIdGenerator`], which mints [`PositionId`]s on behalf of the Fill
//! Correlator under both OMS regimes.

use crate::identifiers::{PositionId, Symbol, TraderId};
use std::collections::HashMap;

/// Per-symbol monotonic [`PositionId`] minting, restorable from persisted counts so that
/// identifiers issued after a restart never collide with ones already in the database.
#[derive(Debug, Clone)]
pub struct PositionIdGenerator {
    trader_tag: String,
    counts: HashMap<Symbol, u64>,
}

impl PositionIdGenerator {
    pub fn new(trader_id: &TraderId) -> Self {
        Self {
            trader_tag: trader_id.0.to_string(),
            counts: HashMap::new(),
        }
    }

    /// Seeds each symbol's counter from previously persisted counts, so that subsequently
    /// issued identifiers never collide with ones already in the database.
    pub fn set_counts(&mut self, counts: HashMap<Symbol, u64>) {
        self.counts = counts;
    }

    /// Mints the next [`PositionId`] for `symbol`, incrementing its counter.
    pub fn generate(&mut self, symbol: &Symbol) -> PositionId {
        let count = self.counts.entry(symbol.clone()).or_insert(0);
        *count += 1;
        PositionId::new(format!("{}-{}-{}", self.trader_tag, symbol, count))
    }

    /// Returns all counters to zero.
    pub fn reset(&mut self) {
        self.counts.clear();
    }
}
