//! Defines the engine's singleton [`Account`] and the inbound [`AccountState`] event that
//! creates and updates it.

use crate::identifiers::{AccountId, Currency};
use derive_more::Constructor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single balance held against the account, denominated in `currency`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Constructor)]
pub struct AccountBalance {
    pub currency: Currency,
    pub total: Decimal,
    pub free: Decimal,
}

/// Venue-reported account snapshot. Created by the Account Updater into an [`Account`] the
/// first time its `account_id` matches the engine's configured account, then applied in place
/// on every subsequent match.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Constructor)]
pub struct AccountState {
    pub account_id: AccountId,
    pub base_currency: Option<Currency>,
    pub balances: Vec<AccountBalance>,
}

/// Singleton per engine. Created from the first [`AccountState`] event whose `account_id`
/// matches the engine's configured account; thereafter updated in place.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Account {
    pub account_id: AccountId,
    pub base_currency: Option<Currency>,
    pub balances: Vec<AccountBalance>,
}

impl Account {
    /// Constructs an [`Account`] from the first matching [`AccountState`] event.
    pub fn from_state(state: AccountState) -> Self {
        Self {
            account_id: state.account_id,
            base_currency: state.base_currency,
            balances: state.balances,
        }
    }

    /// Applies a subsequent [`AccountState`] event for this same account in place.
    pub fn apply(&mut self, state: AccountState) {
        if let Some(base_currency) = state.base_currency {
            self.base_currency = Some(base_currency);
        }
        self.balances = state.balances;
    }
}
