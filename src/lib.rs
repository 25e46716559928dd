#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms
)]
#![allow(clippy::too_many_arguments)]

//! # Execution Engine
//! The subsystem that sits between trading strategies (which emit intent) and external
//! execution venues (brokers, exchange gateways), mediating every order command and every
//! event reported back. It is the single source of truth for the lifecycle of orders and
//! derived positions, and the enforcement point for pre-trade validation, identifier
//! assignment, persistence, strategy routing, and portfolio accounting.
//!
//! [`engine::Engine`] is the deterministic in-process variant; [`engine::live::LiveEngine`]
//! layers a thread-safe, single-consumer message queue over the same dispatch logic for
//! multi-producer use.

/// Defines the engine's singleton account and the account-state event that updates it.
pub mod account;

/// Defines the commands a strategy issues to the engine.
pub mod command;

/// Defines the execution client contract: the outbound adapter that talks to a venue.
pub mod client;

/// Defines the execution database contract and an in-memory reference implementation.
pub mod database;

/// Defines the in-process engine and its thread-safe live-loop variant.
pub mod engine;

/// Defines the events the event dispatcher classifies and routes.
pub mod event;

/// Defines the newtype identifiers and small value types used throughout the engine.
pub mod identifiers;

/// Defines the order management system regime an engine operates under.
pub mod oms;

/// Defines the order aggregate and its state machine.
pub mod order;

/// Initialises default logging for binaries embedding the engine.
pub mod logging;

/// Defines the portfolio contract: aggregates positions into P&L/exposure.
pub mod portfolio;

/// Defines the position aggregate derived from correlated fills.
pub mod position;

/// Defines the position identifier generator.
pub mod position_id;

/// Defines the strategy contract and the strategy registry.
pub mod strategy;
