//! # reputrade-types
//!
//! Shared records, errors, and policy for the **RepuTrade** energy marketplace.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ParticipantId`], [`OrderId`], [`TokenId`]
//! - **Participant model**: [`Participant`]
//! - **Order model**: [`Order`], [`OrderSide`]
//! - **Trade token model**: [`TradeToken`], [`TokenState`]
//! - **Ledger records**: [`Record`] (JSON codec + key prefix per entity)
//! - **Policy**: [`PolicyConfig`], [`deposit_percent`]
//! - **Errors**: [`ReputradeError`] with `RT_ERR_` prefix codes
//! - **Constants**: key prefixes, counter keys, policy defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;
pub mod participant;
pub mod record;
pub mod token;

// Re-export all primary types at crate root for ergonomic imports:
//   use reputrade_types::{Order, OrderSide, TradeToken, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use participant::*;
pub use record::*;
pub use token::*;

// Constants are accessed via `reputrade_types::constants::FOO`
// (not re-exported to avoid name collisions).
