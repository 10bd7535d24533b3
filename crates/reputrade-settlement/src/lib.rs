//! # reputrade-settlement
//!
//! **Finality plane**: confirmations, settlement, reputation scoring, and
//! the value-conservation audit.
//!
//! ## Lifecycle
//!
//! ```text
//! LOCKED ──confirm_delivery / confirm_payment──▶ LOCKED (flags set)
//!        ──settle──▶ SUCCESS | DEFAULT ──update_reputation──▶ (scores adjusted)
//! ```
//!
//! Settlement is a pure decision table ([`outcome`]) applied once
//! ([`engine`]). Every path releases exactly the token's locked deposits
//! into the two parties' balances, which [`SupplyAudit`] checks
//! against the registered supply.

pub mod confirmation;
pub mod engine;
pub mod outcome;
pub mod reputation;
pub mod supply_conservation;

pub use confirmation::{Confirmation, confirm, confirm_delivery, confirm_payment};
pub use engine::{SettlementReceipt, settle};
pub use outcome::{Outcome, Party, SettlementPlan, decide};
pub use reputation::{ReputationChange, update_reputation};
pub use supply_conservation::{SupplyAudit, verify_conservation};
