//! # reputrade-matchcore
//!
//! **Pure deterministic matching for RepuTrade.**
//!
//! MatchCore is the compute plane -- it takes a snapshot of the stored
//! order book plus a reputation lookup and produces a deterministic plan
//! of crosses. It has:
//!
//! - **Zero side effects**: no ledger writes, no balance checks, no escrow
//! - **Deterministic output**: same snapshot -> same plan on every replica
//! - **Best-effort scan**: unparseable or ineligible orders are skipped,
//!   never fatal
//!
//! Executing a plan (locking deposits, issuing tokens) belongs to the
//! ingress plane.

pub mod book;
pub mod crossing;
pub mod determinism;

pub use book::{MatchBook, ScanStats, build_book};
pub use crossing::{Cross, CrossPlan, plan_crosses};
pub use determinism::{compute_fill_root, fill_root_hex, verify_fill_root};
