//! # reputrade-contract
//!
//! The **RepuTrade** transaction surface: a reputation-weighted
//! peer-to-peer energy marketplace run as deterministic state-transition
//! code over a replicated ledger.
//!
//! ## Operations
//!
//! | Method                  | Effect                                              |
//! |-------------------------|-----------------------------------------------------|
//! | `init_ledger`           | zero the order and token counters                   |
//! | `register_participant`  | new participant with balance and ECDSA key          |
//! | `create_order`          | eligibility-checked BUY/SELL order                  |
//! | `perform_matching`      | cross the book, issue one token per fill            |
//! | `issue_token`           | manual issuance for one pair, optional signatures   |
//! | `confirm_delivery`      | seller-delivered flag                               |
//! | `confirm_payment`       | buyer-paid flag                                     |
//! | `settle`                | redistribute deposits and notional, finalize token  |
//! | `update_reputation`     | reward or penalise after settlement                 |
//!
//! Each runs in its own staged overlay and commits atomically.
//!
//! ## Example
//!
//! ```ignore
//! let mut contract = Contract::new(MemoryLedger::new());
//! contract.register_participant("alice", 50, 1000, &alice_pem)?;
//! contract.register_participant("bob", 80, 1000, &bob_pem)?;
//! contract.create_order("o1", "alice", 10, 10, "SELL")?;
//! contract.create_order("o2", "bob", 10, 12, "BUY")?;
//! let report = contract.perform_matching()?;
//! ```

pub mod contract;
pub mod report;

pub use contract::Contract;
pub use report::MatchReport;
pub use reputrade_ingress::{Ledger, MemoryLedger, StagedLedger};
pub use reputrade_settlement::{Outcome, ReputationChange, SettlementReceipt, SupplyAudit};
pub use reputrade_types::{PolicyConfig, ReputradeError, Result};
