//! # reputrade-ingress
//!
//! **Ledger plane**: everything that reads or writes ledger state before
//! settlement.
//!
//! ## Architecture
//!
//! 1. **Ledger**: host accessor trait, in-memory host, staged overlay
//! 2. **store**: typed records, sequence counters, registered supply
//! 3. **registry**: participant registration and lookups
//! 4. **order_entry**: eligibility-checked order placement
//! 5. **escrow**: deposit locking and trade-token issuance
//! 6. **signature**: PEM ECDSA keys (P-256, P-384), DER signature verification
//!
//! ## Order Flow
//!
//! ```text
//! create_order() -> book -> MatchCore plan -> issue_token() -> LOCKED token
//! ```
//!
//! Every function takes the ledger explicitly. Run each caller-visible
//! operation against a [`StagedLedger`] and commit only on success.

pub mod escrow;
pub mod ledger;
pub mod order_entry;
pub mod registry;
pub mod signature;
pub mod store;

pub use escrow::{Signatures, get_token, issue_token, list_tokens};
pub use ledger::{Ledger, MemoryLedger, StagedLedger};
pub use order_entry::{OrderRequest, create_order, get_order, list_orders, order_exists};
pub use signature::{EcdsaKey, decode_public_key, verify_with_pem};
