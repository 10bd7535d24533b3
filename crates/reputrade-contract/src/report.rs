//! Result of one matching pass.

use serde::Serialize;

use reputrade_matchcore::{CrossPlan, ScanStats, fill_root_hex};
use reputrade_types::TokenId;

/// Summary of a `perform_matching` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    /// Tokens issued, in issuance order.
    pub tokens: Vec<TokenId>,
    /// Order records scanned.
    pub scanned: usize,
    /// Records that did not decode as a well-formed order.
    pub malformed: usize,
    /// Orders whose owner is not registered.
    pub owner_missing: usize,
    /// Orders whose owner is below the eligibility threshold.
    pub ineligible: usize,
    /// Bids left on the book.
    pub resting_bids: usize,
    /// Asks left on the book.
    pub resting_asks: usize,
    /// Hex SHA-256 over the executed crosses.
    pub fill_root: String,
}

impl MatchReport {
    pub(crate) fn new(tokens: Vec<TokenId>, stats: ScanStats, plan: &CrossPlan) -> Self {
        Self {
            tokens,
            scanned: stats.scanned,
            malformed: stats.malformed,
            owner_missing: stats.owner_missing,
            ineligible: stats.ineligible,
            resting_bids: plan.resting_bids.len(),
            resting_asks: plan.resting_asks.len(),
            fill_root: fill_root_hex(&plan.fill_root),
        }
    }

    /// Orders the scan dropped for any reason.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.malformed + self.owner_missing + self.ineligible
    }

    /// Whether the pass issued nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
