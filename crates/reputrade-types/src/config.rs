//! Reputation-economy configuration and the deposit policy.
//!
//! Every replica must run with the same [`PolicyConfig`]; it is part of
//! the contract, not a node-local tunable. The defaults are the values
//! the marketplace launched with.

use serde::{Deserialize, Serialize};

use crate::{ReputradeError, Result, constants};

/// Tunables of the reputation economy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Minimum reputation to place orders and be matched (inclusive).
    pub reputation_threshold: u32,
    /// Reputation ceiling.
    pub max_reputation: u32,
    /// Deposit percentage at `max_reputation`.
    pub min_deposit_percent: u64,
    /// Deposit percentage at or below `reputation_threshold`.
    pub max_deposit_percent: u64,
    /// Reputation gained by each party of a successful trade.
    pub success_reward: u32,
    /// Reputation lost by the defaulting party.
    pub default_penalty: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            reputation_threshold: constants::REPUTATION_THRESHOLD,
            max_reputation: constants::MAX_REPUTATION,
            min_deposit_percent: constants::MIN_DEPOSIT_PERCENT,
            max_deposit_percent: constants::MAX_DEPOSIT_PERCENT,
            success_reward: constants::SUCCESS_REWARD,
            default_penalty: constants::DEFAULT_PENALTY,
        }
    }
}

impl PolicyConfig {
    /// Reject configurations under which the deposit curve is undefined.
    pub fn validate(&self) -> Result<()> {
        if self.reputation_threshold >= self.max_reputation {
            return Err(ReputradeError::invalid_argument(format!(
                "reputation threshold {} must be below max reputation {}",
                self.reputation_threshold, self.max_reputation
            )));
        }
        if self.min_deposit_percent > self.max_deposit_percent {
            return Err(ReputradeError::invalid_argument(format!(
                "min deposit percent {} exceeds max {}",
                self.min_deposit_percent, self.max_deposit_percent
            )));
        }
        if self.max_deposit_percent > 100 {
            return Err(ReputradeError::invalid_argument(format!(
                "max deposit percent {} exceeds 100",
                self.max_deposit_percent
            )));
        }
        Ok(())
    }

    /// Deposit percentage for a reputation score.
    ///
    /// Linear from `max_deposit_percent` at the threshold down to
    /// `min_deposit_percent` at `max_reputation`, floor division,
    /// clamped to `[min, max]`. Scores below the threshold pay the
    /// threshold rate.
    #[must_use]
    pub fn deposit_percent(&self, reputation: i64) -> u64 {
        let threshold = u64::from(self.reputation_threshold);
        let ceiling = u64::from(self.max_reputation);
        let rep = u64::try_from(reputation.max(0))
            .unwrap_or(0)
            .min(ceiling)
            .max(threshold);

        let span = ceiling.saturating_sub(threshold);
        if span == 0 {
            return self.max_deposit_percent;
        }
        let range = self
            .max_deposit_percent
            .saturating_sub(self.min_deposit_percent);
        let discount = (rep - threshold) * range / span;

        self.max_deposit_percent
            .saturating_sub(discount)
            .clamp(self.min_deposit_percent, self.max_deposit_percent)
    }

    /// Deposit owed on `notional` at `reputation`:
    /// `floor(notional * percent / 100)`.
    pub fn deposit_for(&self, notional: u64, reputation: u32) -> Result<u64> {
        let percent = self.deposit_percent(i64::from(reputation));
        notional
            .checked_mul(percent)
            .map(|v| v / 100)
            .ok_or(ReputradeError::Overflow {
                context: "deposit amount",
            })
    }

    /// Reputation after a successful trade, capped at `max_reputation`.
    #[must_use]
    pub fn rewarded(&self, reputation: u32) -> u32 {
        reputation
            .saturating_add(self.success_reward)
            .min(self.max_reputation)
    }

    /// Reputation after a default, floored at zero.
    #[must_use]
    pub fn penalized(&self, reputation: u32) -> u32 {
        reputation.saturating_sub(self.default_penalty)
    }
}

/// Deposit percentage under the default policy.
///
/// `20 - (rep - 20) * 15 / 80` for `rep` clamped to `[20, 100]`.
#[must_use]
pub fn deposit_percent(reputation: i64) -> u64 {
    PolicyConfig::default().deposit_percent(reputation)
}
