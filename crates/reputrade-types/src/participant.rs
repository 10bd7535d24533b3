//! Participant records.
//!
//! A participant is registered once and never deleted. Only `reputation`
//! and `balance` change afterwards, and only through escrow issuance,
//! settlement, and reputation scoring.

use serde::{Deserialize, Serialize};

use crate::ParticipantId;

/// A trading participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Reputation score in `[0, MAX_REPUTATION]`.
    pub reputation: u32,
    /// Spendable balance; deposits locked in tokens are not included.
    pub balance: u64,
    /// PEM-encoded ECDSA public key (SPKI, `PUBLIC KEY` block).
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

impl Participant {
    /// Whether the participant may trade under the given threshold.
    #[must_use]
    pub fn is_eligible(&self, threshold: u32) -> bool {
        self.reputation >= threshold
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Participant {
    /// A participant with a placeholder key. Never passes key validation.
    pub fn dummy(id: &str, reputation: u32, balance: u64) -> Self {
        Self {
            id: ParticipantId::from(id),
            reputation,
            balance,
            public_key: String::new(),
        }
    }
}
