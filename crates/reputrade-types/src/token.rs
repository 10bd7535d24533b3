//! # TradeToken: the escrow record of one matched trade
//!
//! A token is issued once per matched order pair. Both parties' deposits
//! are locked into it at issuance and redistributed at settlement.
//!
//! ## State Machine
//!
//! ```text
//!   ┌────────┐  both confirmed  ┌─────────┐
//!   │ LOCKED ├─────────────────▶│ SUCCESS │
//!   └───┬────┘                  └─────────┘
//!       │ default / buyer short
//!       ▼
//!   ┌─────────┐
//!   │ DEFAULT │
//!   └─────────┘
//! ```
//!
//! `CREATED` exists on the wire but issuance goes straight to `LOCKED`.
//! `SUCCESS` and `DEFAULT` are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ParticipantId, ReputradeError, Result, TokenId};

/// Lifecycle state of a trade token.
///
/// Transitions are **monotonic**: only `Locked → Success | Defaulted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenState {
    #[serde(rename = "CREATED")]
    Created,
    /// Deposits are held. Confirmations may still be recorded.
    #[serde(rename = "LOCKED")]
    Locked,
    /// Delivery and payment completed; notional transferred.
    #[serde(rename = "SUCCESS")]
    Success,
    /// One or both parties failed their obligation.
    #[serde(rename = "DEFAULT")]
    Defaulted,
}

impl TokenState {
    /// Can a token move from this state to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Created, Self::Locked) | (Self::Locked, Self::Success | Self::Defaulted)
        )
    }

    /// Whether settlement has already happened.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Defaulted)
    }
}

impl std::fmt::Display for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Locked => write!(f, "LOCKED"),
            Self::Success => write!(f, "SUCCESS"),
            Self::Defaulted => write!(f, "DEFAULT"),
        }
    }
}

/// The escrow record of one matched trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeToken {
    #[serde(rename = "tokenID")]
    pub id: TokenId,
    #[serde(rename = "buyerID")]
    pub buyer_id: ParticipantId,
    #[serde(rename = "sellerID")]
    pub seller_id: ParticipantId,
    #[serde(rename = "energyAmount")]
    pub quantity: u64,
    /// Execution price: the seller's posted price.
    pub price: u64,
    /// Ledger transaction time of issuance, in seconds.
    pub timestamp: i64,
    pub state: TokenState,
    /// Zeroed once settlement redistributes it.
    pub buyer_deposit: u64,
    /// Zeroed once settlement redistributes it.
    pub seller_deposit: u64,
    /// Buyer reputation frozen at issuance.
    pub buyer_reputation: u32,
    /// Seller reputation frozen at issuance.
    pub seller_reputation: u32,
    /// Hex DER signature over the token id, present only if verified.
    #[serde(default)]
    pub buyer_signature: Option<String>,
    #[serde(default)]
    pub seller_signature: Option<String>,
    /// Payment confirmed.
    pub buyer_paid: bool,
    /// Delivery confirmed.
    pub seller_delivered: bool,
}

impl TradeToken {
    /// Trade notional `quantity * price`.
    pub fn notional(&self) -> Result<u64> {
        self.quantity
            .checked_mul(self.price)
            .ok_or(ReputradeError::Overflow {
                context: "token notional",
            })
    }

    /// Deposits currently held by this token.
    pub fn locked_total(&self) -> Result<u64> {
        self.buyer_deposit
            .checked_add(self.seller_deposit)
            .ok_or(ReputradeError::Overflow {
                context: "locked deposits",
            })
    }

    /// Issuance time as a calendar timestamp, if representable.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Fail with `InvalidState` unless the token is `LOCKED`.
    pub fn ensure_locked(&self) -> Result<()> {
        if self.state != TokenState::Locked {
            return Err(ReputradeError::InvalidState {
                token: self.id,
                expected: "LOCKED",
                actual: self.state,
            });
        }
        Ok(())
    }

    /// Fail with `InvalidState` unless the token has been settled.
    pub fn ensure_settled(&self) -> Result<()> {
        if !self.state.is_terminal() {
            return Err(ReputradeError::InvalidState {
                token: self.id,
                expected: "SUCCESS or DEFAULT",
                actual: self.state,
            });
        }
        Ok(())
    }

    /// Move to a terminal state and release the deposit fields.
    ///
    /// # Errors
    /// Returns `InvalidState` if the transition is not allowed.
    pub fn finalize(&mut self, target: TokenState) -> Result<()> {
        if !target.is_terminal() || !self.state.can_transition_to(target) {
            return Err(ReputradeError::InvalidState {
                token: self.id,
                expected: "LOCKED",
                actual: self.state,
            });
        }
        self.state = target;
        self.buyer_deposit = 0;
        self.seller_deposit = 0;
        Ok(())
    }
}
