//! Settlement decision table.
//!
//! Settlement is split into a pure decision and a single application:
//!
//! ```text
//! flags ──classify──▶ Outcome ──decide(balance)──▶ SettlementPlan ──apply──▶ ledger
//! ```
//!
//! | paid | delivered | outcome        | buyer receives        | seller receives         | state   |
//! |------|-----------|----------------|-----------------------|-------------------------|---------|
//! | yes  | yes       | Success        | `bd - notional`       | `notional + sd`         | SUCCESS |
//! | no   | yes       | BuyerDefault   | 0                     | `bd + sd`               | DEFAULT |
//! | yes  | no        | SellerDefault  | `bd + sd`             | 0                       | DEFAULT |
//! | no   | no        | Unconfirmed    | `bd + sd`             | 0                       | DEFAULT |
//!
//! A Success whose buyer cannot cover the notional is reclassified as
//! BuyerDefault. In every row the two credits sum to `bd + sd`, so the
//! released deposits are the only value that moves between the token
//! and the balances.

use serde::{Deserialize, Serialize};

use reputrade_types::{ReputradeError, Result, TokenState, TradeToken};

/// One side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Party {
    Buyer,
    Seller,
}

/// How a LOCKED token resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Delivered and paid.
    Success,
    /// Delivered but not paid, or paid but the buyer is short.
    BuyerDefault,
    /// Paid but not delivered.
    SellerDefault,
    /// Neither confirmed. Paid out like `SellerDefault`.
    Unconfirmed,
}

impl Outcome {
    /// Classify a token from its confirmation flags alone.
    #[must_use]
    pub fn classify(token: &TradeToken) -> Self {
        match (token.buyer_paid, token.seller_delivered) {
            (true, true) => Self::Success,
            (false, true) => Self::BuyerDefault,
            (true, false) => Self::SellerDefault,
            (false, false) => Self::Unconfirmed,
        }
    }

    /// Outcome of a token that has already been settled.
    ///
    /// A DEFAULT token with both flags set can only come from the
    /// short-buyer fallback, so it is a buyer default.
    pub fn of_settled(token: &TradeToken) -> Result<Self> {
        token.ensure_settled()?;
        Ok(match (token.state, Self::classify(token)) {
            (TokenState::Success, _) => Self::Success,
            (_, Self::Success) => Self::BuyerDefault,
            (_, other) => other,
        })
    }

    /// Terminal token state for this outcome.
    #[must_use]
    pub fn state(self) -> TokenState {
        match self {
            Self::Success => TokenState::Success,
            Self::BuyerDefault | Self::SellerDefault | Self::Unconfirmed => TokenState::Defaulted,
        }
    }

    /// The party penalised for this outcome, if any.
    #[must_use]
    pub fn defaulter(self) -> Option<Party> {
        match self {
            Self::Success => None,
            Self::BuyerDefault => Some(Party::Buyer),
            Self::SellerDefault | Self::Unconfirmed => Some(Party::Seller),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::BuyerDefault => write!(f, "BUYER_DEFAULT"),
            Self::SellerDefault => write!(f, "SELLER_DEFAULT"),
            Self::Unconfirmed => write!(f, "UNCONFIRMED"),
        }
    }
}

/// The balance changes and final state a settlement will apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementPlan {
    pub outcome: Outcome,
    /// `true` if the flags said Success but the buyer could not pay.
    pub reclassified: bool,
    /// Signed change to the buyer's balance.
    pub buyer_delta: i128,
    /// Signed change to the seller's balance.
    pub seller_delta: i128,
}

impl SettlementPlan {
    /// Terminal token state.
    #[must_use]
    pub fn state(&self) -> TokenState {
        self.outcome.state()
    }
}

/// Decide how `token` settles given the buyer's current balance.
pub fn decide(token: &TradeToken, buyer_balance: u64) -> Result<SettlementPlan> {
    let bd = i128::from(token.buyer_deposit);
    let sd = i128::from(token.seller_deposit);
    let notional = token.notional()?;

    let mut outcome = Outcome::classify(token);
    let mut reclassified = false;
    if outcome == Outcome::Success && buyer_balance < notional {
        outcome = Outcome::BuyerDefault;
        reclassified = true;
    }

    let notional = i128::from(notional);
    let (buyer_delta, seller_delta) = match outcome {
        Outcome::Success => (bd - notional, notional + sd),
        Outcome::BuyerDefault => (0, bd + sd),
        Outcome::SellerDefault | Outcome::Unconfirmed => (bd + sd, 0),
    };

    Ok(SettlementPlan {
        outcome,
        reclassified,
        buyer_delta,
        seller_delta,
    })
}

/// Apply a signed delta to a balance.
pub fn apply_delta(balance: u64, delta: i128) -> Result<u64> {
    u64::try_from(i128::from(balance) + delta).map_err(|_| ReputradeError::Overflow {
        context: "settlement balance",
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use reputrade_types::{ParticipantId, TokenId};

    use super::*;

    fn token(paid: bool, delivered: bool) -> TradeToken {
        TradeToken {
            id: TokenId(1),
            buyer_id: ParticipantId::from("B"),
            seller_id: ParticipantId::from("A"),
            quantity: 10,
            price: 10,
            timestamp: 0,
            state: TokenState::Locked,
            buyer_deposit: 9,
            seller_deposit: 15,
            buyer_reputation: 80,
            seller_reputation: 50,
            buyer_signature: None,
            seller_signature: None,
            buyer_paid: paid,
            seller_delivered: delivered,
        }
    }

    #[test]
    fn classification_table() {
        assert_eq!(Outcome::classify(&token(true, true)), Outcome::Success);
        assert_eq!(Outcome::classify(&token(false, true)), Outcome::BuyerDefault);
        assert_eq!(Outcome::classify(&token(true, false)), Outcome::SellerDefault);
        assert_eq!(Outcome::classify(&token(false, false)), Outcome::Unconfirmed);
    }

    #[test]
    fn success_moves_notional() {
        let plan = decide(&token(true, true), 991).unwrap();
        assert_eq!(plan.outcome, Outcome::Success);
        assert!(!plan.reclassified);
        assert_eq!((plan.buyer_delta, plan.seller_delta), (9 - 100, 100 + 15));
        assert_eq!(plan.state(), TokenState::Success);
    }

    #[test]
    fn short_buyer_is_reclassified() {
        let plan = decide(&token(true, true), 99).unwrap();
        assert_eq!(plan.outcome, Outcome::BuyerDefault);
        assert!(plan.reclassified);
        assert_eq!((plan.buyer_delta, plan.seller_delta), (0, 24));
        assert_eq!(plan.state(), TokenState::Defaulted);
    }

    #[test]
    fn exact_balance_is_enough() {
        let plan = decide(&token(true, true), 100).unwrap();
        assert_eq!(plan.outcome, Outcome::Success);
    }

    #[test]
    fn seller_side_defaults_pay_the_buyer() {
        for t in [token(true, false), token(false, false)] {
            let plan = decide(&t, 0).unwrap();
            assert_eq!((plan.buyer_delta, plan.seller_delta), (24, 0));
            assert_eq!(plan.outcome.defaulter(), Some(Party::Seller));
        }
    }

    #[test]
    fn settled_outcome_recovers_reclassification() {
        let mut t = token(true, true);
        t.finalize(TokenState::Defaulted).unwrap();
        assert_eq!(Outcome::of_settled(&t).unwrap(), Outcome::BuyerDefault);

        let mut t = token(true, true);
        t.finalize(TokenState::Success).unwrap();
        assert_eq!(Outcome::of_settled(&t).unwrap(), Outcome::Success);

        let mut t = token(false, false);
        t.finalize(TokenState::Defaulted).unwrap();
        assert_eq!(Outcome::of_settled(&t).unwrap(), Outcome::Unconfirmed);
    }

    #[test]
    fn settled_outcome_requires_terminal_state() {
        let err = Outcome::of_settled(&token(true, true)).unwrap_err();
        assert!(matches!(err, ReputradeError::InvalidState { .. }));
    }

    #[test]
    fn apply_delta_rejects_negative_result() {
        assert_eq!(apply_delta(10, -10).unwrap(), 0);
        assert!(apply_delta(10, -11).is_err());
        assert!(apply_delta(u64::MAX, 1).is_err());
    }

    proptest! {
        #[test]
        fn every_branch_releases_exactly_the_deposits(
            paid in any::<bool>(),
            delivered in any::<bool>(),
            quantity in 1u64..1_000,
            price in 1u64..1_000,
            bd in 0u64..10_000,
            sd in 0u64..10_000,
            buyer_balance in 0u64..2_000_000,
        ) {
            let mut t = token(paid, delivered);
            t.quantity = quantity;
            t.price = price;
            t.buyer_deposit = bd;
            t.seller_deposit = sd;

            let plan = decide(&t, buyer_balance).unwrap();
            prop_assert_eq!(plan.buyer_delta + plan.seller_delta, i128::from(bd) + i128::from(sd));
            prop_assert!(apply_delta(buyer_balance, plan.buyer_delta).is_ok());
        }
    }
}
