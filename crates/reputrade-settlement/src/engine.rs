//! Settlement engine.
//!
//! Resolves a LOCKED token once: decide the plan, apply both balance
//! deltas, finalize the token. The state check on entry is what makes a
//! second `settle` fail instead of paying out twice.

use serde::Serialize;

use reputrade_ingress::{Ledger, get_token, registry, store};
use reputrade_types::{ReputradeError, Result, TokenId};

use crate::outcome::{Outcome, apply_delta, decide};

/// What a settlement did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    pub token_id: TokenId,
    pub outcome: Outcome,
    /// The flags said Success but the buyer could not cover the notional.
    pub reclassified: bool,
    /// Deposits released from the token.
    pub released: u64,
    pub buyer_balance: u64,
    pub seller_balance: u64,
}

/// Settle a LOCKED token.
///
/// # Errors
/// `NotFound` for a missing token or party, `InvalidState` if the token
/// is not LOCKED, `Overflow` if a balance would leave `u64`.
pub fn settle<L: Ledger + ?Sized>(ledger: &mut L, token_id: TokenId) -> Result<SettlementReceipt> {
    let mut token = get_token(ledger, token_id)?;
    token.ensure_locked()?;
    if token.buyer_id == token.seller_id {
        return Err(ReputradeError::SelfTrade {
            participant: token.buyer_id,
        });
    }

    let mut buyer = registry::get(ledger, &token.buyer_id)?;
    let mut seller = registry::get(ledger, &token.seller_id)?;

    let plan = decide(&token, buyer.balance)?;
    if plan.reclassified {
        tracing::warn!(
            token = %token_id,
            buyer = %buyer.id,
            balance = buyer.balance,
            notional = token.quantity.saturating_mul(token.price),
            "Buyer cannot cover notional; settling as buyer default"
        );
    }

    let released = token.locked_total()?;
    buyer.balance = apply_delta(buyer.balance, plan.buyer_delta)?;
    seller.balance = apply_delta(seller.balance, plan.seller_delta)?;
    token.finalize(plan.state())?;

    registry::update_balance(ledger, &buyer.id, buyer.balance)?;
    registry::update_balance(ledger, &seller.id, seller.balance)?;
    store::save(ledger, &token)?;

    tracing::info!(
        token = %token_id,
        outcome = %plan.outcome,
        reclassified = plan.reclassified,
        released,
        buyer_balance = buyer.balance,
        seller_balance = seller.balance,
        "Token settled"
    );

    Ok(SettlementReceipt {
        token_id,
        outcome: plan.outcome,
        reclassified: plan.reclassified,
        released,
        buyer_balance: buyer.balance,
        seller_balance: seller.balance,
    })
}
