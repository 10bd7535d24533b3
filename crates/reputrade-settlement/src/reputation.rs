//! Post-settlement reputation scoring.
//!
//! Kept apart from fund movement so reputation effects can be audited on
//! their own. Success rewards both parties; a default penalises only the
//! defaulting party.
//!
//! There is no record that a token has been scored: calling this twice
//! on the same token applies the adjustment twice.

use serde::Serialize;

use reputrade_ingress::{Ledger, get_token, registry};
use reputrade_types::{PolicyConfig, Result, TokenId};

use crate::outcome::{Outcome, Party};

/// Reputation before and after scoring, per party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationChange {
    pub token_id: TokenId,
    pub outcome: Outcome,
    pub buyer_before: u32,
    pub buyer_after: u32,
    pub seller_before: u32,
    pub seller_after: u32,
}

/// Adjust both parties' reputation for a settled token.
///
/// # Errors
/// `NotFound` for a missing token or party, `InvalidState` if the token
/// has not been settled yet.
pub fn update_reputation<L: Ledger + ?Sized>(
    ledger: &mut L,
    policy: &PolicyConfig,
    token_id: TokenId,
) -> Result<ReputationChange> {
    let token = get_token(ledger, token_id)?;
    let outcome = Outcome::of_settled(&token)?;

    let buyer = registry::get(ledger, &token.buyer_id)?;
    let seller = registry::get(ledger, &token.seller_id)?;

    let score = |party: Party, current: u32| match outcome.defaulter() {
        None => policy.rewarded(current),
        Some(defaulter) if defaulter == party => policy.penalized(current),
        Some(_) => current,
    };
    let buyer_after = score(Party::Buyer, buyer.reputation);
    let seller_after = score(Party::Seller, seller.reputation);

    registry::update_reputation(ledger, &buyer.id, buyer_after)?;
    registry::update_reputation(ledger, &seller.id, seller_after)?;

    tracing::debug!(
        token = %token_id,
        %outcome,
        buyer = %buyer.id,
        buyer_before = buyer.reputation,
        buyer_after,
        seller = %seller.id,
        seller_before = seller.reputation,
        seller_after,
        "Reputation updated"
    );

    Ok(ReputationChange {
        token_id,
        outcome,
        buyer_before: buyer.reputation,
        buyer_after,
        seller_before: seller.reputation,
        seller_after,
    })
}
