//! Delivery and payment confirmations.
//!
//! Each confirmation sets one flag on a LOCKED token. Neither moves funds;
//! settlement reads the flags later.

use reputrade_ingress::{Ledger, get_token, store};
use reputrade_types::{Result, TokenId, TradeToken};

/// Which obligation is being confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Seller delivered the energy.
    Delivery,
    /// Buyer paid.
    Payment,
}

/// Record a confirmation on a LOCKED token.
///
/// # Errors
/// `NotFound` if the token is absent, `InvalidState` if it has left LOCKED.
pub fn confirm<L: Ledger + ?Sized>(
    ledger: &mut L,
    token_id: TokenId,
    confirmation: Confirmation,
) -> Result<TradeToken> {
    let mut token = get_token(ledger, token_id)?;
    token.ensure_locked()?;

    match confirmation {
        Confirmation::Delivery => token.seller_delivered = true,
        Confirmation::Payment => token.buyer_paid = true,
    }
    store::save(ledger, &token)?;

    tracing::debug!(token = %token_id, ?confirmation, "Confirmation recorded");
    Ok(token)
}

/// Mark energy as delivered by the seller.
pub fn confirm_delivery<L: Ledger + ?Sized>(ledger: &mut L, token_id: TokenId) -> Result<TradeToken> {
    confirm(ledger, token_id, Confirmation::Delivery)
}

/// Mark the trade as paid by the buyer.
pub fn confirm_payment<L: Ledger + ?Sized>(ledger: &mut L, token_id: TokenId) -> Result<TradeToken> {
    confirm(ledger, token_id, Confirmation::Payment)
}
