//! Escrow issuance: turn a matched order pair into a LOCKED trade token.
//!
//! This is the only place balances are reduced before settlement. Both
//! deposits are taken at the parties' *current* reputation, the token
//! freezes those reputations, and the filled order(s) shrink or vanish.

use reputrade_types::{
    EntityKind, Order, OrderId, OrderSide, Participant, PolicyConfig, ReputradeError, Result,
    TokenId, TokenState, TradeToken, constants::TOKEN_COUNT_KEY,
};

use crate::{Ledger, registry, signature::verify_with_pem, store};

/// Optional hex DER signatures over the token id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signatures<'a> {
    pub buyer: Option<&'a str>,
    pub seller: Option<&'a str>,
}

impl Signatures<'_> {
    /// No signatures, as used by automated matching.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

fn require_side(order: &Order, expected: OrderSide) -> Result<()> {
    if order.side != expected {
        return Err(ReputradeError::TypeMismatch {
            order: order.id.clone(),
            expected,
            actual: order.side,
        });
    }
    Ok(())
}

fn lock_deposit(party: &mut Participant, deposit: u64) -> Result<()> {
    party.balance = party
        .balance
        .checked_sub(deposit)
        .ok_or_else(|| ReputradeError::InsufficientBalance {
            participant: party.id.clone(),
            needed: deposit,
            available: party.balance,
        })?;
    Ok(())
}

fn check_signature(
    role: &str,
    party: &Participant,
    token_id: TokenId,
    signature: Option<&str>,
) -> Result<Option<String>> {
    let Some(sig) = signature else {
        return Ok(None);
    };
    let message = token_id.to_string();
    if !verify_with_pem(&party.id, &party.public_key, message.as_bytes(), sig)? {
        return Err(ReputradeError::InvalidSignature {
            reason: format!("{role} signature verification failed for {token_id}"),
        });
    }
    Ok(Some(sig.to_string()))
}

/// Issue a trade token for a buy/sell order pair.
///
/// Matched quantity is the smaller remaining quantity; the execution
/// price is the sell order's price.
///
/// # Errors
/// `NotFound`, `TypeMismatch`, `PriceMismatch`, `SelfTrade`,
/// `InsufficientBalance` (buyer checked first), `DuplicateEntity` if the
/// allocated id already names a token, `InvalidPublicKey` or
/// `InvalidSignature` for a supplied signature. On error the caller must
/// discard every write made through `ledger`.
pub fn issue_token<L: Ledger + ?Sized>(
    ledger: &mut L,
    policy: &PolicyConfig,
    buy_order_id: &OrderId,
    sell_order_id: &OrderId,
    signatures: Signatures<'_>,
) -> Result<TradeToken> {
    let mut buy: Order = store::require(ledger, buy_order_id.as_str())?;
    let mut sell: Order = store::require(ledger, sell_order_id.as_str())?;

    require_side(&buy, OrderSide::Buy)?;
    require_side(&sell, OrderSide::Sell)?;
    if !buy.crosses(&sell) {
        return Err(ReputradeError::PriceMismatch {
            bid: buy.price,
            ask: sell.price,
        });
    }
    if buy.participant_id == sell.participant_id {
        return Err(ReputradeError::SelfTrade {
            participant: buy.participant_id,
        });
    }

    let quantity = buy.quantity.min(sell.quantity);
    let price = sell.price;
    let notional = quantity
        .checked_mul(price)
        .ok_or(ReputradeError::Overflow {
            context: "trade notional",
        })?;

    let mut buyer = registry::get(ledger, &buy.participant_id)?;
    let mut seller = registry::get(ledger, &sell.participant_id)?;

    let buyer_deposit = policy.deposit_for(notional, buyer.reputation)?;
    let seller_deposit = policy.deposit_for(notional, seller.reputation)?;
    lock_deposit(&mut buyer, buyer_deposit)?;
    lock_deposit(&mut seller, seller_deposit)?;
    store::save(ledger, &buyer)?;
    store::save(ledger, &seller)?;

    let id = TokenId(store::bump_counter(ledger, TOKEN_COUNT_KEY)?);
    if store::exists::<TradeToken, _>(ledger, &id.to_string())? {
        return Err(ReputradeError::duplicate(EntityKind::Token, id));
    }
    let timestamp = ledger.tx_timestamp()?;

    let buyer_signature = check_signature("buyer", &buyer, id, signatures.buyer)?;
    let seller_signature = check_signature("seller", &seller, id, signatures.seller)?;

    let token = TradeToken {
        id,
        buyer_id: buyer.id.clone(),
        seller_id: seller.id.clone(),
        quantity,
        price,
        timestamp,
        state: TokenState::Locked,
        buyer_deposit,
        seller_deposit,
        buyer_reputation: buyer.reputation,
        seller_reputation: seller.reputation,
        buyer_signature,
        seller_signature,
        buyer_paid: false,
        seller_delivered: false,
    };
    store::save(ledger, &token)?;

    buy.quantity -= quantity;
    sell.quantity -= quantity;
    for order in [&buy, &sell] {
        if order.quantity == 0 {
            store::remove::<Order, _>(ledger, order.id.as_str())?;
        } else {
            store::save(ledger, order)?;
        }
    }

    tracing::debug!(
        token = %id,
        buyer = %token.buyer_id,
        seller = %token.seller_id,
        quantity,
        price,
        buyer_deposit,
        seller_deposit,
        "Token issued"
    );
    Ok(token)
}

/// Fetch a token, failing with `NotFound` if absent.
pub fn get_token<L: Ledger + ?Sized>(ledger: &L, id: TokenId) -> Result<TradeToken> {
    store::require(ledger, &id.to_string())
}

/// Every token, in key order.
pub fn list_tokens<L: Ledger + ?Sized>(ledger: &L) -> Result<Vec<TradeToken>> {
    store::scan(ledger)
}
