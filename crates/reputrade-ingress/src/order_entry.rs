//! Order entry.
//!
//! Placing an order checks eligibility only. No funds move until the
//! order is matched and escrow issuance locks the deposits.

use reputrade_types::{
    EntityKind, Order, OrderId, OrderSide, ParticipantId, PolicyConfig, ReputradeError, Result,
    constants::ORDER_COUNT_KEY,
};

use crate::{Ledger, registry, store};

/// Caller-supplied fields of a new order, before validation.
#[derive(Debug, Clone)]
pub struct OrderRequest<'a> {
    pub id: &'a str,
    pub participant_id: &'a str,
    pub quantity: i64,
    pub price: i64,
    pub side: &'a str,
}

/// Validate and store a new order.
///
/// Fails, in order, with `DuplicateEntity`, `InvalidArgument` (side tag,
/// non-positive quantity or price), `NotFound` (owner), `ReputationTooLow`,
/// or `InsufficientBalance` when the owner cannot cover the deposit the
/// full order would require at current reputation.
pub fn create_order<L: Ledger + ?Sized>(
    ledger: &mut L,
    policy: &PolicyConfig,
    request: &OrderRequest<'_>,
) -> Result<Order> {
    if store::exists::<Order, _>(ledger, request.id)? {
        return Err(ReputradeError::duplicate(EntityKind::Order, request.id));
    }

    let side: OrderSide = request.side.parse()?;

    let (quantity, price) = match (u64::try_from(request.quantity), u64::try_from(request.price)) {
        (Ok(q), Ok(p)) if q > 0 && p > 0 => (q, p),
        _ => {
            return Err(ReputradeError::invalid_argument(format!(
                "energy amount and price must be positive integers, got {} and {}",
                request.quantity, request.price
            )));
        }
    };

    let owner_id = ParticipantId::from(request.participant_id);
    let owner = registry::get(ledger, &owner_id)?;
    if !owner.is_eligible(policy.reputation_threshold) {
        return Err(ReputradeError::ReputationTooLow {
            participant: owner_id,
            reputation: owner.reputation,
            threshold: policy.reputation_threshold,
        });
    }

    let order = Order {
        id: OrderId::from(request.id),
        participant_id: owner_id,
        side,
        quantity,
        price,
    };

    let required = policy.deposit_for(order.notional()?, owner.reputation)?;
    if owner.balance < required {
        return Err(ReputradeError::InsufficientBalance {
            participant: order.participant_id,
            needed: required,
            available: owner.balance,
        });
    }

    store::save(ledger, &order)?;
    let seq = store::bump_counter(ledger, ORDER_COUNT_KEY)?;

    tracing::debug!(
        order = %order.id,
        owner = %order.participant_id,
        side = %order.side,
        quantity,
        price,
        required_deposit = required,
        seq,
        "Order accepted"
    );
    Ok(order)
}

/// Fetch an order, failing with `NotFound` if absent.
pub fn get_order<L: Ledger + ?Sized>(ledger: &L, id: &OrderId) -> Result<Order> {
    store::require(ledger, id.as_str())
}

/// Whether an order is still on the book.
pub fn order_exists<L: Ledger + ?Sized>(ledger: &L, id: &OrderId) -> Result<bool> {
    store::exists::<Order, _>(ledger, id.as_str())
}

/// Every resting order, in key order. Corrupt records are an error here.
pub fn list_orders<L: Ledger + ?Sized>(ledger: &L) -> Result<Vec<Order>> {
    store::scan(ledger)
}
