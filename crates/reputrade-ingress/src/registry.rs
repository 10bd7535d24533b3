//! Participant registry.
//!
//! Registration is the only operation that introduces value; it also
//! records the new balance in the registered-supply accumulator so the
//! conservation audit has something to compare against.

use reputrade_types::{EntityKind, Participant, ParticipantId, PolicyConfig, ReputradeError, Result};

use crate::{Ledger, signature::decode_public_key, store};

/// Whether a participant is registered.
pub fn exists<L: Ledger + ?Sized>(ledger: &L, id: &ParticipantId) -> Result<bool> {
    store::exists::<Participant, _>(ledger, id.as_str())
}

/// Register a participant.
///
/// Checks run in this order: duplicate id, negative balance, reputation
/// out of `[0, max_reputation]`, malformed public key. Nothing is
/// written unless all pass.
pub fn create<L: Ledger + ?Sized>(
    ledger: &mut L,
    policy: &PolicyConfig,
    id: &ParticipantId,
    reputation: i64,
    balance: i64,
    public_key_pem: &str,
) -> Result<Participant> {
    if exists(ledger, id)? {
        return Err(ReputradeError::duplicate(EntityKind::Participant, id));
    }

    let balance = u64::try_from(balance)
        .map_err(|_| ReputradeError::invalid_argument("balance cannot be negative"))?;

    let reputation = u32::try_from(reputation)
        .ok()
        .filter(|r| *r <= policy.max_reputation)
        .ok_or_else(|| {
            ReputradeError::invalid_argument(format!(
                "reputation {reputation} outside [0, {}]",
                policy.max_reputation
            ))
        })?;

    decode_public_key(id, public_key_pem)?;

    let participant = Participant {
        id: id.clone(),
        reputation,
        balance,
        public_key: public_key_pem.to_string(),
    };
    store::save(ledger, &participant)?;
    let supply = store::add_registered_supply(ledger, balance)?;

    tracing::debug!(
        participant = %id,
        reputation,
        balance,
        registered_supply = supply,
        "Participant registered"
    );
    Ok(participant)
}

/// Fetch a participant, failing with `NotFound` if absent.
pub fn get<L: Ledger + ?Sized>(ledger: &L, id: &ParticipantId) -> Result<Participant> {
    store::require(ledger, id.as_str())
}

/// Current reputation of a participant, `None` if not registered.
pub fn reputation_of<L: Ledger + ?Sized>(ledger: &L, id: &ParticipantId) -> Result<Option<u32>> {
    Ok(store::load::<Participant, _>(ledger, id.as_str())?.map(|p| p.reputation))
}

/// Overwrite a participant's balance.
pub fn update_balance<L: Ledger + ?Sized>(
    ledger: &mut L,
    id: &ParticipantId,
    balance: u64,
) -> Result<Participant> {
    let mut participant = get(ledger, id)?;
    participant.balance = balance;
    store::save(ledger, &participant)?;
    Ok(participant)
}

/// Overwrite a participant's reputation.
pub fn update_reputation<L: Ledger + ?Sized>(
    ledger: &mut L,
    id: &ParticipantId,
    reputation: u32,
) -> Result<Participant> {
    let mut participant = get(ledger, id)?;
    participant.reputation = reputation;
    store::save(ledger, &participant)?;
    Ok(participant)
}

/// Every registered participant, in key order.
pub fn list<L: Ledger + ?Sized>(ledger: &L) -> Result<Vec<Participant>> {
    store::scan(ledger)
}
