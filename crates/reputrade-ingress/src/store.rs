//! Typed record access over a [`Ledger`].
//!
//! Wraps the raw byte namespace with the [`Record`] codec, the two
//! sequence counters, and the registered-supply accumulator. Every
//! stored record read through here is decoded strictly; a corrupt record
//! is a `Serialization` error, not a skip.

use reputrade_types::{
    Record, ReputradeError, Result,
    constants::{ORDER_COUNT_KEY, SUPPLY_KEY, TOKEN_COUNT_KEY},
};

use crate::Ledger;

/// Load a record by id, `None` if absent.
pub fn load<R: Record, L: Ledger + ?Sized>(ledger: &L, id: &str) -> Result<Option<R>> {
    ledger
        .get_state(&R::key_for(id))?
        .map(|bytes| R::decode(&bytes))
        .transpose()
}

/// Load a record by id, failing with `NotFound` if absent.
pub fn require<R: Record, L: Ledger + ?Sized>(ledger: &L, id: &str) -> Result<R> {
    load(ledger, id)?.ok_or_else(|| ReputradeError::not_found(R::KIND, id))
}

/// Whether a record with this id exists.
pub fn exists<R: Record, L: Ledger + ?Sized>(ledger: &L, id: &str) -> Result<bool> {
    Ok(ledger.get_state(&R::key_for(id))?.is_some())
}

/// Write a record under its own key.
pub fn save<R: Record, L: Ledger + ?Sized>(ledger: &mut L, record: &R) -> Result<()> {
    ledger.put_state(&record.key(), record.encode()?)
}

/// Delete a record by id.
pub fn remove<R: Record, L: Ledger + ?Sized>(ledger: &mut L, id: &str) -> Result<()> {
    ledger.del_state(&R::key_for(id))
}

/// Every record of one kind, in key order.
pub fn scan<R: Record, L: Ledger + ?Sized>(ledger: &L) -> Result<Vec<R>> {
    ledger
        .scan_prefix(R::PREFIX)?
        .into_iter()
        .map(|(_, bytes)| R::decode(&bytes))
        .collect()
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

fn read_u64<L: Ledger + ?Sized>(ledger: &L, key: &str) -> Result<u64> {
    match ledger.get_state(key)? {
        Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
        None => Ok(0),
    }
}

fn write_u64<L: Ledger + ?Sized>(ledger: &mut L, key: &str, value: u64) -> Result<()> {
    ledger.put_state(key, serde_json::to_vec(&value)?)
}

/// Current value of a counter; absent counters read as 0.
pub fn counter<L: Ledger + ?Sized>(ledger: &L, key: &str) -> Result<u64> {
    read_u64(ledger, key)
}

/// Increment a counter and return the new value.
pub fn bump_counter<L: Ledger + ?Sized>(ledger: &mut L, key: &str) -> Result<u64> {
    let next = read_u64(ledger, key)?
        .checked_add(1)
        .ok_or(ReputradeError::Overflow { context: "counter" })?;
    write_u64(ledger, key, next)?;
    Ok(next)
}

/// Write each counter as 0 if it is absent. Existing counters are kept,
/// so ids already handed out are never reissued.
pub fn init_counters<L: Ledger + ?Sized>(ledger: &mut L) -> Result<()> {
    for key in [ORDER_COUNT_KEY, TOKEN_COUNT_KEY] {
        if ledger.get_state(key)?.is_none() {
            write_u64(ledger, key, 0)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Registered supply
// ---------------------------------------------------------------------------

/// Sum of all balances introduced at registration.
pub fn registered_supply<L: Ledger + ?Sized>(ledger: &L) -> Result<u64> {
    read_u64(ledger, SUPPLY_KEY)
}

/// Add a newly registered balance to the supply accumulator.
pub fn add_registered_supply<L: Ledger + ?Sized>(ledger: &mut L, amount: u64) -> Result<u64> {
    let total = registered_supply(ledger)?
        .checked_add(amount)
        .ok_or(ReputradeError::Overflow {
            context: "registered supply",
        })?;
    write_u64(ledger, SUPPLY_KEY, total)?;
    Ok(total)
}
