//! The ledger boundary.
//!
//! The host ledger owns storage, ordering, and consensus. RepuTrade sees
//! only a flat, sorted, string-keyed namespace plus a deterministic
//! transaction clock. [`MemoryLedger`] is the in-process reference host;
//! [`StagedLedger`] buffers one operation's writes so they land all at
//! once or not at all.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reputrade_types::Result;

/// Host ledger accessor.
pub trait Ledger {
    /// Point read. `None` if the key is absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Point write, replacing any previous value.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Point delete. Deleting an absent key is not an error.
    fn del_state(&mut self, key: &str) -> Result<()>;

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>>;

    /// Transaction time in seconds, identical on every replica.
    fn tx_timestamp(&self) -> Result<i64>;
}

// ---------------------------------------------------------------------------
// MemoryLedger
// ---------------------------------------------------------------------------

/// `BTreeMap`-backed ledger with a manually driven clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    state: BTreeMap<String, Vec<u8>>,
    now: i64,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger whose clock starts at `time`.
    #[must_use]
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            state: BTreeMap::new(),
            now: time.timestamp(),
        }
    }

    /// Set the transaction clock (seconds).
    pub fn set_timestamp(&mut self, seconds: i64) {
        self.now = seconds;
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

impl Ledger for MemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.state.insert(key.to_string(), value);
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<()> {
        self.state.remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        Ok(self
            .state
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn tx_timestamp(&self) -> Result<i64> {
        Ok(self.now)
    }
}

// ---------------------------------------------------------------------------
// StagedLedger
// ---------------------------------------------------------------------------

/// Write buffer over another ledger.
///
/// Reads see the buffered writes and deletes. Nothing reaches the inner
/// ledger until [`commit`](Self::commit); dropping the overlay discards
/// every buffered mutation.
#[derive(Debug)]
pub struct StagedLedger<'a, L: Ledger> {
    inner: &'a mut L,
    /// `Some` = staged put, `None` = staged delete.
    staged: BTreeMap<String, Option<Vec<u8>>>,
}

impl<'a, L: Ledger> StagedLedger<'a, L> {
    pub fn new(inner: &'a mut L) -> Self {
        Self {
            inner,
            staged: BTreeMap::new(),
        }
    }

    /// Number of buffered mutations.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Apply every buffered mutation to the inner ledger, in key order.
    pub fn commit(self) -> Result<()> {
        let writes = self.staged.len();
        for (key, value) in self.staged {
            match value {
                Some(bytes) => self.inner.put_state(&key, bytes)?,
                None => self.inner.del_state(&key)?,
            }
        }
        tracing::trace!(writes, "Staged writes committed");
        Ok(())
    }
}

impl<L: Ledger> Ledger for StagedLedger<'_, L> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.staged.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.inner.get_state(key),
        }
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.staged.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<()> {
        self.staged.insert(key.to_string(), None);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let mut merged: BTreeMap<String, Vec<u8>> =
            self.inner.scan_prefix(prefix)?.into_iter().collect();

        for (key, value) in self
            .staged
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(bytes) => {
                    merged.insert(key.clone(), bytes.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }

    fn tx_timestamp(&self) -> Result<i64> {
        self.inner.tx_timestamp()
    }
}
