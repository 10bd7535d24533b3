//! Snapshot scan: turn stored order records into a sorted, eligible book.
//!
//! The scan is a pure function over `(key, bytes)` pairs and a reputation
//! lookup, so it can be tested without a ledger. Records that fail to
//! parse, whose owner is gone, or whose owner has fallen below the
//! eligibility threshold are skipped and counted, never fatal.

use reputrade_types::{Order, OrderSide, ParticipantId, Record, Result};

/// Counters describing what the scan kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Records seen.
    pub scanned: usize,
    /// Records that did not decode as a well-formed order.
    pub malformed: usize,
    /// Orders whose owner is no longer registered.
    pub owner_missing: usize,
    /// Orders whose owner is below the eligibility threshold.
    pub ineligible: usize,
}

impl ScanStats {
    /// Total number of records dropped by the scan.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.malformed + self.owner_missing + self.ineligible
    }
}

/// Eligible orders partitioned by side and sorted toward the spread.
///
/// Bids are sorted by price descending, asks ascending. Both sorts are
/// stable, so equal prices keep their scan order.
#[derive(Debug, Clone, Default)]
pub struct MatchBook {
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
    pub stats: ScanStats,
}

impl MatchBook {
    /// Highest bid price, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.first().map(|o| o.price)
    }

    /// Lowest ask price, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.first().map(|o| o.price)
    }

    /// Whether the best bid reaches the best ask.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        matches!((self.best_bid(), self.best_ask()), (Some(bid), Some(ask)) if bid >= ask)
    }

    /// Number of orders on both sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// Build the matchable book from a prefix-scan snapshot.
///
/// `reputation_of` returns the owner's *current* reputation, or `None`
/// if the owner is not registered. Eligibility is re-checked here even
/// though it was checked when the order was placed.
///
/// # Errors
/// Only errors from `reputation_of` are propagated.
pub fn build_book<I, F>(records: I, mut reputation_of: F, threshold: u32) -> Result<MatchBook>
where
    I: IntoIterator<Item = (String, Vec<u8>)>,
    F: FnMut(&ParticipantId) -> Result<Option<u32>>,
{
    let mut book = MatchBook::default();

    for (key, bytes) in records {
        book.stats.scanned += 1;

        let order = match Order::decode(&bytes) {
            Ok(order) if order.quantity > 0 && order.price > 0 => order,
            Ok(_) => {
                tracing::warn!(key = %key, "Skipping order with zero quantity or price");
                book.stats.malformed += 1;
                continue;
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Skipping unparseable order record");
                book.stats.malformed += 1;
                continue;
            }
        };

        let Some(reputation) = reputation_of(&order.participant_id)? else {
            tracing::debug!(order = %order.id, owner = %order.participant_id, "Owner missing");
            book.stats.owner_missing += 1;
            continue;
        };
        if reputation < threshold {
            tracing::debug!(
                order = %order.id,
                owner = %order.participant_id,
                reputation,
                threshold,
                "Owner below eligibility threshold"
            );
            book.stats.ineligible += 1;
            continue;
        }

        match order.side {
            OrderSide::Buy => book.bids.push(order),
            OrderSide::Sell => book.asks.push(order),
        }
    }

    book.bids.sort_by(|a, b| b.price.cmp(&a.price));
    book.asks.sort_by_key(|o| o.price);

    Ok(book)
}
