//! Greedy single-pass crossing of a sorted book.
//!
//! Takes the best bid and best ask, crosses them while `bid >= ask`, and
//! shrinks or drops whichever side filled. Because both sides are sorted
//! toward the spread, the first non-crossing pair ends the pass.
//!
//! The plan is pure: it says *what* escrow issuance should do, in order.
//! Executing it is the caller's job.

use reputrade_types::{Order, OrderId, ParticipantId};

use crate::{MatchBook, determinism::compute_fill_root};

/// One planned fill between a bid and an ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cross {
    pub buy_order: OrderId,
    pub sell_order: OrderId,
    pub buyer: ParticipantId,
    pub seller: ParticipantId,
    /// `min` of both remaining quantities.
    pub quantity: u64,
    /// The ask's price.
    pub price: u64,
}

/// Output of one crossing pass.
#[derive(Debug, Clone, Default)]
pub struct CrossPlan {
    /// Fills in execution order.
    pub crosses: Vec<Cross>,
    /// Bids left after the pass, with remaining quantities.
    pub resting_bids: Vec<Order>,
    /// Asks left after the pass, with remaining quantities.
    pub resting_asks: Vec<Order>,
    /// Digest over `crosses`, see [`compute_fill_root`].
    pub fill_root: [u8; 32],
}

impl CrossPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.crosses.is_empty()
    }

    /// Total quantity filled across all crosses.
    #[must_use]
    pub fn filled_quantity(&self) -> u64 {
        self.crosses.iter().map(|c| c.quantity).sum()
    }
}

/// Plan every fill the greedy pass would execute on `book`.
#[must_use]
pub fn plan_crosses(book: &MatchBook) -> CrossPlan {
    let mut bids = book.bids.clone();
    let mut asks = book.asks.clone();
    let mut crosses = Vec::new();

    let (mut bi, mut ai) = (0, 0);
    while bi < bids.len() && ai < asks.len() {
        let (bid, ask) = (&bids[bi], &asks[ai]);
        if !bid.crosses(ask) {
            break;
        }

        let quantity = bid.quantity.min(ask.quantity);
        crosses.push(Cross {
            buy_order: bid.id.clone(),
            sell_order: ask.id.clone(),
            buyer: bid.participant_id.clone(),
            seller: ask.participant_id.clone(),
            quantity,
            price: ask.price,
        });

        bids[bi].quantity -= quantity;
        asks[ai].quantity -= quantity;
        if bids[bi].quantity == 0 {
            bi += 1;
        }
        if asks[ai].quantity == 0 {
            ai += 1;
        }
    }

    let fill_root = compute_fill_root(&crosses);
    CrossPlan {
        crosses,
        resting_bids: bids.split_off(bi),
        resting_asks: asks.split_off(ai),
        fill_root,
    }
}
