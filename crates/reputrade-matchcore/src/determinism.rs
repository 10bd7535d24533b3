//! Fill-root digest for cross-replica consistency.
//!
//! Every replica running the same matching pass over the same ledger
//! snapshot must plan the same crosses in the same order. The fill root
//! lets two replicas compare a whole pass with one 32-byte value.

use sha2::{Digest, Sha256};

use crate::Cross;

/// Deterministic SHA-256 over an ordered list of crosses.
///
/// Covers both order ids, both owners, quantity, and price. Each string
/// is length-prefixed so adjacent fields cannot run together.
#[must_use]
pub fn compute_fill_root(crosses: &[Cross]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"reputrade:fill_root:v1:");
    hasher.update((crosses.len() as u64).to_le_bytes());

    for cross in crosses {
        for field in [
            cross.buy_order.as_str(),
            cross.sell_order.as_str(),
            cross.buyer.as_str(),
            cross.seller.as_str(),
        ] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        hasher.update(cross.quantity.to_le_bytes());
        hasher.update(cross.price.to_le_bytes());
    }

    hasher.finalize().into()
}

/// Recompute the root over `crosses` and compare.
#[must_use]
pub fn verify_fill_root(crosses: &[Cross], expected_root: &[u8; 32]) -> bool {
    compute_fill_root(crosses) == *expected_root
}

/// Lowercase hex rendering used in logs and reports.
#[must_use]
pub fn fill_root_hex(root: &[u8; 32]) -> String {
    hex::encode(root)
}

#[cfg(test)]
mod tests {
    use reputrade_types::{OrderId, ParticipantId};

    use super::*;

    fn make_cross(buy: &str, sell: &str, quantity: u64) -> Cross {
        Cross {
            buy_order: OrderId::from(buy),
            sell_order: OrderId::from(sell),
            buyer: ParticipantId::from("b"),
            seller: ParticipantId::from("a"),
            quantity,
            price: 10,
        }
    }

    #[test]
    fn empty_is_deterministic() {
        assert_eq!(compute_fill_root(&[]), compute_fill_root(&[]));
    }

    #[test]
    fn different_fills_different_root() {
        let a = compute_fill_root(&[make_cross("o1", "o2", 5)]);
        let b = compute_fill_root(&[make_cross("o1", "o2", 6)]);
        assert_ne!(a, b);
    }

    #[test]
    fn order_matters() {
        let c1 = make_cross("o1", "o2", 1);
        let c2 = make_cross("o3", "o4", 1);
        assert_ne!(
            compute_fill_root(&[c1.clone(), c2.clone()]),
            compute_fill_root(&[c2, c1])
        );
    }

    #[test]
    fn ids_do_not_run_together() {
        let a = compute_fill_root(&[make_cross("ab", "c", 1)]);
        let b = compute_fill_root(&[make_cross("a", "bc", 1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn verify_roundtrip() {
        let crosses = vec![make_cross("o1", "o2", 3)];
        let root = compute_fill_root(&crosses);
        assert!(verify_fill_root(&crosses, &root));
        assert!(!verify_fill_root(&crosses, &[0xAB; 32]));
    }

    #[test]
    fn hex_is_64_chars() {
        assert_eq!(fill_root_hex(&compute_fill_root(&[])).len(), 64);
    }
}
