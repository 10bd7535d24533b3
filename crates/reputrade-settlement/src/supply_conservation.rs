//! Value conservation audit.
//!
//! Invariant, checked against a full ledger scan:
//! ```text
//! Σ participant.balance + Σ locked deposits (LOCKED tokens) == registered supply
//! ```
//!
//! Registration is the only operation allowed to change the right-hand
//! side. If the two ever differ, value has been created or destroyed.

use serde::Serialize;

use reputrade_ingress::{Ledger, registry, store};
use reputrade_types::{ReputradeError, Result, TokenState, TradeToken};

/// Value held by participants and tokens at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyAudit {
    /// Sum of spendable balances.
    pub balances: u64,
    /// Sum of deposits held by LOCKED tokens.
    pub locked: u64,
    pub participants: usize,
    pub open_tokens: usize,
}

impl SupplyAudit {
    /// Scan every participant and token on the ledger.
    pub fn scan<L: Ledger + ?Sized>(ledger: &L) -> Result<Self> {
        let mut audit = Self::default();

        for participant in registry::list(ledger)? {
            audit.balances = audit
                .balances
                .checked_add(participant.balance)
                .ok_or(ReputradeError::Overflow {
                    context: "balance sum",
                })?;
            audit.participants += 1;
        }

        for token in store::scan::<TradeToken, _>(ledger)? {
            if token.state != TokenState::Locked {
                continue;
            }
            audit.locked = audit
                .locked
                .checked_add(token.locked_total()?)
                .ok_or(ReputradeError::Overflow {
                    context: "locked deposit sum",
                })?;
            audit.open_tokens += 1;
        }

        Ok(audit)
    }

    /// Total value in the system.
    pub fn total(&self) -> Result<u64> {
        self.balances
            .checked_add(self.locked)
            .ok_or(ReputradeError::Overflow {
                context: "total value",
            })
    }

    /// Compare against the expected supply.
    ///
    /// # Errors
    /// Returns [`ReputradeError::SupplyInvariantViolation`] if they differ.
    pub fn verify(&self, expected: u64) -> Result<()> {
        let actual = self.total()?;
        if actual != expected {
            tracing::error!(
                actual,
                expected,
                balances = self.balances,
                locked = self.locked,
                "Supply invariant violated"
            );
            return Err(ReputradeError::SupplyInvariantViolation {
                reason: format!(
                    "total value {actual} != registered supply {expected} \
                     (balances={}, locked={})",
                    self.balances, self.locked
                ),
            });
        }
        Ok(())
    }
}

/// Scan the ledger and check it against the registered supply.
pub fn verify_conservation<L: Ledger + ?Sized>(ledger: &L) -> Result<SupplyAudit> {
    let audit = SupplyAudit::scan(ledger)?;
    audit.verify(store::registered_supply(ledger)?)?;
    Ok(audit)
}

#[cfg(test)]
mod tests {
    use reputrade_ingress::MemoryLedger;
    use reputrade_types::{Participant, ParticipantId, TokenId};

    use super::*;

    fn token(id: u64, state: TokenState, bd: u64, sd: u64) -> TradeToken {
        TradeToken {
            id: TokenId(id),
            buyer_id: ParticipantId::from("B"),
            seller_id: ParticipantId::from("A"),
            quantity: 1,
            price: 1,
            timestamp: 0,
            state,
            buyer_deposit: bd,
            seller_deposit: sd,
            buyer_reputation: 50,
            seller_reputation: 50,
            buyer_signature: None,
            seller_signature: None,
            buyer_paid: false,
            seller_delivered: false,
        }
    }

    #[test]
    fn empty_ledger_is_conserved() {
        let ledger = MemoryLedger::new();
        let audit = verify_conservation(&ledger).unwrap();
        assert_eq!(audit, SupplyAudit::default());
    }

    #[test]
    fn counts_only_locked_tokens() {
        let mut ledger = MemoryLedger::new();
        store::save(&mut ledger, &Participant::dummy("A", 50, 985)).unwrap();
        store::save(&mut ledger, &Participant::dummy("B", 80, 991)).unwrap();
        store::save(&mut ledger, &token(1, TokenState::Locked, 9, 15)).unwrap();
        store::save(&mut ledger, &token(2, TokenState::Success, 0, 0)).unwrap();

        let audit = SupplyAudit::scan(&ledger).unwrap();
        assert_eq!(audit.balances, 1976);
        assert_eq!(audit.locked, 24);
        assert_eq!(audit.total().unwrap(), 2000);
        assert_eq!((audit.participants, audit.open_tokens), (2, 1));
        assert!(audit.verify(2000).is_ok());
    }

    #[test]
    fn mismatch_is_violation() {
        let mut ledger = MemoryLedger::new();
        store::save(&mut ledger, &Participant::dummy("A", 50, 1001)).unwrap();
        store::add_registered_supply(&mut ledger, 1000).unwrap();
        let err = verify_conservation(&ledger).unwrap_err();
        assert!(matches!(err, ReputradeError::SupplyInvariantViolation { .. }));
        assert!(format!("{err}").contains("1001"));
    }
}
