//! The exposed operation surface.
//!
//! One method per ledger transaction. Every mutating method runs against
//! a [`StagedLedger`] over the host ledger and commits only if the whole
//! operation succeeds, so a failure never leaves partial writes behind.

use reputrade_ingress::{
    Ledger, OrderRequest, Signatures, StagedLedger, escrow, order_entry, registry, signature,
    store,
};
use reputrade_matchcore::{build_book, plan_crosses};
use reputrade_settlement::{
    ReputationChange, SettlementReceipt, SupplyAudit, confirm_delivery, confirm_payment,
};
use reputrade_types::{
    EntityKind, Order, OrderId, Participant, ParticipantId, PolicyConfig, ReputradeError, Result,
    TokenId, TradeToken,
    constants::{CONTRACT_NAME, ORDER_COUNT_KEY, ORDER_PREFIX, TOKEN_COUNT_KEY, VERSION},
};

use crate::MatchReport;

/// RepuTrade bound to a host ledger.
#[derive(Debug)]
pub struct Contract<L: Ledger> {
    ledger: L,
    policy: PolicyConfig,
}

/// Token ids arrive as text; one that cannot name a token is simply absent.
fn parse_token_id(id: &str) -> Result<TokenId> {
    id.parse()
        .map_err(|_| ReputradeError::not_found(EntityKind::Token, id))
}

impl<L: Ledger> Contract<L> {
    /// Bind to a ledger with the default policy.
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            policy: PolicyConfig::default(),
        }
    }

    /// Bind to a ledger with a custom policy.
    ///
    /// # Errors
    /// `InvalidArgument` if the policy is inconsistent.
    pub fn with_policy(ledger: L, policy: PolicyConfig) -> Result<Self> {
        policy.validate()?;
        Ok(Self { ledger, policy })
    }

    #[must_use]
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the host ledger, bypassing the contract.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn into_inner(self) -> L {
        self.ledger
    }

    /// Run `op` in a staged overlay and commit only on success.
    fn transact<T>(
        &mut self,
        name: &'static str,
        op: impl FnOnce(&mut StagedLedger<'_, L>, &PolicyConfig) -> Result<T>,
    ) -> Result<T> {
        let mut staged = StagedLedger::new(&mut self.ledger);
        match op(&mut staged, &self.policy) {
            Ok(out) => {
                let writes = staged.pending();
                staged.commit()?;
                tracing::trace!(op = name, writes, "Operation committed");
                Ok(out)
            }
            Err(err) => {
                tracing::debug!(op = name, error = %err, "Operation aborted");
                Err(err)
            }
        }
    }

    // =====================================================================
    // Mutating operations
    // =====================================================================

    /// Write both sequence counters as 0.
    pub fn init_ledger(&mut self) -> Result<()> {
        self.transact("init_ledger", |l, _| store::init_counters(l))?;
        tracing::info!(contract = CONTRACT_NAME, version = VERSION, "Ledger initialised");
        Ok(())
    }

    /// Register a participant with an initial reputation, balance, and
    /// PEM-encoded ECDSA public key.
    pub fn register_participant(
        &mut self,
        id: &str,
        reputation: i64,
        balance: i64,
        public_key_pem: &str,
    ) -> Result<Participant> {
        let id = ParticipantId::from(id);
        self.transact("register_participant", |l, policy| {
            registry::create(l, policy, &id, reputation, balance, public_key_pem)
        })
    }

    /// Place a BUY or SELL order.
    pub fn create_order(
        &mut self,
        id: &str,
        participant_id: &str,
        quantity: i64,
        price: i64,
        side: &str,
    ) -> Result<Order> {
        let request = OrderRequest {
            id,
            participant_id,
            quantity,
            price,
            side,
        };
        self.transact("create_order", |l, policy| {
            order_entry::create_order(l, policy, &request)
        })
    }

    /// Match every crossable order pair on the book.
    ///
    /// The whole pass is one transaction: if any issuance fails, no token
    /// from this pass survives.
    pub fn perform_matching(&mut self) -> Result<MatchReport> {
        let report = self.transact("perform_matching", |l, policy| {
            let snapshot = l.scan_prefix(ORDER_PREFIX)?;
            let view: &StagedLedger<'_, L> = l;
            let book = build_book(
                snapshot,
                |owner| registry::reputation_of(view, owner),
                policy.reputation_threshold,
            )?;
            let plan = plan_crosses(&book);

            let mut tokens = Vec::with_capacity(plan.crosses.len());
            for cross in &plan.crosses {
                let token = escrow::issue_token(
                    l,
                    policy,
                    &cross.buy_order,
                    &cross.sell_order,
                    Signatures::none(),
                )?;
                if token.quantity != cross.quantity || token.price != cross.price {
                    return Err(ReputradeError::DeterminismViolation {
                        expected: format!("{} @ {}", cross.quantity, cross.price),
                        actual: format!("{} @ {} in {}", token.quantity, token.price, token.id),
                    });
                }
                tokens.push(token.id);
            }

            Ok(MatchReport::new(tokens, book.stats, &plan))
        })?;

        tracing::info!(
            issued = report.tokens.len(),
            scanned = report.scanned,
            skipped = report.skipped(),
            resting_bids = report.resting_bids,
            resting_asks = report.resting_asks,
            fill_root = %report.fill_root,
            "Matching pass complete"
        );
        Ok(report)
    }

    /// Issue a token for a specific order pair, optionally with hex DER
    /// signatures over the new token id.
    pub fn issue_token(
        &mut self,
        buy_order_id: &str,
        sell_order_id: &str,
        buyer_signature: Option<&str>,
        seller_signature: Option<&str>,
    ) -> Result<TradeToken> {
        let (buy, sell) = (OrderId::from(buy_order_id), OrderId::from(sell_order_id));
        let signatures = Signatures {
            buyer: buyer_signature,
            seller: seller_signature,
        };
        self.transact("issue_token", |l, policy| {
            escrow::issue_token(l, policy, &buy, &sell, signatures)
        })
    }

    /// Record that the seller delivered.
    pub fn confirm_delivery(&mut self, token_id: &str) -> Result<TradeToken> {
        let id = parse_token_id(token_id)?;
        self.transact("confirm_delivery", |l, _| confirm_delivery(l, id))
    }

    /// Record that the buyer paid.
    pub fn confirm_payment(&mut self, token_id: &str) -> Result<TradeToken> {
        let id = parse_token_id(token_id)?;
        self.transact("confirm_payment", |l, _| confirm_payment(l, id))
    }

    /// Settle a LOCKED token.
    pub fn settle(&mut self, token_id: &str) -> Result<SettlementReceipt> {
        let id = parse_token_id(token_id)?;
        self.transact("settle", |l, _| reputrade_settlement::settle(l, id))
    }

    /// Adjust reputations after settlement.
    pub fn update_reputation(&mut self, token_id: &str) -> Result<ReputationChange> {
        let id = parse_token_id(token_id)?;
        self.transact("update_reputation", |l, policy| {
            reputrade_settlement::update_reputation(l, policy, id)
        })
    }

    // =====================================================================
    // Queries
    // =====================================================================

    pub fn get_participant(&self, id: &str) -> Result<Participant> {
        registry::get(&self.ledger, &ParticipantId::from(id))
    }

    pub fn participant_exists(&self, id: &str) -> Result<bool> {
        registry::exists(&self.ledger, &ParticipantId::from(id))
    }

    /// Current reputation of a participant.
    pub fn query_reputation(&self, id: &str) -> Result<u32> {
        Ok(self.get_participant(id)?.reputation)
    }

    pub fn get_order(&self, id: &str) -> Result<Order> {
        order_entry::get_order(&self.ledger, &OrderId::from(id))
    }

    pub fn order_exists(&self, id: &str) -> Result<bool> {
        order_entry::order_exists(&self.ledger, &OrderId::from(id))
    }

    /// Resting orders in key order.
    pub fn list_orders(&self) -> Result<Vec<Order>> {
        order_entry::list_orders(&self.ledger)
    }

    pub fn get_token(&self, id: &str) -> Result<TradeToken> {
        escrow::get_token(&self.ledger, parse_token_id(id)?)
    }

    /// All tokens in key order.
    pub fn list_tokens(&self) -> Result<Vec<TradeToken>> {
        escrow::list_tokens(&self.ledger)
    }

    /// Orders accepted so far.
    pub fn order_count(&self) -> Result<u64> {
        store::counter(&self.ledger, ORDER_COUNT_KEY)
    }

    /// Tokens issued so far.
    pub fn token_count(&self) -> Result<u64> {
        store::counter(&self.ledger, TOKEN_COUNT_KEY)
    }

    /// Verify a hex DER signature over `message` under a participant's
    /// registered key. A wrong signature is `Ok(false)`.
    pub fn verify_signature(
        &self,
        participant_id: &str,
        message: &str,
        signature_hex: &str,
    ) -> Result<bool> {
        let participant = self.get_participant(participant_id)?;
        signature::verify_with_pem(
            &participant.id,
            &participant.public_key,
            message.as_bytes(),
            signature_hex,
        )
    }

    // =====================================================================
    // Conservation audit
    // =====================================================================

    /// Balances plus deposits held in LOCKED tokens.
    pub fn total_value(&self) -> Result<u64> {
        SupplyAudit::scan(&self.ledger)?.total()
    }

    /// Sum of balances introduced at registration.
    pub fn registered_supply(&self) -> Result<u64> {
        store::registered_supply(&self.ledger)
    }

    /// Fail with `SupplyInvariantViolation` if value was created or destroyed.
    pub fn verify_conservation(&self) -> Result<SupplyAudit> {
        reputrade_settlement::verify_conservation(&self.ledger)
    }
}
