//! Shared fixtures for contract integration tests.

#![allow(dead_code)]

use p256::{
    ecdsa::{Signature, SigningKey, signature::Signer},
    pkcs8::{EncodePublicKey, LineEnding},
};
use reputrade_contract::{Contract, MemoryLedger};

/// Install a test-writer subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A participant's signing identity.
pub struct Keys {
    signing: SigningKey,
}

impl Keys {
    pub fn random() -> Self {
        Self {
            signing: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    pub fn pem(&self) -> String {
        self.signing
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap()
    }

    /// Hex DER signature over `message`.
    pub fn sign(&self, message: &str) -> String {
        let sig: Signature = self.signing.sign(message.as_bytes());
        hex::encode(sig.to_der().as_bytes())
    }
}

/// A contract over a fresh in-memory ledger with its clock set.
pub fn contract() -> Contract<MemoryLedger> {
    init_tracing();
    let mut ledger = MemoryLedger::new();
    ledger.set_timestamp(1_700_000_000);
    let mut contract = Contract::new(ledger);
    contract.init_ledger().unwrap();
    contract
}

/// Register `id` with a fresh random key and return the key.
pub fn register(contract: &mut Contract<MemoryLedger>, id: &str, reputation: i64, balance: i64) -> Keys {
    let keys = Keys::random();
    contract
        .register_participant(id, reputation, balance, &keys.pem())
        .unwrap();
    keys
}

/// Seller A (rep 50) and buyer B (rep 80), 1000 each.
pub fn reference_market() -> (Contract<MemoryLedger>, Keys, Keys) {
    let mut c = contract();
    let a = register(&mut c, "A", 50, 1000);
    let b = register(&mut c, "B", 80, 1000);
    (c, a, b)
}

pub fn balance(contract: &Contract<MemoryLedger>, id: &str) -> u64 {
    contract.get_participant(id).unwrap().balance
}
