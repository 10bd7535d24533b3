//! Ledger record codec.
//!
//! Every entity is stored as a flat JSON object under
//! `<PREFIX><id>`. The prefix and the id rendering live here so that no
//! other crate concatenates keys by hand.

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    EntityKind, Order, Participant, Result, TradeToken,
    constants::{ORDER_PREFIX, PARTICIPANT_PREFIX, TOKEN_PREFIX},
};

/// A ledger-persisted entity.
pub trait Record: Serialize + DeserializeOwned {
    /// Key namespace for this entity kind.
    const PREFIX: &'static str;
    /// Entity kind used in error reports.
    const KIND: EntityKind;

    /// The entity's own id, rendered as it appears in its key.
    fn record_id(&self) -> String;

    /// Ledger key for an entity id.
    fn key_for(id: &str) -> String {
        format!("{}{id}", Self::PREFIX)
    }

    /// Ledger key of this record.
    fn key(&self) -> String {
        Self::key_for(&self.record_id())
    }

    /// Encode as the canonical JSON bytes stored in the ledger.
    fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from stored JSON bytes.
    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl Record for Participant {
    const PREFIX: &'static str = PARTICIPANT_PREFIX;
    const KIND: EntityKind = EntityKind::Participant;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Order {
    const PREFIX: &'static str = ORDER_PREFIX;
    const KIND: EntityKind = EntityKind::Order;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}

impl Record for TradeToken {
    const PREFIX: &'static str = TOKEN_PREFIX;
    const KIND: EntityKind = EntityKind::Token;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}
