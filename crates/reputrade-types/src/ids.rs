//! Identifiers used throughout RepuTrade.
//!
//! Participant and order ids are caller-chosen strings. Token ids are
//! allocated from a ledger counter and render as `token<N>`, which is
//! also the message parties sign.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ReputradeError, constants::TOKEN_ID_PREFIX};

// ---------------------------------------------------------------------------
// ParticipantId
// ---------------------------------------------------------------------------

/// Unique identity of a trading participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Unique order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// TokenId
// ---------------------------------------------------------------------------

/// Monotonically assigned trade token identifier.
///
/// The numeric value is the `TOKENCOUNT` counter at allocation time; the
/// textual form (`token7`) is used for ledger keys, the wire format, and
/// as the message each party signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TOKEN_ID_PREFIX}{}", self.0)
    }
}

impl FromStr for TokenId {
    type Err = ReputradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(TOKEN_ID_PREFIX)
            .and_then(|n| n.parse::<u64>().ok())
            .map(Self)
            .filter(|id| id.to_string() == s)
            .ok_or_else(|| ReputradeError::invalid_argument(format!("malformed token id {s:?}")))
    }
}

impl From<TokenId> for String {
    fn from(id: TokenId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for TokenId {
    type Error = ReputradeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
