//! Error types for the RepuTrade contract.
//!
//! All errors use the `RT_ERR_` prefix convention for easy grepping in
//! host logs. Error codes are grouped by subsystem:
//! - 1xx: Argument / entity errors
//! - 2xx: Balance and reputation errors
//! - 3xx: Matching errors
//! - 4xx: Token state errors
//! - 5xx: Cryptography errors
//! - 6xx: Invariant errors
//! - 9xx: Ledger / internal errors

use thiserror::Error;

use crate::{OrderId, OrderSide, ParticipantId, TokenId, TokenState};

/// The kind of ledger entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Participant,
    Order,
    Token,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Participant => write!(f, "participant"),
            Self::Order => write!(f, "order"),
            Self::Token => write!(f, "token"),
        }
    }
}

/// Failure category, independent of the diagnostic payload.
///
/// Callers branch on this instead of matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    DuplicateEntity,
    NotFound,
    InvalidPublicKey,
    InvalidSignature,
    ReputationTooLow,
    InsufficientBalance,
    TypeMismatch,
    PriceMismatch,
    SelfTrade,
    InvalidState,
    Invariant,
    Ledger,
}

/// Central error enum for all RepuTrade operations.
#[derive(Debug, Error)]
pub enum ReputradeError {
    // =================================================================
    // Argument / Entity Errors (1xx)
    // =================================================================
    /// Malformed caller input.
    #[error("RT_ERR_100: Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// An entity with this id already exists.
    #[error("RT_ERR_101: {kind} {id} already exists")]
    DuplicateEntity { kind: EntityKind, id: String },

    /// The entity is absent from the ledger.
    #[error("RT_ERR_102: {kind} {id} does not exist")]
    NotFound { kind: EntityKind, id: String },

    // =================================================================
    // Balance / Reputation Errors (2xx)
    // =================================================================
    /// The participant's balance does not cover the required amount.
    #[error(
        "RT_ERR_200: Insufficient balance for {participant}: need {needed}, have {available}"
    )]
    InsufficientBalance {
        participant: ParticipantId,
        needed: u64,
        available: u64,
    },

    /// The participant is below the trading eligibility threshold.
    #[error(
        "RT_ERR_201: Reputation of {participant} too low: {reputation} (minimum {threshold})"
    )]
    ReputationTooLow {
        participant: ParticipantId,
        reputation: u32,
        threshold: u32,
    },

    // =================================================================
    // Matching Errors (3xx)
    // =================================================================
    /// An order was supplied on the wrong side of the pair.
    #[error("RT_ERR_300: Order {order} is {actual}, expected {expected}")]
    TypeMismatch {
        order: OrderId,
        expected: OrderSide,
        actual: OrderSide,
    },

    /// The bid does not reach the ask.
    #[error("RT_ERR_301: Buy price {bid} is lower than sell price {ask}")]
    PriceMismatch { bid: u64, ask: u64 },

    /// Buyer and seller are the same participant.
    #[error("RT_ERR_302: Self-trade blocked: {participant} is on both sides")]
    SelfTrade { participant: ParticipantId },

    // =================================================================
    // Token State Errors (4xx)
    // =================================================================
    /// The operation is not valid for the token's current state.
    #[error("RT_ERR_400: Token {token} is {actual}, expected {expected}")]
    InvalidState {
        token: TokenId,
        expected: &'static str,
        actual: TokenState,
    },

    // =================================================================
    // Cryptography Errors (5xx)
    // =================================================================
    /// The PEM public key is malformed or not an ECDSA key on a supported curve.
    #[error("RT_ERR_500: Invalid public key for {participant}: {reason}")]
    InvalidPublicKey {
        participant: ParticipantId,
        reason: String,
    },

    /// The signature is malformed or failed verification.
    #[error("RT_ERR_501: Invalid signature: {reason}")]
    InvalidSignature { reason: String },

    // =================================================================
    // Invariant Errors (6xx)
    // =================================================================
    /// Checked arithmetic on currency or quantity overflowed.
    #[error("RT_ERR_600: Arithmetic overflow computing {context}")]
    Overflow { context: &'static str },

    /// Value conservation invariant violated. Critical.
    #[error("RT_ERR_601: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// Replicas would diverge: planned fill disagrees with issued token.
    #[error("RT_ERR_602: Determinism violation: expected {expected}, got {actual}")]
    DeterminismViolation { expected: String, actual: String },

    // =================================================================
    // Ledger / Internal (9xx)
    // =================================================================
    /// The host ledger failed to serve a read or write.
    #[error("RT_ERR_900: Ledger error: {0}")]
    Ledger(String),

    /// A stored record could not be encoded or decoded.
    #[error("RT_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

impl ReputradeError {
    /// Shorthand for [`ReputradeError::NotFound`].
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Shorthand for [`ReputradeError::DuplicateEntity`].
    pub fn duplicate(kind: EntityKind, id: impl ToString) -> Self {
        Self::DuplicateEntity {
            kind,
            id: id.to_string(),
        }
    }

    /// Shorthand for [`ReputradeError::InvalidArgument`].
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// The failure category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::DuplicateEntity { .. } => ErrorKind::DuplicateEntity,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::ReputationTooLow { .. } => ErrorKind::ReputationTooLow,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::PriceMismatch { .. } => ErrorKind::PriceMismatch,
            Self::SelfTrade { .. } => ErrorKind::SelfTrade,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::InvalidPublicKey { .. } => ErrorKind::InvalidPublicKey,
            Self::InvalidSignature { .. } => ErrorKind::InvalidSignature,
            Self::Overflow { .. }
            | Self::SupplyInvariantViolation { .. }
            | Self::DeterminismViolation { .. } => ErrorKind::Invariant,
            Self::Ledger(_) | Self::Serialization(_) => ErrorKind::Ledger,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ReputradeError>;

impl From<serde_json::Error> for ReputradeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
