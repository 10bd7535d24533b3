//! System-wide constants for the RepuTrade marketplace.

/// Ledger key prefix for participant records.
pub const PARTICIPANT_PREFIX: &str = "PARTICIPANT_";

/// Ledger key prefix for order records.
pub const ORDER_PREFIX: &str = "ORDER_";

/// Ledger key prefix for trade token records.
pub const TOKEN_PREFIX: &str = "TOKEN_";

/// Counter of orders ever accepted into the book.
pub const ORDER_COUNT_KEY: &str = "ORDERCOUNT";

/// Counter of trade tokens ever issued. Token ids are allocated from it.
pub const TOKEN_COUNT_KEY: &str = "TOKENCOUNT";

/// Running total of balance introduced by registration.
pub const SUPPLY_KEY: &str = "SUPPLY";

/// Textual prefix of a rendered token id (`token1`, `token2`, ...).
pub const TOKEN_ID_PREFIX: &str = "token";

/// Minimum reputation required to place orders and to be matched.
pub const REPUTATION_THRESHOLD: u32 = 20;

/// Reputation ceiling.
pub const MAX_REPUTATION: u32 = 100;

/// Deposit percentage charged at the top of the reputation range.
pub const MIN_DEPOSIT_PERCENT: u64 = 5;

/// Deposit percentage charged at (or below) the eligibility threshold.
pub const MAX_DEPOSIT_PERCENT: u64 = 20;

/// Reputation gained by each party of a successful trade.
pub const SUCCESS_REWARD: u32 = 1;

/// Reputation lost by the defaulting party.
pub const DEFAULT_PENALTY: u32 = 5;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Contract name as registered with the host ledger.
pub const CONTRACT_NAME: &str = "RepuTrade";
