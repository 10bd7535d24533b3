//! Order types for the RepuTrade book.
//!
//! Orders are not escrowed when placed. Deposits are locked only when an
//! order is matched, and the order record shrinks (or disappears) as it
//! fills.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{OrderId, ParticipantId, ReputradeError, Result};

/// Which side of the book this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = ReputradeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(ReputradeError::invalid_argument(format!(
                "order type must be either BUY or SELL, got {other:?}"
            ))),
        }
    }
}

/// A standing offer to buy or sell energy at a limit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "orderID")]
    pub id: OrderId,
    #[serde(rename = "participantID")]
    pub participant_id: ParticipantId,
    #[serde(rename = "orderType")]
    pub side: OrderSide,
    /// Remaining energy quantity; decremented on partial fills.
    #[serde(rename = "energyAmount")]
    pub quantity: u64,
    /// Limit price per unit of energy.
    pub price: u64,
}

impl Order {
    /// Full notional `quantity * price`.
    pub fn notional(&self) -> Result<u64> {
        self.quantity
            .checked_mul(self.price)
            .ok_or(ReputradeError::Overflow {
                context: "order notional",
            })
    }

    /// Whether this bid reaches the given ask (or this ask the given bid).
    #[must_use]
    pub fn crosses(&self, other: &Self) -> bool {
        match self.side {
            OrderSide::Buy => self.price >= other.price,
            OrderSide::Sell => self.price <= other.price,
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy(id: &str, owner: &str, side: OrderSide, quantity: u64, price: u64) -> Self {
        Self {
            id: OrderId::from(id),
            participant_id: ParticipantId::from(owner),
            side,
            quantity,
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_side_display_and_parse() {
        assert_eq!(format!("{}", OrderSide::Buy), "BUY");
        assert_eq!(format!("{}", OrderSide::Sell), "SELL");
        assert_eq!("SELL".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        let err = "buy".parse::<OrderSide>().unwrap_err();
        assert!(matches!(err, ReputradeError::InvalidArgument { .. }));
    }

    #[test]
    fn crossing() {
        let bid = Order::dummy("b", "x", OrderSide::Buy, 1, 12);
        let ask = Order::dummy("s", "y", OrderSide::Sell, 1, 10);
        assert!(bid.crosses(&ask));
        assert!(ask.crosses(&bid));
        let high_ask = Order::dummy("s2", "y", OrderSide::Sell, 1, 13);
        assert!(!bid.crosses(&high_ask));
    }

    #[test]
    fn notional_overflow_is_reported() {
        let order = Order::dummy("o", "p", OrderSide::Buy, u64::MAX, 2);
        assert!(matches!(
            order.notional(),
            Err(ReputradeError::Overflow { .. })
        ));
    }

    #[test]
    fn wire_format() {
        let order = Order::dummy("ORD1_user5", "user5", OrderSide::Buy, 7, 55);
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(
            json,
            r#"{"orderID":"ORD1_user5","participantID":"user5","orderType":"BUY","energyAmount":7,"price":55}"#
        );
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}
