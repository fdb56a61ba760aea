use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(OrderId);

/// Kitchen progression of an order. Transitions only ever move one step forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Received,
    Cooking,
    Ready,
    Completed,
    /// Any value the backend sends that this board does not know about.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Received,
        OrderStatus::Cooking,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ];

    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Received),
            OrderStatus::Received => Some(OrderStatus::Cooking),
            OrderStatus::Cooking => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Received => "received",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized value '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Status subset selected on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    Only(OrderStatus),
}

impl Filter {
    pub const CHOICES: [Filter; 6] = [
        Filter::All,
        Filter::Only(OrderStatus::Pending),
        Filter::Only(OrderStatus::Received),
        Filter::Only(OrderStatus::Cooking),
        Filter::Only(OrderStatus::Ready),
        Filter::Only(OrderStatus::Completed),
    ];

    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == status,
        }
    }

    /// Value sent as the `filter` query parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Only(status) => status.as_str(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for Filter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Filter::All);
        }
        OrderStatus::from_str(s).map(Filter::Only)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    #[serde(alias = "price")]
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    #[serde(deserialize_with = "deserialize_items")]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub notes: Option<String>,
    pub total_amount: Decimal,
    /// Raw server timestamp, parsed on demand. Empty when the backend sent none.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Error)]
pub enum ItemsDecodeError {
    #[error("items string is not a valid item list: {0}")]
    Encoded(#[source] serde_json::Error),
    #[error("items value is not a valid item list: {0}")]
    Structured(#[source] serde_json::Error),
}

/// Normalizes an `items` payload to a structured list.
///
/// The backend sometimes sends the list JSON-encoded inside a string. Exactly one
/// level of string encoding is unwrapped; a value that is already a list is taken
/// as-is, so running this on its own output never decodes twice.
pub fn decode_items(value: serde_json::Value) -> Result<Vec<OrderItem>, ItemsDecodeError> {
    match value {
        serde_json::Value::String(encoded) => {
            serde_json::from_str(&encoded).map_err(ItemsDecodeError::Encoded)
        }
        serde_json::Value::Null => Ok(Vec::new()),
        other => serde_json::from_value(other).map_err(ItemsDecodeError::Structured),
    }
}

fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<OrderItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    decode_items(raw).map_err(serde::de::Error::custom)
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(raw)) => Ok(raw),
        _ => Ok(String::new()),
    }
}
