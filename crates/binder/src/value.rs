use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::fmt;

/// A typed value ready to be bound into a query placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Null,
    Text(String),
    BigInt(i64),
    Decimal(Decimal),
    DateTime(NaiveDateTime),
    /// A calendar date already formatted as `yyyy-MM-dd`.
    Date(String),
    Time(NaiveTime),
    /// Boolean bound as `1` or `0`.
    Bit(u8),
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Null => f.write_str("NULL"),
            BoundValue::Text(s) | BoundValue::Date(s) => write!(f, "'{s}'"),
            BoundValue::BigInt(i) => write!(f, "{i}"),
            BoundValue::Decimal(d) => write!(f, "{d}"),
            BoundValue::DateTime(dt) => write!(f, "'{}'", dt.format("%Y-%m-%d %H:%M:%S%.f")),
            BoundValue::Time(t) => write!(f, "'{}'", t.format("%H:%M:%S%.f")),
            BoundValue::Bit(b) => write!(f, "{b}"),
        }
    }
}
