//! Executed trade record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One executed transaction for one instrument.
///
/// Construction performs no validation; the platform layer checks names,
/// prices and quantities before a `Trade` is ever built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    stock_name: String,
    price: f64,
    quantity: u64,
    timestamp: DateTime<Utc>,
}

impl Trade {
    /// Create a new trade
    pub fn new(
        stock_name: impl Into<String>,
        price: f64,
        quantity: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            stock_name: stock_name.into(),
            price,
            quantity,
            timestamp,
        }
    }

    /// Instrument this trade was executed on
    #[must_use]
    pub fn stock_name(&self) -> &str {
        &self.stock_name
    }

    /// Execution price per unit
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Number of units traded
    #[must_use]
    pub const fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Wall-clock execution time
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Trade notional (price × quantity), the index ordering key
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {:.4} = {:.4} ({})",
            self.stock_name,
            self.quantity,
            self.price,
            self.value(),
            self.timestamp.to_rfc3339()
        )
    }
}
