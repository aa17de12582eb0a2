//! Trading platform: one trade index per recognised instrument
//!
//! The platform owns the instrument catalog, validates raw transaction
//! records and query bounds, and routes each call to the matching
//! [`TradeIndex`]. The index map is built once and never grows.

use crate::error::TradeIndexError;
use crate::index::TradeIndex;
use crate::trade::Trade;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use services_common::{PlatformConfig, STOCKS};
use thiserror::Error;
use tracing::{debug, warn};

/// Validation and dispatch errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlatformError {
    /// Instrument is not in the catalog
    #[error("Invalid Stock Name: {0}")]
    InvalidStockName(String),

    /// Quantity below one
    #[error("Invalid Stock Quantity: {0}")]
    InvalidQuantity(i64),

    /// Price not strictly positive
    #[error("Invalid Stock Price: {0}")]
    InvalidPrice(f64),

    /// Negative floor/ceiling threshold
    #[error("Invalid Transaction Value: {0}")]
    InvalidThreshold(f64),

    /// Malformed range bounds
    #[error("Invalid Range Bounds: fromValue: {from} toValue: {to}")]
    InvalidRange {
        /// Lower bound
        from: f64,
        /// Upper bound
        to: f64,
    },

    /// Error raised by the underlying index
    #[error(transparent)]
    Index(#[from] TradeIndexError),
}

/// Raw transaction as received, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Instrument name
    pub stock_name: String,
    /// Price per unit
    pub price: f64,
    /// Units traded
    pub quantity: i64,
    /// Execution time
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    /// Build a record
    pub fn new(
        stock_name: impl Into<String>,
        price: f64,
        quantity: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            stock_name: stock_name.into(),
            price,
            quantity,
            timestamp,
        }
    }
}

/// Trade indices for a fixed set of instruments
#[derive(Debug)]
pub struct TradingPlatform {
    indices: FxHashMap<String, TradeIndex>,
}

impl Default for TradingPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl TradingPlatform {
    /// Platform over the default instrument catalog
    #[must_use]
    pub fn new() -> Self {
        Self::with_instruments(STOCKS)
    }

    /// Platform over the instruments named in `config`
    #[must_use]
    pub fn from_config(config: &PlatformConfig) -> Self {
        Self::with_instruments(config.instruments.iter().map(String::as_str))
    }

    /// Platform over an explicit catalog; repeated names share one index
    pub fn with_instruments<I, S>(instruments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut indices = FxHashMap::default();
        for name in instruments {
            let name = name.into();
            indices
                .entry(name.clone())
                .or_insert_with(|| TradeIndex::new(name));
        }
        Self { indices }
    }

    /// Recognised instrument names, sorted
    #[must_use]
    pub fn instruments(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.indices.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Index for `stock_name`, if recognised
    #[must_use]
    pub fn index(&self, stock_name: &str) -> Option<&TradeIndex> {
        self.indices.get(stock_name)
    }

    /// Trades stored across every instrument
    #[must_use]
    pub fn total_trades(&self) -> usize {
        self.indices.values().map(TradeIndex::len).sum()
    }

    /// Validate a raw record and store it in its instrument's index
    pub fn log_transaction(&mut self, record: TransactionRecord) -> Result<(), PlatformError> {
        let TransactionRecord {
            stock_name,
            price,
            quantity,
            timestamp,
        } = record;

        let Some(index) = self.indices.get_mut(&stock_name) else {
            warn!(stock = %stock_name, "rejected transaction for unknown instrument");
            return Err(PlatformError::InvalidStockName(stock_name));
        };
        let units = match u64::try_from(quantity) {
            Ok(units) if units >= 1 => units,
            _ => {
                warn!(stock = %stock_name, quantity, "rejected transaction quantity");
                return Err(PlatformError::InvalidQuantity(quantity));
            }
        };
        if !price.is_finite() || price <= 0.0 {
            warn!(stock = %stock_name, price, "rejected transaction price");
            return Err(PlatformError::InvalidPrice(price));
        }

        let trade = Trade::new(stock_name, price, units, timestamp);
        debug!(stock = %trade.stock_name(), value = trade.value(), "logged transaction");
        index.insert(trade)?;
        Ok(())
    }

    /// Every trade for `stock_name`, ascending by value
    pub fn sorted_transactions(&self, stock_name: &str) -> Result<Vec<&Trade>, PlatformError> {
        Ok(self.lookup(stock_name)?.all_trades())
    }

    /// Trades at the smallest value for `stock_name`
    pub fn min_transactions(&self, stock_name: &str) -> Result<&[Trade], PlatformError> {
        Ok(self.lookup(stock_name)?.min_trades())
    }

    /// Trades at the largest value for `stock_name`
    pub fn max_transactions(&self, stock_name: &str) -> Result<&[Trade], PlatformError> {
        Ok(self.lookup(stock_name)?.max_trades())
    }

    /// Trades at the greatest value `<= threshold`
    pub fn floor_transactions(
        &self,
        stock_name: &str,
        threshold: f64,
    ) -> Result<&[Trade], PlatformError> {
        let index = self.lookup(stock_name)?;
        Self::check_threshold(threshold)?;
        Ok(index.floor_trades(threshold))
    }

    /// Trades at the least value `>= threshold`
    pub fn ceiling_transactions(
        &self,
        stock_name: &str,
        threshold: f64,
    ) -> Result<&[Trade], PlatformError> {
        let index = self.lookup(stock_name)?;
        Self::check_threshold(threshold)?;
        Ok(index.ceiling_trades(threshold))
    }

    /// Trades with `from <= value <= to`, ascending by value
    pub fn range_transactions(
        &self,
        stock_name: &str,
        from: f64,
        to: f64,
    ) -> Result<Vec<&Trade>, PlatformError> {
        let index = self.lookup(stock_name)?;
        if from.is_nan() || to.is_nan() || from > to || from < 0.0 || to < 0.0 {
            return Err(PlatformError::InvalidRange { from, to });
        }
        Ok(index.trades_in_range(from, to)?)
    }

    fn lookup(&self, stock_name: &str) -> Result<&TradeIndex, PlatformError> {
        self.indices
            .get(stock_name)
            .ok_or_else(|| PlatformError::InvalidStockName(stock_name.to_string()))
    }

    fn check_threshold(threshold: f64) -> Result<(), PlatformError> {
        if threshold.is_nan() || threshold < 0.0 {
            return Err(PlatformError::InvalidThreshold(threshold));
        }
        Ok(())
    }
}
