//! # Trade Index
//!
//! Per-instrument index of executed trades ordered by trade value
//! (price × quantity).
//!
//! ## Components
//!
//! 1. **[`Trade`]**: immutable record of one execution
//! 2. **[`TradeIndex`]**: left-leaning red-black tree mapping each value to
//!    the trades sharing it, with sorted, min/max, floor/ceiling and range
//!    queries
//! 3. **[`TradingPlatform`]**: validates raw records and routes them to one
//!    index per recognised instrument
//!
//! Everything is single-threaded and synchronous; `insert` takes `&mut self`
//! so callers sharing an index must serialise writers themselves.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod index;
pub mod ingest;
pub mod platform;
pub mod trade;

pub use crate::error::{InvariantViolation, TradeIndexError};
pub use crate::index::{Levels, TradeIndex};
pub use crate::ingest::{IngestSummary, ingest, load_transactions};
pub use crate::platform::{PlatformError, TradingPlatform, TransactionRecord};
pub use crate::trade::Trade;
