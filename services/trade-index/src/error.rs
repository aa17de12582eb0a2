//! Error types for the trade index

use thiserror::Error;

/// Errors produced by [`crate::TradeIndex`] operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TradeIndexError {
    /// Trade belongs to a different instrument than the index
    #[error("Invalid Stock Name: index holds {expected}, trade is for {found}")]
    InstrumentMismatch {
        /// Instrument of the index
        expected: String,
        /// Instrument of the rejected trade
        found: String,
    },

    /// Range query with `low > high` or a negative lower bound
    #[error("Invalid Range Bounds: low {low} high {high}")]
    InvalidRangeBounds {
        /// Lower bound
        low: f64,
        /// Upper bound
        high: f64,
    },
}

/// Structural problem found by [`crate::TradeIndex::check_invariants`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    /// Root is colored red after an insertion completed
    #[error("root node is red")]
    RedRoot,

    /// A red link leans right
    #[error("red right link below key {key}")]
    RedRightLink {
        /// Key of the parent node
        key: f64,
    },

    /// Two red links in a row on a left spine
    #[error("consecutive red links at key {key}")]
    DoubleRedLeft {
        /// Key of the upper red node
        key: f64,
    },

    /// Subtrees disagree on black height
    #[error("black height mismatch at key {key}: left {left}, right {right}")]
    BlackImbalance {
        /// Key of the node whose children disagree
        key: f64,
        /// Black height of the left subtree
        left: usize,
        /// Black height of the right subtree
        right: usize,
    },

    /// Key violates the search-tree ordering
    #[error("key {key} out of order")]
    OutOfOrder {
        /// Offending key
        key: f64,
    },

    /// Node with no trades
    #[error("empty trade list at key {key}")]
    EmptyLevel {
        /// Key of the empty node
        key: f64,
    },

    /// Trade stored under a key that is not its value
    #[error("trade worth {value} stored under key {key}")]
    KeyMismatch {
        /// Node key
        key: f64,
        /// Value of the misplaced trade
        value: f64,
    },
}
