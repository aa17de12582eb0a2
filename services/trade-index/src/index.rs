//! Per-instrument trade index
//!
//! A left-leaning red-black tree keyed by trade value (price × quantity).
//! Each node owns every trade sharing its exact value, in arrival order, so
//! the tree behaves as an ordered multimap:
//! - Insertion is the recursive LLRB scheme: descend, attach a red leaf,
//!   then rebalance every node on the way back up
//! - Red links lean left only and never appear twice in a row, which keeps
//!   the height within 2·log2(n)
//! - Reads never touch coloring or structure
//!
//! Keys compare with `f64::total_cmp`, so every value has a defined slot.

use crate::error::{InvariantViolation, TradeIndexError};
use crate::trade::Trade;
use smallvec::SmallVec;
use std::cmp::Ordering;
use tracing::trace;

/// Same-value trades kept inline before spilling to the heap
const INLINE_TRADES: usize = 2;

type Link = Option<Box<Node>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug)]
struct Node {
    key: f64,
    trades: SmallVec<[Trade; INLINE_TRADES]>,
    left: Link,
    right: Link,
    color: Color,
}

impl Node {
    fn new(trade: Trade) -> Self {
        let key = trade.value();
        let mut trades = SmallVec::new();
        trades.push(trade);
        Self {
            key,
            trades,
            left: None,
            right: None,
            color: Color::Red,
        }
    }

    #[inline]
    fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

/// Absent links count as black
#[inline]
fn is_red(link: &Link) -> bool {
    link.as_ref().is_some_and(|node| node.is_red())
}

/// Lift a red right child into `h`'s place
fn rotate_left(mut h: Box<Node>) -> Box<Node> {
    let Some(mut x) = h.right.take() else {
        return h;
    };
    h.right = x.left.take();
    x.color = h.color;
    h.color = Color::Red;
    x.left = Some(h);
    x
}

/// Lift a red left child into `h`'s place
fn rotate_right(mut h: Box<Node>) -> Box<Node> {
    let Some(mut x) = h.left.take() else {
        return h;
    };
    h.left = x.right.take();
    x.color = h.color;
    h.color = Color::Red;
    x.right = Some(h);
    x
}

/// Split a temporary 4-node: both children go black, `h` goes red
fn flip_colors(h: &mut Node) {
    h.color = Color::Red;
    if let Some(left) = h.left.as_mut() {
        left.color = Color::Black;
    }
    if let Some(right) = h.right.as_mut() {
        right.color = Color::Black;
    }
}

/// Restore the local LLRB shape. The order of the three checks matters.
fn balance(mut h: Box<Node>) -> Box<Node> {
    if is_red(&h.right) && !is_red(&h.left) {
        h = rotate_left(h);
    }
    if h.left.as_ref().is_some_and(|l| l.is_red() && is_red(&l.left)) {
        h = rotate_right(h);
    }
    if is_red(&h.left) && is_red(&h.right) {
        flip_colors(&mut h);
    }
    h
}

/// Insert below `link`, returning the new subtree root and whether a new
/// node was created
fn insert_at(link: Link, trade: Trade) -> (Box<Node>, bool) {
    let Some(mut node) = link else {
        return (Box::new(Node::new(trade)), true);
    };

    let created = match trade.value().total_cmp(&node.key) {
        Ordering::Equal => {
            node.trades.push(trade);
            return (node, false);
        }
        Ordering::Less => {
            let (left, created) = insert_at(node.left.take(), trade);
            node.left = Some(left);
            created
        }
        Ordering::Greater => {
            let (right, created) = insert_at(node.right.take(), trade);
            node.right = Some(right);
            created
        }
    };

    (balance(node), created)
}

fn height(link: &Link) -> usize {
    link.as_ref()
        .map_or(0, |node| 1 + height(&node.left).max(height(&node.right)))
}

fn collect_range<'a>(node: &'a Node, low: f64, high: f64, out: &mut Vec<&'a Trade>) {
    if node.key.total_cmp(&low) == Ordering::Less {
        if let Some(right) = node.right.as_deref() {
            collect_range(right, low, high, out);
        }
    } else if node.key.total_cmp(&high) == Ordering::Greater {
        if let Some(left) = node.left.as_deref() {
            collect_range(left, low, high, out);
        }
    } else {
        if let Some(left) = node.left.as_deref() {
            collect_range(left, low, high, out);
        }
        out.extend(node.trades.iter());
        if let Some(right) = node.right.as_deref() {
            collect_range(right, low, high, out);
        }
    }
}

/// Returns the black height of the subtree
fn check_subtree(
    node: Option<&Node>,
    lower: Option<f64>,
    upper: Option<f64>,
) -> Result<usize, InvariantViolation> {
    let Some(node) = node else {
        return Ok(0);
    };
    let key = node.key;

    if lower.is_some_and(|l| key.total_cmp(&l) != Ordering::Greater)
        || upper.is_some_and(|u| key.total_cmp(&u) != Ordering::Less)
    {
        return Err(InvariantViolation::OutOfOrder { key });
    }
    if node.trades.is_empty() {
        return Err(InvariantViolation::EmptyLevel { key });
    }
    if let Some(trade) = node
        .trades
        .iter()
        .find(|t| t.value().total_cmp(&key) != Ordering::Equal)
    {
        return Err(InvariantViolation::KeyMismatch {
            key,
            value: trade.value(),
        });
    }
    if is_red(&node.right) {
        return Err(InvariantViolation::RedRightLink { key });
    }
    if node.is_red() && is_red(&node.left) {
        return Err(InvariantViolation::DoubleRedLeft { key });
    }

    let left = check_subtree(node.left.as_deref(), lower, Some(key))?;
    let right = check_subtree(node.right.as_deref(), Some(key), upper)?;
    if left != right {
        return Err(InvariantViolation::BlackImbalance { key, left, right });
    }

    Ok(left + usize::from(!node.is_red()))
}

/// Ordered trade index for a single instrument
#[derive(Debug)]
pub struct TradeIndex {
    stock_name: String,
    root: Link,
    trade_count: usize,
    level_count: usize,
}

impl TradeIndex {
    /// Create an empty index for `stock_name`
    pub fn new(stock_name: impl Into<String>) -> Self {
        Self {
            stock_name: stock_name.into(),
            root: None,
            trade_count: 0,
            level_count: 0,
        }
    }

    /// Instrument this index accepts
    #[must_use]
    pub fn stock_name(&self) -> &str {
        &self.stock_name
    }

    /// Number of trades stored
    #[must_use]
    pub const fn len(&self) -> usize {
        self.trade_count
    }

    /// Number of distinct trade values stored
    #[must_use]
    pub const fn level_count(&self) -> usize {
        self.level_count
    }

    /// True until the first trade is inserted
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path
    #[must_use]
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Insert a trade.
    ///
    /// Trades for another instrument are rejected before anything is
    /// touched. A trade whose value is already present is appended after
    /// the trades already stored under that value.
    pub fn insert(&mut self, trade: Trade) -> Result<(), TradeIndexError> {
        if trade.stock_name() != self.stock_name {
            return Err(TradeIndexError::InstrumentMismatch {
                expected: self.stock_name.clone(),
                found: trade.stock_name().to_string(),
            });
        }

        let key = trade.value();
        let (mut root, created) = insert_at(self.root.take(), trade);
        root.color = Color::Black;
        self.root = Some(root);

        self.trade_count += 1;
        if created {
            self.level_count += 1;
            trace!(stock = %self.stock_name, key, levels = self.level_count, "new trade level");
        }

        Ok(())
    }

    /// Every trade, ascending by value; equal values keep arrival order
    #[must_use]
    pub fn all_trades(&self) -> Vec<&Trade> {
        let mut out = Vec::with_capacity(self.trade_count);
        out.extend(self.levels().flat_map(|(_, trades)| trades.iter()));
        out
    }

    /// In-order iterator over `(value, trades)` pairs
    #[must_use]
    pub fn levels(&self) -> Levels<'_> {
        Levels::new(self.root.as_deref())
    }

    /// Trades whose value is exactly `key`
    #[must_use]
    pub fn trades_at(&self, key: f64) -> &[Trade] {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match key.total_cmp(&node.key) {
                Ordering::Equal => return &node.trades,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        &[]
    }

    /// Trades at the smallest value
    #[must_use]
    pub fn min_trades(&self) -> &[Trade] {
        let Some(mut node) = self.root.as_deref() else {
            return &[];
        };
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        &node.trades
    }

    /// Trades at the largest value
    #[must_use]
    pub fn max_trades(&self) -> &[Trade] {
        let Some(mut node) = self.root.as_deref() else {
            return &[];
        };
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        &node.trades
    }

    /// Trades at the greatest value `<= threshold`
    #[must_use]
    pub fn floor_trades(&self, threshold: f64) -> &[Trade] {
        let mut best: &[Trade] = &[];
        let mut cursor = self.root.as_deref();

        while let Some(node) = cursor {
            match node.key.total_cmp(&threshold) {
                Ordering::Equal => return &node.trades,
                Ordering::Less => {
                    best = &node.trades;
                    cursor = node.right.as_deref();
                }
                Ordering::Greater => cursor = node.left.as_deref(),
            }
        }

        best
    }

    /// Trades at the least value `>= threshold`
    #[must_use]
    pub fn ceiling_trades(&self, threshold: f64) -> &[Trade] {
        let mut best: &[Trade] = &[];
        let mut cursor = self.root.as_deref();

        while let Some(node) = cursor {
            match node.key.total_cmp(&threshold) {
                Ordering::Equal => return &node.trades,
                Ordering::Greater => {
                    best = &node.trades;
                    cursor = node.left.as_deref();
                }
                Ordering::Less => cursor = node.right.as_deref(),
            }
        }

        best
    }

    /// Trades with `low <= value <= high`, ascending by value
    pub fn trades_in_range(&self, low: f64, high: f64) -> Result<Vec<&Trade>, TradeIndexError> {
        if low.is_nan() || high.is_nan() || low > high || low < 0.0 {
            return Err(TradeIndexError::InvalidRangeBounds { low, high });
        }

        let mut out = Vec::new();
        if let Some(root) = self.root.as_deref() {
            collect_range(root, low, high, &mut out);
        }
        Ok(out)
    }

    /// Verify ordering, coloring, black balance and level contents
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if is_red(&self.root) {
            return Err(InvariantViolation::RedRoot);
        }
        check_subtree(self.root.as_deref(), None, None).map(|_| ())
    }
}

/// In-order iterator over the levels of a [`TradeIndex`]
#[derive(Debug)]
pub struct Levels<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Levels<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut levels = Self { stack: Vec::new() };
        levels.push_left_spine(root);
        levels
    }

    fn push_left_spine(&mut self, mut cursor: Option<&'a Node>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            cursor = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Levels<'a> {
    type Item = (f64, &'a [Trade]);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((node.key, node.trades.as_slice()))
    }
}
