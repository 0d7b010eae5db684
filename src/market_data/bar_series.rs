use std::collections::VecDeque;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single validated OHLC bar.
///
/// Bars are only produced by [`crate::market_data::ingest`] (or
/// [`Bar::new`]), so every price is finite and the timestamp is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub timestamp: String,
}

/// Close/high/low vectors derived from a [`BarSeries`], oldest-first.
///
/// All three vectors always have the same length as the series they were
/// built from.
#[derive(Debug, Clone, Default)]
pub struct PriceVectors {
    pub closes: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
}

impl PriceVectors {
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// BarSeries -- bounded FIFO of bars
// ---------------------------------------------------------------------------

/// Bounded rolling history of bars in arrival order.  Once `capacity` is
/// reached every push evicts exactly one bar from the front.
#[derive(Debug, Clone)]
pub struct BarSeries {
    bars: VecDeque<Bar>,
    capacity: usize,
}

impl BarSeries {
    /// Create an empty series that retains at most `capacity` bars.  A
    /// capacity of zero is bumped to one so the latest bar is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            bars: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append `bar` and return the evicted bar, if any.
    pub fn push(&mut self, bar: Bar) -> Option<Bar> {
        self.bars.push_back(bar);
        if self.bars.len() > self.capacity {
            self.bars.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recently pushed bar.
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Build the parallel close/high/low vectors in one pass.
    pub fn price_vectors(&self) -> PriceVectors {
        let n = self.bars.len();
        let mut pv = PriceVectors {
            closes: Vec::with_capacity(n),
            highs: Vec::with_capacity(n),
            lows: Vec::with_capacity(n),
        };
        for bar in &self.bars {
            pv.closes.push(bar.close);
            pv.highs.push(bar.high);
            pv.lows.push(bar.low);
        }
        pv
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
