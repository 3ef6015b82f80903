//! Read-index selection ranges.
//!
//! Users select A-reads with 1-based inclusive ranges such as `5`, `10-20`,
//! `30-$` (to the end of the database) or `$` (the last read). The ranges are
//! sorted and merged into a [`ReadRanges`], which hands out a [`RangeFilter`]
//! that walks the merged intervals in step with the A-read-sorted overlap
//! stream.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::errors::FgovlError;

/// Symbol standing for the last read of the database.
pub const LAST_READ_SYMBOL: char = '$';

/// One end of a user-supplied read range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeBound {
    /// A 1-based read index.
    Index(u32),
    /// The `$` symbol.
    Last,
}

/// A read range as written on the command line, before resolution against a database.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeSpec {
    /// First read of the range.
    pub begin: RangeBound,
    /// Last read of the range, if the argument named one.
    pub end: Option<RangeBound>,
}

impl RangeSpec {
    /// Resolves the range to 1-based inclusive bounds.
    ///
    /// `$` as a start is the last read of a database with `nreads` reads; `$`
    /// as an end leaves the range open.
    fn resolve(&self, nreads: usize) -> Result<ReadInterval> {
        let last = u32::try_from(nreads).unwrap_or(u32::MAX);
        let begin = match self.begin {
            RangeBound::Index(i) => i,
            RangeBound::Last => last,
        };
        let end = match self.end {
            None => begin,
            Some(RangeBound::Index(i)) => i,
            Some(RangeBound::Last) => u32::MAX,
        };
        if begin == 0 {
            return Err(FgovlError::InvalidRanges { reason: format!("{begin} is not a valid index") }
                .into());
        }
        if begin > end {
            return Err(FgovlError::InvalidRanges { reason: format!("Empty range '{self}'") }.into());
        }
        Ok(ReadInterval { begin, end })
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: RangeBound| match b {
            RangeBound::Index(i) => i.to_string(),
            RangeBound::Last => LAST_READ_SYMBOL.to_string(),
        };
        write!(f, "{}", bound(self.begin))?;
        if let Some(end) = self.end {
            write!(f, "-{}", bound(end))?;
        }
        Ok(())
    }
}

impl FromStr for RangeSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let not_a_range = || format!("argument '{s}' is not an integer range");
        let parse_bound = |text: &str| -> std::result::Result<RangeBound, String> {
            if text.len() == 1 && text.starts_with(LAST_READ_SYMBOL) {
                return Ok(RangeBound::Last);
            }
            let value: u32 = text.parse().map_err(|_| not_a_range())?;
            if value == 0 {
                return Err(format!("{value} is not a valid index"));
            }
            Ok(RangeBound::Index(value))
        };

        match s.split_once('-') {
            None => Ok(Self { begin: parse_bound(s)?, end: None }),
            Some((b, e)) => Ok(Self { begin: parse_bound(b)?, end: Some(parse_bound(e)?) }),
        }
    }
}

/// A 1-based inclusive interval of read indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadInterval {
    /// First selected read.
    pub begin: u32,
    /// Last selected read.
    pub end: u32,
}

impl ReadInterval {
    /// Creates an interval.
    #[must_use]
    pub const fn new(begin: u32, end: u32) -> Self {
        Self { begin, end }
    }
}

/// Sorted, merged, non-empty read-index intervals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadRanges {
    intervals: Vec<ReadInterval>,
}

impl ReadRanges {
    /// Selects every read.
    #[must_use]
    pub fn all() -> Self {
        Self { intervals: vec![ReadInterval::new(1, u32::MAX)] }
    }

    /// Wraps intervals that are already sorted and disjoint.
    ///
    /// # Errors
    ///
    /// Returns an error if an interval starts at zero or is empty, or if the
    /// intervals are not strictly ascending and disjoint.
    pub fn new(intervals: Vec<ReadInterval>) -> Result<Self> {
        for interval in &intervals {
            if interval.begin == 0 || interval.begin > interval.end {
                return Err(FgovlError::InvalidRanges {
                    reason: format!("interval {}-{} is empty", interval.begin, interval.end),
                }
                .into());
            }
        }
        if let Some(pair) = intervals.windows(2).find(|w| w[1].begin <= w[0].end) {
            return Err(FgovlError::InvalidRanges {
                reason: format!(
                    "intervals {}-{} and {}-{} are unsorted or overlap",
                    pair[0].begin, pair[0].end, pair[1].begin, pair[1].end
                ),
            }
            .into());
        }
        Ok(Self { intervals })
    }

    /// Resolves command-line range arguments against a database of `nreads`
    /// reads, then sorts and merges them. No arguments selects every read.
    ///
    /// # Errors
    ///
    /// Returns an error if a range is empty or starts at zero.
    pub fn from_specs(specs: &[RangeSpec], nreads: usize) -> Result<Self> {
        if specs.is_empty() {
            return Ok(Self::all());
        }
        let intervals =
            specs.iter().map(|spec| spec.resolve(nreads)).collect::<Result<Vec<_>>>()?;
        Ok(Self { intervals: merge(intervals) })
    }

    /// Builds ranges selecting exactly the given 1-based read indices.
    ///
    /// # Errors
    ///
    /// Returns an error if any index is zero.
    pub fn from_indices<I: IntoIterator<Item = u32>>(indices: I) -> Result<Self> {
        let mut intervals = Vec::new();
        for index in indices {
            if index == 0 {
                return Err(
                    FgovlError::InvalidRanges { reason: "0 is not a valid index".to_string() }
                        .into(),
                );
            }
            intervals.push(ReadInterval::new(index, index));
        }
        Ok(Self { intervals: merge(intervals) })
    }

    /// The merged intervals.
    #[must_use]
    pub fn intervals(&self) -> &[ReadInterval] {
        &self.intervals
    }

    /// Whether no read can be selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// A fresh filter positioned before the first interval.
    #[must_use]
    pub fn filter(&self) -> RangeFilter<'_> {
        RangeFilter { intervals: &self.intervals, cursor: 0, state: RangeState::Outside }
    }
}

/// Sorts intervals by start and merges overlapping or adjacent ones.
fn merge(mut intervals: Vec<ReadInterval>) -> Vec<ReadInterval> {
    intervals.sort_by_key(|i| (i.begin, i.end));
    let mut merged: Vec<ReadInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if last.end >= interval.begin.saturating_sub(1) => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Reads a whitespace-separated list of 1-based read indices from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or an item is not a positive integer.
pub fn read_index_list<P: AsRef<Path>>(path: P) -> Result<ReadRanges> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read read-index list: {}", path.display()))?;
    let indices = text
        .split_whitespace()
        .enumerate()
        .map(|(i, item)| {
            item.parse::<u32>().map_err(|_| FgovlError::InvalidRanges {
                reason: format!(
                    "item {} ('{item}') of {} is not an integer",
                    i + 1,
                    path.display()
                ),
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    ReadRanges::from_indices(indices)
}

/// Whether the filter is currently inside a selected interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeState {
    /// Between intervals (or before the first one).
    Outside,
    /// Within the interval under the cursor.
    Inside,
}

/// Accepts or rejects a non-decreasing stream of 1-based read indices.
///
/// The cursor only moves forward, so each interval is examined a bounded
/// number of times over the whole stream.
#[derive(Clone, Debug)]
pub struct RangeFilter<'a> {
    intervals: &'a [ReadInterval],
    cursor: usize,
    state: RangeState,
}

impl RangeFilter<'_> {
    /// Whether the 1-based read `index` lies in a selected interval.
    ///
    /// Indices must be presented in non-decreasing order.
    pub fn accepts(&mut self, index: u32) -> bool {
        loop {
            let Some(interval) = self.intervals.get(self.cursor) else {
                self.state = RangeState::Outside;
                return false;
            };
            match self.state {
                RangeState::Outside => {
                    if index < interval.begin {
                        return false;
                    }
                    self.state = RangeState::Inside;
                }
                RangeState::Inside => {
                    if index <= interval.end {
                        return true;
                    }
                    self.state = RangeState::Outside;
                    self.cursor += 1;
                }
            }
        }
    }

    /// The filter's current state.
    #[must_use]
    pub fn state(&self) -> RangeState {
        self.state
    }
}
