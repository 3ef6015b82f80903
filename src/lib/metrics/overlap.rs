//! Metrics for the `falcon` and `m4` commands.

use serde::{Deserialize, Serialize};

use super::{Metric, ProcessingMetrics};

/// Counts collected while turning overlaps into consensus-input blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FalconMetrics {
    /// Records read from the LAS file
    pub records_read: u64,

    /// Records whose A-read lies in a selected range
    pub records_in_range: u64,

    /// A-reads with at least one record in range
    pub a_reads: u64,

    /// Overlap groups started
    pub groups: u64,

    /// Records folded into an existing group
    pub records_grouped: u64,

    /// Supporting slices written
    pub hits_emitted: u64,

    /// Supporting slices skipped for exceeding the output buffer
    pub oversized_hits_skipped: u64,

    /// Records ignored because the group table of their A-read was full
    pub records_over_capacity: u64,

    /// A-reads found contained in a longer B-read
    pub contained_a_reads: u64,

    /// Records ignored after their A-read was found contained
    pub records_after_containment: u64,

    /// A-reads whose B-reads arrived out of order
    pub a_reads_with_unsorted_b_reads: u64,
}

impl FalconMetrics {
    /// Creates metrics with all counts zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metric for FalconMetrics {
    fn metric_name() -> &'static str {
        "falcon"
    }
}

impl ProcessingMetrics for FalconMetrics {
    fn total_input(&self) -> u64 {
        self.records_in_range
    }

    fn total_output(&self) -> u64 {
        self.hits_emitted
    }
}

/// Counts collected while listing overlaps in M4 format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct M4Metrics {
    /// Records read from the LAS file
    pub records_read: u64,

    /// Records whose A-read lies in a selected range
    pub records_in_range: u64,

    /// Records dropped for not being proper overlaps
    pub improper_overlaps_skipped: u64,

    /// Lines written
    pub lines_written: u64,

    /// Lines describing an A-read containing its B-read
    pub contains: u64,

    /// Lines describing an A-read contained in its B-read
    pub contained: u64,

    /// Lines describing a dovetail or partial overlap
    pub overlaps: u64,
}

impl Metric for M4Metrics {
    fn metric_name() -> &'static str {
        "m4"
    }
}

impl ProcessingMetrics for M4Metrics {
    fn total_input(&self) -> u64 {
        self.records_in_range
    }

    fn total_output(&self) -> u64 {
        self.lines_written
    }
}
