//! The consensus-input pipeline.
//!
//! [`FalconPipeline`] consumes an A-read-sorted stream of overlap records and
//! writes, for every A-read with at least one record in the selected ranges, a
//! block holding the A-read and the best supporting B-read slices:
//!
//! 1. records outside the selected read ranges are dropped;
//! 2. records of the current A-read are folded into overlap groups;
//! 3. when the A-read changes (and at the end of the stream) the groups are
//!    ranked, truncated to the hit limit and written out.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::db::{SequenceSource, coordinate_len};
use crate::emitter::{ConsensusEmitter, SCRATCH_CAPACITY};
use crate::grouper::{AlignmentContext, DEFAULT_MAX_GROUPS, GroupBuilder, GroupTable};
use crate::las::{LasReader, OverlapRecord};
use crate::metrics::FalconMetrics;
use crate::progress::ProgressTracker;
use crate::ranges::ReadRanges;
use crate::selector::{DEFAULT_MAX_HITS, select_hits};

/// Options controlling grouping, selection and output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FalconConfig {
    /// Fold consecutive overlaps of one read pair into a single group.
    pub grouping: bool,
    /// Maximum supporting reads written per A-read.
    pub max_hits: usize,
    /// Maximum groups kept per A-read.
    pub max_groups: usize,
    /// Stop collecting overlaps for an A-read once it is found contained in a B-read.
    pub skip_contained: bool,
    /// Supporting slices at least this long are skipped.
    pub scratch_capacity: usize,
}

impl Default for FalconConfig {
    fn default() -> Self {
        Self {
            grouping: false,
            max_hits: DEFAULT_MAX_HITS,
            max_groups: DEFAULT_MAX_GROUPS,
            skip_contained: false,
            scratch_capacity: SCRATCH_CAPACITY,
        }
    }
}

/// State of the A-read whose records are being collected.
#[derive(Clone, Copy, Debug)]
struct ARead {
    index: u32,
    len: i32,
    /// Set once the A-read is found contained; later records are ignored.
    contained: bool,
    last_bread: Option<u32>,
    unsorted: bool,
}

/// Owns the group table, the emitter and the run's metrics.
pub struct FalconPipeline<'a, S: SequenceSource + ?Sized, W: Write> {
    config: FalconConfig,
    a_db: &'a S,
    b_db: &'a S,
    builder: GroupBuilder,
    table: GroupTable,
    emitter: ConsensusEmitter<W>,
    current: Option<ARead>,
    metrics: FalconMetrics,
}

impl<'a, S: SequenceSource + ?Sized, W: Write> FalconPipeline<'a, S, W> {
    /// Creates a pipeline reading A-reads from `a_db`, B-reads from `b_db` and
    /// writing to `out`.
    pub fn new(config: FalconConfig, a_db: &'a S, b_db: &'a S, out: W) -> Self {
        Self {
            config,
            a_db,
            b_db,
            builder: GroupBuilder::new(config.grouping),
            table: GroupTable::new(config.max_groups),
            emitter: ConsensusEmitter::with_scratch_capacity(out, config.scratch_capacity),
            current: None,
            metrics: FalconMetrics::new(),
        }
    }

    /// Processes every record of `reader` whose A-read lies in `ranges`, then
    /// finishes the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be read, a read is missing from a
    /// database, or the output cannot be written.
    pub fn run<R: Read>(
        mut self,
        reader: &mut LasReader<R>,
        ranges: &ReadRanges,
    ) -> Result<(W, FalconMetrics)> {
        let mut filter = ranges.filter();
        let mut progress = ProgressTracker::new("Read overlap records");
        while let Some(record) = reader.next_record()? {
            let overlap = record.overlap;
            self.metrics.records_read += 1;
            progress.record(1);
            if filter.accepts(overlap.aread.saturating_add(1)) {
                self.add_record(&overlap)?;
            }
        }
        progress.log_final();
        self.finish()
    }

    /// Adds one record whose A-read has been selected.
    ///
    /// Records must arrive sorted by A-read. A change of A-read writes the
    /// previous A-read's hits and the new A-read's header.
    ///
    /// # Errors
    ///
    /// Returns an error if a read is missing from a database or the output
    /// cannot be written.
    pub fn add_record(&mut self, record: &OverlapRecord) -> Result<()> {
        self.metrics.records_in_range += 1;
        let alen = coordinate_len(self.a_db, record.aread)?;
        let blen = coordinate_len(self.b_db, record.bread)?;

        if self.current.is_none_or(|a| a.index != record.aread) {
            self.start_a_read(record.aread, alen)?;
        }
        let Some(aread) = self.current.as_mut() else {
            return Ok(());
        };

        if aread.contained {
            self.metrics.records_after_containment += 1;
            return Ok(());
        }
        if self.table.is_full() {
            self.metrics.records_over_capacity += 1;
            return Ok(());
        }

        if aread.last_bread.is_some_and(|last| record.bread < last) && !aread.unsorted {
            warn!(
                "B-reads of A-read {} are not sorted (B-read {} follows {}); \
                 overlaps of one B-read may be split across groups",
                aread.index,
                record.bread,
                aread.last_bread.unwrap_or_default()
            );
            aread.unsorted = true;
            self.metrics.a_reads_with_unsorted_b_reads += 1;
        }
        aread.last_bread = Some(record.bread);

        let context = AlignmentContext { alen, blen };
        if self.builder.add_overlap(&mut self.table, context, record) {
            self.metrics.groups += 1;
        } else {
            self.metrics.records_grouped += 1;
        }

        if self.config.skip_contained && is_a_contained(context, record) {
            debug!("A-read {} is contained in B-read {}", aread.index, record.bread);
            self.emitter.write_contained_marker()?;
            aread.contained = true;
            self.metrics.contained_a_reads += 1;
        }
        Ok(())
    }

    /// Writes the hits of the last A-read and the stream terminator.
    ///
    /// # Errors
    ///
    /// Returns an error if a B-read cannot be loaded or the output cannot be written.
    pub fn finish(mut self) -> Result<(W, FalconMetrics)> {
        self.write_hits()?;
        let out = self.emitter.finish()?;
        Ok((out, self.metrics))
    }

    /// Metrics collected so far.
    #[must_use]
    pub fn metrics(&self) -> &FalconMetrics {
        &self.metrics
    }

    fn start_a_read(&mut self, index: u32, len: i32) -> Result<()> {
        self.write_hits()?;
        self.emitter
            .write_header(self.a_db, index)
            .with_context(|| format!("Failed to write A-read {index}"))?;
        self.current =
            Some(ARead { index, len, contained: false, last_bread: None, unsorted: false });
        self.metrics.a_reads += 1;
        Ok(())
    }

    /// Ranks and writes the groups of the current A-read, then resets the table.
    fn write_hits(&mut self) -> Result<()> {
        let Some(aread) = self.current else {
            return Ok(());
        };
        let hits = select_hits(self.table.groups_mut(), self.config.max_hits);
        let counts = self
            .emitter
            .write_hits(self.b_db, hits)
            .with_context(|| format!("Failed to write hits of A-read {}", aread.index))?;
        debug!(
            "A-read {} (length {}): {} groups, {} hits written",
            aread.index,
            aread.len,
            self.table.len(),
            counts.written
        );
        self.metrics.hits_emitted += counts.written;
        self.metrics.oversized_hits_skipped += counts.oversized;
        self.table.clear();
        Ok(())
    }
}

/// Whether the overlap shows the A-read lying entirely within a longer B-read.
#[must_use]
pub fn is_a_contained(context: AlignmentContext, record: &OverlapRecord) -> bool {
    context.alen < context.blen && record.path.abpos < 1 && context.alen - record.path.aepos < 1
}
