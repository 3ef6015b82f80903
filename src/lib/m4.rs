//! M4-style overlap listing.
//!
//! Each selected overlap becomes one line:
//!
//! ```text
//! aread bread score accuracy 0 abpos aepos alen comp bbpos bepos blen kind
//! ```
//!
//! with read indices zero-padded to nine digits, B coordinates on the forward
//! strand of the B-read, and `kind` one of `contains`, `contained` or `overlap`.

use std::fmt;
use std::io::{Read, Write};

use anyhow::{Context, Result};

use crate::db::{SequenceSource, coordinate_len};
use crate::las::{LasReader, OverlapRecord};
use crate::metrics::M4Metrics;
use crate::progress::ProgressTracker;
use crate::ranges::ReadRanges;

/// How the two reads of an overlap relate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlapKind {
    /// The B-read lies entirely within the longer A-read.
    Contains,
    /// The A-read lies entirely within the longer B-read.
    Contained,
    /// Any other overlap.
    Overlap,
}

impl fmt::Display for OverlapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Contains => "contains",
            Self::Contained => "contained",
            Self::Overlap => "overlap",
        })
    }
}

/// One overlap in M4 terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct M4Line {
    /// 0-based A-read index.
    pub aread: u32,
    /// 0-based B-read index.
    pub bread: u32,
    /// Negated length of the overlap on the B-read.
    pub score: i64,
    /// Percent identity estimated from the difference count; `NaN` when the
    /// alignment is empty on both reads.
    pub accuracy: f64,
    /// Start on the A-read.
    pub abpos: i32,
    /// End on the A-read.
    pub aepos: i32,
    /// Length of the A-read.
    pub alen: i32,
    /// Whether the B-read aligns reverse complemented.
    pub complemented: bool,
    /// Start on the forward strand of the B-read.
    pub bbpos: i64,
    /// End on the forward strand of the B-read.
    pub bepos: i64,
    /// Length of the B-read.
    pub blen: i32,
    /// Containment relation.
    pub kind: OverlapKind,
}

impl M4Line {
    /// Describes `record` given the lengths of its two reads.
    #[must_use]
    pub fn new(record: &OverlapRecord, alen: i32, blen: i32) -> Self {
        let path = &record.path;
        let (bbpos, bepos) = if record.is_complemented() {
            (i64::from(blen) - i64::from(path.bepos), i64::from(blen) - i64::from(path.bbpos))
        } else {
            (i64::from(path.bbpos), i64::from(path.bepos))
        };

        let aligned = i64::from(path.aepos) - i64::from(path.abpos) + i64::from(path.bepos)
            - i64::from(path.bbpos);
        let accuracy = if aligned == 0 {
            f64::NAN
        } else {
            #[expect(clippy::cast_precision_loss, reason = "alignment lengths fit in an f64")]
            let aligned = aligned as f64;
            100.0 - (200.0 * f64::from(path.diffs)) / aligned
        };

        let kind = if blen < alen && path.bbpos < 1 && blen - path.bepos < 1 {
            OverlapKind::Contains
        } else if alen < blen && path.abpos < 1 && alen - path.aepos < 1 {
            OverlapKind::Contained
        } else {
            OverlapKind::Overlap
        };

        Self {
            aread: record.aread,
            bread: record.bread,
            score: bbpos - bepos,
            accuracy,
            abpos: path.abpos,
            aepos: path.aepos,
            alen,
            complemented: record.is_complemented(),
            bbpos,
            bepos,
            blen,
            kind,
        }
    }
}

impl fmt::Display for M4Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:09} {:09} {} ", self.aread, self.bread, self.score)?;
        if self.accuracy.is_nan() {
            write!(f, "{:>5}", "nan")?;
        } else {
            write!(f, "{:5.2}", self.accuracy)?;
        }
        write!(
            f,
            " 0 {} {} {} {} {} {} {} {}",
            self.abpos,
            self.aepos,
            self.alen,
            u8::from(self.complemented),
            self.bbpos,
            self.bepos,
            self.blen,
            self.kind
        )
    }
}

/// Whether the overlap reaches an end of both reads: it starts at the start
/// of one read and ends at the end of one read.
#[must_use]
pub fn is_proper_overlap(record: &OverlapRecord, alen: i32, blen: i32) -> bool {
    let path = &record.path;
    (path.abpos == 0 || path.bbpos == 0) && (path.aepos == alen || path.bepos == blen)
}

/// Writes M4 lines for the selected records of a LAS stream.
pub struct M4Writer<'a, S: SequenceSource + ?Sized, W: Write> {
    a_db: &'a S,
    b_db: &'a S,
    out: W,
    proper_only: bool,
    metrics: M4Metrics,
}

impl<'a, S: SequenceSource + ?Sized, W: Write> M4Writer<'a, S, W> {
    /// Creates a writer; with `proper_only` only proper overlaps are listed.
    pub fn new(a_db: &'a S, b_db: &'a S, out: W, proper_only: bool) -> Self {
        Self { a_db, b_db, out, proper_only, metrics: M4Metrics::default() }
    }

    /// Lists every record of `reader` whose A-read lies in `ranges`.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be read, a read is missing from a
    /// database, or the output cannot be written.
    pub fn run<R: Read>(
        mut self,
        reader: &mut LasReader<R>,
        ranges: &ReadRanges,
    ) -> Result<(W, M4Metrics)> {
        let mut filter = ranges.filter();
        let mut progress = ProgressTracker::new("Read overlap records");
        while let Some(record) = reader.next_record()? {
            let overlap = record.overlap;
            self.metrics.records_read += 1;
            progress.record(1);
            if filter.accepts(overlap.aread.saturating_add(1)) {
                self.write_record(&overlap)?;
            }
        }
        progress.log_final();
        self.out.flush().context("Failed to flush M4 output")?;
        Ok((self.out, self.metrics))
    }

    /// Writes the line of one selected record, unless filtered as improper.
    ///
    /// # Errors
    ///
    /// Returns an error if a read is missing from a database or the write fails.
    pub fn write_record(&mut self, record: &OverlapRecord) -> Result<()> {
        self.metrics.records_in_range += 1;
        let alen = coordinate_len(self.a_db, record.aread)?;
        let blen = coordinate_len(self.b_db, record.bread)?;
        if self.proper_only && !is_proper_overlap(record, alen, blen) {
            self.metrics.improper_overlaps_skipped += 1;
            return Ok(());
        }

        let line = M4Line::new(record, alen, blen);
        writeln!(self.out, "{line}")?;
        self.metrics.lines_written += 1;
        match line.kind {
            OverlapKind::Contains => self.metrics.contains += 1,
            OverlapKind::Contained => self.metrics.contained += 1,
            OverlapKind::Overlap => self.metrics.overlaps += 1,
        }
        Ok(())
    }
}
