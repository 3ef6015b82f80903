//! Writer for the consensus-input text stream.
//!
//! The stream is a sequence of blocks, one per A-read:
//!
//! ```text
//! 00000000 ACGTACGT...      A-read index and full forward sequence
//! 00000007 CGTACG...        B-read index and supporting slice, best first
//! 00000009 TTACG...
//! + +                       end of block
//! ```
//!
//! and a final `- -` line. A `* *` line inside a block marks an A-read found to
//! be contained in one of its B-reads.

use std::io::Write;

use anyhow::{Context, Result, bail};
use log::warn;

use crate::db::{ReadBuffer, ReadEncoding, SequenceSource};
use crate::grouper::OverlapGroup;

/// Supporting slices at least this long are skipped.
pub const SCRATCH_CAPACITY: usize = 131_072;

/// Terminates the block of one A-read.
pub const BLOCK_END: &[u8] = b"+ +\n";

/// Terminates the stream.
pub const STREAM_END: &[u8] = b"- -\n";

/// Marks an A-read contained in a longer B-read.
pub const CONTAINED_MARKER: &[u8] = b"* *\n";

/// What happened to the hits of one block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitCounts {
    /// Supporting slices written.
    pub written: u64,
    /// Slices skipped for reaching the scratch capacity.
    pub oversized: u64,
}

/// Writes consensus-input blocks to an underlying writer.
pub struct ConsensusEmitter<W: Write> {
    out: W,
    scratch_capacity: usize,
    a_buffer: ReadBuffer,
    b_buffer: ReadBuffer,
}

impl<W: Write> ConsensusEmitter<W> {
    /// Creates an emitter using the standard scratch capacity.
    pub fn new(out: W) -> Self {
        Self::with_scratch_capacity(out, SCRATCH_CAPACITY)
    }

    /// Creates an emitter that skips slices of `scratch_capacity` bases or more.
    pub fn with_scratch_capacity(out: W, scratch_capacity: usize) -> Self {
        Self {
            out,
            scratch_capacity,
            a_buffer: ReadBuffer::default(),
            b_buffer: ReadBuffer::default(),
        }
    }

    /// Writes the header line of A-read `aread` with its full uppercase sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the read cannot be loaded or the write fails.
    pub fn write_header<S: SequenceSource + ?Sized>(&mut self, db: &S, aread: u32) -> Result<()> {
        db.load_read(aread as usize, ReadEncoding::Upper, &mut self.a_buffer)?;
        write!(self.out, "{aread:08} ")?;
        self.out.write_all(self.a_buffer.as_bytes())?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    /// Writes the supporting slice of every hit, in order, then the block terminator.
    ///
    /// Each B-read is reverse complemented when its group is complemented and
    /// uppercased before the group's B span is cut out. Slices reaching the
    /// scratch capacity are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if a B-read cannot be loaded, a span lies outside its
    /// read, or the write fails.
    pub fn write_hits<S: SequenceSource + ?Sized>(
        &mut self,
        db: &S,
        hits: &[OverlapGroup],
    ) -> Result<HitCounts> {
        let mut counts = HitCounts::default();
        for hit in hits {
            let bread = hit.bread();
            let (start, end) = hit.b_span();
            let len = i64::from(end) - i64::from(start);
            if len >= self.scratch_capacity as i64 {
                warn!(
                    "Skipping super-long read {bread:08}, len={len}, buf={}",
                    self.scratch_capacity
                );
                counts.oversized += 1;
                continue;
            }

            db.load_read(bread as usize, ReadEncoding::Numeric, &mut self.b_buffer)?;
            if hit.is_complemented() {
                self.b_buffer.reverse_complement();
            }
            self.b_buffer.convert(ReadEncoding::Upper);

            let bases = self.b_buffer.as_bytes();
            let slice = usize::try_from(start)
                .ok()
                .zip(usize::try_from(end).ok())
                .and_then(|(s, e)| bases.get(s..e));
            let Some(slice) = slice else {
                bail!(
                    "B span [{start}, {end}) of read {bread} lies outside the read (length {})",
                    bases.len()
                );
            };

            write!(self.out, "{bread:08} ")?;
            self.out.write_all(slice)?;
            self.out.write_all(b"\n")?;
            counts.written += 1;
        }
        self.out.write_all(BLOCK_END)?;
        Ok(counts)
    }

    /// Writes the contained-read marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_contained_marker(&mut self) -> Result<()> {
        self.out.write_all(CONTAINED_MARKER)?;
        Ok(())
    }

    /// Writes the stream terminator, flushes, and returns the writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the write or flush fails.
    pub fn finish(mut self) -> Result<W> {
        self.out.write_all(STREAM_END)?;
        self.out.flush().context("Failed to flush consensus output")?;
        Ok(self.out)
    }
}
