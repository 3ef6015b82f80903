//! Dazzler `.las` overlap files.
//!
//! A `.las` file is a little-endian header `{novl: i64, tspace: i32}` followed
//! by `novl` fixed-layout overlap records, each trailed by its trace points.
//! This module holds the record types; [`reader`] holds the streaming decoder.

pub mod reader;

pub use reader::{LasReader, LasRecord};

/// Trace spacings at or below this value store one byte per trace element,
/// larger spacings two bytes.
pub const TRACE_XOVR: i32 = 125;

/// Size in bytes of the `.las` file header.
pub const LAS_HEADER_LEN: usize = 12;

/// Size in bytes of one fixed-layout overlap record (trace excluded).
pub const LAS_RECORD_LEN: usize = 40;

/// Overlap flag: the B-read is reverse complemented.
pub const COMP_FLAG: u32 = 0x1;

/// Overlap flag: the A-read is reverse complemented.
pub const ACOMP_FLAG: u32 = 0x2;

/// The `.las` file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LasHeader {
    /// Number of overlap records in the file.
    pub novl: i64,
    /// Spacing of trace points along the A-read.
    pub tspace: i32,
}

impl LasHeader {
    /// Whether trace elements are stored as single bytes.
    #[must_use]
    pub const fn small_trace(&self) -> bool {
        self.tspace <= TRACE_XOVR
    }

    /// Width in bytes of one stored trace element.
    #[must_use]
    pub const fn trace_bytes(&self) -> usize {
        if self.small_trace() { 1 } else { 2 }
    }
}

/// Orientation and status bits of an overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OverlapFlags(u32);

impl OverlapFlags {
    /// Wraps raw flag bits.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw flag bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether the B-read aligns in reverse-complement orientation.
    #[must_use]
    pub const fn is_complemented(self) -> bool {
        self.0 & COMP_FLAG != 0
    }
}

/// Alignment coordinates of an overlap.
///
/// Positions are 0-based, half-open. When the overlap is complemented the B
/// coordinates refer to the reverse complement of the B-read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlapPath {
    /// Start on the A-read.
    pub abpos: i32,
    /// End on the A-read.
    pub aepos: i32,
    /// Start on the B-read.
    pub bbpos: i32,
    /// End on the B-read.
    pub bepos: i32,
    /// Number of differences in the alignment.
    pub diffs: i32,
    /// Number of trace elements following the record.
    pub tlen: i32,
}

/// One overlap between an A-read and a B-read, without its trace.
///
/// Records are small and `Copy`, so groups keep their own copies while the
/// trace stays in the reader's reusable buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlapRecord {
    /// 0-based index of the A-read.
    pub aread: u32,
    /// 0-based index of the B-read.
    pub bread: u32,
    /// Orientation flags.
    pub flags: OverlapFlags,
    /// Alignment coordinates.
    pub path: OverlapPath,
}

impl OverlapRecord {
    /// Whether the B-read aligns in reverse-complement orientation.
    #[must_use]
    pub const fn is_complemented(&self) -> bool {
        self.flags.is_complemented()
    }

    /// Encodes the fixed-layout part of the record as stored in a `.las` file.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; LAS_RECORD_LEN] {
        let p = &self.path;
        let mut out = [0u8; LAS_RECORD_LEN];
        let fields: [[u8; 4]; 9] = [
            p.tlen.to_le_bytes(),
            p.diffs.to_le_bytes(),
            p.abpos.to_le_bytes(),
            p.bbpos.to_le_bytes(),
            p.aepos.to_le_bytes(),
            p.bepos.to_le_bytes(),
            self.flags.bits().to_le_bytes(),
            self.aread.to_le_bytes(),
            self.bread.to_le_bytes(),
        ];
        for (chunk, field) in out.chunks_exact_mut(4).zip(fields.iter()) {
            chunk.copy_from_slice(field);
        }
        out
    }
}
