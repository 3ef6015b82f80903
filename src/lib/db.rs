//! Read access to Dazzler sequence databases (`.db` / `.dam`).
//!
//! A database `reads.db` is a small text stub plus two hidden files in the same
//! directory: `.reads.idx`, a binary header followed by one fixed-size record
//! per read, and `.reads.bps`, the 2-bit packed bases of every read. The whole
//! `.bps` blob is loaded into memory once so that reads can be materialized
//! without per-read file I/O.
//!
//! Only full (non-block) databases are supported. Trimming follows the stub's
//! `cutoff`/`all` parameters: reads shorter than the cutoff are dropped, and
//! unless `all` is set only the best read of each well is kept.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fgovl_dna::{
    ascii_to_codes, codes_to_lower, codes_to_upper, complement_base, pack_bases, packed_len,
    reverse_complement_codes_in_place, unpack_bases,
};
use log::debug;

use crate::errors::FgovlError;

/// Size in bytes of the `.idx` header.
pub const IDX_HEADER_LEN: usize = 112;

/// Size in bytes of one read record in the `.idx` file.
pub const IDX_READ_LEN: usize = 40;

/// Read flag marking the best read of a well.
pub const DB_BEST: i32 = 0x0800;

/// Metadata of one read in the database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadInfo {
    /// Offset of the read within its original read.
    pub origin: i32,
    /// Length of the read in bases.
    pub rlen: i32,
    /// First pulse.
    pub fpulse: i32,
    /// Byte offset of the packed read in the `.bps` blob.
    pub boff: i64,
    /// Byte offset of the read's quality or header data.
    pub coff: i64,
    /// Quality value and flag bits.
    pub flags: i32,
}

impl ReadInfo {
    /// Encodes the record as stored in a `.idx` file.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; IDX_READ_LEN] {
        let mut out = [0u8; IDX_READ_LEN];
        out[0..4].copy_from_slice(&self.origin.to_le_bytes());
        out[4..8].copy_from_slice(&self.rlen.to_le_bytes());
        out[8..12].copy_from_slice(&self.fpulse.to_le_bytes());
        out[16..24].copy_from_slice(&self.boff.to_le_bytes());
        out[24..32].copy_from_slice(&self.coff.to_le_bytes());
        out[32..36].copy_from_slice(&self.flags.to_le_bytes());
        out
    }

    fn from_bytes(buf: &[u8]) -> Self {
        Self {
            origin: le_i32(buf, 0),
            rlen: le_i32(buf, 4),
            fpulse: le_i32(buf, 8),
            boff: le_i64(buf, 16),
            coff: le_i64(buf, 24),
            flags: le_i32(buf, 32),
        }
    }
}

/// How a materialized read is represented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadEncoding {
    /// Numeric base codes, A=0 C=1 G=2 T=3.
    #[default]
    Numeric,
    /// Lowercase ASCII.
    Lower,
    /// Uppercase ASCII.
    Upper,
}

/// A reusable buffer holding one materialized read.
///
/// The buffer tracks its own length and encoding; callers reuse one buffer per
/// role (A-read, B-read) so that capacity is only grown, never reallocated per
/// record.
#[derive(Clone, Debug, Default)]
pub struct ReadBuffer {
    bases: Vec<u8>,
    encoding: ReadEncoding,
}

impl ReadBuffer {
    /// Creates an empty buffer with room for `capacity` bases.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { bases: Vec::with_capacity(capacity), encoding: ReadEncoding::Numeric }
    }

    /// The bases in the buffer's current encoding.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bases
    }

    /// Number of bases held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Whether the buffer holds no bases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// The buffer's current encoding.
    #[must_use]
    pub fn encoding(&self) -> ReadEncoding {
        self.encoding
    }

    /// Reverse complements the read in place.
    pub fn reverse_complement(&mut self) {
        match self.encoding {
            ReadEncoding::Numeric => reverse_complement_codes_in_place(&mut self.bases),
            ReadEncoding::Upper => {
                self.bases.reverse();
                for base in &mut self.bases {
                    *base = complement_base(*base);
                }
            }
            ReadEncoding::Lower => {
                self.bases.reverse();
                for base in &mut self.bases {
                    *base = complement_base(*base).to_ascii_lowercase();
                }
            }
        }
    }

    /// Converts the read to the requested encoding in place.
    ///
    /// Converting ASCII back to numeric codes is not supported and leaves the
    /// buffer unchanged.
    pub fn convert(&mut self, encoding: ReadEncoding) {
        match (self.encoding, encoding) {
            (ReadEncoding::Numeric, ReadEncoding::Upper) => codes_to_upper(&mut self.bases),
            (ReadEncoding::Numeric, ReadEncoding::Lower) => codes_to_lower(&mut self.bases),
            (ReadEncoding::Lower, ReadEncoding::Upper) => self.bases.make_ascii_uppercase(),
            (ReadEncoding::Upper, ReadEncoding::Lower) => self.bases.make_ascii_lowercase(),
            _ => return,
        }
        self.encoding = encoding;
    }

    fn bases_mut(&mut self) -> &mut Vec<u8> {
        &mut self.bases
    }
}

/// A source of read lengths and read sequences.
///
/// The consensus pipeline only needs these two operations from the sequence
/// store, which keeps it independent of the on-disk database format.
pub trait SequenceSource {
    /// Number of reads available.
    fn nreads(&self) -> usize;

    /// Length of the read with 0-based index `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    fn read_len(&self, index: usize) -> Result<usize>;

    /// Materializes read `index` into `buffer` using the requested encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or the stored bases are short.
    fn load_read(&self, index: usize, encoding: ReadEncoding, buffer: &mut ReadBuffer)
    -> Result<()>;
}

/// Length of read `index` as a signed coordinate, comparable with overlap positions.
///
/// # Errors
///
/// Returns an error if `index` is out of range or the read is longer than `i32::MAX`.
pub fn coordinate_len<S: SequenceSource + ?Sized>(db: &S, index: u32) -> Result<i32> {
    let len = db.read_len(index as usize)?;
    i32::try_from(len).with_context(|| format!("Read {index} is too long ({len} bases)"))
}

/// Trimming parameters recorded in a database stub.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrimParams {
    /// Minimum read length kept.
    pub cutoff: i32,
    /// Keep every read of a well rather than only the best one.
    pub all: bool,
}

impl Default for TrimParams {
    fn default() -> Self {
        Self { cutoff: 0, all: true }
    }
}

/// An in-memory Dazzler database: the trimmed read table and the packed bases.
#[derive(Clone, Debug)]
pub struct DazzDb {
    name: String,
    reads: Vec<ReadInfo>,
    bases: Vec<u8>,
    maxlen: usize,
    totlen: u64,
}

impl DazzDb {
    /// Opens a database by its stub path (`reads.db`, `reads.dam` or the bare
    /// root `reads`), trims it and loads all packed bases into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the database files is missing or malformed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let files = DbFiles::resolve(path.as_ref())?;
        let name = files.stub.display().to_string();

        let stub = fs::read_to_string(&files.stub)
            .with_context(|| format!("Failed to read database stub: {}", files.stub.display()))?;
        let trim = parse_stub(&stub).map_err(|reason| FgovlError::InvalidFileFormat {
            file_type: "DB".to_string(),
            path: name.clone(),
            reason,
        })?;

        let idx = fs::read(&files.idx)
            .with_context(|| format!("Failed to read database index: {}", files.idx.display()))?;
        let reads = parse_index(&idx).map_err(|reason| FgovlError::InvalidFileFormat {
            file_type: "DB index".to_string(),
            path: files.idx.display().to_string(),
            reason,
        })?;

        let bases = fs::read(&files.bps)
            .with_context(|| format!("Failed to read database bases: {}", files.bps.display()))?;

        let untrimmed = reads.len();
        let reads = trim_reads(reads, trim);
        debug!(
            "Database {name}: {untrimmed} reads, {} after trimming (cutoff={}, all={})",
            reads.len(),
            trim.cutoff,
            trim.all
        );

        Ok(Self::from_parts(name, reads, bases))
    }

    /// Builds a database from an already trimmed read table and a packed base blob.
    #[must_use]
    pub fn from_parts(name: impl Into<String>, reads: Vec<ReadInfo>, bases: Vec<u8>) -> Self {
        let maxlen = reads.iter().map(|r| r.rlen.max(0) as usize).max().unwrap_or(0);
        let totlen = reads.iter().map(|r| r.rlen.max(0) as u64).sum();
        Self { name: name.into(), reads, bases, maxlen, totlen }
    }

    /// Builds an untrimmed in-memory database from ASCII sequences.
    #[must_use]
    pub fn from_sequences<S: AsRef<[u8]>>(name: impl Into<String>, sequences: &[S]) -> Self {
        let mut reads = Vec::with_capacity(sequences.len());
        let mut bases = Vec::new();
        for seq in sequences {
            let seq = seq.as_ref();
            reads.push(ReadInfo {
                rlen: i32::try_from(seq.len()).unwrap_or(i32::MAX),
                boff: bases.len() as i64,
                flags: DB_BEST,
                ..ReadInfo::default()
            });
            bases.extend(pack_bases(&ascii_to_codes(seq)));
        }
        Self::from_parts(name, reads, bases)
    }

    /// Path or name the database was opened from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length of the longest read.
    #[must_use]
    pub fn maxlen(&self) -> usize {
        self.maxlen
    }

    /// Total number of bases over all reads.
    #[must_use]
    pub fn totlen(&self) -> u64 {
        self.totlen
    }

    fn info(&self, index: usize) -> Result<&ReadInfo> {
        self.reads.get(index).ok_or_else(|| {
            FgovlError::ReadIndexOutOfRange {
                index,
                nreads: self.reads.len(),
                db: self.name.clone(),
            }
            .into()
        })
    }
}

impl SequenceSource for DazzDb {
    fn nreads(&self) -> usize {
        self.reads.len()
    }

    fn read_len(&self, index: usize) -> Result<usize> {
        Ok(self.info(index)?.rlen.max(0) as usize)
    }

    fn load_read(
        &self,
        index: usize,
        encoding: ReadEncoding,
        buffer: &mut ReadBuffer,
    ) -> Result<()> {
        let info = *self.info(index)?;
        let len = info.rlen.max(0) as usize;
        let start = usize::try_from(info.boff).ok();
        let packed = start
            .and_then(|s| s.checked_add(packed_len(len)).map(|e| (s, e)))
            .and_then(|(s, e)| self.bases.get(s..e));
        let Some(packed) = packed else {
            bail!(
                "Bases of read {index} (offset {}, length {len}) lie beyond the end of {}",
                info.boff,
                self.name
            );
        };

        buffer.encoding = ReadEncoding::Numeric;
        if !unpack_bases(packed, len, buffer.bases_mut()) {
            bail!("Bases of read {index} in {} are truncated", self.name);
        }
        buffer.convert(encoding);
        Ok(())
    }
}

/// The three files making up a database.
struct DbFiles {
    stub: PathBuf,
    idx: PathBuf,
    bps: PathBuf,
}

impl DbFiles {
    fn resolve(path: &Path) -> Result<Self> {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid database path: {}", path.display()))?;

        let root = file_name
            .strip_suffix(".db")
            .or_else(|| file_name.strip_suffix(".dam"))
            .unwrap_or(file_name);

        let stub = [format!("{root}.db"), format!("{root}.dam")]
            .into_iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.exists());
        let Some(stub) = stub else {
            bail!("Database does not exist: {} (looked for {root}.db and {root}.dam)", path.display());
        };

        Ok(Self { stub, idx: dir.join(format!(".{root}.idx")), bps: dir.join(format!(".{root}.bps")) })
    }
}

/// Parses the trimming parameters from a database stub.
///
/// The stub lists `files = N` and N file lines; a partitioned database then has
/// `blocks = B` followed by `size = S cutoff = C all = A`. Without the block
/// section the database is untrimmed.
fn parse_stub(text: &str) -> std::result::Result<TrimParams, String> {
    let mut lines = text.lines();
    let nfiles: usize = lines
        .next()
        .and_then(|line| keyed_value(line, "files"))
        .ok_or_else(|| "missing 'files = N' line".to_string())?
        .parse()
        .map_err(|e| format!("invalid file count: {e}"))?;

    for i in 0..nfiles {
        if lines.next().is_none() {
            return Err(format!("expected {nfiles} file lines, found {i}"));
        }
    }

    let Some(blocks_line) = lines.next().filter(|l| !l.trim().is_empty()) else {
        return Ok(TrimParams::default());
    };
    if keyed_value(blocks_line, "blocks").is_none() {
        return Err(format!("expected 'blocks = N', found '{blocks_line}'"));
    }

    let params = lines.next().ok_or_else(|| "missing 'size = ... cutoff = ... all = ...' line")?;
    let tokens: Vec<&str> = params.split_whitespace().collect();
    let value_of = |key: &str| -> Option<&str> {
        tokens.windows(3).find(|w| w[0] == key && w[1] == "=").map(|w| w[2])
    };
    let cutoff = value_of("cutoff")
        .and_then(|v| v.parse::<i32>().ok())
        .ok_or_else(|| format!("missing or invalid cutoff in '{params}'"))?;
    let all = value_of("all")
        .and_then(|v| v.parse::<i32>().ok())
        .ok_or_else(|| format!("missing or invalid all flag in '{params}'"))?;

    Ok(TrimParams { cutoff, all: all != 0 })
}

/// Returns the value of a `key = value` line.
fn keyed_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let (k, v) = line.split_once('=')?;
    (k.trim() == key).then(|| v.trim())
}

/// Parses the read table of a `.idx` file.
fn parse_index(bytes: &[u8]) -> std::result::Result<Vec<ReadInfo>, String> {
    if bytes.len() < IDX_HEADER_LEN {
        return Err(format!("index is {} bytes, shorter than its header", bytes.len()));
    }
    let ureads = le_i32(bytes, 0);
    let ureads = usize::try_from(ureads).map_err(|_| format!("negative read count {ureads}"))?;

    let body = &bytes[IDX_HEADER_LEN..];
    if body.len() < ureads * IDX_READ_LEN {
        return Err(format!(
            "index declares {ureads} reads but holds only {}",
            body.len() / IDX_READ_LEN
        ));
    }

    Ok(body.chunks_exact(IDX_READ_LEN).take(ureads).map(ReadInfo::from_bytes).collect())
}

/// Encodes a `.idx` header for `reads`, as written by an untrimmed database.
#[must_use]
pub fn index_header(reads: &[ReadInfo]) -> [u8; IDX_HEADER_LEN] {
    let mut out = [0u8; IDX_HEADER_LEN];
    let n = i32::try_from(reads.len()).unwrap_or(i32::MAX);
    let maxlen = reads.iter().map(|r| r.rlen).max().unwrap_or(0);
    let totlen: i64 = reads.iter().map(|r| i64::from(r.rlen)).sum();
    out[0..4].copy_from_slice(&n.to_le_bytes()); // ureads
    out[4..8].copy_from_slice(&n.to_le_bytes()); // treads
    out[8..12].copy_from_slice(&0i32.to_le_bytes()); // cutoff
    out[12..16].copy_from_slice(&1i32.to_le_bytes()); // all
    out[32..36].copy_from_slice(&maxlen.to_le_bytes());
    out[40..48].copy_from_slice(&totlen.to_le_bytes());
    out[48..52].copy_from_slice(&n.to_le_bytes()); // nreads
    out
}

/// Applies the stub's trimming parameters to the untrimmed read table.
fn trim_reads(reads: Vec<ReadInfo>, trim: TrimParams) -> Vec<ReadInfo> {
    if trim.cutoff <= 0 && trim.all {
        return reads;
    }
    reads
        .into_iter()
        .filter(|r| (trim.all || r.flags & DB_BEST != 0) && r.rlen >= trim.cutoff)
        .collect()
}

fn le_i32(buf: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn le_i64(buf: &[u8], at: usize) -> i64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&buf[at..at + 8]);
    i64::from_le_bytes(word)
}
