//! Common CLI options shared across commands.
//!
//! This module provides shared argument structures that can be composed into
//! command structs using `#[command(flatten)]`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use fgovl_lib::db::{DazzDb, SequenceSource};
use fgovl_lib::ranges::{RangeSpec, ReadRanges, read_index_list};
use fgovl_lib::validation::validate_file_exists;

/// Buffer size for the text output stream.
const OUTPUT_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// Check if a path refers to stdout.
#[must_use]
pub fn is_stdout_path<P: AsRef<Path>>(path: P) -> bool {
    let path_str = path.as_ref().to_string_lossy();
    path_str == "-" || path_str == "/dev/stdout"
}

/// Sequence databases the overlaps refer to.
#[derive(Debug, Clone, Args)]
pub struct DatabaseOptions {
    /// Dazzler database (.db or .dam) holding the A-reads
    #[arg(short = 'd', long = "db")]
    pub db: PathBuf,

    /// Dazzler database holding the B-reads, if different from --db
    #[arg(short = 'b', long = "b-db")]
    pub b_db: Option<PathBuf>,
}

impl DatabaseOptions {
    /// Loads the A database and, if given, the B database.
    ///
    /// # Errors
    ///
    /// Returns an error if a database cannot be read.
    pub fn open(&self) -> Result<Databases> {
        let a = open_database(&self.db)?;
        let b = self.b_db.as_ref().map(|path| open_database(path)).transpose()?;
        Ok(Databases { a, b })
    }
}

fn open_database(path: &Path) -> Result<DazzDb> {
    let db = DazzDb::open(path)
        .with_context(|| format!("Failed to open database: {}", path.display()))?;
    info!("Loaded {} reads ({} bases) from {}", db.nreads(), db.totlen(), db.name());
    Ok(db)
}

/// The A database and an optional distinct B database.
#[derive(Debug)]
pub struct Databases {
    a: DazzDb,
    b: Option<DazzDb>,
}

impl Databases {
    /// Database of the A-reads.
    #[must_use]
    pub fn a(&self) -> &DazzDb {
        &self.a
    }

    /// Database of the B-reads; the A database unless a second one was given.
    #[must_use]
    pub fn b(&self) -> &DazzDb {
        self.b.as_ref().unwrap_or(&self.a)
    }
}

/// Overlap input and text output.
#[derive(Debug, Clone, Args)]
pub struct OverlapIoOptions {
    /// Input LAS file of overlaps, sorted by A-read
    #[arg(short = 'l', long = "las")]
    pub las: PathBuf,

    /// Output file (or `-` for stdout)
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: PathBuf,
}

impl OverlapIoOptions {
    /// Validates that the LAS file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the LAS file does not exist.
    pub fn validate(&self) -> Result<()> {
        validate_file_exists(&self.las, "LAS")?;
        Ok(())
    }

    /// Opens the buffered output stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the output file cannot be created.
    pub fn create_output(&self) -> Result<Box<dyn Write>> {
        if is_stdout_path(&self.output) {
            return Ok(Box::new(BufWriter::with_capacity(
                OUTPUT_BUFFER_SIZE,
                std::io::stdout().lock(),
            )));
        }
        let file = File::create(&self.output)
            .with_context(|| format!("Failed to create output: {}", self.output.display()))?;
        Ok(Box::new(BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, file)))
    }
}

/// A-reads to report.
#[derive(Debug, Clone, Default, Args)]
pub struct ReadSelectionOptions {
    /// A-read ranges to report: N, N-M, $ (last read) or N-$; 1-based, all reads when omitted
    #[arg(value_name = "RANGES")]
    pub ranges: Vec<RangeSpec>,

    /// File of whitespace-separated 1-based A-read indices to report
    #[arg(long = "read-list", conflicts_with = "ranges")]
    pub read_list: Option<PathBuf>,
}

impl ReadSelectionOptions {
    /// Resolves the selection against a database of `nreads` reads.
    ///
    /// # Errors
    ///
    /// Returns an error if a range is empty or the read list cannot be parsed.
    pub fn resolve(&self, nreads: usize) -> Result<ReadRanges> {
        let ranges = match &self.read_list {
            Some(path) => read_index_list(path)?,
            None => ReadRanges::from_specs(&self.ranges, nreads)?,
        };
        if self.read_list.is_some() || !self.ranges.is_empty() {
            info!("Selected {} read range(s)", ranges.intervals().len());
        }
        Ok(ranges)
    }
}

/// Options for writing run metrics to a file.
#[derive(Debug, Clone, Default, Args)]
pub struct MetricsOptions {
    /// Optional output TSV file for run metrics
    #[arg(short = 'm', long = "metrics")]
    pub metrics: Option<PathBuf>,
}
