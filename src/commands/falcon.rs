//! Build consensus-caller input from a LAS overlap file.
//!
//! For every selected A-read, writes the A-read and the best-scoring
//! supporting B-read slices in the text format read by FALCON's consensus
//! caller.

use anyhow::Result;
use clap::Parser;
use log::{debug, info};

use fgovl_lib::db::SequenceSource;
use fgovl_lib::emitter::SCRATCH_CAPACITY;
use fgovl_lib::grouper::DEFAULT_MAX_GROUPS;
use fgovl_lib::las::LasReader;
use fgovl_lib::logging::{OperationTimer, log_falcon_summary};
use fgovl_lib::metrics::write_metric;
use fgovl_lib::pipeline::{FalconConfig, FalconPipeline};
use fgovl_lib::selector::DEFAULT_MAX_HITS;
use fgovl_lib::validation::{validate_group_capacity, validate_max_hits};

use crate::commands::command::Command;
use crate::commands::common::{
    DatabaseOptions, MetricsOptions, OverlapIoOptions, ReadSelectionOptions,
};

/// Default minimum seed read length.
const DEFAULT_SEED_MIN: usize = 8000;

/// Builds consensus-caller input from overlaps.
#[derive(Debug, Parser)]
#[command(
    name = "falcon",
    about = "\x1b[38;5;72m[CONSENSUS]\x1b[0m      \x1b[36mBuild consensus input from LAS overlaps\x1b[0m",
    long_about = r#"
Build consensus-caller input from a Dazzler LAS overlap file.

Overlaps must be sorted by A-read. For each selected A-read the output holds one block:

  00000012 ACGT...     the A-read index (0-based) and its full sequence
  00000045 CGTA...     one line per supporting B-read: index and aligned slice
  + +                  end of the block

and the stream ends with a `- -` line.

Supporting B-reads are ranked by how much of both reads their overlap covers, and at most
--max-hits are written per A-read. B-read slices are taken from the reverse complement of the
B-read when it aligns in the opposite orientation. With --group, consecutive overlaps between
the same two reads that line up on both reads (an A-read gap below 251 bases) are merged into
a single supporting slice.

With --skip-contained, an A-read found to lie entirely within a longer B-read gets a `* *`
line and its remaining overlaps are ignored.

A-read ranges are 1-based and inclusive; `$` stands for the last read of the database.

Example usage:
  fgovl falcon --db reads.db --las reads.las --group -o consensus_input.txt
  fgovl falcon --db reads.db --las reads.las --max-hits 200 1-1000
  fgovl falcon --db reads.db --b-db other.db --las reads.other.las --read-list ids.txt
"#
)]
pub struct Falcon {
    /// Sequence database options
    #[command(flatten)]
    pub db: DatabaseOptions,

    /// Overlap input and output options
    #[command(flatten)]
    pub io: OverlapIoOptions,

    /// A-read selection
    #[command(flatten)]
    pub selection: ReadSelectionOptions,

    /// Merge consecutive overlaps between the same two reads into one supporting slice
    #[arg(short = 'g', long = "group", default_value = "false")]
    pub group: bool,

    /// Maximum number of supporting reads written per A-read (at most 2000)
    #[arg(short = 'n', long = "max-hits", default_value_t = DEFAULT_MAX_HITS)]
    pub max_hits: usize,

    /// Maximum number of overlap groups collected per A-read (at most 1,000,000)
    #[arg(long = "max-groups", default_value_t = DEFAULT_MAX_GROUPS)]
    pub max_groups: usize,

    /// Skip the rest of an A-read's overlaps once it is found contained in a B-read
    #[arg(short = 's', long = "skip-contained", default_value = "false")]
    pub skip_contained: bool,

    /// Minimum seed read length (accepted for compatibility, currently unused)
    #[arg(long = "seed-min", default_value_t = DEFAULT_SEED_MIN)]
    pub seed_min: usize,

    /// Metrics output options
    #[command(flatten)]
    pub metrics: MetricsOptions,
}

impl Command for Falcon {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.io.validate()?;
        let max_hits = validate_max_hits(self.max_hits)?;
        let max_groups = validate_group_capacity(self.max_groups)?;

        info!("Starting Falcon");
        debug!("Command line: {command_line}");
        info!("Database: {}", self.db.db.display());
        if let Some(b_db) = &self.db.b_db {
            info!("B-read database: {}", b_db.display());
        }
        info!("Overlaps: {}", self.io.las.display());
        info!("Output: {}", self.io.output.display());
        info!("Grouping: {}", if self.group { "enabled" } else { "disabled" });
        info!("Max hits per A-read: {max_hits}");
        if self.skip_contained {
            info!("Skipping contained A-reads");
        }
        info!("Seed minimum length: {} (unused)", self.seed_min);

        let timer = OperationTimer::new("Building consensus input");

        let dbs = self.db.open()?;
        let ranges = self.selection.resolve(dbs.a().nreads())?;

        let mut reader = LasReader::from_path(&self.io.las)?;
        let header = reader.header();
        info!("LAS header: {} records, trace spacing {}", header.novl, header.tspace);

        let config = FalconConfig {
            grouping: self.group,
            max_hits,
            max_groups,
            skip_contained: self.skip_contained,
            scratch_capacity: SCRATCH_CAPACITY,
        };
        let pipeline = FalconPipeline::new(config, dbs.a(), dbs.b(), self.io.create_output()?);
        let (_, metrics) = pipeline.run(&mut reader, &ranges)?;

        timer.log_completion(metrics.records_read);
        log_falcon_summary(&metrics);

        if let Some(path) = &self.metrics.metrics {
            write_metric(path, &metrics)?;
            info!("Wrote metrics to {}", path.display());
        }
        Ok(())
    }
}
