//! List LAS overlaps in M4 format.

use anyhow::Result;
use clap::Parser;
use log::{debug, info};

use fgovl_lib::db::SequenceSource;
use fgovl_lib::las::LasReader;
use fgovl_lib::logging::{OperationTimer, log_m4_summary};
use fgovl_lib::m4::M4Writer;
use fgovl_lib::metrics::write_metric;

use crate::commands::command::Command;
use crate::commands::common::{
    DatabaseOptions, MetricsOptions, OverlapIoOptions, ReadSelectionOptions,
};

/// Lists overlaps one per line in M4 format.
#[derive(Debug, Parser)]
#[command(
    name = "m4",
    about = "\x1b[38;5;166m[UTILITIES]\x1b[0m      \x1b[36mList LAS overlaps in M4 format\x1b[0m",
    long_about = r#"
List the overlaps of a Dazzler LAS file in M4 format, one line per overlap:

  aread bread score accuracy 0 abpos aepos alen comp bbpos bepos blen kind

Read indices are 0-based and zero-padded to nine digits. B-read coordinates are given on the
forward strand of the B-read. `score` is the negated overlap length on the B-read and
`accuracy` the percent identity estimated from the alignment's difference count. `kind` is
`contains` when the B-read lies within the A-read, `contained` when the A-read lies within the
B-read, and `overlap` otherwise.

With --proper-overlaps-only, only overlaps that start at the start of one read and end at the
end of one read are listed.

Example usage:
  fgovl m4 --db reads.db --las reads.las -o reads.m4
  fgovl m4 --db reads.db --las reads.las --proper-overlaps-only 1-$
"#
)]
pub struct M4 {
    /// Sequence database options
    #[command(flatten)]
    pub db: DatabaseOptions,

    /// Overlap input and output options
    #[command(flatten)]
    pub io: OverlapIoOptions,

    /// A-read selection
    #[command(flatten)]
    pub selection: ReadSelectionOptions,

    /// Only list overlaps reaching an end of both reads
    #[arg(short = 'p', long = "proper-overlaps-only", default_value = "false")]
    pub proper_overlaps_only: bool,

    /// Metrics output options
    #[command(flatten)]
    pub metrics: MetricsOptions,
}

impl Command for M4 {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.io.validate()?;

        info!("Starting M4");
        debug!("Command line: {command_line}");
        info!("Database: {}", self.db.db.display());
        info!("Overlaps: {}", self.io.las.display());
        info!("Output: {}", self.io.output.display());
        if self.proper_overlaps_only {
            info!("Listing proper overlaps only");
        }

        let timer = OperationTimer::new("Listing overlaps");

        let dbs = self.db.open()?;
        let ranges = self.selection.resolve(dbs.a().nreads())?;
        let mut reader = LasReader::from_path(&self.io.las)?;

        let writer =
            M4Writer::new(dbs.a(), dbs.b(), self.io.create_output()?, self.proper_overlaps_only);
        let (_, metrics) = writer.run(&mut reader, &ranges)?;

        timer.log_completion(metrics.records_read);
        log_m4_summary(&metrics);

        if let Some(path) = &self.metrics.metrics {
            write_metric(path, &metrics)?;
            info!("Wrote metrics to {}", path.display());
        }
        Ok(())
    }
}
