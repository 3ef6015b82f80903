//! Metrics collection and reporting for fgovl commands.
//!
//! - [`overlap`] - Per-run counts of the `falcon` and `m4` commands
//! - [`writer`] - Metrics file I/O utilities

pub mod overlap;
pub mod writer;

use serde::{Deserialize, Serialize};

pub use overlap::{FalconMetrics, M4Metrics};
pub use writer::{write_metric, write_metrics};

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type, used in messages.
    fn metric_name() -> &'static str;
}

/// Common interface for metrics that track input and output counts.
pub trait ProcessingMetrics {
    /// Total number of input items processed.
    fn total_input(&self) -> u64;

    /// Total number of output items produced.
    fn total_output(&self) -> u64;

    /// Output as a percentage of input.
    fn efficiency(&self) -> f64 {
        if self.total_input() == 0 {
            0.0
        } else {
            #[expect(clippy::cast_precision_loss, reason = "record counts never exceed 2^53")]
            let result = self.total_output() as f64 / self.total_input() as f64 * 100.0;
            result
        }
    }
}
