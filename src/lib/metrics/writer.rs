//! Utilities for writing metrics files.
//!
//! Metrics are written as tab-separated files with a header row taken from the
//! serialized field names.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::Metric;

/// Writes metrics rows to a TSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
///
/// # Example
/// ```no_run
/// use fgovl_lib::metrics::writer::write_metrics;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Counts {
///     records: u64,
/// }
///
/// write_metrics("counts.txt", &[Counts { records: 10 }], "record").unwrap();
/// ```
pub fn write_metrics<P: AsRef<Path>, T: Serialize>(
    path: P,
    metrics: &[T],
    description: &str,
) -> Result<()> {
    let path = path.as_ref();
    let context = || format!("Failed to write {description} metrics: {}", path.display());

    let mut writer =
        csv::WriterBuilder::new().delimiter(b'\t').from_path(path).with_context(context)?;
    for metric in metrics {
        writer.serialize(metric).with_context(context)?;
    }
    writer.flush().with_context(context)?;
    Ok(())
}

/// Writes a single metric implementing [`Metric`] to a TSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_metric<P: AsRef<Path>, M: Metric>(path: P, metric: &M) -> Result<()> {
    write_metrics(path, std::slice::from_ref(metric), M::metric_name())
}
