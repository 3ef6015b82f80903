//! Formatting helpers and run summaries for log output.

use std::time::{Duration, Instant};

use crate::metrics::{FalconMetrics, M4Metrics, ProcessingMetrics};

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use fgovl_lib::logging::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a percentage (given as 0-100) with the given number of decimals.
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

/// Formats a duration in human-readable form (e.g. "45s", "2m 15s", "1h 30m").
///
/// # Examples
///
/// ```
/// use fgovl_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0..60 => format!("{secs}s"),
        60..3600 => match secs % 60 {
            0 => format!("{}m", secs / 60),
            rem => format!("{}m {rem}s", secs / 60),
        },
        _ => match (secs % 3600) / 60 {
            0 => format!("{}h", secs / 3600),
            mins => format!("{}h {mins}m", secs / 3600),
        },
    }
}

/// Formats a processing rate in records per second, or per minute when slow.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} records/s", format_count(count));
    }
    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} records/s", format_count(rate as u64))
    } else {
        format!("{:.1} records/min", rate * 60.0)
    }
}

/// Logs a summary of a `falcon` run.
pub fn log_falcon_summary(metrics: &FalconMetrics) {
    log::info!("Consensus Input Summary:");
    log::info!("  Records read: {}", format_count(metrics.records_read));
    log::info!("  Records in range: {}", format_count(metrics.records_in_range));
    log::info!("  A-reads: {}", format_count(metrics.a_reads));
    log::info!("  Overlap groups: {}", format_count(metrics.groups));
    if metrics.records_grouped > 0 {
        log::info!("  Records folded into groups: {}", format_count(metrics.records_grouped));
    }
    log::info!(
        "  Supporting reads emitted: {} ({} of records in range)",
        format_count(metrics.hits_emitted),
        format_percent(metrics.efficiency(), 2)
    );
    if metrics.oversized_hits_skipped > 0 {
        log::info!("  Oversized slices skipped: {}", format_count(metrics.oversized_hits_skipped));
    }
    if metrics.records_over_capacity > 0 {
        log::info!(
            "  Records ignored at group capacity: {}",
            format_count(metrics.records_over_capacity)
        );
    }
    if metrics.contained_a_reads > 0 {
        log::info!(
            "  Contained A-reads: {} ({} later records ignored)",
            format_count(metrics.contained_a_reads),
            format_count(metrics.records_after_containment)
        );
    }
    if metrics.a_reads_with_unsorted_b_reads > 0 {
        log::warn!(
            "  A-reads with unsorted B-reads: {}",
            format_count(metrics.a_reads_with_unsorted_b_reads)
        );
    }
}

/// Logs a summary of an `m4` run.
pub fn log_m4_summary(metrics: &M4Metrics) {
    log::info!("M4 Overlap Summary:");
    log::info!("  Records read: {}", format_count(metrics.records_read));
    log::info!("  Records in range: {}", format_count(metrics.records_in_range));
    if metrics.improper_overlaps_skipped > 0 {
        log::info!(
            "  Improper overlaps skipped: {}",
            format_count(metrics.improper_overlaps_skipped)
        );
    }
    log::info!("  Lines written: {}", format_count(metrics.lines_written));
    log::info!(
        "    contains: {}, contained: {}, overlap: {}",
        format_count(metrics.contains),
        format_count(metrics.contained),
        format_count(metrics.overlaps)
    );
}

/// Logs the start of an operation and, later, its completion with a rate.
///
/// # Examples
///
/// ```no_run
/// use fgovl_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Grouping overlaps");
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with record count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} records in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
