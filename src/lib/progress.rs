//! Progress logging at regular record intervals.

use log::info;

/// Counts processed items and logs each time the count crosses a multiple of
/// the interval.
///
/// # Example
/// ```
/// use fgovl_lib::progress::ProgressTracker;
///
/// let mut tracker = ProgressTracker::new("Read overlap records").with_interval(100);
/// for _ in 0..250 {
///     tracker.record(1); // logs at 100 and 200
/// }
/// tracker.log_final(); // logs "Read overlap records 250 (complete)"
/// ```
#[derive(Debug)]
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: u64,
}

impl ProgressTracker {
    /// Creates a tracker with a count of zero and an interval of 1,000,000.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 1_000_000, message: message.into(), count: 0 }
    }

    /// Sets the logging interval. An interval of zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Adds `additional` to the count, logging every interval boundary crossed.
    ///
    /// Returns `true` if the new count lies exactly on a boundary.
    pub fn record(&mut self, additional: u64) -> bool {
        let prev = self.count;
        self.count += additional;
        for i in (prev / self.interval + 1)..=(self.count / self.interval) {
            info!("{} {}", self.message, i * self.interval);
        }
        self.count.is_multiple_of(self.interval)
    }

    /// The current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Logs the final count unless it was just logged at a boundary.
    pub fn log_final(&self) {
        if self.count > 0 && !self.count.is_multiple_of(self.interval) {
            info!("{} {} (complete)", self.message, self.count);
        }
    }
}
