//! Annotation pass timing.
//!
//! Every content change runs a full annotation pass, so pass cost grows with
//! buffer size. These counters make that cost visible to the host.

use std::collections::VecDeque;
use std::time::Duration;

/// Maximum number of samples to keep for rolling averages.
const MAX_SAMPLES: usize = 120;

/// Rolling statistics over the most recent durations.
#[derive(Debug, Clone)]
pub struct RollingStats {
    samples: VecDeque<Duration>,
    sum: Duration,
    max: Duration,
}

impl Default for RollingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingStats {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(MAX_SAMPLES),
            sum: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Records a new sample, evicting the oldest one at capacity.
    pub fn record(&mut self, duration: Duration) {
        if self.samples.len() >= MAX_SAMPLES {
            if let Some(old) = self.samples.pop_front() {
                self.sum = self.sum.saturating_sub(old);
            }
        }
        self.samples.push_back(duration);
        self.sum += duration;
        self.max = self.max.max(duration);
    }

    /// Returns the number of samples in the window.
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// Returns the average duration in the window.
    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            Duration::ZERO
        } else {
            self.sum / self.samples.len() as u32
        }
    }

    /// Returns the smallest duration in the window.
    pub fn min(&self) -> Duration {
        self.samples.iter().copied().min().unwrap_or(Duration::ZERO)
    }

    /// Returns the largest duration seen since the last clear.
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Returns the most recent duration.
    pub fn last(&self) -> Duration {
        self.samples.back().copied().unwrap_or(Duration::ZERO)
    }

    /// Returns the average as milliseconds.
    pub fn average_ms(&self) -> f64 {
        self.average().as_secs_f64() * 1000.0
    }

    /// Returns the most recent sample as milliseconds.
    pub fn last_ms(&self) -> f64 {
        self.last().as_secs_f64() * 1000.0
    }

    /// Clears all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.sum = Duration::ZERO;
        self.max = Duration::ZERO;
    }
}

/// Timing of annotation passes for one session.
#[derive(Debug, Clone)]
pub struct AnnotationStats {
    /// Pass durations.
    pub passes: RollingStats,
    /// Passes slower than the threshold since the last reset.
    slow_passes: u64,
    /// Total passes since the last reset.
    total_passes: u64,
    threshold: Duration,
}

impl AnnotationStats {
    /// Creates a tracker that counts passes slower than `threshold`.
    pub fn new(threshold: Duration) -> Self {
        Self {
            passes: RollingStats::new(),
            slow_passes: 0,
            total_passes: 0,
            threshold,
        }
    }

    /// Records one pass over `text_bytes` bytes. Returns true if it was slow.
    pub fn record_pass(&mut self, duration: Duration, text_bytes: usize) -> bool {
        self.passes.record(duration);
        self.total_passes += 1;
        let slow = duration > self.threshold;
        if slow {
            self.slow_passes += 1;
            log::warn!(
                "annotation pass over {} bytes took {:.2}ms (threshold {}ms)",
                text_bytes,
                duration.as_secs_f64() * 1000.0,
                self.threshold.as_millis()
            );
        }
        slow
    }

    /// Returns the slow-pass threshold.
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Returns the number of slow passes.
    pub fn slow_passes(&self) -> u64 {
        self.slow_passes
    }

    /// Returns the number of recorded passes.
    pub fn total_passes(&self) -> u64 {
        self.total_passes
    }

    /// One-line summary for status displays.
    pub fn summary(&self) -> String {
        format!(
            "annotate: {:.2}ms avg, {:.2}ms last, {} slow of {}",
            self.passes.average_ms(),
            self.passes.last_ms(),
            self.slow_passes,
            self.total_passes
        )
    }

    /// Clears all counters.
    pub fn reset(&mut self) {
        self.passes.clear();
        self.slow_passes = 0;
        self.total_passes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_stats() {
        let mut stats = RollingStats::new();

        stats.record(Duration::from_millis(10));
        stats.record(Duration::from_millis(20));
        stats.record(Duration::from_millis(30));

        assert_eq!(stats.count(), 3);
        assert_eq!(stats.average(), Duration::from_millis(20));
        assert_eq!(stats.min(), Duration::from_millis(10));
        assert_eq!(stats.max(), Duration::from_millis(30));
        assert_eq!(stats.last(), Duration::from_millis(30));
    }

    #[test]
    fn test_rolling_stats_overflow() {
        let mut stats = RollingStats::new();
        for i in 0..150 {
            stats.record(Duration::from_millis(i as u64));
        }
        assert_eq!(stats.count(), MAX_SAMPLES);
        assert_eq!(stats.min(), Duration::from_millis(30));
    }

    #[test]
    fn test_slow_pass_counting() {
        let mut stats = AnnotationStats::new(Duration::from_millis(16));
        assert!(!stats.record_pass(Duration::from_millis(2), 100));
        assert!(stats.record_pass(Duration::from_millis(40), 100_000));
        assert_eq!(stats.total_passes(), 2);
        assert_eq!(stats.slow_passes(), 1);
        assert!(stats.summary().contains("1 slow of 2"));

        stats.reset();
        assert_eq!(stats.total_passes(), 0);
        assert_eq!(stats.passes.count(), 0);
    }
}
