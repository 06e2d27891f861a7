//! Latency measurement backed by an HDR histogram.

use std::time::{Duration, Instant};

use hdrhistogram::{CreationError, Histogram};

const MAX_TRACKED_NANOS: u64 = 60_000_000_000;

/// Longest latency recorded exactly; longer samples are clamped to it.
pub const MAX_TRACKED: Duration = Duration::from_nanos(MAX_TRACKED_NANOS);

/// Latency statistics.
#[derive(Debug, Clone)]
pub struct LatencyStats {
    /// Minimum latency.
    pub min: Duration,
    /// Maximum latency.
    pub max: Duration,
    /// Mean latency.
    pub mean: Duration,
    /// Median latency (p50).
    pub median: Duration,
    /// 99th percentile latency.
    pub p99: Duration,
    /// 99.9th percentile latency.
    pub p999: Duration,
    /// Sample count.
    pub count: u64,
}

/// Collects latency samples in nanoseconds.
pub struct LatencyCollector {
    histogram: Histogram<u64>,
}

impl LatencyCollector {
    /// Creates a collector tracking 1 ns to [`MAX_TRACKED`] with
    /// `significant_digits` of precision.
    ///
    /// # Errors
    /// Returns `CreationError` if `significant_digits` is above 5.
    pub fn new(significant_digits: u8) -> Result<Self, CreationError> {
        let histogram = Histogram::new_with_bounds(1, MAX_TRACKED_NANOS, significant_digits)?;
        Ok(Self { histogram })
    }

    /// Records a latency sample.
    pub fn record(&mut self, latency: Duration) {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.histogram.saturating_record(nanos.max(1));
    }

    /// Measures the latency of a function.
    pub fn measure<F, T>(&mut self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let result = f();
        self.record(start.elapsed());
        result
    }

    /// Computes statistics from collected samples.
    #[must_use]
    pub fn stats(&self) -> Option<LatencyStats> {
        if self.histogram.is_empty() {
            return None;
        }
        let h = &self.histogram;
        Some(LatencyStats {
            min: Duration::from_nanos(h.min()),
            max: Duration::from_nanos(h.max()),
            mean: Duration::from_nanos(h.mean() as u64),
            median: Duration::from_nanos(h.value_at_quantile(0.5)),
            p99: Duration::from_nanos(h.value_at_quantile(0.99)),
            p999: Duration::from_nanos(h.value_at_quantile(0.999)),
            count: h.len(),
        })
    }

    /// Clears all samples.
    pub fn clear(&mut self) {
        self.histogram.reset();
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    /// Returns true if no samples have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_precision() {
        assert!(LatencyCollector::new(6).is_err());
    }

    #[test]
    fn test_latency_stats() {
        let mut collector = LatencyCollector::new(3).unwrap();
        for i in 1..=100 {
            collector.record(Duration::from_micros(i));
        }
        let stats = collector.stats().unwrap();
        assert_eq!(stats.count, 100);
        assert_eq!(stats.min, Duration::from_micros(1));
        // Histogram buckets round to 3 significant digits.
        let max = stats.max.as_nanos() as f64;
        assert!((max - 100_000.0).abs() / 100_000.0 < 0.001);
        assert!(stats.median >= Duration::from_micros(49));
        assert!(stats.median <= Duration::from_micros(51));
    }

    #[test]
    fn test_samples_beyond_range_are_clamped() {
        let mut collector = LatencyCollector::new(3).unwrap();
        collector.record(Duration::ZERO);
        collector.record(Duration::from_secs(120));
        let stats = collector.stats().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, Duration::from_nanos(1));
        assert!(stats.max >= MAX_TRACKED);
        assert!(stats.max < Duration::from_secs(61));
    }

    #[test]
    fn test_measure_and_clear() {
        let mut collector = LatencyCollector::new(3).unwrap();
        assert!(collector.stats().is_none());
        let result = collector.measure(|| 42);
        assert_eq!(result, 42);
        assert_eq!(collector.len(), 1);
        collector.clear();
        assert!(collector.is_empty());
    }
}
