use hdrhistogram::Histogram;
use std::time::Duration;

const MAX_TRACKABLE_NANOS: u64 = 1_000_000_000_000;

/// Distribution of rotation tick lag, in nanoseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickLagStats {
    /// Number of ticks recorded.
    pub count: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub p999: u64,
}

/// Records how late each rotation tick ran compared to its scheduled instant.
///
/// Lag is the time between the tick becoming due and the bucket actually being
/// rotated, so it includes time spent waiting for the write lock.
pub struct TickLagMeasurer {
    histogram: Histogram<u64>,
}

impl TickLagMeasurer {
    pub fn new() -> Self {
        // Range: 1ns to 1,000s, 3 significant figures
        let histogram = Histogram::<u64>::new_with_bounds(1, MAX_TRACKABLE_NANOS, 3)
            .expect("histogram bounds are constant and valid");
        Self { histogram }
    }

    pub fn record(&mut self, lag: Duration) {
        let nanos = u64::try_from(lag.as_nanos()).unwrap_or(MAX_TRACKABLE_NANOS);
        self.histogram
            .saturating_record(nanos.clamp(1, MAX_TRACKABLE_NANOS));
    }

    pub fn get_stats(&self) -> TickLagStats {
        let count = self.histogram.len();
        if count == 0 {
            return TickLagStats::default();
        }

        TickLagStats {
            count,
            min: self.histogram.min(),
            max: self.histogram.max(),
            mean: self.histogram.mean(),
            p50: self.histogram.value_at_quantile(0.5),
            p90: self.histogram.value_at_quantile(0.9),
            p99: self.histogram.value_at_quantile(0.99),
            p999: self.histogram.value_at_quantile(0.999),
        }
    }

    pub fn format_stats(&self) -> String {
        let stats = self.get_stats();
        if stats.count == 0 {
            return "No ticks recorded yet".into();
        }

        format!(
            "\tticks={},\tmin={},\tmax={},\tmean={},\tp50={},\tp90={},\tp99={},\tp999={}",
            stats.count,
            format_duration(stats.min as f64),
            format_duration(stats.max as f64),
            format_duration(stats.mean),
            format_duration(stats.p50 as f64),
            format_duration(stats.p90 as f64),
            format_duration(stats.p99 as f64),
            format_duration(stats.p999 as f64),
        )
    }
}

impl Default for TickLagMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

fn format_duration(nanos: f64) -> String {
    if nanos < 1000.0 {
        format!("{:.1}ns", nanos)
    } else if nanos < 1_000_000.0 {
        format!("{:.1}us", nanos / 1000.0)
    } else if nanos < 1_000_000_000.0 {
        format!("{:.1}ms", nanos / 1_000_000.0)
    } else {
        format!("{:.2}s", nanos / 1_000_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let measurer = TickLagMeasurer::new();
        assert_eq!(measurer.get_stats(), TickLagStats::default());
        assert_eq!(measurer.format_stats(), "No ticks recorded yet");
    }

    #[test]
    fn test_record_and_stats() {
        let mut measurer = TickLagMeasurer::new();
        measurer.record(Duration::from_micros(100));
        measurer.record(Duration::from_micros(200));
        measurer.record(Duration::ZERO);

        let stats = measurer.get_stats();
        assert_eq!(stats.count, 3);
        // Zero lag is clamped to the 1ns floor
        assert_eq!(stats.min, 1);
        assert!(stats.max >= 200_000);
        assert!(measurer.format_stats().starts_with("\tticks=3,"));
    }

    #[test]
    fn test_huge_lag_saturates() {
        let mut measurer = TickLagMeasurer::new();
        measurer.record(Duration::from_secs(10_000));
        assert_eq!(measurer.get_stats().count, 1);
    }

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(500.0), "500.0ns");
        assert_eq!(format_duration(1_500.0), "1.5us");
        assert_eq!(format_duration(2_500_000.0), "2.5ms");
        assert_eq!(format_duration(3_000_000_000.0), "3.00s");
    }
}
