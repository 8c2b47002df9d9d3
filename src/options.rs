use crate::error::WindowError;
use std::time::Duration;

/// Configuration for a [`SlidingWindow`](crate::SlidingWindow).
#[derive(Debug, Clone)]
pub struct SlidingWindowOptions {
    /// Label used in log lines emitted by the rotation worker.
    pub name: &'static str,
    /// Total retained duration.
    pub window: Duration,
    /// Duration covered by one bucket.
    pub granularity: Duration,
    /// Record how late each rotation tick runs.
    pub tick_stats: bool,
}

/// Validated bucket geometry derived from [`SlidingWindowOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub window: Duration,
    pub granularity: Duration,
    pub capacity: usize,
}

impl SlidingWindowOptions {
    pub fn new(window: Duration, granularity: Duration) -> Self {
        Self {
            name: "sliding_window",
            window,
            granularity,
            tick_stats: false,
        }
    }

    /// Checks the window/granularity pair and computes the bucket count.
    ///
    /// The window must be a strict multiple of the granularity, so a window equal
    /// to its granularity is rejected even though it divides evenly.
    pub fn validate(&self) -> Result<Layout, WindowError> {
        if self.window.is_zero() {
            return Err(WindowError::InvalidWindow);
        }
        if self.granularity.is_zero() {
            return Err(WindowError::InvalidGranularity);
        }

        let window = self.window.as_nanos();
        let granularity = self.granularity.as_nanos();
        if window <= granularity || window % granularity != 0 {
            return Err(WindowError::InvalidRatio);
        }

        let capacity =
            usize::try_from(window / granularity).map_err(|_| WindowError::InvalidRatio)?;

        Ok(Layout {
            window: self.window,
            granularity: self.granularity,
            capacity,
        })
    }
}
