use crate::error::WindowError;
use crate::measure::TickLagStats;
use crate::options::{Layout, SlidingWindowOptions};
use crate::ring::Ring;
use crate::rotation::RotationWorker;
use parking_lot::RwLock;
use spdlog::debug;
use std::sync::Arc;
use std::time::Duration;

/// A sliding time window of fixed-duration buckets.
///
/// Values are added to the current bucket. A background thread moves the current
/// bucket forward once per granularity and clears it, so queries over a lookback
/// only see what was added during roughly that much recent time. Writers take
/// the write lock, queries the read lock; share the window through an [`Arc`].
///
/// The rotation thread is stopped by [`stop`](Self::stop) or when the window is dropped.
pub struct SlidingWindow {
    name: &'static str,
    layout: Layout,
    ring: Arc<RwLock<Ring>>,
    rotation: RotationWorker,
}

impl SlidingWindow {
    pub fn new(window: Duration, granularity: Duration) -> Result<Self, WindowError> {
        Self::with_options(SlidingWindowOptions::new(window, granularity))
    }

    /// Same as [`new`](Self::new) but panics on an invalid configuration.
    ///
    /// Meant for hard-coded windows where a bad ratio is a programming error.
    pub fn new_or_panic(window: Duration, granularity: Duration) -> Self {
        match Self::new(window, granularity) {
            Ok(window) => window,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn with_options(options: SlidingWindowOptions) -> Result<Self, WindowError> {
        let layout = options.validate()?;
        let ring = Arc::new(RwLock::new(Ring::new(layout.capacity)));
        let rotation = RotationWorker::spawn(
            options.name,
            layout.granularity,
            ring.clone(),
            options.tick_stats,
        )?;

        debug!(
            "[{}] created window={:?}, granularity={:?}, buckets={}",
            options.name, layout.window, layout.granularity, layout.capacity
        );

        Ok(Self {
            name: options.name,
            layout,
            ring,
            rotation,
        })
    }

    #[inline(always)]
    pub fn add(&self, value: f64) {
        self.ring.write().add(value);
    }

    /// Sum of values and number of adds over the last `lookback`.
    ///
    /// Lookbacks past the window are clamped to it and only whole buckets count,
    /// so a lookback shorter than one granularity always yields `(0.0, 0)`.
    pub fn total(&self, lookback: Duration) -> (f64, u64) {
        let buckets = self.buckets_in(lookback);
        self.ring.read().sum_back(buckets)
    }

    /// Mean of every value added over the last `lookback`, or `0.0` when nothing was added.
    ///
    /// Each add weighs the same, so busy buckets pull the mean harder than quiet ones.
    pub fn average(&self, lookback: Duration) -> f64 {
        let (total, count) = self.total(lookback);
        if count == 0 {
            return 0.0;
        }
        total / count as f64
    }

    /// Total over the last `lookback` divided by the seconds actually covered.
    pub fn rate(&self, lookback: Duration) -> f64 {
        let buckets = self.buckets_in(lookback);
        if buckets == 0 {
            return 0.0;
        }
        let (total, _) = self.ring.read().sum_back(buckets);
        let covered = self.layout.granularity.as_secs_f64() * buckets as f64;
        total / covered
    }

    /// Clears every bucket and moves the cursor back to the first one.
    ///
    /// Unlike a fresh window, a reset one keeps no buckets in range: every later
    /// query returns `(0.0, 0)`, even after rotation ticks.
    pub fn reset(&self) {
        self.ring.write().reset();
        debug!("[{}] reset", self.name);
    }

    /// Stops the rotation thread. Calling it again is a no-op.
    ///
    /// Adds and queries keep working afterwards against the frozen buckets.
    pub fn stop(&self) {
        self.rotation.stop();
    }

    pub fn is_running(&self) -> bool {
        self.rotation.is_running()
    }

    /// Tick lag distribution, when enabled through [`SlidingWindowOptions::tick_stats`].
    pub fn tick_lag_stats(&self) -> Option<TickLagStats> {
        self.rotation.tick_lag_stats()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn window(&self) -> Duration {
        self.layout.window
    }

    pub fn granularity(&self) -> Duration {
        self.layout.granularity
    }

    pub fn capacity(&self) -> usize {
        self.layout.capacity
    }

    fn buckets_in(&self, lookback: Duration) -> usize {
        let lookback = lookback.min(self.layout.window);
        // Bounded by capacity after the clamp
        (lookback.as_nanos() / self.layout.granularity.as_nanos()) as usize
    }
}
