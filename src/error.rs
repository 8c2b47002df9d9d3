use thiserror::Error;

/// Errors raised while building a [`SlidingWindow`](crate::SlidingWindow).
///
/// Nothing after construction can fail, so this is the only error type of the crate.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("window cannot be 0")]
    InvalidWindow,

    #[error("granularity cannot be 0")]
    InvalidGranularity,

    #[error("window size has to be a multiplier of the granularity size")]
    InvalidRatio,

    #[error("failed to spawn rotation worker: {source}")]
    Spawn {
        #[from]
        source: std::io::Error,
    },
}
