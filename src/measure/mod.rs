mod tick_lag;

pub use tick_lag::{TickLagMeasurer, TickLagStats};
