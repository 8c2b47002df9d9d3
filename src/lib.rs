mod error;
pub mod measure;
mod options;
mod ring;
mod rotation;
mod window;

pub use crate::error::WindowError;
pub use crate::options::{Layout, SlidingWindowOptions};
pub use crate::window::SlidingWindow;
