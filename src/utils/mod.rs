//! Utility functions module
//!
//! Shutdown signal handling and the injectable time source.

pub mod signals;
pub mod time_source;

// Re-export main items
pub use signals::shutdown_signal;
pub use time_source::{ManualTimeSource, SystemTimeSource, TimeSource};
