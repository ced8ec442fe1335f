//! Zmanim Countdown - a clock and sunrise/sunset countdown board
//!
//! This library fetches the day's zmanim and Hebrew calendar highlights,
//! keeps a display board of named fields up to date and counts down to
//! the next sunrise or sunset.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
