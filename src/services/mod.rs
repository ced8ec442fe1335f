//! External lookup clients
//!
//! Sunrise/sunset times, Hebrew calendar highlights and Hebrew date
//! conversion, each fetched over HTTP with no retry.

pub mod hebcal;
pub mod sefaria;
pub mod sun;

use anyhow::{Context, Result};
use reqwest::Client;

// Re-export main types
pub use hebcal::HebcalClient;
pub use sefaria::{CalendarHighlights, SefariaClient};
pub use sun::SunClient;

/// Shared HTTP client for all three providers.
///
/// No request timeout is set; a hung request stalls only its own refresh.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}
