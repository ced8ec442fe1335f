//! Background tasks module
//!
//! The clock tick, the zmanim countdown controller, the calendar refresher
//! and the listener that runs refreshes on request.

pub mod calendar;
pub mod clock;
pub mod countdown;
pub mod refresh;

#[cfg(test)]
mod tests;

// Re-export main items
pub use calendar::CalendarRefresher;
pub use clock::clock_task;
pub use countdown::ZmanimController;
pub use refresh::refresh_task;
