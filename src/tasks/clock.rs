//! Clock face background task

use std::sync::Arc;
use chrono::DateTime;
use chrono_tz::Tz;
use tokio::time::interval;
use tracing::{info, warn};

use crate::state::{countdown::TICK_INTERVAL, AppState, Field, HandAngles, RefreshScope};

/// Update the clock fields every second and refresh the calendar when the date changes
pub async fn clock_task(state: Arc<AppState>) {
    info!("Starting clock task");

    let mut ticker = interval(TICK_INTERVAL);
    let mut last_date = None;

    loop {
        ticker.tick().await;

        let now = state.now();
        render_clock(&state, now);

        let today = now.date_naive();
        if last_date.is_some_and(|date| date != today) {
            info!("Date changed to {}, refreshing calendar", today);
            if let Err(e) = state.request_refresh(RefreshScope::Calendar) {
                warn!("{}", e);
            }
        }
        last_date = Some(today);
    }
}

pub fn render_clock(state: &AppState, now: DateTime<Tz>) {
    state.set_field(Field::ClockTime, &now.format("%H:%M:%S").to_string(), None);
    state.set_field(Field::Date, &now.format("%d/%m/%Y").to_string(), None);
    state.set_hands(HandAngles::at(now.time()));
}
