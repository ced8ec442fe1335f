//! Zmanim countdown controller
//!
//! Fetches sunrise/sunset, chooses which one to count toward and runs the
//! one-second countdown task. When a target expires the task waits out the
//! grace period, flips to the other target and re-arms itself (fetching the
//! next day's times after sunset).

use std::sync::Arc;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tokio::time::{interval, sleep};
use tracing::{debug, error, info, warn};

use crate::{
    services::SunClient,
    state::{
        countdown::{GRACE_PERIOD, TICK_INTERVAL},
        AppState, ColorTier, CountdownView, Field, FlipOutcome, Mode, RefreshOutcome,
        TargetTimes, PLACEHOLDER,
    },
};

/// Day rollovers followed within a single refresh before giving up
const MAX_ROLLOVER_FETCHES: usize = 2;

#[derive(Clone)]
pub struct ZmanimController {
    state: Arc<AppState>,
    sun: SunClient,
}

impl ZmanimController {
    pub fn new(state: Arc<AppState>, sun: SunClient) -> Self {
        Self { state, sun }
    }

    /// Fetch today's times and arm the matching countdown
    pub async fn refresh(&self) {
        let today = self.state.now().date_naive();
        self.refresh_for(today).await;
    }

    /// Fetch times for `date`, following rollovers to later days
    pub async fn refresh_for(&self, date: NaiveDate) {
        let mut next = date;
        let mut date = date;
        for _ in 0..=MAX_ROLLOVER_FETCHES {
            date = next;
            let times = match self.sun.fetch(date).await {
                Ok(times) => times,
                Err(e) => {
                    self.fail(format!("{:#}", e));
                    return;
                }
            };

            match self.apply_times(times) {
                Ok(Some(next_date)) => {
                    info!("Sunrise and sunset for {} have passed, fetching {}", date, next_date);
                    next = next_date;
                }
                Ok(None) => {
                    self.state.record_refresh(true, format!("Zmanim loaded for {}", date));
                    return;
                }
                Err(e) => {
                    self.fail(e);
                    return;
                }
            }
        }

        warn!("Gave up after {} rollovers, times for {} are still in the past", MAX_ROLLOVER_FETCHES, date);
        self.state.record_refresh(false, format!("Zmanim up to {} are already in the past", date));
    }

    /// Show new times and arm the countdown they call for.
    ///
    /// Returns the date to fetch next when both times have already passed,
    /// or an error when the times could not be stored.
    pub fn apply_times(&self, times: TargetTimes) -> Result<Option<NaiveDate>, String> {
        self.show_times(&times);

        let now = self.state.now().with_timezone(&Utc);
        let outcome = self
            .state
            .with_controller(|c| c.apply_refresh(times, now))
            .map_err(|e| format!("Failed to store target times: {}", e))?;

        match outcome {
            RefreshOutcome::Arm(mode) => {
                self.arm(mode);
                Ok(None)
            }
            RefreshOutcome::Rollover { next_date } => {
                self.cancel();
                Ok(Some(next_date))
            }
        }
    }

    fn show_times(&self, times: &TargetTimes) {
        self.state.set_field(Field::Sunrise, &times.sunrise.format("%H:%M").to_string(), None);
        self.state.set_field(Field::Sunset, &times.sunset.format("%H:%M").to_string(), None);
        self.state.set_field(Field::Dawn, &times.dawn().format("%H:%M").to_string(), None);
    }

    fn fail(&self, reason: String) {
        warn!("Zmanim refresh failed: {}", reason);
        if let Err(e) = self.state.with_controller(|c| c.cancel_timer()) {
            error!("Failed to cancel countdown: {}", e);
        }
        self.state.mark_failed(&Field::ZMANIM);
        self.state.record_refresh(false, reason);
    }

    fn cancel(&self) {
        if let Err(e) = self.state.with_controller(|c| c.cancel_timer()) {
            error!("Failed to cancel countdown: {}", e);
        }
        self.state.set_field(Field::SunriseCountdown, PLACEHOLDER, None);
        self.state.set_field(Field::SunsetCountdown, PLACEHOLDER, None);
    }

    /// Replace whatever countdown is running with one toward `mode`'s target
    fn arm(&self, mode: Mode) {
        let target = match self.state.with_controller(|c| c.target(mode)) {
            Ok(Some(target)) => target,
            Ok(None) => {
                warn!("No {} time to count down to", mode.label());
                return;
            }
            Err(e) => {
                error!("Failed to read target time: {}", e);
                return;
            }
        };

        let generation = match self.state.with_controller(|c| c.begin_timer()) {
            Ok(generation) => generation,
            Err(e) => {
                error!("Failed to reserve countdown timer: {}", e);
                return;
            }
        };

        self.state.set_field(mode.other().countdown_field(), PLACEHOLDER, None);
        info!("Counting down to {} at {}", mode.label(), target.format("%H:%M:%S"));

        let handle = tokio::spawn(self.clone().run_countdown(mode, target, generation));
        if let Err(e) = self.state.with_controller(|c| c.install_timer(generation, handle)) {
            error!("Failed to install countdown timer: {}", e);
        }
    }

    async fn run_countdown(self, mode: Mode, target: DateTime<Tz>, generation: u64) {
        let field = mode.countdown_field();
        let mut ticker = interval(TICK_INTERVAL);

        loop {
            ticker.tick().await;
            let remaining = target.signed_duration_since(self.state.now());

            match CountdownView::evaluate(remaining, mode) {
                CountdownView::Expired => {
                    info!("{} reached, switching targets in {}s", mode.label(), GRACE_PERIOD.as_secs());
                    self.state.set_field(
                        field,
                        self.state.language.time_passed(),
                        Some(ColorTier::Critical.color()),
                    );
                    break;
                }
                CountdownView::Distant => {
                    self.state.set_field(field, PLACEHOLDER, Some(ColorTier::Default(mode).color()));
                }
                CountdownView::Live { text, tier } => {
                    self.state.set_field(field, &text, Some(tier.color()));
                }
            }
        }

        sleep(GRACE_PERIOD).await;

        match self.state.with_controller(|c| c.release_timer(generation)) {
            Ok(true) => self.advance().await,
            Ok(false) => debug!("Countdown {} was superseded during its grace period", generation),
            Err(e) => error!("Failed to release countdown timer: {}", e),
        }
    }

    async fn advance(&self) {
        match self.state.with_controller(|c| c.flip()) {
            Ok(Some(FlipOutcome::Arm(mode))) => self.arm(mode),
            Ok(Some(FlipOutcome::FetchNextDay(date))) => {
                info!("Day is over, fetching zmanim for {}", date);
                self.refresh_for(date).await;
            }
            Ok(None) => warn!("No target times to switch between"),
            Err(e) => error!("Failed to switch countdown target: {}", e),
        }
    }
}
