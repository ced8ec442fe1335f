//! Countdown/mode state machine and the single timer slot

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{Mode, TargetTimes};

/// What to do after new target times arrive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Arm(Mode),
    /// Both times already passed; fetch `next_date` instead
    Rollover { next_date: NaiveDate },
}

/// What to do once the live target has expired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    Arm(Mode),
    FetchNextDay(NaiveDate),
}

#[derive(Debug)]
struct CountdownTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Targets, mode and the one countdown task allowed to run
#[derive(Debug, Default)]
pub struct ControllerState {
    times: Option<TargetTimes>,
    mode: Mode,
    timer: Option<CountdownTimer>,
    generation: u64,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn times(&self) -> Option<&TargetTimes> {
        self.times.as_ref()
    }

    pub fn target(&self, mode: Mode) -> Option<DateTime<Tz>> {
        self.times.as_ref().map(|times| times.target(mode))
    }

    /// Store freshly fetched times and pick the mode for them.
    ///
    /// When both times have passed the mode is set to sunrise right away,
    /// before the next day's data exists.
    pub fn apply_refresh(&mut self, times: TargetTimes, now: DateTime<Utc>) -> RefreshOutcome {
        let outcome = if times.sunrise > now {
            self.mode = Mode::TowardSunrise;
            RefreshOutcome::Arm(Mode::TowardSunrise)
        } else if times.sunset > now {
            self.mode = Mode::TowardSunset;
            RefreshOutcome::Arm(Mode::TowardSunset)
        } else {
            self.mode = Mode::TowardSunrise;
            RefreshOutcome::Rollover { next_date: times.next_date() }
        };
        self.times = Some(times);
        outcome
    }

    /// Switch to the other target. Leaving sunset wraps to the next day's sunrise.
    pub fn flip(&mut self) -> Option<FlipOutcome> {
        let times = self.times.as_ref()?;
        let outcome = match self.mode {
            Mode::TowardSunrise => FlipOutcome::Arm(Mode::TowardSunset),
            Mode::TowardSunset => FlipOutcome::FetchNextDay(times.next_date()),
        };
        self.mode = self.mode.other();
        Some(outcome)
    }

    /// Cancel whatever countdown is running and reserve a generation for the next one
    pub fn begin_timer(&mut self) -> u64 {
        self.cancel_timer();
        self.generation += 1;
        self.generation
    }

    /// Hold the handle spawned for `generation`; a stale handle is aborted instead
    pub fn install_timer(&mut self, generation: u64, handle: JoinHandle<()>) {
        if generation == self.generation && self.timer.is_none() {
            self.timer = Some(CountdownTimer { generation, handle });
        } else {
            debug!("Discarding superseded countdown timer {}", generation);
            handle.abort();
        }
    }

    /// Called by an expired countdown after its grace delay.
    ///
    /// Returns true if it still owns the slot, which is then emptied without
    /// aborting the caller.
    pub fn release_timer(&mut self, generation: u64) -> bool {
        match &self.timer {
            Some(timer) if timer.generation == generation => {
                self.timer = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!("Cancelling countdown timer {}", timer.generation);
            timer.handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }
}
