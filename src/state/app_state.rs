//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::{config::Language, utils::TimeSource};
use super::{ControllerState, DisplayBoard, DisplaySnapshot, Field, HandAngles};

/// Which lookups a refresh request should redo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshScope {
    /// Sunrise/sunset and the Hebrew calendar
    All,
    /// Hebrew date and calendar highlights only
    Calendar,
}

/// Result of the most recent sunrise/sunset refresh
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRecord {
    pub at: DateTime<Utc>,
    pub ok: bool,
    pub message: String,
}

/// Shared state for the board, the controller and the HTTP API
pub struct AppState {
    /// Targets, mode and the countdown timer slot
    pub controller: Mutex<ControllerState>,
    /// The display surface
    pub display: Mutex<DisplayBoard>,
    /// Location and presentation settings
    pub timezone: Tz,
    pub language: Language,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    pub last_refresh: Mutex<Option<RefreshRecord>>,
    /// Channel for manual and rollover refresh requests
    pub refresh_tx: broadcast::Sender<RefreshScope>,
    /// Channel publishing every display change
    pub display_tx: watch::Sender<DisplaySnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _display_rx: watch::Receiver<DisplaySnapshot>,
    time_source: Arc<dyn TimeSource>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        timezone: Tz,
        language: Language,
        hidden_fields: &[Field],
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        let board = DisplayBoard::new(hidden_fields, language.loading());
        let (refresh_tx, _) = broadcast::channel(16);
        let (display_tx, display_rx) = watch::channel(board.snapshot());

        Self {
            controller: Mutex::new(ControllerState::new()),
            display: Mutex::new(board),
            timezone,
            language,
            start_time: Instant::now(),
            port,
            host,
            last_refresh: Mutex::new(None),
            refresh_tx,
            display_tx,
            _display_rx: display_rx,
            time_source,
        }
    }

    /// Current time in the location's timezone
    pub fn now(&self) -> DateTime<Tz> {
        self.time_source.now().with_timezone(&self.timezone)
    }

    /// Apply an update to the board and publish the result
    pub fn update_display<F>(&self, updater: F) -> Result<DisplaySnapshot, String>
    where
        F: FnOnce(&mut DisplayBoard) -> Result<(), String>,
    {
        let mut board = self.display.lock()
            .map_err(|e| format!("Failed to lock display: {}", e))?;

        let result = updater(&mut *board);
        let snapshot = board.snapshot();
        drop(board);

        self.display_tx.send_replace(snapshot.clone());
        result.map(|_| snapshot)
    }

    /// Write one field; a missing target is logged and skipped
    pub fn set_field(&self, field: Field, text: &str, color: Option<&str>) {
        debug!("Display {:?} <- {}", field, text);
        if let Err(e) = self.update_display(|board| board.set(field, text, color)) {
            warn!("Skipping display update: {}", e);
        }
    }

    pub fn set_hands(&self, hands: HandAngles) {
        if let Err(e) = self.update_display(|board| {
            board.set_hands(hands);
            Ok(())
        }) {
            warn!("Skipping clock hands update: {}", e);
        }
    }

    /// Put the error marker into every listed field
    pub fn mark_failed(&self, fields: &[Field]) {
        let marker = self.language.error_marker();
        for field in fields {
            self.set_field(*field, marker, None);
        }
    }

    pub fn get_display(&self) -> Result<DisplaySnapshot, String> {
        self.display.lock()
            .map(|board| board.snapshot())
            .map_err(|e| format!("Failed to lock display: {}", e))
    }

    /// Run `f` against the controller state without holding the lock past it
    pub fn with_controller<R, F>(&self, f: F) -> Result<R, String>
    where
        F: FnOnce(&mut ControllerState) -> R,
    {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock controller state: {}", e))?;
        Ok(f(&mut *controller))
    }

    pub fn record_refresh(&self, ok: bool, message: String) {
        if let Ok(mut last) = self.last_refresh.lock() {
            *last = Some(RefreshRecord {
                at: self.time_source.now(),
                ok,
                message,
            });
        }
    }

    pub fn get_last_refresh(&self) -> Option<RefreshRecord> {
        self.last_refresh.lock().ok().and_then(|record| record.clone())
    }

    /// Ask the refresh task to redo the lookups in `scope`
    pub fn request_refresh(&self, scope: RefreshScope) -> Result<(), String> {
        self.refresh_tx
            .send(scope)
            .map_err(|e| format!("Failed to request refresh: {}", e))?;
        info!("Refresh requested: {:?}", scope);
        Ok(())
    }

    pub fn subscribe_refresh(&self) -> broadcast::Receiver<RefreshScope> {
        self.refresh_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
