//! Refresh request listener

use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{debug, info, warn};

use crate::state::RefreshScope;
use super::{CalendarRefresher, ZmanimController};

/// Serve refresh requests one at a time, for as long as the channel is open
pub async fn refresh_task(
    mut requests: Receiver<RefreshScope>,
    controller: ZmanimController,
    calendar: CalendarRefresher,
) {
    info!("Starting refresh task");

    loop {
        match requests.recv().await {
            Ok(RefreshScope::All) => {
                debug!("Refreshing zmanim and calendar");
                tokio::join!(controller.refresh(), calendar.refresh());
            }
            Ok(RefreshScope::Calendar) => {
                debug!("Refreshing calendar");
                calendar.refresh().await;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Dropped {} queued refresh requests", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Refresh channel closed, stopping refresh task");
                break;
            }
        }
    }
}
