//! Hebrew date and calendar highlights refresh

use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    services::{HebcalClient, SefariaClient},
    state::{AppState, Field},
};

#[derive(Clone)]
pub struct CalendarRefresher {
    state: Arc<AppState>,
    sefaria: SefariaClient,
    hebcal: HebcalClient,
}

impl CalendarRefresher {
    pub fn new(state: Arc<AppState>, sefaria: SefariaClient, hebcal: HebcalClient) -> Self {
        Self { state, sefaria, hebcal }
    }

    /// Each lookup fails on its own; a failure only marks its own fields
    pub async fn refresh(&self) {
        let today = self.state.now().date_naive();
        let language = self.state.language;

        let (highlights, hebrew_date) = tokio::join!(
            self.sefaria.fetch(language),
            self.hebcal.fetch(today, language),
        );

        match hebrew_date {
            Ok(text) => {
                info!("Hebrew date for {}: {}", today, text);
                self.state.set_field(Field::HebrewDate, &text, None);
            }
            Err(e) => {
                warn!("Hebrew date lookup failed: {:#}", e);
                self.state.mark_failed(&[Field::HebrewDate]);
            }
        }

        match highlights {
            Ok(highlights) => {
                self.show_item(Field::Parasha, highlights.parasha);
                self.show_item(Field::DafYomi, highlights.daf_yomi);
            }
            Err(e) => {
                warn!("Calendar highlights lookup failed: {:#}", e);
                self.state.mark_failed(&[Field::Parasha, Field::DafYomi]);
            }
        }
    }

    fn show_item(&self, field: Field, value: Option<String>) {
        match value {
            Some(text) => self.state.set_field(field, &text, None),
            None => {
                warn!("{:?} missing from calendar response", field);
                self.state.mark_failed(&[field]);
            }
        }
    }
}
