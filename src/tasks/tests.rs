// Controller and refresher tests against a local stand-in for the providers

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{extract::Query, http::StatusCode, routing::get, Router};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Asia::Jerusalem;
use reqwest::Client;

use super::*;
use crate::{
    config::Language,
    services::{HebcalClient, SefariaClient, SunClient},
    state::{AppState, ColorTier, Field, Mode, RefreshScope, TargetTimes, PLACEHOLDER},
    utils::ManualTimeSource,
};

const SUN_BODY: &str = r#"{"results":{"sunrise":"6:12:03 AM","sunset":"5:45:10 PM"},"status":"OK"}"#;

const CALENDAR_BODY: &str = r#"{"calendar_items":[
    {"title":{"en":"Parashat Hashavua","he":"פרשת השבוע"},"displayValue":{"en":"Vayakhel-Pekudei","he":"ויקהל-פקודי"}},
    {"title":{"en":"Daf Yomi","he":"דף יומי"},"displayValue":{"en":"Chullin 52","he":"חולין נב"}}
]}"#;

const CONVERTER_BODY: &str = r#"{"hy":5786,"hm":"Adar","hd":21,"hebrew":"כ״א בְּאַדָר תשפ״ו"}"#;

fn local(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    local_on(10, hour, minute, second)
}

/// A Jerusalem wall-clock instant in March 2026
fn local_on(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Jerusalem
        .with_ymd_and_hms(2026, 3, day, hour, minute, second)
        .unwrap()
        .with_timezone(&Utc)
}

fn app_state(clock: Arc<ManualTimeSource>) -> Arc<AppState> {
    Arc::new(AppState::new(
        20554,
        "127.0.0.1".to_string(),
        Jerusalem,
        Language::En,
        &[],
        clock,
    ))
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Sun provider that answers every date with the same times and records the dates asked for
async fn sun_provider(status: StatusCode) -> (String, Arc<Mutex<Vec<String>>>) {
    let dates = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&dates);
    let app = Router::new().route(
        "/json",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push(params.get("date").cloned().unwrap_or_default());
                (status, SUN_BODY)
            }
        }),
    );
    (format!("{}/json", serve(app).await), dates)
}

async fn calendar_provider(calendar_status: StatusCode) -> String {
    let app = Router::new()
        .route("/calendars", get(move || async move { (calendar_status, CALENDAR_BODY) }))
        .route(
            "/converter",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.get("gd").map(String::as_str) == Some("10") {
                    (StatusCode::OK, CONVERTER_BODY)
                } else {
                    (StatusCode::BAD_REQUEST, "{}")
                }
            }),
        );
    serve(app).await
}

fn controller(state: &Arc<AppState>, endpoint: String) -> ZmanimController {
    let sun = SunClient::new(Client::new(), endpoint, 31.7683, 35.2137, Jerusalem);
    ZmanimController::new(Arc::clone(state), sun)
}

fn calendar(state: &Arc<AppState>, base: &str) -> CalendarRefresher {
    CalendarRefresher::new(
        Arc::clone(state),
        SefariaClient::new(Client::new(), format!("{}/calendars", base)),
        HebcalClient::new(Client::new(), format!("{}/converter", base)),
    )
}

fn text(state: &AppState, field: Field) -> String {
    state.get_display().unwrap().text(field).unwrap_or_default().to_string()
}

fn color(state: &AppState, field: Field) -> Option<String> {
    state.get_display().unwrap().fields.get(&field).and_then(|value| value.color.clone())
}

fn mode(state: &AppState) -> Mode {
    state.with_controller(|c| c.mode()).unwrap()
}

fn armed(state: &AppState) -> bool {
    state.with_controller(|c| c.is_armed()).unwrap()
}

/// Let spawned countdown tasks run their first tick
async fn settle() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}

/// Step paused time until `done` holds. Paused time skips ahead while a
/// socket is pending, so each step also gives the loopback stub a real millisecond.
async fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    for _ in 0..3000 {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    done()
}

#[tokio::test]
async fn refresh_before_sunrise_arms_sunrise_countdown() {
    let clock = Arc::new(ManualTimeSource::new(local(4, 0, 0)));
    let state = app_state(clock);
    let (endpoint, dates) = sun_provider(StatusCode::OK).await;

    controller(&state, endpoint).refresh().await;
    settle().await;

    assert_eq!(*dates.lock().unwrap(), vec!["2026-03-10".to_string()]);
    assert_eq!(mode(&state), Mode::TowardSunrise);
    assert!(armed(&state));
    assert_eq!(text(&state, Field::Sunrise), "06:12");
    assert_eq!(text(&state, Field::Sunset), "17:45");
    assert_eq!(text(&state, Field::Dawn), "05:00");
    // Two hours out: placeholder in the sunrise colour
    assert_eq!(text(&state, Field::SunriseCountdown), PLACEHOLDER);
    assert_eq!(
        color(&state, Field::SunriseCountdown).as_deref(),
        Some(ColorTier::Default(Mode::TowardSunrise).color())
    );
    assert_eq!(text(&state, Field::SunsetCountdown), PLACEHOLDER);
    assert!(state.get_last_refresh().unwrap().ok);
}

#[tokio::test]
async fn close_target_shows_live_critical_countdown() {
    let clock = Arc::new(ManualTimeSource::new(local(6, 11, 0)));
    let state = app_state(clock);
    let (endpoint, _) = sun_provider(StatusCode::OK).await;

    controller(&state, endpoint).refresh().await;
    settle().await;

    assert_eq!(text(&state, Field::SunriseCountdown), "00:01:03");
    assert_eq!(
        color(&state, Field::SunriseCountdown).as_deref(),
        Some(ColorTier::Critical.color())
    );
    assert_eq!(text(&state, Field::SunsetCountdown), PLACEHOLDER);
}

#[tokio::test]
async fn midday_refresh_counts_toward_sunset() {
    let clock = Arc::new(ManualTimeSource::new(local(17, 0, 0)));
    let state = app_state(clock);
    let (endpoint, _) = sun_provider(StatusCode::OK).await;

    controller(&state, endpoint).refresh().await;
    settle().await;

    assert_eq!(mode(&state), Mode::TowardSunset);
    assert_eq!(text(&state, Field::SunsetCountdown), "00:45:10");
    assert_eq!(text(&state, Field::SunriseCountdown), PLACEHOLDER);
}

#[tokio::test]
async fn provider_error_marks_every_zmanim_field() {
    let clock = Arc::new(ManualTimeSource::new(local(4, 0, 0)));
    let state = app_state(clock);
    let (endpoint, _) = sun_provider(StatusCode::INTERNAL_SERVER_ERROR).await;

    controller(&state, endpoint).refresh().await;
    settle().await;

    for field in Field::ZMANIM {
        assert_eq!(text(&state, field), "Error", "{:?}", field);
    }
    assert_eq!(text(&state, Field::ClockTime), "...");
    assert_eq!(text(&state, Field::Date), "...");
    assert!(!armed(&state));

    let record = state.get_last_refresh().unwrap();
    assert!(!record.ok);
    assert!(record.message.contains("500"));
}

#[tokio::test]
async fn after_sunset_fetches_the_next_day() {
    let clock = Arc::new(ManualTimeSource::new(local(20, 0, 0)));
    let state = app_state(clock);
    let (endpoint, dates) = sun_provider(StatusCode::OK).await;

    controller(&state, endpoint).refresh().await;

    assert_eq!(
        *dates.lock().unwrap(),
        vec!["2026-03-10".to_string(), "2026-03-11".to_string()]
    );
    assert_eq!(mode(&state), Mode::TowardSunrise);
    assert!(armed(&state));
    assert_eq!(
        state.with_controller(|c| c.times().map(|t| t.date)).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 11)
    );
}

#[tokio::test]
async fn rollovers_stop_after_the_bound() {
    // Three days behind the clock: every answer is already in the past
    let clock = Arc::new(ManualTimeSource::new(local_on(13, 12, 0, 0)));
    let state = app_state(clock);
    let (endpoint, dates) = sun_provider(StatusCode::OK).await;

    controller(&state, endpoint)
        .refresh_for(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap())
        .await;

    assert_eq!(
        *dates.lock().unwrap(),
        vec!["2026-03-10".to_string(), "2026-03-11".to_string(), "2026-03-12".to_string()]
    );
    assert!(!armed(&state));
    let record = state.get_last_refresh().unwrap();
    assert!(!record.ok);
    assert!(record.message.contains("2026-03-12"));
}

#[tokio::test]
async fn unusable_controller_lock_records_a_failed_refresh() {
    let clock = Arc::new(ManualTimeSource::new(local(4, 0, 0)));
    let state = app_state(clock);
    let (endpoint, dates) = sun_provider(StatusCode::OK).await;

    let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = state.controller.lock().unwrap();
        panic!("controller poisoned on purpose");
    }));
    assert!(poisoned.is_err());

    controller(&state, endpoint).refresh().await;

    assert_eq!(dates.lock().unwrap().len(), 1);
    for field in Field::ZMANIM {
        assert_eq!(text(&state, field), "Error", "{:?}", field);
    }
    let record = state.get_last_refresh().unwrap();
    assert!(!record.ok);
    assert!(record.message.contains("Failed to store target times"));
}

fn morning_times() -> TargetTimes {
    TargetTimes::new(
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        Jerusalem.with_ymd_and_hms(2026, 3, 10, 6, 12, 0).unwrap(),
        Jerusalem.with_ymd_and_hms(2026, 3, 10, 6, 40, 0).unwrap(),
    )
}

#[tokio::test(start_paused = true)]
async fn expired_sunrise_flips_to_sunset_after_grace() {
    let clock = Arc::new(ManualTimeSource::new(local(6, 11, 59)));
    let state = app_state(Arc::clone(&clock));
    let controller = controller(&state, "http://127.0.0.1:9/json".to_string());

    assert_eq!(controller.apply_times(morning_times()), Ok(None));
    clock.set(local(6, 12, 1));
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(text(&state, Field::SunriseCountdown), "Time passed");
    assert_eq!(mode(&state), Mode::TowardSunrise);

    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(mode(&state), Mode::TowardSunset);
    assert!(armed(&state));
    assert_eq!(text(&state, Field::SunsetCountdown), "00:27:59");
    assert_eq!(text(&state, Field::SunriseCountdown), PLACEHOLDER);
}

#[tokio::test(start_paused = true)]
async fn new_data_during_grace_supersedes_the_flip() {
    let clock = Arc::new(ManualTimeSource::new(local(6, 11, 59)));
    let state = app_state(Arc::clone(&clock));
    let controller = controller(&state, "http://127.0.0.1:9/json".to_string());

    controller.apply_times(morning_times()).unwrap();
    clock.set(local(6, 12, 1));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(text(&state, Field::SunriseCountdown), "Time passed");

    let tomorrow = TargetTimes::new(
        NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
        Jerusalem.with_ymd_and_hms(2026, 3, 11, 6, 11, 0).unwrap(),
        Jerusalem.with_ymd_and_hms(2026, 3, 11, 17, 46, 0).unwrap(),
    );
    controller.apply_times(tomorrow).unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(mode(&state), Mode::TowardSunrise);
    assert_eq!(text(&state, Field::SunriseCountdown), PLACEHOLDER);
    assert_eq!(text(&state, Field::SunsetCountdown), PLACEHOLDER);
}

#[tokio::test(start_paused = true)]
async fn expired_sunset_fetches_tomorrow_and_counts_to_sunrise() {
    let clock = Arc::new(ManualTimeSource::new(local(17, 45, 8)));
    let state = app_state(Arc::clone(&clock));
    let (endpoint, dates) = sun_provider(StatusCode::OK).await;

    controller(&state, endpoint).refresh().await;
    assert_eq!(mode(&state), Mode::TowardSunset);
    assert!(armed(&state));

    clock.set(local(17, 45, 11));
    assert!(wait_until(|| text(&state, Field::SunsetCountdown) == "Time passed").await);
    assert_eq!(dates.lock().unwrap().len(), 1);

    // Grace period, flip past sunset, then tomorrow's fetch re-arms the slot
    assert!(wait_until(|| dates.lock().unwrap().len() == 2 && armed(&state)).await);

    assert_eq!(
        *dates.lock().unwrap(),
        vec!["2026-03-10".to_string(), "2026-03-11".to_string()]
    );
    assert_eq!(mode(&state), Mode::TowardSunrise);
    assert_eq!(text(&state, Field::SunsetCountdown), PLACEHOLDER);
    assert_eq!(
        state.with_controller(|c| c.times().map(|t| t.date)).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 11)
    );
    assert!(state.get_last_refresh().unwrap().ok);
}

#[tokio::test]
async fn calendar_refresh_fills_its_fields() {
    let clock = Arc::new(ManualTimeSource::new(local(9, 0, 0)));
    let state = app_state(clock);
    let base = calendar_provider(StatusCode::OK).await;

    calendar(&state, &base).refresh().await;

    assert_eq!(text(&state, Field::HebrewDate), "21 Adar 5786");
    assert_eq!(text(&state, Field::Parasha), "Vayakhel-Pekudei");
    assert_eq!(text(&state, Field::DafYomi), "Chullin 52");
}

#[tokio::test]
async fn calendar_failures_stay_per_feature() {
    let clock = Arc::new(ManualTimeSource::new(local(9, 0, 0)));
    let state = app_state(clock);
    let base = calendar_provider(StatusCode::SERVICE_UNAVAILABLE).await;

    calendar(&state, &base).refresh().await;

    assert_eq!(text(&state, Field::HebrewDate), "21 Adar 5786");
    assert_eq!(text(&state, Field::Parasha), "Error");
    assert_eq!(text(&state, Field::DafYomi), "Error");
    assert_eq!(text(&state, Field::Sunrise), "...");
}

#[tokio::test]
async fn refresh_task_serves_calendar_requests() {
    let clock = Arc::new(ManualTimeSource::new(local(9, 0, 0)));
    let state = app_state(clock);
    let base = calendar_provider(StatusCode::OK).await;
    let (endpoint, dates) = sun_provider(StatusCode::OK).await;

    let requests = state.subscribe_refresh();
    tokio::spawn(refresh_task(requests, controller(&state, endpoint), calendar(&state, &base)));

    state.request_refresh(RefreshScope::Calendar).unwrap();
    settle().await;

    assert_eq!(text(&state, Field::HebrewDate), "21 Adar 5786");
    assert!(dates.lock().unwrap().is_empty());
}

#[test]
fn clock_render_writes_time_date_and_hands() {
    let clock = Arc::new(ManualTimeSource::new(local(15, 0, 0)));
    let state = app_state(clock);

    super::clock::render_clock(&state, state.now());

    let snapshot = state.get_display().unwrap();
    assert_eq!(snapshot.text(Field::ClockTime), Some("15:00:00"));
    assert_eq!(snapshot.text(Field::Date), Some("10/03/2026"));
    assert_eq!(snapshot.hands.hour, 90.0);
}
