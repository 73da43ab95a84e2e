//! WASM bindings for grid-engine.
//!
//! Exposes event layout and view navigation to JavaScript via `wasm-bindgen`.
//! All complex types are passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p grid-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/grid_engine_wasm.wasm
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use grid_engine::{
    DateRange, EventLayout, NavigationAction, NavigationState, SwipeConfig, TimeInterval,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Input format for events passed from JavaScript.
#[derive(Deserialize)]
struct EventInput {
    id: String,
    start: String,
    end: String,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (e.g., "2026-02-17T14:00:00+01:00") and naive local time
/// (e.g., "2026-02-17T14:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{}': {}", s, e))
}

/// Convert a JSON array of `{id, start, end}` objects into intervals.
fn parse_events_json(json: &str) -> Result<Vec<TimeInterval<String>>, String> {
    let inputs: Vec<EventInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid events JSON: {}", e))?;

    inputs
        .into_iter()
        .map(|input| {
            let start = parse_datetime(&input.start)?;
            let end = parse_datetime(&input.end)?;
            Ok(TimeInterval::new(input.id, start, end))
        })
        .collect()
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Implementations (JSON in, JSON out)
// ---------------------------------------------------------------------------

fn layouts_json(events_json: &str) -> Result<String, String> {
    let events = parse_events_json(events_json)?;
    let layouts: BTreeMap<String, EventLayout> =
        grid_engine::compute_layouts(&events).into_iter().collect();
    to_json(&layouts)
}

fn day_layouts_json(
    events_json: &str,
    from: &str,
    to: &str,
    timezone: &str,
) -> Result<String, String> {
    let events = parse_events_json(events_json)?;
    let days = DateRange::new(parse_date(from)?, parse_date(to)?).map_err(|e| e.to_string())?;
    let tz: Tz = timezone
        .parse()
        .map_err(|_| format!("Invalid timezone: {}", timezone))?;

    let by_day: BTreeMap<String, BTreeMap<String, EventLayout>> =
        grid_engine::compute_day_layouts(&events, &days, tz)
            .into_iter()
            .map(|(day, layouts)| (day.to_string(), layouts.into_iter().collect()))
            .collect();
    to_json(&by_day)
}

fn initial_state_json(today: &str) -> Result<String, String> {
    to_json(&NavigationState::initial(parse_date(today)?))
}

fn apply_action_json(
    state_json: &str,
    action_json: &str,
    today: &str,
    swipe_threshold: Option<f32>,
) -> Result<String, String> {
    let state: NavigationState =
        serde_json::from_str(state_json).map_err(|e| format!("Invalid state JSON: {}", e))?;
    let action: NavigationAction =
        serde_json::from_str(action_json).map_err(|e| format!("Invalid action JSON: {}", e))?;
    let config = match swipe_threshold {
        Some(threshold) => {
            SwipeConfig::try_with_threshold(threshold).map_err(|e| e.to_string())?
        }
        None => SwipeConfig::default(),
    };

    to_json(&state.apply(action, parse_date(today)?, &config))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Lay out overlapping events side by side.
///
/// `events_json` must be a JSON array of `{id, start, end}` objects with ISO 8601
/// datetime strings. Returns a JSON object mapping each id to
/// `{width_fraction, offset_fraction, cluster_id, column, column_count}`.
#[wasm_bindgen(js_name = "computeLayouts")]
pub fn compute_layouts(events_json: &str) -> Result<String, JsValue> {
    layouts_json(events_json).map_err(|e| JsValue::from_str(&e))
}

/// Lay out events per day column from `from` to `to` (inclusive, `YYYY-MM-DD`),
/// with day boundaries at local midnight in the IANA `timezone`.
///
/// Returns a JSON object mapping each date to a layout object as returned by
/// [`compute_layouts`].
#[wasm_bindgen(js_name = "computeDayLayouts")]
pub fn compute_day_layouts(
    events_json: &str,
    from: &str,
    to: &str,
    timezone: &str,
) -> Result<String, JsValue> {
    day_layouts_json(events_json, from, to, timezone).map_err(|e| JsValue::from_str(&e))
}

/// The navigation state for a freshly opened screen, as JSON.
#[wasm_bindgen(js_name = "initialNavigationState")]
pub fn initial_navigation_state(today: &str) -> Result<String, JsValue> {
    initial_state_json(today).map_err(|e| JsValue::from_str(&e))
}

/// Apply one navigation action to a state and return the new state as JSON.
///
/// `action_json` is a tagged object, e.g. `{"type":"select-mode","mode":"one-day"}`
/// or `{"type":"drag","dx":-140,"dy":8}`. `swipe_threshold` defaults to the
/// engine's standard threshold and must be finite and non-negative.
#[wasm_bindgen(js_name = "applyNavigationAction")]
pub fn apply_navigation_action(
    state_json: &str,
    action_json: &str,
    today: &str,
    swipe_threshold: Option<f32>,
) -> Result<String, JsValue> {
    apply_action_json(state_json, action_json, today, swipe_threshold)
        .map_err(|e| JsValue::from_str(&e))
}
