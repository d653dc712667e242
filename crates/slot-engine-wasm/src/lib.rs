//! WASM bindings for slot-engine.
//!
//! Exposes slot generation and single-slot availability checks to JavaScript
//! via `wasm-bindgen`. Requests and commitment lists cross the boundary as
//! JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use serde::Deserialize;
use slot_engine::timezone::parse_instant;
use slot_engine::{Booking, Offer, SlotRequest};
use wasm_bindgen::prelude::*;

/// Offer as sent from JavaScript, where `voided` may be omitted or null.
#[derive(Deserialize)]
struct OfferInput {
    start_datetime: String,
    timezone: String,
    duration_minutes: i64,
    #[serde(default)]
    voided: Option<bool>,
}

impl From<OfferInput> for Offer {
    fn from(input: OfferInput) -> Self {
        Offer {
            start_datetime: input.start_datetime,
            timezone: input.timezone,
            duration_minutes: input.duration_minutes,
            voided: input.voided.unwrap_or(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_bookings_json(json: &str) -> Result<Vec<Booking>, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid bookings JSON: {}", e)))
}

fn parse_offers_json(json: &str) -> Result<Vec<Offer>, JsValue> {
    let inputs: Vec<OfferInput> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid offers JSON: {}", e)))?;
    Ok(inputs.into_iter().map(Offer::from).collect())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Generate bookable slots for a JSON slot request.
///
/// The request has the same shape the `slots` CLI reads: `timezone`,
/// `availability`, `duration_mins`, `window`, optional `bookings`, `offers`
/// and `options`. Returns the JSON response `{timezone, slots}`.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(request_json: &str) -> Result<String, JsValue> {
    let request = SlotRequest::from_json(request_json).map_err(js_error)?;
    let response = request.generate().map_err(js_error)?;
    response.to_json().map_err(js_error)
}

/// Check whether a slot starting at `slot_start` is clear of every booking
/// and every live offer.
///
/// # Arguments
/// - `slot_start` -- RFC 3339 datetime, or a naive local datetime
///   (e.g., "2024-11-03T01:00:00") read as wall-clock time in `timezone`
/// - `duration_mins` -- Slot length in minutes
/// - `bookings_json` / `offers_json` -- JSON arrays in the request format
/// - `timezone` -- IANA timezone for a naive `slot_start`; defaults to "UTC".
///   Ambiguous local times take the earlier instant.
#[wasm_bindgen(js_name = "isSlotFree")]
pub fn is_slot_free(
    slot_start: &str,
    duration_mins: u32,
    bookings_json: &str,
    offers_json: &str,
    timezone: Option<String>,
) -> Result<bool, JsValue> {
    let timezone = timezone.as_deref().unwrap_or("UTC");
    let start = parse_instant(slot_start, timezone).map_err(js_error)?;
    let bookings = parse_bookings_json(bookings_json)?;
    let offers = parse_offers_json(offers_json)?;

    slot_engine::is_slot_free(start, duration_mins, &bookings, &offers).map_err(js_error)
}
