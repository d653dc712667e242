//! Serde boundary for callers that speak JSON (the CLI, the WASM bridge).

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::generator::{generate_slots_with_options, GenerateOptions};
use crate::model::{AvailabilityRange, Booking, DateWindow, Offer, Slot};

/// Everything needed for one slot query, as fetched by the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRequest {
    /// The provider's IANA timezone.
    pub timezone: String,
    #[serde(default)]
    pub availability: Vec<AvailabilityRange>,
    pub duration_mins: u32,
    pub window: DateWindow,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub options: GenerateOptions,
}

/// The generated slots, with the timezone they are expressed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResponse {
    pub timezone: String,
    pub slots: Vec<Slot>,
}

impl SlotRequest {
    /// Parse a request from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run the generator over this request.
    pub fn generate(&self) -> Result<SlotResponse> {
        let slots = generate_slots_with_options(
            &self.availability,
            self.duration_mins,
            &self.window,
            &self.bookings,
            &self.offers,
            &self.timezone,
            &self.options,
        )?;
        Ok(SlotResponse {
            timezone: self.timezone.clone(),
            slots,
        })
    }
}

impl SlotResponse {
    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
