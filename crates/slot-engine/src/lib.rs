//! # slot-engine
//!
//! Timezone-aware bookable slot generation for a booking marketplace.
//!
//! Given a provider's recurring weekly availability, a calendar-day window, a
//! meeting duration, and the provider's committed time (confirmed bookings and
//! pending offers), the engine computes every bookable slot. It reconciles the
//! weekly template against real calendar days in the provider's timezone,
//! handles DST transitions explicitly via `chrono-tz`, and compares
//! commitments recorded in any timezone in absolute time.
//!
//! The engine is pure: no I/O, no clock, no shared state.
//!
//! ## Modules
//!
//! - [`weekday`] - ISO weekday → template day label
//! - [`calendar`] - Calendar-day walk over a half-open date window
//! - [`slicer`] - Template windows → fixed-duration candidates
//! - [`conflict`] - Reject candidates overlapping bookings or live offers
//! - [`generator`] - The composed walk → slice → filter pipeline
//! - [`dst`] - DST gap policies for local wall-clock times
//! - [`timezone`] - IANA zone and timestamp parsing
//! - [`model`] - Input and output value types
//! - [`request`] - JSON request/response boundary
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use slot_engine::model::{AvailabilityRange, CalendarDate, DateWindow, TimeOfDay};
//! use slot_engine::weekday::DayOfWeek;
//! use slot_engine::generate_slots;
//!
//! let availability = [AvailabilityRange::new(
//!     DayOfWeek::Monday,
//!     TimeOfDay::new(9, 0),
//!     TimeOfDay::new(12, 0),
//! )];
//! let window = DateWindow::new(CalendarDate::new(2023, 5, 1), CalendarDate::new(2023, 5, 2));
//!
//! let slots = generate_slots(&availability, 60, &window, &[], &[], "America/New_York").unwrap();
//! assert_eq!(slots.len(), 3);
//! assert_eq!(slots[0].time, TimeOfDay::new(9, 0));
//! ```

pub mod calendar;
pub mod conflict;
pub mod dst;
pub mod error;
pub mod generator;
pub mod model;
pub mod request;
pub mod slicer;
pub mod timezone;
pub mod weekday;

pub use conflict::{is_slot_free, ConflictIndex, IndexKind};
pub use dst::DstPolicy;
pub use error::SlotError;
pub use generator::{generate_slots, generate_slots_with_options, GenerateOptions};
pub use model::{AvailabilityRange, Booking, CalendarDate, DateWindow, Offer, Slot, TimeOfDay};
pub use request::{SlotRequest, SlotResponse};
pub use weekday::{weekday_label, DayOfWeek};
