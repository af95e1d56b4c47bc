//! # rental-engine
//!
//! Deterministic availability and pricing for rentable items.
//!
//! Given a reservable's inclusion windows, exclusion windows, weekday price
//! adjustments and minimum-stay rules, plus the reservations already taken,
//! the engine answers whether a date range can be booked, what each day costs
//! and how long the stay must be. Every function takes its "today" anchor
//! explicitly; nothing reads the clock or caches results.
//!
//! ## Modules
//!
//! - [`day`]: Calendar-day values, normalization and day arithmetic
//! - [`model`]: Reservables, reservations and their rules
//! - [`adjustment`]: Weekday rules → per-weekday price and minimum-stay tables
//! - [`availability`]: Per-day availability map of one reservable
//! - [`range`]: Quote a date range against a map, extending to the minimum stay
//! - [`batch`]: Quote one range across many reservables
//! - [`inventory`]: Sources of reservables and reservations
//! - [`quote`]: Checkout amounts and cancellation cost
//! - [`error`]: Error types

pub mod adjustment;
pub mod availability;
pub mod batch;
pub mod day;
pub mod error;
pub mod inventory;
pub mod model;
pub mod quote;
pub mod range;

pub use adjustment::{resolve_adjustments, resolve_min_days};
pub use availability::{
    build_availability_map, build_availability_maps, overwrites_day, AvailabilityMap, DayRate,
};
pub use batch::{evaluate_all_reservables, search_availability};
pub use day::{
    day_key, days_between, display_date_range, normalize_date, parse_day, total_days_in_range,
    CalendarDay, DateInput,
};
pub use error::RentalError;
pub use inventory::{Inventory, ReservableFilter, ReservableSource, ReservationSource};
pub use model::{
    CancellationCost, Deposit, ExclusionWindow, InclusionWindow, Reservable, Reservation,
    WeekdayRule,
};
pub use quote::{cancellation_cost, quote_reservation, DepositLine, ReservationQuote};
pub use range::{evaluate_range, evaluate_reservable_by_date, valid_end_date, AvailabilityResponse};
