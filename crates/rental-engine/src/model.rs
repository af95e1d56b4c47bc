//! Reservables, reservations and the rules attached to them.
//!
//! These are the shapes the inventory collaborators hand to the engine. JSON
//! field names are camelCase to match the records the booking site stores.

use serde::{Deserialize, Serialize};

use crate::day::CalendarDay;

/// A per-weekday price delta and/or minimum-stay floor.
///
/// The rule applies to every weekday whose flag is set. Adjustments from
/// several rules on the same weekday add up; `min_days` take the maximum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayRule {
    #[serde(default)]
    pub sun: bool,
    #[serde(default)]
    pub mon: bool,
    #[serde(default)]
    pub tue: bool,
    #[serde(default)]
    pub wed: bool,
    #[serde(default)]
    pub thu: bool,
    #[serde(default)]
    pub fri: bool,
    #[serde(default)]
    pub sat: bool,
    #[serde(default)]
    pub adjustment: Option<f64>,
    #[serde(default)]
    pub min_days: Option<u32>,
}

impl WeekdayRule {
    /// Weekday flags indexed Sunday = 0 through Saturday = 6.
    pub fn weekdays(&self) -> [bool; 7] {
        [
            self.sun, self.mon, self.tue, self.wed, self.thu, self.fri, self.sat,
        ]
    }
}

/// A date range in which a reservable is bookable at a base nightly cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionWindow {
    pub start_date: CalendarDay,
    pub end_date: CalendarDay,
    /// Base nightly cost. A missing or zero cost makes the window contribute nothing.
    #[serde(default)]
    pub cost: Option<f64>,
    /// Weekday rules layered on top of the reservable-wide ones.
    #[serde(default)]
    pub price_adjustment: Vec<WeekdayRule>,
}

/// A date range removed from availability, e.g. a maintenance block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionWindow {
    pub start_date: CalendarDay,
    pub end_date: CalendarDay,
}

/// A refundable deposit collected with each reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cost: Option<f64>,
}

/// What a guest pays to cancel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationCost {
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub is_percent: bool,
}

fn default_active() -> bool {
    true
}

/// A rentable item with its pricing and availability rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservable {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Sales-tax rate applied to the reservation cost at checkout (e.g. `0.055`).
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub price_adjustment: Vec<WeekdayRule>,
    #[serde(default)]
    pub availability_include: Vec<InclusionWindow>,
    #[serde(default)]
    pub availability_exclude: Vec<ExclusionWindow>,
    #[serde(default)]
    pub deposit: Vec<Deposit>,
    #[serde(default)]
    pub cancellation_cost: Option<CancellationCost>,
}

impl Reservable {
    /// A bare reservable with no rules attached.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_active: true,
            tax: None,
            price_adjustment: Vec::new(),
            availability_include: Vec::new(),
            availability_exclude: Vec::new(),
            deposit: Vec::new(),
            cancellation_cost: None,
        }
    }
}

/// An existing booking. A missing end date books the start day only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(default)]
    pub reservable_id: Option<String>,
    pub start_date: CalendarDay,
    #[serde(default)]
    pub end_date: Option<CalendarDay>,
}

impl Reservation {
    /// Last blocked day (inclusive).
    pub fn last_day(&self) -> CalendarDay {
        self.end_date.unwrap_or(self.start_date)
    }

    pub fn is_for(&self, reservable_id: &str) -> bool {
        self.reservable_id.as_deref() == Some(reservable_id)
    }
}
