//! Build the per-day availability map of a reservable.
//!
//! The map starts from the reservable's inclusion windows, then loses every
//! day covered by an exclusion window and finally every day covered by an
//! existing reservation. Precedence therefore runs reservation > exclusion >
//! inclusion, and among overlapping inclusion windows the one processed last
//! wins.
//!
//! Days before `today` are never offered: costed inclusion windows and all
//! exclusion windows are clamped to start no earlier than `today`.

use std::collections::btree_map::{self, BTreeMap};

use serde::Serialize;
use tracing::{debug, trace};

use crate::adjustment::{resolve_adjustments, resolve_min_days};
use crate::day::{days_between, CalendarDay};
use crate::model::{Reservable, Reservation};

/// Price and minimum stay for one bookable day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRate {
    pub cost: f64,
    pub min_days: u32,
}

/// Bookable days of one reservable, ordered by calendar day.
///
/// A day present in the map can be booked at its [`DayRate`]; an absent day
/// cannot. The map is derived on every query and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AvailabilityMap {
    days: BTreeMap<CalendarDay, DayRate>,
}

impl AvailabilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, day: CalendarDay) -> Option<&DayRate> {
        self.days.get(&day)
    }

    pub fn contains(&self, day: CalendarDay) -> bool {
        self.days.contains_key(&day)
    }

    pub fn insert(&mut self, day: CalendarDay, rate: DayRate) -> Option<DayRate> {
        self.days.insert(day, rate)
    }

    pub fn remove(&mut self, day: CalendarDay) -> Option<DayRate> {
        self.days.remove(&day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in ascending order.
    pub fn iter(&self) -> btree_map::Iter<'_, CalendarDay, DayRate> {
        self.days.iter()
    }

    pub fn first_day(&self) -> Option<CalendarDay> {
        self.days.keys().next().copied()
    }

    pub fn last_day(&self) -> Option<CalendarDay> {
        self.days.keys().next_back().copied()
    }

    /// Largest minimum stay over `[start, end]`, counting absent days as 1.
    pub fn min_days_for_range(&self, start: CalendarDay, end: CalendarDay) -> u32 {
        days_between(start, end)
            .map(|day| self.get(day).map_or(1, |rate| rate.min_days.max(1)))
            .fold(1, u32::max)
    }

    fn remove_range(&mut self, start: CalendarDay, end: CalendarDay) {
        for day in days_between(start, end) {
            self.days.remove(&day);
        }
    }
}

impl FromIterator<(CalendarDay, DayRate)> for AvailabilityMap {
    fn from_iter<I: IntoIterator<Item = (CalendarDay, DayRate)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AvailabilityMap {
    type Item = (&'a CalendarDay, &'a DayRate);
    type IntoIter = btree_map::Iter<'a, CalendarDay, DayRate>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

/// A base cost counts only when present and non-zero.
fn cost_is_set(cost: Option<f64>) -> Option<f64> {
    cost.filter(|c| *c != 0.0 && !c.is_nan())
}

/// Whether an inclusion window writes `day_cost` over whatever the map holds.
///
/// A day that already has a rate is always overwritten, so the last window
/// processed wins. A day without one is written only when the adjusted cost is
/// above -1, which keeps deeply discounted days out of the map.
pub fn overwrites_day(existing: Option<&DayRate>, day_cost: f64) -> bool {
    existing.is_some() || day_cost > -1.0
}

/// Compute the bookable days of `reservable` given all known `reservations`.
///
/// `today` is the floor for inclusion and exclusion windows. Reservations for
/// other reservables are ignored. Windows whose end precedes their start
/// contribute nothing.
pub fn build_availability_map(
    reservable: &Reservable,
    reservations: &[Reservation],
    today: CalendarDay,
) -> AvailabilityMap {
    let mut map = AvailabilityMap::new();
    let reservable_adjustments = resolve_adjustments(&reservable.price_adjustment);
    let reservable_min_days = resolve_min_days(&reservable.price_adjustment);

    for window in &reservable.availability_include {
        let Some(cost) = cost_is_set(window.cost) else {
            continue;
        };
        let mut start = window.start_date;
        if start < today {
            trace!(reservable = %reservable.id, from = %start, to = %today, "clamping inclusion window");
            start = today;
        }
        let window_adjustments = resolve_adjustments(&window.price_adjustment);
        let window_min_days = resolve_min_days(&window.price_adjustment);

        for day in days_between(start, window.end_date) {
            let wd = day.weekday_index();
            let adjustment = reservable_adjustments[wd] + window_adjustments[wd];
            let day_cost = cost + adjustment;
            if overwrites_day(map.get(day), day_cost) {
                map.insert(
                    day,
                    DayRate {
                        cost: day_cost,
                        min_days: reservable_min_days[wd].max(window_min_days[wd]),
                    },
                );
            }
        }
    }

    for window in &reservable.availability_exclude {
        map.remove_range(window.start_date.max(today), window.end_date);
    }

    for reservation in reservations.iter().filter(|r| r.is_for(&reservable.id)) {
        map.remove_range(reservation.start_date, reservation.last_day());
    }

    debug!(reservable = %reservable.id, days = map.len(), "built availability map");
    map
}

/// Build one map per reservable, in input order.
pub fn build_availability_maps<'a>(
    reservables: &'a [Reservable],
    reservations: &[Reservation],
    today: CalendarDay,
) -> Vec<(&'a Reservable, AvailabilityMap)> {
    reservables
        .iter()
        .map(|r| (r, build_availability_map(r, reservations, today)))
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────────────
