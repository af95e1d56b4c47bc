//! Quote a requested date range against an availability map.
//!
//! [`evaluate_range`] walks each day of the request, collecting bookable days
//! with their costs and unbookable days separately. When minimum stays are
//! checked, a request shorter than the largest minimum stay it touches is
//! extended forward to that length before the walk; callers are expected to
//! show the adjusted end date back to the guest.

use serde::Serialize;
use tracing::{debug, warn};

use crate::availability::{build_availability_map, AvailabilityMap};
use crate::day::{days_between, normalize_date, total_days_in_range, CalendarDay};
use crate::model::{Reservable, Reservation};

/// The answer to "can I book this reservable from start to end".
///
/// Serializes flat: the reservable's own fields sit next to the availability
/// fields, the way listing pages consume it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[serde(flatten)]
    pub reservable: Reservable,
    pub is_avail: bool,
    pub avail_dates: Vec<CalendarDay>,
    /// Set only when the range is unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavail_dates: Option<Vec<CalendarDay>>,
    /// Per-day costs, set only when the range is available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costs: Option<Vec<f64>>,
    pub min_days: u32,
    /// The requested start.
    pub start_date: CalendarDay,
    /// The end actually quoted, possibly extended to satisfy the minimum stay.
    pub end_date: CalendarDay,
    pub total_cost: f64,
}

impl AvailabilityResponse {
    /// Number of days quoted.
    pub fn total_days(&self) -> i64 {
        total_days_in_range(self.start_date, self.end_date)
    }
}

/// End date that satisfies `min_days` for a stay starting at `start`.
///
/// Returns `start + (min_days - 1)` when `[start, end]` is shorter than
/// `min_days`, and `end` unchanged otherwise. Never shortens a request. An
/// extension past the last representable day leaves `end` unchanged.
pub fn valid_end_date(min_days: u32, start: CalendarDay, end: CalendarDay) -> CalendarDay {
    if min_days <= 1 || total_days_in_range(start, end) >= i64::from(min_days) {
        return end;
    }
    match start.checked_add_days(i64::from(min_days) - 1) {
        Some(extended) => extended,
        None => {
            warn!(%start, min_days, "minimum stay runs past the calendar, not extending");
            end
        }
    }
}

/// The request as an ordered pair, or `None` when the end precedes the start.
pub(crate) fn ordered_range(
    start: CalendarDay,
    end: CalendarDay,
) -> Option<(CalendarDay, CalendarDay)> {
    if end < start {
        debug!(%start, %end, "declining reversed range");
        return None;
    }
    Some((start, end))
}

/// Evaluate `[start, end]` against a prebuilt map.
///
/// With `check_min_days` the range may be extended (see [`valid_end_date`]);
/// without it `min_days` is reported as 1 and the range is taken as given.
pub fn evaluate_range(
    start: CalendarDay,
    end: CalendarDay,
    map: &AvailabilityMap,
    reservable: &Reservable,
    check_min_days: bool,
) -> AvailabilityResponse {
    let mut end = end;
    let mut min_days = 1;
    if check_min_days {
        min_days = map.min_days_for_range(start, end);
        end = valid_end_date(min_days, start, end);
    }

    let mut avail_dates = Vec::new();
    let mut unavail_dates = Vec::new();
    let mut costs = Vec::new();
    let mut total_cost = 0.0;
    for day in days_between(start, end) {
        match map.get(day) {
            Some(rate) => {
                avail_dates.push(day);
                costs.push(rate.cost);
                total_cost += rate.cost;
            }
            None => unavail_dates.push(day),
        }
    }

    let is_avail = unavail_dates.is_empty();
    debug!(
        reservable = %reservable.id,
        %start,
        %end,
        is_avail,
        total_cost,
        "evaluated range"
    );

    AvailabilityResponse {
        reservable: reservable.clone(),
        is_avail,
        avail_dates,
        unavail_dates: (!is_avail).then_some(unavail_dates),
        costs: is_avail.then_some(costs),
        min_days,
        start_date: start,
        end_date: end,
        total_cost,
    }
}

/// Evaluate a single reservable from raw request dates.
///
/// `end` defaults to `start`. Returns `None` when either bound does not
/// normalize to a calendar day or the end precedes the start; no response is
/// fabricated in that case.
pub fn evaluate_reservable_by_date(
    start: Option<&str>,
    end: Option<&str>,
    reservable: &Reservable,
    reservations: &[Reservation],
    today: CalendarDay,
    check_min_days: bool,
) -> Option<AvailabilityResponse> {
    let start = normalize_date(start)?;
    let end = match end {
        Some(raw) if !raw.trim().is_empty() => normalize_date(Some(raw))?,
        _ => start,
    };
    let (start, end) = ordered_range(start, end)?;
    let map = build_availability_map(reservable, reservations, today);
    Some(evaluate_range(start, end, &map, reservable, check_min_days))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::DayRate;
    use crate::model::{InclusionWindow, WeekdayRule};

    fn day(y: i32, m: u32, d: u32) -> CalendarDay {
        CalendarDay::from_ymd(y, m, d).unwrap()
    }

    fn flat_map(days: &[(CalendarDay, f64, u32)]) -> AvailabilityMap {
        days.iter()
            .map(|&(d, cost, min_days)| (d, DayRate { cost, min_days }))
            .collect()
    }

    fn june_1_to_3(min_days: u32) -> AvailabilityMap {
        flat_map(&[
            (day(2024, 6, 1), 100.0, min_days),
            (day(2024, 6, 2), 100.0, min_days),
            (day(2024, 6, 3), 100.0, min_days),
        ])
    }

    fn boat() -> Reservable {
        Reservable::new("pontoon", "Pontoon")
    }

    // ── evaluate_range tests ────────────────────────────────────────────

    #[test]
    fn test_fully_available_range() {
        let map = june_1_to_3(1);
        let resp = evaluate_range(day(2024, 6, 1), day(2024, 6, 3), &map, &boat(), true);
        assert!(resp.is_avail);
        assert_eq!(resp.total_cost, 300.0);
        assert_eq!(resp.avail_dates, vec![day(2024, 6, 1), day(2024, 6, 2), day(2024, 6, 3)]);
        assert_eq!(resp.costs, Some(vec![100.0, 100.0, 100.0]));
        assert_eq!(resp.unavail_dates, None);
        assert_eq!(resp.min_days, 1);
    }

    #[test]
    fn test_partially_blocked_range() {
        let mut map = june_1_to_3(1);
        map.remove(day(2024, 6, 2));
        let resp = evaluate_range(day(2024, 6, 1), day(2024, 6, 3), &map, &boat(), true);
        assert!(!resp.is_avail);
        assert_eq!(resp.unavail_dates, Some(vec![day(2024, 6, 2)]));
        assert_eq!(resp.costs, None);
        assert_eq!(resp.avail_dates, vec![day(2024, 6, 1), day(2024, 6, 3)]);
    }

    #[test]
    fn test_short_request_extended_to_min_days() {
        let map = june_1_to_3(3);
        let resp = evaluate_range(day(2024, 6, 1), day(2024, 6, 1), &map, &boat(), true);
        assert_eq!(resp.end_date, day(2024, 6, 3));
        assert_eq!(resp.start_date, day(2024, 6, 1));
        assert_eq!(resp.avail_dates.len(), 3);
        assert_eq!(resp.min_days, 3);
        assert_eq!(resp.total_days(), 3);
    }

    #[test]
    fn test_extension_can_run_into_unavailable_days() {
        let map = flat_map(&[(day(2024, 6, 1), 100.0, 3), (day(2024, 6, 2), 100.0, 1)]);
        let resp = evaluate_range(day(2024, 6, 1), day(2024, 6, 1), &map, &boat(), true);
        assert!(!resp.is_avail);
        assert_eq!(resp.unavail_dates, Some(vec![day(2024, 6, 3)]));
    }

    #[test]
    fn test_long_request_is_never_shortened() {
        let map = june_1_to_3(2);
        let resp = evaluate_range(day(2024, 6, 1), day(2024, 6, 3), &map, &boat(), true);
        assert_eq!(resp.end_date, day(2024, 6, 3));
        assert_eq!(resp.min_days, 2);
    }

    #[test]
    fn test_min_days_ignored_when_not_checked() {
        let map = june_1_to_3(3);
        let resp = evaluate_range(day(2024, 6, 1), day(2024, 6, 1), &map, &boat(), false);
        assert_eq!(resp.end_date, day(2024, 6, 1));
        assert_eq!(resp.min_days, 1);
        assert_eq!(resp.total_cost, 100.0);
    }

    #[test]
    fn test_empty_map_is_unavailable() {
        let resp = evaluate_range(
            day(2024, 6, 1),
            day(2024, 6, 2),
            &AvailabilityMap::new(),
            &boat(),
            true,
        );
        assert!(!resp.is_avail);
        assert_eq!(resp.unavail_dates.unwrap().len(), 2);
        assert_eq!(resp.total_cost, 0.0);
    }

    #[test]
    fn test_valid_end_date() {
        let start = day(2024, 6, 1);
        assert_eq!(valid_end_date(1, start, start), start);
        assert_eq!(valid_end_date(4, start, start), day(2024, 6, 4));
        assert_eq!(valid_end_date(2, start, day(2024, 6, 5)), day(2024, 6, 5));
    }

    #[test]
    fn test_valid_end_date_past_calendar_keeps_end() {
        let start = day(2024, 6, 1);
        assert_eq!(valid_end_date(u32::MAX, start, start), start);
        assert_eq!(valid_end_date(u32::MAX, start, day(2024, 6, 3)), day(2024, 6, 3));
    }

    #[test]
    fn test_response_serializes_flat() {
        let resp = evaluate_range(day(2024, 6, 1), day(2024, 6, 1), &june_1_to_3(1), &boat(), true);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["id"], "pontoon");
        assert_eq!(json["isAvail"], true);
        assert_eq!(json["availDates"][0], "2024-06-01");
        assert!(json.get("unavailDates").is_none());
    }

    // ── evaluate_reservable_by_date tests ───────────────────────────────

    fn bookable_boat() -> Reservable {
        let mut r = boat();
        r.availability_include = vec![InclusionWindow {
            start_date: day(2024, 6, 1),
            end_date: day(2024, 6, 30),
            cost: Some(150.0),
            price_adjustment: Vec::new(),
        }];
        r
    }

    #[test]
    fn test_by_date_end_defaults_to_start() {
        let resp = evaluate_reservable_by_date(
            Some("2024-06-10"),
            None,
            &bookable_boat(),
            &[],
            day(2024, 6, 1),
            true,
        )
        .unwrap();
        assert_eq!(resp.end_date, day(2024, 6, 10));
        assert_eq!(resp.total_cost, 150.0);
    }

    #[test]
    fn test_by_date_declines_invalid_bounds() {
        let r = bookable_boat();
        let today = day(2024, 6, 1);
        assert!(evaluate_reservable_by_date(None, Some("2024-06-10"), &r, &[], today, true).is_none());
        assert!(evaluate_reservable_by_date(Some("nope"), None, &r, &[], today, true).is_none());
        assert!(
            evaluate_reservable_by_date(Some("2024-06-10"), Some("later"), &r, &[], today, true)
                .is_none()
        );
    }

    #[test]
    fn test_by_date_huge_min_stay_does_not_panic() {
        let mut r = bookable_boat();
        r.price_adjustment = vec![WeekdayRule {
            mon: true,
            tue: true,
            wed: true,
            thu: true,
            fri: true,
            sat: true,
            sun: true,
            min_days: Some(u32::MAX),
            ..WeekdayRule::default()
        }];
        let resp =
            evaluate_reservable_by_date(Some("2024-06-05"), None, &r, &[], day(2024, 6, 1), true)
                .unwrap();
        assert_eq!(resp.min_days, u32::MAX);
        assert_eq!(resp.end_date, day(2024, 6, 5));
        assert!(resp.is_avail);
    }

    #[test]
    fn test_by_date_declines_reversed_range() {
        let r = bookable_boat();
        let today = day(2024, 6, 1);
        assert!(
            evaluate_reservable_by_date(Some("2024-06-05"), Some("2024-06-01"), &r, &[], today, true)
                .is_none()
        );
        assert!(
            evaluate_reservable_by_date(Some("2024-06-05"), Some("2024-06-05"), &r, &[], today, true)
                .is_some()
        );
    }

    #[test]
    fn test_by_date_respects_reservations() {
        let reservations = vec![Reservation {
            reservable_id: Some("pontoon".to_string()),
            start_date: day(2024, 6, 11),
            end_date: None,
        }];
        let resp = evaluate_reservable_by_date(
            Some("2024-06-10T00:00:00.000Z"),
            Some("2024-06-12"),
            &bookable_boat(),
            &reservations,
            day(2024, 6, 1),
            true,
        )
        .unwrap();
        assert!(!resp.is_avail);
        assert_eq!(resp.unavail_dates, Some(vec![day(2024, 6, 11)]));
    }
}
