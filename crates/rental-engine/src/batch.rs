//! Evaluate one date range across many reservables.
//!
//! Each reservable gets its own map and its own evaluation; nothing is shared
//! between them, so results depend only on the inputs and come back in the
//! order the reservables were given.

use tracing::debug;

use crate::availability::build_availability_map;
use crate::day::{normalize_date, CalendarDay};
use crate::error::Result;
use crate::inventory::{ReservableFilter, ReservableSource, ReservationSource};
use crate::model::{Reservable, Reservation};
use crate::range::{evaluate_range, ordered_range, AvailabilityResponse};

/// Quote `[start, end]` for every reservable, enforcing minimum stays.
pub fn evaluate_all_reservables(
    start: CalendarDay,
    end: CalendarDay,
    reservables: &[Reservable],
    reservations: &[Reservation],
    today: CalendarDay,
) -> Vec<AvailabilityResponse> {
    reservables
        .iter()
        .map(|reservable| {
            let map = build_availability_map(reservable, reservations, today);
            evaluate_range(start, end, &map, reservable, true)
        })
        .collect()
}

/// Search the catalogue for `[start, end]` given raw request dates.
///
/// `filter` selects the reservables (normally [`ReservableFilter::active`]);
/// all reservations are considered. Returns `Ok(None)` when either date is
/// missing or unparseable, or the end precedes the start, in which case
/// callers list the catalogue without availability.
///
/// # Errors
///
/// Propagates failures from the sources.
pub fn search_availability<S>(
    start: Option<&str>,
    end: Option<&str>,
    source: &S,
    filter: &ReservableFilter,
    today: CalendarDay,
) -> Result<Option<Vec<AvailabilityResponse>>>
where
    S: ReservableSource + ReservationSource,
{
    let (Some(start), Some(end)) = (normalize_date(start), normalize_date(end)) else {
        return Ok(None);
    };
    let Some((start, end)) = ordered_range(start, end) else {
        return Ok(None);
    };
    let reservables = source.reservables(filter)?;
    let reservations = source.reservations(None)?;
    debug!(
        %start,
        %end,
        reservables = reservables.len(),
        reservations = reservations.len(),
        "searching availability"
    );
    Ok(Some(evaluate_all_reservables(
        start,
        end,
        &reservables,
        &reservations,
        today,
    )))
}
