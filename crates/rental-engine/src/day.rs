//! Calendar-day values and date helpers.
//!
//! Every date in the engine is a [`CalendarDay`]: one UTC calendar day with no
//! time-of-day and no timezone. Inputs arrive as ISO-like strings or instants
//! and are reduced to their `YYYY-MM-DD` portion by [`normalize_date`], so
//! "same day" comparisons are immune to timezone skew and DST transitions.
//!
//! When an instant is needed (display, interop) a day is anchored at
//! `12:00:00Z` via [`CalendarDay::canonical_instant`].
//!
//! # Functions
//!
//! - [`normalize_date`]: Reduce a date-like input to a [`CalendarDay`], or `None`
//! - [`parse_day`]: Strict variant of [`normalize_date`] for user input
//! - [`day_key`]: Human-diffable UTC string for a day
//! - [`total_days_in_range`]: Inclusive day count between two days
//! - [`days_between`]: Inclusive iterator over a range of days
//! - [`display_date_range`]: `MM/DD/YYYY - MM/DD/YYYY` range labels

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RentalError;

/// One UTC calendar day.
///
/// Ordered chronologically and cheap to copy, so it doubles as the key of an
/// [`AvailabilityMap`](crate::availability::AvailabilityMap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// Build a day from year, month and day-of-month. `None` if the date does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The current UTC calendar day.
    ///
    /// The engine never calls this itself; callers read the clock once and pass
    /// the result down as the "today" anchor.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// The instant `12:00:00Z` on this day.
    pub fn canonical_instant(self) -> DateTime<Utc> {
        let midnight = self.0.and_time(NaiveTime::default());
        Utc.from_utc_datetime(&(midnight + Duration::hours(12)))
    }

    /// A new day `n` calendar days later (earlier when `n` is negative).
    ///
    /// # Panics
    ///
    /// Panics if the result falls outside the representable calendar. Use
    /// [`checked_add_days`](Self::checked_add_days) for untrusted offsets.
    pub fn add_days(self, n: i64) -> Self {
        Self(self.0 + Duration::days(n))
    }

    /// Like [`add_days`](Self::add_days), but `None` on overflow.
    pub fn checked_add_days(self, n: i64) -> Option<Self> {
        self.0.checked_add_signed(Duration::try_days(n)?).map(Self)
    }

    /// Weekday slot with Sunday = 0 through Saturday = 6.
    pub fn weekday_index(self) -> usize {
        self.0.weekday().num_days_from_sunday() as usize
    }

    /// Signed number of days from `other` to `self`.
    pub fn days_since(self, other: CalendarDay) -> i64 {
        (self.0 - other.0).num_days()
    }

    /// `MM/DD/YYYY`.
    pub fn mdy_string(self) -> String {
        self.0.format("%m/%d/%Y").to_string()
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDay {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_day(s)
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.to_calendar_day()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar day '{raw}'")))
    }
}

// ── normalize_date ──────────────────────────────────────────────────────────

/// Anything that can be reduced to a [`CalendarDay`].
pub trait DateInput {
    /// The calendar day of this input's ISO representation, or `None` if it has none.
    fn to_calendar_day(&self) -> Option<CalendarDay>;
}

impl DateInput for str {
    fn to_calendar_day(&self) -> Option<CalendarDay> {
        let date_part = self.trim().split('T').next()?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .ok()
            .map(CalendarDay)
    }
}

impl DateInput for String {
    fn to_calendar_day(&self) -> Option<CalendarDay> {
        self.as_str().to_calendar_day()
    }
}

impl DateInput for NaiveDate {
    fn to_calendar_day(&self) -> Option<CalendarDay> {
        Some(CalendarDay(*self))
    }
}

impl DateInput for DateTime<Utc> {
    fn to_calendar_day(&self) -> Option<CalendarDay> {
        Some(CalendarDay(self.date_naive()))
    }
}

impl DateInput for CalendarDay {
    fn to_calendar_day(&self) -> Option<CalendarDay> {
        Some(*self)
    }
}

impl<T: DateInput + ?Sized> DateInput for &T {
    fn to_calendar_day(&self) -> Option<CalendarDay> {
        (**self).to_calendar_day()
    }
}

/// Reduce a date-like input to its UTC calendar day.
///
/// Absent input and input without a parseable `YYYY-MM-DD` prefix both yield
/// `None`; callers must check before doing arithmetic. Normalizing an already
/// normalized day returns it unchanged.
///
/// # Examples
///
/// ```
/// use rental_engine::day::{normalize_date, CalendarDay};
///
/// let day = normalize_date(Some("2024-06-01T23:30:00-05:00")).unwrap();
/// assert_eq!(day, CalendarDay::from_ymd(2024, 6, 1).unwrap());
/// assert_eq!(normalize_date(Some(day)), Some(day));
/// assert_eq!(normalize_date(None::<&str>), None);
/// ```
pub fn normalize_date<D: DateInput>(input: Option<D>) -> Option<CalendarDay> {
    input.and_then(|d| d.to_calendar_day())
}

/// Parse a user-supplied date, rejecting anything [`normalize_date`] would drop.
///
/// # Errors
///
/// Returns [`RentalError::InvalidDate`] if the string has no `YYYY-MM-DD` prefix.
pub fn parse_day(s: &str) -> Result<CalendarDay, RentalError> {
    s.to_calendar_day()
        .ok_or_else(|| RentalError::InvalidDate(format!("'{}': expected YYYY-MM-DD", s.trim())))
}

// ── Arithmetic ──────────────────────────────────────────────────────────────

/// UTC string of the day's canonical instant, e.g. `"Sat, 01 Jun 2024 12:00:00 GMT"`.
pub fn day_key(day: CalendarDay) -> String {
    day.canonical_instant()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Inclusive number of days covered by `start` and `end`, in either order.
pub fn total_days_in_range(start: CalendarDay, end: CalendarDay) -> i64 {
    end.days_since(start).abs() + 1
}

/// Iterate every day from `start` through `end` inclusive.
///
/// Yields nothing when `end` precedes `start`.
pub fn days_between(start: CalendarDay, end: CalendarDay) -> DayRange {
    DayRange {
        next: Some(start),
        end,
    }
}

/// Iterator returned by [`days_between`].
#[derive(Debug, Clone)]
pub struct DayRange {
    next: Option<CalendarDay>,
    end: CalendarDay,
}

impl Iterator for DayRange {
    type Item = CalendarDay;

    fn next(&mut self) -> Option<CalendarDay> {
        let current = self.next.filter(|day| *day <= self.end)?;
        self.next = current.0.succ_opt().map(CalendarDay);
        Some(current)
    }
}

// ── Display ─────────────────────────────────────────────────────────────────

/// Label a stay as `" MM/DD/YYYY<marker>"` or `" MM/DD/YYYY - MM/DD/YYYY<marker>"`.
///
/// The range form is used only when `end` is present and differs from `start`.
pub fn display_date_range(start: CalendarDay, end: Option<CalendarDay>, marker: &str) -> String {
    match end {
        Some(end) if end != start => {
            format!(" {} - {}{}", start.mdy_string(), end.mdy_string(), marker)
        }
        _ => format!(" {}{}", start.mdy_string(), marker),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
