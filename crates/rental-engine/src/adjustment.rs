//! Resolve weekday rules into fixed per-weekday tables.
//!
//! Both tables are indexed Sunday = 0 through Saturday = 6, matching
//! [`CalendarDay::weekday_index`](crate::day::CalendarDay::weekday_index).

use crate::model::WeekdayRule;

/// Additive price delta per weekday.
///
/// Starts at zero; every rule with a non-zero adjustment adds it to each
/// weekday it flags. Rule order does not matter.
pub fn resolve_adjustments(rules: &[WeekdayRule]) -> [f64; 7] {
    let mut adjustments = [0.0; 7];
    for rule in rules {
        let Some(adjustment) = rule.adjustment.filter(|a| *a != 0.0) else {
            continue;
        };
        for (slot, flagged) in adjustments.iter_mut().zip(rule.weekdays()) {
            if flagged {
                *slot += adjustment;
            }
        }
    }
    adjustments
}

/// Minimum stay in days per weekday.
///
/// Starts at one; every rule with a non-zero `min_days` raises each weekday it
/// flags to at least that value. Floors do not add up.
pub fn resolve_min_days(rules: &[WeekdayRule]) -> [u32; 7] {
    let mut min_days = [1; 7];
    for rule in rules {
        let Some(floor) = rule.min_days.filter(|m| *m != 0) else {
            continue;
        };
        for (slot, flagged) in min_days.iter_mut().zip(rule.weekdays()) {
            if flagged {
                *slot = (*slot).max(floor);
            }
        }
    }
    min_days
}
