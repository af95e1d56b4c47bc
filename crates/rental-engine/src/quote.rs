//! Turn an availability quote into checkout amounts.
//!
//! The payment provider takes one purchase unit for the reservation itself
//! (cost plus tax) and one per refundable deposit. [`quote_reservation`]
//! computes those amounts; capturing them is the caller's business.

use serde::Serialize;

use crate::error::{RentalError, Result};
use crate::range::AvailabilityResponse;

/// One refundable deposit line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositLine {
    /// `deposit-<name words joined by '-'>`, unique per reservable.
    pub reference_id: String,
    pub deposit_id: String,
    pub name: String,
    pub cost: f64,
}

/// Amounts to charge for a reservation, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationQuote {
    pub reservation_cost: f64,
    pub tax_cost: f64,
    pub deposit_cost: f64,
    pub total_cost: f64,
    pub deposits: Vec<DepositLine>,
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn deposit_reference(name: &str) -> String {
    format!("deposit-{}", name.split_whitespace().collect::<Vec<_>>().join("-"))
}

/// Checkout amounts for an available quote.
///
/// # Errors
///
/// Returns [`RentalError::Unavailable`] if the quoted range is not available
/// or covers no days.
pub fn quote_reservation(response: &AvailabilityResponse) -> Result<ReservationQuote> {
    if !response.is_avail || response.avail_dates.is_empty() {
        return Err(RentalError::Unavailable(format!(
            "'{}' from {} to {}",
            response.reservable.id, response.start_date, response.end_date
        )));
    }

    let reservation_cost = response.total_cost;
    let tax_cost = reservation_cost * response.reservable.tax.unwrap_or(0.0);

    let deposits: Vec<DepositLine> = response
        .reservable
        .deposit
        .iter()
        .filter_map(|deposit| {
            let cost = deposit.cost.filter(|c| *c != 0.0)?;
            Some(DepositLine {
                reference_id: deposit_reference(&deposit.name),
                deposit_id: deposit.id.clone(),
                name: deposit.name.clone(),
                cost: round_cents(cost),
            })
        })
        .collect();
    // Empty f64 sums are -0.0.
    let deposit_cost = deposits.iter().fold(0.0, |acc, d| acc + d.cost);

    Ok(ReservationQuote {
        reservation_cost: round_cents(reservation_cost),
        tax_cost: round_cents(tax_cost),
        deposit_cost: round_cents(deposit_cost),
        total_cost: round_cents(reservation_cost + tax_cost + deposit_cost),
        deposits,
    })
}

/// What cancelling would cost, or `None` if the reservable sets no policy.
///
/// The basis is `reservation_cost` when given, else the quote's total. Percent
/// policies store tenths of the basis per unit of `cost` and are rounded to
/// whole currency units; flat policies return `cost` as is.
pub fn cancellation_cost(
    response: &AvailabilityResponse,
    reservation_cost: Option<f64>,
) -> Option<f64> {
    let policy = response.reservable.cancellation_cost.as_ref()?;
    let cost = policy.cost.filter(|c| *c != 0.0)?;
    let basis = reservation_cost
        .filter(|c| *c != 0.0)
        .or(Some(response.total_cost).filter(|c| *c != 0.0))?;

    if policy.is_percent {
        Some((basis * (cost * 0.1)).round())
    } else {
        Some(cost)
    }
}
