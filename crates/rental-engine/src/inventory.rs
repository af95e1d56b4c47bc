//! Where reservables and reservations come from.
//!
//! The engine does not own storage. Callers implement [`ReservableSource`] and
//! [`ReservationSource`] over whatever holds their records; [`Inventory`] is
//! the in-memory implementation, loadable from a JSON document:
//!
//! ```json
//! { "reservables": [ ... ], "reservations": [ ... ] }
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{RentalError, Result};
use crate::model::{Reservable, Reservation};

/// Which reservables to fetch.
#[derive(Debug, Clone, Default)]
pub struct ReservableFilter {
    /// Restrict to these ids. `None` fetches all.
    pub ids: Option<Vec<String>>,
    /// Return reservables with `is_active == false` too (staging/development use).
    pub include_inactive: bool,
}

impl ReservableFilter {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn matches(&self, reservable: &Reservable) -> bool {
        let id_ok = self
            .ids
            .as_ref()
            .is_none_or(|ids| ids.iter().any(|id| *id == reservable.id));
        id_ok && (reservable.is_active || self.include_inactive)
    }
}

/// Supplies reservables with their nested windows and rules.
pub trait ReservableSource {
    fn reservables(&self, filter: &ReservableFilter) -> Result<Vec<Reservable>>;

    /// A single reservable by id, `None` if missing or filtered out as inactive.
    fn reservable(&self, id: &str, include_inactive: bool) -> Result<Option<Reservable>> {
        let filter = ReservableFilter {
            ids: Some(vec![id.to_string()]),
            include_inactive,
        };
        Ok(self.reservables(&filter)?.into_iter().next())
    }
}

/// Supplies existing bookings.
pub trait ReservationSource {
    /// Reservations for the given reservables, or all of them when `None`.
    fn reservations(&self, reservable_ids: Option<&[String]>) -> Result<Vec<Reservation>>;
}

/// In-memory reservables and reservations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub reservables: Vec<Reservable>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

impl Inventory {
    pub fn new(reservables: Vec<Reservable>, reservations: Vec<Reservation>) -> Self {
        Self {
            reservables,
            reservations,
        }
    }

    /// Parse an inventory JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`RentalError::InvalidInventory`] if the document does not match
    /// the expected shape or contains an unparseable date.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RentalError::InvalidInventory(e.to_string()))
    }

    /// Like [`Inventory::from_json`], reading from any byte source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| RentalError::InvalidInventory(e.to_string()))
    }
}

impl ReservableSource for Inventory {
    fn reservables(&self, filter: &ReservableFilter) -> Result<Vec<Reservable>> {
        Ok(self
            .reservables
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}

impl ReservationSource for Inventory {
    fn reservations(&self, reservable_ids: Option<&[String]>) -> Result<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| {
                reservable_ids.is_none_or(|ids| {
                    r.reservable_id
                        .as_ref()
                        .is_some_and(|rid| ids.contains(rid))
                })
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = r#"{
        "reservables": [
            {"id": "pontoon", "name": "Pontoon"},
            {"id": "kayak", "name": "Kayak", "isActive": false}
        ],
        "reservations": [
            {"reservableId": "pontoon", "startDate": "2024-06-02"},
            {"reservableId": "kayak", "startDate": "2024-06-03", "endDate": "2024-06-04"},
            {"reservableId": null, "startDate": "2024-06-05"}
        ]
    }"#;

    #[test]
    fn test_active_filter_hides_inactive() {
        let inv = Inventory::from_json(INVENTORY).unwrap();
        let active = inv.reservables(&ReservableFilter::active()).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "pontoon");

        let all = inv
            .reservables(&ReservableFilter {
                ids: None,
                include_inactive: true,
            })
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_single_reservable_lookup() {
        let inv = Inventory::from_json(INVENTORY).unwrap();
        assert!(inv.reservable("pontoon", false).unwrap().is_some());
        assert!(inv.reservable("kayak", false).unwrap().is_none());
        assert!(inv.reservable("kayak", true).unwrap().is_some());
        assert!(inv.reservable("canoe", true).unwrap().is_none());
    }

    #[test]
    fn test_reservations_filtered_by_id() {
        let inv = Inventory::from_json(INVENTORY).unwrap();
        assert_eq!(inv.reservations(None).unwrap().len(), 3);
        let ids = vec!["kayak".to_string()];
        let kayak = inv.reservations(Some(&ids)).unwrap();
        assert_eq!(kayak.len(), 1);
        assert!(kayak[0].is_for("kayak"));
    }

    #[test]
    fn test_invalid_inventory_error() {
        let err = Inventory::from_json(r#"{"reservations": [{"startDate": "someday"}]}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid inventory"), "got: {err}");
    }

    #[test]
    fn test_from_reader() {
        let inv = Inventory::from_reader(INVENTORY.as_bytes()).unwrap();
        assert_eq!(inv.reservables.len(), 2);
    }
}
