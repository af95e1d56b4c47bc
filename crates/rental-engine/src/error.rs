//! Error types for rental-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RentalError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid inventory: {0}")]
    InvalidInventory(String),

    #[error("Reservable not found: {0}")]
    ReservableNotFound(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, RentalError>;
