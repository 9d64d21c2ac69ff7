pub mod admin;
pub mod catalog;
pub mod notify;
pub mod repository;
pub mod reservation;
pub mod slots;

pub use reservation::ReservationStatus;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFoundError(String),
    #[error("{reason}")]
    AdmissionError { reason: String, available_spots: i32 },
    #[error("Unauthorized: {0}")]
    AuthError(String),
    #[error("Storage failure: {0}")]
    PersistenceError(String),
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
