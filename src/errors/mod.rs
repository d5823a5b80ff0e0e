pub mod internal;

pub use internal::InternalError;

use thiserror::Error;

/// User-facing error taxonomy for the scheduler
///
/// Every variant displays as the exact line printed at the command boundary.
/// `Internal` wraps store/infrastructure failures; the CLI replaces its
/// message with a per-command failure line and logs the source.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Malformed command arity or argument types
    #[error("Please try again!")]
    InvalidArgument,

    /// Date literal did not parse as YYYY-MM-DD
    #[error("Please enter a valid date!")]
    InvalidDate,

    /// Operation requires some authenticated account
    #[error("Please login first.")]
    LoginRequired,

    /// Login attempted while a session is active
    #[error("User already logged in.")]
    AlreadyLoggedIn,

    /// Operation requires the patient role
    #[error("Please login as a patient!")]
    PatientRequired,

    /// Operation requires the caregiver role
    #[error("Please login as a caregiver first!")]
    CaregiverRequired,

    /// No caregiver published an available slot for the requested date
    #[error("No Caregiver is available!")]
    NoCaregiverAvailable,

    /// The named vaccine was never created via add_doses
    #[error("No such vaccine exists!")]
    UnknownVaccine,

    /// The vaccine exists but its dose count is zero
    #[error("Not enough available doses!")]
    OutOfStock,

    /// A referenced entity is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Username already taken within the role's namespace
    #[error("Username taken, try again!")]
    DuplicateUsername,

    /// Unknown username or wrong password; indistinguishable by design
    #[error("Login failed.")]
    InvalidCredentials,

    #[error(transparent)]
    Internal(#[from] InternalError),
}
