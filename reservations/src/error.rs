//! Domain errors.
//!
//! Every failure in the reservation model is recoverable and returned as a
//! value. The HTTP layer maps each variant to a status code.

use thiserror::Error;

/// Errors raised by reservation, table and booking operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// A required field is missing or invalid
    #[error("{field}: {message}")]
    Validation {
        /// Offending field, as named on the wire
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Lookup by id or search term found nothing
    #[error("{resource} '{id}' not found")]
    NotFound {
        /// Kind of entity looked up
        resource: String,
        /// Identifier or term used
        id: String,
    },

    /// The operation is not allowed in the entity's current state
    #[error("{0}")]
    InvalidState(String),

    /// A cancellation search matched more than one reservation
    #[error("'{term}' matches {matches} reservations; search by reservation id instead")]
    Ambiguous {
        /// Search term as given
        term: String,
        /// How many reservations matched
        matches: usize,
    },

    /// Admin password missing or wrong
    #[error("invalid admin password")]
    Unauthorized,
}

impl ReservationError {
    /// Shorthand for [`ReservationError::Validation`]
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for [`ReservationError::NotFound`]
    #[must_use]
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Ambiguous { .. } => "AMBIGUOUS_MATCH",
            Self::Unauthorized => "UNAUTHORIZED",
        }
    }
}
