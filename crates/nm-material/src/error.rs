//! Material engine errors.

use nm_core::{CoreError, NuclideId};
use nm_data::DataError;
use thiserror::Error;

/// Result type for material operations.
pub type MatResult<T> = Result<T, MaterialError>;

/// Errors raised by material operations.
///
/// Every failing operation leaves the material untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// Key could not be resolved to a nuclide id.
    #[error("Unknown nuclide: {key}")]
    UnknownNuclide { key: String },

    /// Negative or non-finite weight, zero total, or similar.
    #[error("Invalid composition: {what} for {subject} (value = {value})")]
    InvalidComposition {
        what: &'static str,
        subject: String,
        value: f64,
    },

    /// Operand or metadata node of the wrong kind.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Atomic data has no mass for this nuclide.
    #[error("No atomic mass available for nuclide {id}")]
    MissingAtomicMass { id: NuclideId },
}

impl MaterialError {
    pub(crate) fn invalid(what: &'static str, subject: impl ToString, value: f64) -> Self {
        MaterialError::InvalidComposition {
            what,
            subject: subject.to_string(),
            value,
        }
    }
}

impl From<DataError> for MaterialError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::UnknownNuclide { key } => MaterialError::UnknownNuclide { key },
            DataError::MissingAtomicMass { id } => MaterialError::MissingAtomicMass { id },
        }
    }
}

impl From<CoreError> for MaterialError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NonFinite { what, value } => MaterialError::InvalidComposition {
                what: "non-finite value",
                subject: what.to_string(),
                value,
            },
            CoreError::Negative { what, value } => MaterialError::InvalidComposition {
                what: "negative value",
                subject: what.to_string(),
                value,
            },
            CoreError::InvalidNuclideId { raw, .. } => MaterialError::UnknownNuclide {
                key: raw.to_string(),
            },
        }
    }
}
