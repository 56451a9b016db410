//! Nuclide data errors.

use nm_core::NuclideId;
use thiserror::Error;

/// Result type for nuclide data lookups.
pub type DataResult<T> = Result<T, DataError>;

/// Errors raised while resolving nuclide keys or looking up atomic data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Key could not be resolved to a canonical nuclide id.
    #[error("Unknown nuclide: {key}")]
    UnknownNuclide { key: String },

    /// No atomic mass is known for this id.
    #[error("No atomic mass available for nuclide {id}")]
    MissingAtomicMass { id: NuclideId },
}

impl DataError {
    pub(crate) fn unknown(key: impl ToString) -> Self {
        DataError::UnknownNuclide {
            key: key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DataError::unknown("Xx999");
        assert!(err.to_string().contains("Xx999"));

        let id = NuclideId::element(42).unwrap();
        let err = DataError::MissingAtomicMass { id };
        assert!(err.to_string().contains("420000000"));
    }
}
