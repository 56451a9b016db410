//! nm-data: nuclide identity and atomic data for nucmat.
//!
//! Provides:
//! - Element definitions (symbol, name, standard atomic weight)
//! - Isotope atomic masses and natural abundances
//! - Nuclide key forms (`NucKey`) and canonicalization
//! - `NuclideIdentity` / `AtomicData` traits consumed by the material engine
//! - A built-in provider backed by the compiled-in tables
//!
//! # Example
//!
//! ```
//! use nm_data::{AtomicData, NucKey, NuclideIdentity, builtin};
//!
//! let data = builtin();
//! let u235 = data.resolve(&NucKey::from("U-235")).unwrap();
//! assert_eq!(u235.raw(), 922_350_000);
//! assert!(data.atomic_mass(u235).unwrap() > 235.0);
//! ```

pub mod elements;
pub mod error;
pub mod isotopes;
pub mod nucname;
pub mod provider;

// Re-exports for ergonomics
pub use elements::ElementEntry;
pub use error::{DataError, DataResult};
pub use isotopes::IsotopeEntry;
pub use nucname::NucKey;
pub use provider::{AtomicData, BuiltinNuclides, NuclideData, NuclideIdentity, builtin};
