//! Collaborator traits and the built-in provider.
//!
//! The material engine only talks to these traits, so callers can swap in
//! their own name tables or evaluated nuclear data without touching it.

use nm_core::NuclideId;

use crate::error::{DataError, DataResult};
use crate::nucname::{self, NucKey};
use crate::{elements, isotopes};

/// Resolves caller key forms to canonical ids.
pub trait NuclideIdentity {
    /// Element keys resolve to the element id, which sorts before every
    /// isotope of that element.
    fn resolve(&self, key: &NucKey) -> DataResult<NuclideId>;

    fn name(&self, id: NuclideId) -> String {
        id.to_string()
    }
}

/// Atomic masses and natural isotopics.
pub trait AtomicData {
    /// Atomic mass [amu, g/mol].
    fn atomic_mass(&self, id: NuclideId) -> DataResult<f64>;

    /// Natural atom abundances for element `z` (empty if unknown).
    fn natural_abundances(&self, _z: u32) -> Vec<(NuclideId, f64)> {
        Vec::new()
    }
}

/// Both collaborators behind one object.
pub trait NuclideData: NuclideIdentity + AtomicData {}

impl<T: NuclideIdentity + AtomicData + ?Sized> NuclideData for T {}

/// Provider backed by the compiled-in element and isotope tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuiltinNuclides;

impl NuclideIdentity for BuiltinNuclides {
    fn resolve(&self, key: &NucKey) -> DataResult<NuclideId> {
        nucname::id(key)
    }

    fn name(&self, id: NuclideId) -> String {
        nucname::name(id)
    }
}

impl AtomicData for BuiltinNuclides {
    /// Isotope table first, then the element's standard weight for element ids,
    /// then the mass number as an approximation.
    fn atomic_mass(&self, id: NuclideId) -> DataResult<f64> {
        if let Some(entry) = isotopes::lookup(id) {
            return Ok(entry.mass);
        }
        if id.is_element() {
            return elements::by_z(id.z())
                .map(|e| e.weight)
                .ok_or(DataError::MissingAtomicMass { id });
        }
        Ok(f64::from(id.a()))
    }

    fn natural_abundances(&self, z: u32) -> Vec<(NuclideId, f64)> {
        isotopes::natural(z).map(|e| (e.id(), e.abundance)).collect()
    }
}

static BUILTIN: BuiltinNuclides = BuiltinNuclides;

/// Process-wide built-in provider.
pub fn builtin() -> &'static BuiltinNuclides {
    &BUILTIN
}
