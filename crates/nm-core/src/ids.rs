use core::fmt;

use crate::error::{CoreError, CoreResult};

/// Canonical nuclide identifier in `ZZZAAASSSS` form.
///
/// - `Z` is the atomic number, `A` the mass number, `S` the excitation state
/// - `A == 0 && S == 0` denotes a whole element (a "family" of isotopes)
/// - ordering follows the raw integer, so an element sorts before its isotopes
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i64", into = "i64")
)]
pub struct NuclideId(i64);

impl NuclideId {
    pub const Z_FACTOR: i64 = 10_000_000;
    pub const A_FACTOR: i64 = 10_000;
    pub const MAX_Z: u32 = 118;
    pub const MAX_A: u32 = 999;
    pub const MAX_STATE: u32 = 9_999;

    /// Build an id from its atomic number, mass number and excitation state.
    pub fn new(z: u32, a: u32, state: u32) -> CoreResult<Self> {
        let raw = i64::from(z) * Self::Z_FACTOR + i64::from(a) * Self::A_FACTOR + i64::from(state);
        if z == 0 || z > Self::MAX_Z {
            return Err(CoreError::InvalidNuclideId {
                raw,
                reason: "atomic number out of range",
            });
        }
        if a > Self::MAX_A {
            return Err(CoreError::InvalidNuclideId {
                raw,
                reason: "mass number out of range",
            });
        }
        if state > Self::MAX_STATE {
            return Err(CoreError::InvalidNuclideId {
                raw,
                reason: "excitation state out of range",
            });
        }
        if a == 0 && state != 0 {
            return Err(CoreError::InvalidNuclideId {
                raw,
                reason: "element id cannot carry an excitation state",
            });
        }
        Ok(Self(raw))
    }

    /// Id of the element with atomic number `z`.
    pub fn element(z: u32) -> CoreResult<Self> {
        Self::new(z, 0, 0)
    }

    /// Validate a raw `ZZZAAASSSS` integer.
    pub fn from_raw(raw: i64) -> CoreResult<Self> {
        if raw <= 0 {
            return Err(CoreError::InvalidNuclideId {
                raw,
                reason: "id must be positive",
            });
        }
        let z = raw / Self::Z_FACTOR;
        let a = (raw / Self::A_FACTOR) % 1_000;
        let state = raw % Self::A_FACTOR;
        let z = u32::try_from(z).map_err(|_| CoreError::InvalidNuclideId {
            raw,
            reason: "atomic number out of range",
        })?;
        // a and state are bounded by the modulo above
        Self::new(z, a as u32, state as u32)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Atomic number.
    pub const fn z(self) -> u32 {
        (self.0 / Self::Z_FACTOR) as u32
    }

    /// Mass number (0 for an element id).
    pub const fn a(self) -> u32 {
        ((self.0 / Self::A_FACTOR) % 1_000) as u32
    }

    /// Excitation state (0 for the ground state).
    pub const fn state(self) -> u32 {
        (self.0 % Self::A_FACTOR) as u32
    }

    pub const fn is_element(self) -> bool {
        self.a() == 0 && self.state() == 0
    }

    /// Element id sharing this id's atomic number.
    pub const fn element_id(self) -> Self {
        Self(self.z() as i64 * Self::Z_FACTOR)
    }
}

impl TryFrom<i64> for NuclideId {
    type Error = CoreError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl From<NuclideId> for i64 {
    fn from(id: NuclideId) -> Self {
        id.0
    }
}

impl fmt::Debug for NuclideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NuclideId({})", self.0)
    }
}

impl fmt::Display for NuclideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
