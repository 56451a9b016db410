//! Mass-weighted mixing and scaling.
//!
//! `A + B` mixes two mass quantities: absolute nuclide masses add, and the
//! result is renormalized against `A.mass + B.mass`. `A * k` keeps the
//! composition and scales the mass, so `&a + &(&b * k)?` blends `k` mass units
//! of `b` into `a`. Scaling is fallible: a negative or non-finite `k` is an
//! [`MaterialError::InvalidComposition`] carrying the factor.

use std::ops::{Add, Mul};

use nm_core::canonical_bits;
use serde_json::Value;
use tracing::trace;

use crate::composition::Composition;
use crate::error::{MatResult, MaterialError};
use crate::material::{Material, UNSET};
use crate::metadata::MetadataHandle;

/// Right-hand operand for the dynamically checked arithmetic entry points.
#[derive(Debug, Clone)]
pub enum Operand {
    Material(Material),
    Scalar(f64),
}

impl Operand {
    fn kind(&self) -> &'static str {
        match self {
            Operand::Material(_) => "material",
            Operand::Scalar(_) => "scalar",
        }
    }
}

impl From<Material> for Operand {
    fn from(m: Material) -> Self {
        Operand::Material(m)
    }
}

impl From<f64> for Operand {
    fn from(k: f64) -> Self {
        Operand::Scalar(k)
    }
}

fn merged_metadata(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            let mut out = left.clone();
            for (key, value) in right {
                if !out.contains_key(key) {
                    out.insert(key.clone(), value.clone());
                }
            }
            Value::Object(out)
        }
        _ => a.clone(),
    }
}

fn mix(a: &Material, b: &Material) -> Material {
    let mut absolute = a.mult_by_mass();
    for (id, m) in b.mult_by_mass() {
        *absolute.entry(id).or_insert(0.0) += m;
    }
    let mass = a.mass + b.mass;
    let density = if canonical_bits(a.density) == canonical_bits(b.density) {
        a.density
    } else {
        UNSET
    };
    let metadata = a
        .metadata
        .with(|left| b.metadata.with(|right| merged_metadata(left, right)));
    trace!(mass, nuclides = absolute.len(), "mixed materials");

    Material {
        comp: Composition::from_absolute(absolute, mass),
        mass,
        density,
        atoms_per_molecule: UNSET,
        metadata: MetadataHandle::new(metadata),
    }
}

fn scale(m: &Material, k: f64) -> MatResult<Material> {
    if !k.is_finite() || k < 0.0 {
        return Err(MaterialError::invalid("scale factor", "scalar", k));
    }
    Ok(Material {
        comp: m.comp.clone(),
        mass: m.mass * k,
        density: m.density,
        atoms_per_molecule: m.atoms_per_molecule,
        metadata: m.metadata.deep_copy(),
    })
}

impl Material {
    /// `self + rhs` with a dynamically typed operand.
    ///
    /// A scalar operand fails with [`MaterialError::TypeMismatch`].
    pub fn try_add(&self, rhs: &Operand) -> MatResult<Material> {
        match rhs {
            Operand::Material(other) => Ok(mix(self, other)),
            other => Err(MaterialError::TypeMismatch {
                expected: "material",
                found: other.kind(),
            }),
        }
    }

    /// `self * rhs` with a dynamically typed operand.
    ///
    /// A material operand fails with [`MaterialError::TypeMismatch`]; a
    /// negative or non-finite scalar with [`MaterialError::InvalidComposition`].
    pub fn try_mul(&self, rhs: &Operand) -> MatResult<Material> {
        match rhs {
            Operand::Scalar(k) => scale(self, *k),
            other => Err(MaterialError::TypeMismatch {
                expected: "scalar",
                found: other.kind(),
            }),
        }
    }
}

impl Add<&Material> for &Material {
    type Output = Material;

    fn add(self, rhs: &Material) -> Material {
        mix(self, rhs)
    }
}

impl Add<Material> for Material {
    type Output = Material;

    fn add(self, rhs: Material) -> Material {
        mix(&self, &rhs)
    }
}

impl Add<&Material> for Material {
    type Output = Material;

    fn add(self, rhs: &Material) -> Material {
        mix(&self, rhs)
    }
}

impl Add<Material> for &Material {
    type Output = Material;

    fn add(self, rhs: Material) -> Material {
        mix(self, &rhs)
    }
}

/// Fails with [`MaterialError::InvalidComposition`] if `k` is negative or
/// non-finite.
impl Mul<f64> for &Material {
    type Output = MatResult<Material>;

    fn mul(self, k: f64) -> MatResult<Material> {
        scale(self, k)
    }
}

impl Mul<f64> for Material {
    type Output = MatResult<Material>;

    fn mul(self, k: f64) -> MatResult<Material> {
        scale(&self, k)
    }
}

impl Mul<&Material> for f64 {
    type Output = MatResult<Material>;

    fn mul(self, m: &Material) -> MatResult<Material> {
        scale(m, self)
    }
}

impl Mul<Material> for f64 {
    type Output = MatResult<Material>;

    fn mul(self, m: Material) -> MatResult<Material> {
        scale(&m, self)
    }
}
