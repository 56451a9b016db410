//! Plain-data form of a material for serialization.

use std::collections::BTreeMap;

use nm_core::{NuclideId, ensure_finite, ensure_non_negative};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::composition::Composition;
use crate::error::{MatResult, MaterialError};
use crate::material::{Material, UNSET};
use crate::metadata::MetadataHandle;

fn unset() -> f64 {
    UNSET
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// The full material tuple as owned values.
///
/// The composition is stored exactly as held by the material, without
/// renormalization, so a record round-trips bit for bit. Unlike [`Material`]
/// a record is `Send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialRecord {
    pub comp: BTreeMap<NuclideId, f64>,
    pub mass: f64,
    #[serde(default = "unset")]
    pub density: f64,
    #[serde(default = "unset")]
    pub atoms_per_molecule: f64,
    #[serde(default = "empty_object")]
    pub metadata: Value,
}

impl From<&Material> for MaterialRecord {
    fn from(m: &Material) -> Self {
        Self {
            comp: m.comp.as_map().clone(),
            mass: m.mass,
            density: m.density,
            atoms_per_molecule: m.atoms_per_molecule,
            metadata: m.metadata.snapshot(),
        }
    }
}

impl From<Material> for MaterialRecord {
    fn from(m: Material) -> Self {
        Self::from(&m)
    }
}

impl TryFrom<MaterialRecord> for Material {
    type Error = MaterialError;

    fn try_from(record: MaterialRecord) -> MatResult<Self> {
        for (id, frac) in &record.comp {
            if !frac.is_finite() || *frac < 0.0 {
                return Err(MaterialError::invalid("stored fraction", id, *frac));
            }
        }
        Ok(Material {
            comp: Composition::from_raw(record.comp),
            mass: ensure_non_negative(record.mass, "mass")?,
            density: ensure_finite(record.density, "density")?,
            atoms_per_molecule: ensure_finite(record.atoms_per_molecule, "atoms_per_molecule")?,
            metadata: MetadataHandle::new(record.metadata),
        })
    }
}
