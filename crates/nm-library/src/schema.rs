//! Material library schema definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Library {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub materials: Vec<MaterialDef>,
}

/// One named material. Later entries may refer to earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: MaterialKind,
    /// Total mass; defaults to the weight total or the formula mass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    /// Density [g/cm³].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atoms_per_molecule: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MaterialKind {
    /// Raw mass weights keyed by nuclide name or id.
    Mass { weights: BTreeMap<String, f64> },
    /// Atom counts of nuclides and earlier materials.
    Atoms { atoms: Vec<AtomTermDef> },
    /// Scaled sum of earlier materials.
    Blend { parts: Vec<BlendPartDef> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum AtomTermDef {
    Nuclide { key: String, count: f64 },
    Material { id: String, count: f64 },
}

impl AtomTermDef {
    pub fn count(&self) -> f64 {
        match self {
            AtomTermDef::Nuclide { count, .. } | AtomTermDef::Material { count, .. } => *count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlendPartDef {
    pub material: String,
    /// Mass multiplier applied to the referenced material.
    pub scale: f64,
}
