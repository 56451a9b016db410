//! Build library definitions into materials.

use std::collections::BTreeMap;

use nm_material::{AtomEntry, Material};
use serde_json::Value;
use tracing::{debug, info};

use crate::schema::{AtomTermDef, Library, MaterialDef, MaterialKind};
use crate::validate::validate_library;
use crate::{LibraryError, LibraryResult};

/// Materials of a validated library, keyed by id.
pub fn build_library(library: &Library) -> LibraryResult<BTreeMap<String, Material>> {
    validate_library(library)?;
    let mut built: BTreeMap<String, Material> = BTreeMap::new();
    for def in &library.materials {
        let material = build_material(def, &built)?;
        debug!(
            id = %def.id,
            mass = material.mass(),
            nuclides = material.comp().len(),
            "built material"
        );
        built.insert(def.id.clone(), material);
    }
    info!(library = %library.name, materials = built.len(), "library built");
    Ok(built)
}

fn lookup<'a>(
    built: &'a BTreeMap<String, Material>,
    owner: &str,
    id: &str,
) -> LibraryResult<&'a Material> {
    built.get(id).ok_or_else(|| LibraryError::Build {
        what: format!("material '{owner}' refers to undefined '{id}'"),
    })
}

fn build_material(
    def: &MaterialDef,
    built: &BTreeMap<String, Material>,
) -> LibraryResult<Material> {
    let mut material = match &def.kind {
        MaterialKind::Mass { weights } => {
            let mut builder = Material::builder(weights.iter().map(|(k, w)| (k.as_str(), *w)));
            if let Some(mass) = def.mass {
                builder = builder.mass(mass);
            }
            builder.build()?
        }
        MaterialKind::Atoms { atoms } => {
            let mut entries = Vec::with_capacity(atoms.len());
            for term in atoms {
                let entry = match term {
                    AtomTermDef::Nuclide { key, .. } => AtomEntry::from(key.as_str()),
                    AtomTermDef::Material { id, .. } => {
                        AtomEntry::from(lookup(built, &def.id, id)?.clone())
                    }
                };
                entries.push((entry, term.count()));
            }
            let mut m = Material::empty();
            if let Some(mass) = def.mass {
                m.set_mass_raw(mass)?;
            }
            m.from_atom_frac(entries)?;
            m
        }
        MaterialKind::Blend { parts } => {
            let mut blend: Option<Material> = None;
            for part in parts {
                let scaled =
                    lookup(built, &def.id, &part.material)?.try_mul(&part.scale.into())?;
                blend = Some(match blend {
                    None => scaled,
                    Some(acc) => acc + scaled,
                });
            }
            let mut blend = blend.unwrap_or_default();
            if let Some(mass) = def.mass {
                blend.set_mass_raw(mass)?;
            }
            blend
        }
    };

    if let Some(rho) = def.density {
        material.set_density(rho)?;
    }
    if let Some(n) = def.atoms_per_molecule {
        material.set_atoms_per_molecule(n)?;
    }
    if let Some(meta) = &def.metadata {
        material.set_metadata(meta.clone());
    }
    if let Some(text) = &def.description {
        material.metadata().insert("description", Value::String(text.clone()))?;
    }
    Ok(material)
}
