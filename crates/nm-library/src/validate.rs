//! Library validation logic.

use std::collections::HashSet;

use nm_data::{NucKey, NuclideIdentity, builtin};

use crate::schema::{AtomTermDef, Library, MaterialDef, MaterialKind};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_library(library: &Library) -> Result<(), ValidationError> {
    if library.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: library.version,
        });
    }

    // References must point at materials defined earlier in the file
    let mut defined: HashSet<&str> = HashSet::new();
    for material in &library.materials {
        validate_material(material, &defined)?;
        if !defined.insert(&material.id) {
            return Err(ValidationError::DuplicateId {
                id: material.id.clone(),
                context: "materials".to_string(),
            });
        }
    }

    Ok(())
}

fn validate_material(
    material: &MaterialDef,
    defined: &HashSet<&str>,
) -> Result<(), ValidationError> {
    let id = &material.id;
    if id.trim().is_empty() {
        return Err(invalid("material id", id, "must not be empty"));
    }

    match &material.kind {
        MaterialKind::Mass { weights } => {
            if weights.is_empty() {
                // An empty weight map renders as `{}`, like in the library file
                return Err(invalid(
                    &format!("material '{id}' weights"),
                    "{}",
                    "must not be empty",
                ));
            }
            for (key, w) in weights {
                check_nuclide(id, key)?;
                check_non_negative(&format!("material '{id}' weight {key}"), *w)?;
            }
            if weights.values().sum::<f64>() <= 0.0 {
                return Err(invalid(
                    &format!("material '{id}' weights"),
                    "0",
                    "must sum to a positive total",
                ));
            }
        }
        MaterialKind::Atoms { atoms } => {
            if atoms.is_empty() {
                return Err(invalid(
                    &format!("material '{id}' atoms"),
                    "[]",
                    "must not be empty",
                ));
            }
            for term in atoms {
                match term {
                    AtomTermDef::Nuclide { key, .. } => check_nuclide(id, key)?,
                    AtomTermDef::Material { id: other, .. } => {
                        check_reference(id, other, defined, "atoms")?
                    }
                }
                check_non_negative(&format!("material '{id}' atom count"), term.count())?;
            }
        }
        MaterialKind::Blend { parts } => {
            if parts.is_empty() {
                return Err(invalid(
                    &format!("material '{id}' parts"),
                    "[]",
                    "must not be empty",
                ));
            }
            for part in parts {
                check_reference(id, &part.material, defined, "blend parts")?;
                check_non_negative(
                    &format!("material '{id}' scale of {}", part.material),
                    part.scale,
                )?;
            }
        }
    }

    if let Some(mass) = material.mass {
        check_non_negative(&format!("material '{id}' mass"), mass)?;
    }
    if let Some(rho) = material.density
        && (!rho.is_finite() || rho <= 0.0)
    {
        return Err(invalid(
            &format!("material '{id}' density"),
            &rho.to_string(),
            "must be positive and finite",
        ));
    }
    if let Some(n) = material.atoms_per_molecule
        && (!n.is_finite() || n <= 0.0)
    {
        return Err(invalid(
            &format!("material '{id}' atoms_per_molecule"),
            &n.to_string(),
            "must be positive and finite",
        ));
    }

    Ok(())
}

fn check_nuclide(material: &str, key: &str) -> Result<(), ValidationError> {
    builtin()
        .resolve(&NucKey::from(key))
        .map(|_| ())
        .map_err(|_| invalid(&format!("material '{material}' nuclide"), key, "unknown nuclide"))
}

fn check_reference(
    material: &str,
    other: &str,
    defined: &HashSet<&str>,
    context: &str,
) -> Result<(), ValidationError> {
    if defined.contains(other) {
        Ok(())
    } else {
        Err(ValidationError::MissingReference {
            id: other.to_string(),
            context: format!("material '{material}' {context}"),
        })
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, &value.to_string(), "must be non-negative and finite"));
    }
    Ok(())
}

fn invalid(field: &str, value: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
