//! Schema migration framework.

use crate::LibraryError;
use crate::schema::Library;

pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut library: Library) -> Result<Library, LibraryError> {
    while library.version < LATEST_VERSION {
        library = migrate_one_version(library)?;
    }
    Ok(library)
}

fn migrate_one_version(library: Library) -> Result<Library, LibraryError> {
    match library.version {
        0 => migrate_v0_to_v1(library),
        1 => migrate_v1_to_v2(library),
        v => Err(LibraryError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v0_to_v1(mut library: Library) -> Result<Library, LibraryError> {
    library.version = 1;
    Ok(library)
}

/// Version 1 wrote unknown densities and atom counts as `0`; version 2 omits them.
fn migrate_v1_to_v2(mut library: Library) -> Result<Library, LibraryError> {
    for material in &mut library.materials {
        if material.density == Some(0.0) {
            material.density = None;
        }
        if material.atoms_per_molecule == Some(0.0) {
            material.atoms_per_molecule = None;
        }
    }
    library.version = 2;
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MaterialDef, MaterialKind};
    use std::collections::BTreeMap;

    fn water(density: Option<f64>) -> MaterialDef {
        let mut weights = BTreeMap::new();
        weights.insert("H1".to_string(), 2.0);
        weights.insert("O16".to_string(), 16.0);
        MaterialDef {
            id: "water".to_string(),
            description: None,
            kind: MaterialKind::Mass { weights },
            mass: None,
            density,
            atoms_per_molecule: Some(0.0),
            metadata: None,
        }
    }

    #[test]
    fn migrate_latest_is_noop() {
        let library = Library {
            version: LATEST_VERSION,
            name: "test".to_string(),
            materials: vec![water(Some(0.0))],
        };
        let migrated = migrate_to_latest(library.clone()).unwrap();
        assert_eq!(migrated, library);
    }

    #[test]
    fn migrate_zero_sentinels_to_unset() {
        let library = Library {
            version: 1,
            name: "legacy".to_string(),
            materials: vec![water(Some(0.0)), water(Some(1.0))],
        };
        let migrated = migrate_to_latest(library).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.materials[0].density, None);
        assert_eq!(migrated.materials[0].atoms_per_molecule, None);
        assert_eq!(migrated.materials[1].density, Some(1.0));
    }
}
