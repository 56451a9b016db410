use std::collections::BTreeMap;

use nm_library::schema::*;
use nm_library::{LibraryError, ValidationError, build_library, validate_library};

fn mass(id: &str, weights: &[(&str, f64)]) -> MaterialDef {
    MaterialDef {
        id: id.to_string(),
        description: None,
        kind: MaterialKind::Mass {
            weights: weights
                .iter()
                .map(|(k, w)| (k.to_string(), *w))
                .collect::<BTreeMap<_, _>>(),
        },
        mass: None,
        density: None,
        atoms_per_molecule: None,
        metadata: None,
    }
}

fn blend(id: &str, parts: &[(&str, f64)]) -> MaterialDef {
    MaterialDef {
        id: id.to_string(),
        description: None,
        kind: MaterialKind::Blend {
            parts: parts
                .iter()
                .map(|(m, k)| BlendPartDef {
                    material: m.to_string(),
                    scale: *k,
                })
                .collect(),
        },
        mass: None,
        density: None,
        atoms_per_molecule: None,
        metadata: None,
    }
}

fn library(materials: Vec<MaterialDef>) -> Library {
    Library {
        version: nm_library::LATEST_VERSION,
        name: "test".to_string(),
        materials,
    }
}

#[test]
fn duplicate_ids_rejected() {
    let lib = library(vec![mass("a", &[("H1", 1.0)]), mass("a", &[("O16", 1.0)])]);
    assert!(matches!(
        validate_library(&lib),
        Err(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn forward_reference_rejected() {
    let lib = library(vec![blend("mix", &[("water", 1.0)]), mass("water", &[("H1", 1.0)])]);
    let err = validate_library(&lib).unwrap_err();
    assert_eq!(
        err,
        ValidationError::MissingReference {
            id: "water".to_string(),
            context: "material 'mix' blend parts".to_string(),
        }
    );
}

#[test]
fn self_reference_rejected() {
    let lib = library(vec![blend("loop", &[("loop", 1.0)])]);
    assert!(matches!(
        validate_library(&lib),
        Err(ValidationError::MissingReference { .. })
    ));
}

#[test]
fn unknown_nuclide_rejected() {
    let lib = library(vec![mass("bad", &[("Xq44", 1.0)])]);
    match validate_library(&lib) {
        Err(ValidationError::InvalidValue { value, .. }) => assert_eq!(value, "Xq44"),
        other => panic!("expected invalid value, got {other:?}"),
    }
}

#[test]
fn empty_weights_reported_as_empty_map() {
    let lib = library(vec![mass("void", &[])]);
    let err = validate_library(&lib).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid value: material 'void' weights = {} (must not be empty)"
    );

    let lib = library(vec![blend("void", &[])]);
    let err = validate_library(&lib).unwrap_err();
    assert!(err.to_string().contains("parts = []"));
}

#[test]
fn bad_numbers_rejected() {
    let lib = library(vec![mass("neg", &[("H1", -1.0)])]);
    assert!(validate_library(&lib).is_err());

    let lib = library(vec![mass("zero", &[("H1", 0.0)])]);
    assert!(validate_library(&lib).is_err());

    let mut m = mass("rho", &[("H1", 1.0)]);
    m.density = Some(-2.0);
    assert!(validate_library(&library(vec![m])).is_err());

    let lib = library(vec![mass("a", &[("H1", 1.0)]), blend("b", &[("a", f64::NAN)])]);
    assert!(validate_library(&lib).is_err());
}

#[test]
fn unsupported_version_rejected() {
    let mut lib = library(vec![]);
    lib.version = nm_library::LATEST_VERSION + 1;
    assert!(matches!(
        validate_library(&lib),
        Err(ValidationError::UnsupportedVersion { .. })
    ));
}

#[test]
fn build_reports_validation_errors() {
    let lib = library(vec![blend("mix", &[("nothing", 1.0)])]);
    assert!(matches!(
        build_library(&lib),
        Err(LibraryError::Validation(_))
    ));
}

#[test]
fn blend_masses_add() {
    let lib = library(vec![
        mass("a", &[("H1", 2.0)]),
        mass("b", &[("O16", 3.0)]),
        blend("ab", &[("a", 1.0), ("b", 2.0)]),
    ]);
    let built = build_library(&lib).unwrap();
    assert_eq!(built["ab"].mass(), 8.0);
    assert_eq!(built["ab"].mass_of("O16").unwrap(), 6.0);
}
