//! End-to-end material scenarios.

use std::collections::HashMap;

use nm_core::{NuclideId, Tolerances, nearly_equal};
use nm_material::{Entry, Material, MaterialError, MaterialRecord, UNSET};
use serde_json::json;

fn nid(raw: i64) -> NuclideId {
    NuclideId::from_raw(raw).unwrap()
}

const U235: i64 = 922_350_000;
const U238: i64 = 922_380_000;

#[test]
fn enriched_uranium_scenario() {
    let m = Material::builder([("U235", 0.04), ("U238", 0.96)])
        .mass(42.0)
        .build()
        .unwrap();
    let tol = Tolerances::default();

    assert!(nearly_equal(m.comp()[nid(U235)], 0.04, tol));
    assert!(nearly_equal(m.comp()[nid(U238)], 0.96, tol));
    assert_eq!(m.mass(), 42.0);

    let abs = m.mult_by_mass();
    assert!(nearly_equal(abs[&nid(U235)], 1.68, tol));
    assert!(nearly_equal(abs[&nid(U238)], 40.32, tol));
}

#[test]
fn nine_equal_weights() {
    let keys = [
        10_010_000_i64,
        80_160_000,
        691_690_000,
        922_350_000,
        922_380_000,
        942_390_000,
        942_410_000,
        952_420_001,
        962_440_000,
    ];
    let m = Material::new(keys.iter().map(|k| (*k, 1.0))).unwrap();
    assert_eq!(m.mass(), 9.0);
    for k in keys {
        assert!(nearly_equal(
            m.comp().fraction(nid(k)),
            1.0 / 9.0,
            Tolerances::default()
        ));
    }
}

#[test]
fn water_molecular_mass_persists_override() {
    let mut m = Material::new([("H1", 0.111_914_873_288_080_77), ("O16", 0.888_085_126_711_919_2)])
        .unwrap();
    let tol = Tolerances {
        abs: 1e-4,
        rel: 1e-5,
    };
    assert!(nearly_equal(m.molecular_mass(None).unwrap(), 6.0035, tol));
    assert!(nearly_equal(m.molecular_mass(Some(3.0)).unwrap(), 18.0106, tol));
    assert_eq!(m.atoms_per_molecule(), 3.0);
}

#[test]
fn normalize_collapses_absolute_masses_to_fractions() {
    let mut m = Material::builder([("U235", 4.0), ("U238", 96.0)])
        .build()
        .unwrap();
    assert_eq!(m.mass(), 100.0);
    m.normalize();
    assert_eq!(m.mass(), 1.0);
    let abs = m.mult_by_mass();
    assert_eq!(abs[&nid(U235)], m.comp()[nid(U235)]);
    assert!(m.comp().is_normalized());
}

#[test]
fn slice_mass_matches_range_sum() {
    let m = Material::new([
        ("H1", 1.0),
        ("O16", 3.0),
        ("Fe56", 5.0),
        ("U235", 0.5),
        ("U238", 9.5),
        ("Pu239", 1.0),
    ])
    .unwrap();
    let abs = m.mult_by_mass();
    let expected: f64 = abs
        .iter()
        .filter(|(id, _)| (260_000_000..920_000_000).contains(&id.raw()))
        .map(|(_, m)| m)
        .sum();
    let s = m.slice(Some("Fe".into()), Some(920_000_000_i64.into())).unwrap();
    assert!(nearly_equal(s.mass(), expected, Tolerances::default()));
    assert_eq!(s.comp().len(), 1);
}

#[test]
fn deletion_keeps_normalization() {
    let mut m = Material::new([("U235", 1.0), ("U238", 2.0), ("O16", 3.0)]).unwrap();
    m.remove("U238").unwrap();
    assert!(!m.comp().contains(nid(U238)));
    assert!(nearly_equal(m.comp().sum(), 1.0, Tolerances::default()));

    m.remove(vec!["U235", "O16"]).unwrap();
    assert_eq!(m.mass(), 0.0);
    assert!(m.comp().is_empty());
}

#[test]
fn metadata_handle_goes_stale_on_replacement() {
    let mut m = Material::new([("U235", 1.0)]).unwrap();
    let h = m.metadata();
    h.insert("x", 1).unwrap();
    assert_eq!(m.metadata().get("x"), Some(json!(1)));

    m.set_metadata(json!({}));
    assert_eq!(h.get("x"), Some(json!(1)));
    assert_eq!(m.metadata().get("x"), None);
    assert!(!h.is_attached(&m));
}

#[test]
fn single_key_forms_agree() {
    let m = Material::new([("U235", 1.0), ("U238", 3.0)]).unwrap();
    let by_name = m.get("U-235").unwrap();
    let by_short = m.get(92235).unwrap();
    let by_id = m.get(nid(U235)).unwrap();
    assert_eq!(by_name, Entry::Mass(1.0));
    assert_eq!(by_short, by_name);
    assert_eq!(by_id, by_name);
}

#[test]
fn unknown_key_leaves_material_untouched() {
    let mut m = Material::new([("U235", 1.0), ("U238", 3.0)]).unwrap();
    let before = MaterialRecord::from(&m);
    let err = m.set("Uu235", 2.0).unwrap_err();
    assert_eq!(
        err,
        MaterialError::UnknownNuclide {
            key: "Uu235".into()
        }
    );
    assert!(m.remove("Qq1".."U").is_err());
    assert_eq!(MaterialRecord::from(&m), before);
}

#[test]
fn materials_as_map_keys() {
    let fuel = Material::builder([("U235", 0.04), ("U238", 0.96)])
        .mass(42.0)
        .density(10.4)
        .build()
        .unwrap();
    let moderator = Material::new([("H1", 2.0), ("O16", 16.0)]).unwrap();

    let mut roles = HashMap::new();
    roles.insert(fuel.clone(), "fuel");
    roles.insert(moderator.clone(), "moderator");
    assert_eq!(roles[&fuel], "fuel");
    assert_eq!(roles[&moderator], "moderator");
    assert_eq!(roles.get(&(&fuel * 2.0).unwrap()), None);
}

#[test]
fn mixing_then_slicing_recovers_component() {
    let fuel = Material::builder([("U235", 0.04), ("U238", 0.96)])
        .mass(42.0)
        .density(10.4)
        .build()
        .unwrap();
    let clad = Material::builder([("Fe56", 1.0)])
        .mass(8.0)
        .density(7.9)
        .build()
        .unwrap();
    let pin = &fuel + &clad;
    assert_eq!(pin.density(), UNSET);

    let uranium = pin.sub_u();
    let tol = Tolerances::default();
    assert!(nearly_equal(uranium.mass(), 42.0, tol));
    assert!(nearly_equal(uranium.comp().fraction(nid(U235)), 0.04, tol));
    assert!(nearly_equal(pin.sub_elem(26).mass(), 8.0, tol));
}

#[test]
fn formula_with_sub_material() {
    let water = Material::from_atoms([("H1", 2.0), ("O16", 1.0)]).unwrap();
    let mut uo2 = Material::from_atoms([("U238", 1.0), ("O16", 2.0)]).unwrap();
    uo2.set_density(10.97).unwrap();

    let atoms = uo2.to_atom_frac().unwrap();
    let tol = Tolerances {
        abs: 1e-9,
        rel: 1e-9,
    };
    assert!(nearly_equal(atoms[&nid(80_160_000)], 2.0, tol));
    assert!(nearly_equal(atoms[&nid(U238)], 1.0, tol));
    assert!(uo2.number_density().unwrap() > 6.0e22);
    assert!(water.mass() > 18.0 && water.mass() < 18.02);
}
