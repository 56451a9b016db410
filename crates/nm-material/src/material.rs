//! The material value type: composition, mass, density, atoms per molecule
//! and metadata.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use nm_core::{NuclideId, canonical_bits, ensure_finite, ensure_non_negative};
use nm_data::{NucKey, NuclideIdentity, builtin, nucname};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::composition::Composition;
use crate::error::{MatResult, MaterialError};
use crate::metadata::MetadataHandle;
use crate::record::MaterialRecord;

/// Sentinel for an unknown density or unset atoms per molecule.
pub const UNSET: f64 = -1.0;

/// A substance: normalized nuclide mass fractions plus a total mass.
///
/// The composition always stores fractions; the absolute mass of a nuclide is
/// derived as `fraction * mass` (see [`Material::mult_by_mass`]).
///
/// # Hashing
///
/// `Eq` and `Hash` cover the whole tuple (composition, mass, density, atoms per
/// molecule, metadata). A material owned as a `HashMap` key cannot be mutated
/// through the map, but a [`MetadataHandle`] obtained before insertion still
/// can; doing so breaks later lookups.
///
/// # Threads
///
/// The metadata slot is reference counted without locking, so `Material` is
/// neither `Send` nor `Sync`. Convert to a [`MaterialRecord`] to move data
/// across threads; serde goes through the same record.
#[derive(Serialize, Deserialize)]
#[serde(into = "MaterialRecord", try_from = "MaterialRecord")]
pub struct Material {
    pub(crate) comp: Composition,
    pub(crate) mass: f64,
    pub(crate) density: f64,
    pub(crate) atoms_per_molecule: f64,
    pub(crate) metadata: MetadataHandle,
}

/// Builder for [`Material`] from raw (possibly unnormalized) weights.
#[derive(Debug, Clone)]
pub struct MaterialBuilder {
    weights: Vec<(NucKey, f64)>,
    mass: Option<f64>,
    density: f64,
    atoms_per_molecule: f64,
    metadata: Value,
}

impl MaterialBuilder {
    /// Total mass; defaults to the raw weight total.
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn atoms_per_molecule(mut self, atoms_per_molecule: f64) -> Self {
        self.atoms_per_molecule = atoms_per_molecule;
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn build(self) -> MatResult<Material> {
        self.build_with(builtin())
    }

    /// Build resolving keys through `ids`.
    ///
    /// Keys resolving to the same id have their weights summed.
    pub fn build_with(self, ids: &dyn NuclideIdentity) -> MatResult<Material> {
        let mut weights: BTreeMap<NuclideId, f64> = BTreeMap::new();
        for (key, w) in &self.weights {
            let id = ids.resolve(key)?;
            *weights.entry(id).or_insert(0.0) += w;
        }
        let (comp, total) = Composition::from_weights(weights)?;

        let mass = match self.mass {
            Some(m) => ensure_non_negative(m, "mass")?,
            None => total,
        };
        let density = ensure_finite(self.density, "density")?;
        let atoms_per_molecule = ensure_finite(self.atoms_per_molecule, "atoms_per_molecule")?;

        Ok(Material {
            comp,
            mass,
            density,
            atoms_per_molecule,
            metadata: MetadataHandle::new(self.metadata),
        })
    }
}

impl Material {
    /// Material from raw weights; mass defaults to the weight total.
    ///
    /// ```
    /// use nm_material::Material;
    ///
    /// let fuel = Material::builder([("U235", 0.04), ("U238", 0.96)])
    ///     .mass(42.0)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(fuel.mass(), 42.0);
    /// ```
    pub fn new<I, K>(weights: I) -> MatResult<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<NucKey>,
    {
        Self::builder(weights).build()
    }

    pub fn builder<I, K>(weights: I) -> MaterialBuilder
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<NucKey>,
    {
        MaterialBuilder {
            weights: weights.into_iter().map(|(k, w)| (k.into(), w)).collect(),
            mass: None,
            density: UNSET,
            atoms_per_molecule: UNSET,
            metadata: Value::Object(Map::new()),
        }
    }

    /// Mass 0, empty composition, unset density and atoms per molecule.
    pub fn empty() -> Self {
        Self {
            comp: Composition::new(),
            mass: 0.0,
            density: UNSET,
            atoms_per_molecule: UNSET,
            metadata: MetadataHandle::default(),
        }
    }

    /// Read-only composition view keyed by canonical id.
    pub fn comp(&self) -> &Composition {
        &self.comp
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Density [g/cm³], or [`UNSET`].
    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn atoms_per_molecule(&self) -> f64 {
        self.atoms_per_molecule
    }

    pub fn is_empty(&self) -> bool {
        self.comp.is_empty()
    }

    pub fn set_density(&mut self, density: f64) -> MatResult<()> {
        self.density = ensure_finite(density, "density")?;
        Ok(())
    }

    pub fn set_atoms_per_molecule(&mut self, atoms_per_molecule: f64) -> MatResult<()> {
        self.atoms_per_molecule = ensure_finite(atoms_per_molecule, "atoms_per_molecule")?;
        Ok(())
    }

    /// Handle aliasing this material's metadata slot.
    pub fn metadata(&self) -> MetadataHandle {
        self.metadata.clone()
    }

    /// Replace the metadata with a new slot.
    ///
    /// Handles obtained earlier keep the old value and no longer observe this
    /// material.
    pub fn set_metadata(&mut self, metadata: Value) {
        self.metadata = MetadataHandle::new(metadata);
    }

    /// Rescale mass to 1; fractions are unchanged.
    pub fn normalize(&mut self) {
        debug!(mass = self.mass, "normalizing material mass to 1");
        self.mass = 1.0;
    }

    /// Rescale the composition alone to sum to 1, leaving mass untouched.
    ///
    /// Repairs a composition stored through [`Material::replace_composition_raw`].
    /// A composition with a non-positive sum is left as is.
    pub fn norm_comp(&mut self) {
        match self.comp.normalized() {
            Some(comp) => self.comp = comp,
            None if self.comp.is_empty() => {}
            None => warn!(
                sum = self.comp.sum(),
                "composition cannot be renormalized; left unchanged"
            ),
        }
    }

    /// Absolute mass per nuclide (`fraction * mass`).
    pub fn mult_by_mass(&self) -> BTreeMap<NuclideId, f64> {
        self.comp
            .iter()
            .map(|(id, frac)| (id, frac * self.mass))
            .collect()
    }

    /// Store `fractions` verbatim, without normalizing.
    ///
    /// This may leave the composition summing to something other than 1; call
    /// [`Material::norm_comp`] to repair it.
    pub fn replace_composition_raw(&mut self, fractions: BTreeMap<NuclideId, f64>) {
        self.comp = Composition::from_raw(fractions);
    }

    /// Set the mass directly without touching the composition.
    pub fn set_mass_raw(&mut self, mass: f64) -> MatResult<()> {
        self.mass = ensure_non_negative(mass, "mass")?;
        Ok(())
    }

    /// New material over the given absolute masses.
    ///
    /// Inherits density; atoms per molecule is reset and metadata is empty.
    pub(crate) fn from_absolute_masses(&self, absolute: BTreeMap<NuclideId, f64>) -> Material {
        let mass: f64 = absolute.values().sum();
        let mass = if absolute.is_empty() { 0.0 } else { mass };
        Material {
            comp: Composition::from_absolute(absolute, mass),
            mass,
            density: self.density,
            atoms_per_molecule: UNSET,
            metadata: MetadataHandle::default(),
        }
    }

    /// Mass-weighted sub-material over the ids accepted by `pred`.
    pub(crate) fn sub_where(&self, pred: impl Fn(NuclideId) -> bool) -> Material {
        let absolute = self
            .comp
            .iter()
            .filter(|(id, _)| pred(*id))
            .map(|(id, frac)| (id, frac * self.mass))
            .collect();
        self.from_absolute_masses(absolute)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::empty()
    }
}

impl Clone for Material {
    /// Value copy: the clone gets its own metadata slot.
    fn clone(&self) -> Self {
        Self {
            comp: self.comp.clone(),
            mass: self.mass,
            density: self.density,
            atoms_per_molecule: self.atoms_per_molecule,
            metadata: self.metadata.deep_copy(),
        }
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("comp", self.comp.as_map())
            .field("mass", &self.mass)
            .field("density", &self.density)
            .field("atoms_per_molecule", &self.atoms_per_molecule)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl PartialEq for Material {
    fn eq(&self, other: &Self) -> bool {
        let same_comp = self.comp.len() == other.comp.len()
            && self
                .comp
                .iter()
                .zip(other.comp.iter())
                .all(|((a, fa), (b, fb))| a == b && canonical_bits(fa) == canonical_bits(fb));
        same_comp
            && canonical_bits(self.mass) == canonical_bits(other.mass)
            && canonical_bits(self.density) == canonical_bits(other.density)
            && canonical_bits(self.atoms_per_molecule) == canonical_bits(other.atoms_per_molecule)
            && (self.metadata.shares_storage(&other.metadata)
                || self.metadata.snapshot() == other.metadata.snapshot())
    }
}

// Float fields compare by bit pattern, so equality is reflexive
impl Eq for Material {}

impl Hash for Material {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (id, frac) in self.comp.iter() {
            id.hash(state);
            canonical_bits(frac).hash(state);
        }
        canonical_bits(self.mass).hash(state);
        canonical_bits(self.density).hash(state);
        canonical_bits(self.atoms_per_molecule).hash(state);
        // serde_json objects are key-sorted, so the text form is canonical
        self.metadata.with(|v| v.to_string()).hash(state);
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Material:")?;
        writeln!(f, "mass = {}", self.mass)?;
        writeln!(f, "density = {}", self.density)?;
        writeln!(f, "atoms per molecule = {}", self.atoms_per_molecule)?;
        if !self.metadata.is_empty() {
            writeln!(f, "metadata = {}", self.metadata.with(|v| v.to_string()))?;
        }
        writeln!(f, "------------------------")?;
        for (id, frac) in self.comp.iter() {
            writeln!(f, "{:<8}{:.4e}", nucname::name(id), frac)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nm_core::{Tolerances, nearly_equal};
    use serde_json::json;
    use std::collections::HashMap;

    fn nid(name: &str) -> NuclideId {
        builtin().resolve(&NucKey::from(name)).unwrap()
    }

    #[test]
    fn construction_with_explicit_mass() {
        let m = Material::builder([("U235", 0.04), ("U238", 0.96)])
            .mass(42.0)
            .build()
            .unwrap();
        let tol = Tolerances::default();
        assert!(nearly_equal(m.comp().fraction(nid("U235")), 0.04, tol));
        assert!(nearly_equal(m.comp().fraction(nid("U238")), 0.96, tol));
        assert_eq!(m.mass(), 42.0);

        let abs = m.mult_by_mass();
        assert!(nearly_equal(abs[&nid("U235")], 1.68, tol));
        assert!(nearly_equal(abs[&nid("U238")], 40.32, tol));
    }

    #[test]
    fn default_mass_is_weight_total() {
        let keys = [
            "H1", "O16", "Tm169", "U235", "U238", "Pu239", "Pu241", "Am242m", "Cm244",
        ];
        let m = Material::new(keys.iter().map(|k| (*k, 1.0))).unwrap();
        assert_eq!(m.mass(), 9.0);
        let tol = Tolerances::default();
        for k in keys {
            assert!(nearly_equal(m.comp().fraction(nid(k)), 1.0 / 9.0, tol));
        }
        assert!(m.comp().is_normalized());
        assert_eq!(m.density(), UNSET);
        assert_eq!(m.atoms_per_molecule(), UNSET);
        assert!(m.metadata().is_empty());
    }

    #[test]
    fn duplicate_keys_accumulate() {
        let m = Material::new([("U235", 1.0), ("U-235", 1.0), ("O16", 2.0)]).unwrap();
        assert_eq!(m.comp().len(), 2);
        assert_eq!(m.comp().fraction(nid("U235")), 0.5);
        assert_eq!(m.mass(), 4.0);
    }

    #[test]
    fn construction_errors() {
        assert!(matches!(
            Material::new([("U235", -1.0), ("U238", 2.0)]),
            Err(MaterialError::InvalidComposition { .. })
        ));
        assert!(matches!(
            Material::new([("U235", 0.0)]),
            Err(MaterialError::InvalidComposition { .. })
        ));
        assert!(matches!(
            Material::new(Vec::<(&str, f64)>::new()),
            Err(MaterialError::InvalidComposition { .. })
        ));
        assert_eq!(
            Material::new([("Qq12", 1.0)]).unwrap_err(),
            MaterialError::UnknownNuclide { key: "Qq12".into() }
        );
        assert!(Material::builder([("U235", 1.0)]).mass(-3.0).build().is_err());
        assert!(
            Material::builder([("U235", 1.0)])
                .density(f64::NAN)
                .build()
                .is_err()
        );
    }

    #[test]
    fn normalize_sets_mass_to_one_and_keeps_fractions() {
        let mut m = Material::builder([("U235", 0.04), ("U238", 0.96)])
            .mass(42.0)
            .build()
            .unwrap();
        let before = m.comp().clone();
        m.normalize();
        assert_eq!(m.mass(), 1.0);
        assert_eq!(m.comp(), &before);
        // Absolute masses collapse to the fractions
        let abs = m.mult_by_mass();
        assert_eq!(abs[&nid("U235")], before.fraction(nid("U235")));
    }

    #[test]
    fn norm_comp_repairs_raw_replacement() {
        let mut m = Material::new([("H1", 1.0), ("O16", 1.0)]).unwrap();
        let mut raw = BTreeMap::new();
        raw.insert(nid("H1"), 2.0);
        raw.insert(nid("O16"), 6.0);
        m.replace_composition_raw(raw);
        assert!(!m.comp().is_normalized());

        m.norm_comp();
        assert!(m.comp().is_normalized());
        assert_eq!(m.comp().fraction(nid("H1")), 0.25);
        assert_eq!(m.mass(), 2.0);
    }

    #[test]
    fn norm_comp_leaves_zero_sum_alone() {
        let mut m = Material::new([("H1", 1.0)]).unwrap();
        let mut raw = BTreeMap::new();
        raw.insert(nid("H1"), 0.0);
        m.replace_composition_raw(raw.clone());
        m.norm_comp();
        assert_eq!(m.comp().as_map(), &raw);
    }

    #[test]
    fn metadata_aliasing_and_replacement() {
        let mut m = Material::new([("U235", 1.0)]).unwrap();
        let h = m.metadata();
        h.insert("x", 1).unwrap();
        assert_eq!(m.metadata().get("x"), Some(json!(1)));

        m.set_metadata(json!({}));
        assert_eq!(h.get("x"), Some(json!(1)));
        assert!(!m.metadata().contains_key("x"));
        assert!(!h.is_attached(&m));
        assert!(m.metadata().is_attached(&m));

        // Stale handle no longer observes the material
        h.insert("y", 2).unwrap();
        assert!(!m.metadata().contains_key("y"));
    }

    #[test]
    fn nested_metadata_mutation_is_shared() {
        let m = Material::builder([("U235", 1.0)])
            .metadata(json!({"refs": []}))
            .build()
            .unwrap();
        let a = m.metadata();
        let b = m.metadata();
        a.push("refs", "ENDF/B-VIII.0").unwrap();
        b.set_path(&["origin", "site"], "lab").unwrap();
        assert_eq!(
            m.metadata().snapshot(),
            json!({"refs": ["ENDF/B-VIII.0"], "origin": {"site": "lab"}})
        );
    }

    #[test]
    fn clone_detaches_metadata() {
        let m = Material::new([("U235", 1.0)]).unwrap();
        let copy = m.clone();
        m.metadata().insert("x", 1).unwrap();
        assert!(!copy.metadata().contains_key("x"));
        assert_ne!(m, copy);
    }

    #[test]
    fn equality_and_hash_cover_full_tuple() {
        let a = Material::builder([("U235", 0.04), ("U238", 0.96)])
            .mass(42.0)
            .build()
            .unwrap();
        let b = a.clone();
        assert_eq!(a, b);

        let mut map = HashMap::new();
        map.insert(a.clone(), "fuel");
        assert_eq!(map.get(&b), Some(&"fuel"));

        let mut c = b.clone();
        c.set_density(10.5).unwrap();
        assert_ne!(a, c);
        assert!(!map.contains_key(&c));

        let mut d = b.clone();
        d.set_metadata(json!({"name": "fuel"}));
        assert_ne!(a, d);
    }

    #[test]
    fn display_lists_nuclides() {
        let m = Material::builder([("U235", 0.04), ("U238", 0.96)])
            .mass(42.0)
            .build()
            .unwrap();
        let text = m.to_string();
        assert!(text.starts_with("Material:\nmass = 42\n"));
        assert!(text.contains("U235"));
        assert!(text.contains("9.6000e-1"));
    }
}
