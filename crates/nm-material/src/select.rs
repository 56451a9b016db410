//! Indexed access to a material by id, name, range or key set.
//!
//! A [`Selector`] is resolved once through a [`NuclideIdentity`] and then
//! dispatched. Single keys read and write absolute masses; ranges and sets
//! produce mass-weighted sub-materials.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use nm_core::{NuclideId, ensure_non_negative};
use nm_data::{NucKey, NuclideIdentity, builtin};
use tracing::{debug, trace};

use crate::composition::Composition;
use crate::error::MatResult;
use crate::material::Material;

/// Caller-facing key form for indexed access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(i64),
    Name(String),
    /// Half-open `[lo, hi)`; `None` bounds are open.
    Range {
        lo: Option<NucKey>,
        hi: Option<NucKey>,
    },
    Set(Vec<NucKey>),
    /// Every nuclide in the material (`[:]`).
    All,
}

/// A selector after key resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolved {
    One(NuclideId),
    Range {
        lo: Option<NuclideId>,
        hi: Option<NuclideId>,
    },
    Set(BTreeSet<NuclideId>),
}

impl Selector {
    pub(crate) fn resolve(&self, ids: &dyn NuclideIdentity) -> MatResult<Resolved> {
        let resolved = match self {
            Selector::Id(v) => Resolved::One(ids.resolve(&NucKey::Id(*v))?),
            Selector::Name(s) => Resolved::One(ids.resolve(&NucKey::Name(s.clone()))?),
            Selector::Range { lo, hi } => Resolved::Range {
                lo: lo.as_ref().map(|k| ids.resolve(k)).transpose()?,
                hi: hi.as_ref().map(|k| ids.resolve(k)).transpose()?,
            },
            Selector::Set(keys) => Resolved::Set(
                keys.iter()
                    .map(|k| ids.resolve(k))
                    .collect::<Result<_, _>>()?,
            ),
            Selector::All => Resolved::Range { lo: None, hi: None },
        };
        trace!(selector = ?self, resolved = ?resolved, "resolved selector");
        Ok(resolved)
    }
}

impl From<NucKey> for Selector {
    fn from(key: NucKey) -> Self {
        match key {
            NucKey::Id(v) => Selector::Id(v),
            NucKey::Name(s) => Selector::Name(s),
        }
    }
}

impl From<i64> for Selector {
    fn from(v: i64) -> Self {
        Selector::Id(v)
    }
}

impl From<i32> for Selector {
    fn from(v: i32) -> Self {
        Selector::Id(i64::from(v))
    }
}

impl From<NuclideId> for Selector {
    fn from(id: NuclideId) -> Self {
        Selector::Id(id.raw())
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Selector::Name(s.to_string())
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Selector::Name(s)
    }
}

impl<K: Into<NucKey>> From<Range<K>> for Selector {
    fn from(r: Range<K>) -> Self {
        Selector::Range {
            lo: Some(r.start.into()),
            hi: Some(r.end.into()),
        }
    }
}

impl<K: Into<NucKey>> From<RangeFrom<K>> for Selector {
    fn from(r: RangeFrom<K>) -> Self {
        Selector::Range {
            lo: Some(r.start.into()),
            hi: None,
        }
    }
}

impl<K: Into<NucKey>> From<RangeTo<K>> for Selector {
    fn from(r: RangeTo<K>) -> Self {
        Selector::Range {
            lo: None,
            hi: Some(r.end.into()),
        }
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::All
    }
}

impl<K: Into<NucKey>> From<Vec<K>> for Selector {
    fn from(keys: Vec<K>) -> Self {
        Selector::Set(keys.into_iter().map(Into::into).collect())
    }
}

/// Result of [`Material::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Absolute mass of a single nuclide.
    Mass(f64),
    /// Mass-weighted sub-material for a range or set.
    Material(Material),
}

impl Entry {
    /// Mass of the selection, whichever form it took.
    pub fn mass(&self) -> f64 {
        match self {
            Entry::Mass(m) => *m,
            Entry::Material(m) => m.mass(),
        }
    }

    pub fn into_material(self) -> Option<Material> {
        match self {
            Entry::Material(m) => Some(m),
            Entry::Mass(_) => None,
        }
    }
}

impl Material {
    /// Ids of this material matched by a resolved selector, ascending.
    ///
    /// A single key matches only when present; a set matches its present members.
    fn matched(&self, sel: &Resolved) -> Vec<NuclideId> {
        match sel {
            Resolved::One(id) => self.comp.contains(*id).then_some(*id).into_iter().collect(),
            Resolved::Range { lo, hi } => self.comp.ids_in_range(*lo, *hi).collect(),
            Resolved::Set(set) => set
                .iter()
                .copied()
                .filter(|id| self.comp.contains(*id))
                .collect(),
        }
    }

    /// Absolute mass for a single key, or a sub-material for a range or set.
    ///
    /// A resolvable id absent from the material reads as `0.0`.
    pub fn get(&self, sel: impl Into<Selector>) -> MatResult<Entry> {
        self.get_with(sel, builtin())
    }

    pub fn get_with(
        &self,
        sel: impl Into<Selector>,
        ids: &dyn NuclideIdentity,
    ) -> MatResult<Entry> {
        let resolved = sel.into().resolve(ids)?;
        Ok(match resolved {
            Resolved::One(id) => Entry::Mass(self.comp.fraction(id) * self.mass),
            other => {
                let keep: BTreeSet<NuclideId> = self.matched(&other).into_iter().collect();
                Entry::Material(self.sub_where(|id| keep.contains(&id)))
            }
        })
    }

    /// Absolute mass of one nuclide.
    pub fn mass_of(&self, key: impl Into<NucKey>) -> MatResult<f64> {
        let id = builtin().resolve(&key.into())?;
        Ok(self.comp.fraction(id) * self.mass)
    }

    /// Sub-material over `[lo, hi)` in id order.
    ///
    /// An element bound stands for its element id, the smallest id of the
    /// family, so `"U".."Np"` is all uranium. `lo > hi` is an empty material.
    ///
    /// ```
    /// use nm_material::Material;
    ///
    /// let m = Material::new([("U235", 1.0), ("U238", 1.0), ("Pu239", 2.0)]).unwrap();
    /// let uranium = m.slice(Some("U".into()), Some("Np".into())).unwrap();
    /// assert_eq!(uranium.mass(), 2.0);
    /// ```
    pub fn slice(&self, lo: Option<NucKey>, hi: Option<NucKey>) -> MatResult<Material> {
        let entry = self.get(Selector::Range { lo, hi })?;
        Ok(entry.into_material().unwrap_or_default())
    }

    /// Sub-material over an explicit key set.
    pub fn select<I, K>(&self, keys: I) -> MatResult<Material>
    where
        I: IntoIterator<Item = K>,
        K: Into<NucKey>,
    {
        let keys = keys.into_iter().map(Into::into).collect();
        let entry = self.get(Selector::Set(keys))?;
        Ok(entry.into_material().unwrap_or_default())
    }

    /// Replace absolute masses, then renormalize against the new total.
    ///
    /// A single key is inserted when absent; a set inserts every listed id; a
    /// range only touches ids already present. The new mass is
    /// `old_mass - old_selected + count * value`; if that is not positive the
    /// material becomes empty with mass 0.
    pub fn set(&mut self, sel: impl Into<Selector>, value: f64) -> MatResult<()> {
        self.set_with(sel, value, builtin())
    }

    pub fn set_with(
        &mut self,
        sel: impl Into<Selector>,
        value: f64,
        ids: &dyn NuclideIdentity,
    ) -> MatResult<()> {
        let value = ensure_non_negative(value, "absolute mass")?;
        let resolved = sel.into().resolve(ids)?;
        let targets: Vec<NuclideId> = match &resolved {
            Resolved::One(id) => vec![*id],
            Resolved::Set(set) => set.iter().copied().collect(),
            range => self.matched(range),
        };

        let mut absolute = self.mult_by_mass();
        let mut old_selected = 0.0;
        for id in &targets {
            old_selected += absolute.insert(*id, value).unwrap_or(0.0);
        }
        let new_mass = self.mass - old_selected + value * targets.len() as f64;
        debug!(
            nuclides = targets.len(),
            value,
            new_mass,
            "setting absolute nuclide masses"
        );
        self.commit_absolute(absolute, new_mass);
        Ok(())
    }

    /// Remove the selection and return it as its own material.
    ///
    /// The remainder is renormalized; removing everything leaves mass 0.
    pub fn remove(&mut self, sel: impl Into<Selector>) -> MatResult<Material> {
        self.remove_with(sel, builtin())
    }

    pub fn remove_with(
        &mut self,
        sel: impl Into<Selector>,
        ids: &dyn NuclideIdentity,
    ) -> MatResult<Material> {
        let resolved = sel.into().resolve(ids)?;
        let targets = self.matched(&resolved);

        let mut remaining = self.mult_by_mass();
        let mut removed = BTreeMap::new();
        for id in targets {
            if let Some(m) = remaining.remove(&id) {
                removed.insert(id, m);
            }
        }
        let removed = self.from_absolute_masses(removed);
        let new_mass = self.mass - removed.mass();
        debug!(
            removed = removed.comp().len(),
            new_mass, "removed nuclides from material"
        );
        self.commit_absolute(remaining, new_mass);
        Ok(removed)
    }

    fn commit_absolute(&mut self, absolute: BTreeMap<NuclideId, f64>, new_mass: f64) {
        if new_mass <= 0.0 || absolute.is_empty() {
            self.mass = 0.0;
            self.comp = Composition::new();
        } else {
            self.comp = Composition::from_absolute(absolute, new_mass);
            self.mass = new_mass;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MaterialError;
    use nm_core::{Tolerances, nearly_equal};
    use serde_json::json;

    fn nid(name: &str) -> NuclideId {
        builtin().resolve(&NucKey::from(name)).unwrap()
    }

    fn mixed() -> Material {
        Material::builder([
            ("H1", 1.0),
            ("O16", 1.0),
            ("U235", 1.0),
            ("U238", 1.0),
            ("Np237", 1.0),
            ("Pu239", 1.0),
            ("Pu241", 1.0),
            ("Am242m", 1.0),
        ])
        .mass(16.0)
        .density(7.5)
        .atoms_per_molecule(2.0)
        .metadata(json!({"name": "mix"}))
        .build()
        .unwrap()
    }

    #[test]
    fn single_key_reads_absolute_mass() {
        let m = mixed();
        assert_eq!(m.get("U235").unwrap(), Entry::Mass(2.0));
        assert_eq!(m.get(922_350_000_i64).unwrap().mass(), 2.0);
        assert_eq!(m.mass_of("Cs137").unwrap(), 0.0);
        assert_eq!(
            m.get("Xx999").unwrap_err(),
            MaterialError::UnknownNuclide {
                key: "Xx999".into()
            }
        );
    }

    #[test]
    fn slice_with_element_bounds() {
        let m = mixed();
        let tol = Tolerances::default();
        let uranium = m.get("U".."Np").unwrap().into_material().unwrap();
        assert_eq!(uranium.mass(), 4.0);
        assert!(nearly_equal(uranium.comp().fraction(nid("U235")), 0.5, tol));
        assert_eq!(uranium.comp().len(), 2);
        assert_eq!(uranium.density(), 7.5);
        assert_eq!(uranium.atoms_per_molecule(), -1.0);
        assert!(uranium.metadata().is_empty());
        assert!(!uranium.comp().contains(nid("Np237")));

        let heavy = m.get("U"..).unwrap();
        assert_eq!(heavy.mass(), 12.0);
        let light = m.get(..922_350_000_i64).unwrap();
        assert_eq!(light.mass(), 4.0);
        assert_eq!(m.get(..).unwrap().mass(), 16.0);
    }

    #[test]
    fn element_and_integer_bounds_agree() {
        let m = mixed();
        let by_name = m.slice(Some("U".into()), Some("Np".into())).unwrap();
        let by_id = m
            .slice(Some("U".into()), Some(NucKey::Id(930_000_000)))
            .unwrap();
        assert_eq!(by_name, by_id);

        let neptunium = m.slice(Some("Np".into()), Some("Pu".into())).unwrap();
        assert_eq!(neptunium.mass(), 2.0);
        assert!(neptunium.comp().contains(nid("Np237")));

        let nothing = m.slice(Some("U".into()), Some("U".into())).unwrap();
        assert_eq!(nothing.mass(), 0.0);
        assert!(nothing.comp().is_empty());
    }

    #[test]
    fn slice_upper_bound_is_exclusive() {
        let m = mixed();
        let s = m
            .slice(Some("U235".into()), Some("Pu241".into()))
            .unwrap();
        assert_eq!(s.comp().len(), 4);
        assert!(!s.comp().contains(nid("Pu241")));
    }

    #[test]
    fn inverted_range_is_empty_material() {
        let m = mixed();
        let s = m.slice(Some("Pu".into()), Some("H".into())).unwrap();
        assert_eq!(s.mass(), 0.0);
        assert!(s.comp().is_empty());

        let none = m.slice(Some("Cs137".into()), Some("Cs138".into())).unwrap();
        assert_eq!(none.mass(), 0.0);
    }

    #[test]
    fn key_set_selection_dedups() {
        let m = mixed();
        let s = m.select(["O16", "U235", "u-235", "Cs137"]).unwrap();
        assert_eq!(s.mass(), 4.0);
        assert_eq!(s.comp().len(), 2);
        let v = m.get(vec!["H1", "O16"]).unwrap();
        assert_eq!(v.mass(), 4.0);
    }

    #[test]
    fn set_single_key_rescales() {
        let mut m = mixed();
        m.set("U235", 9.0).unwrap();
        assert_eq!(m.mass(), 23.0);
        assert!(nearly_equal(m.mass_of("U235").unwrap(), 9.0, Tolerances::default()));
        assert!(m.comp().is_normalized());

        m.set("Cs137", 1.0).unwrap();
        assert_eq!(m.mass(), 24.0);
        assert!(m.comp().contains(nid("Cs137")));
    }

    #[test]
    fn set_range_touches_only_matches() {
        let mut m = mixed();
        m.set("Pu".."Am", 0.5).unwrap();
        assert_eq!(m.comp().len(), 8);
        assert_eq!(m.mass(), 13.0);
        assert_eq!(m.mass_of("Am242m").unwrap(), 2.0);
        assert!(!m.comp().contains(nid("Pu240")));
    }

    #[test]
    fn set_rejects_bad_values_without_change() {
        let mut m = mixed();
        let before = m.clone();
        assert!(matches!(
            m.set("U235", -1.0),
            Err(MaterialError::InvalidComposition { .. })
        ));
        assert!(m.set("U235", f64::NAN).is_err());
        assert!(m.set("Zq2", 1.0).is_err());
        assert_eq!(m.comp(), before.comp());
        assert_eq!(m.mass(), before.mass());
    }

    #[test]
    fn set_to_zero_mass_empties() {
        let mut m = Material::new([("U235", 2.0)]).unwrap();
        m.set("U235", 0.0).unwrap();
        assert_eq!(m.mass(), 0.0);
        assert!(m.comp().is_empty());
    }

    #[test]
    fn remove_single_key() {
        let mut m = mixed();
        let removed = m.remove("U238").unwrap();
        assert_eq!(removed.mass(), 2.0);
        assert!(!m.comp().contains(nid("U238")));
        assert_eq!(m.mass(), 14.0);
        assert!(m.comp().is_normalized());

        let nothing = m.remove("U238").unwrap();
        assert_eq!(nothing.mass(), 0.0);
        assert_eq!(m.mass(), 14.0);
    }

    #[test]
    fn remove_range_and_everything() {
        let mut m = mixed();
        let actinides = m.remove("Ac"..).unwrap();
        assert_eq!(actinides.comp().len(), 6);
        assert_eq!(m.comp().len(), 2);
        assert!(nearly_equal(m.mass(), 4.0, Tolerances::default()));

        m.remove(..).unwrap();
        assert_eq!(m.mass(), 0.0);
        assert!(m.comp().is_empty());
    }
}
