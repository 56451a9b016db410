//! Mass/atom conversions, molecular mass, number density and element
//! expansion.

use std::collections::BTreeMap;

use nm_core::constants::AVOGADRO;
use nm_core::{Density, NuclideId, ensure_finite, g_per_cc, to_g_per_cc};
use nm_data::{AtomicData, NucKey, NuclideData, builtin};
use tracing::debug;

use crate::composition::Composition;
use crate::error::{MatResult, MaterialError};
use crate::material::Material;

/// One term of an atom-count formula.
#[derive(Debug, Clone, PartialEq)]
pub enum AtomEntry {
    Nuclide(NucKey),
    /// Atom-equivalents of a whole material, expanded through its own
    /// [`Material::to_atom_frac`].
    Material(Material),
}

impl From<NucKey> for AtomEntry {
    fn from(key: NucKey) -> Self {
        AtomEntry::Nuclide(key)
    }
}

impl From<&str> for AtomEntry {
    fn from(s: &str) -> Self {
        AtomEntry::Nuclide(s.into())
    }
}

impl From<String> for AtomEntry {
    fn from(s: String) -> Self {
        AtomEntry::Nuclide(s.into())
    }
}

impl From<i64> for AtomEntry {
    fn from(v: i64) -> Self {
        AtomEntry::Nuclide(v.into())
    }
}

impl From<i32> for AtomEntry {
    fn from(v: i32) -> Self {
        AtomEntry::Nuclide(v.into())
    }
}

impl From<NuclideId> for AtomEntry {
    fn from(id: NuclideId) -> Self {
        AtomEntry::Nuclide(id.into())
    }
}

impl From<Material> for AtomEntry {
    fn from(m: Material) -> Self {
        AtomEntry::Material(m)
    }
}

fn positive_mass(data: &dyn AtomicData, id: NuclideId) -> MatResult<f64> {
    let mass = data.atomic_mass(id)?;
    if !(mass.is_finite() && mass > 0.0) {
        return Err(MaterialError::invalid("atomic mass", id, mass));
    }
    Ok(mass)
}

fn positive(value: f64, what: &'static str) -> MatResult<f64> {
    let value = ensure_finite(value, what)?;
    if value <= 0.0 {
        return Err(MaterialError::invalid("must be positive", what, value));
    }
    Ok(value)
}

impl Material {
    /// Σ fraction / atomic mass: moles of atoms per gram.
    fn atoms_per_gram(&self, data: &dyn AtomicData) -> MatResult<f64> {
        let mut sum = 0.0;
        for (id, frac) in self.comp.iter() {
            sum += frac / positive_mass(data, id)?;
        }
        Ok(sum)
    }

    /// Relative atom counts per nuclide, `fraction / atomic_mass`.
    ///
    /// When atoms per molecule is set the counts are scaled to sum to it;
    /// otherwise they are per unit mass with no fixed total.
    pub fn to_atom_frac(&self) -> MatResult<BTreeMap<NuclideId, f64>> {
        self.to_atom_frac_with(builtin())
    }

    pub fn to_atom_frac_with(
        &self,
        data: &dyn AtomicData,
    ) -> MatResult<BTreeMap<NuclideId, f64>> {
        let mut atoms = BTreeMap::new();
        for (id, frac) in self.comp.iter() {
            atoms.insert(id, frac / positive_mass(data, id)?);
        }
        let sum: f64 = atoms.values().sum();
        if self.atoms_per_molecule > 0.0 && sum > 0.0 {
            let scale = self.atoms_per_molecule / sum;
            atoms.values_mut().for_each(|n| *n *= scale);
        }
        Ok(atoms)
    }

    /// Replace the composition from atom counts.
    ///
    /// Material entries expand to their own atom fractions times the count.
    /// Atoms per molecule becomes the sum of the top-level counts. Mass is
    /// set to the formula mass only when it is not already positive; density
    /// and metadata are kept. Nothing is written if any entry fails.
    ///
    /// ```
    /// use nm_material::Material;
    ///
    /// let mut water = Material::empty();
    /// water.from_atom_frac([("H1", 2.0), ("O16", 1.0)]).unwrap();
    /// assert_eq!(water.atoms_per_molecule(), 3.0);
    /// assert!((water.mass() - 18.0106).abs() < 1e-3);
    /// ```
    #[allow(clippy::wrong_self_convention)]
    pub fn from_atom_frac<I, E>(&mut self, entries: I) -> MatResult<()>
    where
        I: IntoIterator<Item = (E, f64)>,
        E: Into<AtomEntry>,
    {
        self.from_atom_frac_with(entries, builtin())
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn from_atom_frac_with<I, E>(
        &mut self,
        entries: I,
        data: &dyn NuclideData,
    ) -> MatResult<()>
    where
        I: IntoIterator<Item = (E, f64)>,
        E: Into<AtomEntry>,
    {
        let mut counts: BTreeMap<NuclideId, f64> = BTreeMap::new();
        let mut top_level = 0.0;
        for (entry, n) in entries {
            let entry = entry.into();
            let n = ensure_finite(n, "atom count")?;
            if n < 0.0 {
                return Err(MaterialError::invalid(
                    "negative atom count",
                    entry_label(&entry),
                    n,
                ));
            }
            top_level += n;
            match entry {
                AtomEntry::Nuclide(key) => {
                    *counts.entry(data.resolve(&key)?).or_insert(0.0) += n;
                }
                AtomEntry::Material(sub) => {
                    for (id, a) in sub.to_atom_frac_with(data)? {
                        *counts.entry(id).or_insert(0.0) += n * a;
                    }
                }
            }
        }

        let mut contributions = BTreeMap::new();
        for (id, n) in counts {
            contributions.insert(id, n * positive_mass(data, id)?);
        }
        let total: f64 = contributions.values().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(MaterialError::invalid(
                "atom counts give zero or non-finite mass",
                "total",
                total,
            ));
        }

        debug!(
            nuclides = contributions.len(),
            atoms_per_molecule = top_level,
            formula_mass = total,
            "replacing composition from atom counts"
        );
        self.comp = Composition::from_absolute(contributions, total);
        self.atoms_per_molecule = top_level;
        if self.mass <= 0.0 {
            self.mass = total;
        }
        Ok(())
    }

    /// Fresh material from atom counts; mass is the formula mass.
    pub fn from_atoms<I, E>(entries: I) -> MatResult<Material>
    where
        I: IntoIterator<Item = (E, f64)>,
        E: Into<AtomEntry>,
    {
        let mut m = Material::empty();
        m.from_atom_frac(entries)?;
        Ok(m)
    }

    /// Mass of one formula unit [g/mol].
    ///
    /// Uses `atoms` if given, else the stored atoms per molecule when set,
    /// else 1. Passing `atoms` while atoms per molecule is unset stores it.
    pub fn molecular_mass(&mut self, atoms: Option<f64>) -> MatResult<f64> {
        self.molecular_mass_with(atoms, builtin())
    }

    pub fn molecular_mass_with(
        &mut self,
        atoms: Option<f64>,
        data: &dyn AtomicData,
    ) -> MatResult<f64> {
        let n = match atoms {
            Some(n) => positive(n, "atoms per molecule")?,
            None if self.atoms_per_molecule > 0.0 => self.atoms_per_molecule,
            None => 1.0,
        };
        let per_gram = self.atoms_per_gram(data)?;
        if per_gram <= 0.0 {
            return Err(MaterialError::invalid(
                "molecular mass of an empty composition",
                "composition",
                per_gram,
            ));
        }
        if atoms.is_some() && self.atoms_per_molecule <= 0.0 {
            self.atoms_per_molecule = n;
        }
        Ok(n / per_gram)
    }

    fn known_density(&self) -> MatResult<f64> {
        if self.density > 0.0 {
            Ok(self.density)
        } else {
            Err(MaterialError::invalid("density not set", "density", self.density))
        }
    }

    /// Density as a typed quantity, `None` when unknown.
    pub fn density_quantity(&self) -> Option<Density> {
        (self.density > 0.0).then(|| g_per_cc(self.density))
    }

    pub fn set_density_quantity(&mut self, density: Density) -> MatResult<()> {
        self.set_density(to_g_per_cc(density))
    }

    /// Atom number density [atoms/cm³] from the stored density.
    pub fn number_density(&self) -> MatResult<f64> {
        self.number_density_with(builtin())
    }

    pub fn number_density_with(&self, data: &dyn AtomicData) -> MatResult<f64> {
        let rho = self.known_density()?;
        Ok(rho * AVOGADRO * self.atoms_per_gram(data)?)
    }

    /// Per-nuclide atom number densities [atoms/cm³].
    pub fn to_atom_dens(&self) -> MatResult<BTreeMap<NuclideId, f64>> {
        self.to_atom_dens_with(builtin())
    }

    pub fn to_atom_dens_with(&self, data: &dyn AtomicData) -> MatResult<BTreeMap<NuclideId, f64>> {
        let rho = self.known_density()?;
        let mut dens = BTreeMap::new();
        for (id, frac) in self.comp.iter() {
            dens.insert(id, rho * AVOGADRO * frac / positive_mass(data, id)?);
        }
        Ok(dens)
    }

    /// Set the mass density that yields `number_density` atoms/cm³.
    ///
    /// Returns the stored density [g/cm³].
    pub fn set_density_from_number_density(&mut self, number_density: f64) -> MatResult<f64> {
        self.set_density_from_number_density_with(number_density, builtin())
    }

    pub fn set_density_from_number_density_with(
        &mut self,
        number_density: f64,
        data: &dyn AtomicData,
    ) -> MatResult<f64> {
        let n = positive(number_density, "number density")?;
        let per_gram = self.atoms_per_gram(data)?;
        if per_gram <= 0.0 {
            return Err(MaterialError::invalid(
                "number density of an empty composition",
                "composition",
                per_gram,
            ));
        }
        self.density = n / (AVOGADRO * per_gram);
        Ok(self.density)
    }

    /// Split element ids into their natural isotopes, by mass.
    ///
    /// Elements without abundance data are kept as they are. Mass, density,
    /// atoms per molecule and metadata carry over.
    pub fn expand_elements(&self) -> MatResult<Material> {
        self.expand_elements_with(builtin())
    }

    pub fn expand_elements_with(&self, data: &dyn AtomicData) -> MatResult<Material> {
        let mut fractions: BTreeMap<NuclideId, f64> = BTreeMap::new();
        for (id, frac) in self.comp.iter() {
            let natural = if id.is_element() {
                data.natural_abundances(id.z())
            } else {
                Vec::new()
            };
            if natural.is_empty() {
                *fractions.entry(id).or_insert(0.0) += frac;
                continue;
            }
            // Atom abundances become mass shares through the isotope masses
            let mut shares = Vec::with_capacity(natural.len());
            for (iso, abundance) in natural {
                shares.push((iso, abundance * positive_mass(data, iso)?));
            }
            let total: f64 = shares.iter().map(|(_, s)| s).sum();
            for (iso, share) in shares {
                *fractions.entry(iso).or_insert(0.0) += frac * share / total;
            }
        }
        Ok(self.with_fractions(fractions))
    }

    /// Merge isotopes into their element id, except elements listed in `exclude`.
    pub fn collapse_elements(&self, exclude: &[u32]) -> Material {
        let mut fractions: BTreeMap<NuclideId, f64> = BTreeMap::new();
        for (id, frac) in self.comp.iter() {
            let target = if exclude.contains(&id.z()) {
                id
            } else {
                id.element_id()
            };
            *fractions.entry(target).or_insert(0.0) += frac;
        }
        self.with_fractions(fractions)
    }

    fn with_fractions(&self, fractions: BTreeMap<NuclideId, f64>) -> Material {
        Material {
            comp: Composition::from_raw(fractions),
            mass: self.mass,
            density: self.density,
            atoms_per_molecule: self.atoms_per_molecule,
            metadata: self.metadata.deep_copy(),
        }
    }
}

fn entry_label(entry: &AtomEntry) -> String {
    match entry {
        AtomEntry::Nuclide(key) => key.to_string(),
        AtomEntry::Material(_) => "material".to_string(),
    }
}
