//! Normalized mass-fraction store.

use std::collections::BTreeMap;
use std::ops::{Bound, Index};

use nm_core::{COMPOSITION_SUM_TOL, NuclideId};

use crate::error::{MatResult, MaterialError};

/// Nuclide mass fractions in ascending id order.
///
/// Fractions built through [`Composition::from_weights`] sum to 1. The only way
/// to store a non-normalized set is `Material::replace_composition_raw`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    fractions: BTreeMap<NuclideId, f64>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize raw weights.
    ///
    /// Returns the normalized store together with the raw weight total.
    pub fn from_weights(weights: BTreeMap<NuclideId, f64>) -> MatResult<(Self, f64)> {
        let mut total = 0.0;
        for (id, w) in &weights {
            if !w.is_finite() {
                return Err(MaterialError::invalid("non-finite weight", id, *w));
            }
            if *w < 0.0 {
                return Err(MaterialError::invalid("negative weight", id, *w));
            }
            total += w;
        }
        if total <= 0.0 || !total.is_finite() {
            return Err(MaterialError::invalid(
                "weights sum to zero or non-finite",
                "total",
                total,
            ));
        }

        let fractions = weights.into_iter().map(|(id, w)| (id, w / total)).collect();
        Ok((Self { fractions }, total))
    }

    /// Fractions from absolute masses against a total `mass`.
    ///
    /// A non-positive `mass` yields the empty store.
    pub(crate) fn from_absolute(absolute: BTreeMap<NuclideId, f64>, mass: f64) -> Self {
        if mass <= 0.0 {
            return Self::new();
        }
        let fractions = absolute
            .into_iter()
            .map(|(id, m)| (id, m / mass))
            .collect();
        Self { fractions }
    }

    pub(crate) fn from_raw(fractions: BTreeMap<NuclideId, f64>) -> Self {
        Self { fractions }
    }

    /// Same ids rescaled to sum to 1, or `None` if the sum is not positive.
    pub(crate) fn normalized(&self) -> Option<Self> {
        let sum = self.sum();
        if sum <= 0.0 || !sum.is_finite() {
            return None;
        }
        Some(Self {
            fractions: self.fractions.iter().map(|(id, f)| (*id, f / sum)).collect(),
        })
    }

    /// Fraction of `id`, if present.
    pub fn get(&self, id: NuclideId) -> Option<f64> {
        self.fractions.get(&id).copied()
    }

    /// Fraction of `id` (0.0 if not present).
    pub fn fraction(&self, id: NuclideId) -> f64 {
        self.get(id).unwrap_or(0.0)
    }

    pub fn contains(&self, id: NuclideId) -> bool {
        self.fractions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }

    /// Iterate in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (NuclideId, f64)> + '_ {
        self.fractions.iter().map(|(id, f)| (*id, *f))
    }

    pub fn ids(&self) -> impl Iterator<Item = NuclideId> + '_ {
        self.fractions.keys().copied()
    }

    /// Ids in `[lo, hi)`; `None` bounds are open. Empty when `lo > hi`.
    pub fn ids_in_range(
        &self,
        lo: Option<NuclideId>,
        hi: Option<NuclideId>,
    ) -> impl Iterator<Item = NuclideId> + '_ {
        let empty = matches!((lo, hi), (Some(lo), Some(hi)) if lo > hi);
        let lo = lo.map_or(Bound::Unbounded, Bound::Included);
        let hi = hi.map_or(Bound::Unbounded, Bound::Excluded);
        let range = if empty {
            None
        } else {
            Some(self.fractions.range((lo, hi)).map(|(id, _)| *id))
        };
        range.into_iter().flatten()
    }

    pub fn sum(&self) -> f64 {
        self.fractions.values().sum()
    }

    /// Empty, or summing to 1 within [`COMPOSITION_SUM_TOL`] (scaled by entry count).
    pub fn is_normalized(&self) -> bool {
        self.is_empty()
            || (self.sum() - 1.0).abs() <= COMPOSITION_SUM_TOL * self.len().max(1) as f64
    }

    pub fn as_map(&self) -> &BTreeMap<NuclideId, f64> {
        &self.fractions
    }

    pub fn into_map(self) -> BTreeMap<NuclideId, f64> {
        self.fractions
    }
}

impl Index<NuclideId> for Composition {
    type Output = f64;

    /// # Panics
    ///
    /// Panics if `id` is not present, like `BTreeMap` indexing.
    fn index(&self, id: NuclideId) -> &f64 {
        &self.fractions[&id]
    }
}

impl<'a> IntoIterator for &'a Composition {
    type Item = (&'a NuclideId, &'a f64);
    type IntoIter = std::collections::btree_map::Iter<'a, NuclideId, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.fractions.iter()
    }
}
