//! Isotope atomic masses and natural abundances.

use nm_core::NuclideId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotopeEntry {
    pub z: u32,
    pub a: u32,
    pub state: u32,
    /// Atomic mass [amu].
    pub mass: f64,
    /// Natural atom abundance within the element (0.0 if not naturally occurring).
    pub abundance: f64,
}

impl IsotopeEntry {
    pub fn id(&self) -> NuclideId {
        NuclideId::new(self.z, self.a, self.state).expect("isotope table holds valid ids")
    }
}

const fn iso(z: u32, a: u32, mass: f64, abundance: f64) -> IsotopeEntry {
    IsotopeEntry {
        z,
        a,
        state: 0,
        mass,
        abundance,
    }
}

const fn meta(z: u32, a: u32, state: u32, mass: f64) -> IsotopeEntry {
    IsotopeEntry {
        z,
        a,
        state,
        mass,
        abundance: 0.0,
    }
}

pub const ISOTOPES: &[IsotopeEntry] = &[
    iso(1, 1, 1.007_825_032_07, 0.999_885),
    iso(1, 2, 2.014_101_777_8, 0.000_115),
    iso(1, 3, 3.016_049_277_7, 0.0),
    iso(2, 3, 3.016_029_319_1, 0.000_001_34),
    iso(2, 4, 4.002_603_254_15, 0.999_998_66),
    iso(3, 6, 6.015_122_795, 0.0759),
    iso(3, 7, 7.016_004_55, 0.9241),
    iso(4, 9, 9.012_182_2, 1.0),
    iso(5, 10, 10.012_937_0, 0.199),
    iso(5, 11, 11.009_305_4, 0.801),
    iso(6, 12, 12.0, 0.9893),
    iso(6, 13, 13.003_354_837_8, 0.0107),
    iso(7, 14, 14.003_074_004_8, 0.996_36),
    iso(7, 15, 15.000_108_898_2, 0.003_64),
    iso(8, 16, 15.994_914_619_56, 0.997_57),
    iso(8, 17, 16.999_131_70, 0.000_38),
    iso(8, 18, 17.999_161_0, 0.002_05),
    iso(9, 19, 18.998_403_22, 1.0),
    iso(11, 23, 22.989_769_280_9, 1.0),
    iso(13, 27, 26.981_538_63, 1.0),
    iso(26, 54, 53.939_610_5, 0.058_45),
    iso(26, 56, 55.934_937_5, 0.917_54),
    iso(26, 57, 56.935_394_0, 0.021_19),
    iso(26, 58, 57.933_275_6, 0.002_82),
    iso(40, 90, 89.904_704_4, 0.0),
    iso(55, 137, 136.907_089_5, 0.0),
    iso(69, 169, 168.934_213_3, 1.0),
    iso(90, 232, 232.038_055_3, 1.0),
    iso(92, 233, 233.039_635_2, 0.0),
    iso(92, 234, 234.040_952_1, 0.000_054),
    iso(92, 235, 235.043_929_9, 0.007_204),
    iso(92, 236, 236.045_568_0, 0.0),
    iso(92, 238, 238.050_788_2, 0.992_742),
    iso(93, 237, 237.048_173_4, 0.0),
    iso(94, 238, 238.049_559_9, 0.0),
    iso(94, 239, 239.052_163_4, 0.0),
    iso(94, 240, 240.053_813_5, 0.0),
    iso(94, 241, 241.056_851_5, 0.0),
    iso(94, 242, 242.058_742_6, 0.0),
    iso(95, 241, 241.056_829_1, 0.0),
    iso(95, 242, 242.059_549_2, 0.0),
    meta(95, 242, 1, 242.059_601_3),
    iso(95, 243, 243.061_381_1, 0.0),
    iso(96, 244, 244.062_752_6, 0.0),
];

/// Table entry for an exact nuclide id.
pub fn lookup(id: NuclideId) -> Option<&'static IsotopeEntry> {
    ISOTOPES
        .iter()
        .find(|e| e.z == id.z() && e.a == id.a() && e.state == id.state())
}

/// Naturally occurring isotopes of element `z` with their atom abundances.
///
/// Only ground states with non-zero abundance are returned; the list is empty
/// when the table has no natural data for the element.
pub fn natural(z: u32) -> impl Iterator<Item = &'static IsotopeEntry> {
    ISOTOPES
        .iter()
        .filter(move |e| e.z == z && e.state == 0 && e.abundance > 0.0)
}
