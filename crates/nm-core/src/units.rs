// nm-core/src/units.rs

use uom::si::f64::MassDensity as UomMassDensity;

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;

#[inline]
pub fn g_per_cc(v: f64) -> Density {
    use uom::si::mass_density::gram_per_cubic_centimeter;
    Density::new::<gram_per_cubic_centimeter>(v)
}

#[inline]
pub fn to_g_per_cc(d: Density) -> f64 {
    use uom::si::mass_density::gram_per_cubic_centimeter;
    d.get::<gram_per_cubic_centimeter>()
}

pub mod constants {
    /// Avogadro constant [1/mol].
    pub const AVOGADRO: f64 = 6.022_140_76e23;
}
