//! Sub-materials by element family.
//!
//! Each helper behaves like a slice: the selected nuclides keep their absolute
//! masses and the result is renormalized over them.

use crate::material::Material;

const LANTHANIDES: std::ops::RangeInclusive<u32> = 57..=71;
const ACTINIUM: u32 = 89;
const URANIUM: u32 = 92;
const PLUTONIUM: u32 = 94;

impl Material {
    /// Nuclides of element `z`, including the bare element id.
    pub fn sub_elem(&self, z: u32) -> Material {
        self.sub_where(|id| id.z() == z)
    }

    pub fn sub_u(&self) -> Material {
        self.sub_elem(URANIUM)
    }

    pub fn sub_pu(&self) -> Material {
        self.sub_elem(PLUTONIUM)
    }

    /// Lanthanides, Z 57 to 71.
    pub fn sub_lan(&self) -> Material {
        self.sub_where(|id| LANTHANIDES.contains(&id.z()))
    }

    /// Actinides, Z >= 89.
    pub fn sub_act(&self) -> Material {
        self.sub_where(|id| id.z() >= ACTINIUM)
    }

    /// Transuranics, Z > 92.
    pub fn sub_tru(&self) -> Material {
        self.sub_where(|id| id.z() > URANIUM)
    }

    /// Minor actinides: transuranics other than plutonium.
    pub fn sub_ma(&self) -> Material {
        self.sub_where(|id| id.z() > URANIUM && id.z() != PLUTONIUM)
    }

    /// Fission products and other non-actinides, Z < 89.
    pub fn sub_fp(&self) -> Material {
        self.sub_where(|id| id.z() < ACTINIUM)
    }
}
