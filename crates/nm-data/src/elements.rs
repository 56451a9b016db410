//! Element definitions (Z = 1..=103).

use nm_core::NuclideId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementEntry {
    pub z: u32,
    pub symbol: &'static str,
    pub name: &'static str,
    /// Standard atomic weight [g/mol].
    pub weight: f64,
    pub aliases: &'static [&'static str],
}

impl ElementEntry {
    pub fn id(&self) -> NuclideId {
        NuclideId::element(self.z).expect("element table holds valid atomic numbers")
    }

    /// Case-insensitive match against symbol, name or alias.
    pub fn matches(&self, query: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(query)
            || self.name.eq_ignore_ascii_case(query)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(query))
    }
}

macro_rules! el {
    ($z:expr, $sym:expr, $name:expr, $w:expr) => {
        ElementEntry {
            z: $z,
            symbol: $sym,
            name: $name,
            weight: $w,
            aliases: &[],
        }
    };
    ($z:expr, $sym:expr, $name:expr, $w:expr, [$($alias:expr),+]) => {
        ElementEntry {
            z: $z,
            symbol: $sym,
            name: $name,
            weight: $w,
            aliases: &[$($alias),+],
        }
    };
}

pub const ELEMENTS: [ElementEntry; 103] = [
    el!(1, "H", "Hydrogen", 1.008),
    el!(2, "He", "Helium", 4.002_602),
    el!(3, "Li", "Lithium", 6.94),
    el!(4, "Be", "Beryllium", 9.012_183_1),
    el!(5, "B", "Boron", 10.81),
    el!(6, "C", "Carbon", 12.011),
    el!(7, "N", "Nitrogen", 14.007),
    el!(8, "O", "Oxygen", 15.999),
    el!(9, "F", "Fluorine", 18.998_403_163),
    el!(10, "Ne", "Neon", 20.1797),
    el!(11, "Na", "Sodium", 22.989_769_28),
    el!(12, "Mg", "Magnesium", 24.305),
    el!(13, "Al", "Aluminum", 26.981_538_5, ["Aluminium"]),
    el!(14, "Si", "Silicon", 28.085),
    el!(15, "P", "Phosphorus", 30.973_761_998),
    el!(16, "S", "Sulfur", 32.06, ["Sulphur"]),
    el!(17, "Cl", "Chlorine", 35.45),
    el!(18, "Ar", "Argon", 39.948),
    el!(19, "K", "Potassium", 39.0983),
    el!(20, "Ca", "Calcium", 40.078),
    el!(21, "Sc", "Scandium", 44.955_908),
    el!(22, "Ti", "Titanium", 47.867),
    el!(23, "V", "Vanadium", 50.9415),
    el!(24, "Cr", "Chromium", 51.9961),
    el!(25, "Mn", "Manganese", 54.938_044),
    el!(26, "Fe", "Iron", 55.845),
    el!(27, "Co", "Cobalt", 58.933_194),
    el!(28, "Ni", "Nickel", 58.6934),
    el!(29, "Cu", "Copper", 63.546),
    el!(30, "Zn", "Zinc", 65.38),
    el!(31, "Ga", "Gallium", 69.723),
    el!(32, "Ge", "Germanium", 72.630),
    el!(33, "As", "Arsenic", 74.921_595),
    el!(34, "Se", "Selenium", 78.971),
    el!(35, "Br", "Bromine", 79.904),
    el!(36, "Kr", "Krypton", 83.798),
    el!(37, "Rb", "Rubidium", 85.4678),
    el!(38, "Sr", "Strontium", 87.62),
    el!(39, "Y", "Yttrium", 88.905_84),
    el!(40, "Zr", "Zirconium", 91.224),
    el!(41, "Nb", "Niobium", 92.906_37),
    el!(42, "Mo", "Molybdenum", 95.95),
    el!(43, "Tc", "Technetium", 97.907),
    el!(44, "Ru", "Ruthenium", 101.07),
    el!(45, "Rh", "Rhodium", 102.9055),
    el!(46, "Pd", "Palladium", 106.42),
    el!(47, "Ag", "Silver", 107.8682),
    el!(48, "Cd", "Cadmium", 112.414),
    el!(49, "In", "Indium", 114.818),
    el!(50, "Sn", "Tin", 118.710),
    el!(51, "Sb", "Antimony", 121.760),
    el!(52, "Te", "Tellurium", 127.60),
    el!(53, "I", "Iodine", 126.904_47),
    el!(54, "Xe", "Xenon", 131.293),
    el!(55, "Cs", "Cesium", 132.905_451_96, ["Caesium"]),
    el!(56, "Ba", "Barium", 137.327),
    el!(57, "La", "Lanthanum", 138.905_47),
    el!(58, "Ce", "Cerium", 140.116),
    el!(59, "Pr", "Praseodymium", 140.907_66),
    el!(60, "Nd", "Neodymium", 144.242),
    el!(61, "Pm", "Promethium", 144.913),
    el!(62, "Sm", "Samarium", 150.36),
    el!(63, "Eu", "Europium", 151.964),
    el!(64, "Gd", "Gadolinium", 157.25),
    el!(65, "Tb", "Terbium", 158.925_35),
    el!(66, "Dy", "Dysprosium", 162.500),
    el!(67, "Ho", "Holmium", 164.930_33),
    el!(68, "Er", "Erbium", 167.259),
    el!(69, "Tm", "Thulium", 168.934_22),
    el!(70, "Yb", "Ytterbium", 173.045),
    el!(71, "Lu", "Lutetium", 174.9668),
    el!(72, "Hf", "Hafnium", 178.49),
    el!(73, "Ta", "Tantalum", 180.947_88),
    el!(74, "W", "Tungsten", 183.84, ["Wolfram"]),
    el!(75, "Re", "Rhenium", 186.207),
    el!(76, "Os", "Osmium", 190.23),
    el!(77, "Ir", "Iridium", 192.217),
    el!(78, "Pt", "Platinum", 195.084),
    el!(79, "Au", "Gold", 196.966_569),
    el!(80, "Hg", "Mercury", 200.592),
    el!(81, "Tl", "Thallium", 204.38),
    el!(82, "Pb", "Lead", 207.2),
    el!(83, "Bi", "Bismuth", 208.9804),
    el!(84, "Po", "Polonium", 208.982),
    el!(85, "At", "Astatine", 209.987),
    el!(86, "Rn", "Radon", 222.018),
    el!(87, "Fr", "Francium", 223.020),
    el!(88, "Ra", "Radium", 226.025),
    el!(89, "Ac", "Actinium", 227.028),
    el!(90, "Th", "Thorium", 232.0377),
    el!(91, "Pa", "Protactinium", 231.035_88),
    el!(92, "U", "Uranium", 238.028_91),
    el!(93, "Np", "Neptunium", 237.048),
    el!(94, "Pu", "Plutonium", 244.064),
    el!(95, "Am", "Americium", 243.061),
    el!(96, "Cm", "Curium", 247.070),
    el!(97, "Bk", "Berkelium", 247.070),
    el!(98, "Cf", "Californium", 251.080),
    el!(99, "Es", "Einsteinium", 252.083),
    el!(100, "Fm", "Fermium", 257.095),
    el!(101, "Md", "Mendelevium", 258.098),
    el!(102, "No", "Nobelium", 259.101),
    el!(103, "Lr", "Lawrencium", 262.110),
];

/// Look up an element by atomic number.
pub fn by_z(z: u32) -> Option<&'static ElementEntry> {
    let idx = usize::try_from(z).ok()?.checked_sub(1)?;
    ELEMENTS.get(idx)
}

/// Look up an element by symbol, name or alias (case-insensitive).
///
/// Exact-case symbol matches win, so `"Co"` is cobalt even though `"CO"` would
/// also match it case-insensitively.
pub fn lookup(query: &str) -> Option<&'static ElementEntry> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    ELEMENTS
        .iter()
        .find(|e| e.symbol == query)
        .or_else(|| ELEMENTS.iter().find(|e| e.matches(query)))
}
