//! nm-material: the materials-composition engine for nucmat.
//!
//! A [`Material`] pairs normalized nuclide mass fractions with a total mass,
//! a density, an atoms-per-molecule count and free-form JSON metadata.
//!
//! Provides:
//! - Construction and normalization from raw weights
//! - Mass-weighted mixing (`+`) and scaling (`*`)
//! - Indexed access by id, name, range or key set, with slicing and removal
//! - Mass/atom fraction conversion, molecular mass and number density
//! - An aliasing [`MetadataHandle`]
//! - Serde support through [`MaterialRecord`]
//!
//! Key resolution and atomic masses come from the `nm-data` traits; the plain
//! methods use the built-in tables and each has a `*_with` variant taking an
//! injected provider.
//!
//! # Example
//!
//! ```
//! use nm_material::Material;
//!
//! let fuel = Material::builder([("U235", 0.04), ("U238", 0.96)])
//!     .mass(42.0)
//!     .build()
//!     .unwrap();
//! let water = Material::builder([("H1", 2.0), ("O16", 16.0)])
//!     .mass(10.0)
//!     .build()
//!     .unwrap();
//!
//! let slurry = &fuel + &(&water * 0.5).unwrap();
//! assert_eq!(slurry.mass(), 47.0);
//! assert!((slurry.mass_of("U238").unwrap() - 40.32).abs() < 1e-12);
//! ```

pub mod arithmetic;
pub mod atoms;
pub mod composition;
pub mod error;
pub mod families;
pub mod material;
pub mod metadata;
pub mod record;
pub mod select;

pub use arithmetic::Operand;
pub use atoms::AtomEntry;
pub use composition::Composition;
pub use error::{MatResult, MaterialError};
pub use material::{Material, MaterialBuilder, UNSET};
pub use metadata::MetadataHandle;
pub use record::MaterialRecord;
pub use select::{Entry, Selector};
