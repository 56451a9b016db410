//! nm-core: stable foundation for nucmat.
//!
//! Contains:
//! - ids (canonical nuclide identifiers)
//! - numeric (Real + tolerances + float helpers)
//! - units (uom SI types + constructors)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
