use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use nm_data::{NucKey, nucname};
use nm_library::LibraryError;
use nm_material::{Material, MaterialError, MaterialRecord};

#[derive(Parser)]
#[command(name = "nm-cli")]
#[command(about = "nucmat CLI - nuclide material composition tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate library file syntax and structure
    Validate {
        /// Path to the library YAML or JSON file
        library_path: PathBuf,
    },
    /// List materials in a library
    List {
        /// Path to the library YAML or JSON file
        library_path: PathBuf,
    },
    /// Show one material's composition
    Show {
        /// Path to the library YAML or JSON file
        library_path: PathBuf,
        /// Material ID
        material_id: String,
        /// Also print atom fractions and molecular mass
        #[arg(long)]
        atoms: bool,
    },
    /// Show the part of a material within a nuclide range
    Slice {
        /// Path to the library YAML or JSON file
        library_path: PathBuf,
        /// Material ID
        material_id: String,
        /// Inclusive lower bound (e.g. U, 922350000)
        #[arg(long)]
        lo: Option<String>,
        /// Exclusive upper bound
        #[arg(long)]
        hi: Option<String>,
    },
    /// Mix materials by mass
    Mix {
        /// Path to the library YAML or JSON file
        library_path: PathBuf,
        /// Parts as ID or ID:SCALE (e.g. fuel water:0.5)
        #[arg(required = true)]
        parts: Vec<String>,
        /// Multiply the mixture's mass by this factor
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },
    /// Export one material as a serialized record
    Export {
        /// Path to the library YAML or JSON file
        library_path: PathBuf,
        /// Material ID
        material_id: String,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Invalid part '{part}': {reason}")]
    InvalidPart { part: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { library_path } => cmd_validate(&library_path),
        Commands::List { library_path } => cmd_list(&library_path),
        Commands::Show {
            library_path,
            material_id,
            atoms,
        } => cmd_show(&library_path, &material_id, atoms),
        Commands::Slice {
            library_path,
            material_id,
            lo,
            hi,
        } => cmd_slice(&library_path, &material_id, lo, hi),
        Commands::Mix {
            library_path,
            parts,
            scale,
        } => cmd_mix(&library_path, &parts, scale),
        Commands::Export {
            library_path,
            material_id,
            format,
        } => cmd_export(&library_path, &material_id, format),
    }
}

fn load_materials(library_path: &Path) -> CliResult<BTreeMap<String, Material>> {
    let library = nm_library::load(library_path)?;
    let materials = nm_library::build_library(&library)?;
    debug!(path = %library_path.display(), count = materials.len(), "loaded materials");
    Ok(materials)
}

fn find<'a>(materials: &'a BTreeMap<String, Material>, id: &str) -> CliResult<&'a Material> {
    materials
        .get(id)
        .ok_or_else(|| CliError::UnknownMaterial(id.to_string()))
}

/// Parse a bound, treating all-digit text as an exact integer id.
fn parse_key(text: &str) -> NucKey {
    match text.parse::<i64>() {
        Ok(v) => NucKey::Id(v),
        Err(_) => NucKey::from(text),
    }
}

fn cmd_validate(library_path: &Path) -> CliResult<()> {
    println!("Validating library: {}", library_path.display());
    let library = nm_library::load(library_path)?;
    nm_library::build_library(&library)?;
    println!("✓ Library is valid ({} materials)", library.materials.len());
    Ok(())
}

fn cmd_list(library_path: &Path) -> CliResult<()> {
    let materials = load_materials(library_path)?;

    if materials.is_empty() {
        println!("No materials found in library");
    } else {
        println!("Materials in library:");
        for (id, m) in &materials {
            let density = if m.density() > 0.0 {
                format!("{:.4} g/cc", m.density())
            } else {
                "unknown density".to_string()
            };
            println!(
                "  {} - mass {:.6} ({} nuclides, {})",
                id,
                m.mass(),
                m.comp().len(),
                density
            );
        }
    }
    Ok(())
}

fn cmd_show(library_path: &Path, material_id: &str, atoms: bool) -> CliResult<()> {
    let materials = load_materials(library_path)?;
    let material = find(&materials, material_id)?;
    print!("{}", material);

    if atoms {
        // molecular_mass may record atoms per molecule, so work on a copy
        let mut copy = material.clone();
        println!("Atom fractions:");
        for (id, n) in copy.to_atom_frac()? {
            println!("  {:<8}{:.6e}", nucname::name(id), n);
        }
        println!("Molecular mass: {:.6} g/mol", copy.molecular_mass(None)?);
        if copy.density() > 0.0 {
            println!("Number density: {:.6e} atoms/cc", copy.number_density()?);
        }
    }
    Ok(())
}

fn cmd_slice(
    library_path: &Path,
    material_id: &str,
    lo: Option<String>,
    hi: Option<String>,
) -> CliResult<()> {
    let materials = load_materials(library_path)?;
    let material = find(&materials, material_id)?;
    let lo = lo.as_deref().map(parse_key);
    let hi = hi.as_deref().map(parse_key);
    let part = material.slice(lo, hi)?;

    println!(
        "Slice holds {:.6} of {:.6} mass units",
        part.mass(),
        material.mass()
    );
    print!("{}", part);
    Ok(())
}

fn parse_part(text: &str) -> CliResult<(&str, f64)> {
    let Some((id, scale)) = text.split_once(':') else {
        return Ok((text, 1.0));
    };
    let scale: f64 = scale.parse().map_err(|_| CliError::InvalidPart {
        part: text.to_string(),
        reason: "scale is not a number".to_string(),
    })?;
    if !scale.is_finite() || scale < 0.0 {
        return Err(CliError::InvalidPart {
            part: text.to_string(),
            reason: "scale must be non-negative and finite".to_string(),
        });
    }
    Ok((id, scale))
}

fn cmd_mix(library_path: &Path, parts: &[String], scale: f64) -> CliResult<()> {
    let materials = load_materials(library_path)?;

    let mut mixture: Option<Material> = None;
    for text in parts {
        let (id, k) = parse_part(text)?;
        let scaled = find(&materials, id)?.try_mul(&k.into())?;
        mixture = Some(match mixture {
            None => scaled,
            Some(acc) => acc + scaled,
        });
    }
    let mixture = mixture.unwrap_or_default().try_mul(&scale.into())?;

    println!("Mixture of {} parts:", parts.len());
    print!("{}", mixture);
    Ok(())
}

fn cmd_export(library_path: &Path, material_id: &str, format: Format) -> CliResult<()> {
    let materials = load_materials(library_path)?;
    let record = MaterialRecord::from(find(&materials, material_id)?);
    let text = match format {
        Format::Json => serde_json::to_string_pretty(&record)
            .map_err(|e| CliError::Serialization(e.to_string()))?,
        Format::Yaml => {
            serde_yaml::to_string(&record).map_err(|e| CliError::Serialization(e.to_string()))?
        }
    };
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_accept_optional_scale() {
        assert_eq!(parse_part("fuel").unwrap(), ("fuel", 1.0));
        assert_eq!(parse_part("water:0.5").unwrap(), ("water", 0.5));
        assert!(parse_part("water:abc").is_err());
        assert!(parse_part("water:-1").is_err());
    }

    #[test]
    fn numeric_bounds_are_ids() {
        assert_eq!(parse_key("922350000"), NucKey::Id(922_350_000));
        assert_eq!(parse_key("U"), NucKey::Name("U".to_string()));
    }
}
