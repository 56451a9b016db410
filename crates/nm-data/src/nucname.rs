//! Nuclide key forms and canonicalization.
//!
//! Accepted forms:
//! - integers: `922350000` (`ZZZAAASSSS`) or the short `92235` (`ZZZAAA`)
//! - symbol + mass: `"U235"`, `"U-235"`, `"u235"`, `"uranium-235"`
//! - mass + symbol: `"235U"`
//! - metastable suffix: `"Am242m"`, `"Am242m2"`
//! - element only: `"U"`, `"Uranium"`

use core::fmt;

use nm_core::NuclideId;

use crate::elements;
use crate::error::{DataError, DataResult};

/// A nuclide key as supplied by a caller, before canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NucKey {
    Id(i64),
    Name(String),
}

impl From<i64> for NucKey {
    fn from(v: i64) -> Self {
        NucKey::Id(v)
    }
}

impl From<i32> for NucKey {
    fn from(v: i32) -> Self {
        NucKey::Id(i64::from(v))
    }
}

impl From<u32> for NucKey {
    fn from(v: u32) -> Self {
        NucKey::Id(i64::from(v))
    }
}

impl From<NuclideId> for NucKey {
    fn from(id: NuclideId) -> Self {
        NucKey::Id(id.raw())
    }
}

impl From<&str> for NucKey {
    fn from(s: &str) -> Self {
        NucKey::Name(s.to_string())
    }
}

impl From<String> for NucKey {
    fn from(s: String) -> Self {
        NucKey::Name(s)
    }
}

impl From<&String> for NucKey {
    fn from(s: &String) -> Self {
        NucKey::Name(s.clone())
    }
}

impl fmt::Display for NucKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NucKey::Id(v) => write!(f, "{v}"),
            NucKey::Name(s) => write!(f, "{s}"),
        }
    }
}

/// Canonical id for any accepted key form.
pub fn id(key: &NucKey) -> DataResult<NuclideId> {
    match key {
        NucKey::Id(v) => from_int(*v).ok_or_else(|| DataError::unknown(v)),
        NucKey::Name(s) => parse_name(s),
    }
}

fn from_int(v: i64) -> Option<NuclideId> {
    if v >= NuclideId::Z_FACTOR {
        NuclideId::from_raw(v).ok()
    } else if v > 0 {
        let z = u32::try_from(v / 1_000).ok()?;
        let a = u32::try_from(v % 1_000).ok()?;
        NuclideId::new(z, a, 0).ok()
    } else {
        None
    }
}

fn parse_name(raw: &str) -> DataResult<NuclideId> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect();
    let unknown = || DataError::unknown(raw);

    if cleaned.is_empty() {
        return Err(unknown());
    }
    if cleaned.bytes().all(|b| b.is_ascii_digit()) {
        let v: i64 = cleaned.parse().map_err(|_| unknown())?;
        return from_int(v).ok_or_else(unknown);
    }

    match cleaned.find(|c: char| c.is_ascii_digit()) {
        None => elements::lookup(&cleaned)
            .map(|e| e.id())
            .ok_or_else(unknown),
        Some(0) => {
            // "235U": the string is not all digits, so a split point exists
            let split = cleaned
                .find(|c: char| !c.is_ascii_digit())
                .ok_or_else(unknown)?;
            let (mass, symbol) = cleaned.split_at(split);
            let a: u32 = mass.parse().map_err(|_| unknown())?;
            let element = elements::lookup(symbol).ok_or_else(unknown)?;
            NuclideId::new(element.z, a, 0).map_err(|_| unknown())
        }
        Some(i) => {
            let (symbol, rest) = cleaned.split_at(i);
            let digits_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let (mass, tail) = rest.split_at(digits_end);
            let a: u32 = mass.parse().map_err(|_| unknown())?;
            let state = parse_state(tail).ok_or_else(unknown)?;
            let element = elements::lookup(symbol).ok_or_else(unknown)?;
            NuclideId::new(element.z, a, state).map_err(|_| unknown())
        }
    }
}

fn parse_state(tail: &str) -> Option<u32> {
    let mut chars = tail.chars();
    match chars.next() {
        None => Some(0),
        Some('m' | 'M') => {
            let rest = chars.as_str();
            if rest.is_empty() {
                Some(1)
            } else {
                rest.parse().ok().filter(|s| *s > 0)
            }
        }
        Some('g' | 'G') if chars.as_str().is_empty() => Some(0),
        Some(_) => None,
    }
}

/// Canonical display name: `"U235"`, `"Am242M"`, `"U"`.
///
/// Ids beyond the element table fall back to the raw integer.
pub fn name(id: NuclideId) -> String {
    let Some(element) = elements::by_z(id.z()) else {
        return id.to_string();
    };
    let symbol = element.symbol;
    if id.is_element() {
        return symbol.to_string();
    }
    match id.state() {
        0 => format!("{symbol}{}", id.a()),
        1 => format!("{symbol}{}M", id.a()),
        s => format!("{symbol}{}M{s}", id.a()),
    }
}
