//! Element-type registry
//!
//! Maps canonical element-type names (`int16`, `float32`, ...) to a scalar
//! kind and byte width. The registry is built once from a catalog and is
//! read-only afterwards; share it behind an `Arc` across threads.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{RhError, RhResult, Violation};

/// Scalar kind of an element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// One byte, zero is false
    Bool,
    /// Two's complement signed integer
    Int,
    /// Unsigned integer
    Uint,
    /// IEEE 754 binary floating point
    Float,
    /// Pair of IEEE 754 floats (real, imaginary)
    Complex,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Uint => "uint",
            ScalarKind::Float => "float",
            ScalarKind::Complex => "complex",
        }
    }

    /// Returns whether the codec can interpret this kind at `width` bytes
    pub fn supports_width(&self, width: usize) -> bool {
        match self {
            ScalarKind::Bool => width == 1,
            ScalarKind::Int | ScalarKind::Uint => matches!(width, 1 | 2 | 4 | 8),
            ScalarKind::Float => matches!(width, 2 | 4 | 8),
            ScalarKind::Complex => matches!(width, 8 | 16),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One catalog entry as it appears in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: ScalarKind,
    pub width: usize,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, kind: ScalarKind, width: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            width,
        }
    }
}

/// Fixed-width numeric types exposed by common numeric backends
const BUILTIN_CATALOG: &[(&str, ScalarKind, usize)] = &[
    ("bool", ScalarKind::Bool, 1),
    ("int8", ScalarKind::Int, 1),
    ("int16", ScalarKind::Int, 2),
    ("int32", ScalarKind::Int, 4),
    ("int64", ScalarKind::Int, 8),
    ("uint8", ScalarKind::Uint, 1),
    ("uint16", ScalarKind::Uint, 2),
    ("uint32", ScalarKind::Uint, 4),
    ("uint64", ScalarKind::Uint, 8),
    ("float16", ScalarKind::Float, 2),
    ("float32", ScalarKind::Float, 4),
    ("float64", ScalarKind::Float, 8),
    ("complex64", ScalarKind::Complex, 8),
    ("complex128", ScalarKind::Complex, 16),
];

/// A resolved element type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementType {
    name: String,
    kind: ScalarKind,
    width: usize,
}

impl ElementType {
    /// Canonical name, as persisted in the `type` field
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Width of one scalar in bytes
    pub fn width(&self) -> usize {
        self.width
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Registry of supported element types, keyed by exact name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTypeRegistry {
    types: BTreeMap<String, ElementType>,
}

impl ElementTypeRegistry {
    /// Registry populated from the built-in catalog
    pub fn builtin() -> Self {
        let types = BUILTIN_CATALOG
            .iter()
            .map(|&(name, kind, width)| {
                (
                    name.to_string(),
                    ElementType {
                        name: name.to_string(),
                        kind,
                        width,
                    },
                )
            })
            .collect();
        Self { types }
    }

    /// Builds a registry from catalog entries.
    ///
    /// # Errors
    ///
    /// Fails on an empty catalog, an empty or duplicate name, or a kind/width
    /// pair the codec cannot interpret.
    pub fn from_catalog(entries: impl IntoIterator<Item = CatalogEntry>) -> RhResult<Self> {
        let mut types = BTreeMap::new();

        for entry in entries {
            if entry.name.is_empty() {
                return Err(RhError::Registry("element type name must not be empty".into()));
            }
            if !entry.kind.supports_width(entry.width) {
                return Err(RhError::Registry(format!(
                    "unsupported width {} for {} element type '{}'",
                    entry.width, entry.kind, entry.name
                )));
            }
            if types.contains_key(&entry.name) {
                return Err(RhError::Registry(format!(
                    "duplicate element type '{}'",
                    entry.name
                )));
            }

            let ty = ElementType {
                name: entry.name.clone(),
                kind: entry.kind,
                width: entry.width,
            };
            types.insert(entry.name, ty);
        }

        if types.is_empty() {
            return Err(RhError::Registry("catalog defines no element types".into()));
        }

        Ok(Self { types })
    }

    /// Exact, case-sensitive lookup
    pub fn resolve(&self, name: &str) -> Result<&ElementType, Violation> {
        self.types.get(name).ok_or_else(|| {
            Violation::unknown_variant("a registered element type name", format!("'{}'", name))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Catalog entries describing this registry
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.iter()
            .map(|ty| CatalogEntry::new(ty.name(), ty.kind(), ty.width()))
            .collect()
    }
}

impl Default for ElementTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
