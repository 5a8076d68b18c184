use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ingest::normalizer::normalize_name;

/// Immutable dish-to-cuisine lookup table.
///
/// The taxonomy travels with the run configuration as plain data, so two
/// analyses can score against different revisions side by side without any
/// shared state between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    parents: BTreeMap<String, String>,
}

impl Taxonomy {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let parents = entries
            .into_iter()
            .map(|(child, parent)| (normalize_name(child.as_ref()), parent.into()))
            .collect();
        Self { parents }
    }

    /// The cuisine rollup used when an import carries no taxonomy of its own.
    pub fn standard() -> Self {
        Self::new([
            ("katsu curry", "japanese"),
            ("chicken katsu", "japanese"),
            ("ramen", "japanese"),
            ("gyoza platter", "japanese"),
            ("butter chicken", "indian"),
            ("chicken biryani", "indian"),
            ("pad thai", "thai"),
            ("green curry", "thai"),
            ("margherita pizza", "italian"),
            ("lasagne", "italian"),
            ("fish and chips", "british"),
            ("sunday roast", "british"),
            ("burrito bowl", "mexican"),
            ("bibimbap", "korean"),
            ("laksa", "malaysian"),
        ])
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TaxonomyError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TaxonomyError> {
        let raw: BTreeMap<String, String> = serde_json::from_reader(reader)?;
        Ok(Self::new(raw))
    }

    /// The parent category for a sub-category name, if the table knows it.
    /// Lookups are normalized the same way ingestion normalizes names.
    pub fn parent(&self, name: &str) -> Option<&str> {
        self.parents
            .get(&normalize_name(name))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

#[derive(Debug)]
pub enum TaxonomyError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for TaxonomyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxonomyError::Io(err) => write!(f, "failed to read taxonomy: {err}"),
            TaxonomyError::Json(err) => write!(f, "invalid taxonomy JSON: {err}"),
        }
    }
}

impl std::error::Error for TaxonomyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaxonomyError::Io(err) => Some(err),
            TaxonomyError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TaxonomyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for TaxonomyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
