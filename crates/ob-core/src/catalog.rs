//! Read-only catalog of billable item definitions.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::master;
use crate::types::{AgeBand, CapabilityTag, Category};

/// Errors raised while loading or validating a catalog payload.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two entries share the same code.
    #[error("duplicate catalog code: {0}")]
    DuplicateCode(String),

    /// An entry claims to require both visit types at once.
    #[error("catalog entry {0} requires both the initial and the follow-up visit context")]
    ConflictingVisitRequirements(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Definition of one billable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique key across the whole catalog.
    pub code: String,
    pub name: String,
    /// Fee in points; multiplied by the fixed rate to obtain currency.
    pub point_value: u32,
    pub category: Category,
    /// Unit label shown next to the quantity (e.g. "once per month").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Free-text billing guidance. Monthly limits mentioned here are
    /// documentation only and are not enforced by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Only billable when the encounter is an initial visit.
    #[serde(default)]
    pub requires_initial_visit: bool,
    /// Only billable when the encounter is a follow-up visit.
    #[serde(default)]
    pub requires_follow_up_visit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_band: Option<AgeBand>,
    /// Markers the derivation rules match on.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub capability_tags: BTreeSet<CapabilityTag>,
    /// Categories that invalidate this entry when present elsewhere in the
    /// same bill.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub conflicts_with_categories: BTreeSet<Category>,
    /// Entry exists only to be auto-derived; pickers should not offer it.
    #[serde(default)]
    pub hidden_from_picker: bool,
}

impl CatalogEntry {
    #[must_use]
    pub fn has_tag(&self, tag: CapabilityTag) -> bool {
        self.capability_tags.contains(&tag)
    }
}

/// Immutable, code-indexed table of catalog entries.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, checking the data invariants.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if entry.requires_initial_visit && entry.requires_follow_up_visit {
                return Err(CatalogError::ConflictingVisitRequirements(
                    entry.code.clone(),
                ));
            }
            if index.insert(entry.code.clone(), i).is_some() {
                return Err(CatalogError::DuplicateCode(entry.code.clone()));
            }
        }
        tracing::debug!(entries = entries.len(), "catalog loaded");
        Ok(Self { entries, index })
    }

    /// The built-in master table shipped with the crate.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(master::standard_entries()).expect("built-in catalog satisfies the invariants")
    }

    /// Parses a catalog from a JSON array of entries.
    pub fn from_json_str(payload: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(payload)?;
        Self::new(entries)
    }

    /// A lookup miss is not an error for callers; aggregation surfaces it
    /// as a warning message instead.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<&CatalogEntry> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entries_by_category(
        &self,
        category: Category,
    ) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn entries_by_tag(&self, tag: CapabilityTag) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |e| e.has_tag(tag))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
