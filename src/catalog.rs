//! Read-only catalog of sets, indexed by id.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{IdmaskError, Result};
use crate::types::{CatalogSet, SetId};

/// The list of known sets, as served by the status endpoint.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sets: Vec<CatalogSet>,
    by_id: HashMap<SetId, usize>,
}

impl Catalog {
    /// Build a catalog from sets. A repeated id replaces the earlier set.
    pub fn from_sets(sets: Vec<CatalogSet>) -> Self {
        let mut by_id = HashMap::with_capacity(sets.len());
        for (index, set) in sets.iter().enumerate() {
            if by_id.insert(set.id, index).is_some() {
                warn!(id = set.id, name = %set.name, "duplicate set id in catalog, keeping the later one");
            }
        }
        Self { sets, by_id }
    }

    /// Parse a JSON array of sets.
    pub fn from_json(json: &str) -> Result<Self> {
        let sets: Vec<CatalogSet> = serde_json::from_str(json)?;
        debug!(sets = sets.len(), "parsed catalog");
        Ok(Self::from_sets(sets))
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| IdmaskError::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Look up a set by id.
    pub fn get(&self, id: SetId) -> Option<&CatalogSet> {
        self.by_id.get(&id).map(|&index| &self.sets[index])
    }

    /// Number of distinct set ids.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Distinct sets in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogSet> {
        self.sets
            .iter()
            .enumerate()
            .filter(|(index, set)| self.by_id.get(&set.id) == Some(index))
            .map(|(_, set)| set)
    }

    /// Sets to display, sorted by name. Hidden sets only when included.
    pub fn visible_sets(&self, include_hidden: bool) -> Vec<&CatalogSet> {
        let mut visible: Vec<&CatalogSet> = self
            .iter()
            .filter(|set| include_hidden || !set.hidden)
            .collect();
        visible.sort_by(|a, b| a.name.cmp(&b.name));
        visible
    }
}
