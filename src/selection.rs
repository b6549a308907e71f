//! In-memory selection state: which components of which sets are owned.

use std::collections::BTreeMap;

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{IdmaskError, Result};
use crate::types::{CatalogSet, Mask, SetId, MASK_BITS};

/// Sparse mapping from set id to component mask.
///
/// A zero mask carries no information; readers treat it the same as an absent
/// entry and the encoder skips it. Masks may hold bits beyond a set's
/// component count (for instance straight after decoding a token); those bits
/// are dropped by [`SelectionState::clipped_mask`] and by the encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    masks: BTreeMap<SetId, Mask>,
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw mask for a set, replacing any previous value.
    pub fn insert(&mut self, id: SetId, mask: Mask) {
        self.masks.insert(id, mask);
    }

    /// Raw mask for a set, 0 if absent.
    pub fn mask(&self, id: SetId) -> Mask {
        self.masks.get(&id).copied().unwrap_or(0)
    }

    /// Mask for a set restricted to its catalog component count.
    ///
    /// Unknown sets yield 0.
    pub fn clipped_mask(&self, id: SetId, catalog: &Catalog) -> Mask {
        catalog.get(id).map_or(0, |set| set.clip(self.mask(id)))
    }

    /// Select every component of a set.
    pub fn set_all(&mut self, id: SetId, catalog: &Catalog) -> Result<()> {
        let set = lookup(catalog, id)?;
        self.masks.insert(id, set.all_mask());
        Ok(())
    }

    /// Deselect every component of a set.
    pub fn clear_all(&mut self, id: SetId) {
        self.masks.insert(id, 0);
    }

    /// Flip one component bit of a set.
    pub fn toggle_bit(&mut self, id: SetId, index: usize, catalog: &Catalog) -> Result<Mask> {
        let bit = component_bit(lookup(catalog, id)?, index)?;
        let mask = self.mask(id) ^ bit;
        self.masks.insert(id, mask);
        Ok(mask)
    }

    /// Set or clear one component bit of a set.
    pub fn set_bit(&mut self, id: SetId, index: usize, checked: bool, catalog: &Catalog) -> Result<Mask> {
        let bit = component_bit(lookup(catalog, id)?, index)?;
        let current = self.mask(id);
        let mask = if checked { current | bit } else { current & !bit };
        self.masks.insert(id, mask);
        Ok(mask)
    }

    /// Remove every entry whose set is flagged hidden in the catalog.
    pub fn purge_hidden(&mut self, catalog: &Catalog) {
        let before = self.masks.len();
        self.masks
            .retain(|id, _| catalog.get(*id).map_or(true, |set| !set.hidden));

        let purged = before - self.masks.len();
        if purged > 0 {
            debug!(purged, "purged hidden set selections");
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.masks.clear();
    }

    /// True if every representable component of the set is selected.
    ///
    /// Sets without components are never fully selected.
    pub fn is_all_selected(&self, id: SetId, catalog: &Catalog) -> bool {
        match catalog.get(id) {
            Some(set) => {
                let all = set.all_mask();
                all != 0 && self.mask(id) & all == all
            }
            None => false,
        }
    }

    /// Names of the selected components of a set, in catalog order.
    pub fn selected_components<'a>(&self, id: SetId, catalog: &'a Catalog) -> Vec<&'a str> {
        let Some(set) = catalog.get(id) else {
            return Vec::new();
        };
        let mask = set.clip(self.mask(id));

        set.components
            .iter()
            .take(MASK_BITS)
            .enumerate()
            .filter(|(i, _)| mask & (1u8 << *i) != 0)
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Entries in ascending id order, including zero masks.
    pub fn iter(&self) -> impl Iterator<Item = (SetId, Mask)> + '_ {
        self.masks.iter().map(|(&id, &mask)| (id, mask))
    }

    /// Number of stored entries, including zero masks.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// True if no entry carries a non-zero mask.
    pub fn is_empty(&self) -> bool {
        self.masks.values().all(|&mask| mask == 0)
    }
}

fn lookup(catalog: &Catalog, id: SetId) -> Result<&CatalogSet> {
    catalog.get(id).ok_or(IdmaskError::UnknownSet(id))
}

/// Bit for a component. Components past the eighth exist but have no bit,
/// so they map to 0 and leave the mask unchanged.
fn component_bit(set: &CatalogSet, index: usize) -> Result<Mask> {
    if index >= set.components.len() {
        return Err(IdmaskError::ComponentOutOfRange {
            set_id: set.id,
            index,
            count: set.components.len(),
        });
    }
    if index >= MASK_BITS {
        debug!(set_id = set.id, index, "component has no mask bit");
        return Ok(0);
    }
    Ok(1u8 << index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let parts = |n: usize| (0..n).map(|i| format!("P{}", i)).collect::<Vec<_>>();
        Catalog::from_sets(vec![
            CatalogSet::new(1, "Trio", parts(3), false),
            CatalogSet::new(2, "Vaulted", parts(4), true),
            CatalogSet::new(3, "Eight", parts(8), false),
            CatalogSet::new(4, "Ten", parts(10), false),
            CatalogSet::new(5, "Empty", parts(0), false),
        ])
    }

    #[test]
    fn test_set_all() {
        let catalog = catalog();
        let mut selection = SelectionState::new();

        selection.set_all(1, &catalog).unwrap();
        selection.set_all(3, &catalog).unwrap();
        selection.set_all(4, &catalog).unwrap();

        assert_eq!(selection.mask(1), 0b111);
        assert_eq!(selection.mask(3), 0xFF);
        assert_eq!(selection.mask(4), 0xFF);
        assert_eq!(selection.set_all(42, &catalog), Err(IdmaskError::UnknownSet(42)));
    }

    #[test]
    fn test_clear_all_equivalent_to_absent() {
        let catalog = catalog();
        let mut selection = SelectionState::new();
        selection.set_all(1, &catalog).unwrap();
        selection.clear_all(1);

        assert_eq!(selection.mask(1), 0);
        assert!(selection.is_empty());
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_toggle_bit() {
        let catalog = catalog();
        let mut selection = SelectionState::new();

        assert_eq!(selection.toggle_bit(1, 2, &catalog).unwrap(), 0b100);
        assert_eq!(selection.toggle_bit(1, 0, &catalog).unwrap(), 0b101);
        assert_eq!(selection.toggle_bit(1, 2, &catalog).unwrap(), 0b001);
    }

    #[test]
    fn test_toggle_bit_bounds() {
        let catalog = catalog();
        let mut selection = SelectionState::new();

        assert_eq!(
            selection.toggle_bit(1, 3, &catalog),
            Err(IdmaskError::ComponentOutOfRange { set_id: 1, index: 3, count: 3 })
        );
        assert_eq!(
            selection.toggle_bit(4, 10, &catalog),
            Err(IdmaskError::ComponentOutOfRange { set_id: 4, index: 10, count: 10 })
        );
        assert_eq!(selection.toggle_bit(4, 7, &catalog).unwrap(), 0x80);
    }

    #[test]
    fn test_components_past_eighth_leave_mask_alone() {
        let catalog = catalog();
        let mut selection = SelectionState::new();
        selection.insert(4, 0b101);

        assert_eq!(selection.toggle_bit(4, 8, &catalog).unwrap(), 0b101);
        assert_eq!(selection.toggle_bit(4, 9, &catalog).unwrap(), 0b101);
        assert_eq!(selection.set_bit(4, 9, true, &catalog).unwrap(), 0b101);
        assert_eq!(selection.set_bit(4, 8, false, &catalog).unwrap(), 0b101);
        assert_eq!(selection.mask(4), 0b101);
    }

    #[test]
    fn test_set_bit() {
        let catalog = catalog();
        let mut selection = SelectionState::new();

        selection.set_bit(3, 1, true, &catalog).unwrap();
        selection.set_bit(3, 1, true, &catalog).unwrap();
        assert_eq!(selection.mask(3), 0b10);

        selection.set_bit(3, 1, false, &catalog).unwrap();
        assert_eq!(selection.mask(3), 0);
    }

    #[test]
    fn test_purge_hidden() {
        let catalog = catalog();
        let mut selection = SelectionState::new();
        selection.insert(1, 0x01);
        selection.insert(2, 0x03);
        selection.insert(99, 0x01);

        selection.purge_hidden(&catalog);

        assert_eq!(selection.mask(1), 0x01);
        assert_eq!(selection.mask(2), 0);
        // Unknown sets are left for the encoder to drop
        assert_eq!(selection.mask(99), 0x01);
    }

    #[test]
    fn test_clipped_mask_and_components() {
        let catalog = catalog();
        let mut selection = SelectionState::new();
        selection.insert(1, 0b1111_1010);

        assert_eq!(selection.clipped_mask(1, &catalog), 0b010);
        assert_eq!(selection.selected_components(1, &catalog), vec!["P1"]);
        assert_eq!(selection.clipped_mask(99, &catalog), 0);
        assert!(selection.selected_components(99, &catalog).is_empty());
    }

    #[test]
    fn test_is_all_selected() {
        let catalog = catalog();
        let mut selection = SelectionState::new();

        selection.insert(1, 0b1111_1111);
        assert!(selection.is_all_selected(1, &catalog));

        selection.insert(1, 0b011);
        assert!(!selection.is_all_selected(1, &catalog));

        selection.insert(5, 0xFF);
        assert!(!selection.is_all_selected(5, &catalog));
    }

    #[test]
    fn test_clear() {
        let catalog = catalog();
        let mut selection = SelectionState::new();
        selection.set_all(1, &catalog).unwrap();
        selection.set_all(3, &catalog).unwrap();

        selection.clear();
        assert_eq!(selection.len(), 0);
    }
}
