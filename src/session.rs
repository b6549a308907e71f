//! Explicit session state tying catalog, selection and preferences together.
//!
//! Every mutator runs to completion and returns the re-encoded token, which is
//! what the page writes back into its URL.

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::Preferences;
use crate::core::{decode_token, encode_token};
use crate::error::Result;
use crate::link;
use crate::selection::SelectionState;
use crate::types::SetId;

/// One user's working state for the lifetime of a page.
#[derive(Debug, Clone, Default)]
pub struct Session {
    catalog: Catalog,
    selection: SelectionState,
    prefs: Preferences,
}

impl Session {
    /// Start with an empty catalog and selection.
    pub fn new(prefs: Preferences) -> Self {
        Self {
            catalog: Catalog::default(),
            selection: SelectionState::new(),
            prefs,
        }
    }

    /// Install a freshly loaded catalog and restore the selection from the
    /// page path. Hidden sets are purged unless the preference includes them.
    pub fn load_catalog(&mut self, catalog: Catalog, page_path: &str) -> String {
        self.catalog = catalog;
        self.selection = match link::token_from_path(page_path) {
            Some(token) => decode_token(&token),
            None => SelectionState::new(),
        };
        if !self.prefs.include_hidden {
            self.selection.purge_hidden(&self.catalog);
        }
        info!(
            sets = self.catalog.len(),
            restored = self.selection.len(),
            "catalog loaded"
        );
        self.token()
    }

    /// Change the hidden-set preference. Switching it off drops hidden selections.
    pub fn set_include_hidden(&mut self, include_hidden: bool) -> String {
        let was_included = self.prefs.include_hidden;
        self.prefs.include_hidden = include_hidden;
        if was_included && !include_hidden {
            self.selection.purge_hidden(&self.catalog);
        }
        debug!(include_hidden, "hidden-set preference changed");
        self.token()
    }

    /// Flip one component of a set.
    pub fn toggle(&mut self, id: SetId, index: usize) -> Result<String> {
        self.selection.toggle_bit(id, index, &self.catalog)?;
        Ok(self.token())
    }

    /// Check or uncheck one component of a set.
    pub fn set_part(&mut self, id: SetId, index: usize, checked: bool) -> Result<String> {
        self.selection.set_bit(id, index, checked, &self.catalog)?;
        Ok(self.token())
    }

    /// Check every component of a set.
    pub fn select_all(&mut self, id: SetId) -> Result<String> {
        self.selection.set_all(id, &self.catalog)?;
        Ok(self.token())
    }

    /// Uncheck every component of a set.
    pub fn deselect_all(&mut self, id: SetId) -> String {
        self.selection.clear_all(id);
        self.token()
    }

    /// Drop the whole selection.
    pub fn clear(&mut self) -> String {
        self.selection.clear();
        self.token()
    }

    /// Token for the current selection under the current preference.
    pub fn token(&self) -> String {
        encode_token(&self.selection, &self.catalog, self.prefs.include_hidden)
    }

    /// Path the page URL is rewritten to.
    pub fn page_path(&self) -> String {
        link::page_path(&self.token())
    }

    /// Shareable URL rooted at `base`.
    pub fn share_url(&self, base: &str) -> Result<String> {
        link::share_url(base, &self.token())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }
}
