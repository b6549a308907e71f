//! Token encoding.
//!
//! This module provides the main API for turning a selection into a token.

use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::core::{base64url, varint};
use crate::selection::SelectionState;
use crate::types::{SetId, Mask, TOKEN_PREFIX};

/// Build the binary payload for a selection.
///
/// Entries are emitted in ascending id order as `varint(id) || mask`. An
/// entry is skipped when its set is unknown to the catalog, when it is hidden
/// and `include_hidden` is off, or when nothing is left of its mask after
/// clipping to the set's component count.
pub fn encode_payload(selection: &SelectionState, catalog: &Catalog, include_hidden: bool) -> Vec<u8> {
    let mut payload = Vec::with_capacity(selection.len() * 2);

    for (id, mask) in encodable_entries(selection, catalog, include_hidden) {
        trace!(id, mask, "encoding entry");
        varint::encode_into(id as u64, &mut payload);
        payload.push(mask);
    }

    payload
}

/// Encode a selection into a `b2:idmask:` token.
///
/// # Examples
///
/// ```
/// use idmask::{encode_token, Catalog, CatalogSet, SelectionState};
///
/// let catalog = Catalog::from_sets(vec![CatalogSet::new(
///     1,
///     "Ash Prime",
///     vec!["Blueprint".into(), "Chassis".into()],
///     false,
/// )]);
/// let mut selection = SelectionState::new();
/// selection.set_all(1, &catalog).unwrap();
///
/// assert_eq!(encode_token(&selection, &catalog, false), "b2:idmask:AQM");
/// ```
pub fn encode_token(selection: &SelectionState, catalog: &Catalog, include_hidden: bool) -> String {
    let payload = encode_payload(selection, catalog, include_hidden);
    let token = format!("{}{}", TOKEN_PREFIX, base64url::encode(&payload));

    debug!(
        entries = selection.len(),
        payload_bytes = payload.len(),
        include_hidden,
        "encoded selection token"
    );

    token
}

/// Entries that survive filtering and clipping, with their clipped masks.
pub fn encodable_entries<'a>(
    selection: &'a SelectionState,
    catalog: &'a Catalog,
    include_hidden: bool,
) -> impl Iterator<Item = (SetId, Mask)> + 'a {
    selection.iter().filter_map(move |(id, mask)| {
        if mask == 0 {
            return None;
        }
        let set = catalog.get(id)?;
        if set.hidden && !include_hidden {
            return None;
        }
        match set.clip(mask) {
            0 => None,
            clipped => Some((id, clipped)),
        }
    })
}
