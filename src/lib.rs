//! idmask - shareable component-ownership tokens
//!
//! This crate stores which components of a catalog of sets a user owns in a
//! short, URL-safe token instead of in server-side storage. The selection is
//! a sparse mapping from set id to an 8-bit component mask.
//!
//! # Quick Start
//!
//! ```
//! use idmask::{decode_token, encode_token, Catalog, SelectionState};
//!
//! let catalog = Catalog::from_json(r#"[
//!     {"id": 7, "name": "Ash Prime", "component_type": ["Blueprint", "Chassis", "Neuroptics"], "vaulted": false}
//! ]"#)?;
//!
//! let mut selection = SelectionState::new();
//! selection.toggle_bit(7, 0, &catalog)?;
//! selection.toggle_bit(7, 2, &catalog)?;
//!
//! let token = encode_token(&selection, &catalog, false);
//! assert!(token.starts_with("b2:idmask:"));
//!
//! let restored = decode_token(&token);
//! assert_eq!(restored.selected_components(7, &catalog), vec!["Blueprint", "Neuroptics"]);
//! # Ok::<(), idmask::IdmaskError>(())
//! ```
//!
//! # Token Format
//!
//! `b2:idmask:` followed by unpadded URL-safe base64 of the payload. The
//! payload is a plain run of entries:
//!
//! | Field | Size | Description |
//! |-------|------|-------------|
//! | id    | 1+ bytes | Set id, unsigned LEB128 |
//! | mask  | 1 byte | Component bitmap, bit i = component i |
//!
//! There is no count or terminator. Entries are written in ascending id order.
//! Masks are clipped to the set's component count, and entries for unknown
//! sets, empty masks and (unless included) hidden sets are left out.
//!
//! # Error Handling
//!
//! Decoding never fails: a bad prefix or base64 body gives an empty selection
//! and a truncated payload keeps the entries read so far. Use
//! [`decode_token_with_policy`] with [`PartialDecodePolicy::Strict`] to get the
//! fault as an [`IdmaskError`] instead.

// Re-export main encoding functions
pub use crate::core::{encode_token, encode_payload};

// Re-export main decoding functions
pub use crate::core::{decode_token, decode_token_with_policy, inspect_token, PartialDecodePolicy, TokenReport};

// Re-export link helpers
pub use crate::link::{page_path, share_url, source_link, token_from_path, token_from_url};

// Re-export public types
pub use catalog::Catalog;
pub use config::Preferences;
pub use error::{IdmaskError, MalformedKind, Result};
pub use selection::SelectionState;
pub use session::Session;
pub use types::{CatalogSet, Mask, SetId, MASK_BITS, TOKEN_PREFIX};

// Module declarations
pub mod error;
pub mod types;
pub mod core;
pub mod catalog;
pub mod config;
pub mod selection;
pub mod session;
pub mod link;
