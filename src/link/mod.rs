//! Page URL handling for tokens.
//!
//! This module contains the URL-facing side of a selection:
//! - Locating a token in a page URL or path
//! - Building the page path and shareable URL for a token
//! - Building per-component source lookup links

pub mod utils;

// Re-export main functionality
pub use utils::{page_path, share_url, source_link, token_from_path, token_from_url};
