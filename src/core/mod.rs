//! Core token encoding and decoding functionality.
//!
//! This module contains the byte-level pieces of the token format:
//! - Unsigned LEB128 varints for set ids
//! - URL-safe unpadded base64 for the payload
//! - Encoding a selection into a token and decoding it back
//! - The legacy compact id-set encoding

pub mod varint;
pub mod base64url;
pub mod encoder;
pub mod decoder;
pub mod idset;

// Re-export main functionality
pub use encoder::{encode_token, encode_payload, encodable_entries};
pub use decoder::{decode_token, decode_token_with_policy, inspect_token, PartialDecodePolicy, TokenReport};
pub use idset::{encode_compact, decode_compact};
