//! URL-safe base64 without padding.
//!
//! Encoding is standard base64 with `+` and `/` replaced by `-` and `_` and the
//! trailing `=` stripped. Decoding reverses the substitution, restores the
//! padding and decodes with the standard alphabet.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::{IdmaskError, MalformedKind, Result};

/// Standard alphabet, tolerant of non-zero trailing bits in the final group.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Encode bytes as unpadded URL-safe base64.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded URL-safe base64.
///
/// A body whose length leaves a remainder of 1 modulo 4 can never be valid
/// and is rejected before decoding.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let mut standard: String = text
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    match standard.len() % 4 {
        0 => {}
        1 => return Err(IdmaskError::MalformedInput(MalformedKind::InvalidBase64)),
        rem => standard.extend(std::iter::repeat('=').take(4 - rem)),
    }

    Ok(LENIENT_STANDARD.decode(standard.as_bytes())?)
}
