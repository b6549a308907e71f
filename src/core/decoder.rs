//! Token decoding.
//!
//! Decoding is best-effort by default: a corrupted or hand-edited token loses
//! data silently instead of failing. The strict policy exists for tooling that
//! wants to know why a token was rejected.

use tracing::{debug, trace, warn};

use crate::core::{base64url, varint};
use crate::error::{IdmaskError, MalformedKind, Result};
use crate::selection::SelectionState;
use crate::types::{Mask, SetId, TOKEN_PREFIX};

/// What to do when a token is malformed part way through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialDecodePolicy {
    /// Keep every entry parsed before the fault. A bad prefix or base64 body
    /// yields an empty selection.
    #[default]
    KeepPrefix,
    /// Report the fault as an error.
    Strict,
}

/// Result of walking a token payload entry by entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenReport {
    /// Raw payload bytes after base64 decoding
    pub payload: Vec<u8>,
    /// Entries in payload order, repeats included
    pub entries: Vec<(SetId, Mask)>,
    /// Why parsing stopped early, if it did
    pub fault: Option<MalformedKind>,
}

impl TokenReport {
    /// Hex view of the payload.
    pub fn payload_hex(&self) -> String {
        hex::encode(&self.payload)
    }

    /// True if the whole payload was consumed.
    pub fn is_complete(&self) -> bool {
        self.fault.is_none()
    }

    /// Fold the entries into a selection; later repeats overwrite earlier ones.
    pub fn to_selection(&self) -> SelectionState {
        let mut selection = SelectionState::new();
        for &(id, mask) in &self.entries {
            selection.insert(id, mask);
        }
        selection
    }
}

/// Decode a token into a selection, never failing.
///
/// Masks are stored as found in the token. Clipping against the catalog is left
/// to the consumer since the catalog may not be loaded yet.
///
/// # Examples
///
/// ```
/// use idmask::decode_token;
///
/// let selection = decode_token("b2:idmask:AQM");
/// assert_eq!(selection.mask(1), 0b11);
///
/// assert!(decode_token("").is_empty());
/// assert!(decode_token("not-the-prefix").is_empty());
/// ```
pub fn decode_token(token: &str) -> SelectionState {
    match decode_token_with_policy(token, PartialDecodePolicy::KeepPrefix) {
        Ok(selection) => selection,
        Err(_) => SelectionState::new(),
    }
}

/// Decode a token under an explicit policy.
pub fn decode_token_with_policy(token: &str, policy: PartialDecodePolicy) -> Result<SelectionState> {
    let report = match inspect_token(token) {
        Ok(report) => report,
        Err(err) => {
            return match policy {
                PartialDecodePolicy::KeepPrefix => {
                    if !token.is_empty() {
                        warn!(error = %err, "ignoring unreadable token");
                    }
                    Ok(SelectionState::new())
                }
                PartialDecodePolicy::Strict => Err(err),
            };
        }
    };

    if let Some(fault) = report.fault {
        match policy {
            PartialDecodePolicy::KeepPrefix => {
                warn!(%fault, kept = report.entries.len(), "token truncated, keeping parsed entries");
            }
            PartialDecodePolicy::Strict => return Err(IdmaskError::MalformedInput(fault)),
        }
    }

    let selection = report.to_selection();
    debug!(entries = selection.len(), "decoded selection token");
    Ok(selection)
}

/// Parse a token into its payload and entries without applying any policy.
///
/// Fails only when the prefix is missing or the body is not base64; faults
/// inside the payload are recorded in [`TokenReport::fault`].
pub fn inspect_token(token: &str) -> Result<TokenReport> {
    let body = token
        .strip_prefix(TOKEN_PREFIX)
        .ok_or(IdmaskError::MalformedInput(MalformedKind::MissingPrefix))?;
    let payload = base64url::decode(body)?;
    let (entries, fault) = parse_entries(&payload);

    Ok(TokenReport {
        payload,
        entries,
        fault,
    })
}

/// Walk `varint(id) || mask` entries until the payload is exhausted.
fn parse_entries(payload: &[u8]) -> (Vec<(SetId, Mask)>, Option<MalformedKind>) {
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset < payload.len() {
        let start = offset;
        let (id, next) = varint::decode(payload, offset);
        let Some(id) = id else {
            return (entries, Some(MalformedKind::TruncatedVarint { offset: start }));
        };
        let Some(&mask) = payload.get(next) else {
            return (entries, Some(MalformedKind::MissingMask { offset: next }));
        };
        offset = next + 1;

        // No set id is wider than 32 bits; skip the entry, keep the rest
        let Ok(id) = SetId::try_from(id) else {
            warn!(id, offset = start, "dropping entry with out-of-range set id");
            continue;
        };
        trace!(id, mask, offset = start, "decoded entry");
        entries.push((id, mask));
    }

    (entries, None)
}
