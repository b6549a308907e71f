//! Compact text encoding for a set of integer ids.
//!
//! Two forms are supported and the shorter one is chosen:
//!
//! - `B` + base64url(bitmap): bit `id % 8` of byte `id / 8` is set
//! - `L` + base64url(ascii list): ids joined with `,`
//!
//! Dense sets favour the bitmap, sparse sets with large ids favour the list.

use std::collections::BTreeSet;

use crate::core::base64url;
use crate::error::{IdmaskError, Result};

const BITMAP_TAG: char = 'B';
const LIST_TAG: char = 'L';

/// Encode ids as a bitmap, `B`-tagged. Empty input gives an empty string.
pub fn encode_bitmap(ids: &[u32]) -> String {
    let Some(&max) = ids.iter().max() else {
        return String::new();
    };

    let mut bitmap = vec![0u8; bitmap_len(max)];
    for &id in ids {
        bitmap[(id / 8) as usize] |= 1u8 << (id % 8);
    }

    format!("{}{}", BITMAP_TAG, base64url::encode(&bitmap))
}

/// Encode ids as a comma-separated list, `L`-tagged.
pub fn encode_list(ids: &[u32]) -> String {
    let joined = join_ids(ids);
    format!("{}{}", LIST_TAG, base64url::encode(joined.as_bytes()))
}

/// Encode ids using whichever form is shorter; the bitmap wins ties.
///
/// # Examples
///
/// ```
/// use idmask::core::idset::{decode_compact, encode_compact};
///
/// let dense = encode_compact(&[0, 1, 2, 3, 4, 5, 6, 7]);
/// assert!(dense.starts_with('B'));
///
/// let sparse = encode_compact(&[100_000]);
/// assert!(sparse.starts_with('L'));
/// assert_eq!(decode_compact(&sparse).unwrap(), vec![100_000]);
/// ```
pub fn encode_compact(ids: &[u32]) -> String {
    let unique: Vec<u32> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    let Some(&max) = unique.last() else {
        return String::new();
    };

    let list = encode_list(&unique);
    if list.len() < 1 + base64_len(bitmap_len(max)) {
        list
    } else {
        encode_bitmap(&unique)
    }
}

/// Decode either compact form back into ids.
///
/// A bitmap yields ascending ids. A list yields its ids as written,
/// duplicates and order included.
pub fn decode_compact(text: &str) -> Result<Vec<u32>> {
    let mut chars = text.chars();
    match chars.next() {
        None => Ok(Vec::new()),
        Some(BITMAP_TAG) => {
            let bitmap = base64url::decode(chars.as_str())?;
            Ok(bitmap
                .iter()
                .enumerate()
                .flat_map(|(byte_index, &byte)| {
                    (0..8u32)
                        .filter(move |bit| byte & (1u8 << *bit) != 0)
                        .map(move |bit| byte_index as u32 * 8 + bit)
                })
                .collect())
        }
        Some(LIST_TAG) => {
            let raw = base64url::decode(chars.as_str())?;
            let joined = String::from_utf8(raw)
                .map_err(|_| IdmaskError::InvalidIdSet("list is not ASCII".to_string()))?;
            if joined.is_empty() {
                return Ok(Vec::new());
            }
            joined
                .split(',')
                .map(|part| {
                    part.parse::<u32>()
                        .map_err(|_| IdmaskError::InvalidIdSet(format!("bad id '{}'", part)))
                })
                .collect()
        }
        Some(other) => Err(IdmaskError::InvalidIdSet(format!("unknown tag '{}'", other))),
    }
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

fn bitmap_len(max: u32) -> usize {
    (max as usize) / 8 + 1
}

/// Length of unpadded base64 for `n` bytes.
fn base64_len(n: usize) -> usize {
    (n * 4).div_ceil(3)
}
