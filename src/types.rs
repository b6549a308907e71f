//! Core data structures shared by the codec, catalog and selection state.

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a set in the catalog.
pub type SetId = u32;

/// Per-set component bitmap. Bit `i` marks ownership of component `i`.
pub type Mask = u8;

/// Literal prefix every token starts with.
pub const TOKEN_PREFIX: &str = "b2:idmask:";

/// Number of components a single mask byte can represent.
pub const MASK_BITS: usize = 8;

/// A named set with an ordered list of components, as served by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSet {
    /// Unique set identifier
    pub id: SetId,
    /// Display name
    pub name: String,
    /// Optional category (weapon, warframe, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Component names; index `i` maps to mask bit `i`
    #[serde(rename = "component_type", alias = "componentNames", default)]
    pub components: Vec<String>,
    /// Excluded from display and encoding unless hidden sets are included
    #[serde(rename = "vaulted", alias = "hidden", default, deserialize_with = "deserialize_flag")]
    pub hidden: bool,
}

impl CatalogSet {
    /// Create a new catalog set.
    pub fn new(id: SetId, name: impl Into<String>, components: Vec<String>, hidden: bool) -> Self {
        Self {
            id,
            name: name.into(),
            kind: None,
            components,
            hidden,
        }
    }

    /// Number of mask bits this set can use (at most 8).
    pub fn bit_count(&self) -> usize {
        self.components.len().min(MASK_BITS)
    }

    /// Mask with every representable component bit set.
    pub fn all_mask(&self) -> Mask {
        low_bits(self.components.len())
    }

    /// Discard bits beyond the set's component count.
    pub fn clip(&self, mask: Mask) -> Mask {
        mask & low_bits(self.bit_count())
    }

    /// Name shown to users; hidden sets are marked as vaulted.
    pub fn display_name(&self) -> String {
        if self.hidden {
            format!("{} (Vaulted)", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Mask with the lowest `count` bits set, saturating at a full byte.
pub fn low_bits(count: usize) -> Mask {
    if count >= MASK_BITS {
        0xFF
    } else {
        ((1u16 << count) - 1) as Mask
    }
}

/// The hidden flag arrives as a JSON bool or as a 0/1 database integer.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
        Flag::Null(()) => false,
    })
}
