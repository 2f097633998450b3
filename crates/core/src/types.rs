//! Core type definitions

use serde::{Deserialize, Serialize};

/// Global object identifier (64-bit unsigned)
///
/// Identifies any networked entity (player, creature, item instance,
/// guild, calendar event). The zero value means "no object" and is the
/// common case the packed wire encoding is optimized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Guid(pub u64);

impl Guid {
    pub const EMPTY: Guid = Guid(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Low 32 bits (the per-map entry counter for world objects)
    pub const fn low(&self) -> u32 {
        self.0 as u32
    }

    /// High 32 bits (entity kind and entry id)
    pub const fn high(&self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl From<u64> for Guid {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Account name (String-based)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountName(pub String);

impl AccountName {
    pub fn new(name: String) -> Self {
        Self(name)
    }

    pub fn get(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for AccountName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}
