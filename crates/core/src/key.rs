//! Canonical item key.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Canonical item name: trimmed and uppercased.
///
/// Raw inputs that normalize to the same string refer to the same ledger entry.
/// Ordering is plain lexical ordering of the canonical string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    /// Normalize a raw name. Blank input is rejected.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let canonical = raw.trim().to_uppercase();
        if canonical.is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ValueObject for ItemKey {}

impl AsRef<str> for ItemKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Deserialization goes through `parse` so a key read from outside is always canonical.
impl<'de> Deserialize<'de> for ItemKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ItemKey::parse(&raw).map_err(serde::de::Error::custom)
    }
}
