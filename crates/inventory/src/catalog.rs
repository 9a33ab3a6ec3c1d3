use std::collections::BTreeSet;

use stockroom_core::{DomainError, DomainResult, ItemKey};

/// Name-only stock list: tracks which items exist, not how many.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    names: BTreeSet<ItemKey>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name. An already-present name is reported as `Duplicate` and nothing changes.
    pub fn add(&mut self, raw_name: &str) -> DomainResult<ItemKey> {
        let key = ItemKey::parse(raw_name)?;
        if self.names.contains(&key) {
            return Err(DomainError::duplicate(key.into_inner()));
        }
        self.names.insert(key.clone());
        Ok(key)
    }

    pub fn remove(&mut self, raw_name: &str) -> DomainResult<ItemKey> {
        let key = ItemKey::parse(raw_name)?;
        if !self.names.remove(&key) {
            return Err(DomainError::not_found(key.into_inner()));
        }
        Ok(key)
    }

    pub fn list_sorted(&self) -> impl ExactSizeIterator<Item = &ItemKey> + Clone + '_ {
        self.names.iter()
    }

    pub fn contains(&self, raw_name: &str) -> bool {
        ItemKey::parse(raw_name).is_ok_and(|key| self.names.contains(&key))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
