use std::collections::BTreeMap;
use std::collections::btree_map;

use stockroom_core::{Aggregate, DomainResult, ItemKey};

use crate::entry::{Direction, LedgerCommand, LedgerEvent, StockEntry, positive_amount};
use crate::outcome::{AdjustOutcome, LedgerEntry, UpsertOutcome};

/// In-memory quantity ledger (one per session).
///
/// Keys are kept in a `BTreeMap`, so every read is already in ascending key order.
/// Stored quantities are never zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: BTreeMap<ItemKey, u64>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the entry for `raw_name`, creating it if absent.
    pub fn upsert_or_merge(
        &mut self,
        raw_name: &str,
        amount: i64,
    ) -> DomainResult<UpsertOutcome> {
        let event = self.execute(raw_name, LedgerCommand::UpsertOrMerge { amount })?;
        Ok(UpsertOutcome::from_event(&event))
    }

    /// Receive or issue `delta` units of an existing entry.
    ///
    /// An issue that brings the quantity to exactly zero removes the entry.
    pub fn adjust(
        &mut self,
        raw_name: &str,
        delta: i64,
        direction: Direction,
    ) -> DomainResult<AdjustOutcome> {
        let event = self.execute(raw_name, LedgerCommand::Adjust { delta, direction })?;
        Ok(AdjustOutcome::from_event(
            &event,
            direction,
            positive_amount(delta, "amount")?,
        ))
    }

    /// Remove an entry regardless of its quantity. Returns what was removed.
    pub fn remove(&mut self, raw_name: &str) -> DomainResult<LedgerEntry> {
        let event = self.execute(raw_name, LedgerCommand::Remove)?;
        let quantity = match event {
            LedgerEvent::EntryRemoved { quantity, .. } => quantity,
            _ => 0,
        };
        Ok(LedgerEntry {
            key: event.key().clone(),
            quantity,
        })
    }

    /// Entries in ascending key order. Each call starts a fresh pass.
    pub fn list_sorted(&self) -> Entries<'_> {
        Entries {
            inner: self.entries.iter(),
        }
    }

    pub fn get(&self, raw_name: &str) -> Option<u64> {
        let key = ItemKey::parse(raw_name).ok()?;
        self.entries.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn execute(&mut self, raw_name: &str, command: LedgerCommand) -> DomainResult<LedgerEvent> {
        let key = ItemKey::parse(raw_name)?;
        let current = self.entries.get(&key).copied();
        let entry = StockEntry::rehydrate(key, current, 0);

        let event = entry.handle(&command)?;
        self.commit(&event);
        Ok(event)
    }

    fn commit(&mut self, event: &LedgerEvent) {
        match event.quantity_after() {
            Some(quantity) => {
                self.entries.insert(event.key().clone(), quantity);
            }
            None => {
                self.entries.remove(event.key());
            }
        }
    }
}

/// Sorted iterator over ledger entries.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    inner: btree_map::Iter<'a, ItemKey, u64>,
}

impl Iterator for Entries<'_> {
    type Item = LedgerEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, quantity)| LedgerEntry {
            key: key.clone(),
            quantity: *quantity,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}
