//! Quantity ledger backed by a remote stock table.
//!
//! Every mutation is read → decide → conditional write. Writes are guarded by the row
//! `version` column, so two writers racing on the same item cannot silently lose an
//! update: the loser gets `DomainError::Conflict` and nothing is written.

use std::collections::BTreeMap;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use stockroom_core::{Aggregate, DomainError, ExpectedVersion, ItemKey};
use stockroom_inventory::{
    AdjustOutcome, Direction, LedgerCommand, LedgerEntry, LedgerEvent, StockEntry,
    UpsertOutcome, positive_amount,
};

use crate::table::{Column, Filter, StockRecord, TableClient, TableError};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("table store failure: {0}")]
    Store(#[from] TableError),
}

/// Current stored state of one key.
struct Loaded {
    entry: StockEntry,
    /// Version of the physical row; a row may exist holding a stale zero.
    expected: ExpectedVersion,
}

#[derive(Debug)]
pub struct RemoteLedger<C> {
    client: C,
}

impl<C> RemoteLedger<C>
where
    C: TableClient,
{
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub async fn upsert_or_merge(
        &self,
        raw_name: &str,
        amount: i64,
    ) -> Result<UpsertOutcome, LedgerError> {
        let event = self
            .execute(raw_name, LedgerCommand::UpsertOrMerge { amount })
            .await?;
        Ok(UpsertOutcome::from_event(&event))
    }

    pub async fn adjust(
        &self,
        raw_name: &str,
        delta: i64,
        direction: Direction,
    ) -> Result<AdjustOutcome, LedgerError> {
        let event = self
            .execute(raw_name, LedgerCommand::Adjust { delta, direction })
            .await?;
        Ok(AdjustOutcome::from_event(
            &event,
            direction,
            positive_amount(delta, "amount")?,
        ))
    }

    pub async fn remove(&self, raw_name: &str) -> Result<LedgerEntry, LedgerError> {
        let event = self.execute(raw_name, LedgerCommand::Remove).await?;
        let quantity = match event {
            LedgerEvent::EntryRemoved { quantity, .. } => quantity,
            _ => 0,
        };
        Ok(LedgerEntry {
            key: event.key().clone(),
            quantity,
        })
    }

    /// All present entries in ascending key order.
    ///
    /// Rows that would break the ledger invariants (blank names, non-positive quantities,
    /// names that collide after normalization) are skipped and logged.
    pub async fn list_sorted(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        let records = self.client.select_all_ordered_by(Column::Name).await?;

        let mut entries: BTreeMap<ItemKey, u64> = BTreeMap::new();
        for record in records {
            let Ok(key) = ItemKey::parse(&record.name) else {
                warn!(name = %record.name, "skipping stock row with blank name");
                continue;
            };
            let quantity = match u64::try_from(record.quantity) {
                Ok(q) if q > 0 => q,
                _ => {
                    warn!(
                        key = %key,
                        quantity = record.quantity,
                        "skipping stock row with non-positive quantity"
                    );
                    continue;
                }
            };
            if entries.contains_key(&key) {
                warn!(key = %key, "skipping duplicate stock row");
                continue;
            }
            entries.insert(key, quantity);
        }

        Ok(entries
            .into_iter()
            .map(|(key, quantity)| LedgerEntry { key, quantity })
            .collect())
    }

    async fn execute(
        &self,
        raw_name: &str,
        command: LedgerCommand,
    ) -> Result<LedgerEvent, LedgerError> {
        let key = ItemKey::parse(raw_name)?;
        let loaded = self.load(key).await?;

        let event = match loaded.entry.handle(&command) {
            Ok(event) => event,
            Err(e) => {
                debug!(key = %loaded.entry.key(), error = %e, "stock command rejected");
                return Err(e.into());
            }
        };

        self.persist(&event, loaded.expected).await?;
        info!(
            event = event.event_type(),
            key = %event.key(),
            quantity = ?event.quantity_after(),
            "stock row written"
        );
        Ok(event)
    }

    async fn load(&self, key: ItemKey) -> Result<Loaded, LedgerError> {
        let rows = self
            .client
            .select_where(&Filter::eq(Column::Name, key.as_str()))
            .await?;

        if rows.len() > 1 {
            warn!(
                key = %key,
                rows = rows.len(),
                "multiple stock rows share a name; using the first"
            );
        }

        let row = rows.into_iter().next();
        let version = row.as_ref().map(|r| u64::try_from(r.version).unwrap_or(0));
        let entry = match row {
            None => StockEntry::absent(key),
            Some(row) => {
                let quantity = u64::try_from(row.quantity).ok();
                StockEntry::rehydrate(key, quantity, version.unwrap_or(0))
            }
        };

        Ok(Loaded {
            entry,
            expected: ExpectedVersion::from_stored(version),
        })
    }

    async fn persist(
        &self,
        event: &LedgerEvent,
        expected: ExpectedVersion,
    ) -> Result<(), LedgerError> {
        let key = event.key();

        match (event.quantity_after(), expected) {
            (Some(quantity), ExpectedVersion::Absent) => {
                let record = Self::record(key, quantity, expected.next())?;
                match self.client.insert(&record).await {
                    Ok(()) => Ok(()),
                    Err(TableError::Duplicate(_)) => Err(conflict(key)),
                    Err(e) => Err(e.into()),
                }
            }
            (Some(quantity), ExpectedVersion::Exact(current)) => {
                let record = Self::record(key, quantity, expected.next())?;
                let changed = self.client.update(&record, &guard(key, current)).await?;
                expect_one(changed, key)
            }
            (None, ExpectedVersion::Exact(current)) => {
                let deleted = self.client.delete(&guard(key, current)).await?;
                expect_one(deleted, key)
            }
            // No stored row and nothing left to store.
            (None, ExpectedVersion::Absent) => Ok(()),
        }
    }

    fn record(key: &ItemKey, quantity: u64, version: u64) -> Result<StockRecord, LedgerError> {
        let out_of_range = |what: &str| {
            DomainError::validation(format!("{what} of {key} exceeds the table's range"))
        };
        let quantity = i64::try_from(quantity).map_err(|_| out_of_range("quantity"))?;
        let version = i64::try_from(version).map_err(|_| out_of_range("version"))?;
        Ok(StockRecord {
            name: key.as_str().to_string(),
            quantity,
            version,
            updated_at: Some(Utc::now()),
        })
    }
}

fn guard(key: &ItemKey, version: u64) -> Filter {
    Filter::eq(Column::Name, key.as_str()).and_eq(Column::Version, version)
}

fn conflict(key: &ItemKey) -> LedgerError {
    warn!(key = %key, "stock row changed concurrently");
    DomainError::conflict(format!("{key} was changed by someone else; reload and try again")).into()
}

fn expect_one(affected: u64, key: &ItemKey) -> Result<(), LedgerError> {
    if affected == 0 {
        return Err(conflict(key));
    }
    Ok(())
}
