use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{Column, Filter, StockRecord, TableClient, TableError};

/// In-memory stock table for tests/dev.
///
/// Rows are keyed by `name`, mirroring a unique constraint on that column.
#[derive(Debug, Default)]
pub struct InMemoryTable {
    rows: RwLock<BTreeMap<String, StockRecord>>,
}

impl InMemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = StockRecord>) -> Self {
        let rows = records
            .into_iter()
            .map(|r| (r.name.clone(), r))
            .collect::<BTreeMap<_, _>>();
        Self {
            rows: RwLock::new(rows),
        }
    }

    fn poisoned() -> TableError {
        TableError::Unavailable("in-memory table lock poisoned".to_string())
    }
}

#[async_trait::async_trait]
impl TableClient for InMemoryTable {
    async fn select_all_ordered_by(&self, column: Column) -> Result<Vec<StockRecord>, TableError> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        let mut records: Vec<StockRecord> = rows.values().cloned().collect();
        match column {
            Column::Name => {}
            Column::Quantity => records.sort_by_key(|r| r.quantity),
            Column::Version => records.sort_by_key(|r| r.version),
        }
        Ok(records)
    }

    async fn select_where(&self, filter: &Filter) -> Result<Vec<StockRecord>, TableError> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        Ok(rows.values().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn insert(&self, record: &StockRecord) -> Result<(), TableError> {
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;
        if rows.contains_key(&record.name) {
            return Err(TableError::Duplicate(record.name.clone()));
        }
        rows.insert(record.name.clone(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &StockRecord, filter: &Filter) -> Result<u64, TableError> {
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;
        let matching: Vec<String> = rows
            .values()
            .filter(|r| filter.matches(r))
            .map(|r| r.name.clone())
            .collect();

        for name in &matching {
            rows.remove(name);
            rows.insert(record.name.clone(), record.clone());
        }
        Ok(matching.len() as u64)
    }

    async fn delete(&self, filter: &Filter) -> Result<u64, TableError> {
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;
        let before = rows.len();
        rows.retain(|_, r| !filter.matches(r));
        Ok((before - rows.len()) as u64)
    }
}
