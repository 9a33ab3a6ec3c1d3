//! Table-store abstraction for the remote ledger.
//!
//! The store is treated as an opaque synchronous-per-call table service. This module only
//! knows how to select, insert, update and delete stock rows; it performs no schema work.

pub mod in_memory;
pub mod rest;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use in_memory::InMemoryTable;
pub use rest::RestTableClient;

/// One row of the stock table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub name: String,
    pub quantity: i64,
    /// Row version for optimistic concurrency; 1 on insert, +1 per update.
    #[serde(default)]
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StockRecord {
    fn column_value(&self, column: Column) -> String {
        match column {
            Column::Name => self.name.clone(),
            Column::Quantity => self.quantity.to_string(),
            Column::Version => self.version.to_string(),
        }
    }
}

/// Columns that can be filtered or ordered on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Quantity,
    Version,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Quantity => "quantity",
            Column::Version => "version",
        }
    }
}

/// Conjunction of column equality predicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    predicates: Vec<(Column, String)>,
}

impl Filter {
    pub fn eq(column: Column, value: impl ToString) -> Self {
        Self {
            predicates: vec![(column, value.to_string())],
        }
    }

    pub fn and_eq(mut self, column: Column, value: impl ToString) -> Self {
        self.predicates.push((column, value.to_string()));
        self
    }

    pub fn predicates(&self) -> impl Iterator<Item = (Column, &str)> + '_ {
        self.predicates.iter().map(|(c, v)| (*c, v.as_str()))
    }

    pub fn matches(&self, record: &StockRecord) -> bool {
        self.predicates
            .iter()
            .all(|(column, value)| record.column_value(*column) == *value)
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("table request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("table store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("record already exists: {0}")]
    Duplicate(String),

    #[error("failed to decode table response: {0}")]
    Decode(String),

    #[error("table unavailable: {0}")]
    Unavailable(String),
}

/// Minimal table client used by the remote ledger.
#[async_trait::async_trait]
pub trait TableClient: Send + Sync {
    async fn select_all_ordered_by(&self, column: Column) -> Result<Vec<StockRecord>, TableError>;

    async fn select_where(&self, filter: &Filter) -> Result<Vec<StockRecord>, TableError>;

    /// Insert a new row. A row with the same name already present is `Duplicate`.
    async fn insert(&self, record: &StockRecord) -> Result<(), TableError>;

    /// Overwrite matching rows with `record`; returns the number of rows changed.
    async fn update(&self, record: &StockRecord, filter: &Filter) -> Result<u64, TableError>;

    /// Delete matching rows; returns the number of rows deleted.
    async fn delete(&self, filter: &Filter) -> Result<u64, TableError>;
}

#[async_trait::async_trait]
impl<T> TableClient for Arc<T>
where
    T: TableClient + ?Sized,
{
    async fn select_all_ordered_by(&self, column: Column) -> Result<Vec<StockRecord>, TableError> {
        (**self).select_all_ordered_by(column).await
    }

    async fn select_where(&self, filter: &Filter) -> Result<Vec<StockRecord>, TableError> {
        (**self).select_where(filter).await
    }

    async fn insert(&self, record: &StockRecord) -> Result<(), TableError> {
        (**self).insert(record).await
    }

    async fn update(&self, record: &StockRecord, filter: &Filter) -> Result<u64, TableError> {
        (**self).update(record, filter).await
    }

    async fn delete(&self, filter: &Filter) -> Result<u64, TableError> {
        (**self).delete(filter).await
    }
}
