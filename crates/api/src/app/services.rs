use std::sync::Arc;

use stockroom_infra::{
    AppConfig, InMemoryTable, RemoteLedger, RestTableClient, TableClient, TableError,
};

use crate::context::SessionStore;

/// Type-erased table client (REST in production, in-memory in dev/test).
pub type StockTable = Arc<dyn TableClient>;

/// Shared state behind every route.
pub struct AppServices {
    sessions: SessionStore,
    store: RemoteLedger<StockTable>,
    store_label: String,
}

impl AppServices {
    pub fn new(sessions: SessionStore, table: StockTable, store_label: impl Into<String>) -> Self {
        Self {
            sessions,
            store: RemoteLedger::new(table),
            store_label: store_label.into(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn store(&self) -> &RemoteLedger<StockTable> {
        &self.store
    }

    /// Where the shared stock lives, for the page footer.
    pub fn store_label(&self) -> &str {
        &self.store_label
    }
}

/// Wire services from configuration.
///
/// Without `STOCKROOM_TABLE_URL` the shared pages run against an in-memory table that
/// is lost on restart.
pub fn build_services(config: &AppConfig) -> Result<AppServices, TableError> {
    let (table, label): (StockTable, String) = match &config.store {
        Some(store) => {
            let client = RestTableClient::new(store)?;
            tracing::info!(endpoint = client.endpoint(), "using remote stock table");
            let label = format!("Stored in the remote table \"{}\".", store.table);
            (Arc::new(client), label)
        }
        None => {
            tracing::warn!("STOCKROOM_TABLE_URL not set; shared stock is kept in memory");
            (
                Arc::new(InMemoryTable::new()),
                "Stored in server memory (STOCKROOM_TABLE_URL not set).".to_string(),
            )
        }
    };

    Ok(AppServices::new(SessionStore::new(), table, label))
}
