//! Infrastructure layer: table store clients, the remote ledger, configuration.

pub mod config;
pub mod remote;
pub mod table;

pub use config::{AppConfig, ConfigError, StoreConfig};
pub use remote::{LedgerError, RemoteLedger};
pub use table::{InMemoryTable, RestTableClient, TableClient, TableError};
