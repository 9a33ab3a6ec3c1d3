//! Inventory domain module.
//!
//! This crate contains the stock ledger rules, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod catalog;
pub mod entry;
pub mod ledger;
pub mod outcome;

pub use catalog::Catalog;
pub use entry::{Direction, LedgerCommand, LedgerEvent, StockEntry, positive_amount};
pub use ledger::{Entries, Ledger};
pub use outcome::{AdjustOutcome, LedgerEntry, UpsertOutcome};
