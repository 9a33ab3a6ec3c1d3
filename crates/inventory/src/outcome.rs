use serde::Serialize;

use stockroom_core::ItemKey;

use crate::entry::{Direction, LedgerEvent};

/// One present ledger entry. Quantity is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub key: ItemKey,
    pub quantity: u64,
}

/// Result of `upsert_or_merge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    pub entry: LedgerEntry,
    /// `true` when the entry did not exist before; `false` for a merge.
    pub created: bool,
}

impl UpsertOutcome {
    pub fn from_event(event: &LedgerEvent) -> Self {
        Self {
            entry: LedgerEntry {
                key: event.key().clone(),
                quantity: event.quantity_after().unwrap_or_default(),
            },
            created: matches!(event, LedgerEvent::EntryCreated { .. }),
        }
    }
}

/// Result of `adjust`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustOutcome {
    pub key: ItemKey,
    pub direction: Direction,
    pub delta: u64,
    /// Quantity left after the adjustment; `None` when the issue depleted the entry.
    pub remaining: Option<u64>,
}

impl AdjustOutcome {
    pub fn from_event(event: &LedgerEvent, direction: Direction, delta: u64) -> Self {
        Self {
            key: event.key().clone(),
            direction,
            delta,
            remaining: event.quantity_after(),
        }
    }

    pub fn removed(&self) -> bool {
        self.remaining.is_none()
    }
}
