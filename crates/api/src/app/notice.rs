//! User-facing messages shown above the page after a form submission.

use stockroom_core::ItemKey;
use stockroom_inventory::{AdjustOutcome, Direction, LedgerEntry, UpsertOutcome};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub text: String,
}

impl Notice {
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn catalog_added(key: &ItemKey) -> Self {
        Self::new(Level::Success, format!("Added {key}."))
    }

    pub fn catalog_removed(key: &ItemKey) -> Self {
        Self::new(Level::Info, format!("Removed {key}."))
    }

    pub fn upserted(outcome: &UpsertOutcome) -> Self {
        let LedgerEntry { key, quantity } = &outcome.entry;
        if outcome.created {
            Self::new(
                Level::Success,
                format!("Added new item {key} with quantity {quantity}."),
            )
        } else {
            Self::new(
                Level::Success,
                format!("Increased {key}. New quantity: {quantity}."),
            )
        }
    }

    pub fn adjusted(outcome: &AdjustOutcome) -> Self {
        let AdjustOutcome {
            key,
            direction,
            delta,
            remaining,
        } = outcome;

        match (direction, remaining) {
            (Direction::Receive, Some(q)) => Self::new(
                Level::Success,
                format!("Received {delta} of {key}. New quantity: {q}."),
            ),
            (Direction::Issue, Some(q)) => Self::new(
                Level::Info,
                format!("Issued {delta} of {key}. New quantity: {q}."),
            ),
            (_, None) => Self::new(
                Level::Warning,
                format!("Issued {delta} of {key}. {key} reached 0 and was removed."),
            ),
        }
    }

    pub fn removed(entry: &LedgerEntry) -> Self {
        Self::new(
            Level::Info,
            format!(
                "{} was removed from the stockroom ({} discarded).",
                entry.key, entry.quantity
            ),
        )
    }
}
