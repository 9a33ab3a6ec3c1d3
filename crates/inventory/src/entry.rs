use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockroom_core::{Aggregate, AggregateRoot, DomainError, DomainResult, ItemKey};

/// Direction of a quantity adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Goods received: quantity increases.
    Receive,
    /// Goods issued: quantity decreases, never below zero.
    Issue,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Receive => "receive",
            Direction::Issue => "issue",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "receive" => Ok(Direction::Receive),
            "issue" => Ok(Direction::Issue),
            other => Err(DomainError::validation(format!(
                "direction must be receive or issue (got {other:?})"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    UpsertOrMerge { amount: i64 },
    Adjust { delta: i64, direction: Direction },
    Remove,
}

/// What a command did to one entry.
///
/// `quantity` fields always hold the quantity *after* the change, except for
/// `EntryRemoved` where it is the quantity that was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    EntryCreated { key: ItemKey, quantity: u64 },
    QuantityMerged { key: ItemKey, added: u64, quantity: u64 },
    StockReceived { key: ItemKey, delta: u64, quantity: u64 },
    StockIssued { key: ItemKey, delta: u64, quantity: u64 },
    EntryDepleted { key: ItemKey, delta: u64 },
    EntryRemoved { key: ItemKey, quantity: u64 },
}

impl LedgerEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::EntryCreated { .. } => "inventory.entry.created",
            LedgerEvent::QuantityMerged { .. } => "inventory.entry.merged",
            LedgerEvent::StockReceived { .. } => "inventory.entry.received",
            LedgerEvent::StockIssued { .. } => "inventory.entry.issued",
            LedgerEvent::EntryDepleted { .. } => "inventory.entry.depleted",
            LedgerEvent::EntryRemoved { .. } => "inventory.entry.removed",
        }
    }

    pub fn key(&self) -> &ItemKey {
        match self {
            LedgerEvent::EntryCreated { key, .. }
            | LedgerEvent::QuantityMerged { key, .. }
            | LedgerEvent::StockReceived { key, .. }
            | LedgerEvent::StockIssued { key, .. }
            | LedgerEvent::EntryDepleted { key, .. }
            | LedgerEvent::EntryRemoved { key, .. } => key,
        }
    }

    /// Quantity held after the event, `None` once the entry is gone.
    pub fn quantity_after(&self) -> Option<u64> {
        match self {
            LedgerEvent::EntryCreated { quantity, .. }
            | LedgerEvent::QuantityMerged { quantity, .. }
            | LedgerEvent::StockReceived { quantity, .. }
            | LedgerEvent::StockIssued { quantity, .. } => Some(*quantity),
            LedgerEvent::EntryDepleted { .. } | LedgerEvent::EntryRemoved { .. } => None,
        }
    }
}

/// Aggregate root: one ledger slot, either absent or present with a positive quantity.
///
/// Both storage media rehydrate a `StockEntry` from what they hold, let it decide, and
/// then persist the resulting event themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockEntry {
    key: ItemKey,
    quantity: Option<u64>,
    version: u64,
}

impl StockEntry {
    pub fn absent(key: ItemKey) -> Self {
        Self {
            key,
            quantity: None,
            version: 0,
        }
    }

    /// Rehydrate from stored state. A stored zero is treated as absent.
    pub fn rehydrate(key: ItemKey, quantity: Option<u64>, version: u64) -> Self {
        Self {
            key,
            quantity: quantity.filter(|q| *q > 0),
            version,
        }
    }

    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    pub fn is_present(&self) -> bool {
        self.quantity.is_some()
    }
}

impl AggregateRoot for StockEntry {
    type Id = ItemKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for StockEntry {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        self.quantity = event.quantity_after();
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Self::Event, Self::Error> {
        match command {
            LedgerCommand::UpsertOrMerge { amount } => self.handle_upsert(*amount),
            LedgerCommand::Adjust { delta, direction } => self.handle_adjust(*delta, *direction),
            LedgerCommand::Remove => self.handle_remove(),
        }
    }
}

/// Validate a user-supplied amount: must be a positive integer.
pub fn positive_amount(value: i64, field: &str) -> DomainResult<u64> {
    if value <= 0 {
        return Err(DomainError::validation(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(value as u64)
}

impl StockEntry {
    fn present_quantity(&self) -> DomainResult<u64> {
        self.quantity
            .ok_or_else(|| DomainError::not_found(self.key.as_str()))
    }

    fn checked_sum(&self, current: u64, added: u64) -> DomainResult<u64> {
        current.checked_add(added).ok_or_else(|| {
            DomainError::validation(format!("quantity of {} would overflow", self.key))
        })
    }

    fn handle_upsert(&self, amount: i64) -> DomainResult<LedgerEvent> {
        let amount = positive_amount(amount, "quantity")?;
        let key = self.key.clone();

        match self.quantity {
            None => Ok(LedgerEvent::EntryCreated {
                key,
                quantity: amount,
            }),
            Some(current) => Ok(LedgerEvent::QuantityMerged {
                quantity: self.checked_sum(current, amount)?,
                key,
                added: amount,
            }),
        }
    }

    fn handle_adjust(&self, delta: i64, direction: Direction) -> DomainResult<LedgerEvent> {
        let delta = positive_amount(delta, "amount")?;
        let current = self.present_quantity()?;
        let key = self.key.clone();

        match direction {
            Direction::Receive => Ok(LedgerEvent::StockReceived {
                quantity: self.checked_sum(current, delta)?,
                key,
                delta,
            }),
            Direction::Issue if delta > current => {
                Err(DomainError::insufficient(key.into_inner(), delta, current))
            }
            Direction::Issue if delta == current => Ok(LedgerEvent::EntryDepleted { key, delta }),
            Direction::Issue => Ok(LedgerEvent::StockIssued {
                key,
                delta,
                quantity: current - delta,
            }),
        }
    }

    fn handle_remove(&self) -> DomainResult<LedgerEvent> {
        let quantity = self.present_quantity()?;
        Ok(LedgerEvent::EntryRemoved {
            key: self.key.clone(),
            quantity,
        })
    }
}
