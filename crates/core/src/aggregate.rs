//! Aggregate traits: pure decision logic separated from state evolution.

/// Aggregate root marker + minimal interface.
pub trait AggregateRoot {
    /// Identifier of the aggregate (for the ledger, the canonical item key).
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Stored records carry this as their row version; in-memory state starts at 0.
    fn version(&self) -> u64;
}

/// Optimistic concurrency expectation for a stored record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// The record must not exist yet.
    Absent,
    /// Require the record to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    /// `None` means no record exists.
    pub fn from_stored(version: Option<u64>) -> Self {
        version.map_or(ExpectedVersion::Absent, ExpectedVersion::Exact)
    }

    /// Version the record carries after a successful write; 1 for a fresh record.
    pub fn next(self) -> u64 {
        match self {
            ExpectedVersion::Absent => 1,
            ExpectedVersion::Exact(v) => v.saturating_add(1),
        }
    }
}

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` returns the event describing the change.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Aggregates perform no IO. Callers persist the returned event in whatever medium
/// they own (session memory, remote table) and then apply it.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single event.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which event to emit given the current state and a command.
    ///
    /// This must not mutate state.
    fn handle(&self, command: &Self::Command) -> Result<Self::Event, Self::Error>;
}
