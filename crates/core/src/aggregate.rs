//! Aggregate root trait for versioned domain records.

/// Aggregate root marker + minimal interface.
///
/// Aggregates are the unit of consistency: every write to one goes through a
/// single validate-then-persist step, and the version is bumped on each
/// committed write.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Starts at 1 when the record is first persisted.
    fn version(&self) -> u64;
}
