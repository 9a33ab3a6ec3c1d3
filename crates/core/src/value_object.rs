//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To "modify" one,
/// build a new one. `ItemKey` is the main example here: two keys built from `" apple "`
/// and `"APPLE"` are the same value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
