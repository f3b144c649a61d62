//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. A
/// normalized national ID is a value object; a user account is an entity.
///
/// Constructors of value objects are expected to validate and normalize their
/// input, so that holding an instance is proof the value is well-formed.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
