//! Builder-pattern traits used by the schema types in this crate.
//!
//! Dialect entities are effectively immutable once compiled — they mirror an XML definition — so
//! construction goes through a builder rather than a public constructor.

/// Entity constructed via the builder pattern.
pub trait Buildable {
    /// Builder type for this entity.
    type Builder: Builder;

    /// Creates a builder pre-populated with this entity's current values.
    fn to_builder(&self) -> Self::Builder;
}

/// Builder for a [`Buildable`] entity.
pub trait Builder {
    /// Entity this builder produces.
    type Buildable: Buildable;

    /// Consumes accumulated state and produces the entity.
    fn build(&self) -> Self::Buildable;
}
