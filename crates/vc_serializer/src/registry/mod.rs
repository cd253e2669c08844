//! A table-driven [`SerializerFactory`](crate::SerializerFactory).
//!
//! [`SerializerRegistry`] maps serializer types to constructors, supported
//! types to their default serializer type, and individual members to an
//! overriding serializer type. It does no attribute scanning and no
//! convention-based selection: everything it knows has been registered.

// -----------------------------------------------------------------------------
// Modules

mod serializer_registry;

// -----------------------------------------------------------------------------
// Exports

pub use serializer_registry::{Constructor, SerializerRegistry};
