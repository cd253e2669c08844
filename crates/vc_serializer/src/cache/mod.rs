//! Serializer resolution and memoization.
//!
//! ## Menu
//!
//! - [`TypeSerializer`]: the part of a serializer the cache relies on.
//! - [`SerializerFactory`]: builds serializers when the cache misses.
//! - [`SerializerCache`]: stores one serializer per [`CacheKey`](crate::CacheKey).
//! - [`CacheStats`]: hit, miss and construction counters.
//!
//! ## Lookup order
//!
//! [`SerializerCache::resolve_by_supported_type_in`] checks the type-global
//! entry first and the member entry second. Once a type has a global
//! serializer, every member of that type reuses it.

// -----------------------------------------------------------------------------
// Debug utils

#[cfg(all(debug_assertions, feature = "debug"))]
mod resolution_stack;

// -----------------------------------------------------------------------------
// Modules

mod factory;
mod serializer;
mod serializer_cache;
mod stats;

// -----------------------------------------------------------------------------
// Exports

pub use factory::SerializerFactory;
pub use serializer::{SerializerRef, TypeSerializer};
pub use serializer_cache::SerializerCache;
pub use stats::CacheStats;
