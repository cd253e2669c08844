//! Identity of cache entries.
//!
//! - [`TypeKey`]: a runtime type, compared by [`TypeId`](core::any::TypeId).
//! - [`MemberContext`]: a structural location (a field of an owner type).
//! - [`ContextKey`]: either no context or a bound [`MemberContext`].
//! - [`CacheKey`]: the pair under which a serializer is stored.

// -----------------------------------------------------------------------------
// Modules

mod cache_key;
mod member;
mod type_key;

// -----------------------------------------------------------------------------
// Exports

pub use cache_key::CacheKey;
pub use member::{ContextKey, MemberContext, MemberIdent};
pub use type_key::TypeKey;
