#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod cache;
pub mod ident;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use cache::{CacheStats, SerializerCache, SerializerFactory, SerializerRef, TypeSerializer};
pub use error::{CacheError, ResolutionError};
pub use ident::{CacheKey, ContextKey, MemberContext, MemberIdent, TypeKey};
pub use registry::{Constructor, SerializerRegistry};
