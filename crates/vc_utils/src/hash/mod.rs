//! Provide hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! Every map in the family hashes with [`FixedHashState`]: a `foldhash`
//! state with a fixed seed, so the same keys land in the same buckets in
//! every process.

// -----------------------------------------------------------------------------
// Exports

/// Build-hasher with a fixed `foldhash` seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use vc_utils::hash::FixedHashState;
///
/// let a = FixedHashState::default().hash_one("field_a");
/// let b = FixedHashState::default().hash_one("field_a");
/// assert_eq!(a, b);
/// ```
pub type FixedHashState = foldhash::fast::FixedState;

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
///
/// Hash results depend only on the key, so iteration order is stable
/// across runs for the same sequence of insertions.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
