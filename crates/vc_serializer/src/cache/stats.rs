// -----------------------------------------------------------------------------
// CacheStats

/// Counters kept by a [`SerializerCache`](crate::SerializerCache).
///
/// - `hits`: resolutions answered from the store.
/// - `misses`: supported-type resolutions that found no entry.
/// - `constructions`: serializers returned by the factory, including
///   results the cache then rejected as [`InvalidUsage`](crate::CacheError::InvalidUsage).
/// - `failures`: factory calls that returned an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub constructions: usize,
    pub failures: usize,
}
