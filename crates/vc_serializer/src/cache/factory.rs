use crate::cache::{SerializerCache, SerializerRef};
use crate::error::CacheError;
use crate::ident::{MemberContext, TypeKey};

// -----------------------------------------------------------------------------
// SerializerFactory

/// Builds new serializers on behalf of a [`SerializerCache`].
///
/// Every operation receives the cache that is asking. A composite
/// serializer resolves the serializers of its members through it, which
/// memoizes them for everyone else.
///
/// ## Cycles
///
/// The cache does not detect cycles. Resolving `T` from inside the
/// construction of `T`'s own serializer recurses without bound; a factory
/// for self-referential types must insert an indirection (for example a
/// serializer that resolves its target lazily) instead.
///
/// ## Errors
///
/// Return a [`ResolutionError`](crate::ResolutionError) when no serializer
/// can be determined. Errors from nested resolutions should be propagated
/// as they are.
pub trait SerializerFactory {
    /// Constructs an instance of the serializer type `serializer_type`.
    fn new_by_serializer_type(
        &self,
        serializer_type: TypeKey,
        cache: &SerializerCache,
    ) -> Result<SerializerRef, CacheError>;

    /// Constructs an instance of the serializer type `serializer_type`
    /// for use at `member`.
    fn new_by_serializer_type_in(
        &self,
        serializer_type: TypeKey,
        member: &MemberContext,
        cache: &SerializerCache,
    ) -> Result<SerializerRef, CacheError>;

    /// Constructs the serializer that handles `supported_type` everywhere.
    fn new_by_supported_type(
        &self,
        supported_type: TypeKey,
        cache: &SerializerCache,
    ) -> Result<SerializerRef, CacheError>;

    /// Constructs the serializer that handles `supported_type` at `member`.
    fn new_by_supported_type_in(
        &self,
        supported_type: TypeKey,
        member: &MemberContext,
        cache: &SerializerCache,
    ) -> Result<SerializerRef, CacheError>;
}
