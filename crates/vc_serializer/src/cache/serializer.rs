use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::ident::TypeKey;

// -----------------------------------------------------------------------------
// TypeSerializer

/// A serializer for values of one runtime type.
///
/// Only the parts the cache needs are described here; encoding and
/// decoding live on the concrete serializer types.
///
/// # Examples
///
/// ```
/// use vc_serializer::{TypeKey, TypeSerializer};
///
/// struct BoolSerializer;
///
/// impl TypeSerializer for BoolSerializer {
///     fn supported_type(&self) -> TypeKey {
///         TypeKey::of::<bool>()
///     }
/// }
///
/// let s: &dyn TypeSerializer = &BoolSerializer;
/// assert!(!s.is_context_bound());
/// assert!(s.serializer_type().is::<BoolSerializer>());
/// assert!(s.is::<BoolSerializer>());
/// ```
pub trait TypeSerializer: Any + Send + Sync {
    /// The type this serializer reads and writes.
    fn supported_type(&self) -> TypeKey;

    /// Whether this serializer is only valid at one member location.
    ///
    /// Bound serializers must be cached under a member context, never
    /// under the type alone.
    #[inline]
    fn is_context_bound(&self) -> bool {
        false
    }

    /// The concrete serializer type.
    #[inline]
    fn serializer_type(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }
}

/// Shared handle to a cached serializer.
pub type SerializerRef = Arc<dyn TypeSerializer>;

impl dyn TypeSerializer {
    /// Returns `true` if the concrete serializer is `S`.
    #[inline]
    pub fn is<S: TypeSerializer>(&self) -> bool {
        (self as &dyn Any).is::<S>()
    }

    /// Downcasts to the concrete serializer `S`.
    #[inline]
    pub fn downcast_ref<S: TypeSerializer>(&self) -> Option<&S> {
        (self as &dyn Any).downcast_ref::<S>()
    }
}

impl fmt::Debug for dyn TypeSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSerializer")
            .field("serializer_type", &self.serializer_type())
            .field("supported_type", &self.supported_type())
            .field("context_bound", &self.is_context_bound())
            .finish()
    }
}
