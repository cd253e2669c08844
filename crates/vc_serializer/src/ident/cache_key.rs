use core::fmt;

use crate::ident::{ContextKey, MemberContext, TypeKey};

// -----------------------------------------------------------------------------
// CacheKey

/// The composite key of a [`SerializerCache`](crate::SerializerCache) entry.
///
/// Two keys are equal iff both the type and the context are equal.
///
/// # Examples
///
/// ```
/// use vc_serializer::{CacheKey, MemberContext, TypeKey};
///
/// struct Point(i32, i32);
///
/// let ty = TypeKey::of::<i32>();
/// let global = CacheKey::global(ty);
/// let first = CacheKey::bound(ty, MemberContext::unnamed::<Point, i32>(0));
/// let second = CacheKey::bound(ty, MemberContext::unnamed::<Point, i32>(1));
///
/// assert!(global.is_global());
/// assert_ne!(global, first);
/// assert_ne!(first, second);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    ty: TypeKey,
    context: ContextKey,
}

impl CacheKey {
    /// Creates a key from a type and a context.
    #[inline]
    pub const fn new(ty: TypeKey, context: ContextKey) -> Self {
        Self { ty, context }
    }

    /// Creates the type-global key of `ty`.
    #[inline]
    pub const fn global(ty: TypeKey) -> Self {
        Self::new(ty, ContextKey::Absent)
    }

    /// Creates the key of `ty` scoped to `member`.
    #[inline]
    pub const fn bound(ty: TypeKey, member: MemberContext) -> Self {
        Self::new(ty, ContextKey::Bound(member))
    }

    /// Returns the type half.
    #[inline(always)]
    pub const fn ty(&self) -> TypeKey {
        self.ty
    }

    /// Returns the context half.
    #[inline(always)]
    pub const fn context(&self) -> &ContextKey {
        &self.context
    }

    /// Returns `true` if this key has no context.
    #[inline]
    pub const fn is_global(&self) -> bool {
        self.context.is_absent()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            ContextKey::Absent => write!(f, "{}", self.ty),
            ContextKey::Bound(member) => write!(f, "{} @ {member}", self.ty),
        }
    }
}
