use core::fmt;
use core::hash::{Hash, Hasher};

use crate::ident::TypeKey;

// -----------------------------------------------------------------------------
// MemberIdent

/// Identifies a member inside its owner: a struct field name or a tuple index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberIdent {
    Named(&'static str),
    Index(usize),
}

impl fmt::Display for MemberIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

// -----------------------------------------------------------------------------
// MemberContext

/// A structural location: one member of an owner type.
///
/// Serializers that depend on where a value sits (for example a field
/// with its own override) are cached per `MemberContext`.
///
/// Two contexts are equal iff they name the same member of the same owner.
/// The member's own type is carried along for factories but does not take
/// part in equality.
///
/// # Examples
///
/// ```
/// use vc_serializer::{MemberContext, MemberIdent};
///
/// struct Config {
///     port: u16,
/// }
///
/// let ctx = MemberContext::named::<Config, u16>("port");
///
/// assert_eq!(ctx.ident(), MemberIdent::Named("port"));
/// assert!(ctx.ty().is::<u16>());
/// assert!(ctx.to_string().ends_with("Config::port"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MemberContext {
    owner: TypeKey,
    ident: MemberIdent,
    ty: TypeKey,
}

impl MemberContext {
    /// Creates a context from its parts.
    #[inline]
    pub const fn new(owner: TypeKey, ident: MemberIdent, ty: TypeKey) -> Self {
        Self { owner, ident, ty }
    }

    /// Creates the context of field `name`, of type `T`, in `Owner`.
    #[inline]
    pub fn named<Owner: ?Sized + 'static, T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::new(TypeKey::of::<Owner>(), MemberIdent::Named(name), TypeKey::of::<T>())
    }

    /// Creates the context of tuple field `index`, of type `T`, in `Owner`.
    #[inline]
    pub fn unnamed<Owner: ?Sized + 'static, T: ?Sized + 'static>(index: usize) -> Self {
        Self::new(TypeKey::of::<Owner>(), MemberIdent::Index(index), TypeKey::of::<T>())
    }

    /// Returns the owner type.
    #[inline(always)]
    pub const fn owner(&self) -> TypeKey {
        self.owner
    }

    /// Returns the member identifier.
    #[inline(always)]
    pub const fn ident(&self) -> MemberIdent {
        self.ident
    }

    /// Returns the declared type of the member.
    #[inline(always)]
    pub const fn ty(&self) -> TypeKey {
        self.ty
    }
}

impl PartialEq for MemberContext {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.ident == other.ident
    }
}

impl Eq for MemberContext {}

impl Hash for MemberContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.ident.hash(state);
    }
}

impl fmt::Display for MemberContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.ident)
    }
}

// -----------------------------------------------------------------------------
// ContextKey

/// The context half of a [`CacheKey`](crate::CacheKey).
///
/// `Absent` is a distinct value: it never equals any bound member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContextKey {
    #[default]
    Absent,
    Bound(MemberContext),
}

impl ContextKey {
    /// Returns `true` for [`ContextKey::Absent`].
    #[inline]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the bound member, if any.
    #[inline]
    pub const fn member(&self) -> Option<&MemberContext> {
        match self {
            Self::Absent => None,
            Self::Bound(member) => Some(member),
        }
    }
}

impl From<MemberContext> for ContextKey {
    #[inline]
    fn from(member: MemberContext) -> Self {
        Self::Bound(member)
    }
}

impl From<&MemberContext> for ContextKey {
    #[inline]
    fn from(member: &MemberContext) -> Self {
        Self::Bound(*member)
    }
}

impl From<Option<MemberContext>> for ContextKey {
    #[inline]
    fn from(member: Option<MemberContext>) -> Self {
        match member {
            Some(member) => Self::Bound(member),
            None => Self::Absent,
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("<global>"),
            Self::Bound(member) => fmt::Display::fmt(member, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextKey, MemberContext, MemberIdent};
    use crate::ident::TypeKey;

    struct Owner;
    struct Other;

    #[test]
    fn member_equality_ignores_member_type() {
        let a = MemberContext::named::<Owner, u32>("value");
        let b = MemberContext::new(TypeKey::of::<Owner>(), MemberIdent::Named("value"), TypeKey::of::<i64>());
        assert_eq!(a, b);
    }

    #[test]
    fn member_equality_needs_same_owner_and_ident() {
        let a = MemberContext::named::<Owner, u32>("value");
        assert_ne!(a, MemberContext::named::<Other, u32>("value"));
        assert_ne!(a, MemberContext::named::<Owner, u32>("other"));
        assert_ne!(MemberContext::unnamed::<Owner, u32>(0), MemberContext::unnamed::<Owner, u32>(1));
    }

    #[test]
    fn absent_is_never_bound() {
        let member = MemberContext::unnamed::<Owner, u8>(0);
        assert_ne!(ContextKey::Absent, ContextKey::from(member));
        assert_eq!(ContextKey::from(None), ContextKey::Absent);
        assert_eq!(ContextKey::default(), ContextKey::Absent);
        assert_eq!(ContextKey::from(Some(member)).member(), Some(&member));
        assert!(ContextKey::Absent.is_absent());
    }
}
