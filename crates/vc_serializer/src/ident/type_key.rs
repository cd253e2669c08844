use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// TypeKey

/// A runtime type identifier with its path kept for diagnostics.
///
/// Equality and hashing only look at the [`TypeId`].
///
/// # Examples
///
/// ```
/// use vc_serializer::TypeKey;
///
/// let key = TypeKey::of::<Vec<String>>();
///
/// assert!(key.is::<Vec<String>>());
/// assert_eq!(key.name(), "Vec<alloc::string::String>");
/// assert_eq!(key, TypeKey::of::<Vec<String>>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    path: &'static str,
}

impl TypeKey {
    /// Returns the key of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: core::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`].
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type path, as given by [`core::any::type_name`].
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the path without its module prefix.
    ///
    /// Only a leading `a::b::C` head, optionally followed by generic
    /// arguments, is shortened; the arguments are kept verbatim. Tuples,
    /// references, arrays, slices and trait objects come back unchanged.
    pub fn name(&self) -> &'static str {
        let path = self.path;
        let head_end = path
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == ':'))
            .unwrap_or(path.len());
        if head_end == 0 || !(head_end == path.len() || path[head_end..].starts_with('<')) {
            return path;
        }
        match path[..head_end].rfind("::") {
            Some(idx) => &path[idx + 2..],
            None => path,
        }
    }

    /// Check if this key denotes `T`.
    #[inline]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.path)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}
