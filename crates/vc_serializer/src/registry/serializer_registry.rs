use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use vc_utils::TypeIdMap;
use vc_utils::hash::HashMap;

use crate::cache::{SerializerCache, SerializerFactory, SerializerRef, TypeSerializer};
use crate::error::{CacheError, ResolutionError};
use crate::ident::{MemberContext, TypeKey};

/// Builds one serializer instance.
///
/// Receives the member the serializer is built for (`None` for a global
/// serializer) and the cache, for resolving nested serializers.
pub type Constructor = Box<
    dyn Fn(Option<&MemberContext>, &SerializerCache) -> Result<SerializerRef, CacheError>
        + Send
        + Sync,
>;

struct Registration {
    ty: TypeKey,
    constructor: Constructor,
}

// -----------------------------------------------------------------------------
// SerializerRegistry

/// A [`SerializerFactory`] backed by registered constructors and bindings.
///
/// - Declared-type requests run the constructor registered for that
///   serializer type.
/// - Supported-type requests at a member use the member override first,
///   then the type's default binding.
/// - Global supported-type requests use the default binding only.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_serializer::{
///     MemberContext, SerializerCache, SerializerRef, SerializerRegistry, TypeKey, TypeSerializer,
/// };
///
/// struct Decimal;
/// struct Hex;
///
/// impl TypeSerializer for Decimal {
///     fn supported_type(&self) -> TypeKey { TypeKey::of::<u32>() }
/// }
///
/// impl TypeSerializer for Hex {
///     fn supported_type(&self) -> TypeKey { TypeKey::of::<u32>() }
///     fn is_context_bound(&self) -> bool { true }
/// }
///
/// struct Color {
///     rgb: u32,
/// }
///
/// let rgb = MemberContext::named::<Color, u32>("rgb");
///
/// let mut registry = SerializerRegistry::new();
/// registry.register::<Decimal>(|_, _| Ok(Arc::new(Decimal) as SerializerRef));
/// registry.register::<Hex>(|_, _| Ok(Arc::new(Hex) as SerializerRef));
/// registry.bind::<u32, Decimal>();
/// registry.bind_member::<Hex>(rgb);
///
/// let cache = SerializerCache::new(Arc::new(registry));
///
/// assert!(cache.resolve_in::<u32>(&rgb).unwrap().is::<Hex>());
/// assert!(cache.resolve::<u32>().unwrap().is::<Decimal>());
/// ```
#[derive(Default)]
pub struct SerializerRegistry {
    constructors: TypeIdMap<Registration>,
    bindings: TypeIdMap<TypeKey>,
    member_bindings: HashMap<MemberContext, TypeKey>,
}

impl SerializerRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the constructor of serializer type `S`.
    ///
    /// Replaces any constructor previously registered for `S`.
    #[inline]
    pub fn register<S: TypeSerializer>(
        &mut self,
        constructor: impl Fn(Option<&MemberContext>, &SerializerCache) -> Result<SerializerRef, CacheError>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        self.register_by_key(TypeKey::of::<S>(), Box::new(constructor))
    }

    /// Registers the constructor of the serializer type `serializer_type`.
    pub fn register_by_key(
        &mut self,
        serializer_type: TypeKey,
        constructor: Constructor,
    ) -> &mut Self {
        let registration = Registration {
            ty: serializer_type,
            constructor,
        };
        if self
            .constructors
            .insert(serializer_type.id(), registration)
            .is_some()
        {
            log::debug!("replaced constructor of `{serializer_type}`");
        }
        self
    }

    /// Makes `S` the default serializer type of `T`.
    #[inline]
    pub fn bind<T: ?Sized + 'static, S: TypeSerializer>(&mut self) -> &mut Self {
        self.bind_key(TypeKey::of::<T>(), TypeKey::of::<S>())
    }

    /// Makes `serializer_type` the default serializer type of `supported_type`.
    ///
    /// The serializer type does not need to be registered yet; a missing
    /// constructor is reported when the binding is used.
    pub fn bind_key(&mut self, supported_type: TypeKey, serializer_type: TypeKey) -> &mut Self {
        self.bindings.insert(supported_type.id(), serializer_type);
        self
    }

    /// Makes `S` the serializer type used at `member`.
    #[inline]
    pub fn bind_member<S: TypeSerializer>(&mut self, member: MemberContext) -> &mut Self {
        self.bind_member_key(member, TypeKey::of::<S>())
    }

    /// Makes `serializer_type` the serializer type used at `member`.
    pub fn bind_member_key(&mut self, member: MemberContext, serializer_type: TypeKey) -> &mut Self {
        self.member_bindings.insert(member, serializer_type);
        self
    }

    /// Whether a constructor is registered for `serializer_type`.
    #[inline]
    pub fn contains_serializer(&self, serializer_type: TypeKey) -> bool {
        self.constructors.contains(&serializer_type.id())
    }

    /// Returns the default serializer type bound to `supported_type`.
    #[inline]
    pub fn binding_of(&self, supported_type: TypeKey) -> Option<TypeKey> {
        self.bindings.get(&supported_type.id()).copied()
    }

    /// Returns the serializer type bound to `member`.
    #[inline]
    pub fn member_binding_of(&self, member: &MemberContext) -> Option<TypeKey> {
        self.member_bindings.get(member).copied()
    }

    fn construct(
        &self,
        serializer_type: TypeKey,
        member: Option<&MemberContext>,
        cache: &SerializerCache,
    ) -> Result<SerializerRef, CacheError> {
        match self.constructors.get(&serializer_type.id()) {
            Some(registration) => (registration.constructor)(member, cache),
            None => Err(ResolutionError::UnknownSerializer {
                serializer: serializer_type.path(),
            }
            .into()),
        }
    }
}

impl SerializerFactory for SerializerRegistry {
    fn new_by_serializer_type(
        &self,
        serializer_type: TypeKey,
        cache: &SerializerCache,
    ) -> Result<SerializerRef, CacheError> {
        self.construct(serializer_type, None, cache)
    }

    fn new_by_serializer_type_in(
        &self,
        serializer_type: TypeKey,
        member: &MemberContext,
        cache: &SerializerCache,
    ) -> Result<SerializerRef, CacheError> {
        self.construct(serializer_type, Some(member), cache)
    }

    fn new_by_supported_type(
        &self,
        supported_type: TypeKey,
        cache: &SerializerCache,
    ) -> Result<SerializerRef, CacheError> {
        match self.binding_of(supported_type) {
            Some(serializer_type) => self.construct(serializer_type, None, cache),
            None => Err(ResolutionError::Unsupported {
                ty: supported_type.path(),
            }
            .into()),
        }
    }

    fn new_by_supported_type_in(
        &self,
        supported_type: TypeKey,
        member: &MemberContext,
        cache: &SerializerCache,
    ) -> Result<SerializerRef, CacheError> {
        let serializer_type = self
            .member_binding_of(member)
            .or_else(|| self.binding_of(supported_type));
        match serializer_type {
            Some(serializer_type) => self.construct(serializer_type, Some(member), cache),
            None => Err(ResolutionError::UnsupportedMember {
                ty: supported_type.path(),
                member: *member,
            }
            .into()),
        }
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let serializers: Vec<TypeKey> = self.constructors.values().map(|r| r.ty).collect();
        f.debug_struct("SerializerRegistry")
            .field("serializers", &serializers)
            .field("bindings", &self.bindings)
            .field("member_bindings", &self.member_bindings)
            .finish()
    }
}
