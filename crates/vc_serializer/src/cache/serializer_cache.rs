use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use vc_utils::hash::{FixedHashState, HashMap};

use crate::cache::{CacheStats, SerializerFactory, SerializerRef, TypeSerializer};
use crate::error::CacheError;
use crate::ident::{CacheKey, ContextKey, MemberContext, TypeKey};

#[cfg(all(debug_assertions, feature = "debug"))]
use super::resolution_stack::ResolutionStack;

// -----------------------------------------------------------------------------
// Request

/// What a factory call is building, for logs.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(super) enum Request {
    Declared(TypeKey, ContextKey),
    Supported(CacheKey),
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declared(ty, ContextKey::Absent) => write!(f, "serializer `{ty}`"),
            Self::Declared(ty, ContextKey::Bound(member)) => {
                write!(f, "serializer `{ty}` @ {member}")
            }
            Self::Supported(key) => write!(f, "`{key}`"),
        }
    }
}

// -----------------------------------------------------------------------------
// SerializerCache

/// Memoizes serializers per (type, member context).
///
/// A cache lives for one serialization session. It grows monotonically:
/// entries are only added or overwritten, never evicted. Misses are sent to
/// the [`SerializerFactory`], which gets `&self` back and may resolve
/// further serializers through it while it builds.
///
/// The cache uses interior mutability and is not `Sync`. Share one cache
/// per thread, or wrap it in a lock that covers whole resolutions.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_serializer::{
///     CacheError, MemberContext, ResolutionError, SerializerCache, SerializerFactory,
///     SerializerRef, TypeKey, TypeSerializer,
/// };
///
/// struct Text;
///
/// impl TypeSerializer for Text {
///     fn supported_type(&self) -> TypeKey {
///         TypeKey::of::<String>()
///     }
/// }
///
/// struct TextOnly;
///
/// impl SerializerFactory for TextOnly {
///     fn new_by_serializer_type(&self, ty: TypeKey, _: &SerializerCache) -> Result<SerializerRef, CacheError> {
///         Err(ResolutionError::UnknownSerializer { serializer: ty.path() }.into())
///     }
///
///     fn new_by_serializer_type_in(
///         &self,
///         ty: TypeKey,
///         _: &MemberContext,
///         cache: &SerializerCache,
///     ) -> Result<SerializerRef, CacheError> {
///         self.new_by_serializer_type(ty, cache)
///     }
///
///     fn new_by_supported_type(&self, ty: TypeKey, _: &SerializerCache) -> Result<SerializerRef, CacheError> {
///         if ty.is::<String>() {
///             Ok(Arc::new(Text))
///         } else {
///             Err(ResolutionError::Unsupported { ty: ty.path() }.into())
///         }
///     }
///
///     fn new_by_supported_type_in(
///         &self,
///         ty: TypeKey,
///         _: &MemberContext,
///         cache: &SerializerCache,
///     ) -> Result<SerializerRef, CacheError> {
///         self.new_by_supported_type(ty, cache)
///     }
/// }
///
/// let cache = SerializerCache::new(Arc::new(TextOnly));
///
/// let text = cache.resolve::<String>().unwrap();
/// assert!(text.is::<Text>());
/// assert!(Arc::ptr_eq(&text, &cache.resolve::<String>().unwrap()));
///
/// assert!(cache.resolve::<u8>().unwrap_err().is_resolution_failure());
/// ```
pub struct SerializerCache {
    factory: Arc<dyn SerializerFactory>,
    entries: RefCell<HashMap<CacheKey, SerializerRef>>,
    stats: Cell<CacheStats>,
    // Nesting depth of factory calls, so only the outermost failure is
    // reported as an error.
    depth: Cell<usize>,
    #[cfg(all(debug_assertions, feature = "debug"))]
    in_flight: RefCell<ResolutionStack>,
}

impl SerializerCache {
    /// Creates an empty cache that builds through `factory`.
    pub fn new(factory: Arc<dyn SerializerFactory>) -> Self {
        Self::with_capacity(factory, 0)
    }

    /// Creates an empty cache with room for `capacity` entries.
    pub fn with_capacity(factory: Arc<dyn SerializerFactory>, capacity: usize) -> Self {
        Self {
            factory,
            entries: RefCell::new(HashMap::with_capacity_and_hasher(
                capacity,
                FixedHashState::default(),
            )),
            stats: Cell::new(CacheStats::default()),
            depth: Cell::new(0),
            #[cfg(all(debug_assertions, feature = "debug"))]
            in_flight: RefCell::new(ResolutionStack::new()),
        }
    }

    /// Returns the factory used on misses.
    #[inline]
    pub fn factory(&self) -> &dyn SerializerFactory {
        &*self.factory
    }

    // -------------------------------------------------------------------------
    // Insert

    /// Stores a type-global serializer under its supported type.
    ///
    /// Overwrites any previous global entry of that type.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidUsage`] if the serializer is context-bound; use
    /// [`insert_for_member`](Self::insert_for_member) for those. The cache
    /// is left unchanged.
    pub fn insert(&self, serializer: SerializerRef) -> Result<(), CacheError> {
        if serializer.is_context_bound() {
            log::warn!(
                "rejected global insert of member-bound `{}` for `{}`",
                serializer.serializer_type(),
                serializer.supported_type(),
            );
            return Err(invalid_usage(&*serializer));
        }
        self.store(CacheKey::global(serializer.supported_type()), serializer);
        Ok(())
    }

    /// Stores a serializer under its supported type and `context` as given.
    ///
    /// No check is made against [`TypeSerializer::is_context_bound`].
    /// [`ContextKey::Absent`] (or `None`) addresses the same slot as
    /// [`insert`](Self::insert). Returns the entry that was replaced.
    pub fn insert_keyed(
        &self,
        serializer: SerializerRef,
        context: impl Into<ContextKey>,
    ) -> Option<SerializerRef> {
        let key = CacheKey::new(serializer.supported_type(), context.into());
        self.store(key, serializer)
    }

    /// Stores a serializer met at `member`.
    ///
    /// Context-bound serializers go under `member`; all others are global
    /// and `member` is ignored.
    pub fn insert_for_member(
        &self,
        serializer: SerializerRef,
        member: &MemberContext,
    ) -> Result<(), CacheError> {
        if serializer.is_context_bound() {
            self.insert_keyed(serializer, member);
            Ok(())
        } else {
            self.insert(serializer)
        }
    }

    // -------------------------------------------------------------------------
    // Resolve

    /// Constructs a new instance of the serializer type `serializer_type`
    /// and caches it as a global serializer.
    ///
    /// The cache is not consulted first: every call builds a new instance
    /// and the latest one replaces the previous entry.
    ///
    /// # Errors
    ///
    /// Factory errors are returned unchanged. A context-bound result gives
    /// [`CacheError::InvalidUsage`] and is not stored; it still counts in
    /// [`CacheStats::constructions`], since the factory did build it.
    pub fn resolve_by_serializer_type(
        &self,
        serializer_type: TypeKey,
    ) -> Result<SerializerRef, CacheError> {
        let request = Request::Declared(serializer_type, ContextKey::Absent);
        let serializer = self.construct(request, || {
            self.factory.new_by_serializer_type(serializer_type, self)
        })?;
        self.insert(serializer.clone())?;
        Ok(serializer)
    }

    /// Constructs a new instance of the serializer type `serializer_type`
    /// for `member` and caches it under `member`.
    ///
    /// Like [`resolve_by_serializer_type`](Self::resolve_by_serializer_type),
    /// this always builds.
    pub fn resolve_by_serializer_type_in(
        &self,
        serializer_type: TypeKey,
        member: &MemberContext,
    ) -> Result<SerializerRef, CacheError> {
        let request = Request::Declared(serializer_type, ContextKey::Bound(*member));
        let serializer = self.construct(request, || {
            self.factory
                .new_by_serializer_type_in(serializer_type, member, self)
        })?;
        self.insert_keyed(serializer.clone(), member);
        Ok(serializer)
    }

    /// Returns the global serializer of `ty`, building it on the first call.
    ///
    /// At most one serializer per type is constructed through this path.
    ///
    /// # Errors
    ///
    /// Factory errors are returned unchanged and nothing is cached, so a
    /// later call tries again. A context-bound result gives
    /// [`CacheError::InvalidUsage`] and is not stored, but is counted as a
    /// construction.
    pub fn resolve_by_supported_type(&self, ty: TypeKey) -> Result<SerializerRef, CacheError> {
        let key = CacheKey::global(ty);
        if let Some(serializer) = self.hit(&key) {
            return Ok(serializer);
        }
        self.record(|stats| stats.misses += 1);

        let serializer = self.construct(Request::Supported(key), || {
            self.factory.new_by_supported_type(ty, self)
        })?;
        if serializer.is_context_bound() {
            log::warn!(
                "factory returned member-bound `{}` for global `{ty}`",
                serializer.serializer_type(),
            );
            return Err(invalid_usage(&*serializer));
        }
        self.store(key, serializer.clone());
        Ok(serializer)
    }

    /// Returns the serializer of `ty` at `member`.
    ///
    /// Lookup order:
    /// 1. the global entry of `ty`, if one was cached by any earlier call;
    /// 2. the entry of `ty` at `member`;
    /// 3. a new serializer from the factory, cached under `member` whether
    ///    or not it is context-bound.
    pub fn resolve_by_supported_type_in(
        &self,
        ty: TypeKey,
        member: &MemberContext,
    ) -> Result<SerializerRef, CacheError> {
        if let Some(serializer) = self.hit(&CacheKey::global(ty)) {
            return Ok(serializer);
        }
        let key = CacheKey::bound(ty, *member);
        if let Some(serializer) = self.hit(&key) {
            return Ok(serializer);
        }
        self.record(|stats| stats.misses += 1);

        let serializer = self.construct(Request::Supported(key), || {
            self.factory.new_by_supported_type_in(ty, member, self)
        })?;
        self.store(key, serializer.clone());
        Ok(serializer)
    }

    /// Typed form of [`resolve_by_supported_type`](Self::resolve_by_supported_type).
    #[inline]
    pub fn resolve<T: ?Sized + 'static>(&self) -> Result<SerializerRef, CacheError> {
        self.resolve_by_supported_type(TypeKey::of::<T>())
    }

    /// Typed form of [`resolve_by_supported_type_in`](Self::resolve_by_supported_type_in).
    #[inline]
    pub fn resolve_in<T: ?Sized + 'static>(
        &self,
        member: &MemberContext,
    ) -> Result<SerializerRef, CacheError> {
        self.resolve_by_supported_type_in(TypeKey::of::<T>(), member)
    }

    /// Typed form of [`resolve_by_serializer_type`](Self::resolve_by_serializer_type).
    #[inline]
    pub fn resolve_serializer<S: TypeSerializer>(&self) -> Result<SerializerRef, CacheError> {
        self.resolve_by_serializer_type(TypeKey::of::<S>())
    }

    // -------------------------------------------------------------------------
    // Inspect

    /// Returns the cached global serializer of `ty` without building.
    #[inline]
    pub fn get(&self, ty: TypeKey) -> Option<SerializerRef> {
        self.get_keyed(&CacheKey::global(ty))
    }

    /// Returns the serializer cached for `ty` exactly at `member`.
    ///
    /// Unlike [`resolve_by_supported_type_in`](Self::resolve_by_supported_type_in)
    /// this does not fall back to the global entry.
    #[inline]
    pub fn get_in(&self, ty: TypeKey, member: &MemberContext) -> Option<SerializerRef> {
        self.get_keyed(&CacheKey::bound(ty, *member))
    }

    /// Returns the serializer cached under `key`.
    pub fn get_keyed(&self, key: &CacheKey) -> Option<SerializerRef> {
        self.entries.borrow().get(key).cloned()
    }

    /// Whether an entry exists under `key`.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Snapshot of all keys, in arbitrary order.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries.borrow().keys().copied().collect()
    }

    /// Returns the counters.
    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats.get()
    }

    // -------------------------------------------------------------------------
    // Internal

    fn record(&self, f: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    fn hit(&self, key: &CacheKey) -> Option<SerializerRef> {
        let serializer = self.get_keyed(key)?;
        log::trace!("serializer cache hit for `{key}`");
        self.record(|stats| stats.hits += 1);
        Some(serializer)
    }

    fn store(&self, key: CacheKey, serializer: SerializerRef) -> Option<SerializerRef> {
        log::debug!(
            "caching `{}` under `{key}`",
            serializer.serializer_type()
        );
        self.entries.borrow_mut().insert(key, serializer)
    }

    // The store is never borrowed while `build` runs: the factory is free to
    // resolve and insert through `self`.
    fn construct(
        &self,
        request: Request,
        build: impl FnOnce() -> Result<SerializerRef, CacheError>,
    ) -> Result<SerializerRef, CacheError> {
        #[cfg(all(debug_assertions, feature = "debug"))]
        {
            let mut in_flight = self.in_flight.borrow_mut();
            if in_flight.contains(&request) {
                log::warn!(
                    "re-entrant resolution of {request}, the factory has no indirection for it (stack:\n{in_flight:?})"
                );
            }
            in_flight.push(request);
        }
        self.depth.set(self.depth.get() + 1);

        let result = build();

        let depth = self.depth.get();
        self.depth.set(depth - 1);

        match &result {
            Ok(serializer) => {
                self.record(|stats| stats.constructions += 1);
                log::debug!(
                    "constructed `{}` for {request}",
                    serializer.serializer_type()
                );
            }
            Err(err) => {
                self.record(|stats| stats.failures += 1);
                self.report_failure(&request, err, depth == 1);
            }
        }

        #[cfg(all(debug_assertions, feature = "debug"))]
        self.in_flight.borrow_mut().pop();

        result
    }

    fn report_failure(&self, request: &Request, err: &CacheError, outermost: bool) {
        let level = if outermost {
            log::Level::Error
        } else {
            log::Level::Debug
        };

        #[cfg(all(debug_assertions, feature = "debug"))]
        {
            let stack = self.in_flight.borrow();
            log::log!(level, "failed to resolve {request}: {err} (stack:\n{stack:?})");
        }

        #[cfg(not(all(debug_assertions, feature = "debug")))]
        log::log!(level, "failed to resolve {request}: {err}");
    }
}

impl fmt::Debug for SerializerCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerCache")
            .field("keys", &self.keys())
            .field("stats", &self.stats.get())
            .finish_non_exhaustive()
    }
}

fn invalid_usage(serializer: &dyn TypeSerializer) -> CacheError {
    CacheError::InvalidUsage {
        serializer: serializer.serializer_type().path(),
        ty: serializer.supported_type().path(),
    }
}

// -----------------------------------------------------------------------------
// Tests
