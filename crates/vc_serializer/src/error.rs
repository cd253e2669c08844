use alloc::string::String;

use thiserror::Error;

use crate::ident::MemberContext;

// -----------------------------------------------------------------------------
// ResolutionError

/// A factory could not produce a serializer.
///
/// Returned by [`SerializerFactory`](crate::SerializerFactory) implementations
/// and passed through the cache unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolutionError {
    #[error("no serializer can be determined for `{ty}`")]
    Unsupported { ty: &'static str },

    #[error("no serializer can be determined for `{ty}` at `{member}`")]
    UnsupportedMember {
        ty: &'static str,
        member: MemberContext,
    },

    #[error("`{serializer}` is not a known serializer type")]
    UnknownSerializer { serializer: &'static str },

    #[error("failed to construct a serializer for `{ty}`: {reason}")]
    Construction { ty: &'static str, reason: String },
}

// -----------------------------------------------------------------------------
// CacheError

/// Errors surfaced by [`SerializerCache`](crate::SerializerCache).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CacheError {
    /// A member-bound serializer was offered for a type-global slot.
    #[error(
        "`{serializer}` for `{ty}` is bound to a member, insert it with a member context instead"
    )]
    InvalidUsage {
        serializer: &'static str,
        ty: &'static str,
    },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl CacheError {
    /// Returns `true` for [`CacheError::InvalidUsage`].
    #[inline]
    pub const fn is_invalid_usage(&self) -> bool {
        matches!(self, Self::InvalidUsage { .. })
    }

    /// Returns `true` for [`CacheError::Resolution`].
    #[inline]
    pub const fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{CacheError, ResolutionError};
    use crate::ident::MemberContext;

    struct Owner;

    #[test]
    fn messages_name_the_type() {
        let err = CacheError::from(ResolutionError::Unsupported { ty: "app::Thing" });
        assert!(err.is_resolution_failure());
        assert_eq!(err.to_string(), "no serializer can be determined for `app::Thing`");

        let member = MemberContext::named::<Owner, u8>("flag");
        let err = ResolutionError::UnsupportedMember { ty: "u8", member };
        assert!(err.to_string().ends_with("Owner::flag`"));
    }

    #[test]
    fn invalid_usage_is_not_a_resolution_failure() {
        let err = CacheError::InvalidUsage {
            serializer: "FieldSerializer",
            ty: "u8",
        };
        assert!(err.is_invalid_usage());
        assert!(!err.is_resolution_failure());
    }
}
