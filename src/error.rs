//! Error types for surface negotiation, creation and use

use crate::backend::{BackendFamily, QueryMechanism};
use crate::surface::{SurfaceId, SurfaceVariant};
use thiserror::Error;

/// How a native primitive failed.
///
/// Backends fail in different ways (a null return, a protocol error, an
/// exception from the toolkit); drivers fold all of them into one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeErrorKind {
    /// The driver refused the request outright.
    Refused,
    /// Out of contexts, drawables or video memory.
    Exhausted,
    /// The configuration and the request do not fit together.
    BadMatch,
    /// The primitive does not exist on this backend.
    Unsupported,
}

/// Failure reported by a native driver primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed ({kind:?}): {detail}")]
pub struct NativeError {
    pub kind: NativeErrorKind,
    pub operation: &'static str,
    pub detail: String,
}

impl NativeError {
    pub fn new(kind: NativeErrorKind, operation: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind,
            operation,
            detail: detail.into(),
        }
    }
}

/// The four failure categories callers act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Nothing could satisfy the request; retry with a relaxed request.
    Configuration,
    /// A configuration matched but native creation failed; free surfaces and retry.
    ResourceExhaustion,
    /// The surface is destroyed or was never ready. A programming error.
    InvalidSurface,
    /// The backend lacks the capability.
    UnsupportedOperation,
}

/// Errors returned by the surface layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("no backend available for family {family:?}")]
    NoBackendAvailable { family: BackendFamily },

    #[error("no configuration matches the request for a {variant:?} surface")]
    NoMatchingConfig { variant: SurfaceVariant },

    #[error("{mechanism:?} matched a configuration but materialization failed: {source}")]
    MaterializationFailed {
        mechanism: QueryMechanism,
        #[source]
        source: NativeError,
    },

    #[error("surface {surface:?} is not ready ({reason})")]
    InvalidSurface { surface: SurfaceId, reason: &'static str },

    #[error("no surface is current in this package")]
    NoCurrentSurface,

    #[error("{operation} is not supported by {family:?}")]
    Unsupported {
        family: BackendFamily,
        operation: &'static str,
    },

    #[error("the owning package has been destroyed")]
    PackageDestroyed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Native(#[from] NativeError),
}

impl SurfaceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SurfaceError::NoBackendAvailable { .. }
            | SurfaceError::NoMatchingConfig { .. }
            | SurfaceError::InvalidRequest(_) => ErrorCategory::Configuration,
            SurfaceError::MaterializationFailed { .. } => ErrorCategory::ResourceExhaustion,
            SurfaceError::InvalidSurface { .. }
            | SurfaceError::NoCurrentSurface
            | SurfaceError::PackageDestroyed => ErrorCategory::InvalidSurface,
            SurfaceError::Unsupported { .. } => ErrorCategory::UnsupportedOperation,
            SurfaceError::Native(native) => match native.kind {
                NativeErrorKind::Unsupported => ErrorCategory::UnsupportedOperation,
                NativeErrorKind::BadMatch => ErrorCategory::Configuration,
                NativeErrorKind::Refused | NativeErrorKind::Exhausted => {
                    ErrorCategory::ResourceExhaustion
                }
            },
        }
    }

    /// Whether retrying (possibly with a relaxed request) can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Configuration | ErrorCategory::ResourceExhaustion
        )
    }
}

pub type Result<T, E = SurfaceError> = std::result::Result<T, E>;
