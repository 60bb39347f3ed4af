//! Error model for the workflow vocabulary and for backend implementors.

use thiserror::Error;

/// Result type used across the vocabulary layer.
pub type CoreResult<T> = Result<T, CoreError>;

/// Vocabulary-level error.
///
/// Raised when data enters the closed decision/result vocabulary from an
/// untyped form (type tags, JSON). Backend failures are never translated into
/// this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A type tag outside the closed vocabulary (e.g. a decision kind added
    /// upstream that this crate does not know how to report yet).
    #[error("unmapped {vocabulary} variant: {tag:?}")]
    UnmappedVariant {
        vocabulary: &'static str,
        tag: String,
    },

    /// The payload names a known variant but its fields do not decode.
    #[error("malformed {vocabulary}: {reason}")]
    Malformed {
        vocabulary: &'static str,
        reason: String,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl CoreError {
    pub fn unmapped(vocabulary: &'static str, tag: impl Into<String>) -> Self {
        Self::UnmappedVariant {
            vocabulary,
            tag: tag.into(),
        }
    }

    pub fn malformed(vocabulary: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            vocabulary,
            reason: reason.into(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// `true` when the error is an out-of-vocabulary type tag.
    pub fn is_unmapped(&self) -> bool {
        matches!(self, Self::UnmappedVariant { .. })
    }
}

/// Ready-made failure type for [`crate::Backend`] implementations.
///
/// Backends are free to use their own error type; this one covers the usual
/// categories so small backends don't need to define one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The referenced process, task or registration does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend refused the operation (invalid state, duplicate, ...).
    #[error("rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or is temporarily unavailable.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
