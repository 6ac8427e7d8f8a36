//! Error types for tokenization and browser-switch operations.
//!
//! Every failure the crate can surface is a [`TokenkitError`]. Hosts bridging
//! into mobile code can use [`TokenkitError::code`] to get a stable numeric
//! code instead of matching on variants.

use crate::nonce::ResponseShape;

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TokenkitErrorCode {
    /// User left the browser flow through the cancel endpoint or never returned
    UserCanceled = 1000,
    /// Return URL did not echo the correlation token that was sent out
    CorrelationMismatch = 2000,
    /// Upstream tokenization response could not be parsed
    MalformedResponse = 3000,
    /// Network collaborator failure passed through verbatim
    Upstream = 4000,
    /// Generic tokenization failure
    Tokenization = 5000,
    /// Stored redirect context is unusable
    InvalidContext = 5001,
    /// A second authentication was started while one is pending
    AuthenticationInProgress = 6000,
    /// Completion was requested with nothing pending
    NoPendingAuthentication = 6001,
    /// Completion was requested with a context that is not the pending one
    ContextMismatch = 6002,
    /// Serialization error
    Serialization = 7000,
    /// Pending-request persistence failed
    Storage = 8000,
}

/// Comprehensive error type for tokenization operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenkitError {
    /// The user canceled the browser flow.
    ///
    /// Orchestration reports a cancel as `TokenizeOutcome::Cancel`; this
    /// variant is what `TokenizeOutcome::into_result` maps it to.
    #[error("user canceled the browser flow")]
    UserCanceled,

    /// The returned correlation token differs from the one in the approval URL.
    #[error("the response contained inconsistent data")]
    CorrelationMismatch,

    /// A required field was missing or had the wrong type.
    #[error("malformed {shape} response: {field}")]
    MalformedResponse {
        /// Shape the parser was reading when it failed
        shape: ResponseShape,
        /// Offending field path
        field: String,
    },

    /// Failure reported by the network collaborator.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Generic tokenization failure.
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    /// The redirect context could not be decoded or used.
    #[error("invalid redirect context {field}: {reason}")]
    InvalidContext {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// `begin_authentication` was called while another attempt is pending.
    #[error("authentication {context_id} is already awaiting a browser return")]
    AuthenticationInProgress {
        /// Identity of the in-flight context
        context_id: String,
    },

    /// `complete_authentication` was called with nothing pending.
    #[error("no authentication is awaiting a browser return")]
    NoPendingAuthentication,

    /// `complete_authentication` was called with a context other than the pending one.
    #[error("context {actual} does not match pending context {expected}")]
    ContextMismatch {
        /// Identity of the pending context
        expected: String,
        /// Identity of the context supplied by the caller
        actual: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Pending-request store failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl TokenkitError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> TokenkitErrorCode {
        match self {
            Self::UserCanceled => TokenkitErrorCode::UserCanceled,
            Self::CorrelationMismatch => TokenkitErrorCode::CorrelationMismatch,
            Self::MalformedResponse { .. } => TokenkitErrorCode::MalformedResponse,
            Self::Upstream(_) => TokenkitErrorCode::Upstream,
            Self::Tokenization(_) => TokenkitErrorCode::Tokenization,
            Self::InvalidContext { .. } => TokenkitErrorCode::InvalidContext,
            Self::AuthenticationInProgress { .. } => TokenkitErrorCode::AuthenticationInProgress,
            Self::NoPendingAuthentication => TokenkitErrorCode::NoPendingAuthentication,
            Self::ContextMismatch { .. } => TokenkitErrorCode::ContextMismatch,
            Self::Serialization(_) => TokenkitErrorCode::Serialization,
            Self::Storage(_) => TokenkitErrorCode::Storage,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns true if the same call may succeed when repeated.
    ///
    /// Correlation and parse failures consume the pending context, so they
    /// need a fresh `begin_authentication` rather than a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Storage(_))
    }

    /// Returns true for failures callers should treat as security relevant.
    pub fn is_security_relevant(&self) -> bool {
        matches!(self, Self::CorrelationMismatch)
    }

    /// Create a malformed response error.
    pub fn malformed(shape: ResponseShape, field: impl Into<String>) -> Self {
        Self::MalformedResponse {
            shape,
            field: field.into(),
        }
    }

    /// Create an invalid context error.
    pub fn invalid_context(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidContext {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for TokenkitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
