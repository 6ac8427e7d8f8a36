//! Classification of browser returns.
//!
//! The order of the checks matters. A return to anything other than the
//! success endpoint is a cancel, even when it carries a token. A success
//! return without a token is a generic failure. Only a success return whose
//! token differs from the one sent out is a correlation mismatch.
//!
//! Cancellation is detected by comparing the last path segment of the return
//! URI with that of the success URL. Two endpoints that happen to share a last
//! segment are indistinguishable; the comparison is kept as-is for
//! compatibility with the provider's redirects.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::context::RedirectContext;
use crate::TokenkitError;

/// What the browser-switch collaborator handed back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnPayload {
    /// The deep-link URI the OS delivered to the app.
    DeepLink(String),
    /// The browser flow ended without a deep link.
    NoReturn,
}

impl ReturnPayload {
    pub fn deep_link(uri: impl Into<String>) -> Self {
        Self::DeepLink(uri.into())
    }

    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::DeepLink(uri) => Some(uri.as_str()),
            Self::NoReturn => None,
        }
    }
}

impl From<Option<String>> for ReturnPayload {
    fn from(uri: Option<String>) -> Self {
        uri.map_or(Self::NoReturn, Self::DeepLink)
    }
}

/// Why a return was classified as a cancel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelReason {
    /// No deep link came back.
    NoReturn,
    /// The provider redirected to an endpoint other than the success URL.
    CancelEndpoint,
}

/// Result of validating a browser return against its context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Correlation {
    /// The return is authentic.
    Authenticated {
        /// Correlation token echoed back by the provider.
        token: String,
        /// Full returned URI.
        return_url: String,
    },
    Canceled(CancelReason),
    Failed(TokenkitError),
}

impl Correlation {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Validates browser returns against a [`RedirectContext`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CorrelationValidator;

impl CorrelationValidator {
    pub fn new() -> Self {
        Self
    }

    /// Classifies `payload` as authenticated, canceled or failed.
    pub fn validate(&self, context: &RedirectContext, payload: &ReturnPayload) -> Correlation {
        let Some(uri) = payload.uri() else {
            #[cfg(feature = "tracing")]
            tracing::debug!(context_id = context.context_id(), "browser returned without a deep link");
            return Correlation::Canceled(CancelReason::NoReturn);
        };

        let returned = match Url::parse(uri) {
            Ok(url) => url,
            Err(e) => {
                return Correlation::Failed(TokenkitError::Tokenization(format!(
                    "unparsable return URI: {e}"
                )))
            }
        };
        let success = match Url::parse(context.success_url()) {
            Ok(url) => url,
            Err(e) => {
                return Correlation::Failed(TokenkitError::invalid_context(
                    "success-url",
                    e.to_string(),
                ))
            }
        };

        if last_path_segment(&returned) != last_path_segment(&success) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                context_id = context.context_id(),
                status = ?last_path_segment(&returned),
                "browser returned to a non-success endpoint"
            );
            return Correlation::Canceled(CancelReason::CancelEndpoint);
        }

        let approval = match Url::parse(context.approval_url()) {
            Ok(url) => url,
            Err(e) => {
                return Correlation::Failed(TokenkitError::invalid_context(
                    "approval-url",
                    e.to_string(),
                ))
            }
        };

        let key = context.correlation_token_key();
        let request_token = query_param(&approval, key);
        let Some(response_token) = query_param(&returned, key) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(context_id = context.context_id(), key, "success return lacks the correlation token");
            return Correlation::Failed(TokenkitError::Tokenization("Unknown error".to_string()));
        };

        if request_token.as_deref() != Some(response_token.as_str()) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                context_id = context.context_id(),
                key,
                response_token = %redact(&response_token),
                "correlation token mismatch"
            );
            return Correlation::Failed(TokenkitError::CorrelationMismatch);
        }

        Correlation::Authenticated {
            token: response_token,
            return_url: uri.to_string(),
        }
    }
}

/// Last non-empty path segment, percent-decoded, if any.
///
/// A segment that does not decode to UTF-8 is compared in its raw form.
pub fn last_path_segment(url: &Url) -> Option<String> {
    let segment = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()?;
    Some(
        urlencoding::decode(segment)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| segment.to_string()),
    )
}

/// First value of the query parameter `key`, percent-decoded.
pub fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}

#[cfg(feature = "tracing")]
fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(3).collect();
    format!("{prefix}*** ({} chars)", token.chars().count())
}
