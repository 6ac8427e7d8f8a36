//! Client-wide defaults passed explicitly into contexts and payloads.

use serde::{Deserialize, Serialize};

/// Source tag stamped on browser-switch metadata and account payloads.
pub const DEFAULT_SOURCE: &str = "paypal-browser";

/// Integration tag reported in `_meta`.
pub const DEFAULT_INTEGRATION: &str = "custom";

/// Configuration shared by every tokenization attempt of one client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Source tag, e.g. `paypal-browser`.
    #[serde(default = "default_source")]
    pub source: String,

    /// Integration tag, e.g. `custom` or `dropin`.
    #[serde(default = "default_integration")]
    pub integration: String,

    /// Analytics session identifier.
    #[serde(default = "generate_session_id")]
    pub session_id: String,

    /// Scheme the host app registered for deep-link returns.
    #[serde(default)]
    pub return_url_scheme: Option<String>,

    /// Age in seconds after which a restored pending context is discarded.
    /// `None` keeps restored contexts regardless of age.
    #[serde(default)]
    pub pending_context_max_age_secs: Option<u64>,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_integration() -> String {
    DEFAULT_INTEGRATION.to_string()
}

/// Random 16-byte identifier, hex encoded.
pub(crate) fn random_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

fn generate_session_id() -> String {
    random_id()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            integration: default_integration(),
            session_id: generate_session_id(),
            return_url_scheme: None,
            pending_context_max_age_secs: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the default tags and a fresh session id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source tag.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the integration tag.
    pub fn with_integration(mut self, integration: impl Into<String>) -> Self {
        self.integration = integration.into();
        self
    }

    /// Set the session id.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Set the deep-link return scheme.
    pub fn with_return_url_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.return_url_scheme = Some(scheme.into());
        self
    }

    /// Discard restored contexts older than `secs`.
    pub fn with_pending_context_max_age(mut self, secs: u64) -> Self {
        self.pending_context_max_age_secs = Some(secs);
        self
    }
}
