//! Redirect context carried across the browser round-trip.
//!
//! A [`RedirectContext`] is created once per authentication attempt and never
//! mutated. It crosses the browser switch as an opaque blob
//! ([`RedirectContext::to_blob`]) that may also be persisted across process
//! restarts, so the blob is a versioned JSON document: unknown keys are ignored
//! and missing optional keys are defaulted on decode. Decoding is
//! deterministic, so the same blob always yields the same context.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::{random_id, ClientConfig, DEFAULT_SOURCE};
use crate::request::PayPalRequest;
use crate::{Result, TokenkitError};

/// Current version of the opaque blob layout.
pub const BLOB_VERSION: u32 = 1;

/// Correlation token query parameter for one-time payments.
pub const TOKEN_KEY: &str = "token";

/// Correlation token query parameter for billing agreements.
pub const BA_TOKEN_KEY: &str = "ba_token";

/// PayPal flow a context belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PaymentType {
    SinglePayment,
    BillingAgreement,
    #[default]
    Unknown,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SinglePayment => "single-payment",
            Self::BillingAgreement => "billing-agreement",
            Self::Unknown => "unknown",
        }
    }

    /// Case-insensitive parse. Unrecognized values map to `Unknown`.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("billing-agreement") {
            Self::BillingAgreement
        } else if raw.eq_ignore_ascii_case("single-payment") {
            Self::SinglePayment
        } else {
            Self::Unknown
        }
    }

    /// Query parameter that carries the correlation token for this flow.
    pub fn correlation_token_key(&self) -> &'static str {
        match self {
            Self::BillingAgreement => BA_TOKEN_KEY,
            Self::SinglePayment | Self::Unknown => TOKEN_KEY,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval and success URLs fetched from the gateway before the switch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalUrls {
    /// Where the buyer is sent.
    pub approval_url: String,
    /// Return URL whose last path segment signals success.
    pub success_url: String,
}

impl ApprovalUrls {
    pub fn new(approval_url: impl Into<String>, success_url: impl Into<String>) -> Self {
        Self {
            approval_url: approval_url.into(),
            success_url: success_url.into(),
        }
    }
}

/// A pending external-authentication request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectContext {
    context_id: String,
    approval_url: String,
    success_url: String,
    correlation_token_key: String,
    payment_type: PaymentType,
    client_metadata_id: String,
    merchant_account_id: Option<String>,
    intent: Option<String>,
    source: String,
    created_at: Option<i64>,
}

impl RedirectContext {
    /// Create a context with a fresh identity and client metadata id.
    ///
    /// The correlation token key follows from `payment_type`.
    pub fn new(
        approval_url: impl Into<String>,
        success_url: impl Into<String>,
        payment_type: PaymentType,
    ) -> Self {
        Self {
            context_id: random_id(),
            approval_url: approval_url.into(),
            success_url: success_url.into(),
            correlation_token_key: payment_type.correlation_token_key().to_string(),
            payment_type,
            client_metadata_id: random_id(),
            merchant_account_id: None,
            intent: None,
            source: DEFAULT_SOURCE.to_string(),
            created_at: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// Build the context for `request` from URLs the gateway already returned.
    ///
    /// Performs no I/O. The request's risk correlation id becomes the client
    /// metadata id; a random one is generated when the request has none.
    pub fn from_request(request: &PayPalRequest, urls: ApprovalUrls, config: &ClientConfig) -> Self {
        let payment_type = if request.is_billing_agreement() {
            PaymentType::BillingAgreement
        } else {
            PaymentType::SinglePayment
        };

        let mut context = Self::new(urls.approval_url, urls.success_url, payment_type)
            .with_source(config.source.clone());
        if let Some(id) = request.risk_correlation_id() {
            context = context.with_client_metadata_id(id);
        }
        if let Some(id) = request.merchant_account_id() {
            context = context.with_merchant_account_id(id);
        }
        if let Some(intent) = request.intent() {
            context = context.with_intent(intent.as_str());
        }
        context
    }

    pub fn with_client_metadata_id(mut self, id: impl Into<String>) -> Self {
        self.client_metadata_id = id.into();
        self
    }

    pub fn with_merchant_account_id(mut self, id: impl Into<String>) -> Self {
        self.merchant_account_id = Some(id.into());
        self
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Identity used to key the suspended browser return.
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub fn approval_url(&self) -> &str {
        &self.approval_url
    }

    pub fn success_url(&self) -> &str {
        &self.success_url
    }

    pub fn correlation_token_key(&self) -> &str {
        &self.correlation_token_key
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }

    pub fn client_metadata_id(&self) -> &str {
        &self.client_metadata_id
    }

    pub fn merchant_account_id(&self) -> Option<&str> {
        self.merchant_account_id.as_deref()
    }

    pub fn intent(&self) -> Option<&str> {
        self.intent.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Creation time, seconds since the Unix epoch. `None` for a decoded
    /// blob that did not record one.
    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    /// Returns true if the context was created more than `max_age_secs`
    /// before `now`. A context without a creation time never expires.
    pub fn is_expired(&self, max_age_secs: u64, now: i64) -> bool {
        let max_age = i64::try_from(max_age_secs).unwrap_or(i64::MAX);
        self.created_at
            .is_some_and(|created_at| now.saturating_sub(created_at) > max_age)
    }

    /// Encodes the context as a URL-safe base64 blob.
    pub fn to_blob(&self) -> Result<String> {
        let blob = ContextBlob {
            version: Some(BLOB_VERSION),
            context_id: Some(self.context_id.clone()),
            approval_url: Some(self.approval_url.clone()),
            success_url: Some(self.success_url.clone()),
            payment_type: Some(self.payment_type.as_str().to_string()),
            correlation_token_key: Some(self.correlation_token_key.clone()),
            client_metadata_id: Some(self.client_metadata_id.clone()),
            merchant_account_id: self.merchant_account_id.clone(),
            intent: self.intent.clone(),
            source: Some(self.source.clone()),
            created_at: self.created_at,
        };
        let json = serde_json::to_vec(&blob)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decodes a blob produced by [`RedirectContext::to_blob`] of any version.
    pub fn from_blob(blob: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(blob.trim())
            .map_err(|e| TokenkitError::invalid_context("blob", e.to_string()))?;
        let decoded: ContextBlob = serde_json::from_slice(&bytes)
            .map_err(|e| TokenkitError::invalid_context("blob", e.to_string()))?;

        let approval_url = decoded
            .approval_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| TokenkitError::invalid_context("approval-url", "missing"))?;
        let success_url = decoded
            .success_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| TokenkitError::invalid_context("success-url", "missing"))?;

        let payment_type = decoded
            .payment_type
            .as_deref()
            .map(PaymentType::parse)
            .unwrap_or_default();
        let correlation_token_key = decoded
            .correlation_token_key
            .unwrap_or_else(|| payment_type.correlation_token_key().to_string());

        let context_id = decoded
            .context_id
            .unwrap_or_else(|| fallback_context_id(&approval_url, &success_url));

        Ok(Self {
            context_id,
            approval_url,
            success_url,
            correlation_token_key,
            payment_type,
            client_metadata_id: decoded.client_metadata_id.unwrap_or_default(),
            merchant_account_id: decoded.merchant_account_id,
            intent: decoded.intent,
            source: decoded
                .source
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            created_at: decoded.created_at,
        })
    }
}

/// Identity for a blob that carries no `context-id`, derived from its URLs.
fn fallback_context_id(approval_url: &str, success_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(approval_url.as_bytes());
    hasher.update(b"\n");
    hasher.update(success_url.as_bytes());
    hex::encode(&hasher.finalize()[..16])
}

/// Wire layout of the opaque blob. Every key is optional on decode.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ContextBlob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context_id: Option<String>,
    #[serde(default)]
    approval_url: Option<String>,
    #[serde(default)]
    success_url: Option<String>,
    #[serde(default)]
    payment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correlation_token_key: Option<String>,
    #[serde(default)]
    client_metadata_id: Option<String>,
    #[serde(default)]
    merchant_account_id: Option<String>,
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<i64>,
}
