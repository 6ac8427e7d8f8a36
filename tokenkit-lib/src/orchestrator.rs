//! Browser-switch tokenization state machine.
//!
//! ```text
//! Idle --begin_authentication--> AwaitingBrowserReturn
//! AwaitingBrowserReturn --complete_authentication--> Idle
//!     yields Success(nonce) | Cancel | Failure(error)
//! ```
//!
//! One context is outstanding at a time. A second `begin` while a context is
//! pending fails with [`TokenkitError::AuthenticationInProgress`]; completing
//! with nothing pending, or with a context other than the pending one, fails
//! fast without touching the pending state. A browser that never returns
//! leaves the orchestrator waiting until [`TokenizationOrchestrator::abandon`]
//! is called; the pending blob survives restarts through the
//! [`PendingRequestStore`] and is rehydrated by
//! [`TokenizationOrchestrator::restore`].
//!
//! Nothing is retried here. Cancel and failure outcomes are returned to the
//! caller, which decides whether to begin again.

use std::sync::Arc;

use crate::account::PayPalAccountPayload;
use crate::collaborators::{
    AnalyticsSink, BrowserSwitchClient, InMemoryPendingStore, NetworkClient, NoopAnalytics,
    PendingRequestStore,
};
use crate::config::ClientConfig;
use crate::context::{ApprovalUrls, RedirectContext};
use crate::nonce::{parse_nonce, PaymentInstrumentType, PaymentMethodNonce};
use crate::request::PayPalRequest;
use crate::validator::{Correlation, CorrelationValidator, ReturnPayload};
use crate::{Result, TokenkitError};

/// Analytics event names sent at fixed lifecycle points.
pub mod events {
    pub const TOKENIZATION_STARTED: &str = "paypal:tokenize:started";
    pub const TOKENIZATION_SUCCEEDED: &str = "paypal:tokenize:succeeded";
    pub const TOKENIZATION_FAILED: &str = "paypal:tokenize:failed";
    pub const BROWSER_LOGIN_CANCELED: &str = "paypal:tokenize:browser-login:canceled";
}

/// Terminal result of one authentication attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenizeOutcome {
    Success(PaymentMethodNonce),
    /// The user backed out. Not an error.
    Cancel,
    Failure(TokenkitError),
}

impl TokenizeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel)
    }

    pub fn nonce(&self) -> Option<&PaymentMethodNonce> {
        match self {
            Self::Success(nonce) => Some(nonce),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TokenkitError> {
        match self {
            Self::Failure(err) => Some(err),
            _ => None,
        }
    }

    /// Collapses the outcome into a `Result` for hosts that bridge a single
    /// success-or-error callback. A cancel becomes
    /// [`TokenkitError::UserCanceled`].
    pub fn into_result(self) -> Result<PaymentMethodNonce> {
        match self {
            Self::Success(nonce) => Ok(nonce),
            Self::Cancel => Err(TokenkitError::UserCanceled),
            Self::Failure(err) => Err(err),
        }
    }
}

#[derive(Debug)]
enum State {
    Idle,
    AwaitingBrowserReturn(RedirectContext),
}

/// Drives one PayPal browser-switch authentication at a time.
pub struct TokenizationOrchestrator {
    config: ClientConfig,
    network: Arc<dyn NetworkClient>,
    browser: Arc<dyn BrowserSwitchClient>,
    analytics: Arc<dyn AnalyticsSink>,
    store: Arc<dyn PendingRequestStore>,
    validator: CorrelationValidator,
    state: State,
}

impl TokenizationOrchestrator {
    /// Create an idle orchestrator with no analytics and an in-memory store.
    pub fn new(
        config: ClientConfig,
        network: Arc<dyn NetworkClient>,
        browser: Arc<dyn BrowserSwitchClient>,
    ) -> Self {
        Self {
            config,
            network,
            browser,
            analytics: Arc::new(NoopAnalytics),
            store: Arc::new(InMemoryPendingStore::new()),
            validator: CorrelationValidator::new(),
            state: State::Idle,
        }
    }

    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn PendingRequestStore>) -> Self {
        self.store = store;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The context awaiting a browser return, if any.
    pub fn pending(&self) -> Option<&RedirectContext> {
        match &self.state {
            State::Idle => None,
            State::AwaitingBrowserReturn(context) => Some(context),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Fetches approval URLs for `request`, then persists and launches the context.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, request), fields(billing_agreement = request.is_billing_agreement()))
    )]
    pub async fn begin_authentication(&mut self, request: &PayPalRequest) -> Result<RedirectContext> {
        self.ensure_idle()?;
        self.analytics.send_event(events::TOKENIZATION_STARTED);

        let urls = match self.network.fetch_approval_urls(request, &self.config).await {
            Ok(urls) => urls,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "fetching approval urls failed");
                self.analytics.send_event(events::TOKENIZATION_FAILED);
                return Err(err);
            }
        };
        self.start(request, urls).await
    }

    /// Same as [`begin_authentication`](Self::begin_authentication) with URLs
    /// the host already fetched.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, request, urls)))]
    pub async fn begin_with_approval_urls(
        &mut self,
        request: &PayPalRequest,
        urls: ApprovalUrls,
    ) -> Result<RedirectContext> {
        self.ensure_idle()?;
        self.analytics.send_event(events::TOKENIZATION_STARTED);
        self.start(request, urls).await
    }

    async fn start(&mut self, request: &PayPalRequest, urls: ApprovalUrls) -> Result<RedirectContext> {
        let context = RedirectContext::from_request(request, urls, &self.config);
        let launched = self.persist_and_launch(&context).await;
        if let Err(err) = launched {
            self.analytics.send_event(events::TOKENIZATION_FAILED);
            return Err(err);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            context_id = context.context_id(),
            payment_type = %context.payment_type(),
            "awaiting browser return"
        );
        self.state = State::AwaitingBrowserReturn(context.clone());
        Ok(context)
    }

    async fn persist_and_launch(&self, context: &RedirectContext) -> Result<()> {
        let blob = context.to_blob()?;
        self.store.save(&blob).await?;
        if let Err(err) = self.browser.launch(&blob, context.approval_url()) {
            self.clear_store().await;
            return Err(err);
        }
        Ok(())
    }

    /// Consumes the pending context and classifies the browser return.
    ///
    /// Only authenticated returns reach the network. The `Err` case is
    /// reserved for misuse: nothing pending, or `context` is not the pending
    /// one. Every other problem is a [`TokenizeOutcome::Failure`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, context, payload), fields(context_id = context.context_id()))
    )]
    pub async fn complete_authentication(
        &mut self,
        context: &RedirectContext,
        payload: &ReturnPayload,
    ) -> Result<TokenizeOutcome> {
        let pending = match &self.state {
            State::Idle => return Err(TokenkitError::NoPendingAuthentication),
            State::AwaitingBrowserReturn(pending) => pending,
        };
        if pending.context_id() != context.context_id() {
            return Err(TokenkitError::ContextMismatch {
                expected: pending.context_id().to_string(),
                actual: context.context_id().to_string(),
            });
        }

        let pending = match std::mem::replace(&mut self.state, State::Idle) {
            State::AwaitingBrowserReturn(pending) => pending,
            State::Idle => return Err(TokenkitError::NoPendingAuthentication),
        };
        self.clear_store().await;

        let outcome = match self.validator.validate(&pending, payload) {
            Correlation::Canceled(_) => TokenizeOutcome::Cancel,
            Correlation::Failed(err) => TokenizeOutcome::Failure(err),
            Correlation::Authenticated { return_url, .. } => {
                match self.tokenize(&pending, return_url).await {
                    Ok(nonce) => TokenizeOutcome::Success(nonce),
                    Err(err) => TokenizeOutcome::Failure(err),
                }
            }
        };

        self.analytics.send_event(match &outcome {
            TokenizeOutcome::Success(_) => events::TOKENIZATION_SUCCEEDED,
            TokenizeOutcome::Cancel => events::BROWSER_LOGIN_CANCELED,
            TokenizeOutcome::Failure(_) => events::TOKENIZATION_FAILED,
        });
        if let TokenizeOutcome::Failure(_err) = &outcome {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                code = ?_err.code(),
                security_relevant = _err.is_security_relevant(),
                error = %_err,
                "authentication failed"
            );
        }
        Ok(outcome)
    }

    async fn tokenize(
        &self,
        context: &RedirectContext,
        return_url: String,
    ) -> Result<PaymentMethodNonce> {
        let payload = PayPalAccountPayload::new(context, return_url, &self.config);
        let raw = self.network.tokenize(&payload).await?;
        parse_nonce(PaymentInstrumentType::PayPalAccount, &raw)
    }

    /// Polls the browser collaborator and completes the pending context if it
    /// has returned. `Ok(None)` means the browser has not come back yet.
    pub async fn resume(&mut self) -> Result<Option<TokenizeOutcome>> {
        let Some(pending) = self.pending().cloned() else {
            return Err(TokenkitError::NoPendingAuthentication);
        };
        match self.browser.on_return() {
            Some(payload) => self.complete_authentication(&pending, &payload).await.map(Some),
            None => Ok(None),
        }
    }

    /// Rehydrates the pending context from the store after a restart.
    ///
    /// A blob that no longer decodes, or whose context is older than
    /// [`ClientConfig::pending_context_max_age_secs`], is cleared and reported
    /// as [`TokenkitError::InvalidContext`].
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn restore(&mut self) -> Result<Option<RedirectContext>> {
        self.ensure_idle()?;
        let Some(blob) = self.store.load().await? else {
            return Ok(None);
        };
        let context = match RedirectContext::from_blob(&blob) {
            Ok(context) => context,
            Err(err) => {
                self.clear_store().await;
                return Err(err);
            }
        };
        if let Some(max_age) = self.config.pending_context_max_age_secs {
            if context.is_expired(max_age, chrono::Utc::now().timestamp()) {
                #[cfg(feature = "tracing")]
                tracing::debug!(context_id = context.context_id(), "discarding expired pending context");
                self.clear_store().await;
                return Err(TokenkitError::invalid_context("created-at", "expired"));
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(context_id = context.context_id(), "restored pending context");
        self.state = State::AwaitingBrowserReturn(context.clone());
        Ok(Some(context))
    }

    /// Drops the pending context without an outcome and returns to idle.
    pub async fn abandon(&mut self) -> Option<RedirectContext> {
        let previous = std::mem::replace(&mut self.state, State::Idle);
        self.clear_store().await;
        match previous {
            State::Idle => None,
            State::AwaitingBrowserReturn(context) => Some(context),
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        match &self.state {
            State::Idle => Ok(()),
            State::AwaitingBrowserReturn(pending) => Err(TokenkitError::AuthenticationInProgress {
                context_id: pending.context_id().to_string(),
            }),
        }
    }

    // Clear failures are logged only.
    async fn clear_store(&self) {
        if let Err(_err) = self.store.clear().await {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "failed to clear pending request");
        }
    }
}
