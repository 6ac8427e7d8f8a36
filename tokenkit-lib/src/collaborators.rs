//! Interfaces to the collaborators the orchestrator drives.
//!
//! Transport, browser launching, analytics delivery and persistence all live
//! outside this crate. Hosts implement these traits and hand them to
//! [`TokenizationOrchestrator`](crate::orchestrator::TokenizationOrchestrator).

use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::account::PayPalAccountPayload;
use crate::config::ClientConfig;
use crate::context::ApprovalUrls;
use crate::request::PayPalRequest;
use crate::validator::ReturnPayload;
use crate::{Result, TokenkitError};

/// Gateway calls made before and after the browser switch.
///
/// Errors are passed through to the caller unchanged.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Creates the payment resource and returns the approval and success URLs.
    async fn fetch_approval_urls(
        &self,
        request: &PayPalRequest,
        config: &ClientConfig,
    ) -> Result<ApprovalUrls>;

    /// Exchanges an authenticated account payload for a raw nonce response.
    async fn tokenize(&self, payload: &PayPalAccountPayload) -> Result<Value>;
}

/// Launches the external browser and reports how it returned.
pub trait BrowserSwitchClient: Send + Sync {
    /// Opens `url`, attaching the opaque context blob.
    fn launch(&self, blob: &str, url: &str) -> Result<()>;

    /// The pending return, or `None` while the browser has not come back.
    fn on_return(&self) -> Option<ReturnPayload>;
}

/// Fire-and-forget lifecycle events.
pub trait AnalyticsSink: Send + Sync {
    fn send_event(&self, name: &str);
}

/// Analytics sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn send_event(&self, _name: &str) {}
}

/// Persists the opaque blob of the pending context across process restarts.
#[async_trait]
pub trait PendingRequestStore: Send + Sync {
    async fn save(&self, blob: &str) -> Result<()>;

    async fn load(&self) -> Result<Option<String>>;

    /// Removes the pending blob. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<()>;
}

/// In-memory pending-request store.
///
/// Contents are lost when the process exits; hosts that need restart
/// recovery supply a durable [`PendingRequestStore`].
pub struct InMemoryPendingStore {
    pending: RwLock<Option<String>>,
}

fn lock_error(context: &str) -> TokenkitError {
    TokenkitError::Storage(format!(
        "InMemoryPendingStore: lock poisoned during {}",
        context
    ))
}

impl InMemoryPendingStore {
    pub fn new() -> Self {
        Self {
            pending: RwLock::new(None),
        }
    }

    /// Returns true if nothing is pending, or if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.pending.read().map(|p| p.is_none()).unwrap_or(true)
    }
}

impl Default for InMemoryPendingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PendingRequestStore for InMemoryPendingStore {
    async fn save(&self, blob: &str) -> Result<()> {
        let mut pending = self.pending.write().map_err(|_| lock_error("save"))?;
        *pending = Some(blob.to_string());
        Ok(())
    }

    async fn load(&self) -> Result<Option<String>> {
        let pending = self.pending.read().map_err(|_| lock_error("load"))?;
        Ok(pending.clone())
    }

    async fn clear(&self) -> Result<()> {
        let mut pending = self.pending.write().map_err(|_| lock_error("clear"))?;
        *pending = None;
        Ok(())
    }
}
