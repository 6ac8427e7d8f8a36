//! Scripted collaborators that record how they were called.

use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::fixtures;
use crate::account::PayPalAccountPayload;
use crate::collaborators::{AnalyticsSink, BrowserSwitchClient, NetworkClient};
use crate::config::ClientConfig;
use crate::context::ApprovalUrls;
use crate::request::PayPalRequest;
use crate::validator::ReturnPayload;
use crate::{Result, TokenkitError};

/// Network collaborator returning canned URLs and tokenize responses.
pub struct MockNetwork {
    urls: ApprovalUrls,
    fetch_error: Option<TokenkitError>,
    tokenize_result: Result<Value>,
    fetch_calls: RwLock<usize>,
    tokenize_calls: RwLock<Vec<Value>>,
}

impl MockNetwork {
    /// Answers `fetch_approval_urls` with `urls` and `tokenize` with a REST
    /// PayPal account response.
    pub fn new(urls: ApprovalUrls) -> Self {
        Self {
            urls,
            fetch_error: None,
            tokenize_result: Ok(fixtures::paypal_rest_response()),
            fetch_calls: RwLock::new(0),
            tokenize_calls: RwLock::new(Vec::new()),
        }
    }

    pub fn with_fetch_error(mut self, err: TokenkitError) -> Self {
        self.fetch_error = Some(err);
        self
    }

    pub fn with_tokenize_response(mut self, response: Value) -> Self {
        self.tokenize_result = Ok(response);
        self
    }

    pub fn with_tokenize_error(mut self, err: TokenkitError) -> Self {
        self.tokenize_result = Err(err);
        self
    }

    pub fn fetch_calls(&self) -> usize {
        *self.fetch_calls.read().unwrap()
    }

    /// JSON of every payload passed to `tokenize`.
    pub fn tokenize_calls(&self) -> Vec<Value> {
        self.tokenize_calls.read().unwrap().clone()
    }
}

#[async_trait]
impl NetworkClient for MockNetwork {
    async fn fetch_approval_urls(
        &self,
        _request: &PayPalRequest,
        _config: &ClientConfig,
    ) -> Result<ApprovalUrls> {
        *self.fetch_calls.write().unwrap() += 1;
        match &self.fetch_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.urls.clone()),
        }
    }

    async fn tokenize(&self, payload: &PayPalAccountPayload) -> Result<Value> {
        self.tokenize_calls.write().unwrap().push(payload.to_json());
        self.tokenize_result.clone()
    }
}

/// Browser collaborator that records launches and replays a scripted return.
#[derive(Default)]
pub struct MockBrowserSwitch {
    launch_error: Option<TokenkitError>,
    launches: RwLock<Vec<(String, String)>>,
    pending_return: RwLock<Option<ReturnPayload>>,
}

impl MockBrowserSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_launch_error(mut self, err: TokenkitError) -> Self {
        self.launch_error = Some(err);
        self
    }

    /// Makes the next `on_return` yield `payload`.
    pub fn return_with(&self, payload: ReturnPayload) {
        *self.pending_return.write().unwrap() = Some(payload);
    }

    /// `(blob, url)` of every launch.
    pub fn launches(&self) -> Vec<(String, String)> {
        self.launches.read().unwrap().clone()
    }

    /// Blob attached to the most recent launch.
    pub fn last_blob(&self) -> Option<String> {
        self.launches
            .read()
            .unwrap()
            .last()
            .map(|(blob, _)| blob.clone())
    }
}

impl BrowserSwitchClient for MockBrowserSwitch {
    fn launch(&self, blob: &str, url: &str) -> Result<()> {
        if let Some(err) = &self.launch_error {
            return Err(err.clone());
        }
        self.launches
            .write()
            .unwrap()
            .push((blob.to_string(), url.to_string()));
        Ok(())
    }

    fn on_return(&self) -> Option<ReturnPayload> {
        self.pending_return.write().unwrap().take()
    }
}

/// Analytics sink that keeps every event name in order.
#[derive(Default)]
pub struct RecordingAnalytics {
    events: RwLock<Vec<String>>,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.read().unwrap().clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn send_event(&self, name: &str) {
        self.events.write().unwrap().push(name.to_string());
    }
}
