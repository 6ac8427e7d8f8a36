//! Common collaborators for tokenkit-lib integration tests

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokenkit_lib::account::PayPalAccountPayload;
use tokenkit_lib::collaborators::{AnalyticsSink, BrowserSwitchClient, NetworkClient};
use tokenkit_lib::{ApprovalUrls, ClientConfig, Result, ReturnPayload, TokenkitError};

pub const APPROVAL_URL: &str =
    "https://checkout.paypal.com/one-touch-login-sandbox/index.html?token=EC-123";
pub const VAULT_APPROVAL_URL: &str =
    "https://checkout.paypal.com/one-touch-login-sandbox/index.html?ba_token=BA-456";
pub const SUCCESS_URL: &str = "com.example.app.braintree://onetouch/v1/success";

/// Network that hands out fixed URLs and a scripted tokenize result.
#[allow(dead_code)]
pub struct ScriptedNetwork {
    pub urls: ApprovalUrls,
    pub tokenize_result: RwLock<Result<Value>>,
    pub tokenize_payloads: RwLock<Vec<Value>>,
}

#[allow(dead_code)]
impl ScriptedNetwork {
    pub fn new(approval_url: &str) -> Arc<Self> {
        Self::with_tokenize_result(approval_url, Ok(paypal_response()))
    }

    pub fn with_tokenize_result(approval_url: &str, result: Result<Value>) -> Arc<Self> {
        Arc::new(Self {
            urls: ApprovalUrls::new(approval_url, SUCCESS_URL),
            tokenize_result: RwLock::new(result),
            tokenize_payloads: RwLock::new(Vec::new()),
        })
    }

    pub fn tokenize_count(&self) -> usize {
        self.tokenize_payloads.read().unwrap().len()
    }
}

#[async_trait]
impl NetworkClient for ScriptedNetwork {
    async fn fetch_approval_urls(
        &self,
        _request: &tokenkit_lib::request::PayPalRequest,
        _config: &ClientConfig,
    ) -> Result<ApprovalUrls> {
        Ok(self.urls.clone())
    }

    async fn tokenize(&self, payload: &PayPalAccountPayload) -> Result<Value> {
        self.tokenize_payloads.write().unwrap().push(payload.to_json());
        self.tokenize_result.read().unwrap().clone()
    }
}

/// Browser that records launches and replays one scripted return.
#[derive(Default)]
#[allow(dead_code)]
pub struct ScriptedBrowser {
    pub launches: RwLock<Vec<(String, String)>>,
    pub next_return: RwLock<Option<ReturnPayload>>,
}

#[allow(dead_code)]
impl ScriptedBrowser {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn returns(&self, payload: ReturnPayload) {
        *self.next_return.write().unwrap() = Some(payload);
    }

    pub fn last_blob(&self) -> String {
        self.launches.read().unwrap().last().unwrap().0.clone()
    }
}

impl BrowserSwitchClient for ScriptedBrowser {
    fn launch(&self, blob: &str, url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(TokenkitError::Tokenization("empty url".to_string()));
        }
        self.launches
            .write()
            .unwrap()
            .push((blob.to_string(), url.to_string()));
        Ok(())
    }

    fn on_return(&self) -> Option<ReturnPayload> {
        self.next_return.write().unwrap().take()
    }
}

/// Analytics sink that keeps event names in order.
#[derive(Default)]
pub struct EventLog {
    pub events: RwLock<Vec<String>>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn names(&self) -> Vec<String> {
        self.events.read().unwrap().clone()
    }
}

impl AnalyticsSink for EventLog {
    fn send_event(&self, name: &str) {
        self.events.write().unwrap().push(name.to_string());
    }
}

pub fn paypal_response() -> Value {
    json!({
        "paypalAccounts": [{
            "type": "PayPalAccount",
            "nonce": "fake-paypal-nonce",
            "default": false,
            "details": {
                "correlationId": "cmid",
                "payerInfo": {
                    "email": "buyer@example.com",
                    "firstName": "Jane",
                    "lastName": "Doe",
                    "payerId": "PAYER-1"
                }
            }
        }]
    })
}

#[allow(dead_code)]
pub fn deep_link(segment: &str, query: &str) -> ReturnPayload {
    ReturnPayload::deep_link(format!(
        "com.example.app.braintree://onetouch/v1/{segment}?{query}"
    ))
}
