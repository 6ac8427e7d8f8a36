//! PayPal Checkout Browser-Switch Example
//!
//! This example walks one checkout through the orchestrator with stand-in
//! collaborators:
//! - A gateway that returns approval URLs and a tokenized account
//! - A browser that "returns" to the success deep link
//! - A console analytics sink
//!
//! # Usage
//!
//! ```bash
//! cargo run --example paypal_checkout
//! ```

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokenkit_lib::account::PayPalAccountPayload;
use tokenkit_lib::prelude::*;

const APPROVAL_URL: &str = "https://www.sandbox.paypal.com/checkoutnow?token=EC-8RU25461YX6112021";
const SUCCESS_URL: &str = "com.example.shop.braintree://onetouch/v1/success";

/// Gateway stand-in.
struct SandboxGateway;

#[async_trait]
impl NetworkClient for SandboxGateway {
    async fn fetch_approval_urls(
        &self,
        request: &PayPalRequest,
        _config: &ClientConfig,
    ) -> Result<ApprovalUrls> {
        println!("  creating payment resource (vault: {})", request.is_billing_agreement());
        Ok(ApprovalUrls::new(APPROVAL_URL, SUCCESS_URL))
    }

    async fn tokenize(&self, payload: &PayPalAccountPayload) -> Result<Value> {
        println!("  tokenizing: {}", payload.to_json());
        Ok(json!({
            "paypalAccounts": [{
                "nonce": "fake-paypal-one-time-nonce",
                "default": false,
                "details": {
                    "correlationId": payload.client_metadata_id,
                    "payerInfo": {
                        "email": "buyer@example.com",
                        "firstName": "Jane",
                        "lastName": "Doe",
                        "payerId": "PAYER-1"
                    }
                }
            }]
        }))
    }
}

/// Browser stand-in that remembers the launch and returns to the success URL.
#[derive(Default)]
struct LoopbackBrowser {
    launched: RwLock<Option<String>>,
}

impl BrowserSwitchClient for LoopbackBrowser {
    fn launch(&self, blob: &str, url: &str) -> Result<()> {
        println!("  opening {url} ({} byte blob)", blob.len());
        *self
            .launched
            .write()
            .map_err(|_| TokenkitError::Tokenization("browser lock poisoned".into()))? =
            Some(url.to_string());
        Ok(())
    }

    fn on_return(&self) -> Option<ReturnPayload> {
        let launched = self.launched.write().ok()?.take()?;
        let token = launched.split("token=").nth(1)?.to_string();
        Some(ReturnPayload::deep_link(format!(
            "{SUCCESS_URL}?token={token}&PayerID=PAYER-1"
        )))
    }
}

struct ConsoleAnalytics;

impl AnalyticsSink for ConsoleAnalytics {
    fn send_event(&self, name: &str) {
        println!("  [analytics] {name}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    println!("=== PayPal Checkout ===\n");

    let config = ClientConfig::new().with_return_url_scheme("com.example.shop.braintree");
    let mut orchestrator = TokenizationOrchestrator::new(
        config,
        Arc::new(SandboxGateway),
        Arc::new(LoopbackBrowser::default()),
    )
    .with_analytics(Arc::new(ConsoleAnalytics));

    let request: PayPalRequest = CheckoutRequest::new("24.99")
        .with_currency_code("USD")
        .with_intent(PayPalIntent::Sale)
        .into();

    println!("1. Beginning authentication");
    let context = orchestrator.begin_authentication(&request).await?;
    println!(
        "  context {} awaiting {} ({})",
        context.context_id(),
        context.correlation_token_key(),
        context.payment_type()
    );

    println!("\n2. Browser returned");
    match orchestrator.resume().await? {
        Some(TokenizeOutcome::Success(nonce)) => {
            println!("  nonce: {}", nonce.nonce);
            if let NonceDetails::PayPalAccount(account) = &nonce.details {
                println!("  payer: {} {}", account.first_name, account.email);
            }
        }
        Some(TokenizeOutcome::Cancel) => println!("  buyer canceled"),
        Some(TokenizeOutcome::Failure(err)) => println!("  failed [{:?}]: {err}", err.code()),
        None => println!("  still waiting for the browser"),
    }

    Ok(())
}
