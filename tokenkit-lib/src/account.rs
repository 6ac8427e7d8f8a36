//! Tokenization payload for an authenticated PayPal browser return.

use serde_json::{json, Map, Value};

use crate::config::ClientConfig;
use crate::context::RedirectContext;

/// Body sent to the network collaborator's `tokenize` call.
#[derive(Clone, Debug, PartialEq)]
pub struct PayPalAccountPayload {
    pub client_metadata_id: String,
    pub intent: Option<String>,
    pub payment_type: String,
    pub merchant_account_id: Option<String>,
    /// The returned deep-link URI.
    pub return_url: String,
    pub source: String,
    pub integration: String,
    pub session_id: String,
}

impl PayPalAccountPayload {
    /// Builds the payload from the consumed context and the validated return URI.
    pub fn new(context: &RedirectContext, return_url: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            client_metadata_id: context.client_metadata_id().to_string(),
            intent: context.intent().map(str::to_string),
            payment_type: context.payment_type().as_str().to_string(),
            merchant_account_id: context.merchant_account_id().map(str::to_string),
            return_url: return_url.into(),
            source: context.source().to_string(),
            integration: config.integration.clone(),
            session_id: config.session_id.clone(),
        }
    }

    /// Gateway-facing JSON.
    ///
    /// `intent` and `merchant_account_id` are omitted when absent.
    pub fn to_json(&self) -> Value {
        let mut account = Map::new();
        account.insert(
            "correlationId".to_string(),
            Value::String(self.client_metadata_id.clone()),
        );
        if let Some(intent) = &self.intent {
            account.insert("intent".to_string(), Value::String(intent.clone()));
        }
        account.insert(
            "paymentType".to_string(),
            Value::String(self.payment_type.clone()),
        );
        if let Some(id) = &self.merchant_account_id {
            account.insert("merchant_account_id".to_string(), Value::String(id.clone()));
        }
        account.insert(
            "urlResponseData".to_string(),
            json!({
                "client": { "environment": null },
                "response": { "webURL": self.return_url },
                "response_type": "web",
            }),
        );

        json!({
            "paypalAccount": Value::Object(account),
            "_meta": {
                "source": self.source,
                "integration": self.integration,
                "sessionId": self.session_id,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PaymentType;

    #[test]
    fn test_payload_json() {
        let context = RedirectContext::new(
            "https://checkout.paypal.com/?token=EC-123",
            "app://onetouch/v1/success",
            PaymentType::SinglePayment,
        )
        .with_client_metadata_id("cmid")
        .with_intent("sale")
        .with_merchant_account_id("merchant-1");
        let config = ClientConfig::new().with_session_id("session-1");
        let return_url = "app://onetouch/v1/success?token=EC-123";

        let json = PayPalAccountPayload::new(&context, return_url, &config).to_json();
        assert_eq!(
            json,
            json!({
                "paypalAccount": {
                    "correlationId": "cmid",
                    "intent": "sale",
                    "paymentType": "single-payment",
                    "merchant_account_id": "merchant-1",
                    "urlResponseData": {
                        "client": { "environment": null },
                        "response": { "webURL": return_url },
                        "response_type": "web"
                    }
                },
                "_meta": {
                    "source": "paypal-browser",
                    "integration": "custom",
                    "sessionId": "session-1"
                }
            })
        );
    }

    #[test]
    fn test_optional_fields_omitted() {
        let context = RedirectContext::new(
            "https://checkout.paypal.com/?ba_token=BA-1",
            "app://onetouch/v1/success",
            PaymentType::BillingAgreement,
        );
        let json =
            PayPalAccountPayload::new(&context, "app://onetouch/v1/success", &ClientConfig::new())
                .to_json();
        let account = &json["paypalAccount"];
        assert!(account.get("intent").is_none());
        assert!(account.get("merchant_account_id").is_none());
        assert_eq!(account["paymentType"], "billing-agreement");
    }
}
