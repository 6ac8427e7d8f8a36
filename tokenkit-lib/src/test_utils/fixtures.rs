//! URLs, contexts and gateway responses used across tests.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};

use crate::context::{ApprovalUrls, PaymentType, RedirectContext};
use crate::validator::ReturnPayload;

pub const CHECKOUT_APPROVAL_URL: &str =
    "https://checkout.paypal.com/one-touch-login-sandbox/index.html?token=EC-123&useraction=commit";
pub const VAULT_APPROVAL_URL: &str =
    "https://checkout.paypal.com/one-touch-login-sandbox/index.html?ba_token=BA-456";
pub const SUCCESS_URL: &str = "com.example.app.braintree://onetouch/v1/success";
pub const CANCEL_URL: &str = "com.example.app.braintree://onetouch/v1/cancel";

pub fn checkout_urls() -> ApprovalUrls {
    ApprovalUrls::new(CHECKOUT_APPROVAL_URL, SUCCESS_URL)
}

pub fn vault_urls() -> ApprovalUrls {
    ApprovalUrls::new(VAULT_APPROVAL_URL, SUCCESS_URL)
}

pub fn checkout_context() -> RedirectContext {
    RedirectContext::new(CHECKOUT_APPROVAL_URL, SUCCESS_URL, PaymentType::SinglePayment)
}

/// Encoded checkout context whose `created-at` is `created_at`.
pub fn blob_created_at(created_at: i64) -> String {
    let blob = json!({
        "version": 1,
        "context-id": "ctx-dated",
        "approval-url": CHECKOUT_APPROVAL_URL,
        "success-url": SUCCESS_URL,
        "payment-type": "single-payment",
        "created-at": created_at
    });
    URL_SAFE_NO_PAD.encode(blob.to_string())
}

/// Deep link to the success endpoint echoing `token`.
pub fn success_return(token: &str) -> ReturnPayload {
    ReturnPayload::deep_link(format!("{SUCCESS_URL}?token={token}&PayerID=HERMES-PAYER"))
}

/// Deep link to the success endpoint echoing a billing agreement token.
pub fn vault_success_return(ba_token: &str) -> ReturnPayload {
    ReturnPayload::deep_link(format!("{SUCCESS_URL}?ba_token={ba_token}"))
}

pub fn cancel_return() -> ReturnPayload {
    ReturnPayload::deep_link(format!("{CANCEL_URL}?token=EC-123"))
}

pub fn paypal_rest_response() -> Value {
    json!({
        "paypalAccounts": [{
            "type": "PayPalAccount",
            "nonce": "fake-paypal-nonce",
            "default": false,
            "description": "PayPal",
            "details": {
                "email": "buyer@example.com",
                "correlationId": "cmid",
                "payerInfo": {
                    "firstName": "Jane",
                    "lastName": "Doe",
                    "payerId": "HERMES-PAYER"
                }
            }
        }]
    })
}

pub fn card_rest_response() -> Value {
    json!({
        "creditCards": [{
            "type": "CreditCard",
            "nonce": "123456-12345-12345-a-adfa",
            "default": true,
            "details": {
                "cardType": "Visa",
                "lastTwo": "34",
                "lastFour": "1234",
                "bin": "411111",
                "expirationMonth": "01",
                "expirationYear": "2030",
                "cardholderName": "Joe Smith"
            },
            "binData": {
                "prepaid": "Unknown",
                "healthcare": "Yes",
                "debit": "No",
                "durbinRegulated": "Unknown",
                "commercial": "Unknown",
                "payroll": "Unknown",
                "issuingBank": "Chase",
                "countryOfIssuance": "USA",
                "productId": "Unknown"
            },
            "authenticationInsight": { "regulationEnvironment": "psdtwo" }
        }]
    })
}

/// GraphQL `tokenizeCreditCard` payload carrying the same card as
/// [`card_rest_response`], minus the REST-only default flag.
pub fn card_graphql_response() -> Value {
    json!({
        "data": {
            "tokenizeCreditCard": {
                "token": "123456-12345-12345-a-adfa",
                "creditCard": {
                    "brand": "Visa",
                    "last4": "1234",
                    "bin": "411111",
                    "expirationMonth": "01",
                    "expirationYear": "2030",
                    "cardholderName": "Joe Smith",
                    "binData": {
                        "prepaid": "Unknown",
                        "healthcare": "Yes",
                        "debit": "No",
                        "durbinRegulated": "Unknown",
                        "commercial": "Unknown",
                        "payroll": "Unknown",
                        "issuingBank": "Chase",
                        "countryOfIssuance": "USA",
                        "productId": "Unknown"
                    }
                },
                "authenticationInsight": {
                    "customerAuthenticationRegulationEnvironment": "PSDTWO"
                }
            }
        },
        "extensions": { "requestId": "fake-request-id" }
    })
}

/// Minimal GraphQL card payload with the given `last4` and optional brand.
pub fn card_graphql_with(last4: &str, brand: Option<&str>) -> Value {
    let mut credit_card = json!({ "last4": last4 });
    if let Some(brand) = brand {
        credit_card["brand"] = json!(brand);
    }
    json!({
        "data": {
            "tokenizeCreditCard": {
                "token": "fake-graphql-nonce",
                "creditCard": credit_card
            }
        }
    })
}
