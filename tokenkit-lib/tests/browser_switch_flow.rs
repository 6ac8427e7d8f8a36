//! End-to-end browser-switch flows through the orchestrator.

mod common;

use std::sync::Arc;

use common::{deep_link, EventLog, ScriptedBrowser, ScriptedNetwork};
use tokenkit_lib::collaborators::InMemoryPendingStore;
use tokenkit_lib::orchestrator::events;
use tokenkit_lib::prelude::*;

fn orchestrator(
    network: Arc<ScriptedNetwork>,
    browser: Arc<ScriptedBrowser>,
    analytics: Arc<EventLog>,
) -> TokenizationOrchestrator {
    TokenizationOrchestrator::new(
        ClientConfig::new().with_session_id("session-1"),
        network,
        browser,
    )
    .with_analytics(analytics)
}

fn checkout() -> PayPalRequest {
    CheckoutRequest::new("10.00")
        .with_intent(PayPalIntent::Sale)
        .with_risk_correlation_id("risk-1")
        .into()
}

#[tokio::test]
async fn test_matching_token_tokenizes_account() {
    let network = ScriptedNetwork::new(common::APPROVAL_URL);
    let browser = ScriptedBrowser::new();
    let analytics = EventLog::new();
    let mut orchestrator = orchestrator(network.clone(), browser.clone(), analytics.clone());

    let context = orchestrator.begin_authentication(&checkout()).await.unwrap();
    assert_eq!(context.correlation_token_key(), "token");
    assert_eq!(browser.launches.read().unwrap()[0].1, common::APPROVAL_URL);

    let payload = deep_link("success", "token=EC-123&PayerID=PAYER-1");
    let outcome = orchestrator
        .complete_authentication(&context, &payload)
        .await
        .unwrap();

    let TokenizeOutcome::Success(nonce) = &outcome else {
        panic!("expected success, got {:?}", outcome);
    };
    assert_eq!(nonce.nonce, "fake-paypal-nonce");
    assert_eq!(nonce.instrument_type(), PaymentInstrumentType::PayPalAccount);
    let NonceDetails::PayPalAccount(account) = &nonce.details else {
        panic!("expected paypal account details");
    };
    assert_eq!(account.email, "buyer@example.com");

    let sent = network.tokenize_payloads.read().unwrap()[0].clone();
    assert_eq!(sent["paypalAccount"]["correlationId"], "risk-1");
    assert_eq!(sent["paypalAccount"]["intent"], "sale");
    assert_eq!(sent["paypalAccount"]["paymentType"], "single-payment");
    assert_eq!(
        sent["paypalAccount"]["urlResponseData"]["response"]["webURL"],
        payload.uri().unwrap()
    );
    assert_eq!(sent["_meta"]["source"], "paypal-browser");
    assert_eq!(sent["_meta"]["sessionId"], "session-1");

    assert_eq!(
        analytics.names(),
        vec![events::TOKENIZATION_STARTED, events::TOKENIZATION_SUCCEEDED]
    );
    assert!(orchestrator.is_idle());
}

#[tokio::test]
async fn test_no_deep_link_cancels_without_network() {
    let network = ScriptedNetwork::new(common::APPROVAL_URL);
    let analytics = EventLog::new();
    let mut orchestrator = orchestrator(network.clone(), ScriptedBrowser::new(), analytics.clone());

    let context = orchestrator.begin_authentication(&checkout()).await.unwrap();
    let outcome = orchestrator
        .complete_authentication(&context, &ReturnPayload::NoReturn)
        .await
        .unwrap();

    assert_eq!(outcome, TokenizeOutcome::Cancel);
    assert_eq!(network.tokenize_count(), 0);
    assert_eq!(
        analytics.names(),
        vec![events::TOKENIZATION_STARTED, events::BROWSER_LOGIN_CANCELED]
    );
}

#[tokio::test]
async fn test_cancel_endpoint_cancels() {
    let network = ScriptedNetwork::new(common::APPROVAL_URL);
    let mut orchestrator = orchestrator(network.clone(), ScriptedBrowser::new(), EventLog::new());

    let context = orchestrator.begin_authentication(&checkout()).await.unwrap();
    let outcome = orchestrator
        .complete_authentication(&context, &deep_link("cancel", "token=EC-123"))
        .await
        .unwrap();

    assert!(outcome.is_cancel());
    assert!(outcome.error().is_none());
    assert_eq!(network.tokenize_count(), 0);
}

#[tokio::test]
async fn test_replayed_token_is_correlation_mismatch() {
    let network = ScriptedNetwork::new(common::APPROVAL_URL);
    let analytics = EventLog::new();
    let mut orchestrator = orchestrator(network.clone(), ScriptedBrowser::new(), analytics.clone());

    let context = orchestrator.begin_authentication(&checkout()).await.unwrap();
    let outcome = orchestrator
        .complete_authentication(&context, &deep_link("success", "token=EC-999"))
        .await
        .unwrap();

    let err = outcome.error().unwrap();
    assert_eq!(*err, TokenkitError::CorrelationMismatch);
    assert_eq!(err.code(), TokenkitErrorCode::CorrelationMismatch);
    assert!(err.is_security_relevant());
    assert!(!err.is_retryable());
    assert_eq!(network.tokenize_count(), 0);
    assert_eq!(
        analytics.names(),
        vec![events::TOKENIZATION_STARTED, events::TOKENIZATION_FAILED]
    );
}

#[tokio::test]
async fn test_missing_return_token_is_generic_failure() {
    let network = ScriptedNetwork::new(common::APPROVAL_URL);
    let mut orchestrator = orchestrator(network.clone(), ScriptedBrowser::new(), EventLog::new());

    let context = orchestrator.begin_authentication(&checkout()).await.unwrap();
    let outcome = orchestrator
        .complete_authentication(&context, &deep_link("success", "PayerID=PAYER-1"))
        .await
        .unwrap();

    assert!(matches!(
        outcome.error(),
        Some(TokenkitError::Tokenization(_))
    ));
    assert_eq!(network.tokenize_count(), 0);
}

#[tokio::test]
async fn test_completing_twice_fails_fast() {
    let network = ScriptedNetwork::new(common::APPROVAL_URL);
    let mut orchestrator = orchestrator(network.clone(), ScriptedBrowser::new(), EventLog::new());

    let context = orchestrator.begin_authentication(&checkout()).await.unwrap();
    let payload = deep_link("success", "token=EC-123");
    let first = orchestrator
        .complete_authentication(&context, &payload)
        .await
        .unwrap();
    assert!(first.is_success());

    let err = orchestrator
        .complete_authentication(&context, &payload)
        .await
        .unwrap_err();
    assert_eq!(err, TokenkitError::NoPendingAuthentication);
    assert_eq!(network.tokenize_count(), 1);
}

#[tokio::test]
async fn test_vault_flow_uses_ba_token() {
    let network = ScriptedNetwork::new(common::VAULT_APPROVAL_URL);
    let mut orchestrator = orchestrator(network.clone(), ScriptedBrowser::new(), EventLog::new());

    let request: PayPalRequest = VaultRequest::new()
        .with_billing_agreement_description("Monthly plan")
        .into();
    let context = orchestrator.begin_authentication(&request).await.unwrap();
    assert_eq!(context.payment_type(), PaymentType::BillingAgreement);
    assert_eq!(context.correlation_token_key(), "ba_token");

    let outcome = orchestrator
        .complete_authentication(&context, &deep_link("success", "ba_token=BA-456"))
        .await
        .unwrap();
    assert!(outcome.is_success());

    let sent = network.tokenize_payloads.read().unwrap()[0].clone();
    assert_eq!(sent["paypalAccount"]["paymentType"], "billing-agreement");
    assert!(sent["paypalAccount"].get("intent").is_none());
}

#[tokio::test]
async fn test_upstream_tokenize_error_passes_through() {
    let network = ScriptedNetwork::with_tokenize_result(
        common::APPROVAL_URL,
        Err(TokenkitError::Upstream("503 Service Unavailable".to_string())),
    );
    let mut orchestrator = orchestrator(network, ScriptedBrowser::new(), EventLog::new());

    let context = orchestrator.begin_authentication(&checkout()).await.unwrap();
    let outcome = orchestrator
        .complete_authentication(&context, &deep_link("success", "token=EC-123"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        TokenizeOutcome::Failure(TokenkitError::Upstream("503 Service Unavailable".to_string()))
    );
}

#[tokio::test]
async fn test_malformed_tokenize_response_fails() {
    let network = ScriptedNetwork::with_tokenize_result(
        common::APPROVAL_URL,
        Ok(serde_json::json!({ "paypalAccounts": [{ "details": {} }] })),
    );
    let mut orchestrator = orchestrator(network, ScriptedBrowser::new(), EventLog::new());

    let context = orchestrator.begin_authentication(&checkout()).await.unwrap();
    let outcome = orchestrator
        .complete_authentication(&context, &deep_link("success", "token=EC-123"))
        .await
        .unwrap();

    assert_eq!(
        outcome.error(),
        Some(&TokenkitError::malformed(
            ResponseShape::Rest,
            "paypalAccounts[0].nonce"
        ))
    );
}

#[tokio::test]
async fn test_restore_after_restart() {
    let network = ScriptedNetwork::new(common::APPROVAL_URL);
    let store = Arc::new(InMemoryPendingStore::new());

    let context = {
        let mut before_restart =
            orchestrator(network.clone(), ScriptedBrowser::new(), EventLog::new())
                .with_store(store.clone());
        before_restart.begin_authentication(&checkout()).await.unwrap()
    };

    let browser = ScriptedBrowser::new();
    let mut after_restart =
        orchestrator(network.clone(), browser.clone(), EventLog::new()).with_store(store.clone());
    assert!(after_restart.is_idle());

    let restored = after_restart.restore().await.unwrap().unwrap();
    assert_eq!(restored, context);

    assert_eq!(after_restart.resume().await.unwrap(), None);

    browser.returns(deep_link("success", "token=EC-123"));
    let outcome = after_restart.resume().await.unwrap().unwrap();
    assert!(outcome.is_success());
    assert!(store.is_empty());
    assert_eq!(after_restart.restore().await.unwrap(), None);
}

#[tokio::test]
async fn test_blob_handed_to_browser_decodes_to_context() {
    let browser = ScriptedBrowser::new();
    let mut orchestrator = orchestrator(
        ScriptedNetwork::new(common::APPROVAL_URL),
        browser.clone(),
        EventLog::new(),
    );

    let context = orchestrator.begin_authentication(&checkout()).await.unwrap();
    let decoded = RedirectContext::from_blob(&browser.last_blob()).unwrap();
    assert_eq!(decoded, context);
}

#[tokio::test]
async fn test_restored_blob_without_id_matches_host_decode() {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let blob = URL_SAFE_NO_PAD.encode(
        serde_json::json!({
            "approval-url": common::APPROVAL_URL,
            "success-url": common::SUCCESS_URL,
            "payment-type": "single-payment"
        })
        .to_string(),
    );
    let store = Arc::new(InMemoryPendingStore::new());
    store.save(&blob).await.unwrap();

    let mut orchestrator = orchestrator(
        ScriptedNetwork::new(common::APPROVAL_URL),
        ScriptedBrowser::new(),
        EventLog::new(),
    )
    .with_store(store);
    orchestrator.restore().await.unwrap().unwrap();

    let host_copy = RedirectContext::from_blob(&blob).unwrap();
    let outcome = orchestrator
        .complete_authentication(&host_copy, &deep_link("success", "token=EC-123"))
        .await
        .unwrap();
    assert!(outcome.is_success());
}
