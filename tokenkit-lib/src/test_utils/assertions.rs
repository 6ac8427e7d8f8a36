//! Assertion helpers for tokenization outcomes.

use crate::nonce::PaymentMethodNonce;
use crate::orchestrator::TokenizeOutcome;
use crate::TokenkitError;

/// Returns the nonce of a successful outcome.
///
/// # Panics
/// Panics if the outcome is not a success.
pub fn assert_success(outcome: &TokenizeOutcome) -> &PaymentMethodNonce {
    match outcome {
        TokenizeOutcome::Success(nonce) => nonce,
        other => panic!("expected success, got {:?}", other),
    }
}

/// # Panics
/// Panics if the outcome is not a cancel.
pub fn assert_cancel(outcome: &TokenizeOutcome) {
    assert!(
        outcome.is_cancel(),
        "expected cancel, got {:?}",
        outcome
    );
}

/// Returns the error of a failed outcome.
///
/// # Panics
/// Panics if the outcome is not a failure.
pub fn assert_failure(outcome: &TokenizeOutcome) -> &TokenkitError {
    match outcome {
        TokenizeOutcome::Failure(err) => err,
        other => panic!("expected failure, got {:?}", other),
    }
}
