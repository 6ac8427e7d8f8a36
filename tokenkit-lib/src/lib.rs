//! Tokenkit library.
//!
//! Correlates browser-switch authentication redirects with the request that
//! started them, and normalizes the gateway's tokenization responses into a
//! single payment method nonce. Transport, browser launching, analytics and
//! persistence are injected through the traits in [`collaborators`].
//!
//! # Features
//!
//! - **Redirect correlation**: [`RedirectContext`] survives the browser round-trip
//!   as a versioned blob; [`CorrelationValidator`] classifies the return
//! - **Nonce parsing**: REST, GraphQL and plain response shapes all produce a
//!   [`PaymentMethodNonce`]
//! - **Orchestration**: [`TokenizationOrchestrator`] ties both together with
//!   one pending attempt at a time
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokenkit_lib::prelude::*;
//!
//! let mut orchestrator = TokenizationOrchestrator::new(ClientConfig::new(), network, browser);
//!
//! let context = orchestrator
//!     .begin_authentication(&CheckoutRequest::new("10.00").into())
//!     .await?;
//!
//! // ... the browser comes back with a deep link ...
//! match orchestrator.complete_authentication(&context, &payload).await? {
//!     TokenizeOutcome::Success(nonce) => println!("nonce: {}", nonce.nonce),
//!     TokenizeOutcome::Cancel => println!("buyer canceled"),
//!     TokenizeOutcome::Failure(err) => println!("failed: {err}"),
//! }
//! ```

pub mod account;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod errors;
pub mod nonce;
pub mod orchestrator;
pub mod prelude;
pub mod request;
pub mod validator;

/// Test utilities for tokenization flows.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ClientConfig;
pub use context::{ApprovalUrls, PaymentType, RedirectContext};
pub use errors::{TokenkitError, TokenkitErrorCode};
pub use nonce::{parse_nonce, NonceDetails, PaymentInstrumentType, PaymentMethodNonce};
pub use orchestrator::{TokenizationOrchestrator, TokenizeOutcome};
pub use validator::{Correlation, CorrelationValidator, ReturnPayload};

/// Common result alias for Tokenkit operations.
pub type Result<T> = std::result::Result<T, TokenkitError>;
