//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use tokenkit_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Error types: `TokenkitError`, `TokenkitErrorCode`, `Result`
//! - Requests and configuration: `PayPalRequest`, `CheckoutRequest`, `VaultRequest`, `ClientConfig`
//! - Correlation: `RedirectContext`, `ReturnPayload`, `CorrelationValidator`
//! - Nonces: `PaymentMethodNonce`, `NonceDetails`, `parse_nonce`
//! - Orchestration: `TokenizationOrchestrator`, `TokenizeOutcome` and the collaborator traits

// Error handling
pub use crate::errors::{TokenkitError, TokenkitErrorCode};
pub use crate::Result;

// Requests and configuration
pub use crate::config::ClientConfig;
pub use crate::request::{CheckoutRequest, PayPalIntent, PayPalRequest, VaultRequest};

// Correlation
pub use crate::context::{ApprovalUrls, PaymentType, RedirectContext};
pub use crate::validator::{CancelReason, Correlation, CorrelationValidator, ReturnPayload};

// Nonces
pub use crate::nonce::{
    parse_nonce, CardDetails, NonceDetails, PayPalAccountDetails, PaymentInstrumentType,
    PaymentMethodNonce, ResponseShape, VenmoAccountDetails,
};

// Orchestration
pub use crate::collaborators::{
    AnalyticsSink, BrowserSwitchClient, InMemoryPendingStore, NetworkClient, PendingRequestStore,
};
pub use crate::orchestrator::{TokenizationOrchestrator, TokenizeOutcome};
