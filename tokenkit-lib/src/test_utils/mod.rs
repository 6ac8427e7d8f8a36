//! Test utilities for tokenization flows.
//!
//! Provides mock collaborators with scripted behavior, JSON fixtures for every
//! response shape, and assertion helpers for outcomes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokenkit_lib::test_utils::{fixtures, MockBrowserSwitch, MockNetwork};
//!
//! let network = Arc::new(MockNetwork::new(fixtures::checkout_urls()));
//! let browser = Arc::new(MockBrowserSwitch::new());
//! browser.return_with(fixtures::success_return("EC-123"));
//! ```

mod assertions;
pub mod fixtures;
mod mock_collaborators;

pub use assertions::{assert_cancel, assert_failure, assert_success};
pub use mock_collaborators::{MockBrowserSwitch, MockNetwork, RecordingAnalytics};
