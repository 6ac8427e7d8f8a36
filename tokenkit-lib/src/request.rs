//! PayPal browser-switch requests.

use serde::{Deserialize, Serialize};

/// Payment intent for a one-time checkout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPalIntent {
    /// Authorize now, capture later.
    #[default]
    Authorize,
    /// Capture immediately.
    Sale,
    /// Create an order for multiple captures.
    Order,
}

impl PayPalIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authorize => "authorize",
            Self::Sale => "sale",
            Self::Order => "order",
        }
    }
}

/// One-time payment through the PayPal checkout flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Decimal amount, e.g. `"10.00"`.
    pub amount: String,
    pub currency_code: Option<String>,
    #[serde(default)]
    pub intent: PayPalIntent,
    pub merchant_account_id: Option<String>,
    /// Risk correlation id; one is generated at begin time when absent.
    pub risk_correlation_id: Option<String>,
}

impl CheckoutRequest {
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency_code: None,
            intent: PayPalIntent::default(),
            merchant_account_id: None,
            risk_correlation_id: None,
        }
    }

    pub fn with_currency_code(mut self, code: impl Into<String>) -> Self {
        self.currency_code = Some(code.into());
        self
    }

    pub fn with_intent(mut self, intent: PayPalIntent) -> Self {
        self.intent = intent;
        self
    }

    pub fn with_merchant_account_id(mut self, id: impl Into<String>) -> Self {
        self.merchant_account_id = Some(id.into());
        self
    }

    pub fn with_risk_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.risk_correlation_id = Some(id.into());
        self
    }
}

/// Billing agreement that vaults the PayPal account for future payments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRequest {
    /// Text shown to the buyer on the billing agreement page.
    pub billing_agreement_description: Option<String>,
    pub merchant_account_id: Option<String>,
    pub risk_correlation_id: Option<String>,
}

impl VaultRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_billing_agreement_description(mut self, description: impl Into<String>) -> Self {
        self.billing_agreement_description = Some(description.into());
        self
    }

    pub fn with_merchant_account_id(mut self, id: impl Into<String>) -> Self {
        self.merchant_account_id = Some(id.into());
        self
    }

    pub fn with_risk_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.risk_correlation_id = Some(id.into());
        self
    }
}

/// Request handed to `begin_authentication`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "lowercase")]
pub enum PayPalRequest {
    Checkout(CheckoutRequest),
    Vault(VaultRequest),
}

impl PayPalRequest {
    /// True for the vault (billing-agreement) flow.
    pub fn is_billing_agreement(&self) -> bool {
        matches!(self, Self::Vault(_))
    }

    /// Intent forwarded to tokenization. Vault requests carry none.
    pub fn intent(&self) -> Option<PayPalIntent> {
        match self {
            Self::Checkout(request) => Some(request.intent),
            Self::Vault(_) => None,
        }
    }

    pub fn merchant_account_id(&self) -> Option<&str> {
        match self {
            Self::Checkout(request) => request.merchant_account_id.as_deref(),
            Self::Vault(request) => request.merchant_account_id.as_deref(),
        }
    }

    pub fn risk_correlation_id(&self) -> Option<&str> {
        match self {
            Self::Checkout(request) => request.risk_correlation_id.as_deref(),
            Self::Vault(request) => request.risk_correlation_id.as_deref(),
        }
    }
}

impl From<CheckoutRequest> for PayPalRequest {
    fn from(request: CheckoutRequest) -> Self {
        Self::Checkout(request)
    }
}

impl From<VaultRequest> for PayPalRequest {
    fn from(request: VaultRequest) -> Self {
        Self::Vault(request)
    }
}
