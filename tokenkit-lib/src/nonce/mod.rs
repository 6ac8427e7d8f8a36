//! Payment method nonce parsing.
//!
//! The gateway answers tokenization calls in one of two shapes: a REST-style
//! resource collection (`{"creditCards": [{...}]}`) or a GraphQL payload
//! (`{"data": {"tokenizeCreditCard": {...}}}`). Both normalize into a single
//! [`PaymentMethodNonce`]. The inner REST object and [`PaymentMethodNonce::to_plain_json`]
//! share the "plain" shape, so parsing a serialized nonce yields the same value.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tokenkit_lib::nonce::{parse_nonce, NonceDetails, PaymentInstrumentType};
//!
//! let raw = json!({
//!     "data": {
//!         "tokenizeCreditCard": {
//!             "token": "fake-valid-nonce",
//!             "creditCard": { "brand": "Visa", "last4": "1111" }
//!         }
//!     }
//! });
//!
//! let nonce = parse_nonce(PaymentInstrumentType::CreditCard, &raw).unwrap();
//! assert_eq!(nonce.nonce, "fake-valid-nonce");
//! match nonce.details {
//!     NonceDetails::Card(card) => assert_eq!(card.last_two, "11"),
//!     _ => unreachable!(),
//! }
//! ```

mod card;
mod insight;
mod json;
mod paypal;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Result, TokenkitError};
use json::{opt_bool, required_string};

pub use card::{last_two_of, BinData, CardDetails, ThreeDSecureInfo, UNKNOWN};
pub use insight::{normalize_regulation_environment, AuthenticationInsight};
pub use paypal::{PayPalAccountDetails, VenmoAccountDetails};

const GRAPHQL_DATA_KEY: &str = "data";
const NONCE_KEY: &str = "nonce";
const DEFAULT_KEY: &str = "default";
const TYPE_KEY: &str = "type";

/// Structural shape of an upstream tokenization response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// `{"data": {...}}`
    GraphQl,
    /// `{"<resource>": [{...}]}`
    Rest,
    /// A single flat nonce object.
    Plain,
}

impl ResponseShape {
    /// Probes `raw` for the marker field of each shape.
    ///
    /// `data` wins over the resource collection when both are present.
    pub fn detect(raw: &Value, rest_resource_key: &str) -> Self {
        if raw.get(GRAPHQL_DATA_KEY).is_some() {
            Self::GraphQl
        } else if raw.get(rest_resource_key).is_some() {
            Self::Rest
        } else {
            Self::Plain
        }
    }
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GraphQl => "GraphQL",
            Self::Rest => "REST",
            Self::Plain => "plain",
        };
        f.write_str(name)
    }
}

/// Kind of payment instrument a nonce stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentInstrumentType {
    CreditCard,
    PayPalAccount,
    VenmoAccount,
}

impl PaymentInstrumentType {
    /// Key of the REST resource collection for this instrument.
    pub fn rest_resource_key(&self) -> &'static str {
        match self {
            Self::CreditCard => "creditCards",
            Self::PayPalAccount => "paypalAccounts",
            Self::VenmoAccount => "venmoAccounts",
        }
    }

    /// Type label written to the plain shape.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "CreditCard",
            Self::PayPalAccount => "PayPalAccount",
            Self::VenmoAccount => "VenmoAccount",
        }
    }
}

impl fmt::Display for PaymentInstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instrument-specific part of a nonce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "details", rename_all = "snake_case")]
pub enum NonceDetails {
    Card(CardDetails),
    PayPalAccount(PayPalAccountDetails),
    VenmoAccount(VenmoAccountDetails),
}

/// Canonical tokenized payment instrument, independent of the response shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodNonce {
    /// Single-use token standing in for the instrument.
    pub nonce: String,
    /// Whether this is the customer's default payment method.
    pub is_default: bool,
    pub details: NonceDetails,
}

impl PaymentMethodNonce {
    pub fn instrument_type(&self) -> PaymentInstrumentType {
        match self.details {
            NonceDetails::Card(_) => PaymentInstrumentType::CreditCard,
            NonceDetails::PayPalAccount(_) => PaymentInstrumentType::PayPalAccount,
            NonceDetails::VenmoAccount(_) => PaymentInstrumentType::VenmoAccount,
        }
    }

    /// Serializes the nonce in the plain shape accepted by [`parse_nonce`].
    pub fn to_plain_json(&self) -> Value {
        let mut out = Map::new();
        out.insert(NONCE_KEY.to_string(), Value::String(self.nonce.clone()));
        out.insert(DEFAULT_KEY.to_string(), Value::Bool(self.is_default));
        out.insert(
            TYPE_KEY.to_string(),
            Value::String(self.instrument_type().as_str().to_string()),
        );
        match &self.details {
            NonceDetails::Card(card) => card::write_plain(card, &mut out),
            NonceDetails::PayPalAccount(account) => paypal::write_paypal_plain(account, &mut out),
            NonceDetails::VenmoAccount(account) => paypal::write_venmo_plain(account, &mut out),
        }
        Value::Object(out)
    }
}

/// Parses a tokenization response of any shape into a [`PaymentMethodNonce`].
///
/// Only cards are tokenized over GraphQL; a GraphQL payload for another
/// instrument is reported as malformed.
pub fn parse_nonce(kind: PaymentInstrumentType, raw: &Value) -> Result<PaymentMethodNonce> {
    let rest_key = kind.rest_resource_key();
    match ResponseShape::detect(raw, rest_key) {
        ResponseShape::GraphQl => match kind {
            PaymentInstrumentType::CreditCard => card::nonce_from_graphql(raw),
            _ => Err(TokenkitError::malformed(
                ResponseShape::GraphQl,
                GRAPHQL_DATA_KEY,
            )),
        },
        ResponseShape::Rest => {
            let parent = format!("{rest_key}[0]");
            let inner = raw
                .get(rest_key)
                .and_then(Value::as_array)
                .and_then(|items| items.first())
                .filter(|item| item.is_object())
                .ok_or_else(|| TokenkitError::malformed(ResponseShape::Rest, parent.clone()))?;
            parse_plain(kind, inner, ResponseShape::Rest, &parent)
        }
        ResponseShape::Plain => parse_plain(kind, raw, ResponseShape::Plain, ""),
    }
}

fn parse_plain(
    kind: PaymentInstrumentType,
    obj: &Value,
    shape: ResponseShape,
    parent: &str,
) -> Result<PaymentMethodNonce> {
    let nonce = required_string(obj, NONCE_KEY, shape, parent)?;
    let is_default = opt_bool(obj, DEFAULT_KEY, false);

    let details = match kind {
        PaymentInstrumentType::CreditCard => {
            NonceDetails::Card(card::details_from_plain(obj, shape, parent)?)
        }
        PaymentInstrumentType::PayPalAccount => {
            NonceDetails::PayPalAccount(paypal::paypal_from_plain(obj, shape, parent)?)
        }
        PaymentInstrumentType::VenmoAccount => {
            NonceDetails::VenmoAccount(paypal::venmo_from_plain(obj, shape, parent)?)
        }
    };

    Ok(PaymentMethodNonce {
        nonce,
        is_default,
        details,
    })
}
