//! Card details carried by a credit or debit card nonce.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::insight::AuthenticationInsight;
use super::json::{field_path, opt_bool, opt_object, opt_string, required_object, required_string};
use super::{NonceDetails, PaymentMethodNonce, ResponseShape};
use crate::Result;

const DETAILS_KEY: &str = "details";
const CARD_TYPE_KEY: &str = "cardType";
const LAST_TWO_KEY: &str = "lastTwo";
const LAST_FOUR_KEY: &str = "lastFour";
const BIN_KEY: &str = "bin";
const BIN_DATA_KEY: &str = "binData";
const EXPIRATION_MONTH_KEY: &str = "expirationMonth";
const EXPIRATION_YEAR_KEY: &str = "expirationYear";
const CARDHOLDER_NAME_KEY: &str = "cardholderName";
const THREE_D_SECURE_INFO_KEY: &str = "threeDSecureInfo";
const AUTHENTICATION_INSIGHT_KEY: &str = "authenticationInsight";

const GRAPHQL_TOKENIZE_CREDIT_CARD_KEY: &str = "tokenizeCreditCard";
const GRAPHQL_CREDIT_CARD_KEY: &str = "creditCard";
const GRAPHQL_BRAND_KEY: &str = "brand";
const GRAPHQL_LAST_FOUR_KEY: &str = "last4";
const GRAPHQL_TOKEN_KEY: &str = "token";

/// Placeholder used by the gateway for unknown BIN attributes and brands.
pub const UNKNOWN: &str = "Unknown";

/// Details of a tokenized card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    /// Card brand, e.g. `Visa` or `MasterCard`.
    pub card_type: String,
    /// Last two digits, for display.
    pub last_two: String,
    /// Last four digits, for display.
    pub last_four: String,
    pub bin: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub cardholder_name: String,
    pub bin_data: BinData,
    /// 3D Secure results, present only when the gateway ran 3D Secure.
    pub three_d_secure_info: Option<ThreeDSecureInfo>,
    /// Regulation environment, present only when insight was requested.
    pub authentication_insight: Option<AuthenticationInsight>,
}

/// Issuer attributes looked up from the card BIN.
///
/// Every attribute is `"Unknown"` unless the gateway reported it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinData {
    pub prepaid: String,
    pub healthcare: String,
    pub debit: String,
    pub durbin_regulated: String,
    pub commercial: String,
    pub payroll: String,
    pub issuing_bank: String,
    pub country_of_issuance: String,
    pub product_id: String,
}

const BIN_DATA_KEYS: [&str; 9] = [
    "prepaid",
    "healthcare",
    "debit",
    "durbinRegulated",
    "commercial",
    "payroll",
    "issuingBank",
    "countryOfIssuance",
    "productId",
];

impl Default for BinData {
    fn default() -> Self {
        Self::from_json(None)
    }
}

impl BinData {
    /// Parses BIN data, defaulting every absent attribute to `"Unknown"`.
    pub fn from_json(json: Option<&Value>) -> Self {
        let empty = Value::Object(Map::new());
        let json = json.unwrap_or(&empty);
        let read = |key: &str| opt_string(json, key, UNKNOWN);
        Self {
            prepaid: read("prepaid"),
            healthcare: read("healthcare"),
            debit: read("debit"),
            durbin_regulated: read("durbinRegulated"),
            commercial: read("commercial"),
            payroll: read("payroll"),
            issuing_bank: read("issuingBank"),
            country_of_issuance: read("countryOfIssuance"),
            product_id: read("productId"),
        }
    }

    /// Plain-shape JSON for this BIN data.
    pub fn to_json(&self) -> Value {
        let values = [
            &self.prepaid,
            &self.healthcare,
            &self.debit,
            &self.durbin_regulated,
            &self.commercial,
            &self.payroll,
            &self.issuing_bank,
            &self.country_of_issuance,
            &self.product_id,
        ];
        let map: Map<String, Value> = BIN_DATA_KEYS
            .iter()
            .zip(values)
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }
}

/// Outcome of a 3D Secure lookup attached to a card nonce.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDSecureInfo {
    pub liability_shifted: bool,
    pub liability_shift_possible: bool,
    pub status: String,
    pub enrolled: String,
    pub three_d_secure_version: String,
}

impl ThreeDSecureInfo {
    pub fn from_json(json: Option<&Value>) -> Option<Self> {
        let json = json?;
        Some(Self {
            liability_shifted: opt_bool(json, "liabilityShifted", false),
            liability_shift_possible: opt_bool(json, "liabilityShiftPossible", false),
            status: opt_string(json, "status", ""),
            enrolled: opt_string(json, "enrolled", ""),
            three_d_secure_version: opt_string(json, "threeDSecureVersion", ""),
        })
    }

    pub fn to_json(&self) -> Value {
        json!({
            "liabilityShifted": self.liability_shifted,
            "liabilityShiftPossible": self.liability_shift_possible,
            "status": self.status,
            "enrolled": self.enrolled,
            "threeDSecureVersion": self.three_d_secure_version,
        })
    }
}

/// Card details from a plain nonce object (also the inner REST object).
///
/// `cardType`, `lastTwo` and `lastFour` identify the card and are required;
/// the remaining sub-fields default to empty strings.
pub(crate) fn details_from_plain(
    obj: &Value,
    shape: ResponseShape,
    parent: &str,
) -> Result<CardDetails> {
    let details_path = field_path(parent, DETAILS_KEY);
    let details = required_object(obj, DETAILS_KEY, shape, parent)?;

    Ok(CardDetails {
        card_type: required_string(details, CARD_TYPE_KEY, shape, &details_path)?,
        last_two: required_string(details, LAST_TWO_KEY, shape, &details_path)?,
        last_four: required_string(details, LAST_FOUR_KEY, shape, &details_path)?,
        bin: opt_string(details, BIN_KEY, ""),
        expiration_month: opt_string(details, EXPIRATION_MONTH_KEY, ""),
        expiration_year: opt_string(details, EXPIRATION_YEAR_KEY, ""),
        cardholder_name: opt_string(details, CARDHOLDER_NAME_KEY, ""),
        bin_data: BinData::from_json(opt_object(obj, BIN_DATA_KEY)),
        three_d_secure_info: ThreeDSecureInfo::from_json(opt_object(obj, THREE_D_SECURE_INFO_KEY)),
        authentication_insight: AuthenticationInsight::from_json(opt_object(
            obj,
            AUTHENTICATION_INSIGHT_KEY,
        )),
    })
}

/// Card nonce from a GraphQL `tokenizeCreditCard` payload.
pub(crate) fn nonce_from_graphql(raw: &Value) -> Result<PaymentMethodNonce> {
    let shape = ResponseShape::GraphQl;
    let data = required_object(raw, "data", shape, "")?;
    let payload = required_object(data, GRAPHQL_TOKENIZE_CREDIT_CARD_KEY, shape, "data")?;
    let payload_path = field_path("data", GRAPHQL_TOKENIZE_CREDIT_CARD_KEY);
    let credit_card = required_object(payload, GRAPHQL_CREDIT_CARD_KEY, shape, &payload_path)?;
    let nonce = required_string(payload, GRAPHQL_TOKEN_KEY, shape, &payload_path)?;

    let last_four = opt_string(credit_card, GRAPHQL_LAST_FOUR_KEY, "");
    let details = CardDetails {
        card_type: opt_string(credit_card, GRAPHQL_BRAND_KEY, UNKNOWN),
        last_two: last_two_of(&last_four),
        last_four,
        bin: opt_string(credit_card, BIN_KEY, ""),
        expiration_month: opt_string(credit_card, EXPIRATION_MONTH_KEY, ""),
        expiration_year: opt_string(credit_card, EXPIRATION_YEAR_KEY, ""),
        cardholder_name: opt_string(credit_card, CARDHOLDER_NAME_KEY, ""),
        bin_data: BinData::from_json(opt_object(credit_card, BIN_DATA_KEY)),
        three_d_secure_info: None,
        authentication_insight: AuthenticationInsight::from_json(opt_object(
            payload,
            AUTHENTICATION_INSIGHT_KEY,
        )),
    };

    Ok(PaymentMethodNonce {
        nonce,
        is_default: false,
        details: NonceDetails::Card(details),
    })
}

/// Last two characters of a four-digit suffix, or empty when it is shorter.
pub fn last_two_of(last_four: &str) -> String {
    let count = last_four.chars().count();
    if count < 4 {
        return String::new();
    }
    last_four.chars().skip(count - 2).collect()
}

/// Writes card details back out in the plain shape.
pub(crate) fn write_plain(details: &CardDetails, out: &mut Map<String, Value>) {
    out.insert(
        DETAILS_KEY.to_string(),
        json!({
            CARD_TYPE_KEY: details.card_type,
            LAST_TWO_KEY: details.last_two,
            LAST_FOUR_KEY: details.last_four,
            BIN_KEY: details.bin,
            EXPIRATION_MONTH_KEY: details.expiration_month,
            EXPIRATION_YEAR_KEY: details.expiration_year,
            CARDHOLDER_NAME_KEY: details.cardholder_name,
        }),
    );
    out.insert(BIN_DATA_KEY.to_string(), details.bin_data.to_json());
    if let Some(info) = &details.three_d_secure_info {
        out.insert(THREE_D_SECURE_INFO_KEY.to_string(), info.to_json());
    }
    if let Some(insight) = &details.authentication_insight {
        out.insert(AUTHENTICATION_INSIGHT_KEY.to_string(), insight.to_json());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenkitError;

    #[test]
    fn test_last_two_of() {
        assert_eq!(last_two_of("1234"), "34");
        assert_eq!(last_two_of("12"), "");
        assert_eq!(last_two_of(""), "");
        assert_eq!(last_two_of("123456"), "56");
    }

    #[test]
    fn test_bin_data_defaults_to_unknown() {
        let bin_data = BinData::from_json(None);
        assert_eq!(bin_data.prepaid, UNKNOWN);
        assert_eq!(bin_data.product_id, UNKNOWN);
        assert_eq!(bin_data, BinData::default());
    }

    #[test]
    fn test_bin_data_reads_reported_values() {
        let bin_data = BinData::from_json(Some(&json!({
            "prepaid": "Yes",
            "issuingBank": "Chase",
            "countryOfIssuance": "USA"
        })));
        assert_eq!(bin_data.prepaid, "Yes");
        assert_eq!(bin_data.issuing_bank, "Chase");
        assert_eq!(bin_data.country_of_issuance, "USA");
        assert_eq!(bin_data.debit, UNKNOWN);
        assert_eq!(BinData::from_json(Some(&bin_data.to_json())), bin_data);
    }

    #[test]
    fn test_plain_details_require_card_type() {
        let obj = json!({
            "nonce": "fake-nonce",
            "details": { "lastTwo": "11", "lastFour": "1111" }
        });
        let err = details_from_plain(&obj, ResponseShape::Plain, "").unwrap_err();
        assert_eq!(
            err,
            TokenkitError::malformed(ResponseShape::Plain, "details.cardType")
        );
    }

    #[test]
    fn test_graphql_missing_payload() {
        let raw = json!({ "data": { "somethingElse": {} } });
        let err = nonce_from_graphql(&raw).unwrap_err();
        assert_eq!(
            err,
            TokenkitError::malformed(ResponseShape::GraphQl, "data.tokenizeCreditCard")
        );
    }

    #[test]
    fn test_three_d_secure_info_absent_is_none() {
        assert!(ThreeDSecureInfo::from_json(None).is_none());
        let info = ThreeDSecureInfo::from_json(Some(&json!({
            "liabilityShifted": true,
            "status": "authenticate_successful"
        })))
        .unwrap();
        assert!(info.liability_shifted);
        assert!(!info.liability_shift_possible);
        assert_eq!(info.status, "authenticate_successful");
    }
}
