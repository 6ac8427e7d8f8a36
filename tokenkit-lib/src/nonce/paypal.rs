//! PayPal and Venmo account details.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::json::{field_path, opt_object, opt_string, required_object};
use super::ResponseShape;
use crate::Result;

const DETAILS_KEY: &str = "details";
const PAYER_INFO_KEY: &str = "payerInfo";
const EMAIL_KEY: &str = "email";
const CORRELATION_ID_KEY: &str = "correlationId";
const USERNAME_KEY: &str = "username";

/// Details of a tokenized PayPal account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalAccountDetails {
    /// Payer email. Falls back to `payerInfo.email` when `details.email` is empty.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub payer_id: String,
    /// Client metadata id the account was tokenized with.
    pub client_metadata_id: String,
}

/// Details of a tokenized Venmo account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenmoAccountDetails {
    pub username: String,
}

pub(crate) fn paypal_from_plain(
    obj: &Value,
    shape: ResponseShape,
    parent: &str,
) -> Result<PayPalAccountDetails> {
    let details = required_object(obj, DETAILS_KEY, shape, parent)?;
    let empty = Value::Object(Map::new());
    let payer_info = opt_object(details, PAYER_INFO_KEY).unwrap_or(&empty);

    let mut email = opt_string(details, EMAIL_KEY, "");
    if email.is_empty() {
        email = opt_string(payer_info, EMAIL_KEY, "");
    }

    Ok(PayPalAccountDetails {
        email,
        first_name: opt_string(payer_info, "firstName", ""),
        last_name: opt_string(payer_info, "lastName", ""),
        phone: opt_string(payer_info, "phone", ""),
        payer_id: opt_string(payer_info, "payerId", ""),
        client_metadata_id: opt_string(details, CORRELATION_ID_KEY, ""),
    })
}

pub(crate) fn venmo_from_plain(
    obj: &Value,
    shape: ResponseShape,
    parent: &str,
) -> Result<VenmoAccountDetails> {
    let details = required_object(obj, DETAILS_KEY, shape, parent)?;
    let username = super::json::required_string(
        details,
        USERNAME_KEY,
        shape,
        &field_path(parent, DETAILS_KEY),
    )?;
    Ok(VenmoAccountDetails { username })
}

pub(crate) fn write_paypal_plain(details: &PayPalAccountDetails, out: &mut Map<String, Value>) {
    out.insert(
        DETAILS_KEY.to_string(),
        json!({
            EMAIL_KEY: details.email,
            CORRELATION_ID_KEY: details.client_metadata_id,
            PAYER_INFO_KEY: {
                "firstName": details.first_name,
                "lastName": details.last_name,
                "phone": details.phone,
                "payerId": details.payer_id,
            },
        }),
    );
}

pub(crate) fn write_venmo_plain(details: &VenmoAccountDetails, out: &mut Map<String, Value>) {
    out.insert(
        DETAILS_KEY.to_string(),
        json!({ USERNAME_KEY: details.username }),
    );
}
