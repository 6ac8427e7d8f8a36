//! Regulatory environment attached to a tokenized card.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::json::opt_string;

const GRAPHQL_REGULATION_ENVIRONMENT_KEY: &str = "customerAuthenticationRegulationEnvironment";
const REST_REGULATION_ENVIRONMENT_KEY: &str = "regulationEnvironment";

/// Regulation environment for a potential transaction, used to decide
/// whether strong customer authentication (3D Secure) is needed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationInsight {
    /// Lowercased regulation environment, e.g. `psd2` or `unregulated`.
    pub regulation_environment: String,
}

impl AuthenticationInsight {
    /// Parses the insight object from either response shape.
    ///
    /// Returns `None` when the response carried no insight object.
    pub fn from_json(json: Option<&Value>) -> Option<Self> {
        let json = json?;
        let raw = if json.get(GRAPHQL_REGULATION_ENVIRONMENT_KEY).is_some() {
            opt_string(json, GRAPHQL_REGULATION_ENVIRONMENT_KEY, "")
        } else {
            opt_string(json, REST_REGULATION_ENVIRONMENT_KEY, "")
        };

        Some(Self {
            regulation_environment: normalize_regulation_environment(&raw),
        })
    }

    /// Plain-shape JSON for this insight.
    pub fn to_json(&self) -> Value {
        json!({ REST_REGULATION_ENVIRONMENT_KEY: self.regulation_environment })
    }
}

/// Lowercases the value and maps the upstream `psdtwo` spelling to `psd2`.
pub fn normalize_regulation_environment(raw: &str) -> String {
    let lower = raw.to_lowercase();
    if lower == "psdtwo" {
        "psd2".to_string()
    } else {
        lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psdtwo_becomes_psd2() {
        let insight = AuthenticationInsight::from_json(Some(&json!({
            "customerAuthenticationRegulationEnvironment": "psdtwo"
        })))
        .unwrap();
        assert_eq!(insight.regulation_environment, "psd2");

        let insight = AuthenticationInsight::from_json(Some(&json!({
            "regulationEnvironment": "PsdTwo"
        })))
        .unwrap();
        assert_eq!(insight.regulation_environment, "psd2");
    }

    #[test]
    fn test_unknown_value_is_lowercased() {
        let insight = AuthenticationInsight::from_json(Some(&json!({
            "customerAuthenticationRegulationEnvironment": "FaKeVaLuE"
        })))
        .unwrap();
        assert_eq!(insight.regulation_environment, "fakevalue");
    }

    #[test]
    fn test_rest_key() {
        let insight = AuthenticationInsight::from_json(Some(&json!({
            "regulationEnvironment": "UNREGULATED"
        })))
        .unwrap();
        assert_eq!(insight.regulation_environment, "unregulated");
    }

    #[test]
    fn test_graphql_key_wins_over_rest_key() {
        let insight = AuthenticationInsight::from_json(Some(&json!({
            "customerAuthenticationRegulationEnvironment": "PSD2",
            "regulationEnvironment": "unregulated"
        })))
        .unwrap();
        assert_eq!(insight.regulation_environment, "psd2");
    }

    #[test]
    fn test_absent_object_is_none() {
        assert!(AuthenticationInsight::from_json(None).is_none());
    }
}
