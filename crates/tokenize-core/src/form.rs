//! Tokenization Form Data
//!
//! The backend hands back an opaque bundle of gateway parameters. Values are
//! forwarded to the embedded frame exactly as received.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::TokenizeConfig;
use crate::error::{Result, TokenizeError};

/// Parameter names the hidden form always carries, in submission order
const KNOWN_FIELDS: [&str; 8] = [
    "service_command",
    "access_code",
    "merchant_identifier",
    "merchant_reference",
    "language",
    "signature",
    "return_url",
    "merchant_extra",
];

/// Raw backend response body
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationApiResponse {
    #[serde(default)]
    pub action_url: Option<String>,

    /// Values are usually strings; `null` and scalars are tolerated
    #[serde(default)]
    pub form_parameters: Option<BTreeMap<String, Value>>,
}

/// Form value for a raw parameter; `null` becomes empty
fn param_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Gateway parameters for one session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationFormData {
    pub action_url: String,
    pub service_command: String,
    pub access_code: String,
    pub merchant_identifier: String,
    pub merchant_reference: String,
    pub language: String,
    pub token_name: String,
    pub signature: String,
    pub merchant_extra: String,
    pub return_url: String,

    /// Parameters beyond the known set, forwarded untouched
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl TokenizationFormData {
    /// Map a backend response; a missing `formParameters` is malformed
    pub fn from_response(response: TokenizationApiResponse) -> Result<Self> {
        let mut params = response.form_parameters.ok_or_else(|| {
            TokenizeError::MalformedResponse("response has no formParameters".into())
        })?;

        let mut take = |key: &str| params.remove(key).map(param_text).unwrap_or_default();

        Ok(Self {
            action_url: response.action_url.unwrap_or_default(),
            service_command: take("service_command"),
            access_code: take("access_code"),
            merchant_identifier: take("merchant_identifier"),
            merchant_reference: take("merchant_reference"),
            language: take("language"),
            token_name: take("token_name"),
            signature: take("signature"),
            merchant_extra: take("merchant_extra"),
            return_url: take("return_url"),
            extra: params
                .into_iter()
                .map(|(key, value)| (key, param_text(value)))
                .collect(),
        })
    }

    fn known_value(&self, name: &str) -> &str {
        match name {
            "service_command" => &self.service_command,
            "access_code" => &self.access_code,
            "merchant_identifier" => &self.merchant_identifier,
            "merchant_reference" => &self.merchant_reference,
            "language" => &self.language,
            "signature" => &self.signature,
            "return_url" => &self.return_url,
            "merchant_extra" => &self.merchant_extra,
            "token_name" => &self.token_name,
            _ => "",
        }
    }
}

/// Hidden auto-submitting form that drives the embedded frame
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenForm {
    pub action: String,
    pub method: String,
    pub target: String,
    pub fields: Vec<(String, String)>,
}

impl HiddenForm {
    pub fn build(data: &TokenizationFormData, config: &TokenizeConfig) -> Self {
        let mut fields = Vec::with_capacity(KNOWN_FIELDS.len() + 2 + data.extra.len());
        fields.push(("actionUrl".to_string(), data.action_url.clone()));

        for name in KNOWN_FIELDS {
            fields.push((name.to_string(), data.known_value(name).to_string()));
        }

        // An empty token_name makes the gateway mint a fresh token
        if !data.token_name.is_empty() {
            fields.push(("token_name".to_string(), data.token_name.clone()));
        }

        fields.extend(data.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        Self {
            action: config.proxy_form_path.clone(),
            method: "get".into(),
            target: config.frame_name.clone(),
            fields,
        }
    }

    /// Value of a field by name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(params: &[(&str, &str)]) -> TokenizationApiResponse {
        TokenizationApiResponse {
            action_url: Some("https://gw.example/tokenize".into()),
            form_parameters: Some(
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_missing_parameters_is_malformed() {
        let result = TokenizationFormData::from_response(TokenizationApiResponse {
            action_url: Some("https://gw.example".into()),
            form_parameters: None,
        });
        assert!(matches!(result, Err(TokenizeError::MalformedResponse(_))));
    }

    #[test]
    fn test_absent_keys_default_to_empty() {
        let data = TokenizationFormData::from_response(response(&[("signature", "abc")])).unwrap();
        assert_eq!(data.signature, "abc");
        assert_eq!(data.access_code, "");
        assert!(data.extra.is_empty());
    }

    #[test]
    fn test_null_and_scalar_parameters_tolerated() {
        let response: TokenizationApiResponse = serde_json::from_value(serde_json::json!({
            "actionUrl": "https://gw.example/tokenize",
            "formParameters": {
                "signature": "abc",
                "merchant_extra": null,
                "token_name": null,
                "amount": 10000,
                "remember_me": false
            }
        }))
        .unwrap();

        let data = TokenizationFormData::from_response(response).unwrap();
        assert_eq!(data.signature, "abc");
        assert_eq!(data.merchant_extra, "");
        assert_eq!(data.token_name, "");
        assert_eq!(data.extra.get("amount").map(String::as_str), Some("10000"));
        assert_eq!(data.extra.get("remember_me").map(String::as_str), Some("false"));
    }

    #[test]
    fn test_hidden_form_order_and_extras() {
        let data = TokenizationFormData::from_response(response(&[
            ("signature", "abc"),
            ("merchant_reference", "TEST-1"),
            ("token_name", "tok_1"),
            ("remember_me", "NO"),
        ]))
        .unwrap();
        let form = HiddenForm::build(&data, &TokenizeConfig::default());

        let names: Vec<&str> = form.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names[0], "actionUrl");
        assert_eq!(names[1], "service_command");
        assert_eq!(&names[9..], ["token_name", "remember_me"]);
        assert_eq!(form.field("remember_me"), Some("NO"));
        assert_eq!(form.target, "paymentFrame");
        assert_eq!(form.action, "/payfort-custom-form.html");
    }

    #[test]
    fn test_empty_token_name_omitted() {
        let data = TokenizationFormData::from_response(response(&[("signature", "abc")])).unwrap();
        let form = HiddenForm::build(&data, &TokenizeConfig::default());
        assert_eq!(form.field("token_name"), None);
        assert_eq!(form.field("actionUrl"), Some("https://gw.example/tokenize"));
    }
}
