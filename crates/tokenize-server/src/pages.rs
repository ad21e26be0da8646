//! Proxy Page
//!
//! The host page's hidden form targets this same-site page inside the
//! payment frame. It re-posts every parameter to the gateway's hosted page,
//! so the frame's first document is same-origin and can load the injector
//! script.

use html_escape::encode_double_quoted_attribute;
use thiserror::Error;
use url::Url;

/// In-frame style injector served at `/payfort-style-injector.js`
pub const STYLE_INJECTOR_JS: &str = include_str!("../assets/payfort-style-injector.js");

/// Query parameter naming the gateway URL; not forwarded
const ACTION_PARAM: &str = "actionUrl";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProxyPageError {
    #[error("missing actionUrl parameter")]
    MissingAction,

    #[error("actionUrl must be an absolute http(s) URL: {0}")]
    InvalidAction(String),
}

impl ProxyPageError {
    pub fn code(&self) -> &'static str {
        match self {
            ProxyPageError::MissingAction => "MISSING_ACTION_URL",
            ProxyPageError::InvalidAction(_) => "INVALID_ACTION_URL",
        }
    }
}

/// Render the auto-submitting proxy page from the raw query pairs
pub fn render_proxy_page(params: &[(String, String)], method: &str) -> Result<String, ProxyPageError> {
    let action = params
        .iter()
        .find(|(name, _)| name == ACTION_PARAM)
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
        .ok_or(ProxyPageError::MissingAction)?;

    let url = Url::parse(action).map_err(|_| ProxyPageError::InvalidAction(action.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ProxyPageError::InvalidAction(action.to_string()));
    }

    let fields: String = params
        .iter()
        .filter(|(name, _)| name != ACTION_PARAM)
        .map(|(name, value)| {
            format!(
                "    <input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                encode_double_quoted_attribute(name),
                encode_double_quoted_attribute(value)
            )
        })
        .collect();

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Secure payment</title>
  <script src="/payfort-style-injector.js"></script>
</head>
<body>
  <form id="gatewayForm" method="{method}" action="{action}">
{fields}  </form>
  <script>document.getElementById('gatewayForm').submit();</script>
</body>
</html>
"#,
        method = if method == "get" { "get" } else { "post" },
        action = encode_double_quoted_attribute(url.as_str()),
        fields = fields,
    ))
}
