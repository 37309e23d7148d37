//! Wire contract of the remote conversion service.

use serde::{Deserialize, Serialize};

/// Path of the conversion endpoint, relative to the server base URL.
pub const CONVERT_PATH: &str = "convert";

/// Query string of `GET /convert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertQuery {
    pub text: String,
}

/// Success body of `GET /convert`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::ConvertResponse;

    #[test]
    fn response_ignores_unknown_fields() {
        let body = r#"{"text":"4.59 EUR","rate":0.918}"#;
        let parsed: ConvertResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(parsed.text, "4.59 EUR");
    }

    #[test]
    fn response_requires_string_text() {
        assert!(serde_json::from_str::<ConvertResponse>(r#"{"text":42}"#).is_err());
        assert!(serde_json::from_str::<ConvertResponse>(r#"{}"#).is_err());
    }
}
