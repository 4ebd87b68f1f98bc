//! Wire envelopes shared by every phpIPAM endpoint.

use serde::Deserialize;
use serde_json::value::RawValue;

/// Outer wrapper of every phpIPAM API response.
///
/// `data` stays raw until the caller names the type it expects, since its
/// shape differs per endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub code: i64,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl ApiResponse {
    /// Raw `data` text, `null` when the field was absent.
    pub fn data_json(&self) -> &str {
        self.data.as_deref().map_or("null", RawValue::get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_keeps_raw_data() {
        let resp: ApiResponse =
            serde_json::from_str(r#"{"code":200,"success":true,"data":{"a":[1, 2]}}"#).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data_json(), r#"{"a":[1, 2]}"#);
    }

    #[test]
    fn test_failure_envelope_without_data() {
        let resp: ApiResponse =
            serde_json::from_str(r#"{"code":401,"success":false,"message":"Invalid token"}"#)
                .unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("Invalid token"));
        assert_eq!(resp.data_json(), "null");
    }
}
