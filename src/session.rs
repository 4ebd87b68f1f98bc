//! Session state shared by every controller: configuration plus API token.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Token returned by `POST /user/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "token")]
    pub value: String,
    #[serde(default)]
    pub expires: String,
}

/// Configuration and current token for one phpIPAM API.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub config: Config,
    pub token: Token,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            token: Token::default(),
        }
    }

    /// Session that already holds a token, skipping login.
    pub fn with_token(config: Config, token: impl Into<String>) -> Self {
        Self {
            config,
            token: Token {
                value: token.into(),
                expires: String::new(),
            },
        }
    }

    pub fn has_token(&self) -> bool {
        !self.token.value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_no_token() {
        assert!(!Session::new(Config::default()).has_token());
    }

    #[test]
    fn test_token_decodes_from_login_payload() {
        let token: Token =
            serde_json::from_str(r#"{"token":"foobarbazboop","expires":"2026-10-18 12:00:00"}"#)
                .unwrap();
        assert_eq!(token.value, "foobarbazboop");
        assert_eq!(token.expires, "2026-10-18 12:00:00");
    }
}
