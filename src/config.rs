//! Client configuration loaded from the environment.

use std::env;
use std::fmt;

use crate::error::IpamError;

/// Endpoint used when `PHPIPAM_ENDPOINT_ADDR` is unset.
pub const DEFAULT_ENDPOINT: &str = "http://localhost/api";

/// Connection settings for a phpIPAM API.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// API application id configured in phpIPAM.
    pub app_id: String,
    /// Base API URL, e.g. `https://ipam.example.com/api`.
    pub endpoint: String,
    /// User name for token login.
    pub username: String,
    /// Password for token login.
    pub password: String,
}

impl Config {
    /// Creates Config from environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            app_id: env::var("PHPIPAM_APP_ID").unwrap_or_default(),
            endpoint: env::var("PHPIPAM_ENDPOINT_ADDR").unwrap_or_else(|_| DEFAULT_ENDPOINT.into()),
            username: env::var("PHPIPAM_USER_NAME").unwrap_or_default(),
            password: env::var("PHPIPAM_PASSWORD").unwrap_or_default(),
        }
    }

    /// Checks that the fields needed to build request URLs are usable.
    ///
    /// # Errors
    ///
    /// Returns `IpamError::Config` when the app id or endpoint is empty, or
    /// when the endpoint is not an `http://` or `https://` URL.
    pub fn validate(&self) -> Result<(), IpamError> {
        if self.app_id.trim().is_empty() {
            return Err(IpamError::Config("app id is not set (PHPIPAM_APP_ID)".into()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(IpamError::Config(
                "endpoint is not set (PHPIPAM_ENDPOINT_ADDR)".into(),
            ));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(IpamError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        Ok(())
    }

    /// True when both login credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("app_id", &self.app_id)
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            app_id: "0123456789abcdefgh".into(),
            endpoint: "https://ipam.example.com/api".into(),
            username: "nobody".into(),
            password: "changeit".into(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_missing_app_id_rejected() {
        let config = Config {
            app_id: "  ".into(),
            ..valid()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PHPIPAM_APP_ID"));
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let config = Config {
            endpoint: "ftp://ipam".into(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(IpamError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("changeit"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_has_credentials() {
        assert!(valid().has_credentials());
        let config = Config {
            password: String::new(),
            ..valid()
        };
        assert!(!config.has_credentials());
    }
}
