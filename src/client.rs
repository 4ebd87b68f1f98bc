//! Request sending shared by all controllers.
//!
//! [`Client`] turns a method and an API path into an authenticated request,
//! unwraps the outer `{code, success, message, data}` envelope, and decodes
//! `data` into whatever type the controller asks for.

use reqwest::header::HeaderValue;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::IpamError;
use crate::models::ApiResponse;
use crate::session::{Session, Token};

/// Header phpIPAM reads the API token from.
pub const TOKEN_HEADER: &str = "token";

const USER_AGENT: &str = concat!("phpipam-search/", env!("CARGO_PKG_VERSION"));

/// Longest slice of a non-JSON error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Base client for phpIPAM controllers.
#[derive(Debug, Clone)]
pub struct Client {
    session: Session,
    http: reqwest::Client,
}

impl Client {
    /// Builds a client for `session`.
    ///
    /// # Errors
    ///
    /// Returns `IpamError::Http` if the underlying HTTP client cannot be
    /// constructed (e.g. the TLS backend fails to initialise).
    pub fn new(session: Session) -> Result<Self, IpamError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { session, http })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Exchanges the configured credentials for an API token and stores it
    /// in the session.
    pub async fn login(&mut self) -> Result<(), IpamError> {
        let config = &self.session.config;
        if !config.has_credentials() {
            return Err(IpamError::Config(
                "username and password are required to log in".into(),
            ));
        }

        let url = self.url("/user/");
        debug!(%url, "requesting API token");
        let request = self
            .http
            .post(&url)
            .basic_auth(&config.username, Some(&config.password));
        let token: Token = self.execute(request).await?;

        info!(expires = %token.expires, "logged in to phpIPAM");
        self.session.token = token;
        Ok(())
    }

    /// Sends a GET with no body and decodes the envelope's `data` as `T`.
    pub async fn get<T>(&self, path: &str) -> Result<T, IpamError>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path)?;
        self.execute(request).await
    }

    /// Sends `body` as JSON with `method` and decodes the envelope's `data`
    /// as `T`.
    pub async fn send_request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, IpamError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path)?.json(body);
        self.execute(request).await
    }

    /// `{endpoint}/{app_id}{path}`.
    fn url(&self, path: &str) -> String {
        let config = &self.session.config;
        format!(
            "{}/{}{}",
            config.endpoint.trim_end_matches('/'),
            config.app_id,
            path
        )
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, IpamError> {
        let url = self.url(path);
        debug!(%method, %url, "sending phpIPAM request");

        let mut builder = self.http.request(method, url);
        if self.session.has_token() {
            let token = HeaderValue::from_str(&self.session.token.value)?;
            builder = builder.header(TOKEN_HEADER, token);
        } else if self.session.config.has_credentials() {
            let config = &self.session.config;
            builder = builder.basic_auth(&config.username, Some(&config.password));
        }
        Ok(builder)
    }

    async fn execute<T>(&self, request: RequestBuilder) -> Result<T, IpamError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "received phpIPAM response");
        decode_envelope(status, &body)
    }
}

/// Unwraps the outer API envelope and decodes `data` as `T`.
fn decode_envelope<T>(status: StatusCode, body: &str) -> Result<T, IpamError>
where
    T: DeserializeOwned,
{
    let envelope: ApiResponse = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(IpamError::Api {
                code: i64::from(status.as_u16()),
                message: truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS),
            });
        }
        Err(e) => return Err(e.into()),
    };

    if !envelope.success {
        let message = envelope.message.unwrap_or_default();
        warn!(code = envelope.code, %message, "phpIPAM API returned an error");
        return Err(IpamError::Api {
            code: envelope.code,
            message,
        });
    }

    Ok(serde_json::from_str(envelope.data_json())?)
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn client(endpoint: &str) -> Client {
        let config = Config {
            app_id: "myapp".into(),
            endpoint: endpoint.into(),
            ..Config::default()
        };
        Client::new(Session::new(config)).unwrap()
    }

    mod url_tests {
        use super::*;

        #[test]
        fn test_joins_endpoint_app_id_and_path() {
            let c = client("http://ipam.local/api");
            assert_eq!(c.url("/search/x/"), "http://ipam.local/api/myapp/search/x/");
        }

        #[test]
        fn test_trailing_slash_on_endpoint_trimmed() {
            let c = client("http://ipam.local/api/");
            assert_eq!(c.url("/user/"), "http://ipam.local/api/myapp/user/");
        }
    }

    mod envelope_tests {
        use super::*;

        #[test]
        fn test_success_decodes_data() {
            let data: Vec<i64> = decode_envelope(
                StatusCode::OK,
                r#"{"code":200,"success":true,"data":[1,2,3]}"#,
            )
            .unwrap();
            assert_eq!(data, vec![1, 2, 3]);
        }

        #[test]
        fn test_unsuccessful_envelope_is_api_error() {
            let err = decode_envelope::<serde_json::Value>(
                StatusCode::UNAUTHORIZED,
                r#"{"code":401,"success":false,"message":"Please provide token"}"#,
            )
            .unwrap_err();
            match err {
                IpamError::Api { code, message } => {
                    assert_eq!(code, 401);
                    assert_eq!(message, "Please provide token");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn test_non_json_error_body_uses_http_status() {
            let err = decode_envelope::<serde_json::Value>(
                StatusCode::BAD_GATEWAY,
                "<html>bad gateway</html>",
            )
            .unwrap_err();
            assert_eq!(err.to_string(), "Error from API (502): <html>bad gateway</html>");
        }

        #[test]
        fn test_non_json_success_body_is_parse_error() {
            let err = decode_envelope::<serde_json::Value>(StatusCode::OK, "not json").unwrap_err();
            assert!(matches!(err, IpamError::JsonParse(_)));
        }
    }

    mod truncate_chars_tests {
        use super::*;

        #[test]
        fn test_short_string_unchanged() {
            assert_eq!(truncate_chars("Hello", 10), "Hello");
        }

        #[test]
        fn test_long_string_truncated() {
            assert_eq!(truncate_chars("Hello, World!", 5), "Hello...");
        }

        #[test]
        fn test_multibyte_characters() {
            assert_eq!(truncate_chars("héllo wörld", 7), "héllo w...");
        }
    }
}
