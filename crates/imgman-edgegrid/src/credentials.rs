//! Client credentials used to sign every outgoing request.

use std::fmt::{self, Debug, Formatter};

use url::Url;

use crate::error::{ApiError, ApiResult};

/// Request bodies beyond this many bytes are not included in the content hash.
pub const DEFAULT_MAX_BODY: usize = 131_072;

/// `EdgeGrid` client credential set.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API hostname, without scheme.
    pub host: String,
    /// Client token issued with the API client.
    pub client_token: String,
    /// Secret used to derive per-request signing keys.
    pub client_secret: String,
    /// Access token issued with the API client.
    pub access_token: String,
    /// Maximum number of body bytes hashed when signing.
    pub max_body: usize,
    /// Header names included in the canonical request, in order.
    pub headers_to_sign: Vec<String>,
}

impl Credentials {
    /// Build a credential set with default signing limits.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        client_token: impl Into<String>,
        client_secret: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            client_token: client_token.into(),
            client_secret: client_secret.into(),
            access_token: access_token.into(),
            max_body: DEFAULT_MAX_BODY,
            headers_to_sign: Vec::new(),
        }
    }

    /// Override the body hashing limit.
    #[must_use]
    pub const fn with_max_body(mut self, max_body: usize) -> Self {
        self.max_body = max_body;
        self
    }

    /// Override the headers included in the signature.
    #[must_use]
    pub fn with_headers_to_sign(mut self, headers: Vec<String>) -> Self {
        self.headers_to_sign = headers;
        self
    }

    /// Ensure every required field carries a value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] naming the first empty field.
    pub fn validate(&self) -> ApiResult<()> {
        let fields = [
            ("host", &self.host),
            ("client_token", &self.client_token),
            ("client_secret", &self.client_secret),
            ("access_token", &self.access_token),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ApiError::MissingCredential { field });
            }
        }
        Ok(())
    }

    /// HTTPS base URL derived from the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is empty or does not form a valid URL.
    pub fn base_url(&self) -> ApiResult<Url> {
        self.validate()?;
        let input = format!("https://{}/", self.host.trim());
        Url::parse(&input).map_err(|source| ApiError::InvalidUrl { input, source })
    }
}

impl Debug for Credentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("host", &self.host)
            .field("client_token", &self.client_token)
            .field("client_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("max_body", &self.max_body)
            .field("headers_to_sign", &self.headers_to_sign)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Credentials {
        Credentials::new(
            "akab-host.luna.akamaiapis.net",
            "akab-client-token",
            "secret",
            "akab-access-token",
        )
    }

    #[test]
    fn validate_rejects_each_empty_field() {
        assert!(sample().validate().is_ok());

        let mut creds = sample();
        creds.client_secret = String::new();
        match creds.validate() {
            Err(ApiError::MissingCredential { field }) => assert_eq!(field, "client_secret"),
            other => panic!("expected missing client_secret, got {other:?}"),
        }

        let mut creds = sample();
        creds.access_token = "   ".into();
        assert!(matches!(
            creds.validate(),
            Err(ApiError::MissingCredential {
                field: "access_token"
            })
        ));
    }

    #[test]
    fn base_url_uses_https_and_host() {
        let url = sample().base_url().expect("valid base url");
        assert_eq!(url.as_str(), "https://akab-host.luna.akamaiapis.net/");
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("<redacted>"));
    }
}
