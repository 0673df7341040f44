//! `EG1-HMAC-SHA256` request signing.
//!
//! # Design
//! - The signing key is derived per request from the client secret and the
//!   request timestamp, then used to sign a tab-joined canonical request.
//! - Only POST bodies contribute a content hash, truncated to `max_body`.
//! - Timestamp and nonce are injectable so signatures can be reproduced.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, Request};
use ring::{digest, hmac};
use uuid::Uuid;

use crate::credentials::Credentials;
use crate::error::{ApiError, ApiResult};

/// Algorithm identifier that prefixes every authorization header.
pub const SIGNING_ALGORITHM: &str = "EG1-HMAC-SHA256";

/// Attaches authentication to an outgoing request.
pub trait RequestSigner: Send + Sync {
    /// Mutate `request` so it carries valid authentication headers.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be signed; the request must
    /// not be sent in that case.
    fn sign(&self, request: &mut Request) -> ApiResult<()>;
}

/// `EdgeGrid` signer bound to one credential set.
#[derive(Debug, Clone)]
pub struct EdgeGridAuth {
    credentials: Credentials,
}

impl EdgeGridAuth {
    /// Create a signer, rejecting incomplete credentials up front.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] if any field is empty.
    pub fn new(credentials: Credentials) -> ApiResult<Self> {
        credentials.validate()?;
        Ok(Self { credentials })
    }

    /// Compute the `Authorization` header value for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] if any field is empty.
    pub fn authorization(&self, request: &Request, timestamp: &str, nonce: &str) -> ApiResult<String> {
        self.credentials.validate()?;

        let auth_header = format!(
            "{SIGNING_ALGORITHM} client_token={};access_token={};timestamp={timestamp};nonce={nonce};",
            self.credentials.client_token, self.credentials.access_token
        );
        let signing_key = signing_key(&self.credentials.client_secret, timestamp);
        let body = request.body().and_then(reqwest::Body::as_bytes);
        let data = data_to_sign(
            request,
            &canonicalize_headers(request.headers(), &self.credentials.headers_to_sign),
            &content_hash(request.method(), body, self.credentials.max_body),
            &auth_header,
        );
        let signature = hmac_base64(signing_key.as_bytes(), data.as_bytes());

        Ok(format!("{auth_header}signature={signature}"))
    }
}

impl RequestSigner for EdgeGridAuth {
    fn sign(&self, request: &mut Request) -> ApiResult<()> {
        let timestamp = edgegrid_timestamp(Utc::now());
        let nonce = Uuid::new_v4().to_string();
        let value = self.authorization(request, &timestamp, &nonce)?;
        let value = HeaderValue::from_str(&value).map_err(|_| ApiError::InvalidHeader {
            name: AUTHORIZATION.to_string(),
        })?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Format a timestamp the way the signing scheme expects it.
#[must_use]
pub fn edgegrid_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H:%M:%S+0000").to_string()
}

fn signing_key(client_secret: &str, timestamp: &str) -> String {
    hmac_base64(client_secret.as_bytes(), timestamp.as_bytes())
}

fn hmac_base64(key: &[u8], data: &[u8]) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    STANDARD.encode(hmac::sign(&key, data).as_ref())
}

fn content_hash(method: &Method, body: Option<&[u8]>, max_body: usize) -> String {
    match body {
        Some(bytes) if *method == Method::POST && !bytes.is_empty() => {
            let end = bytes.len().min(max_body);
            STANDARD.encode(digest::digest(&digest::SHA256, &bytes[..end]).as_ref())
        }
        _ => String::new(),
    }
}

fn canonicalize_headers(headers: &HeaderMap, names: &[String]) -> String {
    names
        .iter()
        .filter_map(|name| {
            let value = headers.get(name.as_str())?.to_str().ok()?;
            let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
            Some(format!("{}:{collapsed}", name.to_ascii_lowercase()))
        })
        .collect::<Vec<_>>()
        .join("\t")
}

fn data_to_sign(request: &Request, canonical_headers: &str, content_hash: &str, auth_header: &str) -> String {
    let url = request.url();
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };
    let relative_url = url
        .query()
        .map_or_else(|| url.path().to_string(), |query| format!("{}?{query}", url.path()));

    [
        request.method().as_str().to_ascii_uppercase(),
        url.scheme().to_string(),
        host,
        relative_url,
        canonical_headers.to_string(),
        content_hash.to_string(),
        auth_header.to_string(),
    ]
    .join("\t")
}
