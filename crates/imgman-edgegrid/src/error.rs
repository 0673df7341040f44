//! Error types for signed API calls.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while signing, sending, or classifying an API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A credential field was empty, so the request cannot be signed.
    #[error("credential field `{field}` is empty; refusing to send an unsigned request")]
    MissingCredential {
        /// Name of the empty field.
        field: &'static str,
    },
    /// A base URL or endpoint path could not be parsed.
    #[error("invalid URL '{input}': {source}")]
    InvalidUrl {
        /// Text that failed to parse.
        input: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
    /// A header name or value contained characters HTTP does not allow.
    #[error("invalid value for header `{name}`")]
    InvalidHeader {
        /// Header that was rejected.
        name: String,
    },
    /// The request could not be built, sent, or its body read.
    #[error("request to {path} failed: {source}")]
    Transport {
        /// Endpoint path being called.
        path: String,
        /// Underlying client error.
        source: reqwest::Error,
    },
    /// A successful response carried a body that was not JSON.
    #[error("response from {path} was not valid JSON: {source}")]
    Decode {
        /// Endpoint path being called.
        path: String,
        /// Underlying decoding error.
        source: serde_json::Error,
    },
    /// The server answered 400 or 401.
    #[error(
        "call to {path} failed with a {status} result: this indicates a problem with authentication or headers; ensure the .edgerc file is formatted correctly (details: {details})"
    )]
    AuthHeader {
        /// Endpoint path being called.
        path: String,
        /// Status code returned (400 or 401).
        status: u16,
        /// Problem details reported by the server.
        details: String,
    },
    /// The server answered 403.
    #[error(
        "call to {path} failed with a 403 result: the credentials lack the necessary permissions (details: {details})"
    )]
    Permission {
        /// Endpoint path being called.
        path: String,
        /// Problem details reported by the server.
        details: String,
    },
    /// The server answered 404.
    #[error(
        "call to {path} failed with a 404 result: the object does not exist as requested (details: {details})"
    )]
    NotFound {
        /// Endpoint path being called.
        path: String,
        /// Problem details reported by the server.
        details: String,
    },
    /// The response body reported an `errorString`.
    #[error("call to {path} caused a server fault: {error_string}")]
    ServerFault {
        /// Endpoint path being called.
        path: String,
        /// The server-reported fault text.
        error_string: String,
    },
    /// A file destined for upload could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

/// Convenience alias for API results.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_path() {
        let err = ApiError::NotFound {
            path: "/imaging/v2/network/staging/policies/missing".into(),
            details: "no such policy".into(),
        };
        let message = err.to_string();
        assert!(message.contains("/imaging/v2/network/staging/policies/missing"));
        assert!(message.contains("no such policy"));
    }

    #[test]
    fn server_fault_message_carries_error_string() {
        let err = ApiError::ServerFault {
            path: "/x".into(),
            error_string: "policy validation failed".into(),
        };
        assert!(err.to_string().contains("policy validation failed"));
    }

    #[test]
    fn auth_header_reports_status() {
        let err = ApiError::AuthHeader {
            path: "/x".into(),
            status: 401,
            details: String::new(),
        };
        assert!(err.to_string().contains("401"));
    }
}
