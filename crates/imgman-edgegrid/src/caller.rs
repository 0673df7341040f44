//! Thin HTTP caller that signs requests and classifies responses by status.

use std::path::Path;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::{Map, Value};

use crate::auth::{EdgeGridAuth, RequestSigner};
use crate::credentials::Credentials;
use crate::error::{ApiError, ApiResult};

/// User agent attached to every request.
pub const USER_AGENT_VALUE: &str = "AkamaiCLI";

const JSON_CONTENT_TYPE: &str = "application/json";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Behavioural switches for the caller.
#[derive(Debug, Clone, Copy)]
pub struct CallerOptions {
    /// Print each exchange (method, path, status, body) to standard error.
    pub verbose: bool,
    /// Upper bound for a single request.
    pub timeout: Duration,
}

impl Default for CallerOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Signed HTTP session bound to one API host.
pub struct EdgeGridClient {
    http: Client,
    base_url: Url,
    signer: Box<dyn RequestSigner>,
    headers: HeaderMap,
    options: CallerOptions,
}

impl EdgeGridClient {
    /// Build a session targeting `https://<host>/` from `credentials`.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are incomplete or the HTTP client
    /// cannot be constructed.
    pub fn new(credentials: Credentials, options: CallerOptions) -> ApiResult<Self> {
        let base_url = credentials.base_url()?;
        Self::with_base_url(credentials, base_url, options)
    }

    /// Build a session against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are incomplete or the HTTP client
    /// cannot be constructed.
    pub fn with_base_url(
        credentials: Credentials,
        base_url: Url,
        options: CallerOptions,
    ) -> ApiResult<Self> {
        let signer = EdgeGridAuth::new(credentials)?;
        Self::with_signer(Box::new(signer), base_url, options)
    }

    /// Build a session with a caller-supplied signer.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_signer(
        signer: Box<dyn RequestSigner>,
        base_url: Url,
        options: CallerOptions,
    ) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                path: base_url.to_string(),
                source,
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        Ok(Self {
            http,
            base_url,
            signer,
            headers,
            options,
        })
    }

    /// Base URL every path is joined against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Insert or replace a header sent with every subsequent request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHeader`] if the name or value is not valid HTTP.
    pub fn set_header(&mut self, name: &str, value: &str) -> ApiResult<()> {
        let invalid = || ApiError::InvalidHeader {
            name: name.to_string(),
        };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    /// Resolve `path` against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the join fails.
    pub fn url_join(&self, path: &str) -> ApiResult<Url> {
        self.base_url.join(path).map_err(|source| ApiError::InvalidUrl {
            input: path.to_string(),
            source,
        })
    }

    /// Issue a GET and return the JSON result.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, 400/401/403/404 responses, or
    /// a server-reported `errorString`.
    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<Value> {
        let builder = self.request(Method::GET, path, params)?;
        self.execute(&Method::GET, path, builder).await
    }

    /// Issue a POST with a raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, 403/404 responses, or a
    /// server-reported `errorString`.
    pub async fn post(
        &self,
        path: &str,
        body: impl Into<String> + Send,
        params: &[(&str, &str)],
    ) -> ApiResult<Value> {
        let builder = self
            .request(Method::POST, path, params)?
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body.into());
        self.execute(&Method::POST, path, builder).await
    }

    /// Upload a single file as a multipart form.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or for the same response
    /// conditions as [`EdgeGridClient::post`].
    pub async fn post_files(&self, path: &str, file: &Path) -> ApiResult<Value> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|source| ApiError::ReadFile {
                path: file.to_path_buf(),
                source,
            })?;
        let file_name = file
            .file_name()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("file")
            .to_string();
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let builder = self.request(Method::POST, path, &[])?.multipart(form);
        self.execute(&Method::POST, path, builder).await
    }

    /// Issue a PUT with a raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, 403/404 responses, or a
    /// server-reported `errorString`.
    pub async fn put(
        &self,
        path: &str,
        body: impl Into<String> + Send,
        params: &[(&str, &str)],
    ) -> ApiResult<Value> {
        let builder = self
            .request(Method::PUT, path, params)?
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body.into());
        self.execute(&Method::PUT, path, builder).await
    }

    /// Issue a DELETE.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, 403/404 responses, or a
    /// server-reported `errorString`.
    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        let builder = self.request(Method::DELETE, path, &[])?;
        self.execute(&Method::DELETE, path, builder).await
    }

    fn request(&self, method: Method, path: &str, params: &[(&str, &str)]) -> ApiResult<RequestBuilder> {
        let url = self.url_join(path)?;
        let mut builder = self.http.request(method, url).headers(self.headers.clone());
        if !params.is_empty() {
            builder = builder.query(params);
        }
        Ok(builder)
    }

    async fn execute(&self, method: &Method, path: &str, builder: RequestBuilder) -> ApiResult<Value> {
        let transport = |source| ApiError::Transport {
            path: path.to_string(),
            source,
        };

        let mut request = builder.build().map_err(transport)?;
        self.signer.sign(&mut request)?;
        tracing::debug!(method = %method, url = %request.url(), "sending signed request");

        let response = self.http.execute(request).await.map_err(transport)?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        tracing::debug!(
            status = status.as_u16(),
            headers = ?response.headers(),
            "received response"
        );
        let bytes = response.bytes().await.map_err(transport)?;

        let decoded = if status == StatusCode::NO_CONTENT {
            Ok(Value::Object(Map::new()))
        } else {
            decode_body(path, status, &bytes)
        };
        if self.options.verbose {
            eprint!(
                "{}",
                format_exchange(method, path, status, &content_type, decoded.as_ref().ok())
            );
        }

        let body = decoded?;
        classify(method, path, status, body)
    }
}

/// Render one exchange for verbose mode: a `LOG:` line, then the body
/// pretty-printed between `>>>` and `<<<` when it decoded.
fn format_exchange(
    method: &Method,
    path: &str,
    status: StatusCode,
    content_type: &str,
    body: Option<&Value>,
) -> String {
    let line = format!("LOG: {method} {path} {} {content_type}\n", status.as_u16());
    match body.and_then(|body| serde_json::to_string_pretty(body).ok()) {
        Some(pretty) => format!("{line}>>>\n{pretty}\n<<<\n\n"),
        None => line,
    }
}

fn decode_body(path: &str, status: StatusCode, bytes: &[u8]) -> ApiResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(value),
        Err(source) if status.is_success() => Err(ApiError::Decode {
            path: path.to_string(),
            source,
        }),
        Err(_) => Ok(Value::String(String::from_utf8_lossy(bytes).trim().to_string())),
    }
}

/// Map a decoded response onto the error taxonomy.
///
/// 400/401 only fail GET calls; other verbs log the problem and hand the body
/// back to the caller.
fn classify(method: &Method, path: &str, status: StatusCode, body: Value) -> ApiResult<Value> {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
            let err = ApiError::AuthHeader {
                path: path.to_string(),
                status: status.as_u16(),
                details: body_summary(&body),
            };
            if *method == Method::GET {
                return Err(err);
            }
            tracing::error!(method = %method, "{err}");
        }
        StatusCode::FORBIDDEN => {
            return Err(ApiError::Permission {
                path: path.to_string(),
                details: problem_details(&body),
            });
        }
        StatusCode::NOT_FOUND => {
            return Err(ApiError::NotFound {
                path: path.to_string(),
                details: problem_details(&body),
            });
        }
        _ => {}
    }

    if let Some(error_string) = find_error_string(&body) {
        return Err(ApiError::ServerFault {
            path: path.to_string(),
            error_string,
        });
    }

    if !status.is_success() {
        tracing::warn!(
            method = %method,
            path,
            status = status.as_u16(),
            "unexpected status; returning response body"
        );
    }

    Ok(body)
}

fn problem_details(body: &Value) -> String {
    match body {
        Value::Object(map) => map
            .get("detail")
            .filter(|value| !is_blank(value))
            .or_else(|| map.get("details"))
            .map(value_text)
            .unwrap_or_default(),
        Value::String(text) => text.clone(),
        _ => String::new(),
    }
}

fn body_summary(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn find_error_string(body: &Value) -> Option<String> {
    let map = body.as_object()?;
    if let Some(value) = map.get("errorString") {
        return non_empty_text(value);
    }
    map.values()
        .filter_map(Value::as_object)
        .filter_map(|nested| nested.get("errorString"))
        .find_map(non_empty_text)
}

fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

const fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}
