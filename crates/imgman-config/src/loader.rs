//! Resolve credentials from explicit flags and an `.edgerc` section.
//!
//! # Design
//! - Flags override file values; file values fill the gaps.
//! - The file is only required when flags leave a required field unset.

use std::path::{Path, PathBuf};

use imgman_edgegrid::{Credentials, DEFAULT_MAX_BODY};

use crate::edgerc::{Edgerc, Section};
use crate::error::{ConfigError, ConfigResult};

/// Default credentials file location.
pub const DEFAULT_EDGERC: &str = "~/.edgerc";
/// Default credentials section.
pub const DEFAULT_SECTION: &str = "image-manager";

/// Where to read file-based credentials from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgercSource {
    /// Credentials file path; a leading `~` is expanded.
    pub path: PathBuf,
    /// Section within the file.
    pub section: String,
}

impl Default for EdgercSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_EDGERC),
            section: DEFAULT_SECTION.to_string(),
        }
    }
}

/// Credential values supplied directly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialOverrides {
    /// API hostname.
    pub host: Option<String>,
    /// Client token.
    pub client_token: Option<String>,
    /// Client secret.
    pub client_secret: Option<String>,
    /// Access token.
    pub access_token: Option<String>,
    /// Body hashing limit.
    pub max_body: Option<usize>,
    /// Header names to include in the signature.
    pub headers_to_sign: Option<Vec<String>>,
}

impl CredentialOverrides {
    fn is_complete(&self) -> bool {
        [
            &self.host,
            &self.client_token,
            &self.client_secret,
            &self.access_token,
        ]
        .iter()
        .all(|value| value.as_deref().is_some_and(|text| !text.trim().is_empty()))
    }
}

/// Resolve credentials for `source`, letting `overrides` win field by field.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the file or section is missing while flags
/// are incomplete, when a required field cannot be resolved, or when a value
/// cannot be parsed.
pub fn load_credentials(
    source: &EdgercSource,
    overrides: &CredentialOverrides,
) -> ConfigResult<Credentials> {
    let path = expand_home(&source.path);

    if overrides.is_complete() {
        tracing::debug!("credentials fully supplied by flags");
        return merge(None, overrides, &path, &source.section);
    }

    if !path.is_file() {
        return Err(ConfigError::MissingFile { path });
    }
    let edgerc = Edgerc::load(&path)?;
    let section = edgerc
        .section(&source.section)
        .ok_or_else(|| ConfigError::MissingSection {
            section: source.section.clone(),
            path: path.clone(),
        })?;

    tracing::debug!(path = %path.display(), section = %source.section, "loaded credentials section");
    merge(Some(section), overrides, &path, &source.section)
}

/// Combine a file section with flag overrides into a credential set.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] for an unresolved required field and
/// [`ConfigError::InvalidValue`] for an unparsable `max_body`.
pub fn merge(
    file: Option<&Section>,
    overrides: &CredentialOverrides,
    path: &Path,
    section: &str,
) -> ConfigResult<Credentials> {
    let pick = |field: &'static str, flag: Option<&str>| -> ConfigResult<String> {
        flag.filter(|value| !value.trim().is_empty())
            .or_else(|| {
                file.and_then(|values| values.get(field))
                    .map(String::as_str)
                    .filter(|value| !value.trim().is_empty())
            })
            .map(|value| value.trim().to_string())
            .ok_or_else(|| ConfigError::MissingField {
                field,
                section: section.to_string(),
                path: path.to_path_buf(),
            })
    };

    let host = normalize_host(&pick("host", overrides.host.as_deref())?);
    let client_token = pick("client_token", overrides.client_token.as_deref())?;
    let client_secret = pick("client_secret", overrides.client_secret.as_deref())?;
    let access_token = pick("access_token", overrides.access_token.as_deref())?;

    let max_body = match (overrides.max_body, file.and_then(|values| values.get("max_body"))) {
        (Some(limit), _) => limit,
        (None, Some(raw)) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            field: "max_body",
            value: raw.clone(),
            reason: "expected a non-negative byte count",
        })?,
        (None, None) => DEFAULT_MAX_BODY,
    };

    let headers_to_sign = overrides.headers_to_sign.clone().unwrap_or_else(|| {
        file.and_then(|values| values.get("headers_to_sign"))
            .map(String::as_str)
            .map(split_list)
            .unwrap_or_default()
    });

    Ok(
        Credentials::new(host, client_token, client_secret, access_token)
            .with_max_body(max_body)
            .with_headers_to_sign(headers_to_sign),
    )
}

/// Expand a leading `~` to the user's home directory.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}

fn normalize_host(host: &str) -> String {
    let trimmed = host
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    trimmed.trim_end_matches('/').to_string()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
