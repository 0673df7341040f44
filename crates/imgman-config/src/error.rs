//! Error types for credential loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while locating or merging credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The credentials file does not exist and flags did not fill every field.
    #[error(
        "credentials file {} was not found; provision API credentials and save them to this file",
        path.display()
    )]
    MissingFile {
        /// Expanded path that was checked.
        path: PathBuf,
    },
    /// The credentials file has no section with the requested name.
    #[error(
        "no section named [{section}] was found in {}; generate credentials for this section",
        path.display()
    )]
    MissingSection {
        /// Requested section name.
        section: String,
        /// Credentials file that was read.
        path: PathBuf,
    },
    /// A required field is absent from both the file section and the flags.
    #[error(
        "required field `{field}` is missing from section [{section}] in {} and was not passed as a flag",
        path.display()
    )]
    MissingField {
        /// Field that could not be resolved.
        field: &'static str,
        /// Section that was consulted.
        section: String,
        /// Credentials file that was consulted.
        path: PathBuf,
    },
    /// A field carried a value that could not be interpreted.
    #[error("invalid value '{value}' for `{field}`: {reason}")]
    InvalidValue {
        /// Offending field.
        field: &'static str,
        /// Raw value as written.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// A line of the credentials file could not be parsed.
    #[error("{}:{line}: {reason}", path.display())]
    Malformed {
        /// Credentials file being parsed.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: &'static str,
    },
    /// Reading the credentials file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
