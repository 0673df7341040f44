//! Shared session construction and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;
use imgman_api::ImageManager;
use imgman_config::{ConfigError, CredentialOverrides, EdgercSource, load_credentials};
use imgman_edgegrid::{ApiError, CallerOptions, EdgeGridClient};

use crate::cli::Cli;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<ApiError> for CliError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::MissingCredential { .. } | ApiError::ReadFile { .. } => {
                Self::Validation(error.to_string())
            }
            other => Self::Failure(other.into()),
        }
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) manager: ImageManager,
    pub(crate) policy_set: String,
    pub(crate) account_key: String,
}

impl AppContext {
    /// Resolve credentials and open a signed session for this invocation.
    pub(crate) fn from_cli(cli: &Cli) -> CliResult<Self> {
        let source = EdgercSource {
            path: PathBuf::from(&cli.edgerc),
            section: cli.section.clone(),
        };
        let credentials = load_credentials(&source, &credential_overrides(cli))?;

        let options = CallerOptions {
            verbose: cli.verbose,
            timeout: Duration::from_secs(cli.timeout),
        };
        let client = EdgeGridClient::new(credentials, options)?;
        tracing::debug!(base_url = %client.base_url(), "session ready");

        Ok(Self {
            manager: ImageManager::new(client),
            policy_set: cli.policy_set.clone(),
            account_key: cli.account_key.clone(),
        })
    }
}

fn credential_overrides(cli: &Cli) -> CredentialOverrides {
    CredentialOverrides {
        host: cli.host.clone(),
        client_token: cli.client_token.clone(),
        client_secret: cli.client_secret.clone(),
        access_token: cli.access_token.clone(),
        max_body: cli.max_body,
        headers_to_sign: None,
    }
}

/// Read a policy document verbatim.
pub(crate) fn read_input_file(path: &std::path::Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|err| {
        CliError::validation(format!(
            "failed to read input file '{}': {err}",
            path.display()
        ))
    })
}

/// Map an output write failure onto the CLI error type.
pub(crate) fn write_failed(err: std::io::Error) -> CliError {
    CliError::failure(anyhow!("failed to write output: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn config_errors_exit_with_validation_code() {
        let err = CliError::from(ConfigError::MissingFile {
            path: PathBuf::from("/nowhere/.edgerc"),
        });
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("/nowhere/.edgerc"));
    }

    #[test]
    fn api_errors_exit_with_failure_code() {
        let err = CliError::from(ApiError::NotFound {
            path: "/imaging/v2/network/staging/policies/x".into(),
            details: "gone".into(),
        });
        assert_eq!(err.exit_code(), 3);
        assert!(
            err.display_message()
                .contains("/imaging/v2/network/staging/policies/x")
        );
    }

    #[test]
    fn unreadable_input_file_is_a_validation_error() {
        let err = read_input_file(Path::new("/nonexistent/policy.json"))
            .expect_err("file does not exist");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("/nonexistent/policy.json"));
    }
}
