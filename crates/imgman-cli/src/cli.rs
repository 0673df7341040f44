//! Command-line surface for managing Image Manager policies.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use imgman_api::{Network, NetworkTarget};
use imgman_config::{DEFAULT_EDGERC, DEFAULT_SECTION};
use imgman_telemetry::{LogFormat, LoggingConfig, init_logging, level_for_flags};

use crate::client::{AppContext, CliResult};
use crate::commands::policies::{
    handle_delete_policy, handle_get_policy, handle_list_policies, handle_set_policy,
};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Parses CLI arguments, executes the requested command, and reports any
/// failure on standard error. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: level_for_flags(cli.debug, cli.verbose),
        format: cli.log_format.into(),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let mut ctx = AppContext::from_cli(&cli)?;
    let mut out = std::io::stdout();

    match cli.command {
        Command::ListPolicies(args) => handle_list_policies(&mut ctx, args, &mut out).await,
        Command::GetPolicy(args) => handle_get_policy(&mut ctx, args, &mut out).await,
        Command::SetPolicy(args) => handle_set_policy(&mut ctx, args, &mut out).await,
        Command::DeletePolicy(args) => handle_delete_policy(&mut ctx, args, &mut out).await,
    }
}

#[derive(Parser)]
#[command(
    name = "imgman",
    version,
    about = "Manage Image Manager policies on the staging and production networks"
)]
pub(crate) struct Cli {
    /// Print each API exchange to standard error.
    #[arg(long, short = 'v', global = true)]
    pub(crate) verbose: bool,
    /// Emit debug-level logs, including request URLs and response headers.
    #[arg(long, short = 'd', global = true)]
    pub(crate) debug: bool,
    /// Location of the credentials file.
    #[arg(long, short = 'e', global = true, env = "AKAMAI_EDGERC", default_value = DEFAULT_EDGERC)]
    pub(crate) edgerc: String,
    /// Credentials file section to use.
    #[arg(
        long,
        short = 'c',
        visible_alias = "credential-section",
        global = true,
        env = "AKAMAI_EDGERC_SECTION",
        default_value = DEFAULT_SECTION
    )]
    pub(crate) section: String,
    /// Image Manager policy set (sent as the Luna-Token header).
    #[arg(long, short = 'p')]
    pub(crate) policy_set: String,
    /// Account switch key; pass an empty value to act on your own account.
    #[arg(long, short = 'a')]
    pub(crate) account_key: String,
    /// API hostname, overriding the credentials file.
    #[arg(long, global = true)]
    pub(crate) host: Option<String>,
    /// Client token, overriding the credentials file.
    #[arg(long, global = true)]
    pub(crate) client_token: Option<String>,
    /// Client secret, overriding the credentials file.
    #[arg(long, global = true)]
    pub(crate) client_secret: Option<String>,
    /// Access token, overriding the credentials file.
    #[arg(long, global = true)]
    pub(crate) access_token: Option<String>,
    /// Maximum number of body bytes covered by the request signature.
    #[arg(long, global = true)]
    pub(crate) max_body: Option<usize>,
    /// Request timeout in seconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub(crate) timeout: u64,
    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Compact)]
    pub(crate) log_format: LogFormatArg,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// List the policies deployed on one or both networks.
    #[command(alias = "list")]
    ListPolicies(ListPoliciesArgs),
    /// Retrieve one policy.
    #[command(alias = "get")]
    GetPolicy(GetPolicyArgs),
    /// Create or replace a policy from a JSON file.
    #[command(alias = "set")]
    SetPolicy(SetPolicyArgs),
    /// Delete a policy.
    #[command(alias = "delete")]
    DeletePolicy(DeletePolicyArgs),
}

#[derive(Args)]
pub(crate) struct ListPoliciesArgs {
    #[arg(long, short = 'n', value_enum, default_value_t = NetworkArg::Both)]
    pub(crate) network: NetworkArg,
    #[arg(
        long,
        short = 't',
        alias = "output_type",
        value_enum,
        default_value_t = OutputType::Text
    )]
    pub(crate) output_type: OutputType,
}

#[derive(Args)]
pub(crate) struct GetPolicyArgs {
    /// Policy name to retrieve.
    pub(crate) name: String,
    #[arg(long, short = 'n', value_enum, default_value_t = SingleNetworkArg::Production)]
    pub(crate) network: SingleNetworkArg,
    /// Save the policy to this file instead of printing it.
    #[arg(long, short = 'f', alias = "output_file")]
    pub(crate) output_file: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct SetPolicyArgs {
    /// Policy name to create or replace.
    pub(crate) name: String,
    /// JSON policy document.
    #[arg(long, short = 'f', alias = "input_file")]
    pub(crate) input_file: PathBuf,
    #[arg(long, short = 'n', value_enum, default_value_t = NetworkArg::Production)]
    pub(crate) network: NetworkArg,
}

#[derive(Args)]
pub(crate) struct DeletePolicyArgs {
    /// Policy name to delete.
    pub(crate) name: String,
    #[arg(long, short = 'n', value_enum, default_value_t = NetworkArg::Production)]
    pub(crate) network: NetworkArg,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum NetworkArg {
    Staging,
    Production,
    Both,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum SingleNetworkArg {
    Staging,
    Production,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputType {
    Json,
    Text,
}

impl OutputType {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

impl From<SingleNetworkArg> for Network {
    fn from(value: SingleNetworkArg) -> Self {
        match value {
            SingleNetworkArg::Staging => Self::Staging,
            SingleNetworkArg::Production => Self::Production,
        }
    }
}

impl From<NetworkArg> for NetworkTarget {
    fn from(value: NetworkArg) -> Self {
        match value {
            NetworkArg::Staging => Self::Staging,
            NetworkArg::Production => Self::Production,
            NetworkArg::Both => Self::Both,
        }
    }
}
