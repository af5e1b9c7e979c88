//! Command-line interface argument parsing and definitions
//!
//! Each operation subcommand reads the host parameters from a JSON or YAML
//! file (`--params`) and lets a few common values be given as flags instead.

use clap::{Args, Parser, Subcommand};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Spaceship registrar CLI - drive domain lifecycle operations against the
/// Spaceship API and print the host-shaped JSON result
#[derive(Parser, Debug)]
#[command(
    name = "spaceship",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SPACESHIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// API key (overrides the params file and config)
    #[arg(long, global = true, env = "SPACESHIP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API secret (overrides the params file and config)
    #[arg(long, global = true, env = "SPACESHIP_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// API endpoint (overrides the params file and config)
    #[arg(long, global = true, env = "SPACESHIP_API_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Log request and response payloads (secrets redacted)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Fail a registration when its nameservers cannot be set
    #[arg(long, global = true)]
    pub strict_nameservers: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a contact and register a domain
    Register(OperationArgs),

    /// Create a contact and request an inbound transfer
    Transfer(OperationArgs),

    /// Renew a domain
    Renew(OperationArgs),

    /// Report the expiration date
    Sync(OperationArgs),

    /// Show domain details
    Info(OperationArgs),

    /// Show the transfer lock state
    GetLock(OperationArgs),

    /// Flip the transfer lock
    ToggleLock(OperationArgs),

    /// Show the nameservers
    GetNameservers(OperationArgs),

    /// Replace the nameservers
    SetNameservers(OperationArgs),

    /// Show the transfer auth code
    EppCode(OperationArgs),

    /// Request deletion (not supported by the API)
    Delete,

    /// Show TLD pricing
    TldPricing,

    /// Check whether domains can be registered
    Availability(AvailabilityArgs),

    /// Show module metadata
    Metadata,

    /// Show configuration option declarations
    ConfigOptions,
}

/// Arguments shared by domain operations
#[derive(Args, Debug, Default, Clone)]
pub struct OperationArgs {
    /// Host parameters file (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Domain name (overrides `domainname` in the params file)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Nameserver host, in order (up to 5; overrides `ns1`..`ns5`)
    #[arg(long = "ns", value_name = "HOST")]
    pub nameservers: Vec<String>,

    /// Registration or renewal period in years
    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for the availability command
#[derive(Args, Debug)]
pub struct AvailabilityArgs {
    /// Domain names to check
    #[arg(required = true, value_name = "DOMAIN")]
    pub domains: Vec<String>,

    /// Host parameters file carrying credentials
    #[arg(short, long, value_name = "FILE")]
    pub params: Option<PathBuf>,
}

/// Credential values given on the command line or in the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiOverrides {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub endpoint: Option<String>,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stderr().is_terminal()
    }

    pub fn overrides(&self) -> ApiOverrides {
        ApiOverrides {
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

impl Commands {
    /// Stable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Register(_) => "register",
            Commands::Transfer(_) => "transfer",
            Commands::Renew(_) => "renew",
            Commands::Sync(_) => "sync",
            Commands::Info(_) => "info",
            Commands::GetLock(_) => "get-lock",
            Commands::ToggleLock(_) => "toggle-lock",
            Commands::GetNameservers(_) => "get-nameservers",
            Commands::SetNameservers(_) => "set-nameservers",
            Commands::EppCode(_) => "epp-code",
            Commands::Delete => "delete",
            Commands::TldPricing => "tld-pricing",
            Commands::Availability(_) => "availability",
            Commands::Metadata => "metadata",
            Commands::ConfigOptions => "config-options",
        }
    }
}
