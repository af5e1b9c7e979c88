//! Spaceship CLI - run registrar operations against the Spaceship API
//!
//! Each invocation executes one operation and prints its host-shaped JSON
//! result on stdout. Logs go to stderr and, when configured, to a JSON lines
//! file.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;

use cli::Cli;
use colored::control;
use config::Config;
use error::{Result, OPERATION_FAILED_EXIT_CODE};
use handlers::Invocation;
use logging::{timing::Timer, LoggingConfig};
use serde_json::Value;
use spaceship_core::RegistrarSettings;
use std::process;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with_error(e),
    };

    let verbosity = cli.verbosity_level();
    let overrides = cli.overrides();

    // Host parameters are read before logging starts so their DebugMode
    // can shape the log level
    let invocation = match Invocation::prepare(cli.command, &overrides, &config) {
        Ok(invocation) => invocation,
        Err(e) => exit_with_error(e),
    };
    let settings = config.registrar_settings(
        cli.debug || invocation.debug_mode(),
        cli.strict_nameservers,
    );

    let logging_config = logging_config(verbosity, cli.quiet, settings.debug, &config);
    let guard = match logging::init_logging(&logging_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    let request_id = logging::generate_request_id();
    let span = tracing::info_span!("invocation", request_id = %request_id);
    let result = run(invocation, settings, verbosity, cli.pretty)
        .instrument(span)
        .await;

    // Flush the log file before exiting
    drop(guard);

    match result {
        Ok(code) => process::exit(code),
        Err(e) => exit_with_error(e),
    }
}

/// Main application logic; returns the process exit code
async fn run(
    invocation: Invocation,
    settings: RegistrarSettings,
    verbosity: u8,
    pretty: bool,
) -> Result<i32> {
    let timer = Timer::new(invocation.name());

    info!(
        command = invocation.name(),
        verbosity,
        debug = settings.debug,
        "Executing command"
    );

    let value = handlers::handle_command(invocation, settings).await?;

    let rendered = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{}", rendered);

    timer.finish();
    Ok(exit_code_for(&value))
}

/// Operations that report an error payload exit non-zero
fn exit_code_for(value: &Value) -> i32 {
    if value.get("error").is_some() {
        OPERATION_FAILED_EXIT_CODE
    } else {
        0
    }
}

fn exit_with_error(e: error::Error) -> ! {
    eprintln!(
        "{}",
        error::format_error(&e, control::SHOULD_COLORIZE.should_colorize())
    );

    if e.should_show_help() {
        eprintln!("\nFor more information, try '--help'");
    }

    process::exit(e.exit_code());
}

/// Build the logging configuration from flags, config file and environment
fn logging_config(verbosity: u8, quiet: bool, debug: bool, config: &Config) -> LoggingConfig {
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);
    logging_config.merge_with_settings(&config.logging);
    logging_config.merge_with_env();

    // Payload logs are emitted at debug level
    if debug {
        logging_config.enable_debug();
    }

    // If quiet mode, only log errors
    if quiet {
        logging_config.level = "error".to_string();
    }

    logging_config
}
