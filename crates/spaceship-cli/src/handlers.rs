//! Command handlers for CLI subcommands
//!
//! Every handler produces the host-shaped JSON value: the operation's success
//! payload or `{"error": "<message>"}`. Only problems that stop an operation
//! from running (unreadable params file, bad arguments) are returned as errors.

use crate::cli::{ApiOverrides, Commands, OperationArgs};
use crate::config::{is_yaml, Config};
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use spaceship_core::registrar::{get_tld_pricing, request_delete};
use spaceship_core::{host, into_host_value, metadata, HostParams, Registrar, RegistrarSettings};
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

const MAX_NAMESERVERS: usize = 5;

/// A parsed command together with the host parameters it runs on
#[derive(Debug)]
pub struct Invocation {
    command: Commands,
    params: HostParams,
}

impl Invocation {
    /// Load the host parameters a command needs; commands that never reach
    /// the registrar get empty parameters
    pub fn prepare(command: Commands, overrides: &ApiOverrides, config: &Config) -> Result<Self> {
        let params = match &command {
            Commands::Register(args)
            | Commands::Transfer(args)
            | Commands::Renew(args)
            | Commands::Sync(args)
            | Commands::Info(args)
            | Commands::GetLock(args)
            | Commands::ToggleLock(args)
            | Commands::GetNameservers(args)
            | Commands::SetNameservers(args)
            | Commands::EppCode(args) => build_host_params(args, overrides, config)?,
            Commands::Availability(args) => {
                let args = OperationArgs {
                    params: args.params.clone(),
                    ..Default::default()
                };
                build_host_params(&args, overrides, config)?
            }
            Commands::Delete
            | Commands::TldPricing
            | Commands::Metadata
            | Commands::ConfigOptions => HostParams::default(),
        };

        Ok(Self { command, params })
    }

    pub fn name(&self) -> &'static str {
        self.command.name()
    }

    /// The host's `DebugMode` flag
    pub fn debug_mode(&self) -> bool {
        self.params.debug_mode
    }
}

/// Run one invocation and return the value to print
#[instrument(skip_all, fields(command = invocation.name()))]
pub async fn handle_command(invocation: Invocation, settings: RegistrarSettings) -> Result<Value> {
    let Invocation { command, params } = invocation;
    debug!(params = ?params, "Host parameters loaded");

    let value = match command {
        Commands::Metadata => serde_json::to_value(metadata())?,
        Commands::ConfigOptions => host::config_options_value(),
        Commands::Delete => into_host_value(request_delete()),
        Commands::TldPricing => into_host_value(get_tld_pricing()),
        Commands::Availability(args) => {
            let domains = args.domains;
            run_operation(params, settings, |registrar, _| async move {
                into_host_value(registrar.check_availability(&domains).await)
            })
            .await
        }
        Commands::Register(_) => {
            run_operation(params, settings, |registrar, params| async move {
                into_host_value(registrar.register_domain(&params).await)
            })
            .await
        }
        Commands::Transfer(_) => {
            run_operation(params, settings, |registrar, params| async move {
                into_host_value(registrar.transfer_domain(&params).await)
            })
            .await
        }
        Commands::Renew(_) => {
            run_operation(params, settings, |registrar, params| async move {
                into_host_value(registrar.renew_domain(&params).await)
            })
            .await
        }
        Commands::Sync(_) => {
            run_operation(params, settings, |registrar, params| async move {
                into_host_value(registrar.sync(&params).await)
            })
            .await
        }
        Commands::Info(_) => {
            run_operation(params, settings, |registrar, params| async move {
                into_host_value(registrar.get_domain_information(&params).await)
            })
            .await
        }
        Commands::GetLock(_) => {
            run_operation(params, settings, |registrar, params| async move {
                into_host_value(registrar.get_registrar_lock(&params).await)
            })
            .await
        }
        Commands::ToggleLock(_) => {
            run_operation(params, settings, |registrar, params| async move {
                into_host_value(registrar.save_registrar_lock(&params).await)
            })
            .await
        }
        Commands::GetNameservers(_) => {
            run_operation(params, settings, |registrar, params| async move {
                into_host_value(registrar.get_nameservers(&params).await)
            })
            .await
        }
        Commands::SetNameservers(_) => {
            run_operation(params, settings, |registrar, params| async move {
                into_host_value(registrar.save_nameservers(&params).await)
            })
            .await
        }
        Commands::EppCode(_) => {
            run_operation(params, settings, |registrar, params| async move {
                into_host_value(registrar.get_epp_code(&params).await)
            })
            .await
        }
    };

    Ok(value)
}

async fn run_operation<F, Fut>(
    params: HostParams,
    settings: RegistrarSettings,
    operation: F,
) -> Value
where
    F: FnOnce(Registrar, HostParams) -> Fut,
    Fut: std::future::Future<Output = Value>,
{
    match Registrar::from_params(&params, settings) {
        Ok(registrar) => operation(registrar, params).await,
        Err(err) => into_host_value::<Value>(Err(err)),
    }
}

/// Assemble host parameters from the params file, flags and config.
///
/// Credentials come from flags/environment first, then the params file,
/// then the config file.
pub fn build_host_params(
    args: &OperationArgs,
    overrides: &ApiOverrides,
    config: &Config,
) -> Result<HostParams> {
    let mut params = match &args.params {
        Some(path) => read_params_file(path)?,
        None => Map::new(),
    };

    if let Some(domain) = &args.domain {
        params.insert("domainname".to_string(), Value::String(domain.clone()));
    }

    if !args.nameservers.is_empty() {
        if args.nameservers.len() > MAX_NAMESERVERS {
            return Err(Error::invalid_args(format!(
                "At most {} nameservers can be given",
                MAX_NAMESERVERS
            )));
        }
        for index in 1..=MAX_NAMESERVERS {
            let host = args.nameservers.get(index - 1).cloned().unwrap_or_default();
            params.insert(format!("ns{}", index), Value::String(host));
        }
    }

    if let Some(years) = args.years {
        params.insert("regperiod".to_string(), Value::from(years));
    }

    apply_credential(&mut params, "APIKey", &overrides.api_key, &config.api.key);
    apply_credential(&mut params, "APISecret", &overrides.api_secret, &config.api.secret);
    apply_credential(&mut params, "APIEndPoint", &overrides.endpoint, &config.api.endpoint);

    Ok(HostParams::from_value(Value::Object(params))?)
}

fn apply_credential(
    params: &mut Map<String, Value>,
    key: &str,
    flag: &Option<String>,
    configured: &Option<String>,
) {
    if let Some(value) = flag {
        params.insert(key.to_string(), Value::String(value.clone()));
        return;
    }

    let present = params
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|value| !value.trim().is_empty());
    if !present {
        if let Some(value) = configured {
            params.insert(key.to_string(), Value::String(value.clone()));
        }
    }
}

fn read_params_file(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    let value: Value = if is_yaml(path) {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "a JSON or YAML object of host parameters".to_string(),
        }),
    }
}
