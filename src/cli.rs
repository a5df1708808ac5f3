//! Command line front end: runs operation batches from a file or stdin.

use crate::auth::{AuthMode, Credential, SessionManager};
use crate::config::Config;
use crate::edition::is_enterprise_only;
use crate::resource::Resource;
use crate::runner::{ItemResult, Runner};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `tbflow=debug`.
pub const LOG_ENV: &str = "TBFLOW_LOG";

/// Run ThingsBoard REST operations from JSON items
#[derive(Parser, Debug)]
#[command(name = "tbflow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log request flow to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a batch of operation items
    Run(RunArgs),
    /// Verify that the configured credential is accepted
    Check(CheckArgs),
    /// List resources and their operations
    Operations(OperationsArgs),
    /// Inspect configuration
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// JSON array or JSON lines of items (reads stdin when omitted or "-")
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Record failing items as errors instead of aborting
    #[arg(long)]
    pub continue_on_fail: bool,

    /// Override the configured server URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "json", value_enum)]
    pub output: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Override the configured server URL
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Parser, Debug)]
pub struct OperationsArgs {
    /// Only list this resource (e.g. "device", "entityGroup")
    pub resource: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show config file path
    Path,
    /// Show the effective configuration with secrets redacted
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One compact JSON array
    #[default]
    Json,
    /// Indented JSON array
    Pretty,
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => run_batch(cli.config.as_deref(), args).await,
        Commands::Check(args) => check(cli.config.as_deref(), args).await,
        Commands::Operations(args) => operations(&args),
        Commands::Config(args) => config(cli.config.as_deref(), &args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(filter) => EnvFilter::new(filter),
        Err(_) if verbose => EnvFilter::new("tbflow=debug"),
        Err(_) => return,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>, base_url: Option<String>) -> Result<Config> {
    let mut config = Config::load(path).context("Error loading config")?;
    if let Some(url) = base_url {
        config.base_url = url;
    }
    Ok(config)
}

async fn run_batch(config_path: Option<&Path>, args: RunArgs) -> Result<ExitCode> {
    let config = load_config(config_path, args.base_url)?;
    let credential: Credential = config.credential()?;
    let continue_on_fail = args.continue_on_fail || config.continue_on_fail;

    let text = read_input(args.input.as_deref())?;
    let items = parse_items(&text)?;
    tracing::debug!(items = items.len(), continue_on_fail, "starting batch");

    let results = Runner::new(credential)
        .continue_on_fail(continue_on_fail)
        .run(&items)
        .await?;

    println!("{}", format_results(&results, args.output)?);
    Ok(ExitCode::SUCCESS)
}

async fn check(config_path: Option<&Path>, args: CheckArgs) -> Result<ExitCode> {
    let config = load_config(config_path, args.base_url)?;
    let credential = config.credential()?;

    match SessionManager::new().test_connection(&credential).await {
        Ok(()) => {
            println!("OK: connected to {}", credential.base_url());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Connection failed: {e}");
            Ok(ExitCode::from(1))
        }
    }
}

fn operations(args: &OperationsArgs) -> Result<ExitCode> {
    let resources: Vec<Resource> = match &args.resource {
        Some(id) => vec![
            Resource::from_id(id).with_context(|| format!("Unknown resource: {id}"))?,
        ],
        None => Resource::ALL.to_vec(),
    };
    print!("{}", format_catalog(&resources));
    Ok(ExitCode::SUCCESS)
}

fn config(config_path: Option<&Path>, args: &ConfigArgs) -> Result<ExitCode> {
    match args.action {
        ConfigAction::Path => {
            let path = config_path.map_or_else(Config::default_path, Path::to_path_buf);
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = load_config(config_path, None)?;
            let redact = |v: &Option<String>| if v.is_some() { "[set]" } else { "(not set)" };
            println!("baseUrl: {}", config.base_url);
            let auth_type = match config.auth_type {
                AuthMode::ApiKey => "apiKey",
                AuthMode::UsernamePassword => "usernamePassword",
            };
            println!("authType: {auth_type}");
            println!("apiKey: {}", redact(&config.api_key));
            println!("username: {}", config.username.as_deref().unwrap_or("(not set)"));
            println!("password: {}", redact(&config.password));
            println!("continueOnFail: {}", config.continue_on_fail);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Parse a JSON array of items, or a stream of items (JSON lines).
///
/// A single top-level array is unpacked into its elements.
pub fn parse_items(text: &str) -> Result<Vec<Value>> {
    let values = serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("input is not valid JSON")?;

    let items = match <[Value; 1]>::try_from(values) {
        Ok([Value::Array(items)]) => items,
        Ok([single]) => vec![single],
        Err(values) => values,
    };

    if let Some(index) = items.iter().position(|v| !v.is_object()) {
        anyhow::bail!("item {index} is not a JSON object");
    }
    Ok(items)
}

pub fn format_results(results: &[ItemResult], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string(results)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(results)?,
    })
}

/// One line per operation, `*` marking operations that need a PE server.
#[must_use]
pub fn format_catalog(resources: &[Resource]) -> String {
    let mut out = String::new();
    for resource in resources {
        out.push_str(resource.id());
        out.push('\n');
        for name in resource.operations() {
            let marker = if is_enterprise_only(*resource, name) { " *" } else { "" };
            out.push_str(&format!("  {name}{marker}\n"));
        }
    }
    out
}
