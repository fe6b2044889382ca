//! fieldctl CLI - grouped/sorted field selection over a schema
//!
//! Entry point for the `fieldctl` command-line tool:
//! - List schema fields with their grouping checkboxes (`fields`)
//! - Build statistics query parameters from group/order/statistic selections (`query`)
//! - Manage the config file holding default selections (`config`)
//! - Generate shell completions (`completions`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fieldctl_core::FieldctlConfig;
use tracing::debug;

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "fieldctl",
    author,
    version,
    about = "Select, group and sort schema fields into statistics query parameters",
    long_about = "Load a schema's field names, check the fields to group by, order the grouped \
                  fields, pick statistics, and emit the resulting query parameters as JSON."
)]
struct Cli {
    /// Config file (default: ~/.fieldctl/config.toml)
    #[arg(long, global = true, env = "FIELDCTL_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List schema fields and their grouping state
    Fields(commands::FieldsArgs),
    /// Build statistics query parameters from the current selections
    Query(commands::QueryArgs),
    /// Manage fieldctl configuration (init, path, show)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Resolve the config file: --config / $FIELDCTL_CONFIG, else the default path
fn config_path(explicit: Option<&PathBuf>) -> PathBuf {
    explicit.cloned().unwrap_or_else(FieldctlConfig::config_path)
}

/// An explicit config must exist; the default one may not yet
fn load_config(explicit: Option<&PathBuf>) -> Result<FieldctlConfig> {
    match explicit {
        Some(path) => FieldctlConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => FieldctlConfig::load().context("Failed to load config"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // `config init` must work even when the current file is missing or broken,
    // so loading errors only surface for commands that need the config.
    let loaded = load_config(cli.config.as_ref());
    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        default_level: loaded.as_ref().ok().and_then(|c| c.log_level.clone()),
    })
    .ok();
    debug!(?cli, "parsed arguments");

    match cli.command {
        Commands::Fields(args) => commands::run_fields(args, &loaded?)?,
        Commands::Query(args) => commands::run_query(args, &loaded?)?,
        Commands::Config(args) => {
            config::run_config(args, config_path(cli.config.as_ref()), loaded)?
        }
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
