use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fieldctl_core::{FieldctlConfig, SelectionDefaults};

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with the built-in default selections
    Init(InitArgs),
    /// Show config file path
    Path,
    /// Print the effective config as TOML
    Show,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Schema document to use when --schema is omitted
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Start without default selections
    #[arg(long)]
    pub empty: bool,

    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(
    args: ConfigArgs,
    path: PathBuf,
    loaded: Result<FieldctlConfig>,
) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args, &path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Show => run_show(loaded?),
    }
}

fn run_init(args: InitArgs, path: &Path) -> Result<()> {
    if path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            path
        ));
    }

    let config = FieldctlConfig {
        schema_path: args.schema,
        log_level: None,
        defaults: if args.empty {
            SelectionDefaults::empty()
        } else {
            SelectionDefaults::default()
        },
    };
    config
        .save(path)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    println!("Created config at: {}", path.display());
    Ok(())
}

fn run_show(config: FieldctlConfig) -> Result<()> {
    let toml_str = config.to_toml().context("Failed to serialize config to TOML")?;
    println!("{}", toml_str);
    Ok(())
}
