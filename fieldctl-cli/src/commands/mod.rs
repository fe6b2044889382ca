//! Command implementations for fieldctl CLI

pub mod fields;
pub mod query;

pub use fields::{run_fields, FieldsArgs};
pub use query::{run_query, QueryArgs};

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use fieldctl_core::{FieldctlConfig, Schema, SelectionSession};
use tracing::{info, warn};

/// Arguments shared by every command that works on a schema
#[derive(Args, Debug)]
pub struct SelectionArgs {
    /// Schema document (JSON array of names, or {"fields": [{"name": ...}]})
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Check fields for grouping (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "FIELD")]
    pub group: Vec<String>,

    /// Uncheck fields, dropping them from the order-by list too (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "FIELD")]
    pub ungroup: Vec<String>,

    /// Skip the default selections from the config file
    #[arg(long)]
    pub no_defaults: bool,
}

impl SelectionArgs {
    fn schema_path(&self, config: &FieldctlConfig) -> Result<PathBuf> {
        self.schema
            .clone()
            .or_else(|| config.schema_path.clone())
            .ok_or_else(|| {
                anyhow!("No schema given\n\nPass --schema PATH or set schema_path in the config")
            })
    }
}

/// Load the schema, start a session and apply defaults plus grouping flags.
/// The caller owns the session and must call `shutdown` when done.
pub fn open_session(args: &SelectionArgs, config: &FieldctlConfig) -> Result<SelectionSession> {
    let schema_path = args.schema_path(config)?;
    let schema = Schema::from_path(&schema_path)
        .with_context(|| format!("Failed to load schema {}", schema_path.display()))?;

    let mut session = SelectionSession::from_schema(&schema)
        .with_context(|| format!("Invalid schema {}", schema_path.display()))?;
    info!(schema = %schema_path.display(), fields = session.registry().len(), "schema loaded");

    if !args.no_defaults {
        let skipped = session.apply_defaults(&config.defaults);
        if !skipped.is_empty() {
            warn!(count = skipped.len(), "some default selections do not match this schema");
        }
    }

    for name in &args.group {
        session
            .set_grouping(name, true)
            .with_context(|| format!("Cannot group by '{name}'"))?;
    }
    for name in &args.ungroup {
        session
            .set_grouping(name, false)
            .with_context(|| format!("Cannot ungroup '{name}'"))?;
    }

    Ok(session)
}
