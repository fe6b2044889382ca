use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fieldctl_core::{FieldEntry, FieldctlConfig};

use super::{open_session, SelectionArgs};

#[derive(Parser, Debug)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: FieldsFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldsFormat {
    Text,
    Json,
}

pub fn run_fields(args: FieldsArgs, config: &FieldctlConfig) -> Result<()> {
    let session = open_session(&args.selection, config)?;

    match args.format {
        FieldsFormat::Text => {
            for entry in session.registry() {
                println!("{}", checkbox_line(entry));
            }
        }
        FieldsFormat::Json => {
            let entries: Vec<&FieldEntry> = session.registry().iter().collect();
            let json = serde_json::to_string_pretty(&entries)
                .context("Failed to serialize fields")?;
            println!("{}", json);
        }
    }

    session.shutdown();
    Ok(())
}

/// One checkbox-list row: `[x] SUB_REGION`
fn checkbox_line(entry: &FieldEntry) -> String {
    let mark = if entry.is_active() { 'x' } else { ' ' };
    format!("[{mark}] {}", entry.to_display_label())
}
