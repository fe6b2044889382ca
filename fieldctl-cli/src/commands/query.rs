use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fieldctl_core::{FieldctlConfig, OrderByField, StatisticDefinition};
use tracing::info;

use super::{open_session, SelectionArgs};

#[derive(Parser, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Order grouped fields: FIELD[:asc|desc] (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "FIELD[:ORDER]")]
    pub order: Vec<OrderByField>,

    /// Add statistics: FIELD:TYPE, e.g. POP2007:sum (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "FIELD:TYPE")]
    pub stat: Vec<StatisticDefinition>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: QueryFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFormat {
    /// Pretty JSON for the query executor
    Json,
    /// One-line SQL-like summary
    Summary,
}

pub fn run_query(args: QueryArgs, config: &FieldctlConfig) -> Result<()> {
    let mut session = open_session(&args.selection, config)?;

    for field in args.order {
        let name = field.field_name.clone();
        session
            .order_by(&field.field_name, field.sort_order)
            .with_context(|| format!("Cannot order by '{name}'"))?;
    }
    for definition in args.stat {
        let label = definition.to_string();
        session
            .add_statistic(definition)
            .with_context(|| format!("Cannot add statistic {label}"))?;
    }

    let query = session.build_query().context("Cannot build statistics query")?;
    info!(
        statistics = query.statistic_definitions.len(),
        group_by = query.group_by_field_names.len(),
        "query parameters ready"
    );

    match args.format {
        QueryFormat::Json => println!("{}", query.to_json(true)?),
        QueryFormat::Summary => println!("{}", query),
    }

    session.shutdown();
    Ok(())
}
