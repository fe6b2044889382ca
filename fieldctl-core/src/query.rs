//! Statistics query parameters handed to an external query executor.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldError, Result};
use crate::order_by::{OrderByField, OrderByList};
use crate::registry::FieldRegistry;
use crate::statistics::{StatisticDefinition, StatisticDefinitions};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsQuery {
    pub statistic_definitions: Vec<StatisticDefinition>,
    #[serde(default)]
    pub group_by_field_names: Vec<String>,
    #[serde(default)]
    pub order_by_fields: Vec<OrderByField>,
}

impl StatisticsQuery {
    /// Snapshot the current selections. Group-by comes from the registry's
    /// active fields in display order.
    pub fn build(
        definitions: &StatisticDefinitions,
        registry: &FieldRegistry,
        order_by: &OrderByList,
    ) -> Result<Self> {
        if definitions.is_empty() {
            return Err(FieldError::NoStatistics);
        }

        let query = Self {
            statistic_definitions: definitions.iter().cloned().collect(),
            group_by_field_names: registry.active_fields().map(str::to_string).collect(),
            order_by_fields: order_by.iter().cloned().collect(),
        };
        debug!(
            statistics = query.statistic_definitions.len(),
            group_by = query.group_by_field_names.len(),
            order_by = query.order_by_fields.len(),
            "statistics query built"
        );
        Ok(query)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        rendered.map_err(|err| FieldError::json("statistics query", err))
    }
}

/// SQL-like one-line summary, e.g.
/// `SELECT SUM(POP2007) GROUP BY SUB_REGION ORDER BY SUB_REGION ASC`.
impl fmt::Display for StatisticsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        write_joined(f, &self.statistic_definitions)?;
        if !self.group_by_field_names.is_empty() {
            f.write_str(" GROUP BY ")?;
            write_joined(f, &self.group_by_field_names)?;
        }
        if !self.order_by_fields.is_empty() {
            f.write_str(" ORDER BY ")?;
            write_joined(f, &self.order_by_fields)?;
        }
        Ok(())
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
