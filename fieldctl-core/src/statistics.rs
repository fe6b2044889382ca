use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldError, Result};
use crate::field::FieldEvent;
use crate::registry::FieldRegistry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatisticType {
    Count,
    Sum,
    Average,
    Minimum,
    Maximum,
    StandardDeviation,
    Variance,
}

impl StatisticType {
    pub const ALL: [StatisticType; 7] = [
        StatisticType::Count,
        StatisticType::Sum,
        StatisticType::Average,
        StatisticType::Minimum,
        StatisticType::Maximum,
        StatisticType::StandardDeviation,
        StatisticType::Variance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatisticType::Count => "COUNT",
            StatisticType::Sum => "SUM",
            StatisticType::Average => "AVERAGE",
            StatisticType::Minimum => "MINIMUM",
            StatisticType::Maximum => "MAXIMUM",
            StatisticType::StandardDeviation => "STANDARD_DEVIATION",
            StatisticType::Variance => "VARIANCE",
        }
    }
}

impl fmt::Display for StatisticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; `-` and `_` are interchangeable.
impl FromStr for StatisticType {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_uppercase().replace('-', "_");
        StatisticType::ALL
            .into_iter()
            .find(|statistic| statistic.as_str() == normalized)
            .ok_or_else(|| FieldError::InvalidStatistic {
                value: value.to_string(),
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticDefinition {
    pub field_name: String,
    pub statistic_type: StatisticType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_alias: Option<String>,
}

impl StatisticDefinition {
    pub fn new(field_name: impl Into<String>, statistic_type: StatisticType) -> Self {
        Self {
            field_name: field_name.into(),
            statistic_type,
            output_alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.output_alias = Some(alias.into());
        self
    }

    /// Same (field, statistic) pair; the alias does not count.
    pub fn same_combination(&self, other: &StatisticDefinition) -> bool {
        self.field_name == other.field_name && self.statistic_type == other.statistic_type
    }
}

/// `SUM(POP2007)`, or `SUM(POP2007) AS total` when aliased.
impl fmt::Display for StatisticDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.statistic_type, self.field_name)?;
        if let Some(alias) = &self.output_alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

/// Parses `FIELD:TYPE`.
impl FromStr for StatisticDefinition {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self> {
        let (field, statistic) = value
            .rsplit_once(':')
            .ok_or_else(|| FieldError::InvalidStatistic {
                value: value.to_string(),
            })?;
        Ok(Self::new(field.trim(), statistic.parse()?))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatisticDefinitions {
    definitions: Vec<StatisticDefinition>,
}

impl StatisticDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition over a registered field, rejecting repeats of the same
    /// (field, statistic) combination.
    pub fn add(&mut self, registry: &FieldRegistry, definition: StatisticDefinition) -> Result<()> {
        if !registry.contains(&definition.field_name) {
            return Err(FieldError::field_not_found(definition.field_name));
        }
        if self
            .definitions
            .iter()
            .any(|existing| existing.same_combination(&definition))
        {
            return Err(FieldError::duplicate_statistic(
                definition.field_name,
                definition.statistic_type.as_str(),
            ));
        }

        debug!(%definition, "statistic definition added");
        self.definitions.push(definition);
        Ok(())
    }

    pub fn remove(
        &mut self,
        field_name: &str,
        statistic_type: StatisticType,
    ) -> Result<StatisticDefinition> {
        let index = self
            .definitions
            .iter()
            .position(|d| d.field_name == field_name && d.statistic_type == statistic_type)
            .ok_or_else(|| {
                FieldError::statistic_not_found(format!("{statistic_type}({field_name})"))
            })?;
        Ok(self.definitions.remove(index))
    }

    /// Cascade a registry change: definitions over a removed field are
    /// dropped. Ungrouping keeps them, since statistics need not be grouped.
    pub fn handle_event(&mut self, event: &FieldEvent) {
        match event {
            FieldEvent::Removed { name, .. } => {
                let before = self.definitions.len();
                self.definitions.retain(|d| d.field_name != *name);
                let dropped = before - self.definitions.len();
                if dropped > 0 {
                    debug!(field = %name, dropped, "statistics dropped after field was removed");
                }
            }
            FieldEvent::Cleared => self.definitions.clear(),
            FieldEvent::Added { .. } | FieldEvent::Toggled { .. } => {}
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatisticDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn census() -> FieldRegistry {
        FieldRegistry::with_fields(["STATE_NAME", "POP2007", "AGE_5_17"]).unwrap()
    }

    #[test]
    fn parse_statistic_type_variants() {
        assert_eq!("sum".parse::<StatisticType>().unwrap(), StatisticType::Sum);
        assert_eq!(
            "standard-deviation".parse::<StatisticType>().unwrap(),
            StatisticType::StandardDeviation
        );
        assert_eq!(
            "STANDARD_DEVIATION".parse::<StatisticType>().unwrap(),
            StatisticType::StandardDeviation
        );
        assert!("median".parse::<StatisticType>().is_err());
    }

    #[test]
    fn parse_definition() {
        let definition: StatisticDefinition = "POP2007:average".parse().unwrap();
        assert_eq!(definition, StatisticDefinition::new("POP2007", StatisticType::Average));
        assert!("POP2007".parse::<StatisticDefinition>().is_err());
    }

    #[test]
    fn display_includes_alias() {
        let definition =
            StatisticDefinition::new("POP2007", StatisticType::Sum).with_alias("total");
        assert_eq!(definition.to_string(), "SUM(POP2007) AS total");
    }

    #[test]
    fn rejects_duplicate_combination() {
        let registry = census();
        let mut definitions = StatisticDefinitions::new();
        definitions
            .add(&registry, StatisticDefinition::new("POP2007", StatisticType::Sum))
            .unwrap();
        definitions
            .add(&registry, StatisticDefinition::new("POP2007", StatisticType::Average))
            .unwrap();

        let err = definitions
            .add(
                &registry,
                StatisticDefinition::new("POP2007", StatisticType::Sum).with_alias("again"),
            )
            .unwrap_err();
        assert!(matches!(err, FieldError::DuplicateStatistic { .. }));
        assert_eq!(definitions.len(), 2);
    }

    #[test]
    fn rejects_unknown_field() {
        let registry = census();
        let mut definitions = StatisticDefinitions::new();
        let err = definitions
            .add(&registry, StatisticDefinition::new("NOPE", StatisticType::Count))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(definitions.is_empty());
    }

    #[test]
    fn remove_definition() {
        let registry = census();
        let mut definitions = StatisticDefinitions::new();
        definitions
            .add(&registry, StatisticDefinition::new("AGE_5_17", StatisticType::Minimum))
            .unwrap();

        definitions.remove("AGE_5_17", StatisticType::Minimum).unwrap();
        assert!(definitions.is_empty());
        assert!(definitions
            .remove("AGE_5_17", StatisticType::Minimum)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn removed_field_drops_its_definitions() {
        let registry = census();
        let mut definitions = StatisticDefinitions::new();
        definitions
            .add(&registry, StatisticDefinition::new("POP2007", StatisticType::Sum))
            .unwrap();
        definitions
            .add(&registry, StatisticDefinition::new("AGE_5_17", StatisticType::Minimum))
            .unwrap();

        definitions.handle_event(&FieldEvent::Toggled {
            name: "POP2007".into(),
            active: false,
        });
        assert_eq!(definitions.len(), 2);

        definitions.handle_event(&FieldEvent::Removed {
            name: "POP2007".into(),
            was_active: false,
        });
        let remaining: Vec<&str> = definitions.iter().map(|d| d.field_name.as_str()).collect();
        assert_eq!(remaining, vec!["AGE_5_17"]);

        definitions.handle_event(&FieldEvent::Cleared);
        assert!(definitions.is_empty());
    }
}
