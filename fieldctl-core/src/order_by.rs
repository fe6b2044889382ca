//! Order-by list for grouped fields.
//!
//! Only fields that are currently active in the [`FieldRegistry`] may be
//! ordered, and each field at most once. [`OrderByList::handle_event`] keeps
//! the list consistent when a field stops being grouped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldError, Result};
use crate::field::FieldEvent;
use crate::registry::FieldRegistry;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// SQL keyword for the direction
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for SortOrder {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(FieldError::InvalidSortOrder {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByField {
    pub field_name: String,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl OrderByField {
    pub fn new(field_name: impl Into<String>, sort_order: SortOrder) -> Self {
        Self {
            field_name: field_name.into(),
            sort_order,
        }
    }
}

impl fmt::Display for OrderByField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field_name, self.sort_order)
    }
}

/// Parses `FIELD` or `FIELD:asc|desc`.
impl FromStr for OrderByField {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self> {
        match value.rsplit_once(':') {
            Some((field, order)) => Ok(Self::new(field.trim(), order.trim().parse()?)),
            None => Ok(Self::new(value.trim(), SortOrder::default())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderByList {
    fields: Vec<OrderByField>,
}

impl OrderByList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, registry: &FieldRegistry, name: &str, order: SortOrder) -> Result<()> {
        if !registry.is_active(name)? {
            return Err(FieldError::not_grouped(name));
        }
        if self.contains(name) {
            return Err(FieldError::already_ordered(name));
        }

        debug!(field = %name, %order, "order-by field added");
        self.fields.push(OrderByField::new(name, order));
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<OrderByField> {
        let index = self.position(name)?;
        debug!(field = %name, "order-by field removed");
        Ok(self.fields.remove(index))
    }

    pub fn set_sort_order(&mut self, name: &str, order: SortOrder) -> Result<()> {
        let index = self.position(name)?;
        self.fields[index].sort_order = order;
        Ok(())
    }

    /// Drop entries whose field is no longer grouped in `registry`.
    pub fn retain_active(&mut self, registry: &FieldRegistry) {
        self.fields.retain(|field| registry.is_active(&field.field_name).unwrap_or(false));
    }

    /// Cascade a registry change: a field that stops being grouped can no
    /// longer be ordered.
    pub fn handle_event(&mut self, event: &FieldEvent) {
        if !event.deactivates() {
            return;
        }
        match event.name() {
            Some(name) => {
                if self.remove(name).is_ok() {
                    debug!(field = %name, "order-by dropped after field was ungrouped");
                }
            }
            None => self.fields.clear(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.field_name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderByField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|field| field.field_name == name)
            .ok_or_else(|| FieldError::order_by_not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped(names: &[&str], active: &[&str]) -> FieldRegistry {
        let mut registry = FieldRegistry::with_fields(names.iter().copied()).unwrap();
        for name in active {
            registry.set_active(name, true).unwrap();
        }
        registry
    }

    #[test]
    fn parse_sort_order() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert_eq!("DESCENDING".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert!(matches!(
            "sideways".parse::<SortOrder>(),
            Err(FieldError::InvalidSortOrder { .. })
        ));
    }

    #[test]
    fn parse_order_by_field() {
        let field: OrderByField = "SUB_REGION:desc".parse().unwrap();
        assert_eq!(field, OrderByField::new("SUB_REGION", SortOrder::Descending));

        let field: OrderByField = "STATE_NAME".parse().unwrap();
        assert_eq!(field.sort_order, SortOrder::Ascending);
        assert_eq!(field.to_string(), "STATE_NAME ASC");
    }

    #[test]
    fn only_grouped_fields_can_be_ordered() {
        let registry = grouped(&["SUB_REGION", "STATE_NAME"], &["SUB_REGION"]);
        let mut list = OrderByList::new();

        list.add(&registry, "SUB_REGION", SortOrder::Ascending).unwrap();
        assert!(matches!(
            list.add(&registry, "STATE_NAME", SortOrder::Ascending),
            Err(FieldError::NotGrouped { .. })
        ));
        assert!(list
            .add(&registry, "MISSING", SortOrder::Ascending)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn field_is_ordered_at_most_once() {
        let registry = grouped(&["SUB_REGION"], &["SUB_REGION"]);
        let mut list = OrderByList::new();

        list.add(&registry, "SUB_REGION", SortOrder::Ascending).unwrap();
        assert!(matches!(
            list.add(&registry, "SUB_REGION", SortOrder::Descending),
            Err(FieldError::AlreadyOrdered { .. })
        ));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn set_sort_order_and_remove() {
        let registry = grouped(&["A", "B"], &["A", "B"]);
        let mut list = OrderByList::new();
        list.add(&registry, "A", SortOrder::Ascending).unwrap();
        list.add(&registry, "B", SortOrder::Ascending).unwrap();

        list.set_sort_order("B", SortOrder::Descending).unwrap();
        let removed = list.remove("A").unwrap();

        assert_eq!(removed.field_name, "A");
        assert_eq!(
            list.iter().cloned().collect::<Vec<_>>(),
            vec![OrderByField::new("B", SortOrder::Descending)]
        );
        assert!(list.remove("A").unwrap_err().is_not_found());
        assert!(list.set_sort_order("A", SortOrder::Ascending).is_err());
    }

    #[test]
    fn ungrouping_events_cascade() {
        let registry = grouped(&["A", "B"], &["A", "B"]);
        let mut list = OrderByList::new();
        list.add(&registry, "A", SortOrder::Ascending).unwrap();
        list.add(&registry, "B", SortOrder::Ascending).unwrap();

        list.handle_event(&FieldEvent::Toggled {
            name: "A".into(),
            active: true,
        });
        assert_eq!(list.len(), 2);

        list.handle_event(&FieldEvent::Toggled {
            name: "A".into(),
            active: false,
        });
        assert!(!list.contains("A"));

        list.handle_event(&FieldEvent::Cleared);
        assert!(list.is_empty());
    }

    #[test]
    fn retain_active_prunes_stale_entries() {
        let mut registry = grouped(&["A", "B"], &["A", "B"]);
        let mut list = OrderByList::new();
        list.add(&registry, "A", SortOrder::Ascending).unwrap();
        list.add(&registry, "B", SortOrder::Ascending).unwrap();

        registry.set_active("B", false).unwrap();
        list.retain_active(&registry);

        assert!(list.contains("A"));
        assert!(!list.contains("B"));
    }
}
