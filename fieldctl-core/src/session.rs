//! Selection session: the composition root for one schema.
//!
//! Owns the field registry, the order-by list and the statistic definitions,
//! and wires the registry's change notifications into both lists: a field that
//! stops being grouped also stops being ordered, and a removed field takes its
//! statistics with it. The lists are shared with that observer through
//! `Rc<RefCell<_>>`, which keeps a session on the thread that created it.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{info, warn};

use crate::config::SelectionDefaults;
use crate::error::{FieldError, Result};
use crate::field::FieldEvent;
use crate::order_by::{OrderByList, SortOrder};
use crate::query::StatisticsQuery;
use crate::registry::{FieldRegistry, ObserverId};
use crate::schema::Schema;
use crate::statistics::{StatisticDefinition, StatisticDefinitions, StatisticType};

pub struct SelectionSession {
    registry: FieldRegistry,
    order_by: Rc<RefCell<OrderByList>>,
    statistics: Rc<RefCell<StatisticDefinitions>>,
    cascade: ObserverId,
}

impl SelectionSession {
    pub fn new(mut registry: FieldRegistry) -> Self {
        let order_by = Rc::new(RefCell::new(OrderByList::new()));
        let statistics = Rc::new(RefCell::new(StatisticDefinitions::new()));
        let observed_order_by = Rc::clone(&order_by);
        let observed_statistics = Rc::clone(&statistics);
        let cascade = registry.subscribe(move |event: &FieldEvent| {
            observed_order_by.borrow_mut().handle_event(event);
            observed_statistics.borrow_mut().handle_event(event);
        });

        Self {
            registry,
            order_by,
            statistics,
            cascade,
        }
    }

    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let session = Self::new(schema.to_registry()?);
        info!(fields = session.registry.len(), "selection session started");
        Ok(session)
    }

    /// Apply configured initial selections. Entries that do not fit the loaded
    /// schema are skipped and returned so the caller can report them.
    pub fn apply_defaults(&mut self, defaults: &SelectionDefaults) -> Vec<FieldError> {
        let mut skipped = Vec::new();

        for name in &defaults.group_by {
            if let Err(err) = self.set_grouping(name, true) {
                skipped.push(err);
            }
        }
        for field in &defaults.order_by {
            if let Err(err) = self.order_by(&field.field_name, field.sort_order) {
                skipped.push(err);
            }
        }
        for definition in &defaults.statistics {
            if let Err(err) = self.add_statistic(definition.clone()) {
                skipped.push(err);
            }
        }

        for err in &skipped {
            warn!(error = %err, "default selection skipped");
        }
        skipped
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn order_by_list(&self) -> Ref<'_, OrderByList> {
        self.order_by.borrow()
    }

    pub fn statistics(&self) -> Ref<'_, StatisticDefinitions> {
        self.statistics.borrow()
    }

    /// Check or uncheck a field for grouping. Unchecking also drops the field
    /// from the order-by list.
    pub fn set_grouping(&mut self, name: &str, grouping: bool) -> Result<()> {
        self.registry.set_active(name, grouping)
    }

    pub fn toggle_grouping(&mut self, name: &str) -> Result<bool> {
        self.registry.toggle(name)
    }

    /// Remove a field; its order-by entry and statistics go with it.
    pub fn remove_field(&mut self, name: &str) -> Result<()> {
        self.registry.remove(name)
    }

    pub fn order_by(&mut self, name: &str, order: SortOrder) -> Result<()> {
        self.order_by.borrow_mut().add(&self.registry, name, order)
    }

    pub fn remove_order_by(&mut self, name: &str) -> Result<()> {
        self.order_by.borrow_mut().remove(name).map(|_| ())
    }

    pub fn set_sort_order(&mut self, name: &str, order: SortOrder) -> Result<()> {
        self.order_by.borrow_mut().set_sort_order(name, order)
    }

    pub fn add_statistic(&mut self, definition: StatisticDefinition) -> Result<()> {
        self.statistics.borrow_mut().add(&self.registry, definition)
    }

    pub fn remove_statistic(
        &mut self,
        field_name: &str,
        statistic_type: StatisticType,
    ) -> Result<()> {
        self.statistics
            .borrow_mut()
            .remove(field_name, statistic_type)
            .map(|_| ())
    }

    pub fn build_query(&self) -> Result<StatisticsQuery> {
        StatisticsQuery::build(
            &self.statistics.borrow(),
            &self.registry,
            &self.order_by.borrow(),
        )
    }

    /// Tear the session down: detach the cascade observer and drop all entries.
    /// Returns the emptied registry, which keeps any observers the caller
    /// subscribed before handing it to the session.
    pub fn shutdown(mut self) -> FieldRegistry {
        self.registry.unsubscribe(self.cascade);
        let grouped = self.registry.active_fields().count();
        let fields = self.registry.len();
        self.registry.clear();
        info!(fields, grouped, "selection session closed");
        self.registry
    }
}
