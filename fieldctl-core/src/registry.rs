//! Ordered registry of selectable fields.
//!
//! [`FieldRegistry`] owns every [`FieldEntry`]; callers only ever see shared
//! references, so name uniqueness is enforced here and nowhere else. Mutations
//! are reported synchronously to subscribed observers, in subscription order,
//! and only when state actually changed.

use std::fmt;

use tracing::debug;

use crate::error::{FieldError, Result};
use crate::field::{FieldEntry, FieldEvent};

/// Receives [`FieldEvent`]s from a [`FieldRegistry`].
///
/// Any `FnMut(&FieldEvent)` closure is an observer.
pub trait FieldObserver {
    fn on_field_event(&mut self, event: &FieldEvent);
}

impl<F> FieldObserver for F
where
    F: FnMut(&FieldEvent),
{
    fn on_field_event(&mut self, event: &FieldEvent) {
        self(event)
    }
}

/// Handle returned by [`FieldRegistry::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
pub struct FieldRegistry {
    entries: Vec<FieldEntry>,
    observers: Vec<(ObserverId, Box<dyn FieldObserver>)>,
    next_observer: u64,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from schema field names, all inactive.
    pub fn with_fields<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        registry.extend(names)?;
        Ok(registry)
    }

    /// Add several fields in order. Stops at the first duplicate; fields added
    /// before it are kept.
    pub fn extend<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add(name)?;
        }
        Ok(())
    }

    /// Append a new inactive field.
    pub fn add(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(FieldError::duplicate_name(name));
        }

        debug!(field = %name, "field added");
        self.entries.push(FieldEntry::new(name.clone()));
        self.notify(&FieldEvent::Added { name });
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        let index = self.position(name)?;
        let entry = self.entries.remove(index);

        debug!(field = %name, was_active = entry.is_active(), "field removed");
        self.notify(&FieldEvent::Removed {
            name: entry.name().to_string(),
            was_active: entry.is_active(),
        });
        Ok(())
    }

    /// Set the active flag. Observers hear about it only if the flag flipped,
    /// so repeating the same call is a no-op.
    pub fn set_active(&mut self, name: &str, active: bool) -> Result<()> {
        let index = self.position(name)?;
        if !self.entries[index].set_active(active) {
            return Ok(());
        }

        debug!(field = %name, active, "field toggled");
        self.notify(&FieldEvent::Toggled {
            name: name.to_string(),
            active,
        });
        Ok(())
    }

    /// Flip the active flag and return the new value.
    pub fn toggle(&mut self, name: &str) -> Result<bool> {
        let active = !self.get(name)?.is_active();
        self.set_active(name, active)?;
        Ok(active)
    }

    /// Names of active fields, in registry order.
    ///
    /// Lazy and borrowing; call again for a fresh pass.
    pub fn active_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.is_active())
            .map(FieldEntry::name)
    }

    pub fn get(&self, name: &str) -> Result<&FieldEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .ok_or_else(|| FieldError::field_not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name() == name)
    }

    pub fn is_active(&self, name: &str) -> Result<bool> {
        self.get(name).map(FieldEntry::is_active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Observers stay subscribed.
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        debug!(count = self.entries.len(), "registry cleared");
        self.entries.clear();
        self.notify(&FieldEvent::Cleared);
    }

    pub fn subscribe(&mut self, observer: impl FieldObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|entry| entry.name() == name)
            .ok_or_else(|| FieldError::field_not_found(name))
    }

    fn notify(&mut self, event: &FieldEvent) {
        for (_, observer) in &mut self.observers {
            observer.on_field_event(event);
        }
    }
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("entries", &self.entries)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<'a> IntoIterator for &'a FieldRegistry {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
