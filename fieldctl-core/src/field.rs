use std::fmt;

use serde::{Deserialize, Serialize};

/// A named schema field and whether it is currently selected for grouping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    name: String,
    #[serde(default)]
    active: bool,
}

impl FieldEntry {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Label shown next to the entry's checkbox.
    pub fn to_display_label(&self) -> &str {
        &self.name
    }

    /// Returns true when the flag actually changed.
    pub(crate) fn set_active(&mut self, active: bool) -> bool {
        let changed = self.active != active;
        self.active = active;
        changed
    }
}

impl fmt::Display for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_display_label())
    }
}

/// Change notification delivered to registry observers after a mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldEvent {
    Added { name: String },
    Removed { name: String, was_active: bool },
    Toggled { name: String, active: bool },
    Cleared,
}

impl FieldEvent {
    /// Name of the affected field, `None` for [`FieldEvent::Cleared`].
    pub fn name(&self) -> Option<&str> {
        match self {
            FieldEvent::Added { name }
            | FieldEvent::Removed { name, .. }
            | FieldEvent::Toggled { name, .. } => Some(name),
            FieldEvent::Cleared => None,
        }
    }

    /// True when the event means a field stopped being usable for grouping.
    pub fn deactivates(&self) -> bool {
        matches!(
            self,
            FieldEvent::Removed { .. }
                | FieldEvent::Toggled { active: false, .. }
                | FieldEvent::Cleared
        )
    }
}
