//! Selectable options.

use serde::{Deserialize, Serialize};

/// A selectable item with a stable key and a human-readable label.
///
/// `value` identifies the option within an option list; `label` is what the
/// user sees and what search matches against. Options are immutable value
/// objects and are cloned into selection snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    /// The unique key of this option within its list.
    pub value: String,
    /// The display text, also used for filtering and highlighting.
    pub label: String,
}

impl SelectOption {
    /// Create an option from a value and a label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Get the option's value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Get the option's label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<V: Into<String>, L: Into<String>> From<(V, L)> for SelectOption {
    fn from((value, label): (V, L)) -> Self {
        Self::new(value, label)
    }
}

/// Find the first option in `options` whose value equals `value`.
///
/// Option lists are not validated for duplicate values; lookups resolve to the
/// first match.
pub fn find_by_value<'a>(options: &'a [SelectOption], value: &str) -> Option<&'a SelectOption> {
    options.iter().find(|option| option.value == value)
}

static_assertions::assert_impl_all!(SelectOption: Send, Sync);
