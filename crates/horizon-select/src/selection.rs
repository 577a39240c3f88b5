//! Selection state for single and multi-value selection.
//!
//! [`SelectionState`] owns the ordered set of chosen options and enforces the
//! cardinality of the current [`SelectionMode`]. Every mutation that changes
//! the set emits [`SelectionState::selection_changed`] with a snapshot of the
//! full selection.
//!
//! # Rules
//!
//! - In [`SelectionMode::Single`], selecting replaces the whole selection.
//! - In [`SelectionMode::Multiple`], selecting appends unless an option with
//!   the same value is already selected. Selecting twice does not deselect.
//! - Removing is keyed by value and is a no-op for unselected values.
//! - Switching from multiple to single keeps only the earliest selection.
//!
//! # Example
//!
//! ```
//! use horizon_select::{SelectOption, SelectionMode, SelectionState};
//!
//! let mut state = SelectionState::new(SelectionMode::Multiple);
//! state.selection_changed.connect(|selected| {
//!     println!("{} selected", selected.len());
//! });
//!
//! state.select(&SelectOption::new("1", "Apple"));
//! state.select(&SelectOption::new("2", "Banana"));
//! state.select(&SelectOption::new("1", "Apple"));
//! assert_eq!(state.selection().values(), vec!["1", "2"]);
//! ```

use horizon_select_core::Signal;
use horizon_select_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::option::SelectOption;

// ============================================================================
// Selection Mode
// ============================================================================

/// How many options may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// At most one option is selected (default).
    #[default]
    Single,
    /// Any number of distinct options may be selected.
    Multiple,
}

impl SelectionMode {
    /// Map a `multiple` flag to a mode.
    pub fn from_multiple(multiple: bool) -> Self {
        if multiple { Self::Multiple } else { Self::Single }
    }

    /// Whether this mode allows more than one selection.
    pub fn is_multiple(self) -> bool {
        self == Self::Multiple
    }
}

// ============================================================================
// Selection Set
// ============================================================================

/// The ordered set of selected options.
///
/// Iteration order is selection order. No two entries share a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    items: Vec<SelectOption>,
}

impl SelectionSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selected options.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an option with `value` is selected.
    pub fn contains(&self, value: &str) -> bool {
        self.position(value).is_some()
    }

    /// The earliest selected option.
    pub fn first(&self) -> Option<&SelectOption> {
        self.items.first()
    }

    /// Iterate in selection order.
    pub fn iter(&self) -> std::slice::Iter<'_, SelectOption> {
        self.items.iter()
    }

    /// The selected options as a slice.
    pub fn as_slice(&self) -> &[SelectOption] {
        &self.items
    }

    /// The selected values in selection order.
    pub fn values(&self) -> Vec<&str> {
        self.items.iter().map(SelectOption::value).collect()
    }

    /// Clone the selection into a plain list.
    pub fn to_vec(&self) -> Vec<SelectOption> {
        self.items.clone()
    }

    fn position(&self, value: &str) -> Option<usize> {
        self.items.iter().position(|item| item.value == value)
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a SelectOption;
    type IntoIter = std::slice::Iter<'a, SelectOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Selection State
// ============================================================================

/// Selection state machine with change notification.
///
/// # Signals
///
/// - `selection_changed(Vec<SelectOption>)`: Emitted after every change with
///   the full current selection.
pub struct SelectionState {
    mode: SelectionMode,
    set: SelectionSet,

    /// Signal emitted when the selection changes.
    pub selection_changed: Signal<Vec<SelectOption>>,
}

impl SelectionState {
    /// Create an empty selection in the given mode.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            set: SelectionSet::new(),
            selection_changed: Signal::new(),
        }
    }

    /// The current selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// The current selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.set
    }

    /// Whether an option with `value` is selected.
    pub fn is_selected(&self, value: &str) -> bool {
        self.set.contains(value)
    }

    /// Select an option according to the current mode.
    ///
    /// Returns `true` if the selection changed.
    pub fn select(&mut self, option: &SelectOption) -> bool {
        let changed = match self.mode {
            SelectionMode::Single => {
                if self.set.items.len() == 1 && self.set.items[0] == *option {
                    false
                } else {
                    self.set.items.clear();
                    self.set.items.push(option.clone());
                    true
                }
            }
            SelectionMode::Multiple => {
                if self.set.contains(&option.value) {
                    false
                } else {
                    self.set.items.push(option.clone());
                    true
                }
            }
        };

        if changed {
            tracing::debug!(
                target: targets::SELECTION,
                value = %option.value,
                mode = ?self.mode,
                "option selected"
            );
            self.notify();
        }
        changed
    }

    /// Remove the selected entry with the same value as `option`.
    ///
    /// Returns `true` if the selection changed.
    pub fn remove(&mut self, option: &SelectOption) -> bool {
        self.remove_value(&option.value)
    }

    /// Remove the selected entry with `value`.
    ///
    /// Returns `true` if the selection changed.
    pub fn remove_value(&mut self, value: &str) -> bool {
        let Some(index) = self.set.position(value) else {
            return false;
        };
        self.set.items.remove(index);
        tracing::debug!(target: targets::SELECTION, value, "option removed");
        self.notify();
        true
    }

    /// Change the selection mode.
    ///
    /// Switching to [`SelectionMode::Single`] with more than one selected
    /// option keeps only the earliest one. Returns `true` if the selection
    /// changed.
    pub fn set_mode(&mut self, mode: SelectionMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;

        if mode == SelectionMode::Single && self.set.len() > 1 {
            self.set.items.truncate(1);
            tracing::debug!(
                target: targets::SELECTION,
                kept = %self.set.items[0].value,
                "selection truncated to single"
            );
            self.notify();
            true
        } else {
            false
        }
    }

    /// Deselect everything.
    ///
    /// Returns `true` if the selection changed.
    pub fn clear(&mut self) -> bool {
        if self.set.is_empty() {
            return false;
        }
        self.set.items.clear();
        tracing::debug!(target: targets::SELECTION, "selection cleared");
        self.notify();
        true
    }

    /// Keep only the selected options whose value satisfies `keep`.
    ///
    /// Emits a single notification if anything was removed. Returns the
    /// number of removed entries.
    pub fn retain_values<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.set.len();
        self.set.items.retain(|item| keep(&item.value));
        let removed = before - self.set.len();
        if removed > 0 {
            tracing::debug!(target: targets::SELECTION, removed, "pruned selection");
            self.notify();
        }
        removed
    }

    fn notify(&self) {
        self.selection_changed.emit(self.set.to_vec());
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl std::fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionState")
            .field("mode", &self.mode)
            .field("selection", &self.set)
            .finish()
    }
}
