//! Searchable single/multi-value selection widget.
//!
//! [`ComboBox`] ties together the option list, the
//! [`SelectionState`](crate::SelectionState), the
//! [`InteractionController`](crate::InteractionController) and the option
//! filter, and exposes the result as a [`ComboBoxView`] for rendering.
//!
//! # Example
//!
//! ```
//! use horizon_select::{ComboBox, ComboBoxConfig, Gesture, SearchScheduling, SelectOption};
//!
//! let config = ComboBoxConfig::new([
//!     SelectOption::new("1", "Apple"),
//!     SelectOption::new("2", "Banana"),
//!     SelectOption::new("3", "Grape"),
//! ])
//! .with_search(true)
//! .with_multiple(true)
//! .with_search_scheduling(SearchScheduling::Immediate);
//!
//! let mut combo = ComboBox::new(config);
//! combo.on_change(|selected| {
//!     println!("{} selected", selected.len());
//! });
//!
//! combo.dispatch(Gesture::TriggerClicked);
//! combo.dispatch(Gesture::SearchInput { text: "an".into() });
//! assert_eq!(combo.visible_options().len(), 1);
//!
//! combo.dispatch(Gesture::OptionClicked { value: "2".into() });
//! assert_eq!(combo.selection().values(), vec!["2"]);
//! assert!(combo.is_open());
//! ```
//!
//! # Scheduling
//!
//! Typing updates the search box immediately. Filtering and highlighting use
//! the *effective* search text, which under
//! [`SearchScheduling::Deferred`] catches up on the host's calls to
//! [`ComboBox::tick`].
//!
//! # Signals
//!
//! - `selection_changed(Vec<SelectOption>)`: after every selection change
//! - `opened_changed(bool)`: when the dropdown opens or closes

use horizon_select_core::logging::targets;
use horizon_select_core::{ConnectionId, Signal, select_debug, select_trace};

use crate::config::{ComboBoxConfig, SearchScheduling, StaleSelectionPolicy};
use crate::controller::{InteractionController, PopupState};
use crate::filter::{FilteredOptions, filter_positions};
use crate::highlight::{HighlightedText, Matcher};
use crate::option::{SelectOption, find_by_value};
use crate::port::{DismissHandle, FocusPort, OutsidePointerPort, RegionId};
use crate::selection::{SelectionMode, SelectionSet, SelectionState};
use crate::view::{
    ChipView, ComboBoxView, DropdownBody, DropdownView, EMPTY_MESSAGE, Gesture, OptionRow,
    SEARCH_PLACEHOLDER, SearchBoxView, TriggerContent, TriggerView,
};

// ============================================================================
// Search Cache
// ============================================================================

/// Matcher and visible positions for one effective search text.
#[derive(Debug, Default)]
struct SearchCache {
    search: String,
    options_revision: u64,
    matcher: Option<Matcher>,
    /// `None` when every option is visible.
    positions: Option<Vec<usize>>,
}

impl SearchCache {
    fn is_current(&self, search: &str, options_revision: u64) -> bool {
        self.search == search && self.options_revision == options_revision
    }
}

// ============================================================================
// ComboBox
// ============================================================================

/// A searchable single/multi-value selection widget.
pub struct ComboBox {
    id: Option<String>,
    class_name: Option<String>,
    caption: Option<String>,
    placeholder: Option<String>,

    options: Vec<SelectOption>,
    /// Bumped whenever `options` is replaced.
    options_revision: u64,
    stale_selection: StaleSelectionPolicy,

    selection: SelectionState,
    controller: InteractionController,
    cache: SearchCache,
}

impl ComboBox {
    /// Create a widget from its configuration.
    ///
    /// The widget starts closed with an empty selection and search text.
    pub fn new(config: ComboBoxConfig) -> Self {
        let region = RegionId::next();
        select_debug!(
            region = %region,
            options = config.options.len(),
            multiple = config.multiple,
            with_search = config.with_search,
            "creating combo box"
        );

        let mut combo = Self {
            selection: SelectionState::new(config.selection_mode()),
            controller: InteractionController::new(
                region,
                config.with_search,
                config.search_scheduling,
            ),
            id: config.id,
            class_name: config.class_name,
            caption: config.label,
            placeholder: config.placeholder,
            options: config.options,
            options_revision: 0,
            stale_selection: config.stale_selection,
            cache: SearchCache::default(),
        };
        combo.refresh_search_cache();
        combo
    }

    /// Set the outside-pointer port using builder pattern.
    pub fn with_outside_pointer_port(mut self, port: impl OutsidePointerPort + 'static) -> Self {
        self.set_outside_pointer_port(port);
        self
    }

    /// Set the focus port using builder pattern.
    pub fn with_focus_port(mut self, port: impl FocusPort + 'static) -> Self {
        self.set_focus_port(port);
        self
    }

    /// Install the outside-pointer port.
    pub fn set_outside_pointer_port(&mut self, port: impl OutsidePointerPort + 'static) {
        self.controller.set_outside_pointer_port(Box::new(port));
    }

    /// Install the focus port.
    pub fn set_focus_port(&mut self, port: impl FocusPort + 'static) {
        self.controller.set_focus_port(Box::new(port));
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// The widget's region, as reported to the ports.
    pub fn region(&self) -> RegionId {
        self.controller.region()
    }

    /// Start listening for outside pointer interactions.
    pub fn mount(&mut self) {
        self.controller.mount();
    }

    /// Stop listening for outside pointer interactions.
    ///
    /// Also happens automatically when the widget is dropped.
    pub fn unmount(&mut self) {
        self.controller.unmount();
    }

    /// Whether the widget is subscribed to outside pointer interactions.
    pub fn is_mounted(&self) -> bool {
        self.controller.is_mounted()
    }

    /// A handle for reporting outside pointer interactions directly.
    pub fn dismiss_handle(&self) -> DismissHandle {
        self.controller.dismiss_handle()
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Signal emitted with the full selection after every change.
    pub fn selection_changed(&self) -> &Signal<Vec<SelectOption>> {
        &self.selection.selection_changed
    }

    /// Signal emitted when the dropdown opens or closes.
    pub fn opened_changed(&self) -> &Signal<bool> {
        &self.controller.opened_changed
    }

    /// Connect a selection change handler.
    pub fn on_change<F>(&self, handler: F) -> ConnectionId
    where
        F: Fn(&Vec<SelectOption>) + Send + Sync + 'static,
    {
        self.selection.selection_changed.connect(handler)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Root identifier.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Set the root identifier.
    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    /// Root style hook.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Set the root style hook.
    pub fn set_class_name(&mut self, class_name: Option<String>) {
        self.class_name = class_name;
    }

    /// Caption above the widget.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref().filter(|caption| !caption.is_empty())
    }

    /// Set the caption. `None` or an empty string hides it.
    pub fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption;
    }

    /// Trigger text when nothing is selected.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Set the placeholder.
    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder;
    }

    /// The full option list.
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Replace the option list.
    ///
    /// Selected options missing from the new list are kept or dropped
    /// according to the stale selection policy.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.begin_event();
        self.options = options;
        self.options_revision += 1;
        select_debug!(options = self.options.len(), "options replaced");

        if self.stale_selection == StaleSelectionPolicy::Prune {
            let options = &self.options;
            self.selection
                .retain_values(|value| find_by_value(options, value).is_some());
        }
        self.refresh_search_cache();
    }

    /// The stale selection policy.
    pub fn stale_selection(&self) -> StaleSelectionPolicy {
        self.stale_selection
    }

    /// Set the stale selection policy. Applies from the next option change.
    pub fn set_stale_selection(&mut self, policy: StaleSelectionPolicy) {
        self.stale_selection = policy;
    }

    /// The selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// Change the selection mode.
    ///
    /// Switching to single selection keeps only the earliest selected option.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) -> bool {
        self.begin_event();
        self.selection.set_mode(mode)
    }

    /// Whether more than one option may be selected.
    pub fn is_multiple(&self) -> bool {
        self.selection.mode().is_multiple()
    }

    /// Allow or disallow multiple selection.
    pub fn set_multiple(&mut self, multiple: bool) -> bool {
        self.set_selection_mode(SelectionMode::from_multiple(multiple))
    }

    /// Whether the search box is shown.
    pub fn with_search(&self) -> bool {
        self.controller.with_search()
    }

    /// Show or hide the search box. Without it, every option is visible.
    pub fn set_with_search(&mut self, with_search: bool) {
        self.begin_event();
        self.controller.set_with_search(with_search);
        self.refresh_search_cache();
    }

    /// Change the search deferral policy.
    pub fn set_search_scheduling(&mut self, scheduling: SearchScheduling) {
        self.begin_event();
        if self.controller.set_search_scheduling(scheduling) {
            self.refresh_search_cache();
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// The selected options in selection order.
    pub fn selection(&self) -> &SelectionSet {
        self.selection.selection()
    }

    /// Whether the option with `value` is selected.
    pub fn is_selected(&self, value: &str) -> bool {
        self.selection.is_selected(value)
    }

    /// Select the first option in the list whose value is `value`.
    ///
    /// Returns `true` if the selection changed. Unknown values are ignored.
    pub fn select_value(&mut self, value: &str) -> bool {
        self.begin_event();
        match find_by_value(&self.options, value) {
            Some(option) => self.selection.select(option),
            None => {
                select_trace!(value, "ignoring selection of unknown value");
                false
            }
        }
    }

    /// Select `option`, resolved against the option list by value.
    pub fn select(&mut self, option: &SelectOption) -> bool {
        self.select_value(&option.value)
    }

    /// Deselect the option with `value`.
    pub fn remove_value(&mut self, value: &str) -> bool {
        self.begin_event();
        self.selection.remove_value(value)
    }

    /// Deselect `option`.
    pub fn remove(&mut self, option: &SelectOption) -> bool {
        self.remove_value(&option.value)
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) -> bool {
        self.begin_event();
        self.selection.clear()
    }

    // =========================================================================
    // Dropdown
    // =========================================================================

    /// The dropdown state.
    pub fn popup_state(&self) -> PopupState {
        self.controller.state()
    }

    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    /// Open or close the dropdown.
    pub fn toggle(&mut self) -> bool {
        self.begin_event();
        self.controller.toggle()
    }

    /// Open the dropdown.
    pub fn open(&mut self) -> bool {
        self.begin_event();
        self.controller.open()
    }

    /// Close the dropdown.
    pub fn close(&mut self) -> bool {
        self.begin_event();
        self.controller.close()
    }

    /// Handle a pointer interaction outside the widget.
    pub fn outside_pointer(&mut self) -> bool {
        self.begin_event();
        self.controller.dismiss_outside()
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Text in the search box.
    pub fn search_text(&self) -> &str {
        self.controller.search_text()
    }

    /// Search text currently used for filtering and highlighting.
    pub fn effective_search_text(&self) -> &str {
        self.controller.effective_search()
    }

    /// Whether filtering lags behind the search box.
    pub fn is_search_stale(&self) -> bool {
        self.controller.is_search_stale()
    }

    /// Replace the search box text.
    ///
    /// Returns `true` if the visible options were recomputed in this call.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        self.begin_event();
        let changed = self.controller.set_search_text(text);
        if changed {
            self.refresh_search_cache();
        }
        changed
    }

    /// Advance one scheduling turn.
    ///
    /// Hosts call this once per frame or idle callback. Returns `true` if the
    /// visible options were recomputed.
    pub fn tick(&mut self) -> bool {
        let changed = self.controller.tick();
        if changed {
            self.refresh_search_cache();
        }
        changed
    }

    /// Bring filtering up to date with the search box immediately.
    pub fn flush_search(&mut self) -> bool {
        self.begin_event();
        let changed = self.controller.flush_search();
        if changed {
            self.refresh_search_cache();
        }
        changed
    }

    /// The options visible for the effective search text, in list order.
    pub fn visible_options(&self) -> FilteredOptions<'_> {
        match &self.cache.positions {
            None => FilteredOptions::All(&self.options),
            Some(positions) => FilteredOptions::from_positions(&self.options, positions),
        }
    }

    /// Split `label` by the effective search text.
    pub fn highlight_label(&self, label: &str) -> HighlightedText {
        match &self.cache.matcher {
            Some(matcher) => matcher.highlight(label),
            None => HighlightedText::plain(label),
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Apply a user gesture.
    ///
    /// Returns `true` if the selection, the open state, or the visible options
    /// changed. Option rows are only clickable while the dropdown is open, so
    /// an option click that arrives while closed is ignored. Use
    /// [`select_value`](Self::select_value) to select programmatically.
    pub fn dispatch(&mut self, gesture: Gesture) -> bool {
        select_trace!(region = %self.region(), ?gesture, "dispatch");
        let dismissed = self.begin_event();

        let changed = match gesture {
            Gesture::TriggerClicked => self.controller.toggle(),
            Gesture::ChipClicked { value } => self.selection.remove_value(&value),
            Gesture::OptionClicked { value } if !self.is_open() => {
                select_trace!(value = %value, "ignoring option click while closed");
                false
            }
            Gesture::OptionClicked { value } => self.select_value(&value),
            Gesture::SearchInput { text } => self.set_search_text(text),
            Gesture::OutsidePointer => self.controller.dismiss_outside(),
        };
        dismissed || changed
    }

    fn begin_event(&mut self) -> bool {
        self.controller.process_dismissals()
    }

    fn refresh_search_cache(&mut self) {
        let search = self.controller.effective_search();
        if self.cache.is_current(search, self.options_revision) {
            return;
        }

        tracing::trace!(target: targets::WIDGET, search, "recomputing visible options");
        self.cache = SearchCache {
            search: search.to_string(),
            options_revision: self.options_revision,
            matcher: Matcher::lenient(search),
            positions: filter_positions(&self.options, search),
        };
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Snapshot the widget for rendering.
    pub fn view(&self) -> ComboBoxView {
        let opened = self.is_open();

        let content = if self.selection().is_empty() {
            TriggerContent::Placeholder(self.placeholder.clone())
        } else {
            TriggerContent::Chips(
                self.selection()
                    .iter()
                    .map(|option| ChipView {
                        value: option.value.clone(),
                        label: option.label.clone(),
                    })
                    .collect(),
            )
        };

        let search_box = self.with_search().then(|| SearchBoxView {
            value: self.search_text().to_string(),
            placeholder: SEARCH_PLACEHOLDER.to_string(),
        });

        let visible = self.visible_options();
        let body = if visible.is_empty() {
            DropdownBody::Empty {
                message: EMPTY_MESSAGE.to_string(),
            }
        } else {
            DropdownBody::Options(
                visible
                    .iter()
                    .map(|option| OptionRow {
                        value: option.value.clone(),
                        label: self.highlight_label(&option.label),
                        selected: self.is_selected(&option.value),
                    })
                    .collect(),
            )
        };

        ComboBoxView {
            id: self.id.clone(),
            class_name: self.class_name.clone(),
            caption: self.caption().map(str::to_string),
            trigger: TriggerView { content, opened },
            dropdown: DropdownView {
                visible: opened,
                search_box,
                body,
            },
        }
    }
}

impl std::fmt::Debug for ComboBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComboBox")
            .field("id", &self.id)
            .field("options", &self.options.len())
            .field("selection", &self.selection)
            .field("controller", &self.controller)
            .finish()
    }
}

static_assertions::assert_impl_all!(ComboBox: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn fruit() -> Vec<SelectOption> {
        vec![
            SelectOption::new("1", "Apple"),
            SelectOption::new("2", "Banana"),
            SelectOption::new("3", "Grape"),
        ]
    }

    fn combo(multiple: bool) -> ComboBox {
        ComboBox::new(
            ComboBoxConfig::new(fruit())
                .with_multiple(multiple)
                .with_search(true)
                .with_search_scheduling(SearchScheduling::Immediate),
        )
    }

    #[test]
    fn test_initial_state() {
        let combo = combo(false);
        assert!(!combo.is_open());
        assert!(combo.selection().is_empty());
        assert_eq!(combo.search_text(), "");
        assert_eq!(combo.visible_options().len(), 3);
        assert_eq!(combo.caption(), Some("Select Options"));
    }

    #[test]
    fn test_single_select_replaces() {
        let mut combo = combo(false);
        assert!(combo.select_value("1"));
        assert!(combo.select_value("2"));
        assert_eq!(combo.selection().values(), vec!["2"]);
        assert!(!combo.select_value("2"));
    }

    #[test]
    fn test_unknown_value_is_ignored() {
        let mut combo = combo(true);
        assert!(!combo.select_value("42"));
        assert!(combo.selection().is_empty());
    }

    #[test]
    fn test_select_resolves_first_duplicate() {
        let mut combo = ComboBox::new(ComboBoxConfig::new([
            SelectOption::new("x", "First"),
            SelectOption::new("x", "Second"),
        ]));
        combo.select(&SelectOption::new("x", "Second"));
        assert_eq!(combo.selection().first().map(|o| o.label()), Some("First"));
    }

    #[test]
    fn test_chip_click_keeps_dropdown_state() {
        let mut combo = combo(true);
        combo.select_value("1");
        assert!(!combo.is_open());

        assert!(combo.dispatch(Gesture::ChipClicked { value: "1".into() }));
        assert!(combo.selection().is_empty());
        assert!(!combo.is_open());
    }

    #[test]
    fn test_option_click_ignored_while_closed() {
        let mut combo = combo(true);
        let notified = Arc::new(Mutex::new(0));
        let notified_clone = notified.clone();
        combo.on_change(move |_| *notified_clone.lock() += 1);

        assert!(!combo.dispatch(Gesture::OptionClicked { value: "1".into() }));
        assert!(combo.selection().is_empty());
        assert_eq!(*notified.lock(), 0);

        combo.dispatch(Gesture::TriggerClicked);
        assert!(combo.dispatch(Gesture::OptionClicked { value: "1".into() }));
        assert_eq!(combo.selection().values(), vec!["1"]);
        assert_eq!(*notified.lock(), 1);
    }

    #[test]
    fn test_selecting_does_not_close() {
        let mut combo = combo(true);
        combo.dispatch(Gesture::TriggerClicked);
        combo.dispatch(Gesture::OptionClicked { value: "3".into() });
        assert!(combo.is_open());
    }

    #[test]
    fn test_search_disabled_shows_everything() {
        let mut combo = ComboBox::new(
            ComboBoxConfig::new(fruit()).with_search_scheduling(SearchScheduling::Immediate),
        );
        combo.set_search_text("kiwi");
        assert_eq!(combo.visible_options().len(), 3);
        assert!(combo.view().dropdown.search_box.is_none());

        combo.set_with_search(true);
        assert!(combo.visible_options().is_empty());
    }

    #[test]
    fn test_prune_policy() {
        let mut combo = ComboBox::new(
            ComboBoxConfig::new(fruit())
                .with_multiple(true)
                .with_stale_selection(StaleSelectionPolicy::Prune),
        );
        combo.select_value("1");
        combo.select_value("2");

        let log = Arc::new(Mutex::new(0));
        let log_clone = log.clone();
        combo.on_change(move |_| *log_clone.lock() += 1);

        combo.set_options(vec![SelectOption::new("2", "Banana")]);
        assert_eq!(combo.selection().values(), vec!["2"]);
        assert_eq!(*log.lock(), 1);
    }

    #[test]
    fn test_retain_policy() {
        let mut combo = combo(true);
        combo.select_value("1");
        combo.set_options(vec![SelectOption::new("9", "Kiwi")]);
        assert_eq!(combo.selection().values(), vec!["1"]);
        assert_eq!(combo.visible_options().len(), 1);
    }

    #[test]
    fn test_options_change_invalidates_cache() {
        let mut combo = combo(false);
        combo.set_search_text("an");
        assert_eq!(combo.visible_options().len(), 1);

        combo.set_options(vec![
            SelectOption::new("4", "Mango"),
            SelectOption::new("5", "Tangerine"),
        ]);
        assert_eq!(combo.visible_options().len(), 2);
    }

    #[test]
    fn test_view_marks_selected_rows() {
        let mut combo = combo(true);
        combo.select_value("2");
        let view = combo.view();
        let selected: Vec<&str> = view
            .dropdown
            .body
            .rows()
            .iter()
            .filter(|row| row.selected)
            .map(|row| row.value.as_str())
            .collect();
        assert_eq!(selected, vec!["2"]);
        assert_eq!(
            view.trigger.content,
            TriggerContent::Chips(vec![ChipView {
                value: "2".into(),
                label: "Banana".into()
            }])
        );
    }

    #[test]
    fn test_empty_caption_is_hidden() {
        let combo = ComboBox::new(ComboBoxConfig::new(fruit()).with_label(Some(String::new())));
        assert_eq!(combo.caption(), None);
        assert_eq!(combo.view().caption, None);
    }
}
