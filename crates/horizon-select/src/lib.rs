//! Horizon Select - a searchable single/multi-value selection widget engine.
//!
//! The crate is headless: it owns selection, filtering, highlighting and
//! open/close state, and hands the host a [`ComboBoxView`] to render. The
//! host feeds user interaction back as [`Gesture`]s and drives deferred
//! search work by calling [`ComboBox::tick`] once per scheduling turn.
//!
//! The core systems ([`Signal`], [`Property`], [`DeferredValue`], logging)
//! are re-exported from `horizon-select-core`.
//!
//! # Example
//!
//! ```
//! use horizon_select::{ComboBox, ComboBoxConfig, DropdownBody, Gesture, SelectOption};
//!
//! let options = vec![
//!     SelectOption::new("1", "Apple"),
//!     SelectOption::new("2", "Banana"),
//!     SelectOption::new("3", "Grape"),
//! ];
//! let mut combo = ComboBox::new(ComboBoxConfig::new(options).with_search(true));
//!
//! combo.dispatch(Gesture::TriggerClicked);
//! combo.dispatch(Gesture::SearchInput { text: "an".into() });
//!
//! // Filtering catches up on the next quiet turn.
//! while combo.is_search_stale() {
//!     combo.tick();
//! }
//!
//! let view = combo.view();
//! let DropdownBody::Options(rows) = &view.dropdown.body else {
//!     panic!("expected matches");
//! };
//! assert_eq!(rows[0].label.to_html(), "B<mark>an</mark><mark>an</mark>a");
//! ```
//!
//! # Logging
//!
//! Every subsystem logs through `tracing` under the targets in
//! [`logging::targets`]. Install a subscriber such as `tracing-subscriber` to
//! see them.

pub use horizon_select_core::*;

pub mod combo_box;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod highlight;
pub mod option;
pub mod port;
pub mod selection;
pub mod view;

pub use combo_box::ComboBox;
pub use config::{ComboBoxConfig, DEFAULT_CAPTION, SearchScheduling, StaleSelectionPolicy};
pub use controller::{InteractionController, PopupState};
pub use error::{Error, Result};
pub use filter::{FilteredOptions, filter_options};
pub use highlight::{HighlightedText, Matcher, TextRun, highlight, normalize_query};
pub use option::SelectOption;
pub use port::{
    DismissHandle, FocusPort, OutsidePointerPort, PointerRegistry, RegionId,
    SharedPointerRegistry, SubscriptionId,
};
pub use selection::{SelectionMode, SelectionSet, SelectionState};
pub use view::{
    ChipView, ComboBoxView, DropdownBody, DropdownView, Gesture, OptionRow, SearchBoxView,
    TriggerContent, TriggerView,
};
