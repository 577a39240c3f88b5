//! Widget configuration.
//!
//! [`ComboBoxConfig`] collects everything a host passes when constructing a
//! [`ComboBox`](crate::ComboBox). It can be built in code with the `with_*`
//! methods or loaded from JSON or TOML.
//!
//! # Example
//!
//! ```
//! use horizon_select::{ComboBoxConfig, SearchScheduling};
//!
//! let config = ComboBoxConfig::from_toml_str(r#"
//!     multiple = true
//!     with_search = true
//!     id = "select-1"
//!
//!     [search_scheduling]
//!     mode = "immediate"
//!
//!     [[options]]
//!     value = "1"
//!     label = "Option 1"
//! "#).unwrap();
//!
//! assert!(config.multiple);
//! assert_eq!(config.search_scheduling, SearchScheduling::Immediate);
//! assert_eq!(config.label.as_deref(), Some("Select Options"));
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::option::SelectOption;
use crate::selection::SelectionMode;

/// Caption shown above the widget when none is configured.
pub const DEFAULT_CAPTION: &str = "Select Options";

// ============================================================================
// Policies
// ============================================================================

/// How quickly search text reaches filtering and highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchScheduling {
    /// Every keystroke is filtered in the same call.
    Immediate,
    /// Filtering may lag typing by up to `max_lag_turns` scheduling turns.
    Deferred {
        /// Upper bound on how many turns the effective search may lag.
        max_lag_turns: u32,
    },
}

impl SearchScheduling {
    /// The turn budget this policy allows. `0` means immediate.
    pub fn max_lag_turns(self) -> u32 {
        match self {
            Self::Immediate => 0,
            Self::Deferred { max_lag_turns } => max_lag_turns,
        }
    }
}

impl Default for SearchScheduling {
    fn default() -> Self {
        Self::Deferred { max_lag_turns: 3 }
    }
}

/// What happens to selected options that disappear from the option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleSelectionPolicy {
    /// Keep them selected.
    #[default]
    Retain,
    /// Drop them and notify.
    Prune,
}

// ============================================================================
// Config
// ============================================================================

fn default_caption() -> Option<String> {
    Some(DEFAULT_CAPTION.to_string())
}

/// Construction parameters for a [`ComboBox`](crate::ComboBox).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboBoxConfig {
    /// Full candidate list.
    pub options: Vec<SelectOption>,

    /// Allow more than one selected option.
    #[serde(default)]
    pub multiple: bool,

    /// Show the search box. Filtering is disabled without it.
    #[serde(default, alias = "withSearch")]
    pub with_search: bool,

    /// Trigger text when nothing is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Caption above the widget. `None` or an empty string hides it.
    #[serde(default = "default_caption")]
    pub label: Option<String>,

    /// Identifier passed through to the rendered root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Style hook passed through to the rendered root.
    #[serde(default, alias = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Deferral policy for search text.
    #[serde(default)]
    pub search_scheduling: SearchScheduling,

    /// Policy for selections whose option is removed.
    #[serde(default)]
    pub stale_selection: StaleSelectionPolicy,
}

impl ComboBoxConfig {
    /// Create a configuration with defaults for everything but the options.
    pub fn new(options: impl IntoIterator<Item = SelectOption>) -> Self {
        Self {
            options: options.into_iter().collect(),
            multiple: false,
            with_search: false,
            placeholder: None,
            label: default_caption(),
            id: None,
            class_name: None,
            search_scheduling: SearchScheduling::default(),
            stale_selection: StaleSelectionPolicy::default(),
        }
    }

    /// Set multi-select using builder pattern.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Enable or disable the search box using builder pattern.
    pub fn with_search(mut self, with_search: bool) -> Self {
        self.with_search = with_search;
        self
    }

    /// Set the placeholder using builder pattern.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the caption using builder pattern. `None` hides it.
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Set the root identifier using builder pattern.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the style hook using builder pattern.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set the search scheduling policy using builder pattern.
    pub fn with_search_scheduling(mut self, scheduling: SearchScheduling) -> Self {
        self.search_scheduling = scheduling;
        self
    }

    /// Set the stale selection policy using builder pattern.
    pub fn with_stale_selection(mut self, policy: StaleSelectionPolicy) -> Self {
        self.stale_selection = policy;
        self
    }

    /// The selection mode implied by `multiple`.
    pub fn selection_mode(&self) -> SelectionMode {
        SelectionMode::from_multiple(self.multiple)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Parse a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a TOML configuration.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Load a configuration file, choosing the format from its extension
    /// (`.json` or `.toml`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("toml") => Self::from_toml_str,
            _ => return Err(Error::unsupported_format(path)),
        };

        let content = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        parse(&content)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
