//! Render-ready snapshot of a combo box.
//!
//! [`ComboBox::view`](crate::ComboBox::view) walks widget state into a
//! [`ComboBoxView`] tree that a host renders with whatever toolkit it uses.
//! User interaction flows back as [`Gesture`]s passed to
//! [`ComboBox::dispatch`](crate::ComboBox::dispatch).
//!
//! [`ComboBoxView::to_html`] is a reference renderer. It escapes every text
//! node and attribute, so option labels are never interpreted as markup.

use std::fmt::Write as _;

use crate::highlight::{HighlightedText, escape_html};

/// Placeholder shown in the search box.
pub const SEARCH_PLACEHOLDER: &str = "Search by label";

/// Message shown when no option matches the search.
pub const EMPTY_MESSAGE: &str = "No item found";

// ============================================================================
// View Tree
// ============================================================================

/// The whole widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboBoxView {
    /// Root identifier.
    pub id: Option<String>,
    /// Root style hook.
    pub class_name: Option<String>,
    /// Caption above the trigger, if any.
    pub caption: Option<String>,
    /// The always-visible trigger area.
    pub trigger: TriggerView,
    /// The dropdown panel.
    pub dropdown: DropdownView,
}

/// The trigger area that opens and closes the dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerView {
    /// What the trigger shows.
    pub content: TriggerContent,
    /// Whether the dropdown is open.
    pub opened: bool,
}

/// Contents of the trigger area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerContent {
    /// One chip per selected option, in selection order.
    Chips(Vec<ChipView>),
    /// Nothing selected; shows the placeholder, if configured.
    Placeholder(Option<String>),
}

/// A selected option shown in the trigger. Clicking it deselects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipView {
    /// Value of the selected option.
    pub value: String,
    /// Label of the selected option.
    pub label: String,
}

/// The dropdown panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownView {
    /// Whether the panel is shown.
    pub visible: bool,
    /// The search box, when enabled.
    pub search_box: Option<SearchBoxView>,
    /// The option list or the empty state.
    pub body: DropdownBody,
}

/// The search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBoxView {
    /// Text in the input, updated on every keystroke.
    pub value: String,
    /// Hint shown while the input is empty.
    pub placeholder: String,
}

/// Body of the dropdown panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownBody {
    /// Visible options in list order.
    Options(Vec<OptionRow>),
    /// No option matched.
    Empty {
        /// Text shown in place of the list.
        message: String,
    },
}

impl DropdownBody {
    /// The option rows, or an empty slice for the empty state.
    pub fn rows(&self) -> &[OptionRow] {
        match self {
            Self::Options(rows) => rows,
            Self::Empty { .. } => &[],
        }
    }
}

/// One visible option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRow {
    /// Value of the option.
    pub value: String,
    /// The label split by the current search.
    pub label: HighlightedText,
    /// Whether the option is already selected.
    pub selected: bool,
}

// ============================================================================
// Gestures
// ============================================================================

/// A user interaction reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// The trigger area was clicked.
    TriggerClicked,
    /// A chip in the trigger was clicked.
    ChipClicked {
        /// Value of the chip's option.
        value: String,
    },
    /// An option row was clicked.
    OptionClicked {
        /// Value of the clicked option.
        value: String,
    },
    /// The search box text changed.
    SearchInput {
        /// Full text of the search box.
        text: String,
    },
    /// A pointer interaction happened outside the widget.
    OutsidePointer,
}

// ============================================================================
// HTML
// ============================================================================

impl ComboBoxView {
    /// Render as HTML.
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<div class=\"select");
        if let Some(class_name) = &self.class_name {
            html.push(' ');
            html.push_str(&escape_html(class_name));
        }
        html.push('"');
        if let Some(id) = &self.id {
            write!(html, " id=\"{}\"", escape_html(id)).expect("write to String");
        }
        html.push('>');

        if let Some(caption) = &self.caption {
            write!(
                html,
                "<div class=\"select-caption\">{}</div>",
                escape_html(caption)
            )
            .expect("write to String");
        }

        self.trigger.write_html(&mut html);
        self.dropdown.write_html(&mut html);

        html.push_str("</div>");
        html
    }
}

impl TriggerView {
    fn write_html(&self, html: &mut String) {
        write!(
            html,
            "<div class=\"select-trigger{}\" role=\"button\" aria-expanded=\"{}\">",
            if self.opened { " opened" } else { "" },
            self.opened
        )
        .expect("write to String");
        match &self.content {
            TriggerContent::Chips(chips) => {
                for chip in chips {
                    write!(
                        html,
                        "<span class=\"select-chip\" data-value=\"{}\">{}</span>",
                        escape_html(&chip.value),
                        escape_html(&chip.label)
                    )
                    .expect("write to String");
                }
            }
            TriggerContent::Placeholder(placeholder) => {
                write!(
                    html,
                    "<span class=\"select-placeholder\">{}</span>",
                    placeholder.as_deref().map(escape_html).unwrap_or_default()
                )
                .expect("write to String");
            }
        }
        html.push_str("</div>");
    }
}

impl DropdownView {
    fn write_html(&self, html: &mut String) {
        write!(
            html,
            "<div class=\"select-dropdown{}\">",
            if self.visible { " visible" } else { "" }
        )
        .expect("write to String");
        if let Some(search_box) = &self.search_box {
            write!(
                html,
                "<input type=\"text\" class=\"select-search\" value=\"{}\" placeholder=\"{}\">",
                escape_html(&search_box.value),
                escape_html(&search_box.placeholder)
            )
            .expect("write to String");
        }
        match &self.body {
            DropdownBody::Options(rows) => {
                html.push_str("<ul class=\"select-options\">");
                for row in rows {
                    write!(
                        html,
                        "<li class=\"select-option{}\" data-value=\"{}\">{}</li>",
                        if row.selected { " selected" } else { "" },
                        escape_html(&row.value),
                        row.label.to_html()
                    )
                    .expect("write to String");
                }
                html.push_str("</ul>");
            }
            DropdownBody::Empty { message } => {
                write!(
                    html,
                    "<div class=\"select-empty\">{}</div>",
                    escape_html(message)
                )
                .expect("write to String");
            }
        }
        html.push_str("</div>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::highlight;

    fn view(body: DropdownBody) -> ComboBoxView {
        ComboBoxView {
            id: Some("select-1".into()),
            class_name: None,
            caption: Some("Fruit".into()),
            trigger: TriggerView {
                content: TriggerContent::Placeholder(Some("Pick".into())),
                opened: true,
            },
            dropdown: DropdownView {
                visible: true,
                search_box: Some(SearchBoxView {
                    value: "an".into(),
                    placeholder: SEARCH_PLACEHOLDER.into(),
                }),
                body,
            },
        }
    }

    #[test]
    fn test_html_structure() {
        let html = view(DropdownBody::Options(vec![OptionRow {
            value: "2".into(),
            label: highlight("Banana", "an"),
            selected: true,
        }]))
        .to_html();

        assert!(html.starts_with("<div class=\"select\" id=\"select-1\">"));
        assert!(html.contains("<div class=\"select-caption\">Fruit</div>"));
        assert!(html.contains("aria-expanded=\"true\""));
        assert!(html.contains("placeholder=\"Search by label\""));
        assert!(html.contains(
            "<li class=\"select-option selected\" data-value=\"2\">B<mark>an</mark><mark>an</mark>a</li>"
        ));
    }

    #[test]
    fn test_html_empty_state() {
        let html = view(DropdownBody::Empty {
            message: EMPTY_MESSAGE.into(),
        })
        .to_html();
        assert!(html.contains("<div class=\"select-empty\">No item found</div>"));
        assert!(!html.contains("<ul"));
    }

    #[test]
    fn test_html_escapes_everything() {
        let mut view = view(DropdownBody::Empty {
            message: EMPTY_MESSAGE.into(),
        });
        view.id = Some("\"><script>".into());
        view.trigger.content = TriggerContent::Chips(vec![ChipView {
            value: "<v>".into(),
            label: "<script>alert(1)</script>".into(),
        }]);
        if let Some(search_box) = view.dropdown.search_box.as_mut() {
            search_box.value = "\" onfocus=\"x".into();
        }

        let html = view.to_html();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("\" onfocus"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_html_closed_minimal() {
        let mut view = view(DropdownBody::Options(Vec::new()));
        view.id = None;
        view.caption = None;
        view.trigger = TriggerView {
            content: TriggerContent::Placeholder(None),
            opened: false,
        };
        view.dropdown.visible = false;
        view.dropdown.search_box = None;

        assert_eq!(
            view.to_html(),
            "<div class=\"select\">\
             <div class=\"select-trigger\" role=\"button\" aria-expanded=\"false\">\
             <span class=\"select-placeholder\"></span></div>\
             <div class=\"select-dropdown\"><ul class=\"select-options\"></ul></div>\
             </div>"
        );
    }

    #[test]
    fn test_body_rows() {
        let empty = DropdownBody::Empty {
            message: EMPTY_MESSAGE.into(),
        };
        assert!(empty.rows().is_empty());
    }
}
