//! Option filtering by search text.
//!
//! Filtering is a pure function of the full option list and the effective
//! search text, so it can be recomputed on every keystroke. Matching is a
//! case-insensitive substring test against the option label; the order of the
//! input list is preserved and no ranking is applied.

use std::iter::Copied;
use std::slice;

use horizon_select_core::PerfSpan;
use horizon_select_core::logging::targets;

use crate::option::SelectOption;

/// The options visible for a given search text.
///
/// Borrowed from the full option list: [`FilteredOptions::All`] is the
/// identity case (no search), [`FilteredOptions::Subset`] holds the matches in
/// their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilteredOptions<'a> {
    /// The search text was empty; every option is visible.
    All(&'a [SelectOption]),
    /// The options whose label contains the search text.
    Subset(Vec<&'a SelectOption>),
}

impl<'a> FilteredOptions<'a> {
    /// Build a subset from positions in `all`.
    ///
    /// Positions past the end of `all` are skipped.
    pub fn from_positions(all: &'a [SelectOption], positions: &[usize]) -> Self {
        Self::Subset(positions.iter().filter_map(|&index| all.get(index)).collect())
    }

    /// Number of visible options.
    pub fn len(&self) -> usize {
        match self {
            Self::All(all) => all.len(),
            Self::Subset(subset) => subset.len(),
        }
    }

    /// Whether no option is visible.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is the unfiltered full list.
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::All(_))
    }

    /// Get the visible option at `index`.
    pub fn get(&self, index: usize) -> Option<&'a SelectOption> {
        match self {
            Self::All(all) => all.get(index),
            Self::Subset(subset) => subset.get(index).copied(),
        }
    }

    /// Iterate over the visible options in list order.
    pub fn iter(&self) -> Iter<'a, '_> {
        match self {
            Self::All(all) => Iter::All(all.iter()),
            Self::Subset(subset) => Iter::Subset(subset.iter().copied()),
        }
    }

    /// Clone the visible options into an owned list.
    pub fn to_vec(&self) -> Vec<SelectOption> {
        self.iter().cloned().collect()
    }
}

impl<'a, 'b> IntoIterator for &'b FilteredOptions<'a> {
    type Item = &'a SelectOption;
    type IntoIter = Iter<'a, 'b>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`FilteredOptions`].
#[derive(Debug, Clone)]
pub enum Iter<'a, 'b> {
    /// Iterating the full list.
    All(slice::Iter<'a, SelectOption>),
    /// Iterating the matched subset.
    Subset(Copied<slice::Iter<'b, &'a SelectOption>>),
}

impl<'a> Iterator for Iter<'a, '_> {
    type Item = &'a SelectOption;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::All(iter) => iter.next(),
            Self::Subset(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::All(iter) => iter.size_hint(),
            Self::Subset(iter) => iter.size_hint(),
        }
    }
}

impl ExactSizeIterator for Iter<'_, '_> {}

/// Check whether `label` contains `search`, ignoring case.
pub fn label_matches(label: &str, search: &str) -> bool {
    label.to_lowercase().contains(&search.to_lowercase())
}

/// Derive the visible options from the full list and a search text.
///
/// An empty or whitespace-only search returns the full list unchanged.
/// Otherwise the result is the order-preserving subsequence of options whose
/// label contains `search` case-insensitively. Non-blank search text is used
/// as typed, including any leading or trailing spaces.
///
/// Matching compares full Unicode lowercase forms, while
/// [`highlight`](crate::highlight::highlight) uses simple case folding. For
/// the few characters whose lowercase form expands (`İ` lowercases to `i`
/// plus a combining dot) an option can be visible with no highlighted run.
///
/// # Example
///
/// ```
/// use horizon_select::{filter_options, SelectOption};
///
/// let options = vec![
///     SelectOption::new("1", "Apple"),
///     SelectOption::new("2", "Banana"),
///     SelectOption::new("3", "Grape"),
/// ];
///
/// let visible = filter_options(&options, "AN");
/// assert_eq!(visible.to_vec(), vec![SelectOption::new("2", "Banana")]);
/// ```
pub fn filter_options<'a>(all: &'a [SelectOption], search: &str) -> FilteredOptions<'a> {
    match filter_positions(all, search) {
        None => FilteredOptions::All(all),
        Some(positions) => FilteredOptions::from_positions(all, &positions),
    }
}

/// Positions in `all` of the options visible for `search`.
///
/// Returns `None` for the identity case. Follows the same rules as
/// [`filter_options`]; useful for caching a result without borrowing the
/// option list.
pub fn filter_positions(all: &[SelectOption], search: &str) -> Option<Vec<usize>> {
    if search.trim().is_empty() {
        return None;
    }

    let _span = PerfSpan::new("filter_options");
    let needle = search.to_lowercase();
    let positions: Vec<usize> = all
        .iter()
        .enumerate()
        .filter(|(_, option)| option.label.to_lowercase().contains(&needle))
        .map(|(index, _)| index)
        .collect();

    tracing::trace!(
        target: targets::FILTER,
        total = all.len(),
        matched = positions.len(),
        "filtered options"
    );
    Some(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit() -> Vec<SelectOption> {
        vec![
            SelectOption::new("1", "Apple"),
            SelectOption::new("2", "Banana"),
            SelectOption::new("3", "Grape"),
        ]
    }

    #[test]
    fn test_empty_search_is_identity() {
        let options = fruit();
        let visible = filter_options(&options, "");
        assert!(visible.is_identity());
        assert_eq!(visible.len(), 3);
        assert_eq!(visible, FilteredOptions::All(&options));
    }

    #[test]
    fn test_whitespace_search_is_identity() {
        let options = fruit();
        assert!(filter_options(&options, "   \t").is_identity());
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let options = fruit();
        let visible = filter_options(&options, "an");
        assert_eq!(visible.to_vec(), vec![SelectOption::new("2", "Banana")]);

        let visible = filter_options(&options, "AP");
        let labels: Vec<&str> = visible.iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["Apple", "Grape"]);
    }

    #[test]
    fn test_search_is_not_tokenized() {
        let options = vec![
            SelectOption::new("1", "Long Option 3"),
            SelectOption::new("2", "Option Long"),
        ];

        let visible = filter_options(&options, "long option");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.get(0).map(|o| o.value()), Some("1"));
    }

    #[test]
    fn test_non_blank_search_keeps_surrounding_spaces() {
        let options = vec![
            SelectOption::new("1", "Option 1"),
            SelectOption::new("2", "Options"),
        ];

        let visible = filter_options(&options, "option ");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.get(0).map(|o| o.value()), Some("1"));
    }

    #[test]
    fn test_no_match_is_empty() {
        let options = fruit();
        let visible = filter_options(&options, "kiwi");
        assert!(visible.is_empty());
        assert!(!visible.is_identity());
    }

    #[test]
    fn test_substring_law() {
        let options = vec![
            SelectOption::new("a", "Alpha"),
            SelectOption::new("b", "alphabet"),
            SelectOption::new("c", "Beta"),
            SelectOption::new("d", "GAMMA ALPHA"),
            SelectOption::new("e", ""),
        ];

        for search in ["al", "ALPHA", "a", "ta", "zz", "ph"] {
            let visible = filter_options(&options, search);
            let kept: Vec<&str> = visible.iter().map(|o| o.value()).collect();
            for option in &options {
                assert_eq!(
                    kept.contains(&option.value()),
                    label_matches(option.label(), search),
                    "search {search:?} option {option:?}"
                );
            }
        }
    }

    #[test]
    fn test_positions_agree_with_options() {
        let options = fruit();
        assert_eq!(filter_positions(&options, " "), None);
        assert_eq!(filter_positions(&options, "ap"), Some(vec![0, 2]));

        let positions = filter_positions(&options, "ap").unwrap();
        assert_eq!(
            FilteredOptions::from_positions(&options, &positions),
            filter_options(&options, "ap")
        );
        assert_eq!(FilteredOptions::from_positions(&options, &[7]).len(), 0);
    }

    #[test]
    fn test_order_is_preserved() {
        let options: Vec<SelectOption> = (0..50)
            .map(|i| SelectOption::new(i.to_string(), format!("Option {i}")))
            .collect();

        let visible = filter_options(&options, "option 1");
        let values: Vec<usize> = visible
            .iter()
            .map(|o| o.value().parse().unwrap())
            .collect();
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(values, sorted);
        assert_eq!(values.len(), 11);
    }

    #[test]
    fn test_filter_and_highlight_case_folding_differ() {
        let options = vec![SelectOption::new("1", "İstanbul")];
        assert_eq!(filter_options(&options, "i").len(), 1);

        let label = crate::highlight::highlight("İstanbul", "i");
        assert_eq!(label.highlight_count(), 0);
        assert_eq!(label.plain_text(), "İstanbul");
    }
}
