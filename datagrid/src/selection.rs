//! Row selection.
//!
//! Selection is a pure set of row keys. It survives page changes and is
//! never reconciled against the rows currently loaded; interpreting keys
//! that are no longer visible is up to the owner.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

/// Selection mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// One row at a time (radio style).
    Single,
    /// Any number of rows (checkbox style).
    #[default]
    Multiple,
}

/// The loaded page as selection sees it: row keys in display order, and
/// the keys whose checkbox is locked by `row_disabled`.
#[derive(Debug, Clone, Default)]
pub struct PageKeys {
    ordered: Vec<String>,
    locked: HashSet<String>,
}

impl PageKeys {
    pub fn new(ordered: Vec<String>, locked: HashSet<String>) -> Self {
        Self { ordered, locked }
    }

    pub fn is_locked(&self, key: &str) -> bool {
        self.locked.contains(key)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.ordered.iter().position(|k| k == key)
    }
}

/// Keys an operation added to and removed from a [`Selection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SelectionDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Selected row keys, kept sorted, plus the row a Shift+click extends from.
///
/// Every operation takes the loaded [`PageKeys`], so locked rows can never
/// be selected through the grid. Keys from other pages are left alone
/// unless an operation explicitly drops them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: BTreeSet<String>,
    anchor: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection containing `keys`, with no anchor.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            anchor: None,
        }
    }

    /// Selected keys in sorted order.
    pub fn selected(&self) -> Vec<String> {
        self.keys.iter().cloned().collect()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Checkbox or radio click on `key`.
    ///
    /// A selected key is deselected. Otherwise the key is added; in single
    /// mode it replaces whatever was selected.
    pub fn toggle(&mut self, key: &str, mode: SelectionMode, page: &PageKeys) -> SelectionDelta {
        let mut delta = SelectionDelta::default();
        if page.is_locked(key) {
            return delta;
        }
        if self.keys.remove(key) {
            delta.removed.push(key.to_string());
        } else {
            if mode == SelectionMode::Single {
                delta.removed = std::mem::take(&mut self.keys).into_iter().collect();
            }
            self.keys.insert(key.to_string());
            delta.added.push(key.to_string());
        }
        self.anchor = Some(key.to_string());
        delta
    }

    /// Shift+click on `key`: select the unlocked rows between the anchor
    /// and `key`. Without `extend`, selected keys outside that span (on any
    /// page) are dropped.
    ///
    /// Falls back to [`toggle`](Self::toggle) in single mode, or when the
    /// anchor is not on the loaded page.
    pub fn select_span(
        &mut self,
        key: &str,
        mode: SelectionMode,
        page: &PageKeys,
        extend: bool,
    ) -> SelectionDelta {
        if page.is_locked(key) {
            return SelectionDelta::default();
        }
        let anchor = self.anchor.as_deref().and_then(|a| page.position(a));
        let (lo, hi) = match (mode, anchor, page.position(key)) {
            (SelectionMode::Multiple, Some(a), Some(b)) => (a.min(b), a.max(b)),
            _ => return self.toggle(key, mode, page),
        };

        let span: Vec<&String> = page.ordered[lo..=hi]
            .iter()
            .filter(|k| !page.is_locked(k))
            .collect();

        let mut delta = SelectionDelta::default();
        if !extend {
            delta.removed = self
                .keys
                .iter()
                .filter(|k| !span.contains(k))
                .cloned()
                .collect();
            for k in &delta.removed {
                self.keys.remove(k);
            }
        }
        for k in span {
            if self.keys.insert(k.clone()) {
                delta.added.push(k.clone());
            }
        }
        delta
    }

    /// Header checkbox: add every unlocked row of the page.
    pub fn select_page(&mut self, page: &PageKeys) -> SelectionDelta {
        let added = page
            .ordered
            .iter()
            .filter(|k| !page.is_locked(k))
            .filter(|k| self.keys.insert((*k).clone()))
            .cloned()
            .collect();
        SelectionDelta {
            added,
            removed: Vec::new(),
        }
    }

    /// Drop every key, on every page.
    pub fn clear(&mut self) -> SelectionDelta {
        self.anchor = None;
        SelectionDelta {
            added: Vec::new(),
            removed: std::mem::take(&mut self.keys).into_iter().collect(),
        }
    }
}

/// What an owner's selection override receives.
#[derive(Debug, Clone)]
pub struct SelectionChange<T> {
    /// The full proposed key set, sorted.
    pub keys: Vec<String>,
    /// Loaded records whose keys are in the proposed set.
    pub records: Vec<T>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Owner handler replacing the grid's own selection bookkeeping.
pub type SelectionHandler<T> = Arc<dyn Fn(&SelectionChange<T>) + Send + Sync>;

/// Predicate deciding whether a row's checkbox is disabled.
pub type RowPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Row-selection configuration.
///
/// Without an `on_change` override the grid keeps the selected key set
/// itself. With one, every proposed change is handed to the override and the
/// grid's set only changes through
/// [`GridController::set_selected_keys`](crate::GridController::set_selected_keys).
pub struct SelectionConfig<T> {
    pub mode: SelectionMode,
    pub initial: Vec<String>,
    on_change: Option<SelectionHandler<T>>,
    row_disabled: Option<RowPredicate<T>>,
}

impl<T> SelectionConfig<T> {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            initial: Vec::new(),
            on_change: None,
            row_disabled: None,
        }
    }

    pub fn single() -> Self {
        Self::new(SelectionMode::Single)
    }

    pub fn multiple() -> Self {
        Self::new(SelectionMode::Multiple)
    }

    /// Keys selected when the grid is built.
    pub fn initial_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the grid's own change handler.
    pub fn on_change(mut self, f: impl Fn(&SelectionChange<T>) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(f));
        self
    }

    /// Disable the checkbox of rows matching `f`.
    pub fn row_disabled(mut self, f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.row_disabled = Some(Arc::new(f));
        self
    }

    pub(crate) fn handler(&self) -> Option<&SelectionHandler<T>> {
        self.on_change.as_ref()
    }

    pub(crate) fn is_row_disabled(&self, record: &T) -> bool {
        self.row_disabled.as_ref().is_some_and(|f| f(record))
    }
}

impl<T> Clone for SelectionConfig<T> {
    fn clone(&self) -> Self {
        Self {
            mode: self.mode,
            initial: self.initial.clone(),
            on_change: self.on_change.clone(),
            row_disabled: self.row_disabled.clone(),
        }
    }
}

impl<T> fmt::Debug for SelectionConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionConfig")
            .field("mode", &self.mode)
            .field("initial", &self.initial)
            .field("on_change", &self.on_change.is_some())
            .field("row_disabled", &self.row_disabled.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn page(ids: &[&str], locked: &[&str]) -> PageKeys {
        PageKeys::new(keys(ids), locked.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_toggle_multiple() {
        let page = page(&["a", "b"], &[]);
        let mut selection = Selection::new();
        assert_eq!(selection.toggle("b", SelectionMode::Multiple, &page).added, keys(&["b"]));
        selection.toggle("a", SelectionMode::Multiple, &page);
        assert_eq!(selection.selected(), keys(&["a", "b"]));

        let delta = selection.toggle("b", SelectionMode::Multiple, &page);
        assert_eq!(delta.removed, keys(&["b"]));
        assert_eq!(selection.selected(), keys(&["a"]));
    }

    #[test]
    fn test_single_mode_replaces_keys_from_other_pages() {
        let page = page(&["a", "b"], &[]);
        let mut selection = Selection::from_keys(["z"]);
        let delta = selection.toggle("a", SelectionMode::Single, &page);
        assert_eq!(delta.added, keys(&["a"]));
        assert_eq!(delta.removed, keys(&["z"]));
        assert_eq!(selection.selected(), keys(&["a"]));
    }

    #[test]
    fn test_locked_rows_cannot_change() {
        let page = page(&["a", "b"], &["b"]);
        let mut selection = Selection::new();
        assert!(selection.toggle("b", SelectionMode::Multiple, &page).is_empty());
        assert!(selection.select_span("b", SelectionMode::Multiple, &page, true).is_empty());
        assert_eq!(selection.select_page(&page).added, keys(&["a"]));
    }

    #[test]
    fn test_span_skips_locked_rows() {
        let page = page(&["a", "b", "c", "d", "e"], &["c"]);
        let mut selection = Selection::new();
        selection.toggle("b", SelectionMode::Multiple, &page);

        let delta = selection.select_span("e", SelectionMode::Multiple, &page, true);
        assert_eq!(delta.added, keys(&["d", "e"]));
        assert_eq!(selection.selected(), keys(&["b", "d", "e"]));
        assert_eq!(selection.anchor(), Some("b"));
    }

    #[test]
    fn test_span_without_extend_drops_outside() {
        let page = page(&["a", "b", "c"], &[]);
        let mut selection = Selection::from_keys(["x"]);
        selection.toggle("c", SelectionMode::Multiple, &page);

        let delta = selection.select_span("b", SelectionMode::Multiple, &page, false);
        assert_eq!(delta.removed, keys(&["x"]));
        assert_eq!(selection.selected(), keys(&["b", "c"]));
    }

    #[test]
    fn test_span_without_anchor_on_page_toggles() {
        let page = page(&["a", "b"], &[]);
        let mut selection = Selection::new();
        let delta = selection.select_span("b", SelectionMode::Multiple, &page, false);
        assert_eq!(delta.added, keys(&["b"]));
        assert_eq!(selection.anchor(), Some("b"));
    }

    #[test]
    fn test_clear_reports_every_key() {
        let page = page(&["a"], &[]);
        let mut selection = Selection::from_keys(["x", "y"]);
        selection.select_page(&page);
        assert_eq!(selection.clear().removed, keys(&["a", "x", "y"]));
        assert!(selection.is_empty());
        assert!(selection.clear().is_empty());
    }
}
