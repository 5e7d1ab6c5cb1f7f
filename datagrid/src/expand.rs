//! Expandable rows, passed through to the renderer.

use std::fmt;
use std::sync::Arc;

use crate::column::CellRenderer;
use crate::selection::RowPredicate;

/// Expandable-row configuration.
pub struct ExpandableConfig<T> {
    render: CellRenderer<T>,
    row_expandable: Option<RowPredicate<T>>,
    pub default_expanded: Vec<String>,
}

impl<T> ExpandableConfig<T> {
    /// Rows expand to the text produced by `render`.
    pub fn new(render: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self {
            render: Arc::new(render),
            row_expandable: None,
            default_expanded: Vec::new(),
        }
    }

    /// Only rows matching `f` can expand.
    pub fn row_expandable(mut self, f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.row_expandable = Some(Arc::new(f));
        self
    }

    /// Keys expanded when the grid is built.
    pub fn default_expanded<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_expanded = keys.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn is_expandable(&self, record: &T) -> bool {
        self.row_expandable.as_ref().is_none_or(|f| f(record))
    }

    pub(crate) fn content(&self, record: &T) -> String {
        (self.render)(record)
    }
}

impl<T> Clone for ExpandableConfig<T> {
    fn clone(&self) -> Self {
        Self {
            render: Arc::clone(&self.render),
            row_expandable: self.row_expandable.clone(),
            default_expanded: self.default_expanded.clone(),
        }
    }
}

impl<T> fmt::Debug for ExpandableConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandableConfig")
            .field("row_expandable", &self.row_expandable.is_some())
            .field("default_expanded", &self.default_expanded)
            .finish_non_exhaustive()
    }
}
