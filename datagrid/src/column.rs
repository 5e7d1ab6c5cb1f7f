//! Column descriptors and the columns a grid derives from them.

use std::fmt;
use std::sync::Arc;

use crate::config::GridConfig;
use crate::record::GridRecord;
use crate::sort::{SortOrder, SortState};

/// Key of the synthesized actions column.
pub const ACTIONS_COLUMN_KEY: &str = "__actions";

/// Renders the text of a cell from its row record.
pub type CellRenderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Edge a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixed {
    Left,
    Right,
}

/// A column as the owner describes it.
///
/// A descriptor with a `data_index` is bound to a record field and is
/// sortable on that field.
///
/// # Example
///
/// ```
/// use datagrid::ColumnDef;
/// use serde_json::Value;
///
/// let columns: Vec<ColumnDef<Value>> = vec![
///     ColumnDef::field("Name", "name").width(30),
///     ColumnDef::new("Summary", "summary").render(|r: &Value| r.to_string()),
/// ];
/// ```
pub struct ColumnDef<T> {
    pub title: String,
    pub key: String,
    pub data_index: Option<String>,
    pub fixed: Option<Fixed>,
    pub width: Option<u16>,
    pub render: Option<CellRenderer<T>>,
}

impl<T> ColumnDef<T> {
    /// A column that is not bound to a field.
    pub fn new(title: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            key: key.into(),
            data_index: None,
            fixed: None,
            width: None,
            render: None,
        }
    }

    /// A column bound to `field`, keyed by the field name.
    pub fn field(title: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            key: field.clone(),
            data_index: Some(field),
            ..Self::new(title, String::new())
        }
    }

    pub fn data_index(mut self, field: impl Into<String>) -> Self {
        self.data_index = Some(field.into());
        self
    }

    pub fn fixed(mut self, fixed: Fixed) -> Self {
        self.fixed = Some(fixed);
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn render(mut self, render: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            key: self.key.clone(),
            data_index: self.data_index.clone(),
            fixed: self.fixed,
            width: self.width,
            render: self.render.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("title", &self.title)
            .field("key", &self.key)
            .field("data_index", &self.data_index)
            .field("fixed", &self.fixed)
            .field("width", &self.width)
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// What a derived column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Record data.
    Data,
    /// The synthesized per-row action controls.
    Actions,
}

/// A column after the grid has applied sorting and action synthesis.
pub struct Column<T> {
    pub title: String,
    pub key: String,
    pub data_index: Option<String>,
    pub fixed: Option<Fixed>,
    pub width: Option<u16>,
    pub kind: ColumnKind,
    pub sortable: bool,
    /// Direction this column is currently sorted in.
    pub sort_order: Option<SortOrder>,
    render: Option<CellRenderer<T>>,
}

impl<T: GridRecord> Column<T> {
    /// Cell text for `record`. Actions columns have no text.
    pub fn cell(&self, record: &T) -> Option<String> {
        if self.kind == ColumnKind::Actions {
            return None;
        }
        match (&self.render, &self.data_index) {
            (Some(render), _) => Some(render(record)),
            (None, Some(field)) => record.field(field),
            (None, None) => None,
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            key: self.key.clone(),
            data_index: self.data_index.clone(),
            fixed: self.fixed,
            width: self.width,
            kind: self.kind,
            sortable: self.sortable,
            sort_order: self.sort_order,
            render: self.render.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("title", &self.title)
            .field("key", &self.key)
            .field("data_index", &self.data_index)
            .field("fixed", &self.fixed)
            .field("width", &self.width)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("sort_order", &self.sort_order)
            .finish_non_exhaustive()
    }
}

/// Derives the final column list.
///
/// Field-bound columns become sortable and carry the current sort direction.
/// When there is at least one action, an actions column pinned to the right
/// is appended last.
pub(crate) fn derive_columns<T>(
    defs: &[ColumnDef<T>],
    sort: &SortState,
    action_count: usize,
    config: &GridConfig,
) -> Vec<Column<T>> {
    let mut columns: Vec<Column<T>> = defs
        .iter()
        .map(|def| Column {
            title: def.title.clone(),
            key: def.key.clone(),
            data_index: def.data_index.clone(),
            fixed: def.fixed,
            width: def.width,
            kind: ColumnKind::Data,
            sortable: def.data_index.is_some(),
            sort_order: def.data_index.as_deref().and_then(|f| sort.order_for(f)),
            render: def.render.clone(),
        })
        .collect();

    if action_count > 0 {
        columns.push(Column {
            title: config.actions_title.clone(),
            key: ACTIONS_COLUMN_KEY.to_string(),
            data_index: None,
            fixed: Some(Fixed::Right),
            width: config.actions_width,
            kind: ColumnKind::Actions,
            sortable: false,
            sort_order: None,
            render: None,
        });
    }

    columns
}

/// The field to sort by when the header of `column_key` is clicked.
pub(crate) fn sort_field_for<'a, T>(defs: &'a [ColumnDef<T>], column_key: &str) -> Option<&'a str> {
    defs.iter()
        .find(|def| def.key == column_key)
        .and_then(|def| def.data_index.as_deref())
}
