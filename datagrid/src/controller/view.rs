//! Render snapshots.

use crate::action::ActionControl;
use crate::column::{Column, derive_columns};
use crate::pagination::Pagination;
use crate::record::GridRecord;
use crate::selection::SelectionMode;
use crate::sort::SortState;

use super::GridController;

/// One row as a renderer should draw it.
#[derive(Debug, Clone)]
pub struct RowView<T> {
    /// Position in the loaded page.
    pub index: usize,
    pub key: String,
    pub record: T,
    pub selected: bool,
    /// Whether the selection control accepts clicks.
    pub selectable: bool,
    /// Whether the drag handle accepts drags.
    pub draggable: bool,
    /// The row is currently lifted.
    pub dragging: bool,
    pub expandable: bool,
    pub expanded: bool,
    pub expanded_content: Option<String>,
    pub actions: Vec<ActionControl>,
}

impl<T: GridRecord> RowView<T> {
    /// Cell text for each of `columns`. Action columns yield `None`.
    pub fn cells(&self, columns: &[Column<T>]) -> Vec<Option<String>> {
        columns.iter().map(|c| c.cell(&self.record)).collect()
    }
}

/// Everything needed to draw a grid at one point in time.
#[derive(Debug, Clone)]
pub struct GridView<T> {
    pub columns: Vec<Column<T>>,
    pub rows: Vec<RowView<T>>,
    pub pagination: Pagination,
    pub page_count: u32,
    /// 1-based (first, last) item numbers on the page.
    pub item_range: Option<(u64, u64)>,
    pub page_size_options: Vec<u32>,
    pub sort: SortState,
    pub loading: bool,
    pub disabled: bool,
    pub reorderable: bool,
    /// `None` when the grid has no selection column.
    pub selection_mode: Option<SelectionMode>,
}

impl<T> GridView<T> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, key: &str) -> Option<&RowView<T>> {
        self.rows.iter().find(|r| r.key == key)
    }

    /// The row being dragged, if any.
    pub fn dragging_row(&self) -> Option<&RowView<T>> {
        self.rows.iter().find(|r| r.dragging)
    }
}

impl<T: GridRecord> GridController<T> {
    /// Snapshot the grid for rendering.
    pub fn view(&self) -> GridView<T> {
        let shared = &self.shared;
        self.read(|g| {
            let dragging_key = g.reorder.dragging_key();
            let rows = g
                .rows
                .iter()
                .enumerate()
                .map(|(index, record)| {
                    let key = shared.row_key.resolve(record, index);
                    let expandable = shared
                        .expandable
                        .as_ref()
                        .is_some_and(|e| e.is_expandable(record));
                    let expanded = expandable && g.expanded.contains(&key);
                    let expanded_content = shared
                        .expandable
                        .as_ref()
                        .filter(|_| expanded)
                        .map(|e| e.content(record));

                    RowView {
                        index,
                        selected: g.selection.is_selected(&key),
                        selectable: !g.disabled
                            && shared
                                .selection
                                .as_ref()
                                .is_some_and(|s| !s.is_row_disabled(record)),
                        draggable: shared.reorderable && !g.disabled,
                        dragging: dragging_key == Some(key.as_str()),
                        expandable,
                        expanded,
                        expanded_content,
                        actions: shared
                            .actions
                            .iter()
                            .enumerate()
                            .map(|(i, action)| action.control(i, g.disabled))
                            .collect(),
                        record: record.clone(),
                        key,
                    }
                })
                .collect();

            GridView {
                columns: derive_columns(
                    &shared.columns,
                    &g.sort,
                    shared.actions.len(),
                    &shared.config,
                ),
                rows,
                pagination: g.pagination,
                page_count: g.pagination.page_count(),
                item_range: g.pagination.item_range(),
                page_size_options: shared.config.page_size_options.clone(),
                sort: g.sort.clone(),
                loading: g.in_flight > 0,
                disabled: g.disabled,
                reorderable: shared.reorderable,
                selection_mode: shared.selection.as_ref().map(|s| s.mode),
            }
        })
    }
}
