//! Synchronous interactions: selection, row actions, expansion and drag
//! reordering.
//!
//! Owner callbacks run after the state lock is released, so they may call
//! back into the grid.

use std::collections::HashSet;

use crate::observer::GridEvent;
use crate::record::GridRecord;
use crate::reorder::move_item;
use crate::selection::{PageKeys, Selection, SelectionChange, SelectionDelta, SelectionMode};

use super::{EventResult, GridController};

impl<T: GridRecord> GridController<T> {
    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Checkbox/radio click on the row keyed `key`.
    pub fn toggle_selection(&self, key: &str) -> EventResult {
        self.change_selection(|selection, mode, page| selection.toggle(key, mode, page))
    }

    /// Shift+click: select from the anchor to `key` in display order.
    ///
    /// Single mode treats this as a plain toggle.
    pub fn range_select(&self, key: &str, extend: bool) -> EventResult {
        self.change_selection(|selection, mode, page| {
            selection.select_span(key, mode, page, extend)
        })
    }

    /// Header checkbox: select every selectable row of the loaded page.
    pub fn select_all_on_page(&self) -> EventResult {
        if self.selection_mode() != Some(SelectionMode::Multiple) {
            return EventResult::Ignored;
        }
        self.change_selection(|selection, _, page| selection.select_page(page))
    }

    pub fn clear_selection(&self) -> EventResult {
        self.change_selection(|selection, _, _| selection.clear())
    }

    /// Commit a selection decided by the owner.
    ///
    /// This is how an `on_change` override feeds its decision back, so it is
    /// applied even while the grid is disabled.
    pub fn set_selected_keys<I, S>(&self, keys: I) -> EventResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.shared.selection.is_none() {
            return EventResult::Ignored;
        }
        let selection = Selection::from_keys(keys);
        let selected = selection.len();
        self.write(|g| g.selection = selection);
        self.mark_dirty();
        self.emit(GridEvent::SelectionChanged { selected });
        EventResult::Consumed
    }

    fn change_selection(
        &self,
        op: impl FnOnce(&mut Selection, SelectionMode, &PageKeys) -> SelectionDelta,
    ) -> EventResult {
        let Some(config) = self.shared.selection.as_ref() else {
            return EventResult::Ignored;
        };

        let proposal = self.interact("selection", |g| {
            let keys = self.keys_of(&g.rows);
            let locked: HashSet<String> = g
                .rows
                .iter()
                .zip(&keys)
                .filter(|(row, _)| config.is_row_disabled(row))
                .map(|(_, key)| key.clone())
                .collect();
            let page = PageKeys::new(keys.clone(), locked);

            let mut next = g.selection.clone();
            let delta = op(&mut next, config.mode, &page);
            if delta.is_empty() {
                return None;
            }

            let records = g
                .rows
                .iter()
                .zip(&keys)
                .filter(|(_, key)| next.is_selected(key))
                .map(|(row, _)| row.clone())
                .collect();
            let change = SelectionChange {
                keys: next.selected(),
                records,
                added: delta.added,
                removed: delta.removed,
            };
            if config.handler().is_none() {
                g.selection = next;
            }
            Some(change)
        });

        let Some(Some(change)) = proposal else {
            return EventResult::Ignored;
        };

        match config.handler() {
            Some(handler) => handler(&change),
            None => {
                self.mark_dirty();
                self.emit(GridEvent::SelectionChanged {
                    selected: change.keys.len(),
                });
            }
        }
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Row actions
    // -------------------------------------------------------------------------

    /// Click on action `action_index` of the row keyed `row_key`.
    ///
    /// The handler gets the row's record. Clicks on a disabled grid, a
    /// disabled or loading action, or a row that is not loaded are ignored.
    pub fn click_action(&self, row_key: &str, action_index: usize) -> EventResult {
        let Some(action) = self.shared.actions.get(action_index) else {
            log::debug!("Grid {}: no action at {}", self.id, action_index);
            return EventResult::Ignored;
        };
        let Some(record) = self.interact("action", |g| {
            self.find_row(&g.rows, row_key).map(|(_, row)| row.clone())
        }) else {
            return EventResult::Ignored;
        };
        if action.disabled || action.loading {
            return EventResult::Ignored;
        }
        let Some(record) = record else {
            log::debug!("Grid {}: no loaded row {}", self.id, row_key);
            return EventResult::Ignored;
        };
        action.invoke(&record);
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------

    /// Expand or collapse the row keyed `key`.
    pub fn toggle_expanded(&self, key: &str) -> EventResult {
        let Some(config) = self.shared.expandable.as_ref() else {
            return EventResult::Ignored;
        };
        let toggled = self.interact("expand", |g| {
            let expandable = self
                .find_row(&g.rows, key)
                .is_some_and(|(_, row)| config.is_expandable(row));
            if !expandable {
                return false;
            }
            if !g.expanded.remove(key) {
                g.expanded.insert(key.to_string());
            }
            true
        });
        if toggled != Some(true) {
            return EventResult::Ignored;
        }
        self.mark_dirty();
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Reordering
    // -------------------------------------------------------------------------

    /// Pick up the row at `index`.
    pub fn begin_drag(&self, index: usize) -> EventResult {
        if !self.shared.reorderable {
            return EventResult::Ignored;
        }
        let started = self.interact("drag", |g| {
            let Some(row) = g.rows.get(index) else {
                return false;
            };
            let key = self.shared.row_key.resolve(row, index);
            let len = g.rows.len();
            g.reorder.begin(index, key, len)
        });
        if started != Some(true) {
            return EventResult::Ignored;
        }
        self.mark_dirty();
        EventResult::Consumed
    }

    /// The dragged row is hovering over `index`.
    pub fn drag_over(&self, index: usize) -> EventResult {
        let moved = self.write(|g| {
            let len = g.rows.len();
            g.reorder.hover(index, len)
        });
        if !moved {
            return EventResult::Ignored;
        }
        self.mark_dirty();
        EventResult::Consumed
    }

    /// Drop the dragged row on `target`, or outside the page on `None`.
    ///
    /// A completed move reorders the loaded page locally, without a fetch,
    /// and hands the new order to the reorder callback.
    pub fn drop_row(&self, target: Option<usize>) -> EventResult {
        let result = self.write(|g| {
            let was_dragging = g.reorder.is_dragging();
            let len = g.rows.len();
            let moved = g
                .reorder
                .finish(target, len)
                .filter(|m| move_item(&mut g.rows, m.from, m.to))
                .map(|m| (m, g.rows.clone()));
            (was_dragging, moved)
        });

        let (was_dragging, moved) = result;
        if was_dragging {
            self.mark_dirty();
        }
        let Some((row_move, rows)) = moved else {
            return EventResult::Ignored;
        };

        self.emit(GridEvent::Reordered {
            from: row_move.from,
            to: row_move.to,
        });
        if let Some(on_reorder) = &self.shared.on_reorder {
            on_reorder(rows);
        }
        EventResult::Consumed
    }

    /// Abandon the drag in progress.
    pub fn cancel_drag(&self) -> EventResult {
        if !self.write(|g| g.reorder.cancel()) {
            return EventResult::Ignored;
        }
        self.mark_dirty();
        EventResult::Consumed
    }

    /// Drag the row at `from` and drop it on `to` in one step.
    pub fn reorder(&self, from: usize, to: usize) -> EventResult {
        if !self.begin_drag(from).is_consumed() {
            return EventResult::Ignored;
        }
        self.drop_row(Some(to))
    }
}
