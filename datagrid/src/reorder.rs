//! Drag reordering within the loaded page.
//!
//! [`ReorderAdapter`] tracks one drag at a time over a single drop zone (the
//! current page body) and reports the index transition when the drag ends.
//! It never touches rows itself; the grid applies the move with
//! [`move_item`] and tells the owner.

/// A completed drag from one page index to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMove {
    pub from: usize,
    pub to: usize,
}

/// A drag in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    /// Index the row was picked up from.
    pub from: usize,
    /// Key of the lifted row.
    pub key: String,
    /// Index the row is currently hovering over.
    pub over: Option<usize>,
}

/// Drag state machine for one grid.
#[derive(Debug, Default)]
pub struct ReorderAdapter {
    session: Option<DragSession>,
}

impl ReorderAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Key of the lifted row, if a drag is in progress.
    pub fn dragging_key(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.key.as_str())
    }

    /// Lift the row at `from`. Refused when `from` is not a row of the page.
    /// A new drag replaces one that was never dropped.
    pub fn begin(&mut self, from: usize, key: String, len: usize) -> bool {
        if from >= len {
            return false;
        }
        self.session = Some(DragSession {
            from,
            key,
            over: Some(from),
        });
        true
    }

    /// Track the row hovering over `index`. Returns true if the hover target changed.
    pub fn hover(&mut self, index: usize, len: usize) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if index >= len || session.over == Some(index) {
            return false;
        }
        session.over = Some(index);
        true
    }

    /// End the drag on `target`. Always ends the session.
    ///
    /// Returns the move to apply, or `None` when the drop is outside the page,
    /// out of range, or back onto the starting index.
    pub fn finish(&mut self, target: Option<usize>, len: usize) -> Option<RowMove> {
        let session = self.session.take()?;
        let to = target?;
        if to >= len || session.from >= len || to == session.from {
            return None;
        }
        Some(RowMove {
            from: session.from,
            to,
        })
    }

    /// Abandon the drag. Returns true if there was one.
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }
}

/// Moves the item at `from` to `to`, shifting the items in between.
///
/// Returns false (and leaves `items` alone) when `from == to` or either index
/// is out of range.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_up() {
        let mut items = vec!['A', 'B', 'C', 'D'];
        assert!(move_item(&mut items, 2, 0));
        assert_eq!(items, vec!['C', 'A', 'B', 'D']);
    }

    #[test]
    fn test_move_down() {
        let mut items = vec!['A', 'B', 'C', 'D'];
        assert!(move_item(&mut items, 0, 2));
        assert_eq!(items, vec!['B', 'C', 'A', 'D']);
    }

    #[test]
    fn test_move_noop() {
        let mut items = vec!['A', 'B'];
        assert!(!move_item(&mut items, 1, 1));
        assert!(!move_item(&mut items, 0, 5));
        assert_eq!(items, vec!['A', 'B']);
    }

    #[test]
    fn test_session_lifecycle() {
        let mut adapter = ReorderAdapter::new();
        assert!(adapter.begin(1, "b".to_string(), 4));
        assert_eq!(adapter.dragging_key(), Some("b"));
        assert!(adapter.hover(3, 4));
        assert!(!adapter.hover(3, 4));

        assert_eq!(adapter.finish(Some(3), 4), Some(RowMove { from: 1, to: 3 }));
        assert!(!adapter.is_dragging());
    }

    #[test]
    fn test_drop_outside_ends_drag_without_move() {
        let mut adapter = ReorderAdapter::new();
        adapter.begin(0, "a".to_string(), 2);
        assert_eq!(adapter.finish(None, 2), None);
        assert!(!adapter.is_dragging());
    }

    #[test]
    fn test_begin_out_of_range() {
        let mut adapter = ReorderAdapter::new();
        assert!(!adapter.begin(2, "c".to_string(), 2));
        assert!(adapter.session().is_none());
    }
}
