//! The grid controller.
//!
//! [`GridController`] owns pagination, sort, selection and the loaded page,
//! drives the fetch protocol against a [`DataSource`], and derives what a
//! renderer needs through [`GridController::view`]. It is cheap to clone;
//! clones share state, so it can be handed to event handlers and spawned
//! tasks freely.

mod fetch;
mod interact;
mod view;

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::action::RowAction;
use crate::column::{Column, ColumnDef, derive_columns};
use crate::config::GridConfig;
use crate::error::ConfigError;
use crate::expand::ExpandableConfig;
use crate::notify::{LogNotifier, Notifier};
use crate::observer::{GridEvent, GridObserver, LogObserver};
use crate::pagination::Pagination;
use crate::record::{GridRecord, RowKey};
use crate::reorder::{DragSession, ReorderAdapter};
use crate::selection::{Selection, SelectionConfig, SelectionMode};
use crate::sort::SortState;
use crate::source::{DataSource, FetchRequest};

pub use fetch::FetchOutcome;
pub use view::{GridView, RowView};

/// Called with the reordered page after every completed drag.
pub type ReorderCallback<T> = Arc<dyn Fn(Vec<T>) + Send + Sync>;

/// Result of a synchronous interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The interaction changed something or reached an owner callback.
    Consumed,
    /// The interaction was refused or had no effect.
    Ignored,
}

impl EventResult {
    pub fn is_consumed(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

/// Unique identifier for a grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(usize);

impl GridId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__grid_{}", self.0)
    }
}

/// Mutable grid state, guarded by the controller's lock.
pub(super) struct GridInner<T> {
    pub pagination: Pagination,
    pub sort: SortState,
    /// The loaded page.
    pub rows: Vec<T>,
    pub selection: Selection,
    pub expanded: HashSet<String>,
    pub reorder: ReorderAdapter,
    pub disabled: bool,
    pub mounted: bool,
    /// Fetches issued but not yet resolved.
    pub in_flight: usize,
    /// Sequence number of the last fetch issued.
    pub last_issued: u64,
    /// Sequence number of the last response applied to the page.
    pub last_applied: u64,
}

impl<T> GridInner<T> {
    /// The request matching the current pagination and sort.
    pub fn query(&self) -> FetchRequest {
        FetchRequest::new(self.pagination.current_page, self.pagination.page_size)
            .with_sort(&self.sort)
    }

    /// Registers a new fetch for the current state.
    pub fn issue(&mut self) -> (u64, FetchRequest) {
        self.last_issued += 1;
        self.in_flight += 1;
        (self.last_issued, self.query())
    }
}

/// Everything fixed at build time.
pub(super) struct GridShared<T> {
    pub source: Arc<dyn DataSource<T>>,
    pub columns: Vec<ColumnDef<T>>,
    pub actions: Vec<RowAction<T>>,
    pub row_key: RowKey<T>,
    pub reorderable: bool,
    pub on_reorder: Option<ReorderCallback<T>>,
    pub selection: Option<SelectionConfig<T>>,
    pub expandable: Option<ExpandableConfig<T>>,
    pub config: GridConfig,
    pub notifier: Arc<dyn Notifier>,
    pub observer: Arc<dyn GridObserver>,
}

/// A paginated, sortable, selectable, reorderable remote-data grid.
///
/// # Example
///
/// ```ignore
/// let grid = GridController::builder(source, vec![
///     ColumnDef::field("Name", "name"),
///     ColumnDef::field("Email", "email"),
/// ])
/// .action(RowAction::new("Delete", on_delete).danger())
/// .selection(SelectionConfig::multiple())
/// .build()?;
///
/// grid.mount().await;
/// grid.change_page(2, 10).await;
/// grid.toggle_sort("name").await;
///
/// // After deleting a record elsewhere:
/// let handle = grid.handle();
/// handle.reload().await;
/// ```
pub struct GridController<T> {
    id: GridId,
    shared: Arc<GridShared<T>>,
    inner: Arc<RwLock<GridInner<T>>>,
    /// Dirty flag for re-render.
    dirty: Arc<AtomicBool>,
}

impl<T> Clone for GridController<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            shared: Arc::clone(&self.shared),
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl<T> fmt::Debug for GridController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridController")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<T: GridRecord> GridController<T> {
    /// Start building a grid over `source` with the given column descriptors.
    pub fn builder(
        source: impl DataSource<T> + 'static,
        columns: Vec<ColumnDef<T>>,
    ) -> GridBuilder<T> {
        GridBuilder::new(Arc::new(source), columns)
    }

    pub fn id(&self) -> GridId {
        self.id
    }

    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    /// A reload-only handle for the grid's owner.
    pub fn handle(&self) -> GridHandle<T> {
        GridHandle {
            controller: self.clone(),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.shared.config
    }

    // -------------------------------------------------------------------------
    // State access
    // -------------------------------------------------------------------------

    pub(super) fn read<R>(&self, f: impl FnOnce(&GridInner<T>) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub(super) fn write<R>(&self, f: impl FnOnce(&mut GridInner<T>) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub(super) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub(super) fn emit(&self, event: GridEvent) {
        self.shared.observer.on_event(&self.id_string(), &event);
    }

    /// Runs a user interaction unless the grid is disabled.
    pub(super) fn interact<R>(
        &self,
        interaction: &'static str,
        f: impl FnOnce(&mut GridInner<T>) -> R,
    ) -> Option<R> {
        let result = self.write(|g| if g.disabled { None } else { Some(f(g)) });
        if result.is_none() {
            self.emit(GridEvent::InteractionBlocked { interaction });
        }
        result
    }

    /// Index and record of the loaded row keyed `key`.
    pub(super) fn find_row<'a>(&self, rows: &'a [T], key: &str) -> Option<(usize, &'a T)> {
        rows.iter()
            .enumerate()
            .find(|(i, row)| self.shared.row_key.resolve(row, *i) == key)
    }

    pub fn pagination(&self) -> Pagination {
        self.read(|g| g.pagination)
    }

    pub fn sort(&self) -> SortState {
        self.read(|g| g.sort.clone())
    }

    /// The loaded page, in display order.
    pub fn rows(&self) -> Vec<T> {
        self.read(|g| g.rows.clone())
    }

    pub fn row_count(&self) -> usize {
        self.read(|g| g.rows.len())
    }

    /// Row keys of the loaded page, in display order.
    pub fn row_keys(&self) -> Vec<String> {
        self.read(|g| self.keys_of(&g.rows))
    }

    pub(super) fn keys_of(&self, rows: &[T]) -> Vec<String> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| self.shared.row_key.resolve(row, i))
            .collect()
    }

    /// True while at least one fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.read(|g| g.in_flight > 0)
    }

    pub fn is_mounted(&self) -> bool {
        self.read(|g| g.mounted)
    }

    pub fn is_disabled(&self) -> bool {
        self.read(|g| g.disabled)
    }

    /// Enable or disable all user interaction.
    ///
    /// Disabling abandons a drag in progress.
    pub fn set_disabled(&self, disabled: bool) {
        self.write(|g| {
            g.disabled = disabled;
            if disabled {
                g.reorder.cancel();
            }
        });
        self.mark_dirty();
    }

    pub fn is_reorderable(&self) -> bool {
        self.shared.reorderable
    }

    pub fn selection_mode(&self) -> Option<SelectionMode> {
        self.shared.selection.as_ref().map(|s| s.mode)
    }

    pub fn selected_keys(&self) -> Vec<String> {
        self.read(|g| g.selection.selected())
    }

    /// Loaded rows whose keys are selected.
    pub fn selected_rows(&self) -> Vec<T> {
        self.read(|g| {
            g.rows
                .iter()
                .enumerate()
                .filter(|(i, row)| g.selection.is_selected(&self.shared.row_key.resolve(row, *i)))
                .map(|(_, row)| row.clone())
                .collect()
        })
    }

    pub fn expanded_keys(&self) -> Vec<String> {
        self.read(|g| {
            let mut keys: Vec<_> = g.expanded.iter().cloned().collect();
            keys.sort();
            keys
        })
    }

    pub fn drag_session(&self) -> Option<DragSession> {
        self.read(|g| g.reorder.session().cloned())
    }

    /// Final column list: sortable flags, current sort direction and the
    /// actions column when there are actions.
    pub fn columns(&self) -> Vec<Column<T>> {
        let sort = self.sort();
        derive_columns(
            &self.shared.columns,
            &sort,
            self.shared.actions.len(),
            &self.shared.config,
        )
    }

    /// Check if the grid has changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag after rendering.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// GridHandle
// =============================================================================

/// The owner's imperative handle to a grid.
///
/// Obtained from [`GridController::handle`] and cheap to clone. `reload`
/// always fetches with the grid's state at the time it runs, no matter when
/// the handle was created.
pub struct GridHandle<T> {
    controller: GridController<T>,
}

impl<T: GridRecord> GridHandle<T> {
    /// Re-fetch the current page with the current page size and sort.
    pub async fn reload(&self) -> FetchOutcome {
        self.controller.reload().await
    }

    /// Read-only view of the grid.
    pub fn snapshot(&self) -> GridView<T> {
        self.controller.view()
    }

    pub fn pagination(&self) -> Pagination {
        self.controller.pagination()
    }
}

impl<T> Clone for GridHandle<T> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
        }
    }
}

impl<T> fmt::Debug for GridHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridHandle")
            .field("grid", &self.controller.id)
            .finish()
    }
}

// =============================================================================
// GridBuilder
// =============================================================================

/// Builder for a [`GridController`].
pub struct GridBuilder<T> {
    source: Arc<dyn DataSource<T>>,
    columns: Vec<ColumnDef<T>>,
    actions: Vec<RowAction<T>>,
    row_key: Option<RowKey<T>>,
    page_size: Option<u32>,
    disabled: Option<bool>,
    reorderable: Option<bool>,
    on_reorder: Option<ReorderCallback<T>>,
    selection: Option<SelectionConfig<T>>,
    expandable: Option<ExpandableConfig<T>>,
    config: GridConfig,
    notifier: Option<Arc<dyn Notifier>>,
    observer: Option<Arc<dyn GridObserver>>,
}

impl<T: GridRecord> GridBuilder<T> {
    /// Builder over an already shared data source.
    pub fn new(source: Arc<dyn DataSource<T>>, columns: Vec<ColumnDef<T>>) -> Self {
        Self {
            source,
            columns,
            actions: Vec::new(),
            row_key: None,
            page_size: None,
            disabled: None,
            reorderable: None,
            on_reorder: None,
            selection: None,
            expandable: None,
            config: GridConfig::default(),
            notifier: None,
            observer: None,
        }
    }

    /// Base configuration. Explicit builder calls take precedence over it.
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Initial page size.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Append a row action.
    pub fn action(mut self, action: RowAction<T>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn actions(mut self, actions: Vec<RowAction<T>>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// How rows are keyed. Defaults to the configured key field.
    pub fn row_key(mut self, row_key: RowKey<T>) -> Self {
        self.row_key = Some(row_key);
        self
    }

    /// Enable drag reordering and receive each reordered page.
    pub fn reorderable(mut self, on_reorder: impl Fn(Vec<T>) + Send + Sync + 'static) -> Self {
        self.reorderable = Some(true);
        self.on_reorder = Some(Arc::new(on_reorder));
        self
    }

    pub fn selection(mut self, selection: SelectionConfig<T>) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn expandable(mut self, expandable: ExpandableConfig<T>) -> Self {
        self.expandable = Some(expandable);
        self
    }

    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    pub fn observer(mut self, observer: impl GridObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Validate the configuration and build the grid. Nothing is fetched
    /// until [`GridController::mount`].
    pub fn build(self) -> Result<GridController<T>, ConfigError> {
        let mut config = self.config;
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(disabled) = self.disabled {
            config.disabled = disabled;
        }
        if let Some(reorderable) = self.reorderable {
            config.reorderable = reorderable;
        }
        config.validate()?;

        let row_key = self
            .row_key
            .unwrap_or_else(|| RowKey::field(config.row_key_field.clone()));

        let selection = self
            .selection
            .as_ref()
            .map(|s| Selection::from_keys(s.initial.iter().cloned()))
            .unwrap_or_default();
        let expanded: HashSet<String> = self
            .expandable
            .as_ref()
            .map(|e| e.default_expanded.iter().cloned().collect())
            .unwrap_or_default();

        let inner = GridInner {
            pagination: Pagination::new(config.page_size),
            sort: SortState::none(),
            rows: Vec::new(),
            selection,
            expanded,
            reorder: ReorderAdapter::new(),
            disabled: config.disabled,
            mounted: false,
            in_flight: 0,
            last_issued: 0,
            last_applied: 0,
        };

        let shared = GridShared {
            source: self.source,
            columns: self.columns,
            actions: self.actions,
            row_key,
            reorderable: config.reorderable,
            on_reorder: self.on_reorder,
            selection: self.selection,
            expandable: self.expandable,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            observer: self.observer.unwrap_or_else(|| Arc::new(LogObserver)),
            config,
        };

        Ok(GridController {
            id: GridId::new(),
            shared: Arc::new(shared),
            inner: Arc::new(RwLock::new(inner)),
            dirty: Arc::new(AtomicBool::new(false)),
        })
    }
}
