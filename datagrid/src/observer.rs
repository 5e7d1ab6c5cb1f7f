//! Structured grid events for logging and observability.

use crate::error::FetchError;
use crate::source::FetchRequest;

/// Something that happened inside a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// The initial fetch was issued.
    Mounted,
    /// A fetch was handed to the data source.
    FetchStarted { seq: u64, request: FetchRequest },
    /// A response became the visible page.
    FetchApplied { seq: u64, rows: usize, total: u64 },
    /// A response arrived for a page/sort that is no longer current.
    FetchDiscarded { seq: u64, request: FetchRequest },
    /// The data source failed for the current page/sort.
    FetchFailed { seq: u64, error: FetchError },
    /// The backend returned more rows than the page size allows.
    RowsTruncated { seq: u64, received: usize, kept: usize },
    /// Rows of an applied page had no key and are keyed by position.
    PositionalKeys { seq: u64, rows: usize },
    /// The total shrank below the current page; the grid moved back.
    PageClamped { from: u32, to: u32 },
    /// A user interaction was refused because the grid is disabled.
    InteractionBlocked { interaction: &'static str },
    /// A row was dragged to a new position in the loaded page.
    Reordered { from: usize, to: usize },
    /// The selected key set changed (or a change was proposed to an override).
    SelectionChanged { selected: usize },
}

/// Receives [`GridEvent`]s. Must not block.
pub trait GridObserver: Send + Sync {
    fn on_event(&self, grid: &str, event: &GridEvent);
}

/// Writes grid events to the `log` facade under the `datagrid` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl GridObserver for LogObserver {
    fn on_event(&self, grid: &str, event: &GridEvent) {
        match event {
            GridEvent::Mounted => log::debug!(target: "datagrid", "[{}] mounted", grid),
            GridEvent::FetchStarted { seq, request } => log::debug!(
                target: "datagrid",
                "[{}] fetch #{} page={} size={} sort={:?}/{:?}",
                grid,
                seq,
                request.page,
                request.page_size,
                request.sort_field,
                request.sort_order
            ),
            GridEvent::FetchApplied { seq, rows, total } => log::debug!(
                target: "datagrid",
                "[{}] fetch #{} applied: {} rows of {}",
                grid,
                seq,
                rows,
                total
            ),
            GridEvent::FetchDiscarded { seq, request } => log::debug!(
                target: "datagrid",
                "[{}] fetch #{} discarded as stale (page={})",
                grid,
                seq,
                request.page
            ),
            GridEvent::FetchFailed { seq, error } => {
                log::error!(target: "datagrid", "[{}] fetch #{} failed: {}", grid, seq, error)
            }
            GridEvent::RowsTruncated {
                seq,
                received,
                kept,
            } => log::warn!(
                target: "datagrid",
                "[{}] fetch #{} returned {} rows, keeping {}",
                grid,
                seq,
                received,
                kept
            ),
            GridEvent::PositionalKeys { seq, rows } => log::debug!(
                target: "datagrid",
                "[{}] fetch #{}: {} rows have no key, using positional keys",
                grid,
                seq,
                rows
            ),
            GridEvent::PageClamped { from, to } => log::info!(
                target: "datagrid",
                "[{}] page {} is past the end, moving to {}",
                grid,
                from,
                to
            ),
            GridEvent::InteractionBlocked { interaction } => log::debug!(
                target: "datagrid",
                "[{}] {} ignored, grid is disabled",
                grid,
                interaction
            ),
            GridEvent::Reordered { from, to } => {
                log::debug!(target: "datagrid", "[{}] row {} moved to {}", grid, from, to)
            }
            GridEvent::SelectionChanged { selected } => {
                log::trace!(target: "datagrid", "[{}] {} rows selected", grid, selected)
            }
        }
    }
}
