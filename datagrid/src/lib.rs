//! Headless remote-data grid
//!
//! A grid controller that fetches pages of records from an async data
//! source, tracks pagination, sort, selection, expansion and drag reordering,
//! and hands renderers a snapshot of what to draw. Rendering is left to the
//! caller.

pub mod action;
pub mod column;
pub mod config;
pub mod controller;
pub mod error;
pub mod expand;
pub mod notify;
pub mod observer;
pub mod pagination;
pub mod record;
pub mod reorder;
pub mod selection;
pub mod sort;
pub mod source;

pub use action::{ActionControl, ActionKind, RowAction};
pub use column::{ACTIONS_COLUMN_KEY, Column, ColumnDef, ColumnKind, Fixed};
pub use config::GridConfig;
pub use controller::{
    EventResult, FetchOutcome, GridBuilder, GridController, GridHandle, GridId, GridView, RowView,
};
pub use error::{ConfigError, FetchError};
pub use expand::ExpandableConfig;
pub use notify::{ChannelNotifier, LogNotifier, Notification, NotificationLevel, Notifier};
pub use observer::{GridEvent, GridObserver, LogObserver};
pub use pagination::Pagination;
pub use record::{GridRecord, RowKey};
pub use selection::{
    PageKeys, Selection, SelectionChange, SelectionConfig, SelectionDelta, SelectionMode,
};
pub use sort::{SortOrder, SortState};
pub use source::{DataSource, FetchRequest, MemorySource, PageResult, source_fn};

pub mod prelude {
    pub use crate::action::{ActionKind, RowAction};
    pub use crate::column::{ColumnDef, Fixed};
    pub use crate::config::GridConfig;
    pub use crate::controller::{EventResult, FetchOutcome, GridController, GridHandle, GridView};
    pub use crate::error::FetchError;
    pub use crate::expand::ExpandableConfig;
    pub use crate::notify::{Notification, Notifier};
    pub use crate::record::{GridRecord, RowKey};
    pub use crate::selection::{SelectionConfig, SelectionMode};
    pub use crate::sort::{SortOrder, SortState};
    pub use crate::source::{DataSource, FetchRequest, PageResult};
}
