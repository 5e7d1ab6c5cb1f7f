//! Tests for derived columns, row actions, expansion and render snapshots.

mod common;

use std::sync::{Arc, Mutex};

use serde_json::Value;

use datagrid::{
    ACTIONS_COLUMN_KEY, ColumnDef, ColumnKind, EventResult, ExpandableConfig, Fixed, GridConfig,
    GridController, GridRecord, RowAction, SortOrder,
};

use common::{RecordingSource, columns, letters, users};

fn clicks() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

fn recording_action(label: &str, clicks: &Arc<Mutex<Vec<String>>>) -> RowAction<Value> {
    let clicks = clicks.clone();
    RowAction::new(label, move |record: &Value| {
        clicks
            .lock()
            .unwrap()
            .push(record.field("id").unwrap_or_default())
    })
}

// =============================================================================
// Columns
// =============================================================================

#[tokio::test]
async fn test_actions_column_is_last_and_pinned_right() {
    let log = clicks();
    let grid = GridController::builder(RecordingSource::new(users(3)), columns())
        .action(recording_action("Edit", &log))
        .action(recording_action("Delete", &log).danger())
        .config(GridConfig::default().with_actions_title("Ops"))
        .build()
        .unwrap();

    let columns = grid.columns();
    assert_eq!(columns.len(), 3);
    let actions = &columns[2];
    assert_eq!(actions.key, ACTIONS_COLUMN_KEY);
    assert_eq!(actions.title, "Ops");
    assert_eq!(actions.kind, ColumnKind::Actions);
    assert_eq!(actions.fixed, Some(Fixed::Right));
    assert!(!actions.sortable);
}

#[tokio::test]
async fn test_no_actions_column_without_actions() {
    let grid = GridController::builder(RecordingSource::new(users(3)), columns())
        .build()
        .unwrap();
    assert!(grid.columns().iter().all(|c| c.kind == ColumnKind::Data));
}

#[tokio::test]
async fn test_sortable_columns_track_sort() {
    let defs = vec![
        ColumnDef::field("Name", "name"),
        ColumnDef::new("Badge", "badge").render(|r: &Value| format!("#{}", r["id"])),
    ];
    let grid = GridController::builder(RecordingSource::new(users(3)), defs)
        .build()
        .unwrap();
    grid.mount().await;

    let columns = grid.columns();
    assert!(columns[0].sortable);
    assert!(!columns[1].sortable);

    grid.toggle_sort("name").await;
    grid.toggle_sort("name").await;
    assert_eq!(grid.columns()[0].sort_order, Some(SortOrder::Descend));
    assert_eq!(grid.columns()[1].sort_order, None);
}

#[tokio::test]
async fn test_cells_use_renderer_or_field() {
    let defs = vec![
        ColumnDef::field("Name", "name"),
        ColumnDef::new("Badge", "badge").render(|r: &Value| format!("#{}", r["id"])),
    ];
    let grid = GridController::builder(RecordingSource::new(users(1)), defs)
        .action(RowAction::new("Noop", |_: &Value| {}))
        .build()
        .unwrap();
    grid.mount().await;

    let view = grid.view();
    let cells = view.rows[0].cells(&view.columns);
    assert_eq!(
        cells,
        vec![Some("user-01".to_string()), Some("#1".to_string()), None]
    );
}

// =============================================================================
// Actions
// =============================================================================

#[tokio::test]
async fn test_click_action_passes_record() {
    let log = clicks();
    let grid = GridController::builder(RecordingSource::new(users(3)), columns())
        .action(recording_action("Delete", &log))
        .build()
        .unwrap();
    grid.mount().await;

    assert!(grid.click_action("2", 0).is_consumed());
    assert_eq!(*log.lock().unwrap(), vec!["2"]);

    assert_eq!(grid.click_action("99", 0), EventResult::Ignored);
    assert_eq!(grid.click_action("2", 5), EventResult::Ignored);
}

#[tokio::test]
async fn test_disabled_or_loading_action_is_inert() {
    let log = clicks();
    let grid = GridController::builder(RecordingSource::new(users(2)), columns())
        .action(recording_action("Edit", &log).disabled(true))
        .action(recording_action("Save", &log).loading(true))
        .build()
        .unwrap();
    grid.mount().await;

    assert_eq!(grid.click_action("1", 0), EventResult::Ignored);
    assert_eq!(grid.click_action("1", 1), EventResult::Ignored);
    assert!(log.lock().unwrap().is_empty());

    let controls = &grid.view().rows[0].actions;
    assert!(controls[0].disabled);
    assert!(!controls[1].disabled);
    assert!(!controls[1].is_interactive());
}

#[tokio::test]
async fn test_disabled_grid_disables_actions() {
    let log = clicks();
    let grid = GridController::builder(RecordingSource::new(users(2)), columns())
        .action(recording_action("Edit", &log))
        .build()
        .unwrap();
    grid.mount().await;

    grid.set_disabled(true);
    assert_eq!(grid.click_action("1", 0), EventResult::Ignored);
    assert!(grid.view().rows[0].actions[0].disabled);

    grid.set_disabled(false);
    assert!(grid.click_action("1", 0).is_consumed());
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_action_handler_may_reload_grid() {
    let source = RecordingSource::new(users(12));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let grid = GridController::builder(source.clone(), columns())
        .action(RowAction::new("Delete", move |record: &Value| {
            let _ = tx.send(record.field("id").unwrap_or_default());
        }))
        .build()
        .unwrap();
    grid.mount().await;

    grid.click_action("1", 0);
    let id = rx.recv().await.unwrap();
    source.inner.remove_where("id", &id);
    grid.handle().reload().await;

    assert_eq!(grid.pagination().total, 11);
    assert_eq!(grid.row_keys()[0], "2");
}

// =============================================================================
// Expansion and snapshot
// =============================================================================

#[tokio::test]
async fn test_toggle_expanded() {
    let grid = GridController::builder(RecordingSource::new(letters(&["a", "b"])), columns())
        .expandable(
            ExpandableConfig::new(|r: &Value| format!("details of {}", r["name"]))
                .row_expandable(|r: &Value| r["id"] != "b")
                .default_expanded(["a"]),
        )
        .build()
        .unwrap();
    grid.mount().await;

    let view = grid.view();
    let a = view.row("a").unwrap();
    assert!(a.expanded);
    assert_eq!(a.expanded_content.as_deref(), Some("details of \"A\""));
    assert!(!view.row("b").unwrap().expandable);

    assert!(grid.toggle_expanded("a").is_consumed());
    assert!(grid.expanded_keys().is_empty());
    assert_eq!(grid.toggle_expanded("b"), EventResult::Ignored);
    assert!(grid.view().row("a").unwrap().expanded_content.is_none());
}

#[tokio::test]
async fn test_snapshot_summary() {
    let grid = GridController::builder(RecordingSource::new(users(35)), columns())
        .build()
        .unwrap();
    grid.mount().await;
    grid.go_to_page(2).await;

    let snapshot = grid.handle().snapshot();
    assert_eq!(snapshot.page_count, 4);
    assert_eq!(snapshot.item_range, Some((11, 20)));
    assert_eq!(snapshot.page_size_options, vec![10, 20, 50, 100]);
    assert!(!snapshot.loading);
    assert_eq!(snapshot.rows[0].key, "11");
    assert_eq!(snapshot.rows[0].index, 0);
}

#[tokio::test]
async fn test_dirty_flag() {
    let grid = GridController::builder(RecordingSource::new(users(3)), columns())
        .build()
        .unwrap();
    assert!(!grid.is_dirty());
    grid.mount().await;
    assert!(grid.is_dirty());
    grid.clear_dirty();
    grid.set_disabled(true);
    assert!(grid.is_dirty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = GridController::builder(RecordingSource::new(users(3)), columns())
        .page_size(0)
        .build();
    assert!(result.is_err());
}
