//! Tests for row selection.

mod common;

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use datagrid::{EventResult, GridController, GridRecord, SelectionChange, SelectionConfig};

use common::{RecordingSource, columns, letters, users};

async fn grid_with(selection: SelectionConfig<Value>, records: Vec<Value>) -> GridController<Value> {
    let grid = GridController::builder(RecordingSource::new(records), columns())
        .selection(selection)
        .build()
        .unwrap();
    grid.mount().await;
    grid
}

#[tokio::test]
async fn test_toggle_multiple() {
    let grid = grid_with(SelectionConfig::multiple(), letters(&["a", "b", "c"])).await;

    assert!(grid.toggle_selection("a").is_consumed());
    assert!(grid.toggle_selection("c").is_consumed());
    assert_eq!(grid.selected_keys(), vec!["a", "c"]);
    assert_eq!(grid.selected_rows().len(), 2);

    grid.toggle_selection("a");
    assert_eq!(grid.selected_keys(), vec!["c"]);
    assert!(grid.view().row("c").unwrap().selected);
}

#[tokio::test]
async fn test_single_mode_replaces() {
    let grid = grid_with(SelectionConfig::single(), letters(&["a", "b"])).await;

    grid.toggle_selection("a");
    grid.toggle_selection("b");
    assert_eq!(grid.selected_keys(), vec!["b"]);
    assert_eq!(grid.select_all_on_page(), EventResult::Ignored);
}

#[tokio::test]
async fn test_selection_survives_page_change() {
    let grid = grid_with(SelectionConfig::multiple(), users(25)).await;

    grid.toggle_selection("3");
    grid.change_page(2, 10).await;
    grid.toggle_selection("12");

    assert_eq!(grid.selected_keys(), vec!["12", "3"]);
    // Only loaded rows are reported as records
    let rows = grid.selected_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].field("id").as_deref(), Some("12"));
}

#[tokio::test]
async fn test_initial_keys() {
    let grid = grid_with(
        SelectionConfig::multiple().initial_keys(["b"]),
        letters(&["a", "b"]),
    )
    .await;
    assert_eq!(grid.selected_keys(), vec!["b"]);
}

#[tokio::test]
async fn test_range_select() {
    let grid = grid_with(SelectionConfig::multiple(), letters(&["a", "b", "c", "d", "e"])).await;

    grid.toggle_selection("b");
    assert!(grid.range_select("d", false).is_consumed());
    assert_eq!(grid.selected_keys(), vec!["b", "c", "d"]);
}

#[tokio::test]
async fn test_disabled_rows_are_skipped() {
    let grid = grid_with(
        SelectionConfig::multiple().row_disabled(|r: &Value| r["id"] == "b"),
        letters(&["a", "b", "c"]),
    )
    .await;

    assert_eq!(grid.toggle_selection("b"), EventResult::Ignored);
    grid.select_all_on_page();
    assert_eq!(grid.selected_keys(), vec!["a", "c"]);

    let view = grid.view();
    assert!(!view.row("b").unwrap().selectable);
    assert!(view.row("a").unwrap().selectable);
}

#[tokio::test]
async fn test_range_select_skips_disabled_rows() {
    let grid = grid_with(
        SelectionConfig::multiple().row_disabled(|r: &Value| r["id"] == "b"),
        letters(&["a", "b", "c", "d"]),
    )
    .await;

    grid.toggle_selection("a");
    assert!(grid.range_select("c", false).is_consumed());
    assert_eq!(grid.selected_keys(), vec!["a", "c"]);
    assert_eq!(grid.range_select("b", true), EventResult::Ignored);
}

#[tokio::test]
async fn test_clear_selection() {
    let grid = grid_with(SelectionConfig::multiple(), letters(&["a", "b"])).await;

    grid.select_all_on_page();
    assert!(grid.clear_selection().is_consumed());
    assert!(grid.selected_keys().is_empty());
    assert_eq!(grid.clear_selection(), EventResult::Ignored);
}

#[tokio::test]
async fn test_override_receives_proposal_and_owner_commits() {
    let proposals: Arc<Mutex<Vec<SelectionChange<Value>>>> = Arc::new(Mutex::new(Vec::new()));
    let config = SelectionConfig::multiple().on_change({
        let proposals = proposals.clone();
        move |change: &SelectionChange<Value>| proposals.lock().unwrap().push(change.clone())
    });
    let grid = grid_with(config, letters(&["a", "b"])).await;

    assert!(grid.toggle_selection("a").is_consumed());
    assert!(grid.selected_keys().is_empty());

    let change = proposals.lock().unwrap()[0].clone();
    assert_eq!(change.keys, vec!["a"]);
    assert_eq!(change.added, vec!["a"]);
    assert_eq!(change.records.len(), 1);

    grid.set_selected_keys(change.keys);
    assert_eq!(grid.selected_keys(), vec!["a"]);
}

#[tokio::test]
async fn test_disabled_grid_blocks_selection() {
    let grid = GridController::builder(RecordingSource::new(letters(&["a"])), columns())
        .selection(SelectionConfig::multiple())
        .disabled(true)
        .build()
        .unwrap();
    grid.mount().await;

    assert_eq!(grid.toggle_selection("a"), EventResult::Ignored);
    assert!(!grid.view().rows[0].selectable);

    // Owner commits still apply
    grid.set_selected_keys(["a"]);
    assert_eq!(grid.selected_keys(), vec!["a"]);
}

#[tokio::test]
async fn test_no_selection_config() {
    let grid = GridController::builder(RecordingSource::new(letters(&["a"])), columns())
        .build()
        .unwrap();
    grid.mount().await;

    assert_eq!(grid.toggle_selection("a"), EventResult::Ignored);
    assert_eq!(grid.set_selected_keys(["a"]), EventResult::Ignored);
    assert_eq!(grid.view().selection_mode, None);
}

#[tokio::test]
async fn test_rows_without_key_use_position() {
    let records = vec![json!({"name": "Ada"}), json!({"name": "Grace"})];
    let grid = grid_with(SelectionConfig::multiple(), records).await;

    assert_eq!(grid.row_keys(), vec!["row-0", "row-1"]);
    grid.toggle_selection("row-1");
    assert_eq!(
        grid.selected_rows()[0].field("name").as_deref(),
        Some("Grace")
    );
}
