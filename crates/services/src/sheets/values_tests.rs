#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::error::SimError;
use crate::sheets::{SheetsEngine, SheetsState, Spreadsheet};
use std::sync::Arc;
use vendorless_store::SimStore;

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn engine() -> SheetsEngine {
    let mut spreadsheet = Spreadsheet {
        title: "Budget".to_string(),
        sheets: vec!["Sheet1".to_string(), "Data".to_string()],
        data: Default::default(),
    };
    spreadsheet.data.insert(
        "Sheet1!A1:B2".to_string(),
        grid(&[&["name", "amount"], &["rent", "1200"]]),
    );
    spreadsheet
        .data
        .insert("Data!A1:A2".to_string(), grid(&[&["x"], &["y"]]));

    let mut state = SheetsState::default();
    state.spreadsheets.insert("sheet-001".to_string(), spreadsheet);
    SheetsEngine::new(Arc::new(SimStore::new(state)))
}

#[test]
fn test_values_get_exact_range() {
    let result = engine().values_get("sheet-001", "Sheet1!A1:B2").unwrap();
    assert_eq!(
        result.values,
        grid(&[&["name", "amount"], &["rent", "1200"]])
    );
    assert_eq!(result.major_dimension, "ROWS");
}

#[test]
fn test_values_get_subrange() {
    let result = engine().values_get("sheet-001", "Sheet1!B2").unwrap();
    assert_eq!(result.values, grid(&[&["1200"]]));
}

#[test]
fn test_values_get_open_ended_clamps_to_data_extent() {
    // A1:A resolves its open end to the sentinel, but the returned grid
    // stops at the last row that actually holds data.
    let result = engine().values_get("sheet-001", "Sheet1!A1:A").unwrap();
    assert_eq!(result.values, grid(&[&["name"], &["rent"]]));
}

#[test]
fn test_values_get_unprefixed_range_uses_first_sheet() {
    let result = engine().values_get("sheet-001", "A1:B1").unwrap();
    assert_eq!(result.values, grid(&[&["name", "amount"]]));
}

#[test]
fn test_values_get_no_data_returns_empty() {
    let result = engine().values_get("sheet-001", "Sheet1!Z10:Z20").unwrap();
    assert!(result.values.is_empty());
}

#[test]
fn test_values_get_other_sheet_not_bleeding() {
    let result = engine().values_get("sheet-001", "Data!A1:A2").unwrap();
    assert_eq!(result.values, grid(&[&["x"], &["y"]]));
}

#[test]
fn test_values_get_unknown_spreadsheet() {
    let err = engine().values_get("ghost", "A1").unwrap_err();
    assert_eq!(
        err,
        SimError::NotFound("Spreadsheet 'ghost' not found.".to_string())
    );
}

#[test]
fn test_values_update_inside_stored_grid() {
    let engine = engine();
    let response = engine
        .values_update("sheet-001", "Sheet1!B2", &grid(&[&["1300"]]))
        .unwrap();
    assert_eq!(response.updated_cells, 1);
    assert_eq!(response.updated_range, "Sheet1!B2");

    let read = engine.values_get("sheet-001", "Sheet1!A1:B2").unwrap();
    assert_eq!(read.values, grid(&[&["name", "amount"], &["rent", "1300"]]));
}

#[test]
fn test_values_update_pads_covering_grid() {
    let engine = engine();
    // B2 falls inside A1:B2; writing a 2x2 block from there must grow the grid.
    engine
        .values_update(
            "sheet-001",
            "Sheet1!B2",
            &grid(&[&["1300", "notes"], &["900", "food"]]),
        )
        .unwrap();

    let read = engine.values_get("sheet-001", "Sheet1!A1:C3").unwrap();
    assert_eq!(
        read.values,
        grid(&[
            &["name", "amount", ""],
            &["rent", "1300", "notes"],
            &["", "900", "food"],
        ])
    );
}

#[test]
fn test_values_update_outside_stored_ranges_creates_entry() {
    let engine = engine();
    let response = engine
        .values_update("sheet-001", "Sheet1!E5:F5", &grid(&[&["a", "b"]]))
        .unwrap();
    assert_eq!(response.updated_rows, 1);
    assert_eq!(response.updated_columns, 2);

    let read = engine.values_get("sheet-001", "Sheet1!E5:F5").unwrap();
    assert_eq!(read.values, grid(&[&["a", "b"]]));
}

#[test]
fn test_reversed_range_reads_and_writes_like_normal_order() {
    let engine = engine();
    // Inverted bounds cover the same cells as the normal order.
    let read = engine.values_get("sheet-001", "Sheet1!B2:A1").unwrap();
    assert_eq!(read.values, grid(&[&["name", "amount"], &["rent", "1200"]]));

    engine
        .values_update("sheet-001", "Sheet1!F5:E5", &grid(&[&["a", "b"]]))
        .unwrap();
    let read = engine.values_get("sheet-001", "Sheet1!E5:F5").unwrap();
    assert_eq!(read.values, grid(&[&["a", "b"]]));
}

#[test]
fn test_values_update_requires_rows() {
    let err = engine()
        .values_update("sheet-001", "Sheet1!A1", &[])
        .unwrap_err();
    assert_eq!(
        err,
        SimError::InvalidInput("Values must contain at least one row.".to_string())
    );
}

#[test]
fn test_empty_arguments_rejected_before_lookup() {
    let engine = engine();
    assert!(matches!(
        engine.values_get("", "A1").unwrap_err(),
        SimError::InvalidInput(_)
    ));
    assert!(matches!(
        engine.values_get("sheet-001", "  ").unwrap_err(),
        SimError::InvalidInput(_)
    ));
}
