// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Value reads and writes over stored range grids.

use serde::{Deserialize, Serialize};

use super::a1::{self, RangeRef};
use super::Spreadsheet;
use crate::error::SimResult;

/// Response shape for a values read.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValueRange {
    pub range: String,
    pub major_dimension: String,
    pub values: Vec<Vec<String>>,
}

/// Response shape for a values update.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateValuesResponse {
    pub spreadsheet_id: String,
    pub updated_range: String,
    pub updated_rows: u32,
    pub updated_columns: u32,
    pub updated_cells: u32,
}

fn default_sheet(spreadsheet: &Spreadsheet) -> &str {
    spreadsheet
        .sheets
        .first()
        .map(String::as_str)
        .unwrap_or("Sheet1")
}

/// Resolve a requested range against every stored grid on the same sheet.
///
/// Cells not covered by any stored grid come back as empty strings; a range
/// touching no stored data returns an empty grid. Open-ended bounds clamp to
/// the extent of the data actually found, not the sentinel.
pub fn read_range(spreadsheet: &Spreadsheet, range: &str) -> SimResult<ValueRange> {
    let target = a1::parse_range(range, default_sheet(spreadsheet))?;

    // Collect every covered cell from overlapping stored grids.
    let mut cells: Vec<(u32, u32, String)> = Vec::new();
    for (stored_key, grid) in &spreadsheet.data {
        let Ok(stored) = a1::parse_range(stored_key, default_sheet(spreadsheet)) else {
            continue;
        };
        if stored.sheet != target.sheet {
            continue;
        }
        for (i, row) in grid.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let abs_row = stored.start_row + i as u32;
                let abs_col = stored.start_col + j as u32;
                if target.contains(abs_row, abs_col) && !value.is_empty() {
                    cells.push((abs_row, abs_col, value.clone()));
                }
            }
        }
    }

    if cells.is_empty() {
        return Ok(ValueRange {
            range: range.trim().to_string(),
            major_dimension: "ROWS".to_string(),
            values: Vec::new(),
        });
    }

    // Open-ended bounds clamp to the data extent.
    let max_row = cells
        .iter()
        .map(|(r, _, _)| *r)
        .max()
        .unwrap_or(target.start_row);
    let max_col = cells
        .iter()
        .map(|(_, c, _)| *c)
        .max()
        .unwrap_or(target.start_col);
    let end_row = target.end_row.min(max_row);
    let end_col = target.end_col.min(max_col);

    let rows = (end_row - target.start_row + 1) as usize;
    let cols = (end_col - target.start_col + 1) as usize;
    let mut values = vec![vec![String::new(); cols]; rows];
    for (row, col, value) in cells {
        if row <= end_row && col <= end_col {
            values[(row - target.start_row) as usize][(col - target.start_col) as usize] = value;
        }
    }

    Ok(ValueRange {
        range: range.trim().to_string(),
        major_dimension: "ROWS".to_string(),
        values,
    })
}

/// Write a grid at a range, rebuilding the stored grid that covers its start.
///
/// When a stored range on the same sheet contains the target's start cell,
/// that grid is padded out as needed and overwritten in place; otherwise the
/// values are stored under the requested range string as a new grid.
pub fn write_range(
    spreadsheet: &mut Spreadsheet,
    spreadsheet_id: &str,
    range: &str,
    values: &[Vec<String>],
) -> SimResult<UpdateValuesResponse> {
    let default = default_sheet(spreadsheet).to_string();
    let target = a1::parse_range(range, &default)?;

    let num_rows = values.len() as u32;
    let num_cols = values.iter().map(Vec::len).max().unwrap_or(0) as u32;

    let mut host_key: Option<String> = None;
    for stored_key in spreadsheet.data.keys() {
        let Ok(stored) = a1::parse_range(stored_key, &default) else {
            continue;
        };
        if stored.sheet == target.sheet && stored.contains(target.start_row, target.start_col) {
            host_key = Some(stored_key.clone());
            break;
        }
    }

    match host_key {
        Some(key) => {
            let stored = a1::parse_range(&key, &default)?;
            rebuild_grid(spreadsheet, &key, &stored, &target, values);
        }
        None => {
            spreadsheet
                .data
                .insert(range.trim().to_string(), values.to_vec());
        }
    }

    Ok(UpdateValuesResponse {
        spreadsheet_id: spreadsheet_id.to_string(),
        updated_range: range.trim().to_string(),
        updated_rows: num_rows,
        updated_columns: num_cols,
        updated_cells: num_rows * num_cols,
    })
}

fn rebuild_grid(
    spreadsheet: &mut Spreadsheet,
    key: &str,
    stored: &RangeRef,
    target: &RangeRef,
    values: &[Vec<String>],
) {
    let row_offset = (target.start_row - stored.start_row) as usize;
    let col_offset = (target.start_col - stored.start_col) as usize;

    let Some(grid) = spreadsheet.data.get_mut(key) else {
        return;
    };

    let required_rows = row_offset + values.len();
    let required_cols = col_offset + values.iter().map(Vec::len).max().unwrap_or(0);

    while grid.len() < required_rows {
        grid.push(Vec::new());
    }
    for row in grid.iter_mut() {
        while row.len() < required_cols {
            row.push(String::new());
        }
    }

    for (i, new_row) in values.iter().enumerate() {
        for (j, cell) in new_row.iter().enumerate() {
            grid[row_offset + i][col_offset + j] = cell.clone();
        }
    }
}

#[cfg(test)]
#[path = "values_tests.rs"]
mod tests;
