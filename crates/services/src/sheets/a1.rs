// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A1-notation range parsing.
//!
//! Parses spreadsheet range strings (`Sheet1!A1:B2`, `A:B`, `1:2`, bare `A1`)
//! into 1-based row/column bounds. Open-ended ranges resolve the missing
//! bound to [`OPEN_END`] rather than the actual sheet extent.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{SimError, SimResult};

/// Sentinel bound for open-ended ranges (`A5:A`, `A:B`, `1:2`, sheet-only).
pub const OPEN_END: u32 = 1000;

// Column letters capped at three so sheet names like `Sheet1` are not
// mistaken for cell references.
static CELL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^([A-Za-z]{1,3})(\d+)$").expect("cell regex pattern is invalid")
});

static COLUMN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z]+$").expect("column regex pattern is invalid")
});

static ROW_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^\d+$").expect("row regex pattern is invalid")
});

/// A parsed range: sheet name plus inclusive 1-based bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeRef {
    pub sheet: String,
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl RangeRef {
    /// Number of rows covered, treating open ends as the sentinel.
    pub fn row_count(&self) -> u32 {
        self.end_row.saturating_sub(self.start_row) + 1
    }

    /// Number of columns covered, treating open ends as the sentinel.
    pub fn col_count(&self) -> u32 {
        self.end_col.saturating_sub(self.start_col) + 1
    }

    /// Whether the cell at (row, col) falls inside this range.
    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.start_row..=self.end_row).contains(&row)
            && (self.start_col..=self.end_col).contains(&col)
    }

    /// Swap inverted bounds; `B3:A1` covers the same cells as `A1:B3`.
    fn normalized(mut self) -> Self {
        if self.start_row > self.end_row {
            std::mem::swap(&mut self.start_row, &mut self.end_row);
        }
        if self.start_col > self.end_col {
            std::mem::swap(&mut self.start_col, &mut self.end_col);
        }
        self
    }
}

/// Convert column letters to a 1-based index (base-26 with offset: `A`=1, `AA`=27).
pub fn col_to_index(col: &str) -> u32 {
    let mut result: u32 = 0;
    for c in col.chars() {
        result = result * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32) + 1;
    }
    result
}

/// Convert a 1-based column index back to letters (`1` → `A`, `27` → `AA`).
pub fn index_to_col(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Split `Sheet1!A1:B2` into the sheet prefix (if any) and the range part.
pub fn split_sheet_and_range(a1: &str) -> (Option<&str>, &str) {
    match a1.split_once('!') {
        Some((sheet, range)) => (Some(sheet), range),
        None => (None, a1),
    }
}

/// Parse an A1 range string into a [`RangeRef`].
///
/// `default_sheet` supplies the sheet name when the string carries no
/// `Sheet!` prefix. A bare sheet name (no cell grammar) covers the whole
/// sheet up to the sentinel bounds.
pub fn parse_range(a1: &str, default_sheet: &str) -> SimResult<RangeRef> {
    let (sheet, range_part) = split_sheet_and_range(a1.trim());
    let sheet = sheet.unwrap_or(default_sheet).to_string();

    let invalid = || SimError::InvalidInput(format!("Invalid A1 range: '{}'.", a1.trim()));

    // Sheet-only reference: `Sheet1!` or a bare name that is not cell grammar.
    if range_part.is_empty() {
        return Ok(whole_sheet(sheet));
    }
    if sheet_name_only(range_part) {
        return Ok(whole_sheet(range_part.to_string()));
    }

    let Some((start, end)) = range_part.split_once(':') else {
        // Single reference: cell `A1` or column `A`.
        if let Some(caps) = CELL_REGEX.captures(range_part) {
            let row: u32 = caps[2].parse().map_err(|_| invalid())?;
            let col = col_to_index(&caps[1]);
            return Ok(RangeRef {
                sheet,
                start_row: row,
                start_col: col,
                end_row: row,
                end_col: col,
            });
        }
        if COLUMN_REGEX.is_match(range_part) {
            let col = col_to_index(range_part);
            return Ok(RangeRef {
                sheet,
                start_row: 1,
                start_col: col,
                end_row: OPEN_END,
                end_col: col,
            });
        }
        return Err(invalid());
    };

    // Column range `A:B`.
    if COLUMN_REGEX.is_match(start) && COLUMN_REGEX.is_match(end) {
        return Ok(RangeRef {
            sheet,
            start_row: 1,
            start_col: col_to_index(start),
            end_row: OPEN_END,
            end_col: col_to_index(end),
        }
        .normalized());
    }

    // Row range `1:2`.
    if ROW_REGEX.is_match(start) && ROW_REGEX.is_match(end) {
        let start_row: u32 = start.parse().map_err(|_| invalid())?;
        let end_row: u32 = end.parse().map_err(|_| invalid())?;
        return Ok(RangeRef {
            sheet,
            start_row,
            start_col: 1,
            end_row,
            end_col: OPEN_END,
        }
        .normalized());
    }

    // Cell range `A1:B2`.
    if let (Some(s), Some(e)) = (CELL_REGEX.captures(start), CELL_REGEX.captures(end)) {
        return Ok(RangeRef {
            sheet,
            start_row: s[2].parse().map_err(|_| invalid())?,
            start_col: col_to_index(&s[1]),
            end_row: e[2].parse().map_err(|_| invalid())?,
            end_col: col_to_index(&e[1]),
        }
        .normalized());
    }

    // Open-ended cell-to-column range `A5:A`.
    if let Some(s) = CELL_REGEX.captures(start) {
        if COLUMN_REGEX.is_match(end) {
            return Ok(RangeRef {
                sheet,
                start_row: s[2].parse().map_err(|_| invalid())?,
                start_col: col_to_index(&s[1]),
                end_row: OPEN_END,
                end_col: col_to_index(end),
            });
        }
    }

    Err(invalid())
}

fn whole_sheet(sheet: String) -> RangeRef {
    RangeRef {
        sheet,
        start_row: 1,
        start_col: 1,
        end_row: OPEN_END,
        end_col: OPEN_END,
    }
}

/// Whether the range part is a bare sheet name rather than cell grammar.
fn sheet_name_only(range_part: &str) -> bool {
    static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"^[A-Za-z0-9_]+$").expect("name regex pattern is invalid")
    });
    NAME_REGEX.is_match(range_part)
        && !CELL_REGEX.is_match(range_part)
        && !COLUMN_REGEX.is_match(range_part)
        && !ROW_REGEX.is_match(range_part)
}

#[cfg(test)]
#[path = "a1_tests.rs"]
mod tests;
