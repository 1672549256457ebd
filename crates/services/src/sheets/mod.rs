// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Google Sheets simulation engine.
//!
//! Spreadsheets hold value grids keyed by the A1 range string they were
//! written under; reads resolve a requested range against every stored grid
//! on the same sheet.

pub mod a1;
mod values;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vendorless_store::SimStore;

use crate::error::{SimError, SimResult};
use crate::registry::{parse_args, to_response, ToolRegistry};
use crate::spec::ToolSpec;

pub use values::{UpdateValuesResponse, ValueRange};

/// Whole-engine state: spreadsheets keyed by id.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SheetsState {
    #[serde(default)]
    pub spreadsheets: BTreeMap<String, Spreadsheet>,
}

/// One spreadsheet: metadata plus stored value grids.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Spreadsheet {
    #[serde(default)]
    pub title: String,
    /// Sheet names in tab order; the first is the default for unprefixed ranges.
    #[serde(default)]
    pub sheets: Vec<String>,
    /// Value grids keyed by the A1 range string they were written under.
    #[serde(default)]
    pub data: BTreeMap<String, Vec<Vec<String>>>,
}

/// Sheets engine handle.
#[derive(Clone, Debug)]
pub struct SheetsEngine {
    store: Arc<SimStore<SheetsState>>,
}

#[derive(Debug, Deserialize)]
struct ValuesGetParams {
    spreadsheet_id: String,
    range: String,
}

#[derive(Debug, Deserialize)]
struct ValuesUpdateParams {
    spreadsheet_id: String,
    range: String,
    values: Vec<Vec<String>>,
}

impl SheetsEngine {
    pub fn new(store: Arc<SimStore<SheetsState>>) -> Self {
        Self { store }
    }

    /// Shared handle to the engine's store.
    pub fn store(&self) -> &Arc<SimStore<SheetsState>> {
        &self.store
    }

    /// Read the cells a range covers across the stored grids.
    pub fn values_get(&self, spreadsheet_id: &str, range: &str) -> SimResult<ValueRange> {
        crate::error::require_nonempty(spreadsheet_id, "Spreadsheet ID must be provided.")?;
        crate::error::require_nonempty(range, "Range must be provided.")?;
        self.store.read(|state| {
            let spreadsheet = lookup_spreadsheet(state, spreadsheet_id)?;
            values::read_range(spreadsheet, range)
        })
    }

    /// Write a grid of values at a range, rebuilding any covering stored grid.
    pub fn values_update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &[Vec<String>],
    ) -> SimResult<UpdateValuesResponse> {
        crate::error::require_nonempty(spreadsheet_id, "Spreadsheet ID must be provided.")?;
        crate::error::require_nonempty(range, "Range must be provided.")?;
        if values.is_empty() {
            return Err(SimError::InvalidInput(
                "Values must contain at least one row.".to_string(),
            ));
        }
        self.store.write(|state| {
            let spreadsheet = state.spreadsheets.get_mut(spreadsheet_id).ok_or_else(|| {
                SimError::NotFound(format!("Spreadsheet '{}' not found.", spreadsheet_id))
            })?;
            values::write_range(spreadsheet, spreadsheet_id, range, values)
        })
    }

    /// Register the engine's operations with their manifests.
    pub fn register_tools(&self, registry: &mut ToolRegistry) -> SimResult<()> {
        let engine = self.clone();
        registry.register(
            ToolSpec::new(
                "sheets_values_get",
                "Return the values covered by an A1 range of a spreadsheet.",
            )
            .required_string("spreadsheet_id", "The spreadsheet to read from.")
            .required_string("range", "The A1 notation range to retrieve."),
            Box::new(move |args| {
                let params: ValuesGetParams = parse_args(args)?;
                to_response(&engine.values_get(&params.spreadsheet_id, &params.range)?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new(
                "sheets_values_update",
                "Set values in an A1 range of a spreadsheet.",
            )
            .required_string("spreadsheet_id", "The spreadsheet to update.")
            .required_string("range", "The A1 notation range to write.")
            .required_grid("values", "Row-major grid of cell values to write."),
            Box::new(move |args| {
                let params: ValuesUpdateParams = parse_args(args)?;
                to_response(&engine.values_update(
                    &params.spreadsheet_id,
                    &params.range,
                    &params.values,
                )?)
            }),
        )
    }
}

fn lookup_spreadsheet<'a>(state: &'a SheetsState, id: &str) -> SimResult<&'a Spreadsheet> {
    state
        .spreadsheets
        .get(id)
        .ok_or_else(|| SimError::NotFound(format!("Spreadsheet '{}' not found.", id)))
}
