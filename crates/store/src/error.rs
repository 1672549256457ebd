// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Store persistence errors.

use thiserror::Error;

/// Errors raised while loading or persisting store state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON state: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read fixture '{path}': {source}")]
    Fixture {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
