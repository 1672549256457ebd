// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory state store for vendorless simulation engines.
//!
//! Each simulated service keeps its whole state in one [`SimStore`]: a typed,
//! lock-guarded value seeded from a JSON fixture file. The store supports
//! wholesale save/load (the fixture format round-trips) and deep-copy
//! snapshot/restore for test isolation.

mod error;
mod store;

pub use error::StoreError;
pub use store::SimStore;
