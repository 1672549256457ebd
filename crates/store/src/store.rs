// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed in-memory store with fixture loading and JSON persistence.

use std::path::Path;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// The sole owner of one engine's state for the process lifetime.
///
/// Replaces the module-global dictionary of the simulated services with an
/// explicit store object: engines hold an `Arc<SimStore<State>>` and access
/// state through the closure-based [`read`](Self::read) and
/// [`write`](Self::write) accessors. Persistence is wholesale: the entire
/// state serializes to one JSON document, and loading replaces the state in
/// full.
pub struct SimStore<T> {
    state: RwLock<T>,
}

impl<T> SimStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Create a store holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            state: RwLock::new(initial),
        }
    }

    /// Seed a store from a JSON fixture file.
    pub fn from_fixture(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Fixture {
            path: path.display().to_string(),
            source,
        })?;
        let state: T = serde_json::from_str(&content)?;
        Ok(Self::new(state))
    }

    /// Seed from a fixture if the file exists, otherwise use the default state.
    pub fn from_fixture_or_default(path: &Path) -> Result<Self, StoreError>
    where
        T: Default,
    {
        if path.exists() {
            Self::from_fixture(path)
        } else {
            Ok(Self::new(T::default()))
        }
    }

    /// Run a closure against a shared borrow of the state.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.read())
    }

    /// Run a closure against an exclusive borrow of the state.
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.state.write())
    }

    /// Serialize the entire state to a JSON file.
    pub fn save_state(&self, path: &Path) -> Result<(), StoreError> {
        let json = {
            let guard = self.state.read();
            serde_json::to_string_pretty(&*guard)?
        };
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Replace the entire state from a JSON file.
    pub fn load_state(&self, path: &Path) -> Result<(), StoreError> {
        let content = std::fs::read_to_string(path)?;
        let state: T = serde_json::from_str(&content)?;
        *self.state.write() = state;
        Ok(())
    }

    /// Deep-copy the current state (test save/restore lifecycle).
    pub fn snapshot(&self) -> T {
        self.state.read().clone()
    }

    /// Replace the current state with a previously taken snapshot.
    pub fn restore(&self, snapshot: T) {
        *self.state.write() = snapshot;
    }
}

impl<T> Default for SimStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Default,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SimStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimStore")
            .field("state", &*self.state.read())
            .finish()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
