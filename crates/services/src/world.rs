// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! World composition: every engine plus the populated tool registry.
//!
//! A `SimWorld` owns one store per engine, seeded from a fixture directory,
//! and a registry exposing every operation under its vendor-style tool name.
//! Tests snapshot and restore the whole world around each case.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use vendorless_store::{SimStore, StoreError};

use crate::appconfig::{AppConfigEngine, AppConfigState};
use crate::chat::{ChatEngine, ChatState};
use crate::error::{SimError, SimResult};
use crate::registry::ToolRegistry;
use crate::sandbox::{SandboxEngine, SandboxState};
use crate::sheets::{SheetsEngine, SheetsState};

/// Deep copy of every engine's state, for save/restore around tests.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    pub appconfig: AppConfigState,
    pub sheets: SheetsState,
    pub chat: ChatState,
    pub sandbox: SandboxState,
}

/// All simulation engines behind one dispatch surface.
pub struct SimWorld {
    appconfig: AppConfigEngine,
    sheets: SheetsEngine,
    chat: ChatEngine,
    sandbox: SandboxEngine,
    registry: ToolRegistry,
}

impl SimWorld {
    /// Build a world with empty default state in every engine.
    pub fn empty() -> SimResult<Self> {
        Self::build(
            AppConfigState::default(),
            SheetsState::default(),
            ChatState::default(),
            SandboxState::default(),
        )
    }

    /// Seed every engine from `<dir>/<engine>.json`. A missing fixture file
    /// leaves that engine with empty default state.
    pub fn from_fixtures(dir: &Path) -> SimResult<Self> {
        let appconfig = SimStore::from_fixture_or_default(&dir.join("appconfig.json"))
            .map_err(store_error)?;
        let sheets =
            SimStore::from_fixture_or_default(&dir.join("sheets.json")).map_err(store_error)?;
        let chat =
            SimStore::from_fixture_or_default(&dir.join("chat.json")).map_err(store_error)?;
        let sandbox =
            SimStore::from_fixture_or_default(&dir.join("sandbox.json")).map_err(store_error)?;
        Self::with_stores(
            Arc::new(appconfig),
            Arc::new(sheets),
            Arc::new(chat),
            Arc::new(sandbox),
        )
    }

    fn build(
        appconfig: AppConfigState,
        sheets: SheetsState,
        chat: ChatState,
        sandbox: SandboxState,
    ) -> SimResult<Self> {
        Self::with_stores(
            Arc::new(SimStore::new(appconfig)),
            Arc::new(SimStore::new(sheets)),
            Arc::new(SimStore::new(chat)),
            Arc::new(SimStore::new(sandbox)),
        )
    }

    fn with_stores(
        appconfig: Arc<SimStore<AppConfigState>>,
        sheets: Arc<SimStore<SheetsState>>,
        chat: Arc<SimStore<ChatState>>,
        sandbox: Arc<SimStore<SandboxState>>,
    ) -> SimResult<Self> {
        let appconfig = AppConfigEngine::new(appconfig);
        let sheets = SheetsEngine::new(sheets);
        let chat = ChatEngine::new(chat);
        let sandbox = SandboxEngine::new(sandbox);

        let mut registry = ToolRegistry::new();
        appconfig.register_tools(&mut registry)?;
        sheets.register_tools(&mut registry)?;
        chat.register_tools(&mut registry)?;
        sandbox.register_tools(&mut registry)?;

        Ok(Self {
            appconfig,
            sheets,
            chat,
            sandbox,
            registry,
        })
    }

    /// Dispatch one tool call through the registry.
    pub fn call(&self, tool: &str, args: &Value) -> SimResult<Value> {
        self.registry.dispatch(tool, args)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn appconfig(&self) -> &AppConfigEngine {
        &self.appconfig
    }

    pub fn sheets(&self) -> &SheetsEngine {
        &self.sheets
    }

    pub fn chat(&self) -> &ChatEngine {
        &self.chat
    }

    pub fn sandbox(&self) -> &SandboxEngine {
        &self.sandbox
    }

    /// Write every engine's state to `<dir>/<engine>.json`.
    pub fn save_state(&self, dir: &Path) -> SimResult<()> {
        self.appconfig
            .store()
            .save_state(&dir.join("appconfig.json"))
            .map_err(store_error)?;
        self.sheets
            .store()
            .save_state(&dir.join("sheets.json"))
            .map_err(store_error)?;
        self.chat
            .store()
            .save_state(&dir.join("chat.json"))
            .map_err(store_error)?;
        self.sandbox
            .store()
            .save_state(&dir.join("sandbox.json"))
            .map_err(store_error)
    }

    /// Replace every engine's state from `<dir>/<engine>.json`. Every file
    /// must exist; partial directories are a caller error.
    pub fn load_state(&self, dir: &Path) -> SimResult<()> {
        self.appconfig
            .store()
            .load_state(&dir.join("appconfig.json"))
            .map_err(store_error)?;
        self.sheets
            .store()
            .load_state(&dir.join("sheets.json"))
            .map_err(store_error)?;
        self.chat
            .store()
            .load_state(&dir.join("chat.json"))
            .map_err(store_error)?;
        self.sandbox
            .store()
            .load_state(&dir.join("sandbox.json"))
            .map_err(store_error)
    }

    /// Deep-copy every engine's state.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            appconfig: self.appconfig.store().snapshot(),
            sheets: self.sheets.store().snapshot(),
            chat: self.chat.store().snapshot(),
            sandbox: self.sandbox.store().snapshot(),
        }
    }

    /// Restore every engine's state from a snapshot.
    pub fn restore(&self, snapshot: WorldSnapshot) {
        self.appconfig.store().restore(snapshot.appconfig);
        self.sheets.store().restore(snapshot.sheets);
        self.chat.store().restore(snapshot.chat);
        self.sandbox.store().restore(snapshot.sandbox);
    }
}

fn store_error(err: StoreError) -> SimError {
    SimError::Service(err.to_string())
}

#[cfg(test)]
#[path = "world_tests.rs"]
mod tests;
