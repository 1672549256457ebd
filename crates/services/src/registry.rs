// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tool registry: endpoint-name dispatch with fault injection.
//!
//! Resolves a tool name to its handler, optionally substituting a canned
//! failure for testing error paths.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::{SimError, SimResult};
use crate::spec::ToolSpec;

/// Handler signature for a registered tool.
///
/// Arguments arrive as a JSON object matching the tool's parameter manifest;
/// results are JSON values mirroring the vendor response shape.
pub type ToolHandler =
    Box<dyn Fn(&serde_json::Value) -> SimResult<serde_json::Value> + Send + Sync>;

struct RegisteredTool {
    spec: ToolSpec,
    handler: ToolHandler,
}

/// Registry of simulation tools keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
    faults: Mutex<HashMap<String, SimError>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under the name in its manifest.
    pub fn register(&mut self, spec: ToolSpec, handler: ToolHandler) -> SimResult<()> {
        let name = spec.name.clone();
        if self.tools.contains_key(&name) {
            return Err(SimError::Conflict(format!(
                "Tool '{}' is already registered.",
                name
            )));
        }
        self.tools.insert(name, RegisteredTool { spec, handler });
        Ok(())
    }

    /// Resolve a tool name and invoke its handler.
    ///
    /// An injected fault takes precedence over the real handler and persists
    /// until cleared.
    pub fn dispatch(&self, name: &str, args: &serde_json::Value) -> SimResult<serde_json::Value> {
        if let Some(fault) = self.faults.lock().get(name) {
            return Err(fault.clone());
        }
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| SimError::NotFound(format!("Tool '{}' is not registered.", name)))?;
        (tool.handler)(args)
    }

    /// Look up one tool's manifest.
    pub fn spec(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name).map(|t| &t.spec)
    }

    /// All manifests, sorted by tool name.
    pub fn specs(&self) -> Vec<&ToolSpec> {
        let mut specs: Vec<&ToolSpec> = self.tools.values().map(|t| &t.spec).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// All registered tool names, sorted.
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Substitute a canned failure for a registered tool.
    pub fn inject_fault(&self, name: &str, error: SimError) -> SimResult<()> {
        if !self.tools.contains_key(name) {
            return Err(SimError::NotFound(format!(
                "Tool '{}' is not registered.",
                name
            )));
        }
        self.faults.lock().insert(name.to_string(), error);
        Ok(())
    }

    /// Remove an injected fault, restoring the real handler.
    pub fn clear_fault(&self, name: &str) {
        self.faults.lock().remove(name);
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish_non_exhaustive()
    }
}

/// Deserialize a tool's argument object into its typed parameter struct.
pub fn parse_args<P: serde::de::DeserializeOwned>(args: &serde_json::Value) -> SimResult<P> {
    serde_json::from_value(args.clone())
        .map_err(|e| SimError::InvalidInput(format!("Invalid arguments: {}", e)))
}

/// Serialize a typed response back to the JSON wire shape.
pub fn to_response<R: serde::Serialize>(response: &R) -> SimResult<serde_json::Value> {
    serde_json::to_value(response)
        .map_err(|e| SimError::Service(format!("Failed to serialize response: {}", e)))
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
