// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing and single-call dispatch.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{SimError, SimResult};
use crate::world::SimWorld;

/// Vendor API simulators
#[derive(Parser, Debug, Clone)]
#[command(name = "vendorless", version, about = "Vendor API simulators")]
pub struct Cli {
    /// The tool to invoke (see --list-tools)
    #[arg(value_name = "TOOL")]
    pub tool: Option<String>,

    /// JSON object of arguments for the tool
    #[arg(long, default_value = "{}", value_name = "JSON")]
    pub args: String,

    /// Fixture directory to seed engine state from
    #[arg(long, value_name = "DIR")]
    pub fixtures: Option<PathBuf>,

    /// Directory to persist engine state to after a successful call
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// List registered tool names and exit
    #[arg(long)]
    pub list_tools: bool,

    /// Print one tool's manifest as JSON and exit
    #[arg(long, value_name = "TOOL")]
    pub describe: Option<String>,
}

/// Execute one CLI invocation, returning the text to print to stdout.
pub fn run(cli: &Cli) -> SimResult<String> {
    let world = match &cli.fixtures {
        Some(dir) => SimWorld::from_fixtures(dir)?,
        None => SimWorld::empty()?,
    };

    if cli.list_tools {
        return Ok(world.registry().tool_names().join("\n"));
    }

    if let Some(name) = &cli.describe {
        let spec = world.registry().spec(name).ok_or_else(|| {
            SimError::NotFound(format!("Tool '{}' is not registered.", name))
        })?;
        return serde_json::to_string_pretty(spec)
            .map_err(|e| SimError::Service(format!("Failed to render manifest: {}", e)));
    }

    let Some(tool) = &cli.tool else {
        return Err(SimError::InvalidInput(
            "No tool specified. Use --list-tools to see available tools.".to_string(),
        ));
    };

    let args: serde_json::Value = serde_json::from_str(&cli.args)
        .map_err(|e| SimError::InvalidInput(format!("Invalid --args JSON: {}", e)))?;
    if !args.is_object() {
        return Err(SimError::InvalidInput(
            "--args must be a JSON object.".to_string(),
        ));
    }

    let result = world.call(tool, &args)?;

    if let Some(dir) = &cli.state_dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| SimError::Service(format!("Failed to create state dir: {}", e)))?;
        world.save_state(dir)?;
    }

    serde_json::to_string_pretty(&result)
        .map_err(|e| SimError::Service(format!("Failed to render result: {}", e)))
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
