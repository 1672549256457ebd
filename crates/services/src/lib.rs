// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Vendor API Simulators
//!
//! Mock backends for third-party service APIs, for integration testing
//! without network access or vendor accounts. Each engine mirrors one
//! vendor surface (Azure App Configuration, Google Sheets, Google Chat, a
//! CLI-agent file sandbox) over an in-memory store seeded from JSON
//! fixtures, raising the same typed errors and message strings callers
//! would see from the real service.

pub mod appconfig;
pub mod chat;
pub mod cli;
pub mod error;
pub mod filter;
pub mod registry;
pub mod sandbox;
pub mod sheets;
pub mod spec;
pub mod world;

pub use error::{SimError, SimResult};
pub use registry::ToolRegistry;
pub use spec::ToolSpec;
pub use world::{SimWorld, WorldSnapshot};
