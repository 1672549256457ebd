// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sandboxed fake filesystem engine.
//!
//! A flat map of absolute path strings to entries stands in for a real
//! filesystem. Every operation resolves its path against the configured
//! workspace root and refuses anything that escapes it.

mod fs;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vendorless_store::SimStore;

use crate::error::SimResult;
use crate::registry::{parse_args, to_response, ToolRegistry};
use crate::spec::ToolSpec;

pub use fs::{DirEntry, EditResult, GrepMatch, ReadResult, WriteResult, MAX_FILE_BYTES};

/// Whole-engine state: the workspace root, ignore patterns, and the flat
/// path-to-entry map.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SandboxState {
    #[serde(default)]
    pub workspace_root: String,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default)]
    pub file_system: BTreeMap<String, FileEntry>,
}

/// One filesystem entry. Lines keep their trailing newlines so joining
/// them reproduces the file content exactly.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    #[serde(default)]
    pub is_directory: bool,
    #[serde(default)]
    pub content_lines: Vec<String>,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub last_modified: String,
}

/// Sandbox engine handle.
#[derive(Clone, Debug)]
pub struct SandboxEngine {
    store: Arc<SimStore<SandboxState>>,
}

#[derive(Debug, Deserialize)]
struct ReadFileParams {
    path: String,
    #[serde(default)]
    offset: Option<usize>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct WriteFileParams {
    file_path: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct EditFileParams {
    file_path: String,
    old_string: String,
    new_string: String,
    #[serde(default)]
    expected_replacements: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ListDirectoryParams {
    path: String,
    #[serde(default)]
    ignore: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct GlobParams {
    pattern: String,
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GrepParams {
    pattern: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    include: Option<String>,
}

impl SandboxEngine {
    pub fn new(store: Arc<SimStore<SandboxState>>) -> Self {
        Self { store }
    }

    /// Shared handle to the engine's store.
    pub fn store(&self) -> &Arc<SimStore<SandboxState>> {
        &self.store
    }

    /// Read a text file with line pagination.
    pub fn read_file(
        &self,
        path: &str,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> SimResult<ReadResult> {
        self.store
            .read(|state| fs::read_file(state, path, offset, limit))
    }

    /// Create or overwrite a file, creating parent directories as needed.
    pub fn write_file(&self, path: &str, content: &str) -> SimResult<WriteResult> {
        self.store.write(|state| fs::write_file(state, path, content))
    }

    /// Literal substring replacement; an empty `old` creates the file.
    pub fn edit_file(
        &self,
        path: &str,
        old: &str,
        new: &str,
        expected_replacements: Option<usize>,
    ) -> SimResult<EditResult> {
        self.store
            .write(|state| fs::edit_file(state, path, old, new, expected_replacements))
    }

    /// List the immediate children of a directory.
    pub fn list_directory(
        &self,
        path: &str,
        ignore: Option<&[String]>,
    ) -> SimResult<Vec<DirEntry>> {
        self.store
            .read(|state| fs::list_directory(state, path, ignore))
    }

    /// Glob over file paths under a directory.
    pub fn glob_search(&self, pattern: &str, path: Option<&str>) -> SimResult<Vec<String>> {
        self.store
            .read(|state| fs::glob_search(state, pattern, path))
    }

    /// Regex search over file contents under a directory.
    pub fn grep_search(
        &self,
        pattern: &str,
        path: Option<&str>,
        include: Option<&str>,
    ) -> SimResult<Vec<GrepMatch>> {
        self.store
            .read(|state| fs::grep_search(state, pattern, path, include))
    }

    /// Register the engine's operations with their manifests.
    pub fn register_tools(&self, registry: &mut ToolRegistry) -> SimResult<()> {
        let engine = self.clone();
        registry.register(
            ToolSpec::new("read_file", "Read a text file from the workspace.")
                .required_string("path", "File path, absolute or relative to the workspace root.")
                .optional_integer("offset", "0-based line number to start reading from.")
                .optional_integer("limit", "Maximum number of lines to read (default 2000)."),
            Box::new(move |args| {
                let params: ReadFileParams = parse_args(args)?;
                to_response(&engine.read_file(&params.path, params.offset, params.limit)?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new(
                "write_file",
                "Write content to a file, creating parent directories if needed.",
            )
            .required_string("file_path", "File path, absolute or relative to the workspace root.")
            .required_string("content", "The content to write; replaces any existing content."),
            Box::new(move |args| {
                let params: WriteFileParams = parse_args(args)?;
                to_response(&engine.write_file(&params.file_path, &params.content)?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new("replace", "Replace a literal string within a file.")
                .required_string("file_path", "File path, absolute or relative to the workspace root.")
                .required_string("old_string", "Exact text to replace; empty creates a new file.")
                .required_string("new_string", "Replacement text.")
                .optional_integer("expected_replacements", "Required occurrence count (default 1)."),
            Box::new(move |args| {
                let params: EditFileParams = parse_args(args)?;
                to_response(&engine.edit_file(
                    &params.file_path,
                    &params.old_string,
                    &params.new_string,
                    params.expected_replacements,
                )?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new("list_directory", "List the immediate children of a directory.")
                .required_string("path", "Directory path, absolute or relative to the workspace root.")
                .optional_array("ignore", "Glob patterns for names to skip."),
            Box::new(move |args| {
                let params: ListDirectoryParams = parse_args(args)?;
                to_response(&engine.list_directory(&params.path, params.ignore.as_deref())?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new("glob", "Find files matching a glob pattern.")
                .required_string("pattern", "Glob pattern matched against workspace-relative paths.")
                .optional_string("path", "Directory to search under; defaults to the workspace root."),
            Box::new(move |args| {
                let params: GlobParams = parse_args(args)?;
                to_response(&engine.glob_search(&params.pattern, params.path.as_deref())?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new(
                "search_file_content",
                "Search file contents for a regular expression.",
            )
            .required_string("pattern", "The regular expression to search for.")
            .optional_string("path", "Directory to search under; defaults to the workspace root.")
            .optional_string("include", "Glob pattern limiting which files are searched."),
            Box::new(move |args| {
                let params: GrepParams = parse_args(args)?;
                to_response(&engine.grep_search(
                    &params.pattern,
                    params.path.as_deref(),
                    params.include.as_deref(),
                )?)
            }),
        )
    }
}
