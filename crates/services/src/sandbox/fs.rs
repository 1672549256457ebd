// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem operations over the flat path map.

use chrono::{DateTime, Duration, Utc};
use glob::Pattern;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use super::{FileEntry, SandboxState};
use crate::error::{SimError, SimResult};

/// Files larger than this refuse to be read.
pub const MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;
/// Lines returned by a read when no limit is given.
const DEFAULT_READ_LINES: usize = 2000;
/// Per-line character cap; longer lines are cut with a truncation marker.
const MAX_LINE_CHARS: usize = 2000;

/// Directory names never descended into by searches.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "__pycache__", ".svn", ".hg"];

/// Result of a paginated text read.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadResult {
    pub size_bytes: u64,
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub total_lines: usize,
    pub is_truncated: bool,
}

/// Result of a file write.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteResult {
    pub message: String,
    pub file_path: String,
    pub is_new_file: bool,
    pub size_bytes: u64,
    pub lines_count: usize,
}

/// Result of a string replacement edit.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditResult {
    pub message: String,
    pub file_path: String,
    pub replacements_made: usize,
    pub is_new_file: bool,
}

/// One row of a directory listing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    pub size: u64,
    pub modified_time: String,
}

/// One content-search hit. Paths are workspace-relative.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrepMatch {
    pub file_path: String,
    pub line_number: usize,
    pub line: String,
}

pub fn read_file(
    state: &SandboxState,
    path: &str,
    offset: Option<usize>,
    limit: Option<usize>,
) -> SimResult<ReadResult> {
    if let Some(0) = limit {
        return Err(SimError::InvalidInput(
            "'limit' must be a positive integer if provided".to_string(),
        ));
    }
    let root = workspace_root(state)?;
    let resolved = resolve_path(path, root)?;

    if is_ignored(&resolved, root, &state.ignore_patterns) {
        let short = relative_to(&resolved, root);
        return Err(SimError::InvalidInput(format!(
            "File path '{}' is ignored by ignore pattern(s).",
            short
        )));
    }

    let entry = state
        .file_system
        .get(&resolved)
        .ok_or_else(|| SimError::NotFound(format!("File not found: {}", resolved)))?;
    if entry.is_directory {
        return Err(SimError::InvalidInput(format!(
            "Path is a directory, not a file: {}",
            resolved
        )));
    }
    if entry.size_bytes > MAX_FILE_BYTES {
        return Err(SimError::Validation(
            "File exceeds 20 MB size limit".to_string(),
        ));
    }

    let start = offset.unwrap_or(0);
    let max_lines = limit.unwrap_or(DEFAULT_READ_LINES);
    let total_lines = entry.content_lines.len();

    if start > 0 && start >= total_lines {
        return Err(SimError::InvalidInput(format!(
            "Offset ({}) is beyond the total number of lines ({}) in file: {}.",
            start, total_lines, path
        )));
    }

    let end = (start + max_lines).min(total_lines);
    let mut length_truncated = false;
    let mut body = String::new();
    for line in &entry.content_lines[start..end] {
        if line.chars().count() > MAX_LINE_CHARS {
            length_truncated = true;
            body.extend(line.chars().take(MAX_LINE_CHARS));
            body.push_str("... [truncated]\n");
        } else {
            body.push_str(line);
        }
    }

    let is_truncated = length_truncated || start > 0 || end < total_lines;
    let content = if is_truncated {
        format!(
            "[File content truncated: showing lines {}-{} of {} total lines. \
             Use offset/limit to view more.]\n{}",
            start + 1,
            end,
            total_lines,
            body
        )
    } else {
        body
    };

    Ok(ReadResult {
        size_bytes: entry.size_bytes,
        content,
        start_line: start + 1,
        end_line: if total_lines > 0 { end } else { 0 },
        total_lines,
        is_truncated,
    })
}

pub fn write_file(state: &mut SandboxState, path: &str, content: &str) -> SimResult<WriteResult> {
    if path.trim().is_empty() {
        return Err(SimError::InvalidInput(
            "'file_path' must be a non-empty string".to_string(),
        ));
    }
    let root = workspace_root(state)?.to_string();
    let resolved = resolve_path(path, &root)?;

    let is_new_file = match state.file_system.get(&resolved) {
        Some(entry) if entry.is_directory => {
            return Err(SimError::InvalidInput(format!(
                "Path is a directory, not a file: {}",
                resolved
            )))
        }
        Some(_) => false,
        None => true,
    };

    ensure_parent_dirs(state, &root, &resolved)?;

    let content_lines = split_keep_ends(content);
    let size_bytes = content.len() as u64;
    let lines_count = content_lines.len();
    state.file_system.insert(
        resolved.clone(),
        FileEntry {
            is_directory: false,
            content_lines,
            size_bytes,
            last_modified: now_iso(),
        },
    );

    let message = if is_new_file {
        format!("Successfully created and wrote to new file: {}.", resolved)
    } else {
        format!("Successfully overwrote file: {}.", resolved)
    };
    Ok(WriteResult {
        message,
        file_path: resolved,
        is_new_file,
        size_bytes,
        lines_count,
    })
}

pub fn edit_file(
    state: &mut SandboxState,
    path: &str,
    old: &str,
    new: &str,
    expected_replacements: Option<usize>,
) -> SimResult<EditResult> {
    if path.trim().is_empty() {
        return Err(SimError::InvalidInput(
            "'file_path' must be a non-empty string".to_string(),
        ));
    }
    if let Some(0) = expected_replacements {
        return Err(SimError::InvalidInput(
            "'expected_replacements' must be a positive integer if provided".to_string(),
        ));
    }
    let expected = expected_replacements.unwrap_or(1);
    let root = workspace_root(state)?.to_string();
    let resolved = resolve_path(path, &root)?;

    let (current, is_new_file) = match state.file_system.get(&resolved) {
        Some(entry) if entry.is_directory => {
            return Err(SimError::InvalidInput(format!(
                "Path '{}' is a directory, not a file",
                resolved
            )))
        }
        Some(entry) => {
            if old.is_empty() {
                return Err(SimError::Conflict(format!(
                    "File '{}' already exists. Cannot create existing file.",
                    resolved
                )));
            }
            (entry.content_lines.concat(), false)
        }
        None => {
            if !old.is_empty() {
                return Err(SimError::NotFound(format!(
                    "File '{}' not found. Use empty old_string to create new file.",
                    resolved
                )));
            }
            (String::new(), true)
        }
    };

    let (new_content, occurrences) = if is_new_file {
        (new.to_string(), 0)
    } else {
        let occurrences = current.matches(old).count();
        if occurrences != expected {
            let term = if expected == 1 { "occurrence" } else { "occurrences" };
            return Err(SimError::InvalidInput(format!(
                "Expected {} {} but found {} for old_string in '{}'",
                expected, term, occurrences, path
            )));
        }
        (current.replace(old, new), occurrences)
    };

    ensure_parent_dirs(state, &root, &resolved)?;

    let content_lines = split_keep_ends(&new_content);
    state.file_system.insert(
        resolved.clone(),
        FileEntry {
            is_directory: false,
            size_bytes: new_content.len() as u64,
            content_lines,
            last_modified: now_iso(),
        },
    );

    let basename = resolved.rsplit('/').next().unwrap_or(&resolved).to_string();
    let message = if is_new_file {
        format!("Created file '{}'", basename)
    } else {
        format!("Modified file '{}' ({} replacements)", basename, occurrences)
    };
    Ok(EditResult {
        message,
        file_path: resolved,
        replacements_made: occurrences,
        is_new_file,
    })
}

pub fn list_directory(
    state: &SandboxState,
    path: &str,
    ignore: Option<&[String]>,
) -> SimResult<Vec<DirEntry>> {
    let root = workspace_root(state)?;
    let resolved = resolve_path(path, root)?;

    let entry = state
        .file_system
        .get(&resolved)
        .ok_or_else(|| SimError::NotFound(format!("Directory not found: {}", resolved)))?;
    if !entry.is_directory {
        return Err(SimError::InvalidInput(format!(
            "Not a directory: {}",
            resolved
        )));
    }

    let mut entries: Vec<DirEntry> = state
        .file_system
        .iter()
        .filter(|(child, _)| *child != &resolved && parent_of(child) == resolved)
        .filter_map(|(child, meta)| {
            let name = child.rsplit('/').next()?.to_string();
            let skipped = ignore
                .unwrap_or(&[])
                .iter()
                .any(|pat| Pattern::new(pat).map(|p| p.matches(&name)).unwrap_or(false));
            if skipped {
                return None;
            }
            Some(DirEntry {
                name,
                path: child.clone(),
                is_directory: meta.is_directory,
                size: meta.size_bytes,
                modified_time: meta.last_modified.clone(),
            })
        })
        .collect();

    // Directories first, then alphabetical.
    entries.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}

pub fn glob_search(
    state: &SandboxState,
    pattern: &str,
    path: Option<&str>,
) -> SimResult<Vec<String>> {
    if pattern.trim().is_empty() {
        return Err(SimError::InvalidInput(
            "'pattern' must be a non-empty string".to_string(),
        ));
    }
    let root = workspace_root(state)?;
    let search_path = match path {
        Some(p) => resolve_path(p, root)?,
        None => root.to_string(),
    };
    check_search_dir(state, &search_path)?;

    let matcher = Pattern::new(pattern)
        .map_err(|e| SimError::InvalidInput(format!("Invalid glob pattern: {}. Error: {}", pattern, e)))?;

    let mut hits: Vec<(&String, &FileEntry)> = state
        .file_system
        .iter()
        .filter(|(p, meta)| {
            !meta.is_directory
                && within(p, &search_path)
                && matcher.matches(&relative_to(p, &search_path))
        })
        .collect();

    // Files touched within the last day sort newest-first; the rest sort
    // alphabetically after them.
    let cutoff = Utc::now() - Duration::days(1);
    hits.sort_by(|(path_a, meta_a), (path_b, meta_b)| {
        let key = |p: &str, m: &FileEntry| {
            let modified = parse_timestamp(&m.last_modified);
            match modified {
                Some(t) if t >= cutoff => (0, -t.timestamp_millis(), String::new()),
                _ => (1, 0, p.to_lowercase()),
            }
        };
        key(path_a, meta_a).cmp(&key(path_b, meta_b))
    });

    Ok(hits.into_iter().map(|(p, _)| p.clone()).collect())
}

pub fn grep_search(
    state: &SandboxState,
    pattern: &str,
    path: Option<&str>,
    include: Option<&str>,
) -> SimResult<Vec<GrepMatch>> {
    if pattern.trim().is_empty() {
        return Err(SimError::InvalidInput(
            "'pattern' must be a non-empty string".to_string(),
        ));
    }
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            SimError::InvalidInput(format!(
                "Invalid regular expression pattern: {}. Error: {}",
                pattern, e
            ))
        })?;

    let root = workspace_root(state)?;
    let search_path = match path {
        Some(p) => resolve_path(p, root)?,
        None => root.to_string(),
    };
    check_search_dir(state, &search_path)?;

    let include_patterns = include.map(expand_braces).unwrap_or_default();

    let mut matches = Vec::new();
    for (file_path, meta) in &state.file_system {
        if meta.is_directory || !within(file_path, &search_path) {
            continue;
        }
        let relative = relative_to(file_path, &search_path);
        if relative
            .split('/')
            .any(|part| SKIPPED_DIRS.contains(&part))
        {
            continue;
        }
        if !include_patterns.is_empty() {
            let basename = file_path.rsplit('/').next().unwrap_or(file_path);
            let included = include_patterns.iter().any(|pat| {
                Pattern::new(pat)
                    .map(|p| p.matches(basename) || p.matches(&relative))
                    .unwrap_or(false)
            });
            if !included {
                continue;
            }
        }

        let content = meta.content_lines.concat();
        for (idx, line) in content.lines().enumerate() {
            if regex.is_match(line) {
                matches.push(GrepMatch {
                    file_path: relative_to(file_path, root),
                    line_number: idx + 1,
                    line: line.to_string(),
                });
            }
        }
    }

    matches.sort_by(|a, b| {
        a.file_path
            .cmp(&b.file_path)
            .then_with(|| a.line_number.cmp(&b.line_number))
    });
    Ok(matches)
}

fn workspace_root(state: &SandboxState) -> SimResult<&str> {
    if state.workspace_root.is_empty() {
        return Err(SimError::Validation(
            "Workspace root is not configured.".to_string(),
        ));
    }
    Ok(&state.workspace_root)
}

/// Resolve a possibly-relative path against the workspace root, normalizing
/// `.` and `..` components, and refuse anything that escapes the root.
fn resolve_path(path: &str, root: &str) -> SimResult<String> {
    let joined = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("{}/{}", root.trim_end_matches('/'), path)
    };

    let mut parts: Vec<&str> = Vec::new();
    for part in joined.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    let resolved = format!("/{}", parts.join("/"));

    if !within(&resolved, root) {
        return Err(SimError::InvalidInput(
            "Path resolves outside workspace root".to_string(),
        ));
    }
    Ok(resolved)
}

fn within(path: &str, root: &str) -> bool {
    let root = root.trim_end_matches('/');
    path == root || path.starts_with(&format!("{}/", root))
}

fn relative_to(path: &str, base: &str) -> String {
    path.strip_prefix(base)
        .map(|rest| rest.trim_start_matches('/').to_string())
        .unwrap_or_else(|| path.to_string())
}

fn parent_of(path: &str) -> String {
    match path.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

fn is_ignored(path: &str, root: &str, patterns: &[String]) -> bool {
    let relative = relative_to(path, root);
    let basename = path.rsplit('/').next().unwrap_or(path);
    patterns.iter().any(|pat| {
        Pattern::new(pat)
            .map(|p| p.matches(&relative) || p.matches(basename))
            .unwrap_or(false)
    })
}

fn check_search_dir(state: &SandboxState, search_path: &str) -> SimResult<()> {
    let entry = state.file_system.get(search_path).ok_or_else(|| {
        SimError::NotFound(format!("Search path does not exist: {}", search_path))
    })?;
    if !entry.is_directory {
        return Err(SimError::InvalidInput(format!(
            "Search path is not a directory: {}",
            search_path
        )));
    }
    Ok(())
}

/// Create every missing ancestor directory of `path` inside the workspace.
fn ensure_parent_dirs(state: &mut SandboxState, root: &str, path: &str) -> SimResult<()> {
    let root = root.trim_end_matches('/');
    let parent = parent_of(path);
    if parent == root || parent.is_empty() {
        return Ok(());
    }

    let relative = relative_to(&parent, root);
    let mut current = root.to_string();
    for part in relative.split('/').filter(|p| !p.is_empty()) {
        current = format!("{}/{}", current, part);
        match state.file_system.get(&current) {
            Some(entry) if !entry.is_directory => {
                return Err(SimError::InvalidInput(format!(
                    "Cannot create directory '{}': path exists as a file",
                    current
                )));
            }
            Some(_) => {}
            None => {
                state.file_system.insert(
                    current.clone(),
                    FileEntry {
                        is_directory: true,
                        content_lines: Vec::new(),
                        size_bytes: 0,
                        last_modified: now_iso(),
                    },
                );
            }
        }
    }
    Ok(())
}

/// Split content into lines that keep their trailing newline, so the
/// concatenation of the lines is exactly the original content.
fn split_keep_ends(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut start = 0;
    for (idx, ch) in content.char_indices() {
        if ch == '\n' {
            lines.push(content[start..=idx].to_string());
            start = idx + 1;
        }
    }
    if start < content.len() {
        lines.push(content[start..].to_string());
    }
    lines
}

/// Expand a single `{a,b}` brace group into separate glob patterns.
fn expand_braces(pattern: &str) -> Vec<String> {
    if let (Some(start), Some(end)) = (pattern.find('{'), pattern.find('}')) {
        if start < end {
            let prefix = &pattern[..start];
            let suffix = &pattern[end + 1..];
            return pattern[start + 1..end]
                .split(',')
                .map(|alt| format!("{}{}{}", prefix, alt.trim(), suffix))
                .collect();
        }
    }
    vec![pattern.to_string()]
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
