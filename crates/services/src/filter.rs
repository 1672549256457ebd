// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Expression-based filtering over resource objects.
//!
//! A filter is a list of `(field, operator, value)` triples combined with
//! implicit AND — template matching, not a query planner. Field names are
//! trimmed, lowercased, and mapped through a per-call whitelist to a resource
//! attribute path; fields outside the whitelist always match, so unsupported
//! filters silently pass every record.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::error::{SimError, SimResult};

/// Regex for one filter clause: `field op value` with an optionally quoted value.
static CLAUSE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"^\s*([\w.]+)\s*(!=|<=|>=|=|<|>|:)\s*"?([^"]*?)"?\s*$"#)
        .expect("clause regex pattern is invalid")
});

/// Regex splitting a filter string on the AND connective.
static AND_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)\s+AND\s+").expect("AND regex pattern is invalid")
});

/// Comparison operator in a filter triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    /// `=` equality.
    Eq,
    /// `!=` inequality.
    Ne,
    /// `:` substring match (HAS).
    Has,
    /// `<` — timestamp fields only.
    Lt,
    /// `<=` — timestamp fields only.
    Le,
    /// `>` — timestamp fields only.
    Gt,
    /// `>=` — timestamp fields only.
    Ge,
}

impl FilterOp {
    fn parse(token: &str) -> SimResult<Self> {
        match token {
            "=" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            ":" => Ok(Self::Has),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            other => Err(SimError::InvalidInput(format!(
                "Unsupported filter operator: '{}'.",
                other
            ))),
        }
    }

    fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }
}

/// One `(field, operator, value)` triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterExpr {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

/// How a whitelisted field's values are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Timestamp,
}

/// Whitelist mapping normalized filter field names to record attributes.
#[derive(Clone, Debug, Default)]
pub struct FieldMap {
    entries: HashMap<String, (String, FieldKind)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whitelist `name`, resolving to the dotted attribute `path`.
    pub fn field(mut self, name: &str, path: &str, kind: FieldKind) -> Self {
        self.entries
            .insert(name.trim().to_lowercase(), (path.to_string(), kind));
        self
    }

    fn resolve(&self, name: &str) -> Option<&(String, FieldKind)> {
        self.entries.get(&name.trim().to_lowercase())
    }
}

/// Parse a filter string into triples.
///
/// Clauses are joined with `AND` (case-insensitive); each clause is
/// `field op value` with an optionally double-quoted value. A malformed
/// clause or an operator outside the supported set is an error.
pub fn parse_filter(text: &str) -> SimResult<Vec<FilterExpr>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut exprs = Vec::new();
    for clause in AND_REGEX.split(trimmed) {
        let caps = CLAUSE_REGEX.captures(clause).ok_or_else(|| {
            SimError::InvalidInput(format!("Invalid filter expression: '{}'.", clause.trim()))
        })?;
        exprs.push(FilterExpr {
            field: caps[1].to_string(),
            op: FilterOp::parse(&caps[2])?,
            value: caps[3].to_string(),
        });
    }
    Ok(exprs)
}

/// Keep the records for which every triple evaluates true.
///
/// An empty expression list returns all records unchanged; an unknown field
/// name never excludes a record.
pub fn apply_filters(
    records: &[serde_json::Value],
    exprs: &[FilterExpr],
    fields: &FieldMap,
) -> SimResult<Vec<serde_json::Value>> {
    let mut kept = Vec::new();
    for record in records {
        if matches_record(record, exprs, fields)? {
            kept.push(record.clone());
        }
    }
    Ok(kept)
}

/// Evaluate all triples against one record (implicit AND).
pub fn matches_record(
    record: &serde_json::Value,
    exprs: &[FilterExpr],
    fields: &FieldMap,
) -> SimResult<bool> {
    for expr in exprs {
        let Some((path, kind)) = fields.resolve(&expr.field) else {
            // Unknown fields are "always true", not an error.
            continue;
        };
        if !evaluate(record, path, *kind, expr)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn evaluate(
    record: &serde_json::Value,
    path: &str,
    kind: FieldKind,
    expr: &FilterExpr,
) -> SimResult<bool> {
    if expr.op.is_ordering() && kind != FieldKind::Timestamp {
        return Err(SimError::InvalidInput(format!(
            "Operator '{}' is not supported for field '{}'.",
            ordering_token(expr.op),
            expr.field
        )));
    }

    let Some(actual) = lookup(record, path) else {
        // A record missing the attribute never matches.
        return Ok(false);
    };

    match kind {
        FieldKind::Text => {
            let actual = json_as_string(actual);
            Ok(match expr.op {
                FilterOp::Eq => actual == expr.value,
                FilterOp::Ne => actual != expr.value,
                FilterOp::Has => actual.to_lowercase().contains(&expr.value.to_lowercase()),
                _ => false,
            })
        }
        FieldKind::Bool => {
            let wanted = parse_bool(&expr.value).ok_or_else(|| {
                SimError::InvalidInput(format!(
                    "Value '{}' for field '{}' must be 'true' or 'false'.",
                    expr.value, expr.field
                ))
            })?;
            let actual = match actual {
                serde_json::Value::Bool(b) => *b,
                other => match parse_bool(&json_as_string(other)) {
                    Some(b) => b,
                    None => return Ok(false),
                },
            };
            Ok(match expr.op {
                FilterOp::Eq | FilterOp::Has => actual == wanted,
                FilterOp::Ne => actual != wanted,
                _ => false,
            })
        }
        FieldKind::Timestamp => {
            let actual = parse_timestamp(&json_as_string(actual), &expr.field)?;
            let wanted = parse_timestamp(&expr.value, &expr.field)?;
            Ok(match expr.op {
                FilterOp::Eq => actual == wanted,
                FilterOp::Ne => actual != wanted,
                FilterOp::Lt => actual < wanted,
                FilterOp::Le => actual <= wanted,
                FilterOp::Gt => actual > wanted,
                FilterOp::Ge => actual >= wanted,
                FilterOp::Has => false,
            })
        }
    }
}

fn ordering_token(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Lt => "<",
        FilterOp::Le => "<=",
        FilterOp::Gt => ">",
        FilterOp::Ge => ">=",
        FilterOp::Eq => "=",
        FilterOp::Ne => "!=",
        FilterOp::Has => ":",
    }
}

fn lookup<'a>(record: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

fn json_as_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_timestamp(text: &str, field: &str) -> SimResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text.trim()).map_err(|_| {
        SimError::InvalidInput(format!(
            "Value '{}' for field '{}' is not a valid RFC 3339 timestamp.",
            text.trim(),
            field
        ))
    })
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
