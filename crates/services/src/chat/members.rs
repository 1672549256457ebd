// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Membership listing: parent validation, filtering, pagination.

use serde::{Deserialize, Serialize};

use super::{ChatState, Membership};
use crate::error::{SimError, SimResult};
use crate::filter::{apply_filters, parse_filter, FieldKind, FieldMap};

/// Page size applied when the caller passes none.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Response shape for a membership listing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListMembershipsResponse {
    pub memberships: Vec<Membership>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Whitelisted filter fields for membership listings.
fn membership_fields() -> FieldMap {
    FieldMap::new()
        .field("role", "role", FieldKind::Text)
        .field("member.type", "member.type", FieldKind::Text)
        .field("create_time", "create_time", FieldKind::Timestamp)
}

pub fn list_memberships(
    state: &ChatState,
    parent: &str,
    page_size: Option<u32>,
    page_token: Option<&str>,
    filter: Option<&str>,
) -> SimResult<ListMembershipsResponse> {
    validate_parent(parent)?;

    let page_size = match page_size {
        None => DEFAULT_PAGE_SIZE,
        Some(ps) if (1..=MAX_PAGE_SIZE).contains(&ps) => ps,
        Some(_) => {
            return Err(SimError::InvalidInput(
                "Argument 'pageSize' must be between 1 and 1000, inclusive, if provided."
                    .to_string(),
            ))
        }
    };

    let offset: usize = match page_token {
        None | Some("") => 0,
        Some(token) => token.parse().map_err(|_| {
            SimError::InvalidInput("Argument 'pageToken' is not a valid page token.".to_string())
        })?,
    };

    let space = state
        .spaces
        .get(parent)
        .ok_or_else(|| SimError::NotFound(format!("Space '{}' not found.", parent)))?;

    let exprs = match filter {
        Some(text) => parse_filter(text)?,
        None => Vec::new(),
    };

    let records: Vec<serde_json::Value> = space
        .memberships
        .iter()
        .map(|m| serde_json::to_value(m))
        .collect::<Result<_, _>>()
        .map_err(|e| SimError::Service(format!("Failed to serialize memberships: {}", e)))?;
    let kept = apply_filters(&records, &exprs, &membership_fields())?;

    let matched: Vec<Membership> = kept
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .map_err(|e| SimError::Service(format!("Failed to deserialize memberships: {}", e)))?;

    let page: Vec<Membership> = matched
        .iter()
        .skip(offset)
        .take(page_size as usize)
        .cloned()
        .collect();
    let next_offset = offset + page.len();
    let next_page_token = if next_offset < matched.len() {
        Some(next_offset.to_string())
    } else {
        None
    };

    Ok(ListMembershipsResponse {
        memberships: page,
        next_page_token,
    })
}

pub fn get_membership(state: &ChatState, name: &str) -> SimResult<Membership> {
    if name.trim().is_empty() {
        return Err(SimError::InvalidInput(
            "Argument 'name' cannot be empty.".to_string(),
        ));
    }
    let parts: Vec<&str> = name.split('/').collect();
    let valid_shape = parts.len() == 4
        && parts[0] == "spaces"
        && !parts[1].is_empty()
        && parts[2] == "members"
        && !parts[3].is_empty();
    if !valid_shape {
        return Err(SimError::InvalidInput(format!(
            "Invalid membership name: '{}'. Expected 'spaces/{{space}}/members/{{member}}'.",
            name
        )));
    }

    let parent = format!("{}/{}", parts[0], parts[1]);
    let space = state
        .spaces
        .get(&parent)
        .ok_or_else(|| SimError::NotFound(format!("Space '{}' not found.", parent)))?;

    space
        .memberships
        .iter()
        .find(|m| m.name == name)
        .cloned()
        .ok_or_else(|| SimError::NotFound(format!("Membership '{}' not found.", name)))
}

fn validate_parent(parent: &str) -> SimResult<()> {
    if parent.is_empty() {
        return Err(SimError::InvalidInput(
            "Argument 'parent' cannot be empty.".to_string(),
        ));
    }
    let Some(space_id) = parent.strip_prefix("spaces/") else {
        return Err(SimError::InvalidInput(format!(
            "Invalid parent format: '{}'. Expected 'spaces/{{space}}'.",
            parent
        )));
    };
    if space_id.is_empty() {
        return Err(SimError::InvalidInput(format!(
            "Invalid parent format: '{}'. Space ID is missing after 'spaces/'.",
            parent
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "members_tests.rs"]
mod tests;
