// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Google Chat simulation engine.
//!
//! Spaces keyed by resource name (`spaces/{space}`), each holding the
//! memberships the listing operations filter and paginate.

mod members;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vendorless_store::SimStore;

use crate::error::SimResult;
use crate::registry::{parse_args, to_response, ToolRegistry};
use crate::spec::ToolSpec;

pub use members::{ListMembershipsResponse, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Whole-engine state: spaces keyed by resource name.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatState {
    #[serde(default)]
    pub spaces: BTreeMap<String, Space>,
}

/// One chat space.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Space {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub space_type: String,
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

/// One membership record (`spaces/{space}/members/{member}`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Membership {
    pub name: String,
    pub role: String,
    pub member: Member,
    pub create_time: String,
    #[serde(default)]
    pub state: String,
}

/// Member details inside a membership.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: String,
}

/// Chat engine handle.
#[derive(Clone, Debug)]
pub struct ChatEngine {
    store: Arc<SimStore<ChatState>>,
}

#[derive(Debug, Deserialize)]
struct ListMembershipsParams {
    parent: String,
    #[serde(default)]
    page_size: Option<u32>,
    #[serde(default)]
    page_token: Option<String>,
    #[serde(default)]
    filter: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetMembershipParams {
    name: String,
}

impl ChatEngine {
    pub fn new(store: Arc<SimStore<ChatState>>) -> Self {
        Self { store }
    }

    /// Shared handle to the engine's store.
    pub fn store(&self) -> &Arc<SimStore<ChatState>> {
        &self.store
    }

    /// List memberships of a space, filtered and paginated.
    pub fn list_memberships(
        &self,
        parent: &str,
        page_size: Option<u32>,
        page_token: Option<&str>,
        filter: Option<&str>,
    ) -> SimResult<ListMembershipsResponse> {
        self.store
            .read(|state| members::list_memberships(state, parent, page_size, page_token, filter))
    }

    /// Fetch one membership by full resource name.
    pub fn get_membership(&self, name: &str) -> SimResult<Membership> {
        self.store.read(|state| members::get_membership(state, name))
    }

    /// Register the engine's operations with their manifests.
    pub fn register_tools(&self, registry: &mut ToolRegistry) -> SimResult<()> {
        let engine = self.clone();
        registry.register(
            ToolSpec::new(
                "chat_list_memberships",
                "List memberships in a space, with optional filtering and pagination.",
            )
            .required_string("parent", "The space resource name, e.g. 'spaces/AAA'.")
            .optional_integer("page_size", "Maximum memberships to return (1-1000, default 100).")
            .optional_string("page_token", "Page token from a previous call.")
            .optional_string(
                "filter",
                "Filter expression over 'role', 'member.type', and 'create_time'.",
            ),
            Box::new(move |args| {
                let params: ListMembershipsParams = parse_args(args)?;
                to_response(&engine.list_memberships(
                    &params.parent,
                    params.page_size,
                    params.page_token.as_deref(),
                    params.filter.as_deref(),
                )?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new("chat_get_membership", "Fetch one membership by resource name.")
                .required_string(
                    "name",
                    "The membership resource name, e.g. 'spaces/AAA/members/111'.",
                ),
            Box::new(move |args| {
                let params: GetMembershipParams = parse_args(args)?;
                to_response(&engine.get_membership(&params.name)?)
            }),
        )
    }
}
