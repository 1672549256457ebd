// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Azure App Configuration simulation engine.
//!
//! Subscriptions hold resource groups, resource groups hold stores, and
//! stores hold key-value items addressed by `(key, label)`. Locked items
//! reject writes until unlocked.

mod ops;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vendorless_store::SimStore;

use crate::error::SimResult;
use crate::registry::{parse_args, to_response, ToolRegistry};
use crate::spec::ToolSpec;

pub use ops::StoreListItem;

/// Whole-engine state.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfigState {
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

/// One Azure subscription.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    #[serde(rename = "subscriptionId")]
    pub subscription_id: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(default)]
    pub resource_groups: Vec<ResourceGroup>,
}

/// One resource group inside a subscription.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceGroup {
    pub name: String,
    #[serde(default)]
    pub app_config_stores: Vec<AppConfigStore>,
}

/// One App Configuration store.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfigStore {
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub key_values: Vec<KeyValue>,
}

/// One key-value item. The `(key, label)` pair is the item's identity;
/// a missing label is the default label.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub etag: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default)]
    pub locked: bool,
}

/// App Configuration engine handle.
#[derive(Clone, Debug)]
pub struct AppConfigEngine {
    store: Arc<SimStore<AppConfigState>>,
}

#[derive(Debug, Deserialize)]
struct AccountListParams {
    subscription: String,
}

#[derive(Debug, Deserialize)]
struct KvListParams {
    subscription: String,
    account_name: String,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KvSetParams {
    subscription: String,
    account_name: String,
    key: String,
    value: String,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KvTargetParams {
    subscription: String,
    account_name: String,
    key: String,
    #[serde(default)]
    label: Option<String>,
}

impl AppConfigEngine {
    pub fn new(store: Arc<SimStore<AppConfigState>>) -> Self {
        Self { store }
    }

    /// Shared handle to the engine's store.
    pub fn store(&self) -> &Arc<SimStore<AppConfigState>> {
        &self.store
    }

    /// List every App Configuration store in a subscription.
    pub fn account_list(&self, subscription: &str) -> SimResult<Vec<StoreListItem>> {
        self.store
            .read(|state| ops::account_list(state, subscription))
    }

    /// List key-value items in a store, optionally filtered by key and label.
    pub fn kv_list(
        &self,
        subscription: &str,
        account_name: &str,
        key_filter: Option<&str>,
        label_filter: Option<&str>,
    ) -> SimResult<Vec<KeyValue>> {
        self.store.read(|state| {
            ops::kv_list(state, subscription, account_name, key_filter, label_filter)
        })
    }

    /// Create or update a key-value item. Locked items reject the write.
    pub fn kv_set(
        &self,
        subscription: &str,
        account_name: &str,
        key: &str,
        value: &str,
        label: Option<&str>,
    ) -> SimResult<KeyValue> {
        self.store.write(|state| {
            ops::kv_set(state, subscription, account_name, key, value, label)
        })
    }

    /// Mark a key-value item read-only.
    pub fn kv_lock(
        &self,
        subscription: &str,
        account_name: &str,
        key: &str,
        label: Option<&str>,
    ) -> SimResult<KeyValue> {
        self.store
            .write(|state| ops::kv_lock(state, subscription, account_name, key, label))
    }

    /// Clear the read-only flag on a key-value item.
    pub fn kv_unlock(
        &self,
        subscription: &str,
        account_name: &str,
        key: &str,
        label: Option<&str>,
    ) -> SimResult<KeyValue> {
        self.store
            .write(|state| ops::kv_unlock(state, subscription, account_name, key, label))
    }

    /// Delete a key-value item addressed by key and label.
    pub fn kv_delete(
        &self,
        subscription: &str,
        account_name: &str,
        key: &str,
        label: Option<&str>,
    ) -> SimResult<()> {
        self.store
            .write(|state| ops::kv_delete(state, subscription, account_name, key, label))
    }

    /// Register the engine's operations with their manifests.
    pub fn register_tools(&self, registry: &mut ToolRegistry) -> SimResult<()> {
        let engine = self.clone();
        registry.register(
            ToolSpec::new(
                "azmcp_appconfig_account_list",
                "List all App Configuration stores in a subscription.",
            )
            .required_string("subscription", "The subscription ID or display name."),
            Box::new(move |args| {
                let params: AccountListParams = parse_args(args)?;
                to_response(&engine.account_list(&params.subscription)?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new(
                "azmcp_appconfig_kv_list",
                "List key-values in an App Configuration store.",
            )
            .required_string("subscription", "The subscription ID or display name.")
            .required_string("account_name", "The App Configuration store name.")
            .optional_string("key", "Key filter; exact match or trailing '*' wildcard.")
            .optional_string("label", "Label filter; exact match or trailing '*' wildcard."),
            Box::new(move |args| {
                let params: KvListParams = parse_args(args)?;
                to_response(&engine.kv_list(
                    &params.subscription,
                    &params.account_name,
                    params.key.as_deref(),
                    params.label.as_deref(),
                )?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new(
                "azmcp_appconfig_kv_set",
                "Create or update a key-value in an App Configuration store.",
            )
            .required_string("subscription", "The subscription ID or display name.")
            .required_string("account_name", "The App Configuration store name.")
            .required_string("key", "The configuration key.")
            .required_string("value", "The value to store.")
            .optional_string("label", "The label to apply; omitted means the default label."),
            Box::new(move |args| {
                let params: KvSetParams = parse_args(args)?;
                to_response(&engine.kv_set(
                    &params.subscription,
                    &params.account_name,
                    &params.key,
                    &params.value,
                    params.label.as_deref(),
                )?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new(
                "azmcp_appconfig_kv_lock",
                "Lock a key-value in an App Configuration store.",
            )
            .required_string("subscription", "The subscription ID or display name.")
            .required_string("account_name", "The App Configuration store name.")
            .required_string("key", "The configuration key.")
            .optional_string("label", "The labeled version to lock."),
            Box::new(move |args| {
                let params: KvTargetParams = parse_args(args)?;
                to_response(&engine.kv_lock(
                    &params.subscription,
                    &params.account_name,
                    &params.key,
                    params.label.as_deref(),
                )?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new(
                "azmcp_appconfig_kv_unlock",
                "Unlock a key-value in an App Configuration store.",
            )
            .required_string("subscription", "The subscription ID or display name.")
            .required_string("account_name", "The App Configuration store name.")
            .required_string("key", "The configuration key.")
            .optional_string("label", "The labeled version to unlock."),
            Box::new(move |args| {
                let params: KvTargetParams = parse_args(args)?;
                to_response(&engine.kv_unlock(
                    &params.subscription,
                    &params.account_name,
                    &params.key,
                    params.label.as_deref(),
                )?)
            }),
        )?;

        let engine = self.clone();
        registry.register(
            ToolSpec::new(
                "azmcp_appconfig_kv_delete",
                "Delete a key-value from an App Configuration store.",
            )
            .required_string("subscription", "The subscription ID or display name.")
            .required_string("account_name", "The App Configuration store name.")
            .required_string("key", "The configuration key.")
            .optional_string("label", "The labeled version to delete."),
            Box::new(move |args| {
                let params: KvTargetParams = parse_args(args)?;
                engine.kv_delete(
                    &params.subscription,
                    &params.account_name,
                    &params.key,
                    params.label.as_deref(),
                )?;
                Ok(serde_json::json!({}))
            }),
        )
    }
}
