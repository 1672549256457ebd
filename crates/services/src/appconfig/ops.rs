// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! App Configuration operations over the engine state.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AppConfigState, AppConfigStore, KeyValue, Subscription};
use crate::error::{SimError, SimResult};

/// Summary row returned by the account listing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreListItem {
    pub name: String,
    pub id: String,
    pub location: String,
}

pub fn account_list(state: &AppConfigState, subscription: &str) -> SimResult<Vec<StoreListItem>> {
    if subscription.trim().is_empty() {
        return Err(SimError::Validation(
            "Subscription ID or name must be provided.".to_string(),
        ));
    }
    let sub = find_subscription(state, subscription).ok_or_else(|| {
        SimError::SubscriptionNotFound(format!("Subscription '{}' not found.", subscription))
    })?;

    Ok(sub
        .resource_groups
        .iter()
        .flat_map(|rg| rg.app_config_stores.iter())
        .map(|store| StoreListItem {
            name: store.name.clone(),
            id: store.id.clone(),
            location: store.location.clone(),
        })
        .collect())
}

pub fn kv_list(
    state: &AppConfigState,
    subscription: &str,
    account_name: &str,
    key_filter: Option<&str>,
    label_filter: Option<&str>,
) -> SimResult<Vec<KeyValue>> {
    if subscription.is_empty() {
        return Err(SimError::InvalidInput(
            "Subscription ID or name must be provided.".to_string(),
        ));
    }
    if account_name.is_empty() {
        return Err(SimError::InvalidInput(
            "App Configuration store name (account_name) must be provided.".to_string(),
        ));
    }

    let sub = find_subscription(state, subscription).ok_or_else(|| {
        SimError::SubscriptionNotFound(format!("Subscription '{}' not found.", subscription))
    })?;
    let store = find_store(sub, account_name).ok_or_else(|| {
        store_not_found(account_name, subscription)
    })?;

    Ok(store
        .key_values
        .iter()
        .filter(|kv| {
            key_filter.is_none_or(|f| key_matches(&kv.key, f))
                && label_filter.is_none_or(|f| label_matches(kv.label.as_deref(), f))
        })
        .cloned()
        .collect())
}

pub fn kv_set(
    state: &mut AppConfigState,
    subscription: &str,
    account_name: &str,
    key: &str,
    value: &str,
    label: Option<&str>,
) -> SimResult<KeyValue> {
    if subscription.trim().is_empty() {
        return Err(SimError::InvalidInput(
            "Subscription ID or name must be provided as a non-empty string.".to_string(),
        ));
    }
    if account_name.trim().is_empty() {
        return Err(SimError::InvalidInput(
            "App Configuration store name (account_name) must be provided as a non-empty string."
                .to_string(),
        ));
    }
    if key.trim().is_empty() {
        return Err(SimError::InvalidInput(
            "Configuration key must be provided as a non-empty string.".to_string(),
        ));
    }

    let sub = find_subscription_mut(state, subscription).ok_or_else(|| {
        SimError::NotFound(format!("Subscription '{}' not found.", subscription))
    })?;
    let store = find_store_mut(sub, account_name)
        .ok_or_else(|| store_not_found(account_name, subscription))?;

    if let Some(existing) = find_kv_mut(store, key, label) {
        if existing.locked {
            let display = label.map_or("(No Label)".to_string(), |l| format!("'{}'", l));
            return Err(SimError::Conflict(format!(
                "The key-value '{}' with label {} is locked and cannot be modified.",
                key, display
            )));
        }
        existing.value = value.to_string();
        existing.etag = new_etag();
        existing.last_modified = now_iso();
        return Ok(existing.clone());
    }

    let item = KeyValue {
        key: key.to_string(),
        value: value.to_string(),
        label: label.map(str::to_string),
        content_type: None,
        etag: new_etag(),
        last_modified: now_iso(),
        locked: false,
    };
    store.key_values.push(item.clone());
    Ok(item)
}

pub fn kv_lock(
    state: &mut AppConfigState,
    subscription: &str,
    account_name: &str,
    key: &str,
    label: Option<&str>,
) -> SimResult<KeyValue> {
    if subscription.is_empty() {
        return Err(SimError::InvalidInput(
            "Parameter 'subscription' cannot be empty.".to_string(),
        ));
    }
    if account_name.is_empty() {
        return Err(SimError::InvalidInput(
            "Parameter 'account_name' cannot be empty.".to_string(),
        ));
    }
    if key.is_empty() {
        return Err(SimError::InvalidInput(
            "Parameter 'key' cannot be empty.".to_string(),
        ));
    }

    let sub = find_subscription_mut(state, subscription).ok_or_else(|| {
        SimError::NotFound(format!("Subscription '{}' not found.", subscription))
    })?;
    let store = find_store_mut(sub, account_name)
        .ok_or_else(|| store_not_found(account_name, subscription))?;

    let display = label.map_or("'None'".to_string(), |l| format!("'{}'", l));
    let Some(item) = find_kv_mut(store, key, label) else {
        return Err(SimError::NotFound(format!(
            "Key-value item with key '{}' and label {} not found in App Configuration store '{}'.",
            key, display, account_name
        )));
    };

    if item.locked {
        return Err(SimError::Conflict(format!(
            "Key-value item with key '{}' and label {} is already locked.",
            key, display
        )));
    }

    item.locked = true;
    item.last_modified = now_iso();
    item.etag = new_etag();
    Ok(item.clone())
}

pub fn kv_unlock(
    state: &mut AppConfigState,
    subscription: &str,
    account_name: &str,
    key: &str,
    label: Option<&str>,
) -> SimResult<KeyValue> {
    if account_name.trim().is_empty() {
        return Err(SimError::InvalidInput(
            "App Configuration store name ('account_name') must be a non-empty string."
                .to_string(),
        ));
    }
    if key.trim().is_empty() {
        return Err(SimError::InvalidInput(
            "Key name ('key') must be a non-empty string.".to_string(),
        ));
    }
    if subscription.trim().is_empty() {
        return Err(SimError::InvalidInput(
            "Subscription ID or name ('subscription') must be a non-empty string.".to_string(),
        ));
    }

    let sub = find_subscription_mut(state, subscription).ok_or_else(|| {
        SimError::SubscriptionNotFound(format!("Subscription '{}' not found.", subscription))
    })?;
    let store = find_store_mut(sub, account_name)
        .ok_or_else(|| store_not_found(account_name, subscription))?;

    let display = label.map_or("(none)".to_string(), |l| format!("'{}'", l));
    let Some(item) = find_kv_mut(store, key, label) else {
        return Err(SimError::NotFound(format!(
            "Key-value with key '{}' and label {} not found in App Configuration store '{}'.",
            key, display, account_name
        )));
    };

    if !item.locked {
        return Err(SimError::Conflict(format!(
            "Key-value '{}' with label {} in store '{}' is already unlocked.",
            key, display, account_name
        )));
    }

    item.locked = false;
    item.last_modified = now_iso();
    item.etag = new_etag();
    Ok(item.clone())
}

pub fn kv_delete(
    state: &mut AppConfigState,
    subscription: &str,
    account_name: &str,
    key: &str,
    label: Option<&str>,
) -> SimResult<()> {
    if subscription.is_empty() {
        return Err(SimError::InvalidInput(
            "Subscription cannot be empty.".to_string(),
        ));
    }
    if account_name.is_empty() {
        return Err(SimError::InvalidInput(
            "Account name cannot be empty.".to_string(),
        ));
    }
    if key.is_empty() {
        return Err(SimError::InvalidInput("Key cannot be empty.".to_string()));
    }

    let sub = find_subscription_mut(state, subscription).ok_or_else(|| {
        SimError::NotFound(format!("Subscription '{}' not found.", subscription))
    })?;
    let store = find_store_mut(sub, account_name)
        .ok_or_else(|| store_not_found(account_name, subscription))?;

    let before = store.key_values.len();
    store
        .key_values
        .retain(|kv| !(kv.key == key && kv.label.as_deref() == label));

    if store.key_values.len() == before {
        let message = match label {
            Some(l) => format!(
                "Key-value with key '{}' and label '{}' not found in store '{}'.",
                key, l, account_name
            ),
            None => format!(
                "Key-value with key '{}' and default label not found in store '{}'.",
                key, account_name
            ),
        };
        return Err(SimError::NotFound(message));
    }
    Ok(())
}

fn store_not_found(account_name: &str, subscription: &str) -> SimError {
    SimError::NotFound(format!(
        "App Configuration store '{}' not found in subscription '{}'.",
        account_name, subscription
    ))
}

fn find_subscription<'a>(
    state: &'a AppConfigState,
    subscription: &str,
) -> Option<&'a Subscription> {
    state
        .subscriptions
        .iter()
        .find(|s| s.subscription_id == subscription || s.display_name == subscription)
}

fn find_subscription_mut<'a>(
    state: &'a mut AppConfigState,
    subscription: &str,
) -> Option<&'a mut Subscription> {
    state
        .subscriptions
        .iter_mut()
        .find(|s| s.subscription_id == subscription || s.display_name == subscription)
}

fn find_store<'a>(sub: &'a Subscription, account_name: &str) -> Option<&'a AppConfigStore> {
    sub.resource_groups
        .iter()
        .flat_map(|rg| rg.app_config_stores.iter())
        .find(|store| store.name == account_name)
}

fn find_store_mut<'a>(
    sub: &'a mut Subscription,
    account_name: &str,
) -> Option<&'a mut AppConfigStore> {
    sub.resource_groups
        .iter_mut()
        .flat_map(|rg| rg.app_config_stores.iter_mut())
        .find(|store| store.name == account_name)
}

fn find_kv_mut<'a>(
    store: &'a mut AppConfigStore,
    key: &str,
    label: Option<&str>,
) -> Option<&'a mut KeyValue> {
    store
        .key_values
        .iter_mut()
        .find(|kv| kv.key == key && kv.label.as_deref() == label)
}

/// Exact match, or prefix match when the filter ends with `*`.
fn key_matches(key: &str, filter: &str) -> bool {
    match filter.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == filter,
    }
}

/// Label filtering treats `\0` as "only the default label"; a wildcard
/// matches an unlabeled item only when the filter is a bare `*`.
fn label_matches(label: Option<&str>, filter: &str) -> bool {
    if filter == "\0" {
        return label.is_none();
    }
    match (filter.strip_suffix('*'), label) {
        (Some(prefix), Some(l)) => l.starts_with(prefix),
        (Some(prefix), None) => prefix.is_empty(),
        (None, Some(l)) => l == filter,
        (None, None) => false,
    }
}

fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn new_etag() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
