// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tool specification manifests.
//!
//! Every engine operation carries a [`ToolSpec`]: a JSON-Schema shaped
//! parameter manifest in the format function-calling integrations expect.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Manifest describing one tool (engine operation).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

/// JSON-Schema shaped parameter block (`type: "object"` with properties).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// One named parameter in the manifest.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub value_type: String,
    pub description: String,
}

impl ToolSpec {
    /// Start a manifest with an empty object schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParameterSchema {
                schema_type: "object".to_string(),
                properties: BTreeMap::new(),
                required: Vec::new(),
            },
        }
    }

    /// Add a required string parameter.
    pub fn required_string(self, name: &str, description: &str) -> Self {
        self.param(name, "string", description, true)
    }

    /// Add an optional string parameter.
    pub fn optional_string(self, name: &str, description: &str) -> Self {
        self.param(name, "string", description, false)
    }

    /// Add an optional integer parameter.
    pub fn optional_integer(self, name: &str, description: &str) -> Self {
        self.param(name, "integer", description, false)
    }

    /// Add a required array-of-arrays parameter (spreadsheet value grids).
    pub fn required_grid(self, name: &str, description: &str) -> Self {
        self.param(name, "array", description, true)
    }

    /// Add an optional array parameter.
    pub fn optional_array(self, name: &str, description: &str) -> Self {
        self.param(name, "array", description, false)
    }

    fn param(mut self, name: &str, value_type: &str, description: &str, required: bool) -> Self {
        self.parameters.properties.insert(
            name.to_string(),
            PropertySpec {
                value_type: value_type.to_string(),
                description: description.to_string(),
            },
        );
        if required {
            self.parameters.required.push(name.to_string());
        }
        self
    }
}
