// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Pipeline definition structures
//!
//! Defines the pipeline and stage records exchanged with callers and with
//! the coordination store, plus the immutable [`PipelineVersion`] snapshot.
//! Field names are serialized in camelCase so stored records stay
//! compatible with existing data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::VesselError;

/// Pipeline definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    /// Pipeline identifier
    pub id: i64,

    /// Owning workspace
    pub workspace_id: i64,

    /// Owning project
    pub project_id: i64,

    /// Pipeline name
    #[serde(default)]
    pub name: Option<String>,

    /// Stages in input order
    #[serde(default)]
    pub stages: Vec<Stage>,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    /// Opaque caller detail
    #[serde(default)]
    pub detail: String,
}

impl Pipeline {
    /// Load pipeline from a YAML or JSON file
    pub fn from_file(path: &Path) -> Result<Self, VesselError> {
        if !path.exists() {
            return Err(VesselError::PipelineNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| VesselError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Parse pipeline from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, VesselError> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Parse pipeline from JSON string
    pub fn from_json(json: &str) -> Result<Self, VesselError> {
        serde_json::from_str(json).map_err(Into::into)
    }
}

/// A single pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Stage name (must be unique within pipeline)
    pub name: String,

    /// Stages this one must follow
    #[serde(default, alias = "from")]
    pub depends_on: Vec<String>,

    /// Stages that must follow this one; derived during validation
    #[serde(default, alias = "to")]
    pub precedes: Vec<String>,
}

impl Stage {
    /// Create a stage with the given predecessors
    pub fn new<I, S>(name: impl Into<String>, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            depends_on: depends_on.into_iter().map(Into::into).collect(),
            precedes: Vec::new(),
        }
    }

    /// A stage with no predecessors
    pub fn is_root(&self) -> bool {
        self.depends_on.is_empty()
    }
}

/// Immutable snapshot produced by one successful materialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineVersion {
    pub id: i64,
    pub workspace_id: i64,
    pub project_id: i64,
    pub pipeline_id: i64,

    /// `plv-<id>`
    pub namespace: String,

    #[serde(default)]
    pub self_link: String,

    /// Unix seconds
    pub created: i64,

    /// Unix seconds
    pub updated: i64,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    #[serde(default)]
    pub detail: String,

    pub stage_versions: Vec<String>,

    pub status: i32,
}

impl PipelineVersion {
    /// Status of a freshly materialized version
    pub const STATUS_CREATED: i32 = 0;

    /// Namespace string for a version id
    pub fn namespace_for(id: i64) -> String {
        format!("plv-{}", id)
    }
}
