// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Configuration loading
//!
//! Load store settings and path templates from `.vessel.yaml` (or
//! `.vessel.toml`). A missing file yields the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::VesselError;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".vessel.yaml";

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselConfig {
    /// Store backend settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Store key layout
    #[serde(default)]
    pub paths: StorePaths,
}

impl VesselConfig {
    /// Load from a YAML or TOML file
    pub fn load(path: &Path) -> Result<Self, VesselError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| VesselError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        config.paths.check()?;

        Ok(config)
    }

    /// Load from the working directory
    pub fn load_from_project(project_root: &Path) -> Result<Self, VesselError> {
        Self::load(&project_root.join(DEFAULT_CONFIG_FILE))
    }
}

/// Store backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local, discarded on exit
    Memory,
    /// JSON records under a directory
    #[default]
    Filesystem,
}

/// Store backend settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Base directory for the filesystem backend
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl StoreConfig {
    /// Configured directory, else the platform data dir, else `.vessel/store`
    pub fn resolved_directory(&self) -> PathBuf {
        if let Some(dir) = &self.directory {
            return dir.clone();
        }

        directories::ProjectDirs::from("org", "containerops", "vessel")
            .map(|dirs| dirs.data_dir().join("store"))
            .unwrap_or_else(|| PathBuf::from(".vessel").join("store"))
    }
}

/// Key templates for records in the coordination store
///
/// Placeholders: `{root}`, `{workspace}`, `{project}`, `{pipeline}`,
/// `{stage}`, `{version}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorePaths {
    pub root: String,
    pub pipeline: String,
    pub stage: String,
    pub version_reference: String,
}

impl Default for StorePaths {
    fn default() -> Self {
        Self {
            root: "/containerops/vessel".to_string(),
            pipeline: "{root}/ws-{workspace}/pj-{project}/pl-{pipeline}/info".to_string(),
            stage: "{root}/ws-{workspace}/pj-{project}/pl-{pipeline}/stage/{stage}".to_string(),
            version_reference: "{root}/ws-{workspace}/pj-{project}/plv-{version}/pipelineId"
                .to_string(),
        }
    }
}

impl StorePaths {
    /// Same templates under a different root
    pub fn with_root(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Path of a pipeline's metadata record
    pub fn pipeline_path(&self, workspace: i64, project: i64, pipeline: i64) -> String {
        self.render(&self.pipeline)
            .replace("{workspace}", &workspace.to_string())
            .replace("{project}", &project.to_string())
            .replace("{pipeline}", &pipeline.to_string())
    }

    /// Path of one stage record
    pub fn stage_path(&self, workspace: i64, project: i64, pipeline: i64, stage: &str) -> String {
        self.render(&self.stage)
            .replace("{workspace}", &workspace.to_string())
            .replace("{project}", &project.to_string())
            .replace("{pipeline}", &pipeline.to_string())
            .replace("{stage}", stage)
    }

    /// Path of the version to pipeline back-reference
    pub fn version_reference_path(&self, workspace: i64, project: i64, version: i64) -> String {
        self.render(&self.version_reference)
            .replace("{workspace}", &workspace.to_string())
            .replace("{project}", &project.to_string())
            .replace("{version}", &version.to_string())
    }

    fn render(&self, template: &str) -> String {
        template.replace("{root}", self.root.trim_end_matches('/'))
    }

    fn check(&self) -> Result<(), VesselError> {
        let required = [
            ("pipeline", &self.pipeline, "{pipeline}"),
            ("stage", &self.stage, "{stage}"),
            ("version_reference", &self.version_reference, "{version}"),
        ];

        for (field, template, placeholder) in required {
            if !template.contains(placeholder) {
                return Err(VesselError::InvalidConfig {
                    reason: format!("paths.{} must contain '{}'", field, placeholder),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        let paths = StorePaths::default();

        assert_eq!(
            paths.stage_path(1, 2, 3, "build"),
            "/containerops/vessel/ws-1/pj-2/pl-3/stage/build"
        );
        assert_eq!(
            paths.version_reference_path(1, 2, 99),
            "/containerops/vessel/ws-1/pj-2/plv-99/pipelineId"
        );
        assert_eq!(
            paths.pipeline_path(1, 2, 3),
            "/containerops/vessel/ws-1/pj-2/pl-3/info"
        );
    }

    #[test]
    fn test_custom_root() {
        let paths = StorePaths::with_root("/tenant-a/");
        assert_eq!(
            paths.stage_path(4, 5, 6, "deploy"),
            "/tenant-a/ws-4/pj-5/pl-6/stage/deploy"
        );
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = VesselConfig::load_from_project(temp_dir.path()).unwrap();
        assert_eq!(config, VesselConfig::default());
    }

    #[test]
    fn test_load_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            "store:\n  backend: memory\npaths:\n  root: /ci\n",
        )
        .unwrap();

        let config = VesselConfig::load(&path).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.paths.root, "/ci");
        assert_eq!(config.paths.stage, StorePaths::default().stage);
    }

    #[test]
    fn test_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vessel.toml");
        std::fs::write(&path, "[store]\ndirectory = \"/var/lib/vessel\"\n").unwrap();

        let config = VesselConfig::load(&path).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Filesystem);
        assert_eq!(
            config.store.resolved_directory(),
            PathBuf::from("/var/lib/vessel")
        );
    }

    #[test]
    fn test_template_without_placeholder_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "paths:\n  stage: /fixed/stage\n").unwrap();

        let result = VesselConfig::load(&path);
        assert!(matches!(result, Err(VesselError::InvalidConfig { .. })));
    }
}
