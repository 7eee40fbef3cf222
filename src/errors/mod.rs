// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Error types
//!
//! Every failure vessel can report, from pipeline validation through store
//! writes, is a variant of [`VesselError`]. Validation variants are raised
//! before anything touches the store.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for vessel operations
pub type VesselResult<T> = Result<T, VesselError>;

/// Main error type for vessel
#[derive(Error, Debug, Diagnostic)]
pub enum VesselError {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Stage has an empty name")]
    #[diagnostic(
        code(vessel::empty_stage_name),
        help("Every stage needs a non-empty 'name'")
    )]
    EmptyStageName,

    #[error("Duplicate stage name: '{name}'")]
    #[diagnostic(
        code(vessel::duplicate_stage_name),
        help("Stage names must be unique within a pipeline")
    )]
    DuplicateStageName { name: String },

    #[error("Stage '{stage}' depends on unknown stage '{dependency}'")]
    #[diagnostic(
        code(vessel::unknown_dependency),
        help("Check that '{dependency}' is defined in your pipeline")
    )]
    UnknownDependency { stage: String, dependency: String },

    #[error("Circular dependency detected among stages: {}", .stages.join(", "))]
    #[diagnostic(
        code(vessel::circular_dependency),
        help("Review your stage dependencies to remove the cycle")
    )]
    CircularDependency { stages: Vec<String> },

    // ─────────────────────────────────────────────────────────────────────────
    // Store Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to persist '{path}': {message}")]
    #[diagnostic(
        code(vessel::persistence),
        help("Records written before this one are left in place; inspect the store at '{path}'")
    )]
    Persistence { path: String, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // File / Config Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Pipeline file not found: {path}")]
    #[diagnostic(
        code(vessel::pipeline_not_found),
        help("Pass the pipeline definition path, e.g. 'vessel validate pipeline.yaml'")
    )]
    PipelineNotFound { path: PathBuf },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(vessel::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Invalid configuration: {reason}")]
    #[diagnostic(code(vessel::invalid_config))]
    InvalidConfig { reason: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(vessel::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(vessel::yaml_error))]
    Yaml { message: String },

    #[error("JSON parsing error: {message}")]
    #[diagnostic(code(vessel::json_error))]
    Json { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(vessel::toml_error))]
    Toml { message: String },
}

impl From<std::io::Error> for VesselError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for VesselError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for VesselError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for VesselError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl VesselError {
    /// Create a persistence error for a store path
    pub fn persistence(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error was raised by pipeline validation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyStageName
                | Self::DuplicateStageName { .. }
                | Self::UnknownDependency { .. }
                | Self::CircularDependency { .. }
        )
    }
}
