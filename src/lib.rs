// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! # vessel - Pipeline Versioning
//!
//! `vessel` validates build/release pipelines declared as stages with
//! dependency edges and records immutable, uniquely identified versions of
//! them in a coordination store.
//!
//! ## Features
//!
//! - **Graph validation** - Rejects empty or duplicate stage names, dangling
//!   dependencies and cycles
//! - **Edge derivation** - Fills in each stage's direct successors
//! - **Versioning** - Persists the pipeline, its stages and a version to
//!   pipeline back-reference
//!
//! ## Quick Start
//!
//! ```bash
//! # Check a pipeline definition
//! vessel validate pipeline.yaml
//!
//! # Materialize a new version
//! vessel run pipeline.yaml
//!
//! # Which pipeline produced a version?
//! vessel lookup --workspace 1 --project 2 --version-id 1700000000000000000
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::{StorePaths, VesselConfig};
pub use errors::{VesselError, VesselResult};
pub use pipeline::{GraphValidator, Pipeline, PipelineVersion, Stage, VersionMaterializer};
pub use store::CoordinationStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
