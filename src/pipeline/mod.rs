// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Pipeline definitions, validation and versioning
//!
//! This module defines the pipeline and stage records, the dependency graph
//! check, and the materializer that turns a valid pipeline into a stored
//! [`PipelineVersion`].

mod dag;
mod definition;
mod graph;
mod materializer;

pub use dag::{EdgeMap, GraphValidator, StageEdges};
pub use definition::*;
pub use graph::StageGraph;
pub use materializer::VersionMaterializer;
