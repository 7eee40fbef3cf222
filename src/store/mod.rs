// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Coordination store interface
//!
//! The store is an external key/path addressed service. Records are
//! upserted at explicit hierarchical paths built from [`crate::config::StorePaths`].
//! Implementations must give at least last-writer-wins semantics per path;
//! nothing here wraps several writes in a transaction.

mod filesystem;
mod memory;

pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::config::{StoreBackend, StoreConfig};
use crate::errors::VesselError;
use crate::pipeline::{Pipeline, Stage};

/// Trait for coordination store clients
#[async_trait]
pub trait CoordinationStore: Send + Sync {
    /// Upsert pipeline metadata
    async fn save_pipeline(&self, path: &str, pipeline: &Pipeline) -> Result<(), VesselError>;

    /// Upsert one stage record
    async fn save_stage(&self, path: &str, stage: &Stage) -> Result<(), VesselError>;

    /// Upsert a scalar version to pipeline reference
    async fn save_pipeline_id_reference(
        &self,
        path: &str,
        pipeline_id: i64,
    ) -> Result<(), VesselError>;

    /// Read a scalar reference back
    async fn pipeline_id_reference(&self, path: &str) -> Result<Option<i64>, VesselError>;
}

/// Open the backend named by the config
pub fn open(config: &StoreConfig) -> Result<Arc<dyn CoordinationStore>, VesselError> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Filesystem => {
            let store = FilesystemStore::new(config.resolved_directory())?;
            Ok(Arc::new(store))
        }
    }
}

/// Serialize a record for the store
fn encode<T: Serialize>(path: &str, record: &T) -> Result<String, VesselError> {
    serde_json::to_string(record).map_err(|e| VesselError::persistence(path, e))
}

/// Parse a stored scalar reference
fn decode_reference(path: &str, raw: &str) -> Result<i64, VesselError> {
    raw.trim().parse().map_err(|e| {
        VesselError::persistence(path, format!("malformed pipeline id '{}': {}", raw.trim(), e))
    })
}
