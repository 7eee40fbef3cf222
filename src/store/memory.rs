// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! In-memory coordination store
//!
//! Keeps records in a `BTreeMap` and remembers the order of writes. Writes
//! can be made to fail for paths containing a given fragment, which is how
//! partial persistence is exercised in tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{decode_reference, encode, CoordinationStore};
use crate::errors::VesselError;
use crate::pipeline::{Pipeline, Stage};

/// Process-local store
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, String>>,
    writes: RwLock<Vec<String>>,
    fail_on: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every write whose path contains `fragment`
    pub fn failing_on(fragment: impl Into<String>) -> Self {
        Self {
            fail_on: Some(fragment.into()),
            ..Self::default()
        }
    }

    /// Raw record at a path
    pub async fn get(&self, path: &str) -> Option<String> {
        self.records.read().await.get(path).cloned()
    }

    /// Paths written so far, in order
    pub async fn writes(&self) -> Vec<String> {
        self.writes.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn put(&self, path: &str, value: String) -> Result<(), VesselError> {
        if let Some(fragment) = &self.fail_on {
            if path.contains(fragment.as_str()) {
                return Err(VesselError::persistence(path, "write rejected by store"));
            }
        }

        self.records.write().await.insert(path.to_string(), value);
        self.writes.write().await.push(path.to_string());
        Ok(())
    }
}

#[async_trait]
impl CoordinationStore for MemoryStore {
    async fn save_pipeline(&self, path: &str, pipeline: &Pipeline) -> Result<(), VesselError> {
        self.put(path, encode(path, pipeline)?).await
    }

    async fn save_stage(&self, path: &str, stage: &Stage) -> Result<(), VesselError> {
        self.put(path, encode(path, stage)?).await
    }

    async fn save_pipeline_id_reference(
        &self,
        path: &str,
        pipeline_id: i64,
    ) -> Result<(), VesselError> {
        self.put(path, pipeline_id.to_string()).await
    }

    async fn pipeline_id_reference(&self, path: &str) -> Result<Option<i64>, VesselError> {
        match self.get(path).await {
            Some(raw) => decode_reference(path, &raw).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let store = MemoryStore::new();
        let path = "/root/ws-1/pj-1/pl-1/stage/build";

        store.save_stage(path, &Stage::new("build", Vec::<String>::new())).await.unwrap();
        store.save_stage(path, &Stage::new("build", ["fetch"])).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.writes().await.len(), 2);
        let raw = store.get(path).await.unwrap();
        assert!(raw.contains("fetch"));
    }

    #[tokio::test]
    async fn test_reference_round_trip() {
        let store = MemoryStore::new();
        let path = "/root/ws-1/pj-1/plv-5/pipelineId";

        assert_eq!(store.pipeline_id_reference(path).await.unwrap(), None);
        store.save_pipeline_id_reference(path, 17).await.unwrap();
        assert_eq!(store.pipeline_id_reference(path).await.unwrap(), Some(17));
        assert_eq!(store.get(path).await.as_deref(), Some("17"));
    }

    #[tokio::test]
    async fn test_failing_writes() {
        let store = MemoryStore::failing_on("/stage/");

        let err = store
            .save_stage("/root/pl-1/stage/build", &Stage::new("build", Vec::<String>::new()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VesselError::Persistence { ref path, .. } if path == "/root/pl-1/stage/build"
        ));

        store.save_pipeline_id_reference("/root/plv-1/pipelineId", 1).await.unwrap();
        assert!(store.writes().await == vec!["/root/plv-1/pipelineId".to_string()]);
    }
}
