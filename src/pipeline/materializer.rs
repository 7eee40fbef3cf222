// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Version materializer
//!
//! Turns a validated pipeline into a persisted [`PipelineVersion`]. One call
//! is a single linear pass: validate, resolve stage edges, write the pipeline
//! and its stages, build the version, then write the back-reference from the
//! version to its pipeline. A failing write stops the pass and is returned;
//! records already written stay in the store.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::StorePaths;
use crate::errors::VesselError;
use crate::pipeline::{GraphValidator, Pipeline, PipelineVersion};
use crate::store::CoordinationStore;

/// Materializes pipeline versions into a coordination store
pub struct VersionMaterializer {
    store: Arc<dyn CoordinationStore>,
    paths: StorePaths,
    last_id: AtomicI64,
}

impl VersionMaterializer {
    /// Create a materializer writing to `store` under `paths`
    pub fn new(store: Arc<dyn CoordinationStore>, paths: StorePaths) -> Self {
        Self {
            store,
            paths,
            last_id: AtomicI64::new(0),
        }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Validate and persist `pipeline`, returning the new version
    ///
    /// Stage edge fields of `pipeline` are filled in from the validated
    /// graph. Nothing is written when validation fails.
    pub async fn run_pipeline(
        &self,
        pipeline: &mut Pipeline,
    ) -> Result<PipelineVersion, VesselError> {
        let edges = GraphValidator::validate(&pipeline.stages)?;

        for stage in &mut pipeline.stages {
            let Some(resolved) = edges.get(&stage.name) else {
                continue;
            };
            stage.depends_on = resolved.depends_on.clone();
            stage.precedes = resolved.precedes.clone();
        }

        let pipeline_path =
            self.paths
                .pipeline_path(pipeline.workspace_id, pipeline.project_id, pipeline.id);
        self.store
            .save_pipeline(&pipeline_path, pipeline)
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, "pipeline not persisted");
            })?;

        for stage in &pipeline.stages {
            let stage_path = self.paths.stage_path(
                pipeline.workspace_id,
                pipeline.project_id,
                pipeline.id,
                &stage.name,
            );
            self.store
                .save_stage(&stage_path, stage)
                .await
                .inspect_err(|e| {
                    tracing::warn!(stage = %stage.name, error = %e, "stage not persisted");
                })?;
        }

        let version = self.new_version(pipeline);

        let reference_path = self.paths.version_reference_path(
            version.workspace_id,
            version.project_id,
            version.id,
        );
        self.store
            .save_pipeline_id_reference(&reference_path, pipeline.id)
            .await
            .inspect_err(|e| {
                tracing::warn!(version = version.id, error = %e, "back-reference not persisted");
            })?;

        tracing::info!(
            pipeline = pipeline.id,
            version = version.id,
            stages = pipeline.stages.len(),
            "pipeline version created"
        );

        Ok(version)
    }

    /// Pipeline id that produced a version, if recorded
    pub async fn pipeline_for_version(
        &self,
        workspace_id: i64,
        project_id: i64,
        version_id: i64,
    ) -> Result<Option<i64>, VesselError> {
        let path = self
            .paths
            .version_reference_path(workspace_id, project_id, version_id);
        self.store.pipeline_id_reference(&path).await
    }

    fn new_version(&self, pipeline: &Pipeline) -> PipelineVersion {
        let id = self.allocate_id();
        let now = unix_seconds();

        PipelineVersion {
            id,
            workspace_id: pipeline.workspace_id,
            project_id: pipeline.project_id,
            pipeline_id: pipeline.id,
            namespace: PipelineVersion::namespace_for(id),
            self_link: String::new(),
            created: now,
            updated: now,
            labels: pipeline.labels.clone(),
            annotations: pipeline.annotations.clone(),
            detail: pipeline.detail.clone(),
            stage_versions: vec![id.to_string()],
            status: PipelineVersion::STATUS_CREATED,
        }
    }

    /// Nanosecond timestamp, bumped past the last id handed out
    fn allocate_id(&self) -> i64 {
        let now = unix_nanos();
        let prev = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(prev + 1)
    }
}

fn unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

fn unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
