// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Filesystem-backed coordination store
//!
//! Each store path maps to a `.json` file under a base directory, so
//! `/containerops/vessel/ws-1/pj-2/pl-3/stage/build` lands at
//! `<base>/containerops/vessel/ws-1/pj-2/pl-3/stage/build.json`. Records are
//! JSON, references are plain decimal text.
//!
//! Path segments are escaped before they touch the filesystem: `%` becomes
//! `%25`, `.` becomes `%2E` and an empty segment becomes `%`. Directory names
//! therefore never contain a dot, so a key and its children (`stage/a` and
//! `stage/a/b`) never collide and no segment can name `.` or `..`.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{decode_reference, encode, CoordinationStore};
use crate::errors::VesselError;
use crate::pipeline::{Pipeline, Stage};

/// Store rooted at a local directory
pub struct FilesystemStore {
    base_dir: PathBuf,
}

impl FilesystemStore {
    /// Create a store, creating the base directory if needed
    pub fn new(base_dir: PathBuf) -> Result<Self, VesselError> {
        if !base_dir.exists() {
            std::fs::create_dir_all(&base_dir).map_err(|e| {
                VesselError::persistence(
                    base_dir.display().to_string(),
                    format!("failed to create store directory: {}", e),
                )
            })?;
        }

        Ok(Self { base_dir })
    }

    /// Local file for a store path
    fn file_path(&self, path: &str) -> Result<PathBuf, VesselError> {
        let key = path.strip_prefix('/').unwrap_or(path);
        if key.is_empty() {
            return Err(VesselError::persistence(path, "empty store key"));
        }

        let segments: Vec<String> = key.split('/').map(escape_segment).collect();
        let mut file = self.base_dir.clone();
        if let Some((last, parents)) = segments.split_last() {
            file.extend(parents);
            file.push(format!("{}.json", last));
        }

        Ok(file)
    }

    async fn put(&self, path: &str, contents: String) -> Result<(), VesselError> {
        let file = self.file_path(path)?;

        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| VesselError::persistence(path, e))?;
        }

        tokio::fs::write(&file, contents)
            .await
            .map_err(|e| VesselError::persistence(path, e))?;

        tracing::trace!(path, file = %file.display(), "record written");
        Ok(())
    }
}

/// Escape one key segment into a plain, dot-free file name
fn escape_segment(segment: &str) -> String {
    if segment.is_empty() {
        return "%".to_string();
    }

    let mut escaped = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '.' => escaped.push_str("%2E"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[async_trait]
impl CoordinationStore for FilesystemStore {
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
        let file = self.file_path(path)?;

        match tokio::fs::read_to_string(&file).await {
            Ok(raw) => decode_reference(path, &raw).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VesselError::persistence(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_stage_record_written_as_json() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(temp_dir.path().to_path_buf()).unwrap();

        let path = "/containerops/vessel/ws-1/pj-2/pl-3/stage/build";
        store.save_stage(path, &Stage::new("build", ["fetch"])).await.unwrap();

        let file = temp_dir
            .path()
            .join("containerops/vessel/ws-1/pj-2/pl-3/stage/build.json");
        let content = std::fs::read_to_string(file).unwrap();
        let stage: Stage = serde_json::from_str(&content).unwrap();
        assert_eq!(stage.depends_on, vec!["fetch"]);
    }

    #[tokio::test]
    async fn test_reference_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(temp_dir.path().join("nested")).unwrap();

        let path = "/containerops/vessel/ws-1/pj-2/plv-9/pipelineId";
        assert_eq!(store.pipeline_id_reference(path).await.unwrap(), None);

        store.save_pipeline_id_reference(path, 3).await.unwrap();
        assert_eq!(store.pipeline_id_reference(path).await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_nested_keys_coexist() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(temp_dir.path().to_path_buf()).unwrap();

        store.save_stage("/p/stage/a", &Stage::new("a", Vec::<String>::new())).await.unwrap();
        store.save_stage("/p/stage/a/b", &Stage::new("a/b", ["a"])).await.unwrap();

        assert!(temp_dir.path().join("p/stage/a.json").is_file());
        assert!(temp_dir.path().join("p/stage/a/b.json").is_file());
    }

    #[tokio::test]
    async fn test_dot_segments_stay_inside_base() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("store");
        let store = FilesystemStore::new(base.clone()).unwrap();

        store.save_pipeline_id_reference("/p/stage/.", 1).await.unwrap();
        store.save_pipeline_id_reference("/p/stage/..", 2).await.unwrap();
        store.save_pipeline_id_reference("/a/../../etc/passwd", 3).await.unwrap();
        store.save_pipeline_id_reference("/p//x", 4).await.unwrap();

        assert_eq!(store.pipeline_id_reference("/p/stage/.").await.unwrap(), Some(1));
        assert_eq!(store.pipeline_id_reference("/p/stage/..").await.unwrap(), Some(2));
        assert_eq!(store.pipeline_id_reference("/p/x").await.unwrap(), None);
        assert!(base.join("p/stage/%2E.json").is_file());
        assert!(base.join("a/%2E%2E/%2E%2E/etc/passwd.json").is_file());
        assert!(base.join("p/%/x.json").is_file());
        assert!(!temp_dir.path().join("etc").exists());
    }

    #[tokio::test]
    async fn test_rejects_empty_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(temp_dir.path().to_path_buf()).unwrap();

        let result = store.save_pipeline_id_reference("/", 1).await;
        assert!(matches!(result, Err(VesselError::Persistence { .. })));
    }
}
