// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Lookup command - resolve a version back to its pipeline

use miette::Result;
use std::path::Path;

use crate::pipeline::VersionMaterializer;
use crate::store;

/// Print the pipeline id recorded for a version
pub async fn run(
    workspace: i64,
    project: i64,
    version: i64,
    config_path: &Path,
    verbose: bool,
) -> Result<()> {
    let config = super::load_config(config_path)?;
    let store = store::open(&config.store)?;
    let materializer = VersionMaterializer::new(store, config.paths);

    if verbose {
        eprintln!(
            "Reading {}",
            materializer
                .paths()
                .version_reference_path(workspace, project, version)
        );
    }

    match materializer
        .pipeline_for_version(workspace, project, version)
        .await?
    {
        Some(pipeline_id) => {
            println!("{}", pipeline_id);
            Ok(())
        }
        None => Err(miette::miette!(
            "No pipeline recorded for version {} in workspace {} / project {}",
            version,
            workspace,
            project
        )),
    }
}
