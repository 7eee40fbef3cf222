// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Run command - materialize a pipeline version

use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use super::OutputFormat;
use crate::config::StoreBackend;
use crate::pipeline::{Pipeline, VersionMaterializer};
use crate::store;
use crate::utils::{print_info, print_section};

/// Validate the pipeline and record a new version of it
pub async fn run(
    pipeline_path: PathBuf,
    format: OutputFormat,
    config_path: &Path,
    verbose: bool,
) -> Result<()> {
    let config = super::load_config(config_path)?;
    let mut pipeline = Pipeline::from_file(&pipeline_path)?;

    let store = store::open(&config.store)?;
    let materializer = VersionMaterializer::new(store, config.paths.clone());

    let version = materializer.run_pipeline(&mut pipeline).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&version).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!(
                "{} {}",
                "Created".green().bold(),
                version.namespace.bold()
            );
            println!("  Pipeline:  {}", version.pipeline_id);
            println!("  Workspace: {}", version.workspace_id);
            println!("  Project:   {}", version.project_id);
            println!("  Stages:    {}", pipeline.stages.len());

            if verbose {
                print_section("Records");
                for stage in &pipeline.stages {
                    print_info(&materializer.paths().stage_path(
                        pipeline.workspace_id,
                        pipeline.project_id,
                        pipeline.id,
                        &stage.name,
                    ));
                }
                print_info(&materializer.paths().version_reference_path(
                    version.workspace_id,
                    version.project_id,
                    version.id,
                ));
            }

            if config.store.backend == StoreBackend::Memory {
                println!();
                println!(
                    "{}",
                    "Memory store in use: records are discarded on exit.".yellow()
                );
            }
        }
    }

    Ok(())
}
