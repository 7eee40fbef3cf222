// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! vessel - Pipeline Versioning
//!
//! Validate build/release pipelines and record immutable versions of them.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vessel::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vessel=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    // Dispatch to command handlers
    match cli.command {
        Commands::Validate { pipeline } => vessel::cli::validate::run(pipeline, cli.verbose).await,
        Commands::Run { pipeline, format } => {
            vessel::cli::run::run(pipeline, format, &cli.config, cli.verbose).await
        }
        Commands::Graph { pipeline, format } => {
            vessel::cli::graph::run(pipeline, format, cli.verbose).await
        }
        Commands::Lookup {
            workspace,
            project,
            version,
        } => vessel::cli::lookup::run(workspace, project, version, &cli.config, cli.verbose).await,
    }
}
