// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for vessel.

pub mod graph;
pub mod lookup;
pub mod run;
pub mod validate;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{VesselConfig, DEFAULT_CONFIG_FILE};

/// Pipeline validator and version materializer
#[derive(Parser, Debug)]
#[clap(
    name = "vessel",
    version,
    about = "Validate build/release pipelines and record immutable versions of them",
    long_about = None,
    after_help = "Examples:\n\
        vessel validate pipeline.yaml          Check stage names and dependencies\n\
        vessel run pipeline.yaml               Materialize a new pipeline version\n\
        vessel graph pipeline.yaml -f dot      Render the dependency graph\n\
        vessel lookup -w 1 -p 2 -i <version>   Find the pipeline behind a version\n\n\
        See 'vessel <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Configuration file
    #[clap(long, global = true, env = "VESSEL_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a pipeline definition
    Validate {
        /// Pipeline file (YAML or JSON)
        #[clap(default_value = "pipeline.yaml")]
        pipeline: PathBuf,
    },

    /// Validate and materialize a new pipeline version
    Run {
        /// Pipeline file (YAML or JSON)
        #[clap(default_value = "pipeline.yaml")]
        pipeline: PathBuf,

        /// Output format
        #[clap(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show pipeline as a graph
    Graph {
        /// Pipeline file (YAML or JSON)
        #[clap(default_value = "pipeline.yaml")]
        pipeline: PathBuf,

        /// Output format
        #[clap(short, long, default_value = "text")]
        format: GraphFormat,
    },

    /// Find the pipeline that produced a version
    Lookup {
        /// Workspace id
        #[clap(short, long)]
        workspace: i64,

        /// Project id
        #[clap(short, long)]
        project: i64,

        /// Pipeline version id
        #[clap(short = 'i', long = "version-id")]
        version: i64,
    },
}

/// Output format for the run command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}

impl std::str::FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "dot" => Ok(Self::Dot),
            "mermaid" => Ok(Self::Mermaid),
            _ => Err(format!("Unknown graph format: {}", s)),
        }
    }
}

/// Load the config file named on the command line
pub(crate) fn load_config(path: &Path) -> miette::Result<VesselConfig> {
    let config = VesselConfig::load(path)?;
    Ok(config)
}
