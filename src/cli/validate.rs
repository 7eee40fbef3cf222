// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Validate command - check pipeline structure

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::pipeline::{GraphValidator, Pipeline};
use crate::utils::{print_section, print_success};

/// Validate a pipeline file
pub async fn run(pipeline_path: PathBuf, verbose: bool) -> Result<()> {
    println!(
        "{} {}",
        "Validating".bold(),
        pipeline_path.display().to_string().cyan()
    );
    println!();

    let pipeline = Pipeline::from_file(&pipeline_path)?;

    let edges = GraphValidator::validate(&pipeline.stages)?;

    print_success(&format!(
        "{} stage(s), no cycles",
        pipeline.stages.len()
    ));

    if !pipeline.stages.is_empty() {
        print_section("Stages");
        for stage in &pipeline.stages {
            let precedes = edges.precedes(&stage.name);
            let next = if precedes.is_empty() {
                String::new()
            } else {
                format!(" -> {}", precedes.join(", "))
            };
            println!("  - {}{}", stage.name, next.dimmed());

            if verbose {
                let deps = edges.depends_on(&stage.name);
                if !deps.is_empty() {
                    println!("      {} {}", "depends on".dimmed(), deps.join(", "));
                }
            }
        }
    }

    println!();
    println!("{}", "Pipeline is valid!".green().bold());
    Ok(())
}
