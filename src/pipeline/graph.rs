// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Dependency graph rendering
//!
//! Builds a petgraph view of a validated pipeline for ordering and for the
//! `graph` command's text, DOT and Mermaid output.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::errors::VesselError;
use crate::pipeline::{GraphValidator, Pipeline};

/// Validated stage graph, edges point from predecessor to successor
pub struct StageGraph {
    graph: DiGraph<String, ()>,
    name_to_index: HashMap<String, NodeIndex>,
}

impl StageGraph {
    /// Validate a pipeline and build its graph
    pub fn build(pipeline: &Pipeline) -> Result<Self, VesselError> {
        let edges = GraphValidator::validate(&pipeline.stages)?;

        let mut graph = DiGraph::new();
        let mut name_to_index = HashMap::new();

        for stage in &pipeline.stages {
            let node = graph.add_node(stage.name.clone());
            name_to_index.insert(stage.name.clone(), node);
        }

        for stage in &pipeline.stages {
            let to = name_to_index[&stage.name];
            for dep in edges.depends_on(&stage.name) {
                graph.add_edge(name_to_index[dep], to, ());
            }
        }

        Ok(Self {
            graph,
            name_to_index,
        })
    }

    /// Stage names in a valid execution order
    pub fn topological_order(&self) -> Result<Vec<String>, VesselError> {
        toposort(&self.graph, None)
            .map(|nodes| nodes.into_iter().map(|n| self.graph[n].clone()).collect())
            .map_err(|cycle| VesselError::CircularDependency {
                stages: vec![self.graph[cycle.node_id()].clone()],
            })
    }

    /// Direct predecessors of a stage
    pub fn dependencies(&self, stage_name: &str) -> Option<Vec<String>> {
        let node = self.name_to_index.get(stage_name)?;
        Some(
            self.graph
                .neighbors_directed(*node, petgraph::Direction::Incoming)
                .map(|n| self.graph[n].clone())
                .collect(),
        )
    }

    /// Whether `stage_a` depends on `stage_b`, directly or transitively
    pub fn depends_on(&self, stage_a: &str, stage_b: &str) -> bool {
        let (Some(a), Some(b)) = (
            self.name_to_index.get(stage_a),
            self.name_to_index.get(stage_b),
        ) else {
            return false;
        };

        petgraph::algo::has_path_connecting(&self.graph, *b, *a, None)
    }

    fn edge_names(&self) -> Vec<(&str, &str)> {
        let mut edges: Vec<(&str, &str)> = self
            .graph
            .raw_edges()
            .iter()
            .map(|e| {
                (
                    self.graph[e.source()].as_str(),
                    self.graph[e.target()].as_str(),
                )
            })
            .collect();
        edges.sort();
        edges
    }

    /// Generate Mermaid diagram
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");

        for node in self.graph.node_indices() {
            let name = &self.graph[node];
            out.push_str(&format!("    {}[{}]\n", name, name));
        }

        for (from, to) in self.edge_names() {
            out.push_str(&format!("    {} --> {}\n", from, to));
        }

        out
    }

    /// Generate DOT diagram
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph pipeline {\n");
        out.push_str("    rankdir=TB;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for (from, to) in self.edge_names() {
            out.push_str(&format!("    \"{}\" -> \"{}\";\n", from, to));
        }

        for node in self.graph.node_indices() {
            if self.graph.neighbors_undirected(node).count() == 0 {
                out.push_str(&format!("    \"{}\";\n", self.graph[node]));
            }
        }

        out.push_str("}\n");
        out
    }

    /// Numbered execution order with dependencies
    pub fn to_text(&self) -> Result<String, VesselError> {
        let mut out = String::new();

        for (i, name) in self.topological_order()?.iter().enumerate() {
            out.push_str(&format!("{}. {}", i + 1, name));

            let mut deps = self.dependencies(name).unwrap_or_default();
            if !deps.is_empty() {
                deps.sort();
                out.push_str(&format!(" [depends: {}]", deps.join(", ")));
            }

            out.push('\n');
        }

        Ok(out)
    }
}
