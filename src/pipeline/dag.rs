// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 vessel contributors

//! Stage dependency validation
//!
//! Checks that a pipeline's stages form a directed acyclic graph under their
//! `depends_on` edges and derives, for every stage, its predecessors and its
//! direct successors.
//!
//! Cycle detection is a Kahn-style release loop that counts, for each stage,
//! how many other stages still list it as an unresolved predecessor. A stage
//! whose count drops to zero is released and in turn satisfies its own
//! predecessors. Whatever cannot be released once the loop reaches a fixed
//! point is part of, or feeds into, a cycle.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::errors::VesselError;
use crate::pipeline::Stage;

/// Resolved edges of one stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageEdges {
    /// Direct predecessors, de-duplicated, in declaration order
    pub depends_on: Vec<String>,
    /// Direct successors, in pipeline input order
    pub precedes: Vec<String>,
}

/// Stage name to resolved edges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeMap {
    edges: BTreeMap<String, StageEdges>,
}

impl EdgeMap {
    /// Edges of a stage
    pub fn get(&self, stage: &str) -> Option<&StageEdges> {
        self.edges.get(stage)
    }

    /// Direct predecessors of a stage (empty if unknown)
    pub fn depends_on(&self, stage: &str) -> &[String] {
        self.edges
            .get(stage)
            .map(|e| e.depends_on.as_slice())
            .unwrap_or_default()
    }

    /// Direct successors of a stage (empty if unknown)
    pub fn precedes(&self, stage: &str) -> &[String] {
        self.edges
            .get(stage)
            .map(|e| e.precedes.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unprocessed,
    Processed,
}

/// Validator for stage dependency graphs
pub struct GraphValidator;

impl GraphValidator {
    /// Validate a stage list and derive its edge map
    pub fn validate(stages: &[Stage]) -> Result<EdgeMap, VesselError> {
        Self::check_names(stages)?;
        Self::check_acyclic(stages)?;

        let edges = Self::derive_edges(stages);
        tracing::debug!(stages = stages.len(), "stage graph is acyclic");

        Ok(edges)
    }

    /// Reject empty, duplicate and dangling stage names
    fn check_names(stages: &[Stage]) -> Result<(), VesselError> {
        let mut seen = HashSet::with_capacity(stages.len());

        for stage in stages {
            if stage.name.is_empty() {
                return Err(VesselError::EmptyStageName);
            }
            if !seen.insert(stage.name.as_str()) {
                return Err(VesselError::DuplicateStageName {
                    name: stage.name.clone(),
                });
            }
        }

        for stage in stages {
            if let Some(dependency) = stage
                .depends_on
                .iter()
                .find(|dep| !seen.contains(dep.as_str()))
            {
                return Err(VesselError::UnknownDependency {
                    stage: stage.name.clone(),
                    dependency: dependency.clone(),
                });
            }
        }

        Ok(())
    }

    /// Run the release loop; names must already be checked
    fn check_acyclic(stages: &[Stage]) -> Result<(), VesselError> {
        let mut pending: HashMap<&str, usize> =
            stages.iter().map(|s| (s.name.as_str(), 0)).collect();
        let mut state: HashMap<&str, NodeState> = stages
            .iter()
            .map(|s| (s.name.as_str(), NodeState::Unprocessed))
            .collect();

        for stage in stages {
            for dep in &stage.depends_on {
                if let Some(count) = pending.get_mut(dep.as_str()) {
                    *count += 1;
                }
            }
        }

        let mut processed = 0;
        loop {
            let mut released = 0;

            for stage in stages {
                let name = stage.name.as_str();
                if state[name] == NodeState::Processed || pending[name] != 0 {
                    continue;
                }

                state.insert(name, NodeState::Processed);
                processed += 1;
                released += 1;

                for dep in &stage.depends_on {
                    if let Some(count) = pending.get_mut(dep.as_str()) {
                        *count -= 1;
                    }
                }
            }

            if released == 0 || processed == stages.len() {
                break;
            }
        }

        if processed == stages.len() {
            return Ok(());
        }

        let stuck: Vec<String> = stages
            .iter()
            .filter(|s| state[s.name.as_str()] == NodeState::Unprocessed)
            .map(|s| s.name.clone())
            .collect();
        tracing::debug!(unresolved = ?stuck, "stage graph contains a cycle");

        Err(VesselError::CircularDependency { stages: stuck })
    }

    /// Close the relation: every predecessor learns its direct successors
    fn derive_edges(stages: &[Stage]) -> EdgeMap {
        let mut edges: BTreeMap<String, StageEdges> = stages
            .iter()
            .map(|s| (s.name.clone(), StageEdges::default()))
            .collect();

        for stage in stages {
            let mut seen = HashSet::new();
            for dep in &stage.depends_on {
                if !seen.insert(dep.as_str()) {
                    continue;
                }
                if let Some(own) = edges.get_mut(&stage.name) {
                    own.depends_on.push(dep.clone());
                }
                if let Some(pred) = edges.get_mut(dep) {
                    pred.precedes.push(stage.name.clone());
                }
            }
        }

        EdgeMap { edges }
    }
}
