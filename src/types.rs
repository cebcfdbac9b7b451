use crate::graph::Graph;
use crate::social::{PopulationStats, SocialPaths, UserId};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Core types shared by the library and the CLI

/// Order in which a traversal visits vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalStrategy {
    Bft,
    Dft,
    DftRecursive,
}

/// Frontier discipline used to look for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStrategy {
    Bfs,
    Dfs,
    DfsRecursive,
}

impl fmt::Display for TraversalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TraversalStrategy::Bft => "breadth-first",
            TraversalStrategy::Dft => "depth-first",
            TraversalStrategy::DftRecursive => "depth-first (recursive)",
        };
        f.write_str(name)
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchStrategy::Bfs => "breadth-first",
            SearchStrategy::Dfs => "depth-first",
            SearchStrategy::DfsRecursive => "depth-first (recursive)",
        };
        f.write_str(name)
    }
}

/// Directed graph as read from a YAML or JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    pub vertices: Vec<i64>,
    #[serde(default)]
    pub edges: Vec<(i64, i64)>,
}

impl GraphDocument {
    /// Build a graph; edges naming unknown vertices are dropped
    pub fn to_graph(&self) -> Graph<i64> {
        let mut graph = Graph::new();
        for vertex in &self.vertices {
            graph.add_vertex(*vertex);
        }
        for (from, to) in &self.edges {
            graph.add_edge(from, to);
        }
        graph
    }
}

/// Parent/child pairs as read from a YAML or JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AncestryDocument {
    /// `(parent, child)` pairs
    pub pairs: Vec<(i64, i64)>,
}

/// Everything produced by one `social` run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialReport {
    pub source: UserId,
    pub total_users: usize,
    pub population: PopulationStats,
    pub paths: SocialPaths,
    pub network_coverage: f64,
    pub max_degree_of_separation: usize,
    pub generated_at: DateTime<Utc>,
}
