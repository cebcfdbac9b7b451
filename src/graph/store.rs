use crate::error::{GraphError, Result};
use petgraph::dot::{Config as DotConfig, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;
use tracing::debug;

/// Anything usable as a vertex identifier.
pub trait Vertex: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Vertex for T {}

/// Directed graph keyed by vertex identifier, backed by a petgraph DiGraph.
///
/// Outgoing edges behave as a set (no duplicates) and are always reported in
/// the order they were inserted.
pub struct Graph<V> {
    graph: DiGraph<V, ()>,
    node_map: HashMap<V, NodeIndex>,
}

impl<V: Vertex> Graph<V> {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Get the number of vertices in the graph
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a vertex with an empty outgoing edge set.
    ///
    /// Re-adding an existing vertex clears its outgoing edges. Edges pointing
    /// at it from other vertices are kept.
    pub fn add_vertex(&mut self, vertex: V) {
        match self.node_map.get(&vertex) {
            Some(&node_index) => {
                let mut cleared = 0;
                while let Some(edge) = self.graph.first_edge(node_index, Direction::Outgoing) {
                    self.graph.remove_edge(edge);
                    cleared += 1;
                }
                debug!("Reset vertex {:?}, cleared {} outgoing edges", vertex, cleared);
            }
            None => {
                let node_index = self.graph.add_node(vertex.clone());
                self.node_map.insert(vertex, node_index);
            }
        }
    }

    /// Add a directed edge `from -> to`.
    ///
    /// Returns `false` without touching the graph when either endpoint is
    /// missing or the edge already exists.
    pub fn add_edge(&mut self, from: &V, to: &V) -> bool {
        let (from_index, to_index) = match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(&f), Some(&t)) => (f, t),
            _ => {
                debug!("Ignoring edge {:?} -> {:?}: endpoint not in graph", from, to);
                return false;
            }
        };

        if self.graph.find_edge(from_index, to_index).is_some() {
            return false;
        }

        self.graph.add_edge(from_index, to_index, ());
        true
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.node_map.contains_key(vertex)
    }

    pub fn contains_edge(&self, from: &V, to: &V) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(&f), Some(&t)) => self.graph.find_edge(f, t).is_some(),
            _ => false,
        }
    }

    /// Get the outgoing neighbors of a vertex, or `None` if it is not in the graph
    pub fn get_neighbors(&self, vertex: &V) -> Option<Vec<V>> {
        let node_index = self.node_map.get(vertex)?;
        Some(self.neighbors_of(*node_index))
    }

    /// Like [`Graph::get_neighbors`], but a missing vertex is an error
    pub fn neighbors(&self, vertex: &V) -> Result<Vec<V>> {
        self.get_neighbors(vertex)
            .ok_or_else(|| GraphError::vertex_not_found(vertex))
    }

    /// Fail with `VertexNotFound` unless the vertex exists
    pub fn ensure_vertex(&self, vertex: &V) -> Result<()> {
        if self.contains_vertex(vertex) {
            Ok(())
        } else {
            Err(GraphError::vertex_not_found(vertex))
        }
    }

    /// All vertices in the order they were first added
    pub fn vertices(&self) -> Vec<V> {
        self.graph
            .node_indices()
            .map(|node_index| self.graph[node_index].clone())
            .collect()
    }

    fn neighbors_of(&self, node_index: NodeIndex) -> Vec<V> {
        // petgraph yields the newest edge first
        let mut neighbors: Vec<V> = self
            .graph
            .neighbors_directed(node_index, Direction::Outgoing)
            .map(|neighbor_index| self.graph[neighbor_index].clone())
            .collect();
        neighbors.reverse();
        neighbors
    }

    /// Vertices with no outgoing edges
    pub fn leaf_vertices(&self) -> Vec<V> {
        self.vertices_without(Direction::Outgoing)
    }

    /// Vertices with no incoming edges
    pub fn root_vertices(&self) -> Vec<V> {
        self.vertices_without(Direction::Incoming)
    }

    fn vertices_without(&self, direction: Direction) -> Vec<V> {
        self.graph
            .node_indices()
            .filter(|&node_index| {
                self.graph
                    .neighbors_directed(node_index, direction)
                    .next()
                    .is_none()
            })
            .map(|node_index| self.graph[node_index].clone())
            .collect()
    }

    /// Render the graph in Graphviz DOT format
    pub fn to_dot(&self) -> String {
        format!(
            "{:?}",
            Dot::with_config(&self.graph, &[DotConfig::EdgeNoLabel])
        )
    }

    /// Get graph statistics
    pub fn statistics(&self) -> GraphStatistics {
        let total_vertices = self.vertex_count();
        let total_edges = self.edge_count();

        // Each edge adds one to an out-degree and one to an in-degree
        let average_degree = if total_vertices > 0 {
            (2 * total_edges) as f64 / total_vertices as f64
        } else {
            0.0
        };

        GraphStatistics {
            total_vertices,
            total_edges,
            leaf_vertices: self.leaf_vertices().len(),
            root_vertices: self.root_vertices().len(),
            average_degree,
        }
    }
}

impl<V: Vertex> Default for Graph<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphStatistics {
    pub total_vertices: usize,
    pub total_edges: usize,
    pub leaf_vertices: usize,
    pub root_vertices: usize,
    pub average_degree: f64,
}

impl fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices, {} edges, {} roots, {} leaves, average degree {:.2}",
            self.total_vertices,
            self.total_edges,
            self.root_vertices,
            self.leaf_vertices,
            self.average_degree
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_graph() -> Graph<&'static str> {
        let mut graph = Graph::new();

        // A -> B -> C
        // A -> D -> C
        for vertex in ["A", "B", "C", "D"] {
            graph.add_vertex(vertex);
        }

        graph.add_edge(&"A", &"B");
        graph.add_edge(&"B", &"C");
        graph.add_edge(&"A", &"D");
        graph.add_edge(&"D", &"C");

        graph
    }

    #[test]
    fn test_neighbors_in_insertion_order() {
        let graph = create_test_graph();

        assert_eq!(graph.get_neighbors(&"A"), Some(vec!["B", "D"]));
        assert_eq!(graph.get_neighbors(&"C"), Some(vec![]));
        assert_eq!(graph.get_neighbors(&"Z"), None);
    }

    #[test]
    fn test_neighbors_missing_vertex_is_error() {
        let graph = create_test_graph();

        let err = graph.neighbors(&"Z").unwrap_err();
        assert!(matches!(err, GraphError::VertexNotFound { .. }));
    }

    #[test]
    fn test_add_edge_requires_both_endpoints() {
        let mut graph = create_test_graph();

        assert!(!graph.add_edge(&"A", &"Z"));
        assert!(!graph.add_edge(&"Z", &"A"));
        assert_eq!(graph.edge_count(), 4);
        assert!(!graph.contains_vertex(&"Z"));
    }

    #[test]
    fn test_duplicate_edge_is_ignored() {
        let mut graph = create_test_graph();

        assert!(!graph.add_edge(&"A", &"B"));
        assert_eq!(graph.get_neighbors(&"A"), Some(vec!["B", "D"]));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_readding_vertex_clears_outgoing_edges() {
        let mut graph = create_test_graph();

        graph.add_vertex("A");

        assert_eq!(graph.get_neighbors(&"A"), Some(vec![]));
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        // Incoming edges to a reset vertex survive
        graph.add_vertex("C");
        assert!(graph.contains_edge(&"B", &"C"));
        assert!(graph.contains_edge(&"D", &"C"));
    }

    #[test]
    fn test_edge_order_survives_unrelated_removal() {
        let mut graph = Graph::new();
        for vertex in 1..=4 {
            graph.add_vertex(vertex);
        }
        graph.add_edge(&1, &2);
        graph.add_edge(&3, &4);
        graph.add_edge(&1, &3);
        graph.add_edge(&1, &4);

        graph.add_vertex(3);

        assert_eq!(graph.get_neighbors(&1), Some(vec![2, 3, 4]));
    }

    #[test]
    fn test_self_loop_allowed() {
        let mut graph = create_test_graph();

        assert!(graph.add_edge(&"B", &"B"));
        assert_eq!(graph.get_neighbors(&"B"), Some(vec!["C", "B"]));
    }

    #[test]
    fn test_roots_and_leaves() {
        let graph = create_test_graph();

        assert_eq!(graph.root_vertices(), vec!["A"]);
        assert_eq!(graph.leaf_vertices(), vec!["C"]);
    }

    #[test]
    fn test_statistics() {
        let graph = create_test_graph();
        let stats = graph.statistics();

        assert_eq!(stats.total_vertices, 4);
        assert_eq!(stats.total_edges, 4);
        assert_eq!(stats.leaf_vertices, 1);
        assert_eq!(stats.root_vertices, 1);
        assert!((stats.average_degree - 2.0).abs() < f64::EPSILON);
        assert_eq!(
            stats.to_string(),
            "4 vertices, 4 edges, 1 roots, 1 leaves, average degree 2.00"
        );
    }

    #[test]
    fn test_to_dot() {
        let mut graph = Graph::new();
        graph.add_vertex(1);
        graph.add_vertex(2);
        graph.add_edge(&1, &2);

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("0 -> 1"));
    }
}
