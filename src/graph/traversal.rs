use crate::error::Result;
use crate::graph::store::{Graph, Vertex};
use crate::types::{SearchStrategy, TraversalStrategy};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Traversal and path search over a [`Graph`].
///
/// Every call owns its own frontier and visited set. Neighbors are expanded in
/// edge insertion order, so results are reproducible for a given graph.
pub struct GraphTraversal;

impl GraphTraversal {
    /// Visit every vertex reachable from `start` using the given strategy
    pub fn walk<V: Vertex>(
        graph: &Graph<V>,
        start: &V,
        strategy: TraversalStrategy,
    ) -> Result<Vec<V>> {
        match strategy {
            TraversalStrategy::Bft => Self::bft(graph, start),
            TraversalStrategy::Dft => Self::dft(graph, start),
            TraversalStrategy::DftRecursive => Self::dft_recursive(graph, start),
        }
    }

    /// Find a path from `start` to `destination` using the given strategy
    pub fn search<V: Vertex>(
        graph: &Graph<V>,
        start: &V,
        destination: &V,
        strategy: SearchStrategy,
    ) -> Result<Option<Vec<V>>> {
        match strategy {
            SearchStrategy::Bfs => Self::bfs(graph, start, destination),
            SearchStrategy::Dfs => Self::dfs(graph, start, destination),
            SearchStrategy::DfsRecursive => Self::dfs_recursive(graph, start, destination),
        }
    }

    /// Breadth-first traversal.
    ///
    /// Neighbors are queued even when already visited; duplicates are dropped
    /// when they come off the queue.
    pub fn bft<V: Vertex>(graph: &Graph<V>, start: &V) -> Result<Vec<V>> {
        graph.ensure_vertex(start)?;

        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        queue.push_back(start.clone());

        while let Some(current) = queue.pop_front() {
            if visited.insert(current.clone()) {
                queue.extend(graph.neighbors(&current)?);
                order.push(current);
            }
        }

        debug!("Breadth-first traversal from {:?} visited {} vertices", start, order.len());
        Ok(order)
    }

    /// Depth-first traversal with an explicit stack.
    ///
    /// Neighbors are pushed in insertion order, so the most recently added
    /// edge is followed first.
    pub fn dft<V: Vertex>(graph: &Graph<V>, start: &V) -> Result<Vec<V>> {
        graph.ensure_vertex(start)?;

        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![start.clone()];

        while let Some(current) = stack.pop() {
            if visited.insert(current.clone()) {
                stack.extend(graph.neighbors(&current)?);
                order.push(current);
            }
        }

        debug!("Depth-first traversal from {:?} visited {} vertices", start, order.len());
        Ok(order)
    }

    /// Depth-first traversal in recursive order: a vertex, then each of its
    /// unvisited neighbors in insertion order, fully, before the next one.
    ///
    /// Call frames live on the heap, so chain length is not bounded by the
    /// thread stack.
    pub fn dft_recursive<V: Vertex>(graph: &Graph<V>, start: &V) -> Result<Vec<V>> {
        graph.ensure_vertex(start)?;

        let mut visited = HashSet::new();
        let mut order = vec![start.clone()];
        visited.insert(start.clone());

        let mut frames = vec![Frame::new(graph, start)?];

        while let Some(frame) = frames.last_mut() {
            match frame.next_unvisited(&visited) {
                Some(neighbor) => {
                    visited.insert(neighbor.clone());
                    frames.push(Frame::new(graph, &neighbor)?);
                    order.push(neighbor);
                }
                None => {
                    frames.pop();
                }
            }
        }

        Ok(order)
    }

    /// Breadth-first search over a queue of paths; the first path found is a
    /// shortest one by edge count.
    pub fn bfs<V: Vertex>(graph: &Graph<V>, start: &V, destination: &V) -> Result<Option<Vec<V>>> {
        graph.ensure_vertex(start)?;
        graph.ensure_vertex(destination)?;

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        queue.push_back(vec![start.clone()]);

        while let Some(path) = queue.pop_front() {
            let current = match path.last() {
                Some(current) => current.clone(),
                None => continue,
            };

            if &current == destination {
                return Ok(Some(path));
            }

            if visited.insert(current.clone()) {
                for neighbor in graph.neighbors(&current)? {
                    let mut next_path = path.clone();
                    next_path.push(neighbor);
                    queue.push_back(next_path);
                }
            }
        }

        debug!("No path from {:?} to {:?}", start, destination);
        Ok(None)
    }

    /// Depth-first search over a stack of paths; returns some path, not
    /// necessarily the shortest.
    pub fn dfs<V: Vertex>(graph: &Graph<V>, start: &V, destination: &V) -> Result<Option<Vec<V>>> {
        graph.ensure_vertex(start)?;
        graph.ensure_vertex(destination)?;

        let mut visited = HashSet::new();
        let mut stack = vec![vec![start.clone()]];

        while let Some(path) = stack.pop() {
            let current = match path.last() {
                Some(current) => current.clone(),
                None => continue,
            };

            if &current == destination {
                return Ok(Some(path));
            }

            if visited.insert(current.clone()) {
                for neighbor in graph.neighbors(&current)? {
                    let mut next_path = path.clone();
                    next_path.push(neighbor);
                    stack.push(next_path);
                }
            }
        }

        debug!("No path from {:?} to {:?}", start, destination);
        Ok(None)
    }

    /// Depth-first search in recursive order, trying neighbors in insertion
    /// order and backtracking out of dead ends.
    pub fn dfs_recursive<V: Vertex>(
        graph: &Graph<V>,
        start: &V,
        destination: &V,
    ) -> Result<Option<Vec<V>>> {
        graph.ensure_vertex(start)?;
        graph.ensure_vertex(destination)?;

        if start == destination {
            return Ok(Some(vec![start.clone()]));
        }

        let mut visited = HashSet::new();
        visited.insert(start.clone());

        // The open frames are the current path
        let mut frames = vec![Frame::new(graph, start)?];

        while let Some(frame) = frames.last_mut() {
            match frame.next_unvisited(&visited) {
                Some(neighbor) => {
                    visited.insert(neighbor.clone());
                    let found = &neighbor == destination;
                    frames.push(Frame::new(graph, &neighbor)?);
                    if found {
                        let path = frames.into_iter().map(|frame| frame.vertex).collect();
                        return Ok(Some(path));
                    }
                }
                None => {
                    frames.pop();
                }
            }
        }

        debug!("No path from {:?} to {:?}", start, destination);
        Ok(None)
    }

    /// Every vertex reachable from `start`, including `start` itself
    pub fn reachable<V: Vertex>(graph: &Graph<V>, start: &V) -> Result<HashSet<V>> {
        Ok(Self::bft(graph, start)?.into_iter().collect())
    }
}

/// One suspended level of a recursive walk: a vertex and how far through
/// its neighbors the walk has got.
struct Frame<V> {
    vertex: V,
    neighbors: std::vec::IntoIter<V>,
}

impl<V: Vertex> Frame<V> {
    fn new(graph: &Graph<V>, vertex: &V) -> Result<Self> {
        Ok(Self {
            vertex: vertex.clone(),
            neighbors: graph.neighbors(vertex)?.into_iter(),
        })
    }

    fn next_unvisited(&mut self, visited: &HashSet<V>) -> Option<V> {
        self.neighbors.find(|neighbor| !visited.contains(neighbor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    fn create_test_graph() -> Graph<&'static str> {
        let mut graph = Graph::new();

        // A -> B -> C, A -> D -> C, E isolated
        for vertex in ["A", "B", "C", "D", "E"] {
            graph.add_vertex(vertex);
        }

        graph.add_edge(&"A", &"B");
        graph.add_edge(&"B", &"C");
        graph.add_edge(&"A", &"D");
        graph.add_edge(&"D", &"C");

        graph
    }

    #[test]
    fn test_bft_order() {
        let graph = create_test_graph();
        let order = GraphTraversal::bft(&graph, &"A").unwrap();

        assert_eq!(order, vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn test_dft_follows_latest_edge_first() {
        let graph = create_test_graph();
        let order = GraphTraversal::dft(&graph, &"A").unwrap();

        assert_eq!(order, vec!["A", "D", "C", "B"]);
    }

    #[test]
    fn test_dft_recursive_follows_first_edge_first() {
        let graph = create_test_graph();
        let order = GraphTraversal::dft_recursive(&graph, &"A").unwrap();

        assert_eq!(order, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_recursive_calls_do_not_share_state() {
        let graph = create_test_graph();

        let first = GraphTraversal::dft_recursive(&graph, &"A").unwrap();
        let second = GraphTraversal::dft_recursive(&graph, &"A").unwrap();
        assert_eq!(first, second);

        let first = GraphTraversal::dfs_recursive(&graph, &"A", &"C").unwrap();
        let second = GraphTraversal::dfs_recursive(&graph, &"A", &"C").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Some(vec!["A", "B", "C"]));
    }

    #[test]
    fn test_traversal_of_isolated_vertex() {
        let graph = create_test_graph();

        assert_eq!(GraphTraversal::bft(&graph, &"E").unwrap(), vec!["E"]);
        assert_eq!(GraphTraversal::dft(&graph, &"E").unwrap(), vec!["E"]);
        assert_eq!(GraphTraversal::dft_recursive(&graph, &"E").unwrap(), vec!["E"]);
    }

    #[test]
    fn test_traversal_from_missing_vertex_fails() {
        let graph = create_test_graph();

        for strategy in [
            TraversalStrategy::Bft,
            TraversalStrategy::Dft,
            TraversalStrategy::DftRecursive,
        ] {
            let err = GraphTraversal::walk(&graph, &"Z", strategy).unwrap_err();
            assert!(matches!(err, GraphError::VertexNotFound { .. }));
        }
    }

    #[test]
    fn test_search_to_missing_destination_fails() {
        let graph = create_test_graph();

        let err = GraphTraversal::bfs(&graph, &"A", &"Z").unwrap_err();
        assert!(matches!(err, GraphError::VertexNotFound { .. }));
    }

    #[test]
    fn test_bfs_shortest_path() {
        let graph = create_test_graph();
        let path = GraphTraversal::bfs(&graph, &"A", &"C").unwrap();

        assert_eq!(path, Some(vec!["A", "B", "C"]));
    }

    #[test]
    fn test_dfs_path() {
        let graph = create_test_graph();
        let path = GraphTraversal::dfs(&graph, &"A", &"C").unwrap();

        assert_eq!(path, Some(vec!["A", "D", "C"]));
    }

    #[test]
    fn test_no_path() {
        let graph = create_test_graph();

        for strategy in [
            SearchStrategy::Bfs,
            SearchStrategy::Dfs,
            SearchStrategy::DfsRecursive,
        ] {
            assert_eq!(GraphTraversal::search(&graph, &"C", &"A", strategy).unwrap(), None);
            assert_eq!(GraphTraversal::search(&graph, &"A", &"E", strategy).unwrap(), None);
        }
    }

    #[test]
    fn test_path_to_self() {
        let graph = create_test_graph();

        for strategy in [
            SearchStrategy::Bfs,
            SearchStrategy::Dfs,
            SearchStrategy::DfsRecursive,
        ] {
            let path = GraphTraversal::search(&graph, &"B", &"B", strategy).unwrap();
            assert_eq!(path, Some(vec!["B"]));
        }
    }

    #[test]
    fn test_traversal_terminates_on_cycle() {
        let mut graph = create_test_graph();
        graph.add_edge(&"C", &"A");

        assert_eq!(GraphTraversal::bft(&graph, &"C").unwrap(), vec!["C", "A", "B", "D"]);
        assert_eq!(GraphTraversal::dft_recursive(&graph, &"C").unwrap().len(), 4);
        assert_eq!(
            GraphTraversal::bfs(&graph, &"D", &"B").unwrap(),
            Some(vec!["D", "C", "A", "B"])
        );
    }

    fn create_chain(length: i64) -> Graph<i64> {
        let mut graph = Graph::new();
        for vertex in 0..length {
            graph.add_vertex(vertex);
        }
        for vertex in 1..length {
            graph.add_edge(&(vertex - 1), &vertex);
        }
        graph
    }

    #[test]
    fn test_recursive_order_on_long_chain() {
        let length = 200_000;
        let graph = create_chain(length);

        let order = GraphTraversal::dft_recursive(&graph, &0).unwrap();
        assert_eq!(order.len(), length as usize);
        assert_eq!(order.last(), Some(&(length - 1)));

        let path = GraphTraversal::dfs_recursive(&graph, &0, &(length - 1))
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), length as usize);
        assert!(path.windows(2).all(|pair| pair[1] == pair[0] + 1));

        assert_eq!(GraphTraversal::dfs_recursive(&graph, &(length - 1), &0).unwrap(), None);
    }

    #[test]
    fn test_dfs_recursive_backtracks_out_of_dead_end() {
        let mut graph = create_test_graph();
        graph.add_vertex("F");
        graph.add_edge(&"B", &"E");
        graph.add_edge(&"D", &"F");

        // B's only branches are exhausted before D is tried
        let path = GraphTraversal::dfs_recursive(&graph, &"A", &"F").unwrap();
        assert_eq!(path, Some(vec!["A", "D", "F"]));
    }

    #[test]
    fn test_reachable() {
        let graph = create_test_graph();
        let reachable = GraphTraversal::reachable(&graph, &"B").unwrap();

        assert_eq!(reachable.len(), 2);
        assert!(reachable.contains("B"));
        assert!(reachable.contains("C"));
    }
}
