use crate::error::{GraphError, Result};
use crate::graph::{Graph, Vertex};
use crate::types::AncestryDocument;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Returned by [`earliest_ancestor`] when a vertex has no recorded parent
pub const NO_ANCESTOR: i64 = -1;

/// Finds the earliest known ancestor in a parent/child relation.
///
/// Holds the relation reversed: every edge points from a child to one of
/// its parents.
pub struct AncestorResolver<V> {
    parents: Graph<V>,
}

impl<V: Vertex + Ord> AncestorResolver<V> {
    /// Build from `(parent, child)` pairs
    pub fn from_pairs(pairs: &[(V, V)]) -> Self {
        let mut parents = Graph::new();

        for (parent, child) in pairs {
            // add_vertex would wipe edges already recorded for a known vertex
            for vertex in [parent, child] {
                if !parents.contains_vertex(vertex) {
                    parents.add_vertex(vertex.clone());
                }
            }
            parents.add_edge(child, parent);
        }

        debug!(
            "Ancestor graph built with {} vertices and {} parent links",
            parents.vertex_count(),
            parents.edge_count()
        );

        Self { parents }
    }

    /// Recorded parents of a vertex; empty when it has none or is unknown
    pub fn parents_of(&self, vertex: &V) -> Vec<V> {
        self.parents.get_neighbors(vertex).unwrap_or_default()
    }

    /// Walk up one generation at a time until no member has a parent, then
    /// return the smallest identifier of that oldest generation.
    ///
    /// Members without parents drop out along the way, so only the longest
    /// lines of descent reach the final generation. Returns `None` when
    /// `start` has no parent at all.
    pub fn earliest(&self, start: &V) -> Result<Option<V>> {
        let mut generation: BTreeSet<V> = self.parents_of(start).into_iter().collect();
        if generation.is_empty() {
            return Ok(None);
        }

        let mut depth = 1;
        while generation.iter().any(|member| !self.parents_of(member).is_empty()) {
            // In an acyclic relation no line of descent is longer than the vertex count
            if depth > self.parents.vertex_count() {
                return Err(GraphError::CycleDetected {
                    vertex: format!("{:?}", start),
                });
            }

            generation = generation
                .iter()
                .flat_map(|member| self.parents_of(member))
                .collect();
            depth += 1;
        }

        debug!("Oldest generation above {:?} found at depth {}", start, depth);
        Ok(generation.into_iter().next())
    }
}

impl AncestorResolver<i64> {
    pub fn from_document(document: &AncestryDocument) -> Self {
        Self::from_pairs(&document.pairs)
    }
}

/// Earliest ancestor of `start`, or [`NO_ANCESTOR`] when there is none.
///
/// A cyclic parent relation also yields [`NO_ANCESTOR`].
pub fn earliest_ancestor(pairs: &[(i64, i64)], start: i64) -> i64 {
    match AncestorResolver::from_pairs(pairs).earliest(&start) {
        Ok(Some(ancestor)) => ancestor,
        Ok(None) => NO_ANCESTOR,
        Err(e) => {
            warn!("Ancestor lookup for {} failed, reporting no ancestor: {}", start, e);
            NO_ANCESTOR
        }
    }
}
