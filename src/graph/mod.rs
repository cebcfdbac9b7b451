pub mod store;
pub mod traversal;

pub use store::{Graph, GraphStatistics, Vertex};
pub use traversal::GraphTraversal;
