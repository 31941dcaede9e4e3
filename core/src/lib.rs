//! findroutes-core: weighted shortest paths and simple-path enumeration.
//!
//! A small in-memory graph of labeled vertices joined by undirected weighted
//! edges, plus a `PathFinder` that answers two queries over a snapshot of it:
//! the minimum-weight path between two vertices (label-setting relaxation
//! with a linear-scan frontier) and every simple path between them
//! (depth-first, in edge-insertion order).
//!
//! The crate emits `tracing` events but never installs a subscriber.

mod error;
mod graph;
mod traversal;

pub use error::{Error, Result};
pub use graph::{Edge, Graph, Vertex, Weight};
pub use traversal::{Distance, PathFinder};
