use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};

/// Edge weight. Non-negative by construction.
pub type Weight = u32;

/// A named node. Identity is the label: two vertices with the same label are
/// the same vertex for every lookup, set and map in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vertex {
    id: String,
}

impl Vertex {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The label, used as the key for all bookkeeping.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&str> for Vertex {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Vertex {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// A directed, weighted edge record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: Vertex,
    pub destination: Vertex,
    pub weight: Weight,
}

/// Undirected weighted graph stored as insertion-ordered vertex and edge lists.
///
/// Each undirected connection is kept as two directed `Edge` records of equal
/// weight: `a -> b` followed by `b -> a`. Vertices are not deduplicated:
/// adding the same label twice yields two entries.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertexes: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known graph size. `edge_count` counts undirected
    /// connections; twice as many records are reserved.
    pub fn with_capacity(vertex_count: usize, edge_count: usize) -> Self {
        Self {
            vertexes: Vec::with_capacity(vertex_count),
            edges: Vec::with_capacity(edge_count * 2),
        }
    }

    pub fn add_vertex(&mut self, vertex: Vertex) {
        self.vertexes.push(vertex);
    }

    /// Connect two existing vertices in both directions with the same weight.
    ///
    /// Fails with [`Error::InvalidEdge`] if either endpoint has not been added.
    pub fn add_edge(&mut self, v1: &Vertex, v2: &Vertex, weight: Weight) -> Result<()> {
        for endpoint in [v1, v2] {
            if !self.contains_vertex(endpoint) {
                return Err(Error::InvalidEdge {
                    from: v1.id().to_string(),
                    to: v2.id().to_string(),
                    missing: endpoint.id().to_string(),
                });
            }
        }

        self.edges.push(Edge {
            source: v1.clone(),
            destination: v2.clone(),
            weight,
        });
        self.edges.push(Edge {
            source: v2.clone(),
            destination: v1.clone(),
            weight,
        });
        Ok(())
    }

    /// Bulk load from `(from, to, weight)` label triples.
    ///
    /// Labels not seen before are added as vertices in first-seen order, so
    /// the vertex list has no duplicates when built this way.
    pub fn from_weighted_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str, Weight)>,
    {
        let mut graph = Self::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (from, to, weight) in pairs {
            for label in [from, to] {
                if seen.insert(label.to_string()) {
                    graph.add_vertex(Vertex::new(label));
                }
            }
            graph.add_edge(&Vertex::new(from), &Vertex::new(to), weight)?;
        }

        Ok(graph)
    }

    pub fn vertexes(&self) -> &[Vertex] {
        &self.vertexes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// First vertex carrying `label`, if any.
    pub fn vertex(&self, label: &str) -> Option<&Vertex> {
        self.vertexes.iter().find(|v| v.id() == label)
    }

    pub fn contains_vertex(&self, vertex: &Vertex) -> bool {
        self.vertex(vertex.id()).is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertexes.len()
    }

    /// Number of directed edge records (two per undirected connection).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
