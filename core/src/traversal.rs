use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, Vertex, Weight};

/// Accumulated path cost. Absent from the distance map means infinite.
pub type Distance = u64;

/// Shortest-path and simple-path search over a snapshot of a graph's edges.
///
/// The edge list is copied at construction, so later changes to the source
/// `Graph` are not seen. All working state lives inside each query call,
/// which is why queries take `&self`.
#[derive(Debug, Clone)]
pub struct PathFinder {
    edges: Vec<Edge>,
}

/// Per-call label-setting state, keyed by vertex label.
struct Relaxation<'a> {
    settled: HashSet<&'a str>,
    /// Frontier in the order vertices entered it.
    unsettled: Vec<&'a Vertex>,
    distance: HashMap<&'a str, Distance>,
    predecessors: HashMap<&'a str, &'a Vertex>,
}

impl<'a> Relaxation<'a> {
    fn new(source: &'a Vertex) -> Self {
        let mut distance = HashMap::new();
        distance.insert(source.id(), 0);
        Self {
            settled: HashSet::new(),
            unsettled: vec![source],
            distance,
            predecessors: HashMap::new(),
        }
    }

    fn shortest_distance(&self, id: &str) -> Distance {
        self.distance.get(id).copied().unwrap_or(Distance::MAX)
    }

    /// Remove and return the frontier vertex with the smallest distance.
    ///
    /// Linear scan; on equal distances the earliest frontier entry wins.
    fn take_minimum(&mut self) -> Option<&'a Vertex> {
        let mut best: Option<(usize, Distance)> = None;
        for (idx, vertex) in self.unsettled.iter().enumerate() {
            let d = self.shortest_distance(vertex.id());
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((idx, d));
            }
        }
        best.map(|(idx, _)| self.unsettled.remove(idx))
    }

    fn in_frontier(&self, id: &str) -> bool {
        self.unsettled.iter().any(|v| v.id() == id)
    }
}

impl PathFinder {
    pub fn new(graph: &Graph) -> Self {
        Self {
            edges: graph.edges().to_vec(),
        }
    }

    /// The captured edge records, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Destinations of every edge leaving `current`, in edge-insertion order.
    fn neighbors<'a>(&'a self, current: &'a str) -> impl Iterator<Item = &'a Vertex> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source.id() == current)
            .map(|e| &e.destination)
    }

    /// Weight of the first captured edge `from -> to`.
    fn distance(&self, from: &str, to: &str) -> Result<Weight> {
        self.edges
            .iter()
            .find(|e| e.source.id() == from && e.destination.id() == to)
            .map(|e| e.weight)
            .ok_or_else(|| {
                tracing::warn!(from, to, "distance lookup on missing edge");
                Error::DistanceLookup {
                    from: from.to_string(),
                    to: to.to_string(),
                }
            })
    }

    /// Run label-setting relaxation from `source` until the frontier is empty.
    fn relax<'a>(&'a self, source: &'a Vertex) -> Result<Relaxation<'a>> {
        let mut state = Relaxation::new(source);

        while let Some(current) = state.take_minimum() {
            state.settled.insert(current.id());
            let base = state.shortest_distance(current.id());
            tracing::trace!(vertex = %current, distance = base, "settled");

            for neighbor in self.neighbors(current.id()) {
                if state.settled.contains(neighbor.id()) {
                    continue;
                }
                let candidate = base + Distance::from(self.distance(current.id(), neighbor.id())?);
                if candidate < state.shortest_distance(neighbor.id()) {
                    tracing::trace!(vertex = %neighbor, via = %current, distance = candidate, "relaxed");
                    state.distance.insert(neighbor.id(), candidate);
                    state.predecessors.insert(neighbor.id(), current);
                    if !state.in_frontier(neighbor.id()) {
                        state.unsettled.push(neighbor);
                    }
                }
            }
        }

        Ok(state)
    }

    /// Minimum-weight path from `source` to `target`, source first.
    ///
    /// Fails with [`Error::NoPathFound`] when the target is unreachable, and
    /// also when `source == target`: the source never receives a predecessor.
    #[tracing::instrument(skip_all, fields(from = %source, to = %target))]
    pub fn shortest_path(&self, source: &Vertex, target: &Vertex) -> Result<Vec<Vertex>> {
        let state = self.relax(source)?;

        let mut step = match state.predecessors.get(target.id()) {
            Some(&pred) => pred,
            None => {
                return Err(Error::NoPathFound {
                    from: source.id().to_string(),
                    to: target.id().to_string(),
                })
            }
        };

        let mut path = vec![target.clone()];
        loop {
            path.push(step.clone());
            match state.predecessors.get(step.id()) {
                Some(&pred) => step = pred,
                None => break,
            }
        }
        path.reverse();

        tracing::debug!(
            hops = path.len() - 1,
            settled = state.settled.len(),
            "shortest path found"
        );
        Ok(path)
    }

    /// Settled distance of every vertex reachable from `source`, including
    /// `source` itself at zero.
    pub fn shortest_distances(&self, source: &Vertex) -> Result<HashMap<String, Distance>> {
        let state = self.relax(source)?;
        Ok(state
            .distance
            .into_iter()
            .map(|(id, d)| (id.to_string(), d))
            .collect())
    }

    /// Total weight along consecutive vertices of `path`.
    ///
    /// Fails with [`Error::DistanceLookup`] if some consecutive pair is not
    /// joined by an edge.
    pub fn path_weight(&self, path: &[Vertex]) -> Result<Distance> {
        let mut total: Distance = 0;
        for pair in path.windows(2) {
            total += Distance::from(self.distance(pair[0].id(), pair[1].id())?);
        }
        Ok(total)
    }

    /// Every simple path from `source` to `target`, in depth-first order.
    ///
    /// Neighbors are explored in edge-insertion order. Iterative: each stack
    /// frame keeps a cursor into the edge list, and a vertex leaves the
    /// on-path set when its frame is popped.
    #[tracing::instrument(skip_all, fields(from = %source, to = %target))]
    pub fn all_paths(&self, source: &Vertex, target: &Vertex) -> Vec<Vec<Vertex>> {
        let mut paths: Vec<Vec<Vertex>> = Vec::new();
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&Vertex, usize)> = vec![(source, 0)];
        on_path.insert(source.id());

        while let Some(&(current, cursor)) = stack.last() {
            if current.id() == target.id() {
                paths.push(stack.iter().map(|(v, _)| (*v).clone()).collect());
                on_path.remove(current.id());
                stack.pop();
                continue;
            }

            let next = self.edges[cursor..].iter().position(|e| {
                e.source.id() == current.id() && !on_path.contains(e.destination.id())
            });

            match next {
                Some(offset) => {
                    let idx = cursor + offset;
                    if let Some(frame) = stack.last_mut() {
                        frame.1 = idx + 1;
                    }
                    let destination = &self.edges[idx].destination;
                    on_path.insert(destination.id());
                    stack.push((destination, 0));
                }
                None => {
                    on_path.remove(current.id());
                    stack.pop();
                }
            }
        }

        tracing::debug!(paths = paths.len(), "enumerated simple paths");
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(label: &str) -> Vertex {
        Vertex::new(label)
    }

    fn labels(path: &[Vertex]) -> Vec<&str> {
        path.iter().map(|v| v.id()).collect()
    }

    /// n0 - n1 - ... - n(n-1), all weight 1.
    fn make_chain(n: usize) -> Graph {
        let names: Vec<String> = (0..n).map(|i| format!("n{}", i)).collect();
        Graph::from_weighted_pairs(names.windows(2).map(|w| (w[0].as_str(), w[1].as_str(), 1)))
            .unwrap()
    }

    /// Ring of `n` vertices, all weight 1.
    fn make_cycle(n: usize) -> Graph {
        let names: Vec<String> = (0..n).map(|i| format!("n{}", i)).collect();
        Graph::from_weighted_pairs(
            (0..n).map(|i| (names[i].as_str(), names[(i + 1) % n].as_str(), 1)),
        )
        .unwrap()
    }

    /// Complete graph on `n` vertices, all weight 1.
    fn make_complete(n: usize) -> Graph {
        let names: Vec<String> = (0..n).map(|i| format!("n{}", i)).collect();
        let mut pairs = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((names[i].as_str(), names[j].as_str(), 1));
            }
        }
        Graph::from_weighted_pairs(pairs).unwrap()
    }

    // --- Shortest path tests ---

    #[test]
    fn test_shortest_path_chain() {
        let finder = PathFinder::new(&make_chain(6));
        let path = finder.shortest_path(&v("n0"), &v("n5")).unwrap();
        assert_eq!(labels(&path), vec!["n0", "n1", "n2", "n3", "n4", "n5"]);
        assert_eq!(finder.path_weight(&path).unwrap(), 5);
    }

    #[test]
    fn test_shortest_path_prefers_lighter_detour() {
        let g = Graph::from_weighted_pairs([("a", "b", 10), ("a", "c", 1), ("c", "d", 1), ("d", "b", 1)])
            .unwrap();
        let finder = PathFinder::new(&g);
        let path = finder.shortest_path(&v("a"), &v("b")).unwrap();
        assert_eq!(labels(&path), vec!["a", "c", "d", "b"]);
        assert_eq!(finder.path_weight(&path).unwrap(), 3);
    }

    #[test]
    fn test_shortest_path_self_is_error() {
        let finder = PathFinder::new(&make_chain(3));
        let err = finder.shortest_path(&v("n1"), &v("n1")).unwrap_err();
        assert_eq!(
            err,
            Error::NoPathFound {
                from: "n1".into(),
                to: "n1".into()
            }
        );
    }

    #[test]
    fn test_shortest_path_disconnected() {
        let g = Graph::from_weighted_pairs([("a", "b", 1), ("c", "d", 1)]).unwrap();
        let finder = PathFinder::new(&g);
        assert!(matches!(
            finder.shortest_path(&v("a"), &v("d")),
            Err(Error::NoPathFound { .. })
        ));
    }

    #[test]
    fn test_shortest_path_unknown_vertices() {
        let finder = PathFinder::new(&make_chain(3));
        assert!(matches!(
            finder.shortest_path(&v("zz"), &v("n1")),
            Err(Error::NoPathFound { .. })
        ));
        assert!(matches!(
            finder.shortest_path(&v("n0"), &v("zz")),
            Err(Error::NoPathFound { .. })
        ));
    }

    #[test]
    fn test_shortest_path_tie_goes_to_first_frontier_entry() {
        // Two equal routes a-b-d and a-c-d; b entered the frontier first.
        let g = Graph::from_weighted_pairs([("a", "b", 1), ("a", "c", 1), ("b", "d", 1), ("c", "d", 1)])
            .unwrap();
        let finder = PathFinder::new(&g);
        let path = finder.shortest_path(&v("a"), &v("d")).unwrap();
        assert_eq!(labels(&path), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_shortest_path_zero_weights() {
        let g = Graph::from_weighted_pairs([("a", "b", 0), ("b", "c", 0), ("a", "c", 1)]).unwrap();
        let finder = PathFinder::new(&g);
        let path = finder.shortest_path(&v("a"), &v("c")).unwrap();
        assert_eq!(labels(&path), vec!["a", "b", "c"]);
        assert_eq!(finder.path_weight(&path).unwrap(), 0);
    }

    #[test]
    fn test_shortest_path_cycle_takes_short_side() {
        let finder = PathFinder::new(&make_cycle(6));
        let path = finder.shortest_path(&v("n0"), &v("n4")).unwrap();
        assert_eq!(labels(&path), vec!["n0", "n5", "n4"]);
    }

    #[test]
    fn test_repeated_queries_are_independent() {
        let finder = PathFinder::new(&make_chain(4));
        let first = finder.shortest_path(&v("n0"), &v("n3")).unwrap();
        let reverse = finder.shortest_path(&v("n3"), &v("n0")).unwrap();
        let again = finder.shortest_path(&v("n0"), &v("n3")).unwrap();
        assert_eq!(first, again);
        let mut flipped = reverse;
        flipped.reverse();
        assert_eq!(first, flipped);
    }

    #[test]
    fn test_snapshot_ignores_later_graph_changes() {
        let mut g = Graph::from_weighted_pairs([("a", "b", 1)]).unwrap();
        g.add_vertex(v("c"));
        let finder = PathFinder::new(&g);

        g.add_edge(&v("b"), &v("c"), 1).unwrap();
        assert_eq!(finder.edges().len(), 2);
        assert!(finder.shortest_path(&v("a"), &v("c")).is_err());
        assert!(PathFinder::new(&g).shortest_path(&v("a"), &v("c")).is_ok());
    }

    #[test]
    fn test_shortest_distances() {
        let g = Graph::from_weighted_pairs([("a", "b", 4), ("b", "c", 3), ("a", "c", 9), ("x", "y", 1)])
            .unwrap();
        let finder = PathFinder::new(&g);
        let dist = finder.shortest_distances(&v("a")).unwrap();
        assert_eq!(dist.len(), 3);
        assert_eq!(dist["a"], 0);
        assert_eq!(dist["b"], 4);
        assert_eq!(dist["c"], 7);
        assert!(!dist.contains_key("x"));
    }

    #[test]
    fn test_distance_lookup_missing_edge() {
        let finder = PathFinder::new(&make_chain(3));
        assert_eq!(finder.distance("n0", "n1").unwrap(), 1);
        assert_eq!(
            finder.distance("n0", "n2").unwrap_err(),
            Error::DistanceLookup {
                from: "n0".into(),
                to: "n2".into()
            }
        );
        assert!(finder.path_weight(&[v("n0"), v("n2")]).is_err());
    }

    #[test]
    fn test_path_weight_trivial_paths() {
        let finder = PathFinder::new(&make_chain(2));
        assert_eq!(finder.path_weight(&[]).unwrap(), 0);
        assert_eq!(finder.path_weight(&[v("n0")]).unwrap(), 0);
    }

    #[test]
    fn test_neighbors_in_insertion_order() {
        let g = Graph::from_weighted_pairs([("a", "c", 1), ("a", "b", 1), ("d", "a", 1)]).unwrap();
        let finder = PathFinder::new(&g);
        let found: Vec<&str> = finder.neighbors("a").map(|v| v.id()).collect();
        assert_eq!(found, vec!["c", "b", "d"]);
    }

    // --- All paths tests ---

    #[test]
    fn test_all_paths_chain_single() {
        let finder = PathFinder::new(&make_chain(5));
        let paths = finder.all_paths(&v("n0"), &v("n4"));
        assert_eq!(paths.len(), 1);
        assert_eq!(labels(&paths[0]), vec!["n0", "n1", "n2", "n3", "n4"]);
    }

    #[test]
    fn test_all_paths_cycle_both_ways() {
        let finder = PathFinder::new(&make_cycle(5));
        let paths = finder.all_paths(&v("n0"), &v("n2"));
        assert_eq!(paths.len(), 2);
        assert_eq!(labels(&paths[0]), vec!["n0", "n1", "n2"]);
        assert_eq!(labels(&paths[1]), vec!["n0", "n4", "n3", "n2"]);
    }

    #[test]
    fn test_all_paths_complete_graph_count() {
        // K5 between two fixed vertices: 1 + 3 + 3*2 + 3*2*1 simple paths
        let finder = PathFinder::new(&make_complete(5));
        let paths = finder.all_paths(&v("n0"), &v("n4"));
        assert_eq!(paths.len(), 16);

        let unique: HashSet<Vec<&str>> = paths.iter().map(|p| labels(p)).collect();
        assert_eq!(unique.len(), 16);

        for path in &paths {
            let seen: HashSet<&str> = path.iter().map(|v| v.id()).collect();
            assert_eq!(seen.len(), path.len(), "repeated vertex in {:?}", labels(path));
            assert!(finder.path_weight(path).is_ok());
        }
    }

    #[test]
    fn test_all_paths_source_equals_target() {
        let finder = PathFinder::new(&make_cycle(3));
        let paths = finder.all_paths(&v("n1"), &v("n1"));
        assert_eq!(paths, vec![vec![v("n1")]]);
    }

    #[test]
    fn test_all_paths_disconnected_is_empty() {
        let g = Graph::from_weighted_pairs([("a", "b", 1), ("c", "d", 1)]).unwrap();
        let finder = PathFinder::new(&g);
        assert!(finder.all_paths(&v("a"), &v("d")).is_empty());
    }

    #[test]
    fn test_all_paths_does_not_accumulate_across_calls() {
        let finder = PathFinder::new(&make_cycle(4));
        let first = finder.all_paths(&v("n0"), &v("n2"));
        let second = finder.all_paths(&v("n0"), &v("n2"));
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_paths_long_chain() {
        let finder = PathFinder::new(&make_chain(2_000));
        let paths = finder.all_paths(&v("n0"), &v("n1999"));
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 2_000);
    }

    #[test]
    fn test_path_finder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PathFinder>();
    }
}
