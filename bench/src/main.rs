use findroutes_core::{Graph, PathFinder, Vertex};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Instant;

mod logging;

/// Upper bound on vertices handed to the all-paths enumerator, which is
/// exponential in the worst case.
const ALL_PATHS_MAX_NODES: u64 = 12;

fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = take_flag(&mut args, "--json");
    let log_json = take_flag(&mut args, "--log-json");

    let mode = args.first().map(|s| s.as_str()).unwrap_or("all");
    let node_count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(2_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: findroutes-bench [mode] [node_count] [--json] [--log-json]");
        println!();
        println!("Modes:");
        println!("  all      Run all generators and benchmark each (default)");
        println!("  grid     Square lattice with random weights (many equal-hop routes)");
        println!("  ring     Cycle with random chords (two long routes plus shortcuts)");
        println!("  random   Erdos-Renyi uniform random edges");
        println!("  barbell  Two dense clusters connected by a thin bridge");
        println!();
        println!("Default node_count: 2000");
        println!("Log filter: FINDROUTES_LOG (default findroutes=info)");
        return;
    }

    if let Err(e) = logging::init_tracing(log_json) {
        eprintln!("failed to initialize logging: {}", e);
    }

    let generators: Vec<(&str, fn(u64) -> Graph)> = match mode {
        "grid" => vec![("Grid lattice", gen_grid)],
        "ring" => vec![("Ring with chords", gen_ring)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "barbell" => vec![("Barbell (cluster-bridge-cluster)", gen_barbell)],
        "all" => vec![
            ("Grid lattice", gen_grid as fn(u64) -> Graph),
            ("Ring with chords", gen_ring),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (cluster-bridge-cluster)", gen_barbell),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    if !json {
        println!("findroutes-bench");
        println!("================");
        println!();
    }

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count, json);
    }
}

/// Remove `flag` from `args`, returning whether it was present.
fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

/// One timed query, emitted as a JSON line with `--json`.
#[derive(Debug, Serialize)]
struct Measurement<'a> {
    generator: &'a str,
    query: &'a str,
    vertices: usize,
    edges: usize,
    from: String,
    to: String,
    elapsed_ms: f64,
    /// Hops on the shortest path, or number of simple paths found.
    result: Option<usize>,
    weight: Option<u64>,
}

fn emit(m: &Measurement<'_>, json: bool) {
    if json {
        match serde_json::to_string(m) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!(error = %e, "failed to serialize measurement"),
        }
        return;
    }

    match (m.query, m.result) {
        ("shortest_path", Some(hops)) => println!(
            "Shortest path {} → {}: {} hops, weight {} in {:.1}ms",
            m.from,
            m.to,
            hops,
            m.weight.unwrap_or_default(),
            m.elapsed_ms
        ),
        ("shortest_path", None) => println!(
            "Shortest path {} → {}: no path ({:.1}ms)",
            m.from, m.to, m.elapsed_ms
        ),
        (_, count) => println!(
            "All paths {} → {} ({} vertices): {} paths in {:.1}ms",
            m.from,
            m.to,
            m.vertices,
            count.unwrap_or_default(),
            m.elapsed_ms
        ),
    }
}

fn run_benchmark(name: &str, generator: fn(u64) -> Graph, node_count: u64, json: bool) {
    let t = Instant::now();
    let graph = generator(node_count);
    let gen_time = t.elapsed();
    tracing::info!(
        generator = name,
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        elapsed_ms = gen_time.as_secs_f64() * 1000.0,
        "generated graph"
    );

    if !json {
        println!("--- {} ---", name);
        println!(
            "Generated in {:.2}s — {} vertices, {} edge records",
            gen_time.as_secs_f64(),
            graph.vertex_count(),
            graph.edge_count()
        );
    }

    // Shortest path: first vertex to last vertex
    let finder = PathFinder::new(&graph);
    if let (Some(from), Some(to)) = (graph.vertexes().first(), graph.vertexes().last()) {
        let t = Instant::now();
        let path = finder.shortest_path(from, to);
        let elapsed = t.elapsed();

        let (result, weight) = match path {
            Ok(p) => {
                let weight = finder.path_weight(&p).ok();
                (Some(p.len() - 1), weight)
            }
            Err(e) => {
                tracing::debug!(error = %e, "no shortest path");
                (None, None)
            }
        };
        emit(
            &Measurement {
                generator: name,
                query: "shortest_path",
                vertices: graph.vertex_count(),
                edges: graph.edge_count(),
                from: from.to_string(),
                to: to.to_string(),
                elapsed_ms: elapsed.as_secs_f64() * 1000.0,
                result,
                weight,
            },
            json,
        );
    }

    // All paths on a small instance of the same topology
    let small = generator(node_count.min(ALL_PATHS_MAX_NODES));
    let small_finder = PathFinder::new(&small);
    if let (Some(from), Some(to)) = (small.vertexes().first(), small.vertexes().last()) {
        let t = Instant::now();
        let paths = small_finder.all_paths(from, to);
        let elapsed = t.elapsed();
        emit(
            &Measurement {
                generator: name,
                query: "all_paths",
                vertices: small.vertex_count(),
                edges: small.edge_count(),
                from: from.to_string(),
                to: to.to_string(),
                elapsed_ms: elapsed.as_secs_f64() * 1000.0,
                result: Some(paths.len()),
                weight: None,
            },
            json,
        );
    }

    if !json {
        println!();
    }
}

// ---------------------------------------------------------------------------
// Generators: deterministic, single-threaded, one vertex label per index
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn weight(&mut self) -> u32 {
        1 + self.next(100) as u32
    }
}

fn label(i: u64) -> Vertex {
    Vertex::new(format!("v{}", i))
}

/// Accumulates a generated graph, skipping self-loops and repeated pairs so
/// the result stays a simple graph.
struct Builder {
    graph: Graph,
    seen: HashSet<(u64, u64)>,
}

impl Builder {
    /// `node_count` vertices `v0..` and no edges yet.
    fn new(node_count: u64, edge_hint: u64) -> Self {
        let mut graph = Graph::with_capacity(node_count as usize, edge_hint as usize);
        for i in 0..node_count {
            graph.add_vertex(label(i));
        }
        Self {
            graph,
            seen: HashSet::with_capacity(edge_hint as usize),
        }
    }

    fn connect(&mut self, a: u64, b: u64, weight: u32) {
        if a == b || !self.seen.insert((a.min(b), a.max(b))) {
            return;
        }
        // Both endpoints were added in `new`; a rejection means a generator bug.
        if let Err(e) = self.graph.add_edge(&label(a), &label(b), weight) {
            tracing::error!(error = %e, "generator produced an invalid edge");
        }
    }

    fn finish(self) -> Graph {
        self.graph
    }
}

/// Square lattice: each vertex joins its right and lower neighbor.
fn gen_grid(node_count: u64) -> Graph {
    let side = ((node_count as f64).sqrt() as u64).max(1);
    let mut b = Builder::new(node_count, node_count * 2);
    let mut rng = FastRng::new(42);

    for i in 0..node_count {
        if (i + 1) % side != 0 && i + 1 < node_count {
            b.connect(i, i + 1, rng.weight());
        }
        if i + side < node_count {
            b.connect(i, i + side, rng.weight());
        }
    }

    b.finish()
}

/// Ring with one random chord per ten vertices.
fn gen_ring(node_count: u64) -> Graph {
    let mut b = Builder::new(node_count, node_count + node_count / 10);
    let mut rng = FastRng::new(67890);

    if node_count < 2 {
        return b.finish();
    }
    for i in 0..node_count {
        b.connect(i, (i + 1) % node_count, rng.weight());
    }
    for _ in 0..node_count / 10 {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        b.connect(from, to, rng.weight());
    }

    b.finish()
}

/// Erdos-Renyi: roughly three undirected edges per vertex.
fn gen_random(node_count: u64) -> Graph {
    let target_edges = node_count * 3;
    let mut b = Builder::new(node_count, target_edges);
    let mut rng = FastRng::new(54321);

    if node_count < 2 {
        return b.finish();
    }
    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        b.connect(from, to, rng.weight());
    }

    b.finish()
}

/// Barbell: two dense clusters joined by a chain of bridge vertices.
///
/// Every route between the clusters funnels through the bridge.
fn gen_barbell(node_count: u64) -> Graph {
    let bridge_len = (node_count / 10).clamp(1, 10).min(node_count);
    let cluster = (node_count - bridge_len) / 2;
    let total = cluster * 2 + bridge_len;
    let mut b = Builder::new(total, cluster * 8 + bridge_len);
    let mut rng = FastRng::new(99999);

    let b_start = cluster + bridge_len;
    if cluster > 1 {
        for base in [0, b_start] {
            for i in 0..cluster {
                for _ in 0..4 {
                    let other = rng.next(cluster);
                    b.connect(base + i, base + other, rng.weight());
                }
            }
        }
    }

    // Chain: last of cluster A → bridge → first of cluster B
    for id in cluster.max(1)..=b_start.min(total.saturating_sub(1)) {
        b.connect(id - 1, id, rng.weight());
    }

    b.finish()
}
