use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use walkgraph_core::{Graph, Node, NodeId, Operation};

type BenchGraph = Graph<u64, &'static str>;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1_000_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: walkgraph-bench [mode] [node_count]");
        println!();
        println!("Modes:");
        println!("  all         Run every generator and benchmark each (default)");
        println!("  chain       Single path (full graph depth on the walk stack)");
        println!("  lsystem     Fractal branching tree");
        println!("  scalefree   Preferential attachment via edge sampling (hub-and-spoke)");
        println!("  random      Erdos-Renyi uniform random edges");
        println!("  rings       Disjoint ring components (cycles plus the component sweep)");
        println!("  demo        Five-node walkthrough with printed visits");
        println!();
        println!("Default node_count: 1000000");
        return;
    }

    if mode == "demo" {
        run_demo();
        return;
    }

    println!("walkgraph-bench");
    println!("===============");
    println!();

    let generators: Vec<(&str, fn(u64) -> BenchGraph)> = match mode {
        "chain" => vec![("Chain (single deep path)", gen_chain)],
        "lsystem" => vec![("L-system tree", gen_lsystem)],
        "scalefree" => vec![("Scale-free (edge sampling)", gen_scale_free)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "rings" => vec![("Disjoint rings", gen_rings)],
        "all" => vec![
            ("Chain (single deep path)", gen_chain as fn(u64) -> BenchGraph),
            ("L-system tree", gen_lsystem),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Erdos-Renyi random", gen_random),
            ("Disjoint rings", gen_rings),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count);
    }
}

/// Route the core's tracing events to stderr; RUST_LOG=debug surfaces the
/// per-walk start/complete events.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Counts node visits and edge traversals across walks.
#[derive(Clone, Default)]
struct CountOp {
    nodes: Rc<Cell<u64>>,
    edges: Rc<Cell<u64>>,
}

impl<V, E> Operation<V, E> for CountOp {
    fn on_node(&mut self, _node: &Node<V, E>) -> bool {
        self.nodes.set(self.nodes.get() + 1);
        true
    }

    fn on_edge(&mut self, _label: &E) -> bool {
        self.edges.set(self.edges.get() + 1);
        true
    }
}

fn run_benchmark(name: &str, generator: fn(u64) -> BenchGraph, node_count: u64) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let mut graph = generator(node_count);
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s: {} nodes, {} edges",
        gen_time.as_secs_f64(),
        graph.node_count(),
        graph.edge_count()
    );

    let counter = CountOp::default();
    let (nodes, edges) = (counter.nodes.clone(), counter.edges.clone());
    graph.set_operation(Box::new(counter));

    let t = Instant::now();
    graph.walk().expect("generated graph starts at index 0");
    let elapsed = t.elapsed();
    let (n1, e1) = (nodes.get(), edges.get());
    println!(
        "Walk 1: {} nodes, {} edges traversed in {:.1}ms ({:.1}M nodes/s)",
        n1,
        e1,
        elapsed.as_secs_f64() * 1000.0,
        n1 as f64 / elapsed.as_secs_f64() / 1e6
    );
    if n1 != graph.node_count() as u64 {
        println!(
            "COVERAGE MISMATCH: visited {} of {} nodes",
            n1,
            graph.node_count()
        );
    }

    // Marks were cleared at the end of walk 1, so walk 2 must repeat it.
    let t = Instant::now();
    graph.walk().expect("generated graph starts at index 0");
    let elapsed = t.elapsed();
    let (n2, e2) = (nodes.get() - n1, edges.get() - e1);
    println!(
        "Walk 2: {} nodes, {} edges traversed in {:.1}ms",
        n2,
        e2,
        elapsed.as_secs_f64() * 1000.0
    );
    if (n2, e2) != (n1, e1) {
        println!(
            "REPEAT MISMATCH: walk 1 saw {}/{}, walk 2 saw {}/{}",
            n1, e1, n2, e2
        );
    }
    println!();
}

// ---------------------------------------------------------------------------
// Demo: the classic five-node graph, walked twice
// ---------------------------------------------------------------------------

/// Prints each visited node (with its child count) and each traversed edge.
struct ShowOp;

impl Operation<(), &'static str> for ShowOp {
    fn on_node(&mut self, node: &Node<(), &'static str>) -> bool {
        println!("  {}", node);
        true
    }

    fn on_edge(&mut self, label: &&'static str) -> bool {
        println!("    traversed: {}", label);
        true
    }
}

/// Prints only node names; edge traversals stay silent.
struct NamesOnlyOp;

impl Operation<(), &'static str> for NamesOnlyOp {
    fn on_node(&mut self, node: &Node<(), &'static str>) -> bool {
        println!("  {}", node.name());
        true
    }
}

/// Five nodes, two back edges into node1, node5 unreachable from node1.
/// The first walk starts at node1 and shows everything; the second starts
/// at node3 and shows names only.
fn run_demo() {
    println!("Demo: five-node graph");
    println!("=====================");

    let mut graph: Graph<(), &'static str> = Graph::new("Fred");
    let n1 = graph.add_node(Node::new("node1", ()));
    let n2 = graph.add_node(Node::new("node2", ()));
    let n3 = graph.add_node(Node::new("node3", ()));
    let n4 = graph.add_node(Node::new("node4", ()));
    let n5 = graph.add_node(Node::new("node5", ()));

    graph[n1].add_child(n2, "child of node1");
    graph[n1].add_child(n3, "child of node1");
    graph[n2].add_child(n4, "child of node2");
    graph[n5].add_child(n1, "child of node5");
    graph[n3].add_child(n1, "child of node3");

    graph.set_operation(Box::new(ShowOp));
    println!();
    println!("starting walk at index {}", graph.start_index());
    graph.walk().expect("start index 0 is in range");

    graph.set_start_index(2);
    let prior = graph.set_operation(Box::new(NamesOnlyOp));
    println!();
    println!("starting walk at index {}", graph.start_index());
    graph.walk().expect("start index 2 is in range");

    // Hand the verbose operation back, the way a scoped analysis would.
    graph.set_operation(prior);
    println!();
}

// ---------------------------------------------------------------------------
// Generators: all O(n + edges), single-threaded, deterministic
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
}

const EDGE_LABELS: [&str; 5] = ["NEXT", "BRANCH", "LINK", "REF", "BACK"];

/// Single path: node i points at node i+1.
///
/// The walk's first descent spans the whole graph, so the frame stack
/// grows to the node count. This is the generator that a recursive
/// engine would die on.
fn gen_chain(node_count: u64) -> BenchGraph {
    let mut graph = Graph::with_capacity("chain", node_count as usize);
    let mut rng = FastRng::new(13579);

    let mut prev: Option<NodeId> = None;
    for i in 0..node_count {
        let id = graph.add_node(Node::new(format!("n{}", i), i));
        if let Some(p) = prev {
            graph[p].add_child(id, EDGE_LABELS[rng.next(5) as usize]);
        }
        prev = Some(id);
    }

    graph
}

/// L-system fractal tree: deep branching with self-similar structure.
///
/// Each node spawns 3 children, breadth-first, until the node count is
/// reached. Exponential width with logarithmic depth.
fn gen_lsystem(node_count: u64) -> BenchGraph {
    let mut graph = Graph::with_capacity("lsystem", node_count as usize);
    let mut rng = FastRng::new(42);

    let branching = 3usize;
    let root = graph.add_node(Node::new("n0", 0));

    let mut next_id: u64 = 1;
    let mut frontier: Vec<NodeId> = vec![root];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                let child = graph.add_node(Node::new(format!("n{}", next_id), next_id));
                next_id += 1;
                graph[parent].add_child(child, EDGE_LABELS[rng.next(5) as usize]);
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    graph
}

/// Scale-free via edge-list sampling (O(edges), not O(n²)).
///
/// Preferential attachment by picking a random endpoint of an existing
/// edge: nodes with more edges are more likely to be picked, so hubs
/// emerge. Shared targets exercise the visited-at-selection skip.
fn gen_scale_free(node_count: u64) -> BenchGraph {
    let edges_per_node = 10u64;
    let mut graph = Graph::with_capacity("scalefree", node_count as usize);
    let mut rng = FastRng::new(12345);

    // Endpoint list for O(1) degree-proportional sampling.
    let mut edge_endpoints: Vec<NodeId> =
        Vec::with_capacity((node_count * edges_per_node * 2) as usize);

    // Seed: small clique.
    let seed = 5usize;
    let seed_ids: Vec<NodeId> = (0..seed)
        .map(|i| graph.add_node(Node::new(format!("n{}", i), i as u64)))
        .collect();
    for i in 0..seed {
        for j in (i + 1)..seed {
            graph[seed_ids[i]].add_child(seed_ids[j], EDGE_LABELS[rng.next(5) as usize]);
            edge_endpoints.push(seed_ids[i]);
            edge_endpoints.push(seed_ids[j]);
        }
    }

    // Grow: each new node attaches to up to `edges_per_node` existing nodes.
    for i in seed as u64..node_count {
        let new_node = graph.add_node(Node::new(format!("n{}", i), i));

        let attach = edges_per_node.min(i);
        for _ in 0..attach {
            let idx = rng.next(edge_endpoints.len() as u64) as usize;
            let target = edge_endpoints[idx];
            if target != new_node {
                graph[new_node].add_child(target, EDGE_LABELS[rng.next(5) as usize]);
                edge_endpoints.push(new_node);
                edge_endpoints.push(target);
            }
        }
    }

    graph
}

/// Erdos-Renyi: uniform random edges, ~10 per node on average.
///
/// Baseline topology with no structure; some nodes end up unreachable
/// from the start, so the insertion-order sweep does real work here.
fn gen_random(node_count: u64) -> BenchGraph {
    let target_edges = node_count * 10;
    let mut graph = Graph::with_capacity("random", node_count as usize);
    let mut rng = FastRng::new(54321);

    let ids: Vec<NodeId> = (0..node_count)
        .map(|i| graph.add_node(Node::new(format!("n{}", i), i)))
        .collect();

    for _ in 0..target_edges {
        let from = rng.next(node_count) as usize;
        let to = rng.next(node_count) as usize;
        if from != to {
            graph[ids[from]].add_child(ids[to], EDGE_LABELS[rng.next(5) as usize]);
        }
    }

    graph
}

/// Disjoint ring components of 1000 nodes each.
///
/// Every component is a directed cycle, so each one terminates on the
/// closing back edge, and all components past the first are reached only
/// by the insertion-order sweep.
fn gen_rings(node_count: u64) -> BenchGraph {
    let ring = 1_000usize;
    let mut graph = Graph::with_capacity("rings", node_count as usize);
    let mut rng = FastRng::new(24680);

    let ids: Vec<NodeId> = (0..node_count)
        .map(|i| graph.add_node(Node::new(format!("n{}", i), i)))
        .collect();

    for block in ids.chunks(ring) {
        for w in block.windows(2) {
            graph[w[0]].add_child(w[1], EDGE_LABELS[rng.next(5) as usize]);
        }
        if block.len() > 1 {
            let last = block[block.len() - 1];
            graph[last].add_child(block[0], EDGE_LABELS[rng.next(5) as usize]);
        }
    }

    graph
}
