//! # Neighbor graphs
//!
//! Builds the neighbor graph of a few parameters, including the associated
//! parameter of 1/6, and prints the nested vertex → child view.
//!
//! Pass a parameter and a depth to inspect your own: `cargo run --example
//! neighbor_graph -- 0.5+0.3i 8`.

use kneading_core::{neighbor_graph, neighbor_graph_from_str, Angle, NeighborGraph};
use num_complex::Complex64;

fn show(label: &str, graph: &NeighborGraph) {
    println!(
        "  {label}: {} nodes, {} edges, cycle: {}",
        graph.node_count(),
        graph.edge_count(),
        graph.has_cycle()
    );
    for (vertex, children) in graph.to_labeled_map().iter().take(12) {
        let row: Vec<String> = children.iter().map(|(c, t)| format!("{c} ({t})")).collect();
        println!("    {vertex:<14} → {}", row.join(", "));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kneading_core=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [param, depth] = args.as_slice() {
        match neighbor_graph_from_str(param, depth) {
            Ok(g) => show(param, &g),
            Err(e) => eprintln!("error: {e}"),
        }
        return;
    }

    let mut params = vec![
        ("0.5", Complex64::new(0.5, 0.0)),
        ("0.5+0.5i", Complex64::new(0.5, 0.5)),
        ("0.3i", Complex64::new(0.0, 0.3)),
    ];
    if let Ok(theta) = Angle::from_fraction(1, 6) {
        if let Some(c) = theta.associated_root().to_option() {
            params.push(("root of 1/6", c));
        }
    }

    for (label, c) in params {
        match neighbor_graph(c, 8) {
            Ok(g) => show(label, &g),
            Err(e) => eprintln!("  {label}: {e}"),
        }
    }
}
