//! Integration tests for the neighbor-graph construction.

use std::collections::BTreeMap;

use kneading_core::neighbor::neighbor_graph_with_config;
use kneading_core::{
    neighbor_graph, neighbor_graph_from_str, Angle, DynamicsError, NeighborGraphConfig, Transform,
};
use num_complex::Complex64;

fn labeled(pairs: &[(&str, &[(&str, Transform)])]) -> BTreeMap<String, BTreeMap<String, Transform>> {
    pairs
        .iter()
        .map(|(v, row)| {
            (
                v.to_string(),
                row.iter().map(|(c, t)| (c.to_string(), *t)).collect(),
            )
        })
        .collect()
}

// ─── the canonical example ───────────────────────────────────────────────────

#[test]
fn half_closes_into_a_self_loop() {
    let expected = labeled(&[
        ("id", &[("h+", Transform::MinusPlus)]),
        ("h+", &[("h+", Transform::PlusMinus)]),
    ]);
    for depth in [1, 2, 3, 6, 20] {
        let g = neighbor_graph(Complex64::new(0.5, 0.0), depth).unwrap();
        assert_eq!(g.to_labeled_map(), expected, "depth {depth}");
        assert!(g.has_cycle());
    }
}

#[test]
fn string_entry_point_matches() {
    let g = neighbor_graph_from_str("0.5+0i", "6").unwrap();
    let h = neighbor_graph(Complex64::new(0.5, 0.0), 6).unwrap();
    assert_eq!(g, h);
    assert_eq!(neighbor_graph_from_str(" 0.5 ", " 6 ").unwrap(), h);
}

// ─── degenerate parameters ───────────────────────────────────────────────────

#[test]
fn degenerate_parameters_give_the_empty_graph() {
    for c in [
        Complex64::new(0.0, 0.0),
        Complex64::new(0.49, 0.0),
        Complex64::new(1.0, 0.0),
        Complex64::new(0.6, 0.8),
        Complex64::new(0.0, -1.5),
    ] {
        assert!(neighbor_graph(c, 10).unwrap().is_empty(), "{c}");
    }
}

#[test]
fn guard_thresholds_are_configurable() {
    let config = NeighborGraphConfig {
        min_modulus: 0.4,
        ..NeighborGraphConfig::default()
    };
    let c = Complex64::new(0.45, 0.0);
    assert!(NeighborGraphConfig::default().is_degenerate(c));
    assert!(!config.is_degenerate(c));

    let half = Complex64::new(0.5, 0.0);
    assert_eq!(
        neighbor_graph_with_config(half, 6, config).unwrap(),
        neighbor_graph(half, 6).unwrap()
    );
}

// ─── structure ───────────────────────────────────────────────────────────────

#[test]
fn node_table_is_consistent() {
    let params = [
        Complex64::new(0.5, 0.5),
        Complex64::new(-0.6, 0.2),
        Complex64::new(0.3, 0.62),
        Complex64::new(0.0, 0.7),
    ];
    for c in params {
        let g = neighbor_graph(c, 9).unwrap();
        for (i, node) in g.nodes().iter().enumerate() {
            let id = g.find_word(&node.word).unwrap();
            assert_eq!(id.index(), i);
        }
        for e in g.edges() {
            assert!(e.source.index() < g.node_count() && e.target.index() < g.node_count());
        }
        if !g.is_empty() {
            assert_eq!(g.root().map(|r| g.vertex_label(r)), Some("id".to_string()));
        }
    }
}

#[test]
fn cantor_parameters_can_leave_an_acyclic_graph() {
    let g = neighbor_graph(Complex64::new(-0.95, 0.0), 8).unwrap();
    assert_eq!(g.node_count(), 1094);
    assert_eq!(g.edge_count(), 1093);
    assert!(!g.has_cycle());

    let g = neighbor_graph(Complex64::new(0.0, 0.7), 6).unwrap();
    assert_eq!(g.node_count(), 18);
    assert!(!g.has_cycle());
}

#[test]
fn escaping_seed_empties_the_graph() {
    // every candidate from `+` leaves the critical disc
    assert!(neighbor_graph(Complex64::new(0.0, 0.55), 8).unwrap().is_empty());
}

#[test]
fn words_record_the_maps() {
    let c = Complex64::new(0.0, 0.7);
    let g = neighbor_graph(c, 9).unwrap();
    for e in g.edges() {
        let source = g.node(e.source);
        let target = g.node(e.target);
        // Either the child was created from this parent, or the edge is a back-edge.
        if target.word.len() == source.word.len() + 1 && target.word.starts_with(&source.word) {
            assert!(target.word.ends_with(e.transform.suffix()));
        }
        let image = e.transform.apply(source.value, c);
        assert!((image - target.value).norm() < 1e-12);
    }
}

#[test]
fn associated_roots_can_seed_the_graph() {
    let root = Angle::from_fraction(1, 6).unwrap().associated_root();
    assert!(root.is_found());
    let g = neighbor_graph(root.value(), 8).unwrap();
    let id = g.root().unwrap();
    let plus = g.find_word("+").unwrap();
    let seed: Vec<_> = g.children(id).collect();
    assert_eq!(seed.len(), 1);
    assert_eq!((seed[0].target, seed[0].transform), (plus, Transform::MinusPlus));
    assert!(g.children(plus).count() >= 2);
}

// ─── validation ──────────────────────────────────────────────────────────────

#[test]
fn malformed_inputs_are_rejected() {
    assert_eq!(
        neighbor_graph_from_str("half", "6"),
        Err(DynamicsError::MalformedParameter { input: "half".into() })
    );
    assert_eq!(
        neighbor_graph_from_str("0.5", "6.5"),
        Err(DynamicsError::MalformedDepth { input: "6.5".into() })
    );
    assert!(matches!(
        neighbor_graph_from_str("0.5", "-1"),
        Err(DynamicsError::MalformedDepth { .. })
    ));
    assert!(matches!(
        neighbor_graph(Complex64::new(f64::NAN, 0.0), 3),
        Err(DynamicsError::NonFiniteParameter { .. })
    ));
}
