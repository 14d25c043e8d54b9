//! Topology fixtures shared by the cross-crate integration tests.

use ospfx_core::{Edge, Node};
use ospfx_routing::Topology;

/// Nodes labelled with their own id.
pub fn nodes(ids: &[&str]) -> Vec<Node> {
    ids.iter().map(|id| Node::new(*id, *id)).collect()
}

/// Links from `(id, from, to, cost)` tuples.
pub fn edges(spec: &[(&str, &str, &str, i64)]) -> Vec<Edge> {
    spec.iter()
        .map(|(id, from, to, cost)| Edge::new(*id, *from, *to, *cost))
        .collect()
}

/// `A->B(10), A->C(10), B->D(10), C->D(10)`.
pub fn diamond_edges() -> Vec<Edge> {
    edges(&[
        ("ab", "A", "B", 10),
        ("ac", "A", "C", 10),
        ("bd", "B", "D", 10),
        ("cd", "C", "D", 10),
    ])
}

pub fn diamond() -> Topology {
    Topology::new(nodes(&["A", "B", "C", "D"]), diamond_edges())
        .expect("diamond fixture is valid")
}

/// `A->B(5), B->C(5)`.
pub fn chain() -> Topology {
    Topology::new(
        nodes(&["A", "B", "C"]),
        edges(&[("ab", "A", "B", 5), ("bc", "B", "C", 5)]),
    )
    .expect("chain fixture is valid")
}

/// `stages` diamonds in series, each doubling the equal-cost path count.
/// Routers are `N0..N{stages}` joined through `U{i}` and `L{i}`.
pub fn diamond_ladder(stages: usize) -> Topology {
    let mut node_list = vec![Node::new("N0", "N0")];
    let mut edge_list = Vec::new();
    for i in 0..stages {
        let (from, to) = (format!("N{}", i), format!("N{}", i + 1));
        let (up, low) = (format!("U{}", i), format!("L{}", i));
        for mid in [&up, &low] {
            node_list.push(Node::new(mid.clone(), mid.clone()));
            edge_list.push(Edge::new(format!("{}-{}", from, mid), from.clone(), mid.clone(), 1));
            edge_list.push(Edge::new(format!("{}-{}", mid, to), mid.clone(), to.clone(), 1));
        }
        node_list.push(Node::new(to.clone(), to));
    }
    Topology::new(node_list, edge_list).expect("ladder fixture is valid")
}
