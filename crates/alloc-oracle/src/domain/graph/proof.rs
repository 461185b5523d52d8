//! Kani Formal Verification Proofs
//!
//! Small symbolic graphs over a 3-node universe, so the solver explores
//! every edge set instead of a handful of fixtures.

#![cfg(kani)]

use super::detector::CycleDetector;
use super::wait_for::WaitForGraph;

const NODES: u8 = 3;

/// Any self-loop, whatever else is in the graph, is a deadlock
#[kani::proof]
#[kani::unwind(8)]
fn proof_self_loop_always_detected() {
    let x: u8 = kani::any();
    let y: u8 = kani::any();
    kani::assume(x < NODES && y < NODES);

    let mut graph = WaitForGraph::new();
    graph.add_edge(y, x);
    graph.add_edge(x, x);

    kani::assert(graph.detect_deadlock(), "self-loop must be detected");
}

/// A reported cycle is made of real edges and closes on its entry node
#[kani::proof]
#[kani::unwind(8)]
fn proof_reported_cycle_is_real() {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); NODES as usize];
    for from in 0..NODES as usize {
        for to in 0..NODES as usize {
            if kani::any::<bool>() {
                adjacency[from].push(to);
            }
        }
    }

    if let Some(cycle) = CycleDetector::new().find_cycle(&adjacency) {
        kani::assert(!cycle.is_empty(), "cycle must be non-empty");
        for (i, &node) in cycle.iter().enumerate() {
            let next = cycle[(i + 1) % cycle.len()];
            kani::assert(adjacency[node].contains(&next), "cycle step must be an edge");
        }
    }
}

/// With no edge pointing back to a smaller index the graph is acyclic
#[kani::proof]
#[kani::unwind(8)]
fn proof_forward_only_edges_are_acyclic() {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); NODES as usize];
    for from in 0..NODES as usize {
        for to in (from + 1)..NODES as usize {
            if kani::any::<bool>() {
                adjacency[from].push(to);
            }
        }
    }

    kani::assert(
        !CycleDetector::new().has_cycle(&adjacency),
        "forward-only graph must be acyclic",
    );
}
