//! Oracle Benchmark Suite
//!
//! # Scenarios
//!
//! 1. **Long wait chain**: worst case depth for the DFS
//!    - acyclic chain (full scan) vs. chain closed at the end
//!
//! 2. **Dense random graph**: many edges per node, early cycle exit
//!
//! 3. **Banker's safety**: n processes x m kinds, staircase state where
//!    each pass finishes exactly one process (quadratic number of passes)
//!
//! 4. **Request evaluation**: clone + safety check per hypothetical grant

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use alloc_oracle::{AllocationState, Matrix, SafetyChecker, WaitForGraph};

// ============================================================================
// Graph Fixtures
// ============================================================================

fn chain(len: u64, closed: bool) -> WaitForGraph<u64> {
    let mut graph = WaitForGraph::with_capacity(len as usize + 1);
    for i in 0..len {
        graph.add_edge(i, i + 1);
    }
    if closed {
        graph.add_edge(len, 0);
    }
    graph
}

/// Deterministic pseudo-random edges (xorshift), no extra dependency
fn dense(nodes: u64, edges: usize) -> WaitForGraph<u64> {
    let mut state = 0x9E37_79B9_7F4A_7C15_u64;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state % nodes
    };
    (0..edges).map(|_| (next(), next())).collect()
}

// ============================================================================
// Banker Fixtures
// ============================================================================

/// Process i needs `processes - 1 - i` more units of every kind and nothing
/// is free, so only the last row can start and each pass finishes one row.
fn staircase(processes: usize, kinds: usize) -> AllocationState {
    let mut max = Vec::with_capacity(processes * kinds);
    let mut alloc = Vec::with_capacity(processes * kinds);
    for i in 0..processes {
        for _ in 0..kinds {
            max.push((processes - i) as u64);
            alloc.push(1);
        }
    }
    AllocationState::from_demand(
        vec![0; kinds],
        Matrix::from_flat(processes, kinds, max).unwrap(),
        Matrix::from_flat(processes, kinds, alloc).unwrap(),
    )
    .unwrap()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("wait_chain");
    for len in [1_000_u64, 10_000, 100_000] {
        let open = chain(len, false);
        let closed = chain(len, true);
        group.bench_with_input(BenchmarkId::new("acyclic", len), &open, |b, g| {
            b.iter(|| black_box(g.detect_deadlock()));
        });
        group.bench_with_input(BenchmarkId::new("closed", len), &closed, |b, g| {
            b.iter(|| black_box(g.detect_deadlock()));
        });
    }
    group.finish();
}

fn bench_dense(c: &mut Criterion) {
    let graph = dense(1_000, 20_000);
    c.bench_function("dense_find_cycle", |b| {
        b.iter(|| black_box(graph.find_cycle()));
    });
}

fn bench_safety(c: &mut Criterion) {
    let mut group = c.benchmark_group("banker_safety");
    for processes in [10_usize, 100, 500] {
        let state = staircase(processes, 8);
        group.bench_with_input(BenchmarkId::from_parameter(processes), &state, |b, s| {
            b.iter(|| {
                black_box(
                    SafetyChecker::is_safe(s.available(), s.max_demand(), s.allocation(), s.need())
                        .unwrap(),
                )
            });
        });
    }
    group.finish();
}

fn bench_request(c: &mut Criterion) {
    let state = staircase(100, 8);
    // An empty request still pays for the clone and the full safety scan.
    let request = vec![0; 8];
    c.bench_function("evaluate_request_100x8", |b| {
        b.iter(|| black_box(SafetyChecker::evaluate_request(&state, 0, &request).unwrap()));
    });
}

criterion_group!(benches, bench_chain, bench_dense, bench_safety, bench_request);
criterion_main!(benches);
