//! Cycle Detector - Iterative Three-Color DFS
//!
//! # Algorithm
//!
//! Every node is in one of three states:
//!
//! | State       | Representation              |
//! |-------------|-----------------------------|
//! | unvisited   | in neither set              |
//! | in-progress | `in_progress` (on the path) |
//! | done        | `done`                      |
//!
//! Each unvisited node is used as a root. Exploration keeps an explicit stack
//! of `(node, edge cursor)` frames instead of recursing, so a wait chain of
//! any length is walked in constant call depth:
//!
//! ```text
//! top frame has an unread edge -> next
//!   next in-progress  => cycle: stack from `next` upwards, stop
//!   next unvisited    => mark in-progress, push frame
//!   next done         => skip
//! top frame exhausted => mark done, pop
//! ```
//!
//! Done nodes are never explored again, so a full scan is O(V + E).
//! Duplicate edges only cost an extra cursor step.

use super::bitset::BitSet;

/// One level of the explicit DFS stack
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    cursor: usize,
}

/// Reusable scratch space for cycle searches over dense adjacency lists
#[derive(Debug, Default)]
pub struct CycleDetector {
    in_progress: BitSet,
    done: BitSet,
    stack: Vec<Frame>,
}

impl CycleDetector {
    /// Create a detector with empty scratch space
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `adjacency` contains at least one directed cycle
    ///
    /// `adjacency[i]` lists the nodes `i` waits on; every listed index must
    /// be `< adjacency.len()`.
    pub fn has_cycle(&mut self, adjacency: &[Vec<usize>]) -> bool {
        self.search(adjacency).is_some()
    }

    /// First cycle found, as dense indices starting at the entry node
    ///
    /// Roots are tried in index order. The returned path `[a, b, .., z]`
    /// satisfies `a -> b -> .. -> z -> a`; a self-loop yields `[a]`.
    pub fn find_cycle(&mut self, adjacency: &[Vec<usize>]) -> Option<Vec<usize>> {
        self.search(adjacency).map(|entry| self.path_from(entry))
    }

    /// Entry node of the first cycle found; the stack is left holding the
    /// path from that entry to the closing edge
    fn search(&mut self, adjacency: &[Vec<usize>]) -> Option<usize> {
        self.reset(adjacency.len());

        for root in 0..adjacency.len() {
            if self.done.contains(root) {
                continue;
            }
            if let Some(entry) = self.explore(root, adjacency) {
                return Some(entry);
            }
        }
        None
    }

    fn reset(&mut self, len: usize) {
        self.in_progress = BitSet::with_len(len);
        self.done = BitSet::with_len(len);
        self.stack.clear();
    }

    fn explore(&mut self, root: usize, adjacency: &[Vec<usize>]) -> Option<usize> {
        self.in_progress.insert(root);
        self.stack.push(Frame { node: root, cursor: 0 });

        while let Some(frame) = self.stack.last_mut() {
            let node = frame.node;

            match adjacency[node].get(frame.cursor) {
                Some(&next) => {
                    frame.cursor += 1;

                    if self.in_progress.contains(next) {
                        return Some(next);
                    }
                    if !self.done.contains(next) {
                        self.in_progress.insert(next);
                        self.stack.push(Frame { node: next, cursor: 0 });
                    }
                }
                None => {
                    self.in_progress.remove(node);
                    self.done.insert(node);
                    self.stack.pop();
                }
            }
        }
        None
    }

    /// Nodes on the current path from `entry` to the top of the stack
    fn path_from(&self, entry: usize) -> Vec<usize> {
        let start = self
            .stack
            .iter()
            .position(|frame| frame.node == entry)
            .unwrap_or(0);
        self.stack[start..].iter().map(|frame| frame.node).collect()
    }
}
