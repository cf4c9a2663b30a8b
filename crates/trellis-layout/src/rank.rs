//! Longest-path ranking.

use crate::graph::TaskGraph;
use std::collections::VecDeque;

/// Ranks every node not masked out: sources get rank 0 and every other node sits one rank below
/// its deepest predecessor. Masked nodes, and edges touching them, are skipped and get `None`.
///
/// The unmasked subgraph must be acyclic (cycle participants are masked by the caller).
pub fn longest_path(g: &TaskGraph, masked: &[bool]) -> Vec<Option<usize>> {
    let n = g.node_count();
    let mut in_degree = vec![0usize; n];
    for &(v, w) in g.edges() {
        if !masked[v] && !masked[w] {
            in_degree[w] += 1;
        }
    }

    let mut rank: Vec<Option<usize>> = vec![None; n];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for v in 0..n {
        if !masked[v] && in_degree[v] == 0 {
            rank[v] = Some(0);
            queue.push_back(v);
        }
    }

    while let Some(v) = queue.pop_front() {
        let next = rank[v].unwrap_or(0) + 1;
        for &w in g.successors(v) {
            if masked[w] {
                continue;
            }
            rank[w] = Some(rank[w].map_or(next, |r| r.max(next)));
            in_degree[w] -= 1;
            if in_degree[w] == 0 {
                queue.push_back(w);
            }
        }
    }

    debug_assert!(
        (0..n).all(|v| masked[v] || rank[v].is_some()),
        "unmasked cycle left nodes unranked"
    );
    rank
}
