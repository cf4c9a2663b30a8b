//! Strongly connected components (Tarjan).

use crate::graph::TaskGraph;

/// All strongly connected components, in Tarjan's completion order.
///
/// Iterative: the work stack holds `(node, next successor to visit)`, so path length is bounded
/// by heap, not by the call stack.
pub fn strongly_connected_components(g: &TaskGraph) -> Vec<Vec<usize>> {
    let n = g.node_count();
    let mut next_index = 0;
    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut lowlink = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut sccs: Vec<Vec<usize>> = Vec::new();
    let mut work: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if index[root].is_some() {
            continue;
        }
        work.push((root, 0));
        while let Some(&(v, pos)) = work.last() {
            if pos == 0 {
                index[v] = Some(next_index);
                lowlink[v] = next_index;
                next_index += 1;
                stack.push(v);
                on_stack[v] = true;
            }

            if let Some(&w) = g.successors(v).get(pos) {
                if let Some(top) = work.last_mut() {
                    top.1 += 1;
                }
                match index[w] {
                    None => work.push((w, 0)),
                    Some(w_idx) if on_stack[w] => lowlink[v] = lowlink[v].min(w_idx),
                    Some(_) => {}
                }
                continue;
            }

            work.pop();
            if let Some(&(parent, _)) = work.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[v]);
            }
            if Some(lowlink[v]) == index[v] {
                let mut scc = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    scc.push(w);
                    if w == v {
                        break;
                    }
                }
                sccs.push(scc);
            }
        }
    }
    sccs
}

/// Components with more than one node, each sorted by node index, ordered by their first node.
/// Self-loops never reach the graph, so singleton components are acyclic.
pub fn find_cycles(g: &TaskGraph) -> Vec<Vec<usize>> {
    let mut cycles: Vec<Vec<usize>> = strongly_connected_components(g)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|mut scc| {
            scc.sort_unstable();
            scc
        })
        .collect();
    cycles.sort_by_key(|scc| scc[0]);
    cycles
}

/// A per-node mask of cycle participants.
pub fn cycle_mask(g: &TaskGraph, cycles: &[Vec<usize>]) -> Vec<bool> {
    let mut mask = vec![false; g.node_count()];
    for &v in cycles.iter().flatten() {
        mask[v] = true;
    }
    mask
}
