//! Crossing reduction: DFS initial order, barycenter sweeps, bilayer cross counting.

use crate::normalize::LayeredGraph;

pub type Layering = Vec<Vec<usize>>;

/// Initial per-rank order from a depth-first walk. Roots are visited by rank, then insertion
/// order; virtual nodes are reached through their edge's source.
pub fn init_order(g: &LayeredGraph) -> Layering {
    if g.is_empty() {
        return Vec::new();
    }
    let mut layers: Layering = vec![Vec::new(); g.max_rank + 1];
    let mut visited = vec![false; g.nodes.len()];

    let mut roots: Vec<usize> = (0..g.nodes.len()).collect();
    roots.sort_by_key(|&v| (g.nodes[v].rank, v));

    let mut stack: Vec<usize> = Vec::new();
    for root in roots {
        stack.push(root);
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            layers[g.nodes[v].rank].push(v);
            // Reverse so the first successor is visited first.
            for &w in g.nodes[v].successors.iter().rev() {
                if !visited[w] {
                    stack.push(w);
                }
            }
        }
    }
    layers
}

/// Runs `sweeps` alternating barycenter passes (down, up, down, ...) and returns the layering
/// with the fewest crossings seen, preferring the earliest on ties.
pub fn order(g: &LayeredGraph, sweeps: usize) -> Layering {
    let mut layering = init_order(g);
    let mut best = layering.clone();
    let mut best_cc = cross_count(g, &layering);

    for i in 0..sweeps {
        if best_cc == 0 {
            break;
        }
        let downward = i % 2 == 0;
        sweep(g, &mut layering, downward);
        let cc = cross_count(g, &layering);
        tracing::trace!(sweep = i, downward, crossings = cc, "barycenter sweep");
        if cc < best_cc {
            best_cc = cc;
            best = layering.clone();
        }
    }
    best
}

fn sweep(g: &LayeredGraph, layering: &mut Layering, downward: bool) {
    let mut position = vec![0usize; g.nodes.len()];
    for layer in layering.iter() {
        for (i, &v) in layer.iter().enumerate() {
            position[v] = i;
        }
    }

    let ranks: Vec<usize> = if downward {
        (1..layering.len()).collect()
    } else {
        (0..layering.len().saturating_sub(1)).rev().collect()
    };

    for rank in ranks {
        let layer = &mut layering[rank];
        let keyed: Vec<(f64, usize)> = layer
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let node = &g.nodes[v];
                let fixed = if downward {
                    &node.predecessors
                } else {
                    &node.successors
                };
                (barycenter(fixed, &position).unwrap_or(i as f64), v)
            })
            .collect();

        let mut sorted = keyed;
        // Stable: equal barycenters keep their current relative order.
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        *layer = sorted.into_iter().map(|(_, v)| v).collect();
        for (i, &v) in layer.iter().enumerate() {
            position[v] = i;
        }
    }
}

fn barycenter(neighbours: &[usize], position: &[usize]) -> Option<f64> {
    if neighbours.is_empty() {
        return None;
    }
    let sum: usize = neighbours.iter().map(|&u| position[u]).sum();
    Some(sum as f64 / neighbours.len() as f64)
}

/// Total edge crossings between every pair of adjacent layers.
pub fn cross_count(g: &LayeredGraph, layering: &[Vec<usize>]) -> usize {
    let mut position = vec![0usize; g.nodes.len()];
    for layer in layering {
        for (i, &v) in layer.iter().enumerate() {
            position[v] = i;
        }
    }
    layering
        .windows(2)
        .map(|pair| two_layer_cross_count(g, &pair[0], &pair[1], &position))
        .sum()
}

/// Bilayer cross count using an accumulator tree over south-layer positions.
fn two_layer_cross_count(
    g: &LayeredGraph,
    north: &[usize],
    south: &[usize],
    position: &[usize],
) -> usize {
    let Some(&first) = south.first() else {
        return 0;
    };
    let south_rank = g.nodes[first].rank;

    let mut south_entries: Vec<usize> = Vec::new();
    for &v in north {
        let mut entries: Vec<usize> = g.nodes[v]
            .successors
            .iter()
            .filter(|&&w| g.nodes[w].rank == south_rank)
            .map(|&w| position[w])
            .collect();
        entries.sort_unstable();
        south_entries.extend(entries);
    }

    let mut first_index = 1usize;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree = vec![0usize; tree_size];

    let mut crossings = 0usize;
    for pos in south_entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum = 0usize;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        crossings += weight_sum;
    }
    crossings
}
