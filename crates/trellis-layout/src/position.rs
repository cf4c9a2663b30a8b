//! Coordinate assignment and viewport centring.

use crate::LayoutOptions;
use crate::normalize::LayeredGraph;
use trellis_core::geom::{DiagramRect, Viewport};

/// Assigns `(x, y)` to every layered node from its rank and in-rank order.
///
/// Each rank is packed left to right at the minimum separation and centred on `x = 0`; then
/// `balance_passes` rounds of down/up passes pull task nodes toward the mean x of their
/// neighbours in the adjacent rank without breaking separation or order.
pub fn assign(g: &LayeredGraph, layering: &[Vec<usize>], opts: &LayoutOptions) -> Vec<(f64, f64)> {
    let mut xs = vec![0.0f64; g.nodes.len()];
    let mut ys = vec![0.0f64; g.nodes.len()];
    let rank_step = opts.node_height + opts.rank_sep;

    for layer in layering {
        let mut x = 0.0;
        for (i, &v) in layer.iter().enumerate() {
            if i > 0 {
                x += separation(g, layer[i - 1], v, opts);
            }
            xs[v] = x;
            ys[v] = g.nodes[v].rank as f64 * rank_step;
        }
        let shift = x / 2.0;
        for &v in layer {
            xs[v] -= shift;
        }
    }

    for _ in 0..opts.balance_passes {
        for layer in layering.iter().skip(1) {
            balance_layer(g, layer, &mut xs, opts, true);
        }
        for layer in layering.iter().rev().skip(1) {
            balance_layer(g, layer, &mut xs, opts, false);
        }
    }

    xs.into_iter().zip(ys).collect()
}

/// Centre-to-centre distance between two neighbours in a rank.
fn separation(g: &LayeredGraph, left: usize, right: usize, opts: &LayoutOptions) -> f64 {
    let width = |v: usize| {
        if g.nodes[v].is_dummy() {
            0.0
        } else {
            opts.node_width
        }
    };
    let gap = if g.nodes[left].is_dummy() || g.nodes[right].is_dummy() {
        opts.edge_sep
    } else {
        opts.node_sep
    };
    (width(left) + width(right)) / 2.0 + gap
}

fn balance_layer(
    g: &LayeredGraph,
    layer: &[usize],
    xs: &mut [f64],
    opts: &LayoutOptions,
    downward: bool,
) {
    if layer.is_empty() {
        return;
    }
    let desired: Vec<f64> = layer
        .iter()
        .map(|&v| {
            let node = &g.nodes[v];
            let neighbours = if downward {
                &node.predecessors
            } else {
                &node.successors
            };
            if node.is_dummy() || neighbours.is_empty() {
                return xs[v];
            }
            neighbours.iter().map(|&u| xs[u]).sum::<f64>() / neighbours.len() as f64
        })
        .collect();

    // Push right from the left, push left from the right, then average. Both sweeps keep the
    // minimum separation, so their mean does too.
    let n = layer.len();
    let mut forward = desired.clone();
    for i in 1..n {
        let min = forward[i - 1] + separation(g, layer[i - 1], layer[i], opts);
        forward[i] = forward[i].max(min);
    }
    let mut backward = desired;
    for i in (0..n - 1).rev() {
        let max = backward[i + 1] - separation(g, layer[i], layer[i + 1], opts);
        backward[i] = backward[i].min(max);
    }
    for (i, &v) in layer.iter().enumerate() {
        xs[v] = (forward[i] + backward[i]) / 2.0;
    }
}

/// Bounding box of task nodes (centres plus half extents), or `None` if there are none.
pub fn bounding_box(
    centers: impl IntoIterator<Item = (f64, f64)>,
    opts: &LayoutOptions,
) -> Option<DiagramRect> {
    let (hw, hh) = (opts.node_width / 2.0, opts.node_height / 2.0);
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for (x, y) in centers {
        let b = bounds.get_or_insert((x - hw, y - hh, x + hw, y + hh));
        b.0 = b.0.min(x - hw);
        b.1 = b.1.min(y - hh);
        b.2 = b.2.max(x + hw);
        b.3 = b.3.max(y + hh);
    }
    let (min_x, min_y, max_x, max_y) = bounds?;
    Some(DiagramRect::new(
        trellis_core::geom::point(min_x, min_y),
        euclid::size2(max_x - min_x, max_y - min_y),
    ))
}

/// Offset that centres `bbox` inside the viewport inset by `margin`. An axis that does not fit
/// is aligned to the margin instead.
pub fn centering_offset(bbox: &DiagramRect, viewport: Viewport, margin: f64) -> (f64, f64) {
    fn axis(min: f64, extent: f64, available: f64, margin: f64) -> f64 {
        if extent <= available {
            margin + (available - extent) / 2.0 - min
        } else {
            margin - min
        }
    }
    let avail_w = (viewport.width - 2.0 * margin).max(0.0);
    let avail_h = (viewport.height - 2.0 * margin).max(0.0);
    (
        axis(bbox.min_x(), bbox.width(), avail_w, margin),
        axis(bbox.min_y(), bbox.height(), avail_h, margin),
    )
}
