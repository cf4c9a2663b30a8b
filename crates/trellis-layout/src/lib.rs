#![forbid(unsafe_code)]

//! Hierarchical (layered) layout for task diagrams.
//!
//! Pipeline: index graph → cycle detection → longest-path ranking → long-edge normalization →
//! crossing reduction → coordinate assignment → viewport centring. Every call builds its own
//! transient graph; nothing is retained between calls, and the result depends only on the
//! inputs.

pub mod cycles;
pub mod graph;
pub mod normalize;
pub mod order;
pub mod position;
pub mod rank;
mod trigger;

pub use trigger::LayoutTrigger;

use indexmap::IndexMap;
use trellis_core::geom::Viewport;
use trellis_core::{DiagramConfig, DiagramState, Dependency, Task, TaskId};

/// Layout parameters. Node extents come from the geometry config so that laid-out boxes match
/// what is drawn and hit-tested.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub node_width: f64,
    pub node_height: f64,
    pub node_sep: f64,
    pub rank_sep: f64,
    pub edge_sep: f64,
    pub margin: f64,
    pub order_sweeps: usize,
    pub balance_passes: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::from(&DiagramConfig::default())
    }
}

impl From<&DiagramConfig> for LayoutOptions {
    fn from(cfg: &DiagramConfig) -> Self {
        Self {
            node_width: cfg.geometry.node_width,
            node_height: cfg.geometry.node_height,
            node_sep: cfg.layout.node_sep,
            rank_sep: cfg.layout.rank_sep,
            edge_sep: cfg.layout.edge_sep,
            margin: cfg.layout.margin,
            order_sweeps: cfg.layout.order_sweeps,
            balance_passes: cfg.layout.balance_passes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOutcome {
    /// Input tasks in input order, with new coordinates.
    pub tasks: Vec<Task>,
    /// Rank of every laid-out task, in task order. Cycle participants have no rank.
    pub ranks: IndexMap<TaskId, usize>,
    /// Tasks that sit on a dependency cycle and kept their previous position.
    pub cyclic: Vec<TaskId>,
}

impl LayoutOutcome {
    pub fn is_cyclic(&self) -> bool {
        !self.cyclic.is_empty()
    }

    /// Writes the new positions into `state` through the model's bulk replace.
    pub fn apply_to(&self, state: &DiagramState) -> DiagramState {
        state.set_tasks(self.tasks.clone())
    }
}

pub fn layout(
    tasks: &[Task],
    dependencies: &[Dependency],
    viewport: Viewport,
    opts: &LayoutOptions,
) -> LayoutOutcome {
    if tasks.is_empty() {
        return LayoutOutcome::default();
    }

    let g = graph::TaskGraph::new(tasks, dependencies);

    let cycles = cycles::find_cycles(&g);
    let masked = cycles::cycle_mask(&g, &cycles);
    let cyclic: Vec<TaskId> = (0..g.node_count())
        .filter(|&v| masked[v])
        .map(|v| g.id(v).clone())
        .collect();
    if !cycles.is_empty() {
        let ids: Vec<&str> = cyclic.iter().map(TaskId::as_str).collect();
        tracing::warn!(
            cycles = cycles.len(),
            tasks = ?ids,
            "dependency cycle detected; cyclic tasks keep their previous positions"
        );
    }

    let ranks = rank::longest_path(&g, &masked);
    let layered = normalize::LayeredGraph::build(&g, &ranks);
    let layering = order::order(&layered, opts.order_sweeps);
    let coords = position::assign(&layered, &layering, opts);

    let placed = || {
        layered
            .task_nodes
            .iter()
            .flatten()
            .map(|&ix| coords[ix])
    };
    let (dx, dy) = position::bounding_box(placed(), opts)
        .map(|bbox| position::centering_offset(&bbox, viewport, opts.margin))
        .unwrap_or((0.0, 0.0));

    let mut seen = rustc_hash::FxHashSet::default();
    let out: Vec<Task> = tasks
        .iter()
        .map(|task| {
            let mut task = task.clone();
            // Only the first task with a given id is in the graph.
            if !seen.insert(task.id.clone()) {
                return task;
            }
            let layered_ix = g
                .node_ix(&task.id)
                .and_then(|v| layered.task_nodes[v]);
            if let Some(ix) = layered_ix {
                let (x, y) = coords[ix];
                task.x = x + dx;
                task.y = y + dy;
            }
            task
        })
        .collect();

    let rank_map: IndexMap<TaskId, usize> = (0..g.node_count())
        .filter_map(|v| ranks[v].map(|r| (g.id(v).clone(), r)))
        .collect();

    tracing::debug!(
        tasks = out.len(),
        ranks = layered.max_rank + 1,
        crossings = order::cross_count(&layered, &layering),
        "layout complete"
    );

    LayoutOutcome {
        tasks: out,
        ranks: rank_map,
        cyclic,
    }
}

/// Lays out a whole model state and returns it with updated positions.
pub fn layout_state(
    state: &DiagramState,
    viewport: Viewport,
    opts: &LayoutOptions,
) -> (DiagramState, LayoutOutcome) {
    let outcome = layout(&state.tasks, &state.dependencies, viewport, opts);
    (outcome.apply_to(state), outcome)
}
