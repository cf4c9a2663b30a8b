//! Splits long edges into chains of virtual nodes so every layered edge spans one rank.

use crate::graph::TaskGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerNodeKind {
    /// A laid-out task (index into the task graph).
    Task(usize),
    /// A virtual node on a long edge, used for crossing reduction and spacing only.
    Dummy,
}

#[derive(Debug, Clone)]
pub struct LayerNode {
    pub kind: LayerNodeKind,
    pub rank: usize,
    pub successors: Vec<usize>,
    pub predecessors: Vec<usize>,
}

impl LayerNode {
    pub fn is_dummy(&self) -> bool {
        self.kind == LayerNodeKind::Dummy
    }
}

/// The ranked graph with unit-length edges. Ranked tasks come first, in task insertion order;
/// virtual nodes follow.
#[derive(Debug, Clone, Default)]
pub struct LayeredGraph {
    pub nodes: Vec<LayerNode>,
    /// Layered index of each task, or `None` for unranked tasks (cycle participants).
    pub task_nodes: Vec<Option<usize>>,
    pub max_rank: usize,
}

impl LayeredGraph {
    pub fn build(g: &TaskGraph, ranks: &[Option<usize>]) -> Self {
        let mut layered = LayeredGraph {
            nodes: Vec::new(),
            task_nodes: vec![None; g.node_count()],
            max_rank: 0,
        };

        for (v, rank) in ranks.iter().enumerate() {
            let Some(rank) = *rank else {
                continue;
            };
            layered.task_nodes[v] = Some(layered.push(LayerNodeKind::Task(v), rank));
        }

        for &(v, w) in g.edges() {
            let (Some(from), Some(to)) = (layered.task_nodes[v], layered.task_nodes[w]) else {
                continue;
            };
            let (from_rank, to_rank) = (layered.nodes[from].rank, layered.nodes[to].rank);
            let mut prev = from;
            for rank in (from_rank + 1)..to_rank {
                let dummy = layered.push(LayerNodeKind::Dummy, rank);
                layered.link(prev, dummy);
                prev = dummy;
            }
            layered.link(prev, to);
        }

        tracing::trace!(
            tasks = layered.task_nodes.iter().flatten().count(),
            dummies = layered.nodes.iter().filter(|n| n.is_dummy()).count(),
            "normalized long edges"
        );
        layered
    }

    fn push(&mut self, kind: LayerNodeKind, rank: usize) -> usize {
        self.max_rank = self.max_rank.max(rank);
        self.nodes.push(LayerNode {
            kind,
            rank,
            successors: Vec::new(),
            predecessors: Vec::new(),
        });
        self.nodes.len() - 1
    }

    fn link(&mut self, from: usize, to: usize) {
        self.nodes[from].successors.push(to);
        self.nodes[to].predecessors.push(from);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
