//! Transient index-based adjacency over task ids.
//!
//! Built fresh for each layout call from the model's task and dependency lists. Node indices
//! follow task insertion order; edge lists follow dependency order.

use rustc_hash::{FxHashMap, FxHashSet};
use trellis_core::{Dependency, Task, TaskId};

#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    ids: Vec<TaskId>,
    index: FxHashMap<TaskId, usize>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
}

impl TaskGraph {
    /// Edges with unknown endpoints, self-loops and repeated pairs are ignored. A repeated task
    /// id keeps its first occurrence.
    pub fn new(tasks: &[Task], dependencies: &[Dependency]) -> Self {
        let mut g = Self::default();
        for task in tasks {
            if g.index.contains_key(&task.id) {
                continue;
            }
            g.index.insert(task.id.clone(), g.ids.len());
            g.ids.push(task.id.clone());
            g.successors.push(Vec::new());
            g.predecessors.push(Vec::new());
        }

        let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
        for dep in dependencies {
            let (Some(&v), Some(&w)) = (g.index.get(&dep.from), g.index.get(&dep.to)) else {
                continue;
            };
            if v == w || !seen.insert((v, w)) {
                continue;
            }
            g.successors[v].push(w);
            g.predecessors[w].push(v);
            g.edges.push((v, w));
        }
        g
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn id(&self, ix: usize) -> &TaskId {
        &self.ids[ix]
    }

    pub fn node_ix(&self, id: &TaskId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn successors(&self, ix: usize) -> &[usize] {
        &self.successors[ix]
    }

    pub fn predecessors(&self, ix: usize) -> &[usize] {
        &self.predecessors[ix]
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }
}
