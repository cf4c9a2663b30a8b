//! Task graph state and its pure transitions.
//!
//! Every operation takes `&DiagramState` and returns a new state. Operations are total: invalid
//! requests (unknown ids, self-loops, duplicate edges) leave the state unchanged, so the model
//! invariants hold no matter what a caller sends.

use crate::ids::TaskId;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub from: TaskId,
    pub to: TaskId,
}

impl Dependency {
    pub fn new(from: impl Into<TaskId>, to: impl Into<TaskId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn touches(&self, id: &TaskId) -> bool {
        &self.from == id || &self.to == id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramState {
    pub tasks: Vec<Task>,
    pub dependencies: Vec<Dependency>,
    pub selected_task: Option<TaskId>,
}

/// One model mutation, as issued by a UI shell or the interaction controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddTask(Task),
    DeleteTask(TaskId),
    SelectTask(Option<TaskId>),
    SetTasks(Vec<Task>),
    AddDependency { from: TaskId, to: TaskId },
    SetDependencies(Vec<Dependency>),
}

impl DiagramState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn apply(&self, action: Action) -> Self {
        match action {
            Action::AddTask(task) => self.add_task(task),
            Action::DeleteTask(id) => self.delete_task(&id),
            Action::SelectTask(id) => self.select_task(id),
            Action::SetTasks(tasks) => self.set_tasks(tasks),
            Action::AddDependency { from, to } => self.add_dependency(from, to),
            Action::SetDependencies(deps) => self.set_dependencies(deps),
        }
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.task(id).is_some()
    }

    pub fn has_dependency(&self, from: &TaskId, to: &TaskId) -> bool {
        self.dependencies
            .iter()
            .any(|d| &d.from == from && &d.to == to)
    }

    #[must_use]
    pub fn add_task(&self, task: Task) -> Self {
        if self.contains_task(&task.id) {
            tracing::debug!(task = %task.id, "ignoring add of an existing task id");
            return self.clone();
        }
        let mut next = self.clone();
        next.tasks.push(task);
        next
    }

    #[must_use]
    pub fn delete_task(&self, id: &TaskId) -> Self {
        if !self.contains_task(id) {
            return self.clone();
        }
        Self {
            tasks: self.tasks.iter().filter(|t| &t.id != id).cloned().collect(),
            dependencies: self
                .dependencies
                .iter()
                .filter(|d| !d.touches(id))
                .cloned()
                .collect(),
            selected_task: self.selected_task.clone().filter(|s| s != id),
        }
    }

    #[must_use]
    pub fn select_task(&self, id: Option<TaskId>) -> Self {
        if let Some(id) = id.as_ref() {
            if !self.contains_task(id) {
                tracing::debug!(task = %id, "ignoring selection of an unknown task");
                return self.clone();
            }
        }
        Self {
            selected_task: id,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn add_dependency(&self, from: TaskId, to: TaskId) -> Self {
        if from == to {
            tracing::debug!(task = %from, "ignoring self-loop dependency");
            return self.clone();
        }
        if !self.contains_task(&from) || !self.contains_task(&to) {
            tracing::debug!(%from, %to, "ignoring dependency with a missing endpoint");
            return self.clone();
        }
        if self.has_dependency(&from, &to) {
            return self.clone();
        }
        let mut next = self.clone();
        next.dependencies.push(Dependency { from, to });
        next
    }

    /// Replaces the task list. Dependencies and selection that no longer resolve are dropped.
    #[must_use]
    pub fn set_tasks(&self, tasks: Vec<Task>) -> Self {
        let mut seen: FxHashSet<TaskId> = FxHashSet::default();
        let tasks: Vec<Task> = tasks
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .collect();
        let dependencies = self
            .dependencies
            .iter()
            .filter(|d| seen.contains(&d.from) && seen.contains(&d.to))
            .cloned()
            .collect();
        let selected_task = self.selected_task.clone().filter(|s| seen.contains(s));
        Self {
            tasks,
            dependencies,
            selected_task,
        }
    }

    /// Replaces the dependency list, dropping self-loops, duplicates and dangling edges.
    #[must_use]
    pub fn set_dependencies(&self, dependencies: Vec<Dependency>) -> Self {
        let known: FxHashSet<&TaskId> = self.tasks.iter().map(|t| &t.id).collect();
        let total = dependencies.len();
        let mut seen: FxHashSet<Dependency> = FxHashSet::default();
        let mut kept: Vec<Dependency> = Vec::with_capacity(total);
        for dep in dependencies {
            if dep.from == dep.to || !known.contains(&dep.from) || !known.contains(&dep.to) {
                continue;
            }
            if seen.insert(dep.clone()) {
                kept.push(dep);
            }
        }
        if kept.len() != total {
            tracing::warn!(
                dropped = total - kept.len(),
                "dropped self-loop, duplicate or dangling dependencies"
            );
        }
        Self {
            tasks: self.tasks.clone(),
            dependencies: kept,
            selected_task: self.selected_task.clone(),
        }
    }
}
