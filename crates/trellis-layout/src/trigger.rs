//! When to lay the diagram out again.

use trellis_core::geom::Viewport;
use trellis_core::{DiagramState, RelayoutPolicy};

#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutKey {
    tasks: usize,
    dependencies: usize,
    viewport: Viewport,
}

/// Remembers what the last layout was computed for.
///
/// Under [`RelayoutPolicy::OnCountChange`] a new layout is due only when the task count, the
/// dependency count or the viewport differs from the last one recorded. Renaming a task, or
/// deleting one task while adding another, keeps the current positions.
#[derive(Debug, Clone, Default)]
pub struct LayoutTrigger {
    policy: RelayoutPolicy,
    last: Option<LayoutKey>,
}

impl LayoutTrigger {
    pub fn new(policy: RelayoutPolicy) -> Self {
        Self { policy, last: None }
    }

    pub fn policy(&self) -> RelayoutPolicy {
        self.policy
    }

    pub fn should_relayout(&self, state: &DiagramState, viewport: Viewport) -> bool {
        match self.policy {
            RelayoutPolicy::EveryMutation => true,
            RelayoutPolicy::OnCountChange => self.last != Some(Self::key(state, viewport)),
        }
    }

    pub fn record(&mut self, state: &DiagramState, viewport: Viewport) {
        self.last = Some(Self::key(state, viewport));
    }

    /// Forgets the last layout so the next check reports one is due.
    pub fn reset(&mut self) {
        self.last = None;
    }

    fn key(state: &DiagramState, viewport: Viewport) -> LayoutKey {
        LayoutKey {
            tasks: state.tasks.len(),
            dependencies: state.dependencies.len(),
            viewport,
        }
    }
}
