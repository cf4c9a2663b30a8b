//! Pointer interaction state machine.
//!
//! The controller never touches [`DiagramState`] directly: each pointer event returns the
//! [`Action`]s to apply, so a rejected gesture leaves nothing behind in the model. All points
//! are in diagram space; callers convert client coordinates with
//! [`SurfaceTransform`](crate::geom::SurfaceTransform) first.

use crate::config::{GeometryConfig, InteractionConfig};
use crate::geom::DiagramPoint;
use crate::hit::{self, ConnectionHandle};
use crate::model::{Action, DiagramState};

#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub source: ConnectionHandle,
    pub pointer: DiagramPoint,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragState),
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
    hovered: Option<ConnectionHandle>,
    geometry: GeometryConfig,
    config: InteractionConfig,
}

impl InteractionController {
    pub fn new(geometry: GeometryConfig, config: InteractionConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            hovered: None,
            geometry,
            config,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    pub fn drag(&self) -> Option<&DragState> {
        match &self.state {
            InteractionState::Dragging(drag) => Some(drag),
            InteractionState::Idle => None,
        }
    }

    pub fn dragged_handle(&self) -> Option<&ConnectionHandle> {
        self.drag().map(|d| &d.source)
    }

    /// Pointer position tracked for the provisional connection line (only while dragging).
    pub fn pointer(&self) -> Option<DiagramPoint> {
        self.drag().map(|d| d.pointer)
    }

    pub fn hovered_handle(&self) -> Option<&ConnectionHandle> {
        self.hovered.as_ref()
    }

    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    pub fn pointer_down(&mut self, model: &DiagramState, p: DiagramPoint) -> Vec<Action> {
        if self.is_dragging() {
            // A press without a matching release; the previous gesture is dropped.
            tracing::debug!("pointer down while dragging; cancelling previous drag");
            self.state = InteractionState::Idle;
        }

        if let Some(handle) = hit::find_handle_at_position(&model.tasks, p, &self.geometry) {
            tracing::debug!(task = %handle.task_id, position = handle.position.as_str(), "drag started");
            self.hovered = Some(handle.clone());
            self.state = InteractionState::Dragging(DragState {
                source: handle,
                pointer: p,
            });
            return vec![Action::SelectTask(None)];
        }

        let Some(clicked) = hit::find_task_at_position(&model.tasks, p, &self.geometry) else {
            return match model.selected_task {
                Some(_) => vec![Action::SelectTask(None)],
                None => Vec::new(),
            };
        };

        match model.selected_task.as_ref() {
            Some(selected) if *selected == clicked.id => vec![Action::SelectTask(None)],
            Some(selected) if self.config.click_to_connect => vec![
                Action::AddDependency {
                    from: selected.clone(),
                    to: clicked.id.clone(),
                },
                Action::SelectTask(None),
            ],
            _ => vec![Action::SelectTask(Some(clicked.id.clone()))],
        }
    }

    /// Updates hover and, while dragging, the provisional line's end point.
    pub fn pointer_move(&mut self, model: &DiagramState, p: DiagramPoint) {
        if let InteractionState::Dragging(drag) = &mut self.state {
            drag.pointer = p;
        }
        self.hovered = hit::find_handle_at_position(&model.tasks, p, &self.geometry);
    }

    pub fn pointer_up(&mut self, model: &DiagramState, p: DiagramPoint) -> Vec<Action> {
        let InteractionState::Dragging(drag) = std::mem::take(&mut self.state) else {
            return Vec::new();
        };

        let target = hit::find_handle_at_position(&model.tasks, p, &self.geometry);
        match target {
            Some(target) if target.task_id != drag.source.task_id => {
                tracing::debug!(from = %drag.source.task_id, to = %target.task_id, "drag connected");
                vec![Action::AddDependency {
                    from: drag.source.task_id,
                    to: target.task_id,
                }]
            }
            _ => {
                tracing::debug!(task = %drag.source.task_id, "drag cancelled");
                Vec::new()
            }
        }
    }

    /// Drops any gesture in progress, e.g. when the pointer leaves the surface.
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
        self.hovered = None;
    }
}
