//! Render inputs.

use serde::{Deserialize, Serialize};
use trellis_core::geom::{DiagramPoint, Viewport};
use trellis_core::{
    ConnectionHandle, Dependency, DiagramState, GeometryConfig, InteractionController, Task,
    TaskId,
};

/// Developer overlays and per-category draw toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOptions {
    pub show_hit_radius: bool,
    pub show_coordinate_grid: bool,
    pub show_distance_circles: bool,
    /// Map pointer events through the full surface transform. When off, only the surface
    /// offset is removed, which shows what hit-testing sees without scale and padding.
    pub use_adjusted_coordinates: bool,
    pub render_connections: bool,
    pub render_nodes: bool,
    pub render_handles: bool,
    /// Draw the provisional drag line but no dependency edges.
    pub render_only_drag_connections: bool,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self {
            show_hit_radius: false,
            show_coordinate_grid: false,
            show_distance_circles: false,
            use_adjusted_coordinates: true,
            render_connections: true,
            render_nodes: true,
            render_handles: true,
            render_only_drag_connections: false,
        }
    }
}

impl DebugOptions {
    pub fn any_overlay(&self) -> bool {
        self.show_hit_radius || self.show_coordinate_grid || self.show_distance_circles
    }
}

/// Everything a frame is drawn from. Two equal values produce identical frames.
///
/// `geometry` is the configuration the interaction controller hit-tests with, so drawn handles
/// and their hit areas share one source.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderProps {
    pub tasks: Vec<Task>,
    pub dependencies: Vec<Dependency>,
    pub selected_task: Option<TaskId>,
    pub hovered_handle: Option<ConnectionHandle>,
    pub dragged_handle: Option<ConnectionHandle>,
    pub pointer: Option<DiagramPoint>,
    pub viewport: Viewport,
    pub debug: DebugOptions,
    pub geometry: GeometryConfig,
}

impl RenderProps {
    /// Props for a static frame: no hover, no drag.
    pub fn from_state(state: &DiagramState, viewport: Viewport, geometry: &GeometryConfig) -> Self {
        Self {
            tasks: state.tasks.clone(),
            dependencies: state.dependencies.clone(),
            selected_task: state.selected_task.clone(),
            hovered_handle: None,
            dragged_handle: None,
            pointer: None,
            viewport,
            debug: DebugOptions::default(),
            geometry: geometry.clone(),
        }
    }

    /// Props for a live frame, including the controller's hover and drag state.
    pub fn capture(
        state: &DiagramState,
        controller: &InteractionController,
        viewport: Viewport,
        debug: DebugOptions,
    ) -> Self {
        Self {
            tasks: state.tasks.clone(),
            dependencies: state.dependencies.clone(),
            selected_task: state.selected_task.clone(),
            hovered_handle: controller.hovered_handle().cloned(),
            dragged_handle: controller.dragged_handle().cloned(),
            pointer: controller.pointer(),
            viewport,
            debug,
            geometry: controller.geometry().clone(),
        }
    }

    pub fn with_debug(mut self, debug: DebugOptions) -> Self {
        self.debug = debug;
        self
    }
}
