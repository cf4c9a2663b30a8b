#![forbid(unsafe_code)]

//! Task graph model, geometry and pointer interaction (headless).
//!
//! Design goals:
//! - pure state transitions over [`DiagramState`] (every mutation returns a new state)
//! - a single source of truth for handle geometry, shared by drawing and hit-testing
//! - deterministic, testable outputs (no clocks, no I/O)

pub mod config;
pub mod error;
pub mod geom;
pub mod hit;
pub mod ids;
pub mod interaction;
pub mod model;
pub mod persist;

pub use config::{
    DiagramConfig, GeometryConfig, HandleResolution, InteractionConfig, LayoutConfig,
    RelayoutPolicy, RenderConfig, Theme,
};
pub use error::{Error, Result};
pub use geom::{ClientPoint, DiagramPoint, SurfacePoint, SurfaceTransform};
pub use hit::{ConnectionHandle, HandlePosition, HitMode};
pub use ids::TaskId;
pub use interaction::{DragState, InteractionController, InteractionState};
pub use model::{Action, Dependency, DiagramState, Task};
pub use persist::{KeyValueStore, MemoryStore, PersistedDiagram};

#[cfg(test)]
mod tests;
