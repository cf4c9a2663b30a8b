#![forbid(unsafe_code)]

//! `trellis` keeps a task-dependency graph, lays it out top to bottom, and lets users draw new
//! dependencies by dragging between connection handles.
//!
//! The [`Diagram`] session wires the pieces together: pointer events go through the interaction
//! controller, the resulting actions update the model, the layout engine repositions tasks when
//! the graph's shape changes, and the attached renderer redraws only when its inputs differ.
//!
//! # Features
//!
//! - `raster`: PNG output via pure-Rust SVG rasterization (`trellis::raster`)

pub use trellis_core::*;

pub mod layout {
    pub use trellis_layout::{
        LayoutOptions, LayoutOutcome, LayoutTrigger, layout, layout_state,
    };
}

pub mod render {
    pub use trellis_render::recording::RecordingContainer;
    pub use trellis_render::{
        Container, DebugOptions, DisplayList, DrawOp, GpuDevice, Layer, LayerSpec, PointerEvent,
        RenderCache, RenderOutcome, RenderProps, Renderer, RendererKind, RendererStatus, Scene,
        SceneHost, Surface, build_display_list, create_renderer, render_svg,
    };
}

#[cfg(feature = "raster")]
pub mod raster;

mod session;

pub use session::Diagram;
