#![forbid(unsafe_code)]

//! Rendering for trellis diagrams.
//!
//! Render props → [`build_display_list`] → one of three backends behind the [`Renderer`] trait:
//! a layered 2D canvas, a declarative keyed scene graph (exportable as SVG), or a GPU triangle
//! batch. Each renderer owns a [`RenderCache`] and skips frames whose inputs have not changed.

pub mod cache;
pub mod canvas;
pub mod draw;
pub mod error;
pub mod gpu;
pub mod props;
pub mod recording;
pub mod renderer;
pub mod scene;
mod svg;

pub use cache::{RenderCache, RenderSnapshot};
pub use canvas::CanvasRenderer;
pub use draw::{DisplayList, DrawOp, Layer, SceneKey, build_display_list};
pub use error::{Error, Result};
pub use gpu::GpuRenderer;
pub use props::{DebugOptions, RenderProps};
pub use renderer::{
    Container, GpuDevice, LayerSpec, PointerEvent, RenderOutcome, Renderer, RendererKind,
    RendererStatus, SceneHost, Surface,
};
pub use scene::{Scene, SceneRenderer};

use std::time::Duration;
use trellis_core::RenderConfig;

/// Builds a renderer of `kind` with its own cache.
pub fn create_renderer(kind: RendererKind, cfg: &RenderConfig) -> Box<dyn Renderer> {
    let cache = RenderCache::new(Duration::from_millis(cfg.redraw_interval_ms));
    match kind {
        RendererKind::Canvas => Box::new(CanvasRenderer::new(cfg.clone(), cache)),
        RendererKind::Scene => Box::new(SceneRenderer::new(cfg.clone(), cache)),
        RendererKind::Gpu => Box::new(GpuRenderer::new(cfg.clone(), cache)),
    }
}

/// Renders a static frame straight to an SVG document, without a container.
pub fn render_svg(props: &RenderProps, cfg: &RenderConfig) -> String {
    Scene::build(props, cfg).to_svg()
}
