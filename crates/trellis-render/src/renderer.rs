//! The contract between the diagram session and a drawing backend.

use crate::draw::{DrawOp, Layer, placeholder_ops};
use crate::error::{Error, Result};
use crate::gpu::Batch;
use crate::props::RenderProps;
use crate::scene::ScenePatch;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use trellis_core::geom::{ClientPoint, DiagramPoint, DiagramSpace, SurfaceSpace, SurfaceTransform};
use trellis_core::RenderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    #[default]
    Canvas,
    Scene,
    Gpu,
}

impl RendererKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RendererKind::Canvas => "canvas",
            RendererKind::Scene => "scene",
            RendererKind::Gpu => "gpu",
        }
    }

    /// Parses a backend name, falling back to the canvas backend for unknown names.
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(name, "unknown renderer; falling back to canvas");
            RendererKind::Canvas
        })
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRendererKind(pub String);

impl fmt::Display for UnknownRendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown renderer kind: {}", self.0)
    }
}

impl std::error::Error for UnknownRendererKind {}

impl FromStr for RendererKind {
    type Err = UnknownRendererKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canvas" => Ok(RendererKind::Canvas),
            "scene" => Ok(RendererKind::Scene),
            "gpu" => Ok(RendererKind::Gpu),
            _ => Err(UnknownRendererKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RendererStatus {
    /// Not initialised yet, or cleaned up.
    #[default]
    Detached,
    Ready,
    /// Initialisation failed; a placeholder is shown (when possible) and input is ignored.
    Placeholder { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The frame was drawn with `primitives` backend calls.
    Drawn { primitives: usize },
    /// Inputs matched the cached frame; nothing was issued.
    Skipped,
    /// The renderer is not ready.
    Unavailable,
}

impl RenderOutcome {
    pub fn primitives(self) -> usize {
        match self {
            RenderOutcome::Drawn { primitives } => primitives,
            RenderOutcome::Skipped | RenderOutcome::Unavailable => 0,
        }
    }
}

/// A pointer event on its way to the interaction controller. `diagram` is filled in by a
/// backend that knows its surface placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client: ClientPoint,
    pub diagram: Option<DiagramPoint>,
}

impl PointerEvent {
    pub fn new(client: ClientPoint) -> Self {
        Self {
            client,
            diagram: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub name: String,
    pub z_index: i32,
    pub width: f64,
    pub height: f64,
    /// Whether the surface receives pointer input.
    pub interactive: bool,
}

impl LayerSpec {
    pub fn for_layer(layer: Layer, width: f64, height: f64) -> Self {
        Self {
            name: format!("{}-layer", layer.as_str()),
            z_index: layer.z_index(),
            width,
            height,
            interactive: layer == Layer::Interactive,
        }
    }

    pub fn placeholder(width: f64, height: f64) -> Self {
        Self {
            name: "placeholder".to_string(),
            z_index: 0,
            width,
            height,
            interactive: false,
        }
    }
}

/// A 2D immediate-mode drawing surface.
pub trait Surface {
    fn clear(&mut self);
    fn draw(&mut self, op: &DrawOp);

    /// Size of the pixel buffer, when it differs from the layer's on-screen size.
    fn backing_size(&self) -> Option<(f64, f64)> {
        None
    }

    /// Transform applied to every subsequent op, like a 2D context's `setTransform`.
    fn set_transform(&mut self, _transform: &euclid::Transform2D<f64, DiagramSpace, SurfaceSpace>) {
    }

    /// Resizes the surface in place, like assigning a canvas's `width`/`height`. Content and
    /// transform are lost.
    fn resize(&mut self, _width: f64, _height: f64) -> Result<()> {
        Err(Error::Unsupported {
            capability: "surface resize",
        })
    }

    /// Removes the surface from its container.
    fn detach(&mut self) {}
}

/// A retained-tree host that applies keyed patches.
pub trait SceneHost {
    fn apply(&mut self, patches: &[ScenePatch]);
    fn unmount(&mut self) {}
}

pub trait GpuDevice {
    fn clear(&mut self, color: [f32; 4]);
    fn submit(&mut self, batch: &Batch);

    /// Reconfigures the swap chain for a new drawing-area size.
    fn resize(&mut self, _width: f64, _height: f64) -> Result<()> {
        Err(Error::Unsupported {
            capability: "device resize",
        })
    }

    fn release(&mut self) {}
}

/// What the host environment offers a backend. Every capability is optional.
pub trait Container {
    fn create_surface(&mut self, _spec: LayerSpec) -> Result<Box<dyn Surface>> {
        Err(Error::Unsupported {
            capability: "2d surfaces",
        })
    }

    fn mount_scene(&mut self) -> Result<Box<dyn SceneHost>> {
        Err(Error::Unsupported {
            capability: "scene graphs",
        })
    }

    fn create_gpu_device(&mut self, _width: f64, _height: f64) -> Result<Box<dyn GpuDevice>> {
        Err(Error::Unsupported {
            capability: "gpu devices",
        })
    }
}

pub trait Renderer {
    fn kind(&self) -> RendererKind;

    fn status(&self) -> &RendererStatus;

    /// Acquires the backend's surfaces. Never panics: failures are reported as
    /// [`RendererStatus::Placeholder`].
    fn initialize(&mut self, container: &mut dyn Container, width: f64, height: f64)
    -> RendererStatus;

    fn render(&mut self, props: &RenderProps) -> RenderOutcome;

    /// Releases everything acquired by `initialize`. Safe to call more than once.
    fn cleanup(&mut self);

    /// Drops the cached frame so the next render draws.
    fn invalidate(&mut self);

    /// Adapts the acquired surfaces to a new drawing-area size and drops the cached frame. A
    /// backend whose surfaces cannot follow falls back to [`RendererStatus::Placeholder`].
    fn resize(&mut self, width: f64, height: f64) -> RendererStatus;

    /// How client coordinates map onto this backend's surface, if it knows.
    fn surface_transform(&self) -> Option<SurfaceTransform> {
        None
    }

    fn set_client_origin(&mut self, _origin: ClientPoint) {}

    fn is_interactive(&self) -> bool {
        *self.status() == RendererStatus::Ready
    }

    fn handle_pointer_down(&mut self, event: PointerEvent) -> PointerEvent {
        event
    }

    fn handle_pointer_move(&mut self, event: PointerEvent) -> PointerEvent {
        event
    }

    fn handle_pointer_up(&mut self, event: PointerEvent) -> PointerEvent {
        event
    }
}

/// Shows the placeholder on a fresh surface, if the container can provide one.
pub(crate) fn show_placeholder(
    container: &mut dyn Container,
    width: f64,
    height: f64,
    reason: &str,
    cfg: &RenderConfig,
) -> Option<Box<dyn Surface>> {
    match container.create_surface(LayerSpec::placeholder(width, height)) {
        Ok(mut surface) => {
            paint_placeholder(surface.as_mut(), width, height, reason, cfg);
            Some(surface)
        }
        Err(err) => {
            tracing::warn!(error = %err, "cannot show renderer placeholder");
            None
        }
    }
}

/// Resizes an existing placeholder surface and paints it again at the new size.
pub(crate) fn redraw_placeholder(
    surface: &mut dyn Surface,
    width: f64,
    height: f64,
    reason: &str,
    cfg: &RenderConfig,
) {
    if let Err(err) = surface.resize(width, height) {
        tracing::debug!(error = %err, "placeholder keeps its size");
    }
    paint_placeholder(surface, width, height, reason, cfg);
}

fn paint_placeholder(
    surface: &mut dyn Surface,
    width: f64,
    height: f64,
    reason: &str,
    cfg: &RenderConfig,
) {
    surface.clear();
    for op in placeholder_ops(width, height, reason, cfg) {
        surface.draw(&op);
    }
}
