//! Layered 2D canvas backend.
//!
//! Four stacked surfaces: background (z 1), dependency edges (z 2), task nodes and handles
//! (z 3) and an interactive layer (z 10) for the drag line and debug overlays. A layer is only
//! cleared and redrawn when its ops change, so a hover change repaints one layer.

use crate::cache::RenderCache;
use crate::draw::{DrawOp, Layer, build_display_list};
use crate::props::{DebugOptions, RenderProps};
use crate::renderer::{
    Container, LayerSpec, PointerEvent, RenderOutcome, Renderer, RendererKind, RendererStatus,
    Surface, redraw_placeholder, show_placeholder,
};
use std::time::Instant;
use trellis_core::geom::{ClientPoint, SurfaceTransform};
use trellis_core::RenderConfig;

struct LayerSurface {
    layer: Layer,
    surface: Box<dyn Surface>,
    drawn: Option<Vec<DrawOp>>,
}

pub struct CanvasRenderer {
    config: RenderConfig,
    cache: RenderCache,
    status: RendererStatus,
    layers: Vec<LayerSurface>,
    placeholder: Option<Box<dyn Surface>>,
    transform: SurfaceTransform,
    debug: DebugOptions,
}

impl CanvasRenderer {
    pub fn new(config: RenderConfig, cache: RenderCache) -> Self {
        Self {
            config,
            cache,
            status: RendererStatus::Detached,
            layers: Vec::new(),
            placeholder: None,
            transform: SurfaceTransform::default(),
            debug: DebugOptions::default(),
        }
    }

    fn map_pointer(&self, mut event: PointerEvent) -> PointerEvent {
        event.diagram = Some(if self.debug.use_adjusted_coordinates {
            self.transform.client_to_diagram(event.client)
        } else {
            self.transform.client_to_diagram_unadjusted(event.client)
        });
        event
    }

    fn fail(&mut self, container: &mut dyn Container, width: f64, height: f64, reason: String) {
        tracing::warn!(%reason, "canvas renderer unavailable");
        for mut layer in self.layers.drain(..) {
            layer.surface.detach();
        }
        self.placeholder = show_placeholder(container, width, height, &reason, &self.config);
        self.status = RendererStatus::Placeholder { reason };
    }

    /// Rebuilds the diagram-to-surface transform for the current layers and pushes it to them.
    fn apply_transform(&mut self, width: f64, height: f64) {
        let origin = self.transform.origin;
        let mut transform = SurfaceTransform::identity(width, height)
            .with_origin(origin.x, origin.y)
            .with_padding(self.config.container_padding);
        if let Some((bw, bh)) = self
            .layers
            .iter()
            .find(|l| l.layer == Layer::Interactive)
            .and_then(|l| l.surface.backing_size())
        {
            transform.backing_size = euclid::size2(bw, bh);
        }
        self.transform = transform;

        let to_surface = transform.diagram_to_surface();
        for layer in &mut self.layers {
            layer.surface.set_transform(&to_surface);
        }
    }
}

impl Renderer for CanvasRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Canvas
    }

    fn status(&self) -> &RendererStatus {
        &self.status
    }

    fn initialize(
        &mut self,
        container: &mut dyn Container,
        width: f64,
        height: f64,
    ) -> RendererStatus {
        self.cleanup();

        for layer in Layer::ALL {
            match container.create_surface(LayerSpec::for_layer(layer, width, height)) {
                Ok(surface) => self.layers.push(LayerSurface {
                    layer,
                    surface,
                    drawn: None,
                }),
                Err(err) => {
                    self.fail(container, width, height, err.to_string());
                    return self.status.clone();
                }
            }
        }

        self.apply_transform(width, height);

        tracing::debug!(width, height, layers = self.layers.len(), "canvas renderer ready");
        self.status = RendererStatus::Ready;
        self.status.clone()
    }

    fn render(&mut self, props: &RenderProps) -> RenderOutcome {
        if self.status != RendererStatus::Ready {
            return RenderOutcome::Unavailable;
        }
        let now = Instant::now();
        if !self.cache.should_render(props, now) {
            tracing::trace!("canvas frame unchanged; skipped");
            return RenderOutcome::Skipped;
        }
        // Identical inputs past their max age: repaint every layer.
        let forced = self.cache.is_current(props);

        let list = build_display_list(props, &self.config);
        let mut primitives = 0;
        for layer in &mut self.layers {
            let ops: Vec<DrawOp> = list.layer(layer.layer).map(|item| item.op.clone()).collect();
            if !forced && layer.drawn.as_ref() == Some(&ops) {
                continue;
            }
            layer.surface.clear();
            for op in &ops {
                layer.surface.draw(op);
            }
            primitives += ops.len();
            layer.drawn = Some(ops);
        }

        self.debug = props.debug;
        self.cache.commit(props.clone(), now);
        RenderOutcome::Drawn { primitives }
    }

    fn cleanup(&mut self) {
        for mut layer in self.layers.drain(..) {
            layer.surface.detach();
        }
        if let Some(mut placeholder) = self.placeholder.take() {
            placeholder.detach();
        }
        self.cache.invalidate();
        self.status = RendererStatus::Detached;
    }

    fn invalidate(&mut self) {
        self.cache.invalidate();
        for layer in &mut self.layers {
            layer.drawn = None;
        }
    }

    fn resize(&mut self, width: f64, height: f64) -> RendererStatus {
        self.invalidate();
        match &self.status {
            RendererStatus::Ready => {}
            RendererStatus::Placeholder { reason } => {
                if let Some(placeholder) = self.placeholder.as_mut() {
                    redraw_placeholder(placeholder.as_mut(), width, height, reason, &self.config);
                }
                return self.status.clone();
            }
            RendererStatus::Detached => return self.status.clone(),
        }

        let failed = self
            .layers
            .iter_mut()
            .find_map(|layer| layer.surface.resize(width, height).err());
        if let Some(err) = failed {
            let reason = err.to_string();
            tracing::warn!(%reason, "canvas layers cannot follow the viewport");
            for mut layer in self.layers.drain(..) {
                layer.surface.detach();
            }
            self.status = RendererStatus::Placeholder { reason };
            return self.status.clone();
        }

        self.apply_transform(width, height);
        tracing::debug!(width, height, "canvas layers resized");
        self.status.clone()
    }

    fn surface_transform(&self) -> Option<SurfaceTransform> {
        Some(self.transform)
    }

    fn set_client_origin(&mut self, origin: ClientPoint) {
        self.transform.origin = origin;
    }

    fn handle_pointer_down(&mut self, event: PointerEvent) -> PointerEvent {
        self.map_pointer(event)
    }

    fn handle_pointer_move(&mut self, event: PointerEvent) -> PointerEvent {
        self.map_pointer(event)
    }

    fn handle_pointer_up(&mut self, event: PointerEvent) -> PointerEvent {
        self.map_pointer(event)
    }
}
