//! GPU backend: tessellates the display list into a triangle batch.

use crate::cache::RenderCache;
use crate::draw::{DisplayList, DrawOp, Layer, Stroke, build_display_list};
use crate::props::RenderProps;
use crate::renderer::{
    Container, GpuDevice, RenderOutcome, Renderer, RendererKind, RendererStatus, Surface,
    redraw_placeholder, show_placeholder,
};
use std::f64::consts::TAU;
use std::str::FromStr;
use std::time::Instant;
use trellis_core::geom::DiagramPoint;
use trellis_core::RenderConfig;

const CURVE_STEPS: usize = 16;
/// Dashes emitted per polyline before the rest is stroked solid.
const MAX_DASHES: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Text the device draws with its own glyph pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub position: [f32; 2],
    pub text: String,
    pub color: [f32; 4],
    pub size: f32,
}

/// One frame of geometry: a triangle list (three vertices per triangle) plus text runs, both in
/// draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub vertices: Vec<Vertex>,
    pub text_runs: Vec<TextRun>,
}

impl Batch {
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    fn triangle(&mut self, a: [f64; 2], b: [f64; 2], c: [f64; 2], color: [f32; 4]) {
        for p in [a, b, c] {
            self.vertices.push(Vertex {
                position: [p[0] as f32, p[1] as f32],
                color,
            });
        }
    }

    fn quad(&mut self, a: [f64; 2], b: [f64; 2], c: [f64; 2], d: [f64; 2], color: [f32; 4]) {
        self.triangle(a, b, c, color);
        self.triangle(a, c, d, color);
    }

    /// A straight segment of the given width as a quad.
    fn segment(&mut self, from: [f64; 2], to: [f64; 2], width: f64, color: [f32; 4]) {
        let (dx, dy) = (to[0] - from[0], to[1] - from[1]);
        let len = (dx * dx + dy * dy).sqrt();
        if len <= f64::EPSILON {
            return;
        }
        let (nx, ny) = (-dy / len * width / 2.0, dx / len * width / 2.0);
        self.quad(
            [from[0] + nx, from[1] + ny],
            [to[0] + nx, to[1] + ny],
            [to[0] - nx, to[1] - ny],
            [from[0] - nx, from[1] - ny],
            color,
        );
    }

    fn polyline(&mut self, points: &[[f64; 2]], stroke: &Stroke) {
        let color = parse_color(&stroke.color);
        let Some([dash, gap]) = stroke.dash else {
            for pair in points.windows(2) {
                self.segment(pair[0], pair[1], stroke.width, color);
            }
            return;
        };

        let period = dash + gap;
        if !(dash > 0.0 && gap >= 0.0 && period.is_finite()) {
            tracing::debug!(dash, gap, "degenerate dash pattern; stroking solid");
            for pair in points.windows(2) {
                self.segment(pair[0], pair[1], stroke.width, color);
            }
            return;
        }

        // Walk the polyline, emitting only the "on" parts of the dash pattern.
        let mut phase = 0.0f64;
        let mut dashes = 0;
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let len = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
            if !len.is_finite() {
                continue;
            }
            let lerp = |s: f64| [a[0] + (b[0] - a[0]) * s / len, a[1] + (b[1] - a[1]) * s / len];
            let mut t = 0.0;
            while t < len {
                if dashes >= MAX_DASHES {
                    self.segment(lerp(t), b, stroke.width, color);
                    break;
                }
                let in_dash = phase < dash;
                let remaining = if in_dash { dash - phase } else { period - phase };
                let step = remaining.min(len - t);
                if in_dash {
                    self.segment(lerp(t), lerp(t + step), stroke.width, color);
                    dashes += 1;
                }
                t += step;
                phase = (phase + step) % period;
            }
        }
    }
}

/// Parses a CSS colour to linear RGBA in `0..=1`. Unparseable colours become opaque magenta so
/// they stand out.
pub fn parse_color(text: &str) -> [f32; 4] {
    match svgtypes::Color::from_str(text) {
        Ok(c) => [
            f32::from(c.red) / 255.0,
            f32::from(c.green) / 255.0,
            f32::from(c.blue) / 255.0,
            f32::from(c.alpha) / 255.0,
        ],
        Err(err) => {
            tracing::debug!(color = text, error = %err, "unparseable colour");
            [1.0, 0.0, 1.0, 1.0]
        }
    }
}

fn xy(p: DiagramPoint) -> [f64; 2] {
    [p.x, p.y]
}

fn circle_points(center: DiagramPoint, radius: f64, segments: u32) -> Vec<[f64; 2]> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let angle = TAU * f64::from(i) / f64::from(segments);
            [
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ]
        })
        .collect()
}

fn cubic_points(
    from: DiagramPoint,
    c1: DiagramPoint,
    c2: DiagramPoint,
    to: DiagramPoint,
) -> Vec<[f64; 2]> {
    (0..=CURVE_STEPS)
        .map(|i| {
            let t = i as f64 / CURVE_STEPS as f64;
            let u = 1.0 - t;
            let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            [
                a * from.x + b * c1.x + c * c2.x + d * to.x,
                a * from.y + b * c1.y + c * c2.y + d * to.y,
            ]
        })
        .collect()
}

/// Tessellates every op, layer by layer in z order.
pub fn tessellate(list: &DisplayList, circle_segments: u32) -> Batch {
    let mut batch = Batch::default();
    for layer in Layer::ALL {
        for item in list.layer(layer) {
            tessellate_op(&mut batch, &item.op, circle_segments);
        }
    }
    batch
}

fn tessellate_op(batch: &mut Batch, op: &DrawOp, circle_segments: u32) {
    match op {
        DrawOp::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            let ring = circle_points(*center, *radius, circle_segments);
            if let Some(fill) = fill {
                let color = parse_color(fill);
                for pair in ring.windows(2) {
                    batch.triangle(xy(*center), pair[0], pair[1], color);
                }
            }
            if let Some(stroke) = stroke {
                batch.polyline(&ring, stroke);
            }
        }
        DrawOp::Rect { rect, fill, stroke } => {
            let (x0, y0, x1, y1) = (rect.min_x(), rect.min_y(), rect.max_x(), rect.max_y());
            let corners = [[x0, y0], [x1, y0], [x1, y1], [x0, y1]];
            if let Some(fill) = fill {
                let [a, b, c, d] = corners;
                batch.quad(a, b, c, d, parse_color(fill));
            }
            if let Some(stroke) = stroke {
                let mut outline = corners.to_vec();
                outline.push(corners[0]);
                batch.polyline(&outline, stroke);
            }
        }
        DrawOp::Line { from, to, stroke } => batch.polyline(&[xy(*from), xy(*to)], stroke),
        DrawOp::Curve {
            from,
            ctrl1,
            ctrl2,
            to,
            stroke,
        } => batch.polyline(&cubic_points(*from, *ctrl1, *ctrl2, *to), stroke),
        DrawOp::Label {
            at,
            text,
            color,
            size,
        } => batch.text_runs.push(TextRun {
            position: [at.x as f32, at.y as f32],
            text: text.clone(),
            color: parse_color(color),
            size: *size as f32,
        }),
    }
}

pub struct GpuRenderer {
    config: RenderConfig,
    cache: RenderCache,
    status: RendererStatus,
    device: Option<Box<dyn GpuDevice>>,
    placeholder: Option<Box<dyn Surface>>,
}

impl GpuRenderer {
    pub fn new(config: RenderConfig, cache: RenderCache) -> Self {
        Self {
            config,
            cache,
            status: RendererStatus::Detached,
            device: None,
            placeholder: None,
        }
    }
}

impl Renderer for GpuRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Gpu
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
        match container.create_gpu_device(width, height) {
            Ok(device) => {
                self.device = Some(device);
                self.status = RendererStatus::Ready;
                tracing::debug!(width, height, "gpu renderer ready");
            }
            Err(err) => {
                let reason = format!("GPU not supported or failed to initialize: {err}");
                tracing::warn!(%reason, "gpu renderer unavailable");
                self.placeholder = show_placeholder(container, width, height, &reason, &self.config);
                self.status = RendererStatus::Placeholder { reason };
            }
        }
        self.status.clone()
    }

    fn render(&mut self, props: &RenderProps) -> RenderOutcome {
        let Some(device) = self.device.as_mut() else {
            return RenderOutcome::Unavailable;
        };
        let now = Instant::now();
        if !self.cache.should_render(props, now) {
            tracing::trace!("gpu frame unchanged; skipped");
            return RenderOutcome::Skipped;
        }

        let list = build_display_list(props, &self.config);
        let batch = tessellate(&list, self.config.circle_segments);
        device.clear(parse_color(&self.config.theme.background));
        device.submit(&batch);
        tracing::trace!(
            triangles = batch.triangle_count(),
            text_runs = batch.text_runs.len(),
            "gpu frame submitted"
        );

        self.cache.commit(props.clone(), now);
        RenderOutcome::Drawn {
            primitives: list.len(),
        }
    }

    fn cleanup(&mut self) {
        if let Some(mut device) = self.device.take() {
            device.release();
        }
        if let Some(mut placeholder) = self.placeholder.take() {
            placeholder.detach();
        }
        self.cache.invalidate();
        self.status = RendererStatus::Detached;
    }

    fn resize(&mut self, width: f64, height: f64) -> RendererStatus {
        self.cache.invalidate();
        if let Some(device) = self.device.as_mut() {
            if let Err(err) = device.resize(width, height) {
                let reason = format!("GPU surface cannot be resized: {err}");
                tracing::warn!(%reason, "gpu renderer unavailable");
                if let Some(mut device) = self.device.take() {
                    device.release();
                }
                self.status = RendererStatus::Placeholder { reason };
            }
        } else if let (Some(placeholder), RendererStatus::Placeholder { reason }) =
            (self.placeholder.as_mut(), &self.status)
        {
            redraw_placeholder(placeholder.as_mut(), width, height, reason, &self.config);
        }
        self.status.clone()
    }

    fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}
