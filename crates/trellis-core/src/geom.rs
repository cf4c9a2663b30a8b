//! Coordinate spaces and the pointer/drawing transform.
//!
//! Three spaces are kept apart at the type level:
//! - [`ClientSpace`]: raw pointer coordinates as reported by the host (logical/CSS pixels),
//! - [`SurfaceSpace`]: the drawing surface's backing pixels,
//! - [`DiagramSpace`]: where tasks and handles live.
//!
//! Drawing maps diagram → surface and pointer events map client → surface → diagram through the
//! same [`SurfaceTransform`], so the two directions cannot drift apart.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientSpace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSpace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagramSpace;

pub type ClientPoint = euclid::Point2D<f64, ClientSpace>;
pub type SurfacePoint = euclid::Point2D<f64, SurfaceSpace>;
pub type DiagramPoint = euclid::Point2D<f64, DiagramSpace>;
pub type DiagramVector = euclid::Vector2D<f64, DiagramSpace>;
pub type DiagramRect = euclid::Rect<f64, DiagramSpace>;
pub type Viewport = euclid::Size2D<f64, DiagramSpace>;

pub fn point(x: f64, y: f64) -> DiagramPoint {
    euclid::point2(x, y)
}

pub fn client_point(x: f64, y: f64) -> ClientPoint {
    euclid::point2(x, y)
}

pub fn viewport(width: f64, height: f64) -> Viewport {
    euclid::size2(width, height)
}

/// A rectangle of `width × height` centred on `center`.
pub fn centered_rect(center: DiagramPoint, width: f64, height: f64) -> DiagramRect {
    DiagramRect::new(
        point(center.x - width / 2.0, center.y - height / 2.0),
        euclid::size2(width, height),
    )
}

/// Edge-inclusive containment (euclid's `Rect::contains` excludes the far edges).
pub fn rect_contains_inclusive(rect: &DiagramRect, p: DiagramPoint) -> bool {
    p.x >= rect.min_x() && p.x <= rect.max_x() && p.y >= rect.min_y() && p.y <= rect.max_y()
}

/// Rounds to one decimal, the precision handle positions are published at.
pub fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Placement of a drawing surface on screen.
///
/// `origin` is the surface's top-left corner in client space; `css_size` its on-screen size;
/// `backing_size` the size of its pixel buffer. `padding` is the container inset between the
/// surface edge and diagram-space origin, in backing pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTransform {
    pub origin: ClientPoint,
    pub css_size: euclid::Size2D<f64, ClientSpace>,
    pub backing_size: euclid::Size2D<f64, SurfaceSpace>,
    pub padding: f64,
}

impl Default for SurfaceTransform {
    fn default() -> Self {
        Self::identity(0.0, 0.0)
    }
}

impl SurfaceTransform {
    /// A surface at the client origin whose backing buffer matches its on-screen size.
    pub fn identity(width: f64, height: f64) -> Self {
        Self {
            origin: client_point(0.0, 0.0),
            css_size: euclid::size2(width, height),
            backing_size: euclid::size2(width, height),
            padding: 0.0,
        }
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = client_point(x, y);
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Backing pixels per CSS pixel, or `1.0` on an axis whose sizes are unknown.
    pub fn scale(&self) -> (f64, f64) {
        fn axis(backing: f64, css: f64) -> f64 {
            if backing.is_finite() && css.is_finite() && backing > 0.0 && css > 0.0 {
                backing / css
            } else {
                1.0
            }
        }
        (
            axis(self.backing_size.width, self.css_size.width),
            axis(self.backing_size.height, self.css_size.height),
        )
    }

    pub fn client_to_surface(&self) -> euclid::Transform2D<f64, ClientSpace, SurfaceSpace> {
        let (sx, sy) = self.scale();
        euclid::Transform2D::<f64, ClientSpace, ClientSpace>::translation(
            -self.origin.x,
            -self.origin.y,
        )
        .then_scale(sx, sy)
        .with_destination::<SurfaceSpace>()
    }

    pub fn surface_to_diagram(&self) -> euclid::Transform2D<f64, SurfaceSpace, DiagramSpace> {
        euclid::Transform2D::<f64, SurfaceSpace, SurfaceSpace>::translation(
            -self.padding,
            -self.padding,
        )
        .with_destination::<DiagramSpace>()
    }

    /// The transform drawing code applies to diagram coordinates.
    pub fn diagram_to_surface(&self) -> euclid::Transform2D<f64, DiagramSpace, SurfaceSpace> {
        euclid::Transform2D::<f64, DiagramSpace, DiagramSpace>::translation(
            self.padding,
            self.padding,
        )
        .with_destination::<SurfaceSpace>()
    }

    pub fn client_to_diagram_transform(
        &self,
    ) -> euclid::Transform2D<f64, ClientSpace, DiagramSpace> {
        self.client_to_surface().then(&self.surface_to_diagram())
    }

    pub fn client_to_diagram(&self, p: ClientPoint) -> DiagramPoint {
        self.client_to_diagram_transform().transform_point(p)
    }

    /// Offset-only mapping (no scale, no padding). Used to visualize what hit-testing would
    /// see without the correction.
    pub fn client_to_diagram_unadjusted(&self, p: ClientPoint) -> DiagramPoint {
        point(p.x - self.origin.x, p.y - self.origin.y)
    }

    pub fn diagram_to_client(&self, p: DiagramPoint) -> Option<ClientPoint> {
        Some(self.client_to_diagram_transform().inverse()?.transform_point(p))
    }

    pub fn diagram_to_surface_point(&self, p: DiagramPoint) -> SurfacePoint {
        self.diagram_to_surface().transform_point(p)
    }
}
