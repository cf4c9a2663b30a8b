//! Backend-neutral drawing instructions.
//!
//! [`build_display_list`] turns render props into layered, keyed [`DrawOp`]s. Every backend
//! draws from this list, so handle centres and radii are identical whichever backend is active.

use crate::props::RenderProps;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use trellis_core::geom::{self, DiagramPoint, DiagramRect};
use trellis_core::hit::{self, HandlePosition};
use trellis_core::{RenderConfig, Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Background,
    Dependency,
    Task,
    Interactive,
}

impl Layer {
    pub const ALL: [Layer; 4] = [
        Layer::Background,
        Layer::Dependency,
        Layer::Task,
        Layer::Interactive,
    ];

    pub fn z_index(self) -> i32 {
        match self {
            Layer::Background => 1,
            Layer::Dependency => 2,
            Layer::Task => 3,
            Layer::Interactive => 10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Background => "background",
            Layer::Dependency => "dependency",
            Layer::Task => "task",
            Layer::Interactive => "interactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugKey {
    Pointer,
    Coordinates,
    HitRadius,
    DistanceCircle,
}

/// Identity of a drawn element across frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Background,
    Edge { from: TaskId, to: TaskId },
    Task(TaskId),
    Handle { task: TaskId, position: HandlePosition },
    DragLine,
    Debug(DebugKey),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    /// Dash and gap lengths; `None` for a solid line.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    pub fn solid(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: None,
        }
    }

    pub fn dashed(color: &str, width: f64, dash: [f64; 2]) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: Some(dash),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Circle {
        center: DiagramPoint,
        radius: f64,
        fill: Option<String>,
        stroke: Option<Stroke>,
    },
    Rect {
        rect: DiagramRect,
        fill: Option<String>,
        stroke: Option<Stroke>,
    },
    Line {
        from: DiagramPoint,
        to: DiagramPoint,
        stroke: Stroke,
    },
    /// Cubic Bézier.
    Curve {
        from: DiagramPoint,
        ctrl1: DiagramPoint,
        ctrl2: DiagramPoint,
        to: DiagramPoint,
        stroke: Stroke,
    },
    /// Text centred on `at`.
    Label {
        at: DiagramPoint,
        text: String,
        color: String,
        size: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub layer: Layer,
    pub key: SceneKey,
    pub op: DrawOp,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub items: Vec<DisplayItem>,
}

impl DisplayList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DisplayItem> + '_ {
        self.items.iter().filter(move |item| item.layer == layer)
    }

    pub fn keyed<'a, 'k>(&'a self, key: &'k SceneKey) -> impl Iterator<Item = &'a DrawOp> + use<'a, 'k> {
        self.items
            .iter()
            .filter(move |item| &item.key == key)
            .map(|item| &item.op)
    }

    fn push(&mut self, layer: Layer, key: SceneKey, op: DrawOp) {
        self.items.push(DisplayItem { layer, key, op });
    }
}

const EDGE_WIDTH: f64 = 1.5;
const MIN_CURVE_BEND: f64 = 20.0;
const DRAG_DASH: [f64; 2] = [5.0, 5.0];
const POINTER_MARKER_RADIUS: f64 = 3.0;
const DEBUG_FONT_SIZE: f64 = 10.0;

pub fn build_display_list(props: &RenderProps, cfg: &RenderConfig) -> DisplayList {
    let theme = &cfg.theme;
    let geometry = &props.geometry;
    let debug = &props.debug;
    let mut list = DisplayList::default();

    list.push(
        Layer::Background,
        SceneKey::Background,
        DrawOp::Rect {
            rect: DiagramRect::new(geom::point(0.0, 0.0), props.viewport),
            fill: Some(theme.background.clone()),
            stroke: None,
        },
    );

    let by_id: FxHashMap<&TaskId, &Task> = props.tasks.iter().map(|t| (&t.id, t)).collect();

    if debug.render_connections && !debug.render_only_drag_connections {
        for dep in &props.dependencies {
            let (Some(source), Some(target)) = (by_id.get(&dep.from), by_id.get(&dep.to)) else {
                continue;
            };
            let from = hit::handle_position(source, HandlePosition::Bottom, geometry);
            let to = hit::handle_position(target, HandlePosition::Top, geometry);
            let bend = ((to.y - from.y).abs() / 2.0).max(MIN_CURVE_BEND);
            list.push(
                Layer::Dependency,
                SceneKey::Edge {
                    from: dep.from.clone(),
                    to: dep.to.clone(),
                },
                DrawOp::Curve {
                    from,
                    ctrl1: geom::point(from.x, from.y + bend),
                    ctrl2: geom::point(to.x, to.y - bend),
                    to,
                    stroke: Stroke::solid(&theme.edge, EDGE_WIDTH),
                },
            );
        }
    }

    for task in &props.tasks {
        let key = SceneKey::Task(task.id.clone());
        if debug.render_nodes {
            let selected = props.selected_task.as_ref() == Some(&task.id);
            let fill = if selected {
                &theme.selected_node
            } else {
                &theme.node
            };
            list.push(
                Layer::Task,
                key.clone(),
                DrawOp::Rect {
                    rect: hit::task_rect(task, geometry),
                    fill: Some(fill.clone()),
                    stroke: Some(Stroke::solid(&theme.node_border, 1.0)),
                },
            );
            list.push(
                Layer::Task,
                key,
                DrawOp::Label {
                    at: geom::point(task.x, task.y),
                    text: task.name.clone(),
                    color: theme.text.clone(),
                    size: theme.font_size,
                },
            );
        }

        if debug.render_handles {
            for handle in hit::handles(task, geometry) {
                let active = [&props.hovered_handle, &props.dragged_handle]
                    .into_iter()
                    .flatten()
                    .any(|h| h.task_id == handle.task_id && h.position == handle.position);
                let fill = if active {
                    &theme.handle_hover
                } else {
                    &theme.handle
                };
                list.push(
                    Layer::Task,
                    SceneKey::Handle {
                        task: handle.task_id.clone(),
                        position: handle.position,
                    },
                    DrawOp::Circle {
                        center: handle.center(),
                        radius: geometry.handle_radius,
                        fill: Some(fill.clone()),
                        stroke: Some(Stroke::solid(&theme.handle_stroke, 1.0)),
                    },
                );
            }
        }
    }

    if let (true, Some(dragged), Some(pointer)) =
        (debug.render_connections, &props.dragged_handle, props.pointer)
    {
        list.push(
            Layer::Interactive,
            SceneKey::DragLine,
            DrawOp::Line {
                from: dragged.center(),
                to: pointer,
                stroke: Stroke::dashed(&theme.drag_line, 2.0, DRAG_DASH),
            },
        );
    }

    if let (true, Some(pointer)) = (debug.any_overlay(), props.pointer) {
        push_debug_overlays(&mut list, props, cfg, pointer);
    }

    list
}

fn push_debug_overlays(
    list: &mut DisplayList,
    props: &RenderProps,
    cfg: &RenderConfig,
    pointer: DiagramPoint,
) {
    let color = &cfg.theme.debug;
    let debug = &props.debug;

    list.push(
        Layer::Interactive,
        SceneKey::Debug(DebugKey::Pointer),
        DrawOp::Circle {
            center: pointer,
            radius: POINTER_MARKER_RADIUS,
            fill: Some(color.clone()),
            stroke: None,
        },
    );

    if debug.show_coordinate_grid {
        list.push(
            Layer::Interactive,
            SceneKey::Debug(DebugKey::Coordinates),
            DrawOp::Label {
                at: geom::point(pointer.x + 10.0, pointer.y - 10.0),
                text: format!("({:.1}, {:.1})", pointer.x, pointer.y),
                color: color.clone(),
                size: DEBUG_FONT_SIZE,
            },
        );
    }

    let Some(hovered) = &props.hovered_handle else {
        return;
    };
    let center = hovered.center();

    if debug.show_hit_radius {
        list.push(
            Layer::Interactive,
            SceneKey::Debug(DebugKey::HitRadius),
            DrawOp::Circle {
                center,
                radius: props.geometry.interactive_radius(),
                fill: None,
                stroke: Some(Stroke::dashed(color, 1.0, [3.0, 3.0])),
            },
        );
    }

    if debug.show_distance_circles {
        let key = SceneKey::Debug(DebugKey::DistanceCircle);
        list.push(
            Layer::Interactive,
            key.clone(),
            DrawOp::Circle {
                center,
                radius: center.distance_to(pointer),
                fill: None,
                stroke: Some(Stroke::solid(color, 1.0)),
            },
        );
        list.push(
            Layer::Interactive,
            key,
            DrawOp::Line {
                from: center,
                to: pointer,
                stroke: Stroke::solid(color, 1.0),
            },
        );
    }
}

/// The ops drawn in place of a diagram when a backend cannot start.
pub fn placeholder_ops(width: f64, height: f64, reason: &str, cfg: &RenderConfig) -> Vec<DrawOp> {
    let theme = &cfg.theme;
    let center = geom::point(width / 2.0, height / 2.0);
    vec![
        DrawOp::Rect {
            rect: DiagramRect::new(geom::point(0.0, 0.0), euclid::size2(width, height)),
            fill: Some(theme.placeholder_fill.clone()),
            stroke: None,
        },
        DrawOp::Label {
            at: center,
            text: reason.to_string(),
            color: theme.placeholder_text.clone(),
            size: theme.font_size + 2.0,
        },
        DrawOp::Label {
            at: geom::point(center.x, center.y + 30.0),
            text: "Please try using a different renderer".to_string(),
            color: theme.placeholder_text.clone(),
            size: theme.font_size,
        },
    ]
}
