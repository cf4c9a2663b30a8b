//! Connection handles and hit-testing.
//!
//! [`handle_position`] is the only place that decides where a handle sits. Drawing code and
//! pointer hit-testing both call it, so a drawn handle and its hit area always share a centre.

use crate::config::{GeometryConfig, HandleResolution};
use crate::geom::{self, DiagramPoint, DiagramRect};
use crate::ids::TaskId;
use crate::model::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlePosition {
    Top,
    Bottom,
}

impl HandlePosition {
    pub const ALL: [HandlePosition; 2] = [HandlePosition::Top, HandlePosition::Bottom];

    pub fn as_str(self) -> &'static str {
        match self {
            HandlePosition::Top => "top",
            HandlePosition::Bottom => "bottom",
        }
    }
}

/// A handle projected from a task's geometry. Never stored in the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionHandle {
    pub task_id: TaskId,
    pub position: HandlePosition,
    pub x: f64,
    pub y: f64,
}

impl ConnectionHandle {
    pub fn of(task: &Task, position: HandlePosition, cfg: &GeometryConfig) -> Self {
        let center = handle_position(task, position, cfg);
        Self {
            task_id: task.id.clone(),
            position,
            x: center.x,
            y: center.y,
        }
    }

    pub fn center(&self) -> DiagramPoint {
        geom::point(self.x, self.y)
    }
}

/// Which radius a containment test uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitMode {
    /// The drawn radius, with no tolerance.
    Visual,
    /// The drawn radius plus the hit margin and boundary epsilon.
    Interactive,
}

pub fn handle_position(task: &Task, position: HandlePosition, cfg: &GeometryConfig) -> DiagramPoint {
    let half = cfg.node_height / 2.0;
    let y = match position {
        HandlePosition::Top => task.y - half,
        HandlePosition::Bottom => task.y + half,
    };
    geom::point(geom::round_tenth(task.x), geom::round_tenth(y))
}

/// Both handles of `task`, top first.
pub fn handles<'a>(
    task: &'a Task,
    cfg: &'a GeometryConfig,
) -> impl Iterator<Item = ConnectionHandle> + 'a {
    HandlePosition::ALL
        .into_iter()
        .map(move |position| ConnectionHandle::of(task, position, cfg))
}

pub fn hit_radius(mode: HitMode, cfg: &GeometryConfig) -> f64 {
    match mode {
        HitMode::Visual => cfg.handle_radius,
        HitMode::Interactive => cfg.interactive_radius(),
    }
}

pub fn is_point_in_handle(
    center: DiagramPoint,
    p: DiagramPoint,
    mode: HitMode,
    cfg: &GeometryConfig,
) -> bool {
    let distance = center.distance_to(p);
    let limit = match mode {
        HitMode::Visual => cfg.handle_radius,
        HitMode::Interactive => cfg.interactive_radius() + cfg.hit_epsilon,
    };
    if mode == HitMode::Interactive && (distance - limit).abs() < 0.5 {
        tracing::trace!(
            center.x = center.x,
            center.y = center.y,
            p.x = p.x,
            p.y = p.y,
            distance,
            limit,
            inside = distance <= limit,
            "borderline handle hit test"
        );
    }
    distance <= limit
}

/// The handle under `p`, using the interactive radius.
///
/// Tasks are visited in order, top handle before bottom. With
/// [`HandleResolution::Nearest`] the closest matching handle wins (earlier handles win ties);
/// with [`HandleResolution::FirstMatch`] the first match is returned.
pub fn find_handle_at_position(
    tasks: &[Task],
    p: DiagramPoint,
    cfg: &GeometryConfig,
) -> Option<ConnectionHandle> {
    let mut best: Option<(f64, ConnectionHandle)> = None;
    for task in tasks {
        for handle in handles(task, cfg) {
            let center = handle.center();
            if !is_point_in_handle(center, p, HitMode::Interactive, cfg) {
                continue;
            }
            if cfg.handle_resolution == HandleResolution::FirstMatch {
                return Some(handle);
            }
            let distance = center.distance_to(p);
            match &best {
                Some((d, _)) if *d <= distance => {}
                _ => best = Some((distance, handle)),
            }
        }
    }
    best.map(|(_, h)| h)
}

pub fn task_rect(task: &Task, cfg: &GeometryConfig) -> DiagramRect {
    geom::centered_rect(geom::point(task.x, task.y), cfg.node_width, cfg.node_height)
}

/// The task whose body contains `p`. Later tasks are drawn on top, so they win overlaps.
pub fn find_task_at_position<'a>(
    tasks: &'a [Task],
    p: DiagramPoint,
    cfg: &GeometryConfig,
) -> Option<&'a Task> {
    tasks
        .iter()
        .rev()
        .find(|task| geom::rect_contains_inclusive(&task_rect(task, cfg), p))
}
