use crate::geom::point;
use crate::hit::*;
use crate::*;

fn task_at(id: &str, x: f64, y: f64) -> Task {
    Task::new(id, id).at(x, y)
}

#[test]
fn handles_sit_on_the_top_and_bottom_centre() {
    let cfg = GeometryConfig::default();
    let t = task_at("a", 100.0, 100.0);
    assert_eq!(handle_position(&t, HandlePosition::Top, &cfg), point(100.0, 80.0));
    assert_eq!(handle_position(&t, HandlePosition::Bottom, &cfg), point(100.0, 120.0));
}

#[test]
fn handle_positions_are_rounded_to_one_decimal() {
    let cfg = GeometryConfig::default();
    let t = task_at("a", 10.04, 50.06);
    let top = handle_position(&t, HandlePosition::Top, &cfg);
    assert_eq!(top, point(10.0, 30.1));
}

#[test]
fn interactive_radius_boundary_is_inside() {
    let cfg = GeometryConfig::default();
    let center = point(100.0, 80.0);
    let ri = cfg.interactive_radius();
    assert_eq!(ri, 17.0);

    assert!(is_point_in_handle(center, point(100.0 + ri, 80.0), HitMode::Interactive, &cfg));
    assert!(!is_point_in_handle(
        center,
        point(100.0 + ri + 1.0, 80.0),
        HitMode::Interactive,
        &cfg
    ));

    // Diagonal points at exactly `ri` suffer rounding; the epsilon keeps them inside.
    let d = ri / std::f64::consts::SQRT_2;
    assert!(is_point_in_handle(center, point(100.0 + d, 80.0 + d), HitMode::Interactive, &cfg));
    assert!(!is_point_in_handle(
        center,
        point(100.0 + ri + 0.1, 80.0),
        HitMode::Interactive,
        &cfg
    ));
}

#[test]
fn visual_radius_is_smaller_than_interactive() {
    let cfg = GeometryConfig::default();
    let center = point(0.0, 0.0);
    assert!(is_point_in_handle(center, point(7.0, 0.0), HitMode::Visual, &cfg));
    assert!(!is_point_in_handle(center, point(7.01, 0.0), HitMode::Visual, &cfg));
    assert!(is_point_in_handle(center, point(12.0, 0.0), HitMode::Interactive, &cfg));
    assert_eq!(hit_radius(HitMode::Visual, &cfg), 7.0);
    assert_eq!(hit_radius(HitMode::Interactive, &cfg), 17.0);
}

#[test]
fn find_handle_at_interactive_radius_and_beyond() {
    let cfg = GeometryConfig::default();
    let tasks = vec![task_at("a", 100.0, 100.0)];

    let hit = find_handle_at_position(&tasks, point(100.0, 80.0 - 17.0), &cfg)
        .expect("handle at the interactive radius");
    assert_eq!(hit.task_id, TaskId::new("a"));
    assert_eq!(hit.position, HandlePosition::Top);
    assert_eq!((hit.x, hit.y), (100.0, 80.0));

    assert_eq!(find_handle_at_position(&tasks, point(100.0, 80.0 - 18.0), &cfg), None);
}

#[test]
fn find_handle_reports_bottom_handles() {
    let cfg = GeometryConfig::default();
    let tasks = vec![task_at("a", 100.0, 100.0)];
    let hit = find_handle_at_position(&tasks, point(103.0, 124.0), &cfg).expect("bottom");
    assert_eq!(hit.position, HandlePosition::Bottom);
}

#[test]
fn overlapping_hit_areas_resolve_to_nearest_by_default() {
    let cfg = GeometryConfig::default();
    // a's bottom handle at (100, 120); b's top handle at (100, 140).
    let tasks = vec![task_at("a", 100.0, 100.0), task_at("b", 100.0, 160.0)];
    let p = point(100.0, 136.0);

    let nearest = find_handle_at_position(&tasks, p, &cfg).expect("nearest");
    assert_eq!(nearest.task_id, TaskId::new("b"));
    assert_eq!(nearest.position, HandlePosition::Top);

    let legacy = GeometryConfig {
        handle_resolution: HandleResolution::FirstMatch,
        ..GeometryConfig::default()
    };
    let first = find_handle_at_position(&tasks, p, &legacy).expect("first");
    assert_eq!(first.task_id, TaskId::new("a"));
    assert_eq!(first.position, HandlePosition::Bottom);
}

#[test]
fn equidistant_handles_resolve_in_iteration_order() {
    let cfg = GeometryConfig::default();
    let tasks = vec![task_at("a", 100.0, 100.0), task_at("b", 100.0, 160.0)];
    let hit = find_handle_at_position(&tasks, point(100.0, 130.0), &cfg).expect("tie");
    assert_eq!(hit.task_id, TaskId::new("a"));
}

#[test]
fn hit_margin_is_configurable() {
    let cfg = GeometryConfig {
        hit_margin: 0.0,
        ..GeometryConfig::default()
    };
    let tasks = vec![task_at("a", 0.0, 0.0)];
    assert!(find_handle_at_position(&tasks, point(0.0, -20.0 - 7.0), &cfg).is_some());
    assert!(find_handle_at_position(&tasks, point(0.0, -20.0 - 8.0), &cfg).is_none());
}

#[test]
fn find_task_prefers_the_topmost_body() {
    let cfg = GeometryConfig::default();
    let tasks = vec![task_at("a", 100.0, 100.0), task_at("b", 150.0, 100.0)];
    assert_eq!(
        find_task_at_position(&tasks, point(130.0, 100.0), &cfg).map(|t| t.id.as_str()),
        Some("b")
    );
    assert_eq!(
        find_task_at_position(&tasks, point(45.0, 100.0), &cfg).map(|t| t.id.as_str()),
        Some("a")
    );
    // Body edges are inclusive.
    assert_eq!(
        find_task_at_position(&tasks, point(40.0, 120.0), &cfg).map(|t| t.id.as_str()),
        Some("a")
    );
    assert!(find_task_at_position(&tasks, point(100.0, 130.0), &cfg).is_none());
}
