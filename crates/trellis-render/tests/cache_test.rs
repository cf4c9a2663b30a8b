use std::time::{Duration, Instant};
use trellis_core::geom::{point, viewport};
use trellis_core::{ConnectionHandle, DiagramState, GeometryConfig, HandlePosition, Task};
use trellis_render::{DebugOptions, RenderCache, RenderProps};

fn props() -> RenderProps {
    let state = DiagramState::new()
        .add_task(Task::new("a", "A").at(100.0, 100.0))
        .add_task(Task::new("b", "B").at(100.0, 220.0))
        .add_dependency("a".into(), "b".into());
    RenderProps::from_state(&state, viewport(800.0, 600.0), &GeometryConfig::default())
}

#[test]
fn identical_props_are_skipped_until_the_frame_expires() {
    let mut cache = RenderCache::default();
    let t0 = Instant::now();
    assert!(cache.should_render(&props(), t0));
    cache.commit(props(), t0);

    assert!(!cache.should_render(&props(), t0));
    assert!(!cache.should_render(&props(), t0 + Duration::from_millis(1000)));
    assert!(cache.should_render(&props(), t0 + Duration::from_millis(1001)));
    assert!(cache.is_current(&props()));
}

#[test]
fn any_input_change_renders() {
    let mut cache = RenderCache::new(Duration::from_secs(60));
    let t0 = Instant::now();
    cache.commit(props(), t0);

    let task = Task::new("a", "A").at(100.0, 100.0);
    let geometry = GeometryConfig::default();

    let mut hovered = props();
    hovered.hovered_handle = Some(ConnectionHandle::of(&task, HandlePosition::Top, &geometry));
    assert!(cache.should_render(&hovered, t0));

    let mut pointer = props();
    pointer.pointer = Some(point(1.0, 2.0));
    assert!(cache.should_render(&pointer, t0));

    let mut moved = props();
    moved.tasks[1].x += 0.5;
    assert!(cache.should_render(&moved, t0));

    let mut selected = props();
    selected.selected_task = Some("a".into());
    assert!(cache.should_render(&selected, t0));

    let debug = props().with_debug(DebugOptions {
        show_hit_radius: true,
        ..DebugOptions::default()
    });
    assert!(cache.should_render(&debug, t0));

    let mut resized = props();
    resized.viewport = viewport(1024.0, 600.0);
    assert!(cache.should_render(&resized, t0));
}

#[test]
fn invalidate_forgets_the_snapshot() {
    let mut cache = RenderCache::default();
    let t0 = Instant::now();
    cache.commit(props(), t0);
    cache.invalidate();
    assert!(cache.snapshot().is_none());
    assert!(cache.should_render(&props(), t0));
}
