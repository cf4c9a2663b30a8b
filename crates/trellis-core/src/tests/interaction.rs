use crate::geom::point;
use crate::*;

fn diagram() -> DiagramState {
    DiagramState::new()
        .add_task(Task::new("a", "A").at(100.0, 100.0))
        .add_task(Task::new("b", "B").at(300.0, 220.0))
}

fn apply_all(state: &DiagramState, actions: Vec<Action>) -> DiagramState {
    actions.into_iter().fold(state.clone(), |s, a| s.apply(a))
}

fn controller() -> InteractionController {
    InteractionController::new(GeometryConfig::default(), InteractionConfig::default())
}

#[test]
fn dragging_between_handles_of_different_tasks_adds_a_dependency() {
    let mut c = controller();
    let state = diagram().select_task(Some("b".into()));

    let actions = c.pointer_down(&state, point(100.0, 121.0));
    assert_eq!(actions, vec![Action::SelectTask(None)]);
    assert!(c.is_dragging());
    let state = apply_all(&state, actions);
    assert_eq!(state.selected_task, None);

    c.pointer_move(&state, point(200.0, 170.0));
    assert_eq!(c.pointer(), Some(point(200.0, 170.0)));
    assert_eq!(c.dragged_handle().map(|h| h.task_id.as_str()), Some("a"));

    let actions = c.pointer_up(&state, point(302.0, 198.0));
    assert_eq!(
        actions,
        vec![Action::AddDependency {
            from: "a".into(),
            to: "b".into()
        }]
    );
    assert!(!c.is_dragging());
    assert_eq!(c.pointer(), None);

    let state = apply_all(&state, actions);
    assert_eq!(state.dependencies, vec![Dependency::new("a", "b")]);
}

#[test]
fn releasing_on_the_same_task_cancels_the_drag() {
    let mut c = controller();
    let state = diagram();
    c.pointer_down(&state, point(100.0, 80.0));
    assert!(c.is_dragging());
    let actions = c.pointer_up(&state, point(100.0, 120.0));
    assert!(actions.is_empty());
    assert_eq!(c.state(), &InteractionState::Idle);
}

#[test]
fn releasing_on_empty_space_cancels_the_drag() {
    let mut c = controller();
    let state = diagram();
    c.pointer_down(&state, point(100.0, 80.0));
    let actions = c.pointer_up(&state, point(600.0, 600.0));
    assert!(actions.is_empty());
    assert!(!c.is_dragging());
}

#[test]
fn pointer_up_without_a_drag_does_nothing() {
    let mut c = controller();
    assert!(c.pointer_up(&diagram(), point(100.0, 80.0)).is_empty());
}

#[test]
fn clicking_a_task_body_toggles_selection() {
    let mut c = controller();
    let state = diagram();

    let actions = c.pointer_down(&state, point(100.0, 100.0));
    assert_eq!(actions, vec![Action::SelectTask(Some("a".into()))]);
    let state = apply_all(&state, actions);
    c.pointer_up(&state, point(100.0, 100.0));

    let actions = c.pointer_down(&state, point(100.0, 100.0));
    assert_eq!(actions, vec![Action::SelectTask(None)]);
}

#[test]
fn clicking_another_task_moves_selection_without_connecting() {
    let mut c = controller();
    let state = diagram().select_task(Some("a".into()));
    let actions = c.pointer_down(&state, point(300.0, 220.0));
    assert_eq!(actions, vec![Action::SelectTask(Some("b".into()))]);
}

#[test]
fn click_to_connect_links_the_selected_task_to_the_clicked_one() {
    let mut c = InteractionController::new(
        GeometryConfig::default(),
        InteractionConfig {
            click_to_connect: true,
        },
    );
    let state = diagram().select_task(Some("a".into()));
    let actions = c.pointer_down(&state, point(300.0, 220.0));
    assert_eq!(
        actions,
        vec![
            Action::AddDependency {
                from: "a".into(),
                to: "b".into()
            },
            Action::SelectTask(None),
        ]
    );
    let state = apply_all(&state, actions);
    assert_eq!(state.dependencies.len(), 1);
    assert_eq!(state.selected_task, None);
}

#[test]
fn clicking_empty_space_clears_selection() {
    let mut c = controller();
    let state = diagram().select_task(Some("a".into()));
    assert_eq!(
        c.pointer_down(&state, point(700.0, 20.0)),
        vec![Action::SelectTask(None)]
    );
    assert!(c.pointer_down(&diagram(), point(700.0, 20.0)).is_empty());
}

#[test]
fn hover_tracks_the_handle_under_the_pointer() {
    let mut c = controller();
    let state = diagram();
    c.pointer_move(&state, point(105.0, 82.0));
    assert_eq!(
        c.hovered_handle().map(|h| (h.task_id.as_str(), h.position)),
        Some(("a", HandlePosition::Top))
    );
    // Hovering without dragging does not track the pointer.
    assert_eq!(c.pointer(), None);
    c.pointer_move(&state, point(500.0, 500.0));
    assert_eq!(c.hovered_handle(), None);
}

#[test]
fn cancel_drops_the_gesture() {
    let mut c = controller();
    let state = diagram();
    c.pointer_down(&state, point(100.0, 80.0));
    c.cancel();
    assert!(!c.is_dragging());
    assert!(c.pointer_up(&state, point(300.0, 200.0)).is_empty());
}

#[test]
fn a_self_loop_never_leaves_the_controller() {
    let mut c = controller();
    let state = diagram();
    for (down, up) in [
        (point(100.0, 80.0), point(100.0, 120.0)),
        (point(100.0, 120.0), point(100.0, 80.0)),
        (point(100.0, 80.0), point(100.0, 80.0)),
    ] {
        c.pointer_down(&state, down);
        let actions = c.pointer_up(&state, up);
        assert!(
            !actions
                .iter()
                .any(|a| matches!(a, Action::AddDependency { from, to } if from == to))
        );
    }
}
