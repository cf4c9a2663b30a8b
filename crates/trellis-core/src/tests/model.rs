use crate::*;

fn task(id: &str) -> Task {
    Task::new(id, id.to_uppercase())
}

fn ab_state() -> DiagramState {
    DiagramState::new().add_task(task("a")).add_task(task("b"))
}

#[test]
fn add_dependency_twice_keeps_one_edge() {
    let state = ab_state();
    let once = state.add_dependency("a".into(), "b".into());
    let twice = once.add_dependency("a".into(), "b".into());
    assert_eq!(twice.dependencies, vec![Dependency::new("a", "b")]);
    assert_eq!(once, twice);
}

#[test]
fn add_dependency_ignores_self_loops_and_unknown_endpoints() {
    let state = ab_state();
    assert!(state.add_dependency("a".into(), "a".into()).dependencies.is_empty());
    assert!(state.add_dependency("a".into(), "zzz".into()).dependencies.is_empty());
    assert!(state.add_dependency("zzz".into(), "b".into()).dependencies.is_empty());
}

#[test]
fn opposite_directions_are_distinct_edges() {
    let state = ab_state()
        .add_dependency("a".into(), "b".into())
        .add_dependency("b".into(), "a".into());
    assert_eq!(state.dependencies.len(), 2);
}

#[test]
fn delete_task_cascades_to_edges_and_selection() {
    let state = ab_state()
        .add_dependency("a".into(), "b".into())
        .select_task(Some("a".into()));
    assert_eq!(state.selected_task, Some(TaskId::new("a")));

    let next = state.delete_task(&"a".into());
    assert_eq!(next.tasks, vec![task("b")]);
    assert!(next.dependencies.is_empty());
    assert_eq!(next.selected_task, None);

    // The input state is untouched.
    assert_eq!(state.tasks.len(), 2);
    assert_eq!(state.dependencies.len(), 1);
}

#[test]
fn delete_task_keeps_unrelated_selection() {
    let state = ab_state()
        .add_task(task("c"))
        .add_dependency("b".into(), "c".into())
        .select_task(Some("b".into()));
    let next = state.delete_task(&"a".into());
    assert_eq!(next.selected_task, Some(TaskId::new("b")));
    assert_eq!(next.dependencies, vec![Dependency::new("b", "c")]);
}

#[test]
fn delete_unknown_task_is_a_noop() {
    let state = ab_state().add_dependency("a".into(), "b".into());
    assert_eq!(state.delete_task(&"nope".into()), state);
}

#[test]
fn select_task_accepts_none_and_rejects_unknown_ids() {
    let state = ab_state().select_task(Some("b".into()));
    assert_eq!(state.selected_task, Some(TaskId::new("b")));
    assert_eq!(state.select_task(Some("ghost".into())), state);
    assert_eq!(state.select_task(None).selected_task, None);
}

#[test]
fn add_task_with_existing_id_is_a_noop() {
    let state = ab_state();
    let again = state.add_task(Task::new("a", "other name"));
    assert_eq!(again, state);
}

#[test]
fn set_tasks_prunes_dangling_dependencies_and_selection() {
    let state = ab_state()
        .add_task(task("c"))
        .add_dependency("a".into(), "b".into())
        .add_dependency("b".into(), "c".into())
        .select_task(Some("c".into()));
    let next = state.set_tasks(vec![task("a"), task("b")]);
    assert_eq!(next.dependencies, vec![Dependency::new("a", "b")]);
    assert_eq!(next.selected_task, None);
}

#[test]
fn set_tasks_preserves_order_and_positions() {
    let state = ab_state();
    let moved = vec![task("b").at(10.0, 20.0), task("a").at(30.0, 40.0)];
    let next = state.set_tasks(moved.clone());
    assert_eq!(next.tasks, moved);
}

#[test]
fn set_dependencies_filters_invalid_edges() {
    let state = ab_state().add_task(task("c"));
    let next = state.set_dependencies(vec![
        Dependency::new("a", "b"),
        Dependency::new("a", "b"),
        Dependency::new("c", "c"),
        Dependency::new("a", "missing"),
        Dependency::new("b", "c"),
    ]);
    assert_eq!(
        next.dependencies,
        vec![Dependency::new("a", "b"), Dependency::new("b", "c")]
    );
}

#[test]
fn apply_maps_actions_to_operations() {
    let state = DiagramState::new()
        .apply(Action::AddTask(task("a")))
        .apply(Action::AddTask(task("b")))
        .apply(Action::AddDependency {
            from: "a".into(),
            to: "b".into(),
        })
        .apply(Action::SelectTask(Some("b".into())));
    assert_eq!(state.tasks.len(), 2);
    assert!(state.has_dependency(&"a".into(), &"b".into()));
    assert_eq!(state.selected_task, Some(TaskId::new("b")));

    let state = state.apply(Action::DeleteTask("b".into()));
    assert!(state.dependencies.is_empty());
    assert_eq!(state.selected_task, None);

    let state = state
        .apply(Action::SetTasks(vec![task("x"), task("y")]))
        .apply(Action::SetDependencies(vec![Dependency::new("x", "y")]));
    assert_eq!(state.tasks, vec![task("x"), task("y")]);
    assert_eq!(state.dependencies, vec![Dependency::new("x", "y")]);
}

#[test]
fn generated_ids_are_distinct() {
    let a = TaskId::generate();
    let b = TaskId::generate();
    assert_ne!(a, b);
    assert!(!a.as_str().is_empty());
}
