use trellis_core::geom::viewport;
use trellis_core::{DiagramState, RelayoutPolicy, Task};
use trellis_layout::LayoutTrigger;

fn two_tasks() -> DiagramState {
    DiagramState::new()
        .add_task(Task::new("a", "A"))
        .add_task(Task::new("b", "B"))
}

#[test]
fn count_policy_ignores_renames_and_swaps() {
    let mut trigger = LayoutTrigger::new(RelayoutPolicy::OnCountChange);
    let vp = viewport(800.0, 600.0);
    let state = two_tasks();
    assert!(trigger.should_relayout(&state, vp));
    trigger.record(&state, vp);
    assert!(!trigger.should_relayout(&state, vp));

    // Same counts, different task: no relayout.
    let swapped = state.delete_task(&"b".into()).add_task(Task::new("c", "C"));
    assert!(!trigger.should_relayout(&swapped, vp));

    let linked = state.add_dependency("a".into(), "b".into());
    assert!(trigger.should_relayout(&linked, vp));
    assert!(trigger.should_relayout(&state, viewport(1024.0, 600.0)));

    trigger.reset();
    assert!(trigger.should_relayout(&state, vp));
}

#[test]
fn every_mutation_policy_always_relayouts() {
    let mut trigger = LayoutTrigger::new(RelayoutPolicy::EveryMutation);
    let vp = viewport(800.0, 600.0);
    trigger.record(&two_tasks(), vp);
    assert!(trigger.should_relayout(&two_tasks(), vp));
}
