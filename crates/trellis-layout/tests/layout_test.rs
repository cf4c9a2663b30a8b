use trellis_core::geom::viewport;
use trellis_core::{Dependency, DiagramState, Task, TaskId};
use trellis_layout::{LayoutOptions, layout, layout_state};

fn tasks(ids: &[&str]) -> Vec<Task> {
    ids.iter().map(|id| Task::new(*id, id.to_uppercase())).collect()
}

fn deps(pairs: &[(&str, &str)]) -> Vec<Dependency> {
    pairs.iter().map(|(a, b)| Dependency::new(*a, *b)).collect()
}

fn pos(out: &[Task], id: &str) -> (f64, f64) {
    let t = out.iter().find(|t| t.id.as_str() == id).unwrap();
    (t.x, t.y)
}

#[test]
fn two_tasks_stack_vertically_around_the_viewport_center() {
    let out = layout(
        &tasks(&["a", "b"]),
        &deps(&[("a", "b")]),
        viewport(800.0, 600.0),
        &LayoutOptions::default(),
    );
    let (ax, ay) = pos(&out.tasks, "a");
    let (bx, by) = pos(&out.tasks, "b");
    assert!(by > ay);
    assert_eq!((ax, ay), (400.0, 240.0));
    assert_eq!((bx, by), (400.0, 360.0));
    assert_eq!(out.ranks[&TaskId::from("a")], 0);
    assert_eq!(out.ranks[&TaskId::from("b")], 1);
    assert!(!out.is_cyclic());
}

#[test]
fn empty_input_gives_empty_output() {
    let out = layout(&[], &[], viewport(800.0, 600.0), &LayoutOptions::default());
    assert!(out.tasks.is_empty());
    assert!(out.ranks.is_empty());
}

#[test]
fn every_dependency_points_down_a_rank() {
    let ids = ["brief", "design", "api", "ui", "db", "tests", "ship"];
    let edges = [
        ("brief", "design"),
        ("design", "api"),
        ("design", "ui"),
        ("api", "db"),
        ("db", "tests"),
        ("ui", "tests"),
        ("brief", "tests"),
        ("tests", "ship"),
        ("brief", "ship"),
    ];
    let out = layout(
        &tasks(&ids),
        &deps(&edges),
        viewport(1200.0, 900.0),
        &LayoutOptions::default(),
    );
    for (a, b) in edges {
        let ra = out.ranks[&TaskId::from(a)];
        let rb = out.ranks[&TaskId::from(b)];
        assert!(rb > ra, "{a} -> {b}: rank {ra} -> {rb}");
        assert!(pos(&out.tasks, b).1 > pos(&out.tasks, a).1, "{a} -> {b}");
    }
    // Longest path: brief, design, api, db, tests, ship.
    assert_eq!(out.ranks[&TaskId::from("ship")], 5);
}

#[test]
fn output_keeps_input_order_ids_and_names() {
    let input = tasks(&["c", "a", "b"]);
    let out = layout(
        &input,
        &deps(&[("a", "b"), ("b", "c")]),
        viewport(800.0, 600.0),
        &LayoutOptions::default(),
    );
    let ids: Vec<&str> = out.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["c", "a", "b"]);
    for (before, after) in input.iter().zip(&out.tasks) {
        assert_eq!(before.name, after.name);
    }
}

#[test]
fn layout_is_deterministic_and_idempotent() {
    let ids = ["a", "b", "c", "d", "e", "f"];
    let edges = deps(&[
        ("a", "d"),
        ("b", "c"),
        ("a", "c"),
        ("c", "e"),
        ("d", "f"),
        ("b", "f"),
    ]);
    let opts = LayoutOptions::default();
    let first = layout(&tasks(&ids), &edges, viewport(900.0, 700.0), &opts);
    let second = layout(&tasks(&ids), &edges, viewport(900.0, 700.0), &opts);
    assert_eq!(first, second);

    let again = layout(&first.tasks, &edges, viewport(900.0, 700.0), &opts);
    assert_eq!(first.tasks, again.tasks);
}

#[test]
fn tasks_in_one_rank_never_overlap() {
    let opts = LayoutOptions::default();
    let out = layout(
        &tasks(&["root", "a", "b", "c", "d"]),
        &deps(&[("root", "a"), ("root", "b"), ("root", "c"), ("root", "d")]),
        viewport(1000.0, 600.0),
        &opts,
    );
    let mut xs: Vec<f64> = ["a", "b", "c", "d"]
        .iter()
        .map(|id| pos(&out.tasks, id).0)
        .collect();
    xs.sort_by(f64::total_cmp);
    for pair in xs.windows(2) {
        assert!(pair[1] - pair[0] >= opts.node_width + opts.node_sep - 1e-9);
    }
    // The parent is balanced over its children.
    let mean = xs.iter().sum::<f64>() / xs.len() as f64;
    assert!((pos(&out.tasks, "root").0 - mean).abs() < 1e-6);
}

#[test]
fn long_edges_do_not_collapse_ranks() {
    let out = layout(
        &tasks(&["a", "b", "c"]),
        &deps(&[("a", "b"), ("b", "c"), ("a", "c")]),
        viewport(800.0, 600.0),
        &LayoutOptions::default(),
    );
    let (a, b, c) = (
        pos(&out.tasks, "a").1,
        pos(&out.tasks, "b").1,
        pos(&out.tasks, "c").1,
    );
    assert!(a < b && b < c);
    assert_eq!(c - b, 120.0);
}

#[test]
fn cycle_participants_keep_their_positions() {
    let input = vec![
        Task::new("a", "A").at(11.0, 22.0),
        Task::new("b", "B").at(33.0, 44.0),
        Task::new("c", "C"),
        Task::new("d", "D"),
    ];
    let out = layout(
        &input,
        &deps(&[("a", "b"), ("b", "a"), ("a", "c"), ("c", "d")]),
        viewport(800.0, 600.0),
        &LayoutOptions::default(),
    );
    assert_eq!(out.cyclic, vec![TaskId::from("a"), TaskId::from("b")]);
    assert_eq!(pos(&out.tasks, "a"), (11.0, 22.0));
    assert_eq!(pos(&out.tasks, "b"), (33.0, 44.0));
    assert!(!out.ranks.contains_key(&TaskId::from("a")));
    // Edges touching the cycle are left out of ranking.
    assert_eq!(out.ranks[&TaskId::from("c")], 0);
    assert_eq!(out.ranks[&TaskId::from("d")], 1);
    assert!(pos(&out.tasks, "d").1 > pos(&out.tasks, "c").1);
}

#[test]
fn oversized_layouts_align_to_the_margin() {
    let ids: Vec<String> = (0..10).map(|i| format!("t{i}")).collect();
    let input: Vec<Task> = ids.iter().map(|id| Task::new(id.as_str(), id.as_str())).collect();
    let opts = LayoutOptions::default();
    let out = layout(&input, &[], viewport(400.0, 600.0), &opts);

    let min_x = out.tasks.iter().map(|t| t.x).fold(f64::INFINITY, f64::min);
    assert_eq!(min_x, opts.margin + opts.node_width / 2.0);
    // The vertical axis still fits and stays centred.
    assert!(out.tasks.iter().all(|t| t.y == 300.0));
}

#[test]
fn invalid_edges_are_ignored() {
    let out = layout(
        &tasks(&["a", "b"]),
        &deps(&[("a", "a"), ("a", "ghost"), ("a", "b"), ("a", "b")]),
        viewport(800.0, 600.0),
        &LayoutOptions::default(),
    );
    assert_eq!(out.ranks[&TaskId::from("b")], 1);
    assert!(!out.is_cyclic());
}

#[test]
fn layout_state_writes_positions_back() {
    let state = DiagramState::new()
        .add_task(Task::new("a", "A"))
        .add_task(Task::new("b", "B"))
        .add_dependency("a".into(), "b".into())
        .select_task(Some("b".into()));
    let (next, outcome) = layout_state(&state, viewport(800.0, 600.0), &LayoutOptions::default());
    assert_eq!(next.tasks, outcome.tasks);
    assert_eq!(next.dependencies, state.dependencies);
    assert_eq!(next.selected_task, state.selected_task);
}

#[test]
fn very_long_chain_lays_out_without_exhausting_the_stack() {
    const N: usize = 50_000;
    let ids: Vec<String> = (0..N).map(|i| format!("t{i}")).collect();
    let tasks: Vec<Task> = ids.iter().map(|id| Task::new(id.as_str(), id.as_str())).collect();
    let deps: Vec<Dependency> = ids
        .windows(2)
        .map(|pair| Dependency::new(pair[0].as_str(), pair[1].as_str()))
        .collect();

    let out = layout(&tasks, &deps, viewport(800.0, 600.0), &LayoutOptions::default());
    assert!(!out.is_cyclic());
    assert_eq!(out.tasks.len(), N);
    assert_eq!(out.ranks[&TaskId::from("t0")], 0);
    assert_eq!(out.ranks[&TaskId::from(format!("t{}", N - 1))], N - 1);
    assert!(pos(&out.tasks, "t1").1 > pos(&out.tasks, "t0").1);
}
