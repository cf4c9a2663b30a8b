use trellis_core::{Dependency, Task};
use trellis_layout::graph::TaskGraph;
use trellis_layout::normalize::LayeredGraph;
use trellis_layout::{cycles, order, rank};

fn layered(ids: &[&str], pairs: &[(&str, &str)]) -> (TaskGraph, LayeredGraph) {
    let tasks: Vec<Task> = ids.iter().map(|id| Task::new(*id, *id)).collect();
    let deps: Vec<Dependency> = pairs.iter().map(|(a, b)| Dependency::new(*a, *b)).collect();
    let g = TaskGraph::new(&tasks, &deps);
    let mask = vec![false; g.node_count()];
    let ranks = rank::longest_path(&g, &mask);
    let lg = LayeredGraph::build(&g, &ranks);
    (g, lg)
}

#[test]
fn cross_count_counts_inverted_pairs() {
    let (_, g) = layered(&["a", "b", "c", "d"], &[("a", "c"), ("b", "d")]);
    assert_eq!(order::cross_count(&g, &[vec![0, 1], vec![2, 3]]), 0);
    assert_eq!(order::cross_count(&g, &[vec![0, 1], vec![3, 2]]), 1);
}

#[test]
fn complete_bipartite_pair_has_one_unavoidable_crossing() {
    let (_, g) = layered(
        &["a", "b", "c", "d"],
        &[("a", "c"), ("a", "d"), ("b", "c"), ("b", "d")],
    );
    let layering = order::order(&g, 4);
    assert_eq!(order::cross_count(&g, &layering), 1);
}

#[test]
fn sweeps_never_increase_crossings() {
    let ids = ["a", "b", "c", "x", "y", "z", "p", "q"];
    let pairs = [
        ("a", "z"),
        ("b", "y"),
        ("c", "x"),
        ("x", "q"),
        ("z", "p"),
        ("a", "p"),
        ("c", "q"),
    ];
    let (_, g) = layered(&ids, &pairs);
    let initial = order::cross_count(&g, &order::init_order(&g));
    let best = order::cross_count(&g, &order::order(&g, 4));
    assert!(best <= initial);
}

#[test]
fn long_edges_get_one_virtual_node_per_skipped_rank() {
    let (_, g) = layered(&["a", "b", "c", "d"], &[("a", "b"), ("b", "c"), ("c", "d"), ("a", "d")]);
    assert_eq!(g.max_rank, 3);
    assert_eq!(g.nodes.iter().filter(|n| n.is_dummy()).count(), 2);
    for layer in order::init_order(&g) {
        assert!(!layer.is_empty());
    }
}

#[test]
fn tarjan_finds_only_multi_node_components() {
    let tasks: Vec<Task> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|id| Task::new(*id, *id))
        .collect();
    let deps = vec![
        Dependency::new("a", "b"),
        Dependency::new("b", "c"),
        Dependency::new("c", "a"),
        Dependency::new("c", "d"),
        Dependency::new("d", "e"),
        Dependency::new("e", "d"),
    ];
    let g = TaskGraph::new(&tasks, &deps);
    assert_eq!(cycles::find_cycles(&g), vec![vec![0, 1, 2], vec![3, 4]]);
    assert_eq!(cycles::strongly_connected_components(&g).len(), 2);
}

#[test]
fn tarjan_handles_a_very_long_ring() {
    const N: usize = 50_000;
    let ids: Vec<String> = (0..N).map(|i| format!("t{i}")).collect();
    let tasks: Vec<Task> = ids.iter().map(|id| Task::new(id.as_str(), id.as_str())).collect();
    let deps: Vec<Dependency> = (0..N)
        .map(|i| Dependency::new(ids[i].as_str(), ids[(i + 1) % N].as_str()))
        .collect();
    let g = TaskGraph::new(&tasks, &deps);

    let found = cycles::find_cycles(&g);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].len(), N);
    assert_eq!(found[0][0], 0);
}
