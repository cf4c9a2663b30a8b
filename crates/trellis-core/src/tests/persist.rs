use crate::persist::{self, STORAGE_KEY};
use crate::*;

fn sample() -> DiagramState {
    DiagramState::new()
        .add_task(Task::new("a", "Design").at(100.0, 40.0))
        .add_task(Task::new("b", "Build").at(100.0, 160.0))
        .add_dependency("a".into(), "b".into())
        .select_task(Some("a".into()))
}

#[test]
fn save_then_restore_brings_back_tasks_and_dependencies() {
    let mut store = MemoryStore::new();
    persist::save(&mut store, &sample()).unwrap();

    let restored = persist::restore_into(&store, &DiagramState::new()).unwrap();
    assert_eq!(restored.tasks, sample().tasks);
    assert_eq!(restored.dependencies, sample().dependencies);
    // Selection is session state and is not persisted.
    assert_eq!(restored.selected_task, None);
}

#[test]
fn saved_document_uses_the_storage_key_and_field_names() {
    let mut store = MemoryStore::new();
    persist::save(&mut store, &sample()).unwrap();
    let raw = store.get(STORAGE_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["tasks"][0]["id"], "a");
    assert_eq!(value["tasks"][0]["name"], "Design");
    assert_eq!(value["dependencies"][0]["from"], "a");
    assert_eq!(value["dependencies"][0]["to"], "b");
}

#[test]
fn restore_is_skipped_when_the_model_already_has_tasks() {
    let mut store = MemoryStore::new();
    persist::save(&mut store, &sample()).unwrap();
    let current = DiagramState::new().add_task(Task::new("z", "Other"));
    assert!(persist::restore_into(&store, &current).is_none());
}

#[test]
fn unusable_documents_restore_nothing() {
    for raw in [
        "not json",
        "[]",
        r#"{ "tasks": [] }"#,
        r#"{ "dependencies": [] }"#,
        r#"{ "tasks": {}, "dependencies": [] }"#,
        r#"{ "tasks": [], "dependencies": "a->b" }"#,
    ] {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, raw.to_string());
        assert!(persist::restore(&store).is_none(), "accepted {raw}");
    }
    assert!(persist::restore(&MemoryStore::new()).is_none());
}

#[test]
fn restored_data_is_held_to_model_invariants() {
    let raw = r#"{
        "tasks": [
            { "id": "a", "name": "A", "x": 0, "y": 0 },
            { "id": "b", "name": "B", "x": 0, "y": 0 }
        ],
        "dependencies": [
            { "from": "a", "to": "b" },
            { "from": "a", "to": "b" },
            { "from": "b", "to": "b" },
            { "from": "a", "to": "ghost" }
        ]
    }"#;
    let state = PersistedDiagram::from_json_str(raw).unwrap().into_state();
    assert_eq!(state.dependencies, vec![Dependency::new("a", "b")]);
}
