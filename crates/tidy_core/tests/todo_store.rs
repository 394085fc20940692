use tidy_core::{
    decode_todos, encode_todos, EditOutcome, EventOutcome, Filter, MemorySlot, PersistenceSlot,
    RepoError, SlotError, SlotResult, SlotTodoRepository, Todo, TodoEvent, TodoId,
    TodoListRepository, TodoStore, TodoValidationError,
};

type MemoryStore = TodoStore<SlotTodoRepository<MemorySlot>>;

fn open_store(slot: &MemorySlot) -> MemoryStore {
    TodoStore::open(SlotTodoRepository::new(slot.clone()))
}

fn store_with(slot: &MemorySlot, texts: &[&str]) -> MemoryStore {
    let mut store = open_store(slot);
    for text in texts {
        store.add(text).unwrap();
    }
    store
}

fn texts(todos: &[Todo]) -> Vec<&str> {
    todos.iter().map(|todo| todo.text.as_str()).collect()
}

fn persisted(slot: &MemorySlot) -> Vec<Todo> {
    SlotTodoRepository::new(slot.clone()).load().unwrap()
}

#[test]
fn add_appends_open_record_and_persists() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["first"]);

    let id = store.add("  second  ").unwrap();

    assert_eq!(store.len(), 2);
    let added = store.get(id).unwrap();
    assert_eq!(added.text, "second");
    assert!(!added.completed);
    assert_eq!(store.todos().last().unwrap().id, id);
    assert_eq!(persisted(&slot), store.todos());
}

#[test]
fn add_rejects_blank_text_without_mutation() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["keep"]);

    assert_eq!(store.add(""), Err(TodoValidationError::EmptyText));
    assert_eq!(store.add("   "), Err(TodoValidationError::EmptyText));

    assert_eq!(texts(store.todos()), ["keep"]);
    assert_eq!(persisted(&slot).len(), 1);
}

#[test]
fn add_truncates_over_long_text() {
    let slot = MemorySlot::new();
    let mut store = open_store(&slot);

    let id = store.add(&"x".repeat(250)).unwrap();
    assert_eq!(store.get(id).unwrap().text.chars().count(), 100);
}

#[test]
fn ids_stay_unique_for_rapid_adds() {
    let slot = MemorySlot::new();
    let mut store = open_store(&slot);
    for n in 0..50 {
        store.add(&format!("task {n}")).unwrap();
    }

    let mut ids: Vec<TodoId> = store.todos().iter().map(|todo| todo.id).collect();
    let in_order = ids.clone();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
    assert_eq!(ids, in_order, "ids are monotonic in insertion order");
}

#[test]
fn add_after_loading_max_id_keeps_ids_unique() {
    let slot = MemorySlot::with_value(
        "todos",
        r#"[{"id":9223372036854775807,"text":"a","completed":false}]"#,
    );
    let mut store = open_store(&slot);
    assert_eq!(store.len(), 1);

    let first = store.add("b").unwrap();
    let second = store.add("c").unwrap();

    assert_ne!(first, TodoId::from_raw(i64::MAX));
    assert_ne!(first, second);
    assert_eq!(texts(&persisted(&slot)), ["a", "b", "c"]);
}

#[test]
fn toggle_flips_only_completed() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["a", "b"]);
    let a = store.todos()[0].clone();

    assert!(store.toggle(a.id));
    let toggled = store.get(a.id).unwrap();
    assert!(toggled.completed);
    assert_eq!(toggled.text, a.text);
    assert!(persisted(&slot)[0].completed);

    assert!(store.toggle(a.id));
    assert!(!store.get(a.id).unwrap().completed);
}

#[test]
fn toggle_and_delete_on_absent_id_are_noops() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["a"]);
    let before = store.todos().to_vec();
    let missing = TodoId::from_raw(-1);

    assert!(!store.toggle(missing));
    assert!(!store.delete(missing));
    assert_eq!(store.todos(), before.as_slice());
}

#[test]
fn delete_removes_exactly_one_and_keeps_order() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["a", "b", "c", "d"]);
    let b = store.todos()[1].id;

    assert!(store.delete(b));

    assert_eq!(texts(store.todos()), ["a", "c", "d"]);
    assert_eq!(texts(&persisted(&slot)), ["a", "c", "d"]);
}

#[test]
fn save_edit_trims_draft() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["old"]);
    let id = store.todos()[0].id;

    assert!(store.start_edit(id));
    assert_eq!(store.editing().unwrap().draft, "old");
    assert!(store.change_draft("  hello  "));

    assert_eq!(store.save_edit(), EditOutcome::Saved);
    assert_eq!(store.get(id).unwrap().text, "hello");
    assert!(store.editing().is_none());
    assert_eq!(persisted(&slot)[0].text, "hello");
}

#[test]
fn save_edit_with_blank_draft_reverts() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["original"]);
    let id = store.todos()[0].id;

    store.start_edit(id);
    store.change_draft("   ");

    assert_eq!(store.save_edit(), EditOutcome::Reverted);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(id).unwrap().text, "original");
    assert!(store.editing().is_none());
}

#[test]
fn starting_new_edit_abandons_previous_draft() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["a", "b"]);
    let a = store.todos()[0].id;
    let b = store.todos()[1].id;

    store.start_edit(a);
    store.change_draft("unsaved");
    store.start_edit(b);

    assert_eq!(store.editing().unwrap().id, b);
    assert_eq!(store.editing().unwrap().draft, "b");
    assert_eq!(store.get(a).unwrap().text, "a");
    assert_eq!(store.save_edit(), EditOutcome::Saved);
    assert_eq!(texts(store.todos()), ["a", "b"]);
}

#[test]
fn cancel_edit_discards_draft() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["a"]);
    let id = store.todos()[0].id;

    store.start_edit(id);
    store.change_draft("changed");
    assert!(store.cancel_edit());

    assert_eq!(store.get(id).unwrap().text, "a");
    assert!(store.editing().is_none());
    assert_eq!(store.save_edit(), EditOutcome::NoActiveEdit);
    assert!(!store.change_draft("late"));
}

#[test]
fn clear_completed_removes_exactly_completed_and_is_idempotent() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["a", "b", "c"]);
    let a = store.todos()[0].id;
    let c = store.todos()[2].id;
    store.toggle(a);
    store.toggle(c);

    assert_eq!(store.clear_completed(), 2);
    assert_eq!(texts(store.todos()), ["b"]);
    assert!(!store.has_completed());

    assert_eq!(store.clear_completed(), 0);
    assert_eq!(texts(store.todos()), ["b"]);
    assert_eq!(texts(&persisted(&slot)), ["b"]);
}

#[test]
fn reorder_moves_first_to_last() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["A", "B", "C"]);

    assert!(store.reorder(0, 2));

    assert_eq!(texts(store.todos()), ["B", "C", "A"]);
    assert_eq!(texts(&persisted(&slot)), ["B", "C", "A"]);
}

#[test]
fn reorder_same_or_out_of_range_index_is_noop() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["A", "B", "C"]);

    for k in 0..4 {
        assert!(!store.reorder(k, k));
    }
    assert!(!store.reorder(0, 3));
    assert!(!store.reorder(5, 1));
    assert_eq!(texts(store.todos()), ["A", "B", "C"]);
}

#[test]
fn reorder_uses_filtered_indices() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["A", "B", "C", "D"]);
    let b = store.todos()[1].id;
    let d = store.todos()[3].id;
    store.toggle(b);
    store.toggle(d);
    store.set_filter(Filter::Completed);

    // completed view is [B, D]
    assert!(!store.reorder(0, 2));
    assert!(store.reorder(1, 0));

    // D is removed at canonical 3 and reinserted at B's canonical 1
    assert_eq!(texts(store.todos()), ["A", "D", "B", "C"]);
    assert_eq!(texts(&persisted(&slot)), ["A", "D", "B", "C"]);
}

#[test]
fn filtered_drag_shifts_hidden_records_with_the_splice() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["A", "B", "C"]);
    let b = store.todos()[1].id;
    store.toggle(b);
    store.set_filter(Filter::Active);

    // active view is [A, C]
    assert!(store.drag_start(0));
    assert!(store.drag_enter(1));
    assert!(store.drag_end());

    assert_eq!(texts(store.todos()), ["B", "C", "A"]);
    let visible: Vec<&str> = store
        .visible_list()
        .iter()
        .map(|todo| todo.text.as_str())
        .collect();
    assert_eq!(visible, ["C", "A"]);
}

#[test]
fn visible_list_follows_filter_and_preserves_order() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["a", "b", "c", "d"]);
    let b = store.todos()[1].id;
    let c = store.todos()[2].id;
    store.toggle(b);
    store.toggle(c);

    let visible = |store: &MemoryStore| -> Vec<String> {
        store
            .visible_list()
            .into_iter()
            .map(|todo| todo.text.clone())
            .collect()
    };

    assert_eq!(visible(&store), ["a", "b", "c", "d"]);
    store.set_filter(Filter::Active);
    assert_eq!(visible(&store), ["a", "d"]);
    store.set_filter(Filter::Completed);
    assert_eq!(visible(&store), ["b", "c"]);
}

#[test]
fn active_count_ignores_filter() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["a", "b", "c"]);
    let a = store.todos()[0].id;
    store.toggle(a);
    store.set_filter(Filter::Completed);

    assert_eq!(store.visible_list().len(), 1);
    assert_eq!(store.active_count(), 2);
}

#[test]
fn drag_gesture_commits_move_at_drag_end() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["A", "B", "C"]);

    assert!(store.drag_start(0));
    assert!(store.drag_enter(1));
    assert!(store.drag_enter(2));
    assert_eq!(texts(store.todos()), ["A", "B", "C"]);

    assert!(store.drag_end());
    assert_eq!(texts(store.todos()), ["B", "C", "A"]);
    assert_eq!(texts(&persisted(&slot)), ["B", "C", "A"]);
}

#[test]
fn abandoned_drag_leaves_list_unchanged() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["A", "B", "C"]);

    store.drag_start(0);
    store.drag_enter(2);
    // drag-end never fires; the next gesture replaces the stale one
    store.drag_start(1);
    assert!(!store.drag_end());

    assert_eq!(texts(store.todos()), ["A", "B", "C"]);
    assert_eq!(texts(&persisted(&slot)), ["A", "B", "C"]);
}

#[test]
fn drag_resolves_ids_after_filter_change() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["A", "B", "C"]);
    let a = store.todos()[0].id;

    store.drag_start(0);
    store.drag_enter(2);
    store.toggle(a);
    store.set_filter(Filter::Active);

    assert!(!store.drag_end(), "dragged record is no longer visible");
    assert_eq!(texts(store.todos()), ["A", "B", "C"]);
}

#[test]
fn move_todo_uses_stable_ids() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["A", "B", "C"]);
    let a = store.todos()[0].id;
    let c = store.todos()[2].id;

    assert!(store.move_todo(c, a));
    assert_eq!(texts(store.todos()), ["C", "A", "B"]);
    assert!(!store.move_todo(TodoId::from_raw(-5), a));
}

#[test]
fn reopen_restores_list_but_not_transient_state() {
    let slot = MemorySlot::new();
    {
        let mut store = store_with(&slot, &["a", "b"]);
        let a = store.todos()[0].id;
        store.toggle(a);
        store.set_filter(Filter::Completed);
        store.start_edit(a);
    }

    let store = open_store(&slot);
    assert_eq!(texts(store.todos()), ["a", "b"]);
    assert!(store.todos()[0].completed);
    assert_eq!(store.filter(), Filter::All);
    assert!(store.editing().is_none());
}

#[test]
fn corrupt_slot_content_degrades_to_empty_list() {
    for payload in ["not json", "{\"id\":1}", "[{\"id\":1,\"text\":\"\",\"completed\":false}]"] {
        let slot = MemorySlot::with_value("todos", payload);
        let mut store = open_store(&slot);
        assert!(store.is_empty(), "payload {payload:?} should load as empty");

        store.add("fresh").unwrap();
        assert_eq!(texts(&persisted(&slot)), ["fresh"]);
    }
}

#[test]
fn serialize_then_deserialize_roundtrips() {
    let slot = MemorySlot::new();
    let mut store = store_with(&slot, &["a", "b", "c"]);
    let b = store.todos()[1].id;
    store.toggle(b);

    let payload = encode_todos(store.todos()).unwrap();
    assert_eq!(decode_todos(&payload).unwrap(), store.todos());
    assert_eq!(slot.read("todos").unwrap().as_deref(), Some(payload.as_str()));
}

#[test]
fn dispatch_maps_interaction_events() {
    let slot = MemorySlot::new();
    let mut store = open_store(&slot);

    let EventOutcome::Added(id) = store.dispatch(TodoEvent::SubmitNewText("walk".into())) else {
        panic!("submit should add");
    };
    assert_eq!(
        store.dispatch(TodoEvent::SubmitNewText("  ".into())),
        EventOutcome::Rejected(TodoValidationError::EmptyText)
    );
    assert_eq!(store.dispatch(TodoEvent::StartEdit(id)), EventOutcome::Applied);
    assert_eq!(
        store.dispatch(TodoEvent::ChangeDraft("run".into())),
        EventOutcome::Applied
    );
    assert_eq!(store.dispatch(TodoEvent::CommitEdit), EventOutcome::Applied);
    assert_eq!(store.get(id).unwrap().text, "run");
    assert_eq!(store.dispatch(TodoEvent::CancelEdit), EventOutcome::Ignored);
    assert_eq!(store.dispatch(TodoEvent::Toggle(id)), EventOutcome::Applied);
    assert_eq!(
        store.dispatch(TodoEvent::SelectFilter(Filter::Active)),
        EventOutcome::Applied
    );
    assert!(store.visible_list().is_empty());
    assert_eq!(store.dispatch(TodoEvent::DragStart(0)), EventOutcome::Ignored);
    assert_eq!(store.dispatch(TodoEvent::ClearCompleted), EventOutcome::Applied);
    assert_eq!(store.dispatch(TodoEvent::Delete(id)), EventOutcome::Ignored);
    assert!(store.is_empty());
}

#[test]
fn buy_milk_scenario() {
    let slot = MemorySlot::new();
    let mut store = open_store(&slot);
    assert!(store.is_empty());

    let id = store.add("buy milk").unwrap();
    assert_eq!(store.todos().len(), 1);
    assert_eq!(store.todos()[0].text, "buy milk");
    assert!(!store.todos()[0].completed);

    store.toggle(id);
    assert!(store.get(id).unwrap().completed);

    store.set_filter(Filter::Active);
    assert!(store.visible_list().is_empty());

    store.set_filter(Filter::Completed);
    let visible = store.visible_list();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, id);
}

struct UnavailableSlot;

impl PersistenceSlot for UnavailableSlot {
    fn read(&self, _key: &str) -> SlotResult<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> SlotResult<()> {
        Err(SlotError::Unavailable("quota exceeded".to_string()))
    }
}

#[test]
fn failed_saves_keep_in_memory_changes() {
    let repo = SlotTodoRepository::new(UnavailableSlot);
    assert!(matches!(
        repo.save(&[]),
        Err(RepoError::Slot(SlotError::Unavailable(_)))
    ));

    let mut store = TodoStore::open(repo);
    let a = store.add("A").unwrap();
    store.add("B").unwrap();
    assert_eq!(texts(store.todos()), ["A", "B"]);

    assert!(store.toggle(a));
    assert!(store.get(a).unwrap().completed);

    assert!(store.reorder(0, 1));
    assert_eq!(texts(store.todos()), ["B", "A"]);
    assert_eq!(store.active_count(), 1);
}
