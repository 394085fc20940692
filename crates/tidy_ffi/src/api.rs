//! FFI use-case API for UI-facing calls.
//!
//! # Responsibility
//! - Map the list UI's interaction events onto one process-wide store.
//! - Return a complete view snapshot after every call.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Calls are serialized through one mutex; the store is single-writer.
//! - The store opens lazily from `TIDY_*` configuration unless `todo_open`
//!   chose a database first.

use log::{error, info};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tidy_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    EventOutcome, Filter, SqliteTodoStore, TidyConfig, TodoEvent, TodoId,
};

static SESSION: OnceLock<Mutex<Option<SqliteTodoStore>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling logs.
/// - Idempotent for the same `level + log_dir`; conflicting calls fail.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One row of the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemView {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    /// Whether this row is the one under edit.
    pub editing: bool,
}

/// Full view state returned by every list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoSnapshot {
    /// `false` when the call was rejected or the store is unavailable.
    pub ok: bool,
    pub message: String,
    /// Visible records under the active filter.
    pub items: Vec<TodoItemView>,
    pub filter: String,
    pub active_count: u32,
    /// Footer label, e.g. `2 items left`.
    pub items_left: String,
    pub has_completed: bool,
    pub editing_draft: Option<String>,
}

impl TodoSnapshot {
    fn capture(store: &SqliteTodoStore, ok: bool, message: impl Into<String>) -> Self {
        let editing = store.editing();
        let items = store
            .visible_list()
            .into_iter()
            .map(|todo| TodoItemView {
                id: todo.id.as_raw(),
                text: todo.text.clone(),
                completed: todo.completed,
                editing: editing.is_some_and(|edit| edit.id == todo.id),
            })
            .collect();

        Self {
            ok,
            message: message.into(),
            items,
            filter: store.filter().to_string(),
            active_count: u32::try_from(store.active_count()).unwrap_or(u32::MAX),
            items_left: store.items_left_label(),
            has_completed: store.has_completed(),
            editing_draft: editing.map(|edit| edit.draft.clone()),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            items: Vec::new(),
            filter: Filter::default().to_string(),
            active_count: 0,
            items_left: String::new(),
            has_completed: false,
            editing_draft: None,
        }
    }
}

/// Opens the store at `db_path`, replacing any open session.
///
/// An empty `db_path` falls back to `TIDY_DB_PATH` / the default location.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_open(db_path: String) -> TodoSnapshot {
    let mut config = TidyConfig::from_env();
    let trimmed = db_path.trim();
    if !trimmed.is_empty() {
        config.db_path = PathBuf::from(trimmed);
    }

    let store = match config.open_store() {
        Ok(store) => store,
        Err(err) => {
            error!("event=ffi_open module=ffi status=error error={err}");
            return TodoSnapshot::failure(format!("todo_open failed: {err}"));
        }
    };
    info!("event=ffi_open module=ffi status=ok count={}", store.len());

    let Ok(mut guard) = session().lock() else {
        return TodoSnapshot::failure("todo_open failed: session lock poisoned");
    };
    let snapshot = TodoSnapshot::capture(&store, true, "Store opened.");
    *guard = Some(store);
    snapshot
}

/// Returns the current view without changing anything.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_snapshot() -> TodoSnapshot {
    with_store("todo_snapshot", |store| TodoSnapshot::capture(store, true, "OK."))
}

/// submit-new-text
#[flutter_rust_bridge::frb(sync)]
pub fn todo_add(text: String) -> TodoSnapshot {
    dispatch("todo_add", TodoEvent::SubmitNewText(text))
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_toggle(id: i64) -> TodoSnapshot {
    dispatch("todo_toggle", TodoEvent::Toggle(TodoId::from_raw(id)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(id: i64) -> TodoSnapshot {
    dispatch("todo_delete", TodoEvent::Delete(TodoId::from_raw(id)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_start_edit(id: i64) -> TodoSnapshot {
    dispatch("todo_start_edit", TodoEvent::StartEdit(TodoId::from_raw(id)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_change_draft(text: String) -> TodoSnapshot {
    dispatch("todo_change_draft", TodoEvent::ChangeDraft(text))
}

/// commit-edit (Enter key or blur)
#[flutter_rust_bridge::frb(sync)]
pub fn todo_commit_edit() -> TodoSnapshot {
    dispatch("todo_commit_edit", TodoEvent::CommitEdit)
}

/// cancel-edit (Escape key)
#[flutter_rust_bridge::frb(sync)]
pub fn todo_cancel_edit() -> TodoSnapshot {
    dispatch("todo_cancel_edit", TodoEvent::CancelEdit)
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_clear_completed() -> TodoSnapshot {
    dispatch("todo_clear_completed", TodoEvent::ClearCompleted)
}

/// select-filter; `name` is one of `all|active|completed`.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_set_filter(name: String) -> TodoSnapshot {
    match name.parse::<Filter>() {
        Ok(filter) => dispatch("todo_set_filter", TodoEvent::SelectFilter(filter)),
        Err(err) => with_store("todo_set_filter", |store| {
            TodoSnapshot::capture(store, false, err.to_string())
        }),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_drag_start(index: u32) -> TodoSnapshot {
    dispatch("todo_drag_start", TodoEvent::DragStart(index as usize))
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_drag_enter(index: u32) -> TodoSnapshot {
    dispatch("todo_drag_enter", TodoEvent::DragEnter(index as usize))
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_drag_end() -> TodoSnapshot {
    dispatch("todo_drag_end", TodoEvent::DragEnd)
}

fn session() -> &'static Mutex<Option<SqliteTodoStore>> {
    SESSION.get_or_init(|| Mutex::new(None))
}

fn dispatch(call: &'static str, event: TodoEvent) -> TodoSnapshot {
    with_store(call, |store| {
        let (ok, message) = match store.dispatch(event) {
            EventOutcome::Added(id) => (true, format!("Todo {id} added.")),
            EventOutcome::Applied => (true, "OK.".to_string()),
            EventOutcome::Ignored => (true, "No change.".to_string()),
            EventOutcome::Rejected(err) => (false, format!("{call} rejected: {err}")),
        };
        TodoSnapshot::capture(store, ok, message)
    })
}

fn with_store(
    call: &'static str,
    f: impl FnOnce(&mut SqliteTodoStore) -> TodoSnapshot,
) -> TodoSnapshot {
    let Ok(mut guard) = session().lock() else {
        return TodoSnapshot::failure(format!("{call} failed: session lock poisoned"));
    };

    if guard.is_none() {
        match TidyConfig::from_env().open_store() {
            Ok(store) => *guard = Some(store),
            Err(err) => {
                error!("event=ffi_open module=ffi status=error call={call} error={err}");
                return TodoSnapshot::failure(format!("{call} failed: {err}"));
            }
        }
    }

    match guard.as_mut() {
        Some(store) => f(store),
        None => TodoSnapshot::failure(format!("{call} failed: store unavailable")),
    }
}
