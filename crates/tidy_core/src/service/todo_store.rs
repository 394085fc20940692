//! Todo list store.
//!
//! # Responsibility
//! - Hold the ordered todo list, the active filter, the editing state and the
//!   in-flight drag gesture.
//! - Apply user mutations and write the list back after each one.
//!
//! # Invariants
//! - Store operations never fail the caller; invalid input is a no-op or an
//!   explicit validation result.
//! - Save failures are logged and do not roll back in-memory state.
//! - At most one record is under edit; a new `start_edit` drops the old draft.
//! - Drag gestures track stable ids and only touch the list at `drag_end`.

use crate::model::filter::Filter;
use crate::model::todo::{normalize_text, Todo, TodoId, TodoValidationError};
use crate::repo::todo_repo::TodoListRepository;
use crate::service::event::{EventOutcome, TodoEvent};
use log::{debug, error, info, warn};

/// The single record currently being text-edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingState {
    pub id: TodoId,
    pub draft: String,
}

/// Result of `TodoStore::save_edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The record text was replaced by the trimmed draft.
    Saved,
    /// The draft was blank; the record kept its previous text.
    Reverted,
    /// No edit was active, or its record no longer exists.
    NoActiveEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragGesture {
    dragged: TodoId,
    hovered: Option<TodoId>,
}

/// In-memory todo list synchronized to a `TodoListRepository`.
pub struct TodoStore<R: TodoListRepository> {
    repo: R,
    todos: Vec<Todo>,
    filter: Filter,
    editing: Option<EditingState>,
    drag: Option<DragGesture>,
}

impl<R: TodoListRepository> TodoStore<R> {
    /// Loads the persisted list through `repo`.
    ///
    /// Absent or unreadable data yields an empty list.
    pub fn open(repo: R) -> Self {
        let todos = match repo.load() {
            Ok(todos) => {
                info!(
                    "event=todo_load module=store status=ok count={}",
                    todos.len()
                );
                todos
            }
            Err(err) => {
                warn!(
                    "event=todo_load module=store status=degraded error_code=todo_load_failed error={}",
                    err
                );
                Vec::new()
            }
        };

        Self {
            repo,
            todos,
            filter: Filter::default(),
            editing: None,
            drag: None,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Full list in canonical order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn editing(&self) -> Option<&EditingState> {
        self.editing.as_ref()
    }

    /// Appends a new open todo.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank after truncation and trimming; the
    ///   list is left untouched.
    pub fn add(&mut self, text: &str) -> Result<TodoId, TodoValidationError> {
        let id = TodoId::next_after(self.todos.iter().map(|todo| &todo.id));
        let todo = Todo::new(id, text).map_err(|err| {
            debug!("event=todo_add module=store status=rejected reason={err}");
            err
        })?;

        self.todos.push(todo);
        self.persist("todo_add");
        Ok(id)
    }

    /// Flips `completed` on the matching record. Returns `false` if absent.
    pub fn toggle(&mut self, id: TodoId) -> bool {
        let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == id) else {
            debug!("event=todo_toggle module=store status=noop id={id}");
            return false;
        };
        todo.completed = !todo.completed;
        self.persist("todo_toggle");
        true
    }

    /// Removes the matching record. Returns `false` if absent.
    pub fn delete(&mut self, id: TodoId) -> bool {
        let Some(index) = self.position_of(id) else {
            debug!("event=todo_delete module=store status=noop id={id}");
            return false;
        };
        self.todos.remove(index);
        if self.editing.as_ref().is_some_and(|edit| edit.id == id) {
            self.editing = None;
        }
        self.persist("todo_delete");
        true
    }

    /// Starts editing `id` with its current text as draft.
    ///
    /// Any other unsaved edit is discarded. Returns `false` if `id` is absent.
    pub fn start_edit(&mut self, id: TodoId) -> bool {
        let Some(todo) = self.get(id) else {
            return false;
        };
        let draft = todo.text.clone();
        if let Some(previous) = self.editing.replace(EditingState { id, draft }) {
            if previous.id != id {
                debug!(
                    "event=todo_edit module=store status=abandoned id={}",
                    previous.id
                );
            }
        }
        true
    }

    /// Replaces the draft of the active edit. Returns `false` without one.
    pub fn change_draft(&mut self, text: &str) -> bool {
        match self.editing.as_mut() {
            Some(edit) => {
                edit.draft = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Commits the active edit and clears the editing state.
    ///
    /// A blank draft keeps the previous text instead of deleting the record.
    pub fn save_edit(&mut self) -> EditOutcome {
        let Some(edit) = self.editing.take() else {
            return EditOutcome::NoActiveEdit;
        };
        let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == edit.id) else {
            debug!(
                "event=todo_edit module=store status=noop id={} reason=missing",
                edit.id
            );
            return EditOutcome::NoActiveEdit;
        };

        let outcome = match normalize_text(&edit.draft) {
            Ok(text) => {
                todo.text = text;
                EditOutcome::Saved
            }
            Err(_) => EditOutcome::Reverted,
        };
        self.persist("todo_edit");
        outcome
    }

    /// Drops the active edit without touching the record.
    pub fn cancel_edit(&mut self) -> bool {
        self.editing.take().is_some()
    }

    /// Removes every completed record and returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.todos.len();
        self.todos.retain(|todo| !todo.completed);
        let removed = before - self.todos.len();

        let edit_removed = self
            .editing
            .as_ref()
            .is_some_and(|edit| self.position_of(edit.id).is_none());
        if edit_removed {
            self.editing = None;
        }
        self.persist("todo_clear_completed");
        removed
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Moves the record shown at visible index `from` onto the record shown
    /// at visible index `to`.
    ///
    /// Both indices are mapped to canonical positions; the dragged record is
    /// removed at its own position and reinserted at the target's. Hidden
    /// records shift with that splice. Returns `false` when the indices are
    /// equal or out of the visible range.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let visible = self.visible_positions();
        let (Some(&source), Some(&target)) = (visible.get(from), visible.get(to)) else {
            return false;
        };
        if from == to {
            return false;
        }

        let moved = self.todos.remove(source);
        self.todos.insert(target, moved);

        self.persist("todo_reorder");
        true
    }

    /// Moves `dragged` onto the visible position currently held by `target`.
    ///
    /// Both ids are resolved against the visible ordering at call time;
    /// returns `false` if either is not visible.
    pub fn move_todo(&mut self, dragged: TodoId, target: TodoId) -> bool {
        let visible = self.visible_list();
        let from = visible.iter().position(|todo| todo.id == dragged);
        let to = visible.iter().position(|todo| todo.id == target);
        match (from, to) {
            (Some(from), Some(to)) => self.reorder(from, to),
            _ => {
                debug!(
                    "event=todo_reorder module=store status=noop reason=not_visible dragged={dragged} target={target}"
                );
                false
            }
        }
    }

    /// Begins a drag gesture on the record at visible index `index`.
    ///
    /// Replaces any abandoned gesture. Out of range clears the gesture.
    pub fn drag_start(&mut self, index: usize) -> bool {
        self.drag = self.visible_id_at(index).map(|dragged| DragGesture {
            dragged,
            hovered: None,
        });
        self.drag.is_some()
    }

    /// Records the record at visible index `index` as the drop target.
    pub fn drag_enter(&mut self, index: usize) -> bool {
        let Some(target) = self.visible_id_at(index) else {
            return false;
        };
        match self.drag.as_mut() {
            Some(gesture) => {
                gesture.hovered = Some(target);
                true
            }
            None => false,
        }
    }

    /// Finishes the drag gesture, committing the move if it resolves.
    pub fn drag_end(&mut self) -> bool {
        match self.drag.take() {
            Some(DragGesture {
                dragged,
                hovered: Some(target),
            }) if dragged != target => self.move_todo(dragged, target),
            _ => false,
        }
    }

    /// Records matching the active filter, in list order.
    pub fn visible_list(&self) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|todo| self.filter.matches(todo))
            .collect()
    }

    /// Number of open records over the whole list, ignoring the filter.
    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.len() - self.active_count()
    }

    pub fn has_completed(&self) -> bool {
        self.todos.iter().any(|todo| todo.completed)
    }

    /// Footer text such as `1 item left` or `3 items left`.
    pub fn items_left_label(&self) -> String {
        let count = self.active_count();
        let noun = if count == 1 { "item" } else { "items" };
        format!("{count} {noun} left")
    }

    /// Applies one interaction event.
    pub fn dispatch(&mut self, event: TodoEvent) -> EventOutcome {
        match event {
            TodoEvent::SubmitNewText(text) => match self.add(&text) {
                Ok(id) => EventOutcome::Added(id),
                Err(err) => EventOutcome::Rejected(err),
            },
            TodoEvent::Toggle(id) => EventOutcome::from_flag(self.toggle(id)),
            TodoEvent::Delete(id) => EventOutcome::from_flag(self.delete(id)),
            TodoEvent::StartEdit(id) => EventOutcome::from_flag(self.start_edit(id)),
            TodoEvent::ChangeDraft(text) => EventOutcome::from_flag(self.change_draft(&text)),
            TodoEvent::CommitEdit => {
                EventOutcome::from_flag(self.save_edit() != EditOutcome::NoActiveEdit)
            }
            TodoEvent::CancelEdit => EventOutcome::from_flag(self.cancel_edit()),
            TodoEvent::ClearCompleted => EventOutcome::from_flag(self.clear_completed() > 0),
            TodoEvent::SelectFilter(filter) => {
                let changed = self.filter != filter;
                self.set_filter(filter);
                EventOutcome::from_flag(changed)
            }
            TodoEvent::DragStart(index) => EventOutcome::from_flag(self.drag_start(index)),
            TodoEvent::DragEnter(index) => EventOutcome::from_flag(self.drag_enter(index)),
            TodoEvent::DragEnd => EventOutcome::from_flag(self.drag_end()),
        }
    }

    fn position_of(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    fn visible_positions(&self) -> Vec<usize> {
        self.todos
            .iter()
            .enumerate()
            .filter(|(_, todo)| self.filter.matches(todo))
            .map(|(position, _)| position)
            .collect()
    }

    fn visible_id_at(&self, index: usize) -> Option<TodoId> {
        self.todos
            .iter()
            .filter(|todo| self.filter.matches(todo))
            .nth(index)
            .map(|todo| todo.id)
    }

    fn persist(&self, event: &'static str) {
        match self.repo.save(&self.todos) {
            Ok(()) => debug!(
                "event={} module=store status=ok count={}",
                event,
                self.todos.len()
            ),
            Err(err) => error!(
                "event={} module=store status=error error_code=todo_save_failed error={}",
                event, err
            ),
        }
    }
}
