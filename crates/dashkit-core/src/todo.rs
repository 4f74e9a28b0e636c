//! Persistent to-do list keyed by generated ids.

use dashkit_store::{Slot, SlotStore};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::render::{Line, Render, Tone};
use crate::{CoreError, ValidationError};

pub const TODO_SLOT: &str = "todo-items";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Insertion-ordered list written through to its slot after every change.
#[derive(Debug, Clone)]
pub struct TodoList {
    items: Vec<Todo>,
    slot: Slot<Vec<Todo>>,
}

impl TodoList {
    /// Loads the saved list; missing or corrupt data starts empty.
    pub fn open(store: SlotStore) -> Self {
        let slot: Slot<Vec<Todo>> = Slot::new(store, TODO_SLOT);
        let items = slot.load().unwrap_or_default();
        debug!(count = items.len(), "todo list loaded");
        Self { items, slot }
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Todo> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn add(&mut self, text: &str) -> Result<&Todo, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyTodo.into());
        }

        let mut next = self.items.clone();
        next.push(Todo {
            id: Uuid::new_v4(),
            text: text.to_owned(),
            completed: false,
        });
        self.commit(next)?;
        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    /// Flips completion and returns the new state.
    pub fn toggle(&mut self, id: Uuid) -> Result<bool, CoreError> {
        let index = self.position(id)?;
        let mut next = self.items.clone();
        next[index].completed = !next[index].completed;
        let completed = next[index].completed;
        self.commit(next)?;
        Ok(completed)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Todo, CoreError> {
        let index = self.position(id)?;
        let mut next = self.items.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    /// Resolves a full id or a unique prefix of one.
    pub fn resolve(&self, raw: &str) -> Result<Uuid, ValidationError> {
        let needle = raw.trim().to_ascii_lowercase();
        let unknown = || ValidationError::UnknownTodo {
            id: raw.trim().to_owned(),
        };
        if needle.is_empty() {
            return Err(unknown());
        }

        let mut matches = self
            .items
            .iter()
            .filter(|item| item.id.to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(item), None) => Ok(item.id),
            _ => Err(unknown()),
        }
    }

    fn position(&self, id: Uuid) -> Result<usize, ValidationError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| ValidationError::UnknownTodo { id: id.to_string() })
    }

    /// Saves `next` and only then makes it the in-memory list.
    fn commit(&mut self, next: Vec<Todo>) -> Result<(), CoreError> {
        self.slot.save(&next)?;
        self.items = next;
        Ok(())
    }
}

impl Render for TodoList {
    fn render(&self) -> Vec<Line> {
        if self.items.is_empty() {
            return vec![Line::muted("Nothing to do.")];
        }
        self.items
            .iter()
            .map(|item| {
                let (mark, tone) = if item.completed {
                    ("[x]", Tone::Muted)
                } else {
                    ("[ ]", Tone::Plain)
                };
                let short_id = item.id.simple().to_string();
                Line::toned(format!("{mark} {}  {}", &short_id[..8], item.text), tone)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn rejects_blank_text() {
        let dir = tempdir().expect("tempdir");
        let mut list = TodoList::open(SlotStore::open(dir.path()).expect("store"));

        let error = list.add("   ").expect_err("blank");
        assert!(matches!(error, CoreError::Validation(ValidationError::EmptyTodo)));
        assert!(list.is_empty());
    }

    #[test]
    fn duplicate_text_is_addressed_by_id() {
        let dir = tempdir().expect("tempdir");
        let mut list = TodoList::open(SlotStore::open(dir.path()).expect("store"));
        let first = list.add("Buy milk").expect("add").id;
        let second = list.add("Buy milk").expect("add").id;

        list.toggle(second).expect("toggle");
        list.remove(first).expect("remove");

        assert_eq!(list.len(), 1);
        assert_eq!(list.items()[0].id, second);
        assert!(list.items()[0].completed);
    }

    #[test]
    fn unknown_id_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let mut list = TodoList::open(SlotStore::open(dir.path()).expect("store"));

        let error = list.toggle(Uuid::new_v4()).expect_err("unknown");
        assert!(matches!(
            error,
            CoreError::Validation(ValidationError::UnknownTodo { .. })
        ));
    }

    #[test]
    fn failed_save_leaves_list_unchanged() {
        let dir = tempdir().expect("tempdir");
        let root = dir.path().join("data");
        let mut list = TodoList::open(SlotStore::open(&root).expect("store"));
        let kept = list.add("Walk dog").expect("add").id;
        std::fs::remove_dir_all(&root).expect("remove data dir");

        let error = list.add("Buy milk").expect_err("save must fail");
        assert!(matches!(error, CoreError::Store(_)));
        assert_eq!(list.len(), 1);

        list.toggle(kept).expect_err("toggle save must fail");
        assert!(!list.items()[0].completed);

        list.remove(kept).expect_err("remove save must fail");
        assert_eq!(list.len(), 1);
        assert_eq!(list.items()[0].id, kept);
    }

    #[test]
    fn resolves_unique_prefix() {
        let dir = tempdir().expect("tempdir");
        let mut list = TodoList::open(SlotStore::open(dir.path()).expect("store"));
        let id = list.add("Walk dog").expect("add").id;

        let prefix = &id.to_string()[..8];
        assert_eq!(list.resolve(prefix), Ok(id));
        assert!(list.resolve("").is_err());
    }
}
