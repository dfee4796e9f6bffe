//! One-level undo of entity updates
//!
//! Each key holds at most one snapshot: the state right before its latest
//! update. Updating the same key again replaces the snapshot but keeps the
//! key's place in the order, so the default undo target is the key whose
//! first pending update came last. There is no deeper history.

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    repository::{Entity, Repository},
};

#[derive(Debug)]
pub struct UndoBuffer<E: Entity> {
    /// Entity kind used in error messages ("user", "book")
    kind: &'static str,
    snapshots: IndexMap<String, E>,
}

impl<E: Entity> UndoBuffer<E> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            snapshots: IndexMap::new(),
        }
    }

    /// Store the pre-update state, returning the snapshot it replaces
    pub fn remember(&mut self, snapshot: E) -> Option<E> {
        self.snapshots.insert(snapshot.key().to_string(), snapshot)
    }

    /// Undo a `remember` whose update could not be persisted
    pub fn revert(&mut self, key: &str, replaced: Option<E>) {
        match replaced {
            Some(snapshot) => {
                self.snapshots.insert(key.to_string(), snapshot);
            }
            None => {
                self.snapshots.shift_remove(key);
            }
        }
    }

    pub fn discard(&mut self, key: &str) {
        self.snapshots.shift_remove(key);
    }

    /// Key restored by a default undo
    pub fn latest_key(&self) -> Option<&str> {
        self.snapshots.keys().next_back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Write the snapshot for `key` (or the most recent one) back to the store.
    ///
    /// The snapshot is dropped only once the store accepted it.
    pub fn restore(
        &mut self,
        repository: &mut dyn Repository<E>,
        key: Option<&str>,
    ) -> AppResult<E> {
        let key = match key {
            Some(key) => key.to_string(),
            None => self
                .latest_key()
                .ok_or_else(|| AppError::NoHistory("No previous state to restore".to_string()))?
                .to_string(),
        };
        let snapshot = self.snapshots.get(&key).cloned().ok_or_else(|| {
            AppError::NoHistory(format!("No previous state for {} '{}'", self.kind, key))
        })?;

        let restored = repository.update(snapshot)?.ok_or_else(|| {
            AppError::NotFound(format!("{} '{}' no longer exists", self.kind, key))
        })?;
        self.snapshots.shift_remove(&key);
        tracing::debug!("Restored previous state of {} '{}'", self.kind, key);
        Ok(restored)
    }
}
