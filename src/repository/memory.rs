//! Volatile repository backed by an insertion-ordered map

use indexmap::IndexMap;

use super::{Entity, Repository};
use crate::error::AppResult;

#[derive(Debug)]
pub struct MemoryRepository<E: Entity> {
    records: IndexMap<String, E>,
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Repository<E> for MemoryRepository<E> {
    fn save(&mut self, entity: E) -> AppResult<E> {
        self.records.insert(entity.key().to_string(), entity.clone());
        Ok(entity)
    }

    fn find(&self, key: &str) -> AppResult<Option<E>> {
        Ok(self.records.get(key).cloned())
    }

    fn find_all(&self) -> AppResult<Vec<E>> {
        Ok(self.records.values().cloned().collect())
    }

    fn update(&mut self, entity: E) -> AppResult<Option<E>> {
        match self.records.get_mut(entity.key()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(Some(entity))
            }
            None => Ok(None),
        }
    }

    fn delete(&mut self, key: &str) -> AppResult<bool> {
        Ok(self.records.shift_remove(key).is_some())
    }
}
