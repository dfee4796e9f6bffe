//! Durable repository: the whole collection lives in one JSON file
//!
//! Every call loads the snapshot from disk; every mutating call writes the
//! full snapshot back (records and the next-id counter together). Writes go
//! to a sibling temporary file that is then renamed over the original, so a
//! failed write leaves the previous snapshot in place.

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Entity, Repository};
use crate::error::{AppResult, PersistenceError};

/// On-disk layout of one entity collection
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<E> {
    /// Sequence number handed to the next newly inserted record
    next_id: u64,
    records: IndexMap<String, E>,
}

impl<E> Default for Snapshot<E> {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: IndexMap::new(),
        }
    }
}

#[derive(Debug)]
pub struct FileRepository<E: Entity> {
    path: PathBuf,
    _entity: PhantomData<E>,
}

impl<E: Entity> FileRepository<E> {
    /// Open (without reading) `<dir>/<name>.json`, creating `dir` if needed
    pub fn open(dir: &Path, name: &str) -> AppResult<Self> {
        fs::create_dir_all(dir).map_err(|source| PersistenceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: dir.join(format!("{}.json", name)),
            _entity: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> AppResult<Snapshot<E>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Snapshot::default()),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                }
                .into())
            }
        };
        let snapshot = serde_json::from_slice(&bytes).map_err(PersistenceError::from)?;
        Ok(snapshot)
    }

    fn store(&self, snapshot: &Snapshot<E>) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(PersistenceError::from)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|source| PersistenceError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            "Wrote {} records to {}",
            snapshot.records.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl<E: Entity> Repository<E> for FileRepository<E> {
    fn save(&mut self, entity: E) -> AppResult<E> {
        let mut snapshot = self.load()?;
        let previous = snapshot
            .records
            .insert(entity.key().to_string(), entity.clone());
        if previous.is_none() {
            snapshot.next_id += 1;
        }
        self.store(&snapshot)?;
        Ok(entity)
    }

    fn find(&self, key: &str) -> AppResult<Option<E>> {
        Ok(self.load()?.records.shift_remove(key))
    }

    fn find_all(&self) -> AppResult<Vec<E>> {
        Ok(self.load()?.records.into_values().collect())
    }

    fn update(&mut self, entity: E) -> AppResult<Option<E>> {
        let mut snapshot = self.load()?;
        match snapshot.records.get_mut(entity.key()) {
            Some(slot) => *slot = entity.clone(),
            None => return Ok(None),
        }
        self.store(&snapshot)?;
        Ok(Some(entity))
    }

    fn delete(&mut self, key: &str) -> AppResult<bool> {
        let mut snapshot = self.load()?;
        if snapshot.records.shift_remove(key).is_none() {
            return Ok(false);
        }
        self.store(&snapshot)?;
        Ok(true)
    }
}
