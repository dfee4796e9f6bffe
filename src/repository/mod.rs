//! Repository layer: one persistence contract per entity type, two backends

pub mod file;
pub mod memory;

use std::fmt::Debug;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::AppResult,
    models::{Book, Loan, User},
};

pub use file::FileRepository;
pub use memory::MemoryRepository;

/// Record that can be stored under a unique string key
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned {
    fn key(&self) -> &str;
}

/// Persistence contract shared by every backend
pub trait Repository<E: Entity>: Debug {
    /// Stores the entity under its key, replacing any record with the same key
    fn save(&mut self, entity: E) -> AppResult<E>;

    fn find(&self, key: &str) -> AppResult<Option<E>>;

    /// All records, in insertion order
    fn find_all(&self) -> AppResult<Vec<E>>;

    /// Replaces an existing record; returns `None` when the key is unknown
    fn update(&mut self, entity: E) -> AppResult<Option<E>>;

    /// Removes the record; returns whether it existed
    fn delete(&mut self, key: &str) -> AppResult<bool>;

    fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.find(key)?.is_some())
    }
}

/// Backend chosen at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    /// One JSON snapshot per entity type inside the directory
    File(PathBuf),
}

/// Main repository struct holding one store per entity type
#[derive(Debug)]
pub struct Repositories {
    pub users: Box<dyn Repository<User>>,
    pub books: Box<dyn Repository<Book>>,
    pub loans: Box<dyn Repository<Loan>>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Box::new(MemoryRepository::<User>::new()),
            books: Box::new(MemoryRepository::<Book>::new()),
            loans: Box::new(MemoryRepository::<Loan>::new()),
        }
    }

    /// Create the stores for the given backend
    pub fn open(backend: &StorageBackend) -> AppResult<Self> {
        match backend {
            StorageBackend::Memory => Ok(Self::in_memory()),
            StorageBackend::File(dir) => {
                tracing::debug!("Opening file storage in {}", dir.display());
                Ok(Self {
                    users: Box::new(FileRepository::<User>::open(dir, "users")?),
                    books: Box::new(FileRepository::<Book>::open(dir, "books")?),
                    loans: Box::new(FileRepository::<Loan>::open(dir, "loans")?),
                })
            }
        }
    }
}
