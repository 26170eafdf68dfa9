//! Durable slots for the task collection and the accrual dates.

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StorageError;
use crate::models::{LastUpdated, Task};

/// Durable slot holding the whole task collection as one blob.
pub trait Persistence {
    /// Loads the persisted collection. An empty slot is an empty collection.
    fn load(&self) -> Result<Vec<Task>, StorageError>;

    /// Replaces the persisted collection.
    fn save(&self, tasks: &[Task]) -> Result<(), StorageError>;

    /// Loads the accrual dates. Slots without a place for them start empty.
    fn load_last_updated(&self) -> Result<LastUpdated, StorageError> {
        Ok(LastUpdated::new())
    }

    /// Replaces the accrual dates. Slots without a place for them drop them.
    fn save_last_updated(&self, _last_updated: &LastUpdated) -> Result<(), StorageError> {
        Ok(())
    }
}

impl<P: Persistence + ?Sized> Persistence for Rc<P> {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        (**self).save(tasks)
    }

    fn load_last_updated(&self) -> Result<LastUpdated, StorageError> {
        (**self).load_last_updated()
    }

    fn save_last_updated(&self, last_updated: &LastUpdated) -> Result<(), StorageError> {
        (**self).save_last_updated(last_updated)
    }
}

/// Stores tasks as pretty-printed JSON in a single file, with the accrual
/// dates in a sidecar file beside it (`tasks.json` -> `tasks.accrual.json`).
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn accrual_path(&self) -> PathBuf {
        self.path.with_extension("accrual.json")
    }
}

/// Reads a whole file. A missing or blank file is `None`.
fn read_blob(path: &Path) -> Result<Option<String>, StorageError> {
    let mut f = match OpenOptions::new().read(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    if s.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(s))
}

fn write_blob(path: &Path, s: &str) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

impl Persistence for JsonFileStorage {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        match read_blob(&self.path)? {
            Some(s) => Ok(serde_json::from_str(&s)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        write_blob(&self.path, &serde_json::to_string_pretty(tasks)?)
    }

    fn load_last_updated(&self) -> Result<LastUpdated, StorageError> {
        match read_blob(&self.accrual_path())? {
            Some(s) => Ok(serde_json::from_str(&s)?),
            None => Ok(LastUpdated::new()),
        }
    }

    fn save_last_updated(&self, last_updated: &LastUpdated) -> Result<(), StorageError> {
        write_blob(&self.accrual_path(), &serde_json::to_string_pretty(last_updated)?)
    }
}

/// An in-memory key-value slot holding the serialized blob.
///
/// Goes through the same JSON encoding as [`JsonFileStorage`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: RefCell<Option<String>>,
    accrual_blob: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with a raw blob, e.g. one written by another client.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        MemoryStorage {
            blob: RefCell::new(Some(blob.into())),
            accrual_blob: RefCell::new(None),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl Persistence for MemoryStorage {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        match self.blob.borrow().as_deref() {
            None => Ok(Vec::new()),
            Some(s) => Ok(serde_json::from_str(s)?),
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let s = serde_json::to_string(tasks)?;
        *self.blob.borrow_mut() = Some(s);
        Ok(())
    }

    fn load_last_updated(&self) -> Result<LastUpdated, StorageError> {
        match self.accrual_blob.borrow().as_deref() {
            None => Ok(LastUpdated::new()),
            Some(s) => Ok(serde_json::from_str(s)?),
        }
    }

    fn save_last_updated(&self, last_updated: &LastUpdated) -> Result<(), StorageError> {
        let s = serde_json::to_string(last_updated)?;
        *self.accrual_blob.borrow_mut() = Some(s);
        Ok(())
    }
}
