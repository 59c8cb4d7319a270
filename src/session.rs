//! Named sessions of imported Data records.
//!
//! A `Session` owns its records, keyed by the path they were imported
//! from. A `SessionRegistry` maps session names to sessions; callers own
//! the registry and pass it to the import functions.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::data::Data;
use crate::error::{Error, Result};

/// Session name used when the caller does not pick one.
pub const DEFAULT_SESSION: &str = "default_session";

/// Paths mapped to their Data records.
#[derive(Debug, Clone, Default)]
pub struct Session {
    name: String,
    records: BTreeMap<PathBuf, Data>,
}

impl Session {
    /// Creates an empty session.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&Data> {
        self.records.get(path.as_ref())
    }

    pub fn get_mut<P: AsRef<Path>>(&mut self, path: P) -> Option<&mut Data> {
        self.records.get_mut(path.as_ref())
    }

    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        self.records.contains_key(path.as_ref())
    }

    /// Imported paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.records.keys().map(PathBuf::as_path)
    }

    /// Records in path order.
    pub fn records(&self) -> impl Iterator<Item = &Data> {
        self.records.values()
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut Data> {
        self.records.values_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inserts `data` under its own path, returning any record it replaces.
    pub(crate) fn insert(&mut self, data: Data) -> Option<Data> {
        self.records.insert(data.path().to_path_buf(), data)
    }

    /// Parses every record not yet loaded.
    ///
    /// Failures are logged and returned; the remaining records still load.
    pub fn load_all(&mut self) -> Vec<(PathBuf, Error)> {
        let mut failures = Vec::new();
        for (path, data) in self.records.iter_mut() {
            if let Err(e) = data.load() {
                warn!("{}", e);
                failures.push((path.clone(), e));
            }
        }
        failures
    }
}

/// Addresses a record for removal.
#[derive(Debug, Clone, Copy)]
pub enum RecordRef<'a> {
    Path(&'a Path),
    Record(&'a Data),
}

impl<'a> RecordRef<'a> {
    fn path(&self) -> &'a Path {
        match *self {
            RecordRef::Path(path) => path,
            RecordRef::Record(data) => data.path(),
        }
    }
}

impl<'a> From<&'a Path> for RecordRef<'a> {
    fn from(path: &'a Path) -> Self {
        RecordRef::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for RecordRef<'a> {
    fn from(path: &'a PathBuf) -> Self {
        RecordRef::Path(path.as_path())
    }
}

impl<'a> From<&'a str> for RecordRef<'a> {
    fn from(path: &'a str) -> Self {
        RecordRef::Path(Path::new(path))
    }
}

impl<'a> From<&'a Data> for RecordRef<'a> {
    fn from(data: &'a Data) -> Self {
        RecordRef::Record(data)
    }
}

/// Sessions addressable by name.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session under `name`, replacing any existing one.
    pub fn init(&mut self, name: &str) -> &mut Session {
        match self.sessions.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                warn!(
                    "Session '{}' re-initialised, {} records dropped",
                    name,
                    entry.get().len()
                );
                entry.insert(Session::new(name));
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                debug!("Session '{}' created", name);
                entry.insert(Session::new(name))
            }
        }
    }

    /// Removes the session `name` and returns it.
    pub fn close(&mut self, name: &str) -> Result<Session> {
        let session = self
            .sessions
            .remove(name)
            .ok_or_else(|| Error::NotFound(format!("session '{}'", name)))?;
        debug!("Session '{}' closed ({} records)", name, session.len());
        Ok(session)
    }

    pub fn get(&self, name: &str) -> Result<&Session> {
        self.sessions
            .get(name)
            .ok_or_else(|| Error::NotFound(format!("session '{}'", name)))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Session> {
        self.sessions
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(format!("session '{}'", name)))
    }

    /// Returns the session `name`, creating it if absent.
    pub fn get_or_init(&mut self, name: &str) -> &mut Session {
        self.sessions.entry(name.to_string()).or_insert_with(|| {
            debug!("Session '{}' created", name);
            Session::new(name)
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sessions.contains_key(name)
    }

    /// Session names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sessions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Removes one record from `session`, addressed by path or by record.
    pub fn remove<'a>(&mut self, target: impl Into<RecordRef<'a>>, session: &str) -> Result<Data> {
        let path = target.into().path();
        let target_session = self.get_mut(session)?;
        let data = target_session.records.remove(path).ok_or_else(|| {
            Error::NotFound(format!("record '{}' in session '{}'", path.display(), session))
        })?;
        debug!("Removed {} from session '{}'", path.display(), session);
        Ok(data)
    }
}
