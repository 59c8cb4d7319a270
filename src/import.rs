//! Import pipeline: paths in, Data records into a session.
//!
//! [`import_one`] handles a single file and propagates its errors.
//! [`import_many`] accepts one file, one directory, or a list of paths,
//! and isolates failures: a bad file is logged and reported, and the
//! batch moves on to the next path.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::data::Data;
use crate::error::{Error, Result};
use crate::model::{DataType, SeqType};
use crate::session::{Session, SessionRegistry};

/// Overrides applied to every path of an import.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Forced datatype; inferred from each file's extension when `None`
    pub datatype: Option<DataType>,
    /// Forced seqtype; nucleotide when `None`
    pub seqtype: Option<SeqType>,
    /// Replace records for paths already in the session
    pub force: bool,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn datatype(mut self, datatype: DataType) -> Self {
        self.datatype = Some(datatype);
        self
    }

    pub fn seqtype(mut self, seqtype: SeqType) -> Self {
        self.seqtype = Some(seqtype);
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Result of importing one path.
#[derive(Debug)]
pub enum ImportOutcome {
    /// New record inserted
    Imported,
    /// Existing record replaced (forced)
    Replaced,
    /// Path already imported; nothing inserted
    SkippedDuplicate,
    /// Validation failed; nothing inserted
    Failed(Error),
}

impl ImportOutcome {
    /// Returns true if the session now holds a fresh record for the path.
    pub fn is_inserted(&self) -> bool {
        matches!(self, ImportOutcome::Imported | ImportOutcome::Replaced)
    }
}

/// Imports `path` into `session`, creating the session if needed.
///
/// A path already present is left untouched unless `options.force` is
/// set; that case is a warning, not an error.
pub fn import_one<P: AsRef<Path>>(
    registry: &mut SessionRegistry,
    path: P,
    options: &ImportOptions,
    session: &str,
) -> Result<ImportOutcome> {
    let path = path.as_ref();
    let target = registry.get_or_init(session);

    if !path.exists() {
        return Err(Error::InvalidArgument(format!(
            "path does not exist: {}",
            path.display()
        )));
    }

    if target.contains(path) && !options.force {
        warn!(
            "{} already imported into session '{}'; use force to re-import",
            path.display(),
            session
        );
        return Ok(ImportOutcome::SkippedDuplicate);
    }

    let data = Data::new(path, options.datatype, options.seqtype)?;
    debug!(
        "Importing {} as {} ({}) into session '{}'",
        path.display(),
        data.datatype(),
        data.seqtype(),
        session
    );

    match target.insert(data) {
        Some(_) => Ok(ImportOutcome::Replaced),
        None => Ok(ImportOutcome::Imported),
    }
}

/// Per-path report of a batch import.
#[derive(Debug)]
pub struct BatchImport<'a> {
    /// The session the paths were imported into
    pub session: &'a Session,
    /// One entry per attempted path, in import order
    pub outcomes: Vec<(PathBuf, ImportOutcome)>,
}

impl BatchImport<'_> {
    pub fn inserted(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_inserted()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, ImportOutcome::SkippedDuplicate))
            .count()
    }

    /// Paths that failed, with their error.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.outcomes.iter().filter_map(|(p, o)| match o {
            ImportOutcome::Failed(e) => Some((p.as_path(), e)),
            _ => None,
        })
    }
}

/// Lists the regular files directly inside `dir`, sorted by name.
fn directory_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Imports a file, a directory, or a list of paths into `session`.
///
/// - A single directory expands to the regular files it contains (not
///   recursive).
/// - A single file, or each path of a longer list, goes through
///   [`import_one`] as is.
///
/// Errors never abort the batch: each one is logged as a warning and
/// recorded as [`ImportOutcome::Failed`] for its path.
pub fn import_many<'r, P: AsRef<Path>>(
    registry: &'r mut SessionRegistry,
    paths: &[P],
    options: &ImportOptions,
    session: &str,
) -> BatchImport<'r> {
    registry.get_or_init(session);

    let mut outcomes = Vec::new();
    let targets: Vec<PathBuf> = match paths {
        [single] if single.as_ref().is_dir() => match directory_files(single.as_ref()) {
            Ok(files) => {
                debug!(
                    "Expanded {} to {} files",
                    single.as_ref().display(),
                    files.len()
                );
                files
            }
            Err(e) => {
                warn!("Cannot list {}: {}", single.as_ref().display(), e);
                outcomes.push((single.as_ref().to_path_buf(), ImportOutcome::Failed(e)));
                Vec::new()
            }
        },
        _ => paths.iter().map(|p| p.as_ref().to_path_buf()).collect(),
    };

    for path in targets {
        let outcome = match import_one(registry, &path, options, session) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                ImportOutcome::Failed(e)
            }
        };
        outcomes.push((path, outcome));
    }

    let batch = BatchImport {
        session: registry.get_or_init(session),
        outcomes,
    };
    info!(
        "Session '{}': {} imported, {} skipped, {} failed",
        session,
        batch.inserted(),
        batch.skipped(),
        batch.failures().count()
    );
    batch
}
