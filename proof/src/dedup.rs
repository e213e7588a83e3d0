//! Duplicate-detection stores.
//!
//! The pipeline depends only on [`DedupStore`]. [`NoDedupStore`] keeps the
//! uniqueness check permissive until a real index exists; the in-memory and
//! file-backed stores serve single-host deployments and tests.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::DedupError;
use crate::validators::uniqueness::ContentDigest;

/// Index of previously accepted content digests.
pub trait DedupStore: Send + Sync {
    /// Returns true if `digest` has been recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn exists(&self, digest: &ContentDigest) -> Result<bool, DedupError>;

    /// Records `digest` as seen.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    fn record(&self, digest: &ContentDigest) -> Result<(), DedupError>;

    /// Records `digest` unless already present; returns true if it was new.
    ///
    /// The default is not atomic. Stores shared between concurrent
    /// submissions must override it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried or updated.
    fn check_and_record(&self, digest: &ContentDigest) -> Result<bool, DedupError> {
        if self.exists(digest)? {
            return Ok(false);
        }
        self.record(digest)?;
        Ok(true)
    }
}

impl<T: DedupStore + ?Sized> DedupStore for &T {
    fn exists(&self, digest: &ContentDigest) -> Result<bool, DedupError> {
        (**self).exists(digest)
    }

    fn record(&self, digest: &ContentDigest) -> Result<(), DedupError> {
        (**self).record(digest)
    }

    fn check_and_record(&self, digest: &ContentDigest) -> Result<bool, DedupError> {
        (**self).check_and_record(digest)
    }
}

impl<T: DedupStore + ?Sized> DedupStore for std::sync::Arc<T> {
    fn exists(&self, digest: &ContentDigest) -> Result<bool, DedupError> {
        (**self).exists(digest)
    }

    fn record(&self, digest: &ContentDigest) -> Result<(), DedupError> {
        (**self).record(digest)
    }

    fn check_and_record(&self, digest: &ContentDigest) -> Result<bool, DedupError> {
        (**self).check_and_record(digest)
    }
}

/// Store that never reports a duplicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDedupStore;

impl DedupStore for NoDedupStore {
    fn exists(&self, _digest: &ContentDigest) -> Result<bool, DedupError> {
        Ok(false)
    }

    fn record(&self, _digest: &ContentDigest) -> Result<(), DedupError> {
        Ok(())
    }

    fn check_and_record(&self, _digest: &ContentDigest) -> Result<bool, DedupError> {
        Ok(true)
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct InMemoryDedupStore {
    seen: Mutex<HashSet<ContentDigest>>,
}

impl InMemoryDedupStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded digests.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::Poisoned`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, DedupError> {
        Ok(lock(&self.seen)?.len())
    }

    /// True if nothing has been recorded.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::Poisoned`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, DedupError> {
        Ok(self.len()? == 0)
    }
}

impl DedupStore for InMemoryDedupStore {
    fn exists(&self, digest: &ContentDigest) -> Result<bool, DedupError> {
        Ok(lock(&self.seen)?.contains(digest))
    }

    fn record(&self, digest: &ContentDigest) -> Result<(), DedupError> {
        lock(&self.seen)?.insert(*digest);
        Ok(())
    }

    fn check_and_record(&self, digest: &ContentDigest) -> Result<bool, DedupError> {
        Ok(lock(&self.seen)?.insert(*digest))
    }
}

/// Append-only ledger file with one hex digest per line.
///
/// The ledger is loaded once on open; records are appended to the file and
/// mirrored in memory.
#[derive(Debug)]
pub struct FileDedupStore {
    path: PathBuf,
    seen: Mutex<HashSet<ContentDigest>>,
}

impl FileDedupStore {
    /// Opens the ledger at `path`. A missing file is an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or holds a
    /// malformed line.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DedupError> {
        let path = path.into();
        let seen = match std::fs::read_to_string(&path) {
            Ok(content) => parse_ledger(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(source) => return Err(DedupError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), entries = seen.len(), "opened dedup ledger");
        Ok(Self {
            path,
            seen: Mutex::new(seen),
        })
    }

    /// Ledger location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, digest: &ContentDigest) -> Result<(), DedupError> {
        let io_err = |source| DedupError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        writeln!(file, "{digest}").map_err(io_err)
    }
}

impl DedupStore for FileDedupStore {
    fn exists(&self, digest: &ContentDigest) -> Result<bool, DedupError> {
        Ok(lock(&self.seen)?.contains(digest))
    }

    fn record(&self, digest: &ContentDigest) -> Result<(), DedupError> {
        self.check_and_record(digest).map(|_| ())
    }

    fn check_and_record(&self, digest: &ContentDigest) -> Result<bool, DedupError> {
        let mut seen = lock(&self.seen)?;
        if seen.contains(digest) {
            return Ok(false);
        }
        self.append(digest)?;
        seen.insert(*digest);
        Ok(true)
    }
}

fn parse_ledger(content: &str) -> Result<HashSet<ContentDigest>, DedupError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.trim().parse().map_err(|_| DedupError::Malformed {
                line: i + 1,
                value: line.to_string(),
            })
        })
        .collect()
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, DedupError> {
    mutex.lock().map_err(|_| DedupError::Poisoned)
}
