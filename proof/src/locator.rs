//! Input document locator.
//!
//! Scans the top level of the input directory for the submitted document,
//! skipping metadata sidecars. Entries are visited in lexicographic file-name
//! order so the outcome does not depend on the platform's enumeration order.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ProofError;

/// The submitted document, fully read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    /// Path the document was read from.
    pub path: PathBuf,
    /// Full UTF-8 content.
    pub content: String,
}

/// Outcome of scanning the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// Exactly one qualifying document was found and read.
    Document(InputDocument),
    /// No qualifying document exists.
    NotFound,
}

/// Locates and reads the single non-metadata document in `directory`.
///
/// # Errors
///
/// Returns [`ProofError::ReadDir`] if the directory cannot be enumerated,
/// [`ProofError::AmbiguousInput`] if more than one candidate exists, and
/// [`ProofError::ReadFile`] / [`ProofError::Decode`] if the document cannot be
/// read as UTF-8 text.
pub fn locate(directory: &Path, metadata_suffix: &str) -> Result<Located, ProofError> {
    let candidates = candidates(directory, metadata_suffix)?;

    let path = match <[PathBuf; 1]>::try_from(candidates) {
        Ok([path]) => path,
        Err(candidates) if candidates.is_empty() => return Ok(Located::NotFound),
        Err(candidates) => return Err(ProofError::AmbiguousInput { candidates }),
    };

    let bytes = std::fs::read(&path).map_err(|source| ProofError::ReadFile {
        path: path.clone(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|source| ProofError::Decode {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "located input document");
    Ok(Located::Document(InputDocument { path, content }))
}

/// Lists qualifying document paths in lexicographic file-name order.
fn candidates(directory: &Path, metadata_suffix: &str) -> Result<Vec<PathBuf>, ProofError> {
    let mut found = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        // Only the directory itself is fatal; a broken entry is not a document.
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 => {
                tracing::warn!(
                    path = ?err.path(),
                    error = %err,
                    "skipping unreadable directory entry"
                );
                continue;
            }
            Err(source) => {
                return Err(ProofError::ReadDir {
                    path: directory.to_path_buf(),
                    source,
                })
            }
        };
        if entry.file_name().to_string_lossy().ends_with(metadata_suffix) {
            tracing::trace!(path = %entry.path().display(), "skipping metadata sidecar");
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        found.push(entry.into_path());
    }

    Ok(found)
}
