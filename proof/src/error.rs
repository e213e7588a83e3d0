//! Error types for proof generation.
//!
//! A check that merely fails is not an error: it lands in the
//! [`ProofRecord`](crate::ProofRecord) as a zero score. Only conditions that
//! make the checks impossible to attempt are reported here.

use std::path::PathBuf;

/// Unrecoverable failures raised while generating a proof.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    /// The input directory could not be enumerated.
    #[error("failed to read input directory {path}: {source}")]
    ReadDir {
        /// Directory being scanned.
        path: PathBuf,
        /// Underlying traversal error.
        #[source]
        source: walkdir::Error,
    },

    /// The selected input document could not be read.
    #[error("failed to read input document {path}: {source}")]
    ReadFile {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The selected input document is not valid UTF-8 text.
    #[error("input document {path} is not valid UTF-8: {source}")]
    Decode {
        /// Document path.
        path: PathBuf,
        /// Underlying decoding error.
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// More than one qualifying document was found in the input directory.
    #[error("expected exactly one input document, found {}: {}", .candidates.len(), display_paths(.candidates))]
    AmbiguousInput {
        /// Every qualifying candidate, in enumeration order.
        candidates: Vec<PathBuf>,
    },

    /// The duplicate-detection store failed.
    #[error(transparent)]
    Dedup(#[from] DedupError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration loading and validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `pool_id` is empty.
    #[error("pool_id must not be empty")]
    MissingPoolId,

    /// `input_directory` is empty.
    #[error("input_directory must not be empty")]
    MissingInputDirectory,

    /// Length bounds are inverted or degenerate.
    #[error("invalid length bounds: min_length {min_length} / max_length {max_length}")]
    InvalidBounds {
        /// Configured lower bound.
        min_length: usize,
        /// Configured upper bound.
        max_length: usize,
    },

    /// The target language is not a 2- or 3-letter lowercase ISO 639 code.
    #[error("invalid target language code {code:?}: expected a 2- or 3-letter lowercase ISO 639 code")]
    InvalidLanguageCode {
        /// Offending code.
        code: String,
    },

    /// The metadata sidecar suffix is empty.
    #[error("metadata_suffix must not be empty")]
    MissingMetadataSuffix,
}

/// Duplicate-detection store failures.
#[derive(Debug, thiserror::Error)]
pub enum DedupError {
    /// Reading or appending to the ledger failed.
    #[error("dedup ledger I/O failed for {path}: {source}")]
    Io {
        /// Ledger path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A ledger line is not a 64-character hex digest.
    #[error("malformed digest on ledger line {line}: {value:?}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Offending content.
        value: String,
    },

    /// The store's internal lock was poisoned by a panicking writer.
    #[error("dedup store lock poisoned")]
    Poisoned,
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
