//! Language-pool proof of contribution.
//!
//! Validates a single submitted text document against the acceptance
//! criteria of a contribution pool restricted to one language, and assembles
//! a scored [`ProofRecord`].
//!
//! # Checks
//!
//! | Dimension | Criterion |
//! |-----------|-----------|
//! | Authenticity | Detected language equals the target language |
//! | Quality | Length in code points within `[min_length, max_length]` |
//! | Uniqueness | Content digest not present in the [`DedupStore`] |
//! | Ownership | Assumed once the checks run |
//!
//! # Entry Point
//!
//! ```no_run
//! use langproof::{generate, ProofConfig};
//!
//! let config = ProofConfig::new("hindi-pool", "/input").expect("valid config");
//! let proof = generate(&config).expect("proof generation failed");
//! println!("valid: {}", proof.is_valid());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod dedup;
pub mod error;
pub mod locator;
pub mod report;
pub mod validators;

pub use config::{ProofConfig, Thresholds};
pub use dedup::{DedupStore, FileDedupStore, InMemoryDedupStore, NoDedupStore};
pub use error::{ConfigError, DedupError, ProofError};
pub use report::{CheckResult, ProofAttributes, ProofRecord, ProofVerdicts, Severity};
pub use validators::authenticity::{DetectedLanguage, LanguageDetector, WhatlangDetector};
pub use validators::uniqueness::ContentDigest;

use locator::Located;

/// Runs the proof pipeline against one configuration.
///
/// The engine holds no per-run state; calling [`ProofEngine::generate`]
/// repeatedly over the same input yields identical records.
pub struct ProofEngine<'a> {
    config: &'a ProofConfig,
    detector: Box<dyn LanguageDetector + 'a>,
    dedup: Box<dyn DedupStore + 'a>,
}

impl<'a> ProofEngine<'a> {
    /// Creates an engine using [`WhatlangDetector`] and [`NoDedupStore`].
    pub fn new(config: &'a ProofConfig) -> Self {
        Self {
            config,
            detector: Box::new(WhatlangDetector::new()),
            dedup: Box::new(NoDedupStore),
        }
    }

    /// Replaces the language detector.
    pub fn with_detector(mut self, detector: impl LanguageDetector + 'a) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Replaces the duplicate-detection store.
    pub fn with_dedup_store(mut self, store: impl DedupStore + 'a) -> Self {
        self.dedup = Box::new(store);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &ProofConfig {
        self.config
    }

    /// Locates the document, runs the checks, and assembles the proof.
    ///
    /// A missing document yields a negative record rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the input directory or document cannot be read,
    /// more than one document is present, or the dedup store fails.
    pub fn generate(&self) -> Result<ProofRecord, ProofError> {
        let config = self.config;
        tracing::info!(
            pool_id = %config.pool_id,
            input = %config.input_directory.display(),
            "starting proof generation"
        );

        let document = match locator::locate(&config.input_directory, &config.metadata_suffix)? {
            Located::Document(document) => document,
            Located::NotFound => {
                tracing::warn!(
                    input = %config.input_directory.display(),
                    "no document found in input directory"
                );
                return Ok(ProofRecord::rejected_no_input(config.pool_id.as_str()));
            }
        };

        let verdicts = self.evaluate(&document.content)?;
        let proof = ProofRecord::scored(config.pool_id.as_str(), &verdicts);

        tracing::info!(
            pool_id = %config.pool_id,
            valid = proof.is_valid(),
            score = proof.score(),
            "proof generated"
        );
        Ok(proof)
    }

    /// Runs the three checks over already-loaded text.
    ///
    /// # Errors
    ///
    /// Returns an error if the dedup store fails.
    pub fn evaluate(&self, text: &str) -> Result<ProofVerdicts, ProofError> {
        let thresholds = &self.config.thresholds;

        let authenticity = validators::authenticity::validate(
            text,
            &thresholds.target_language_code,
            self.detector.as_ref(),
        );
        tracing::debug!(
            language = %authenticity.language,
            passed = authenticity.passed,
            "authenticity checked"
        );

        let quality = validators::quality::validate(text, thresholds);
        tracing::debug!(length = quality.length, passed = quality.passed, "quality checked");

        let uniqueness = validators::uniqueness::validate(text, self.dedup.as_ref())?;
        tracing::debug!(digest = %uniqueness.digest, passed = uniqueness.passed, "uniqueness checked");

        Ok(ProofVerdicts {
            authenticity,
            quality,
            uniqueness,
        })
    }
}

/// Generates a proof with the default detector and no dedup index.
///
/// # Errors
///
/// See [`ProofEngine::generate`].
pub fn generate(config: &ProofConfig) -> Result<ProofRecord, ProofError> {
    ProofEngine::new(config).generate()
}
