//! Proof record types: the scored verdict, its diagnostics, and per-check summaries.
//!
//! A [`ProofRecord`] is produced once per run by one of two constructors,
//! matching the two terminal states of the pipeline:
//!
//! - [`ProofRecord::rejected_no_input`]: no document was found.
//! - [`ProofRecord::scored`]: all checks ran.
//!
//! There is no mutation API; the invariants `score == 1.0 ⟺ valid` and
//! `valid ⟺ authenticity ∧ quality ∧ uniqueness` hold by construction.

use serde::Serialize;

use crate::validators::authenticity::{AuthenticityVerdict, DetectedLanguage};
use crate::validators::quality::QualityVerdict;
use crate::validators::uniqueness::{ContentDigest, UniquenessVerdict};

/// Error recorded when the input directory holds no document.
pub const NO_INPUT_ERROR: &str = "no file found for validation";

/// Verdicts of the three independent checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofVerdicts {
    /// Language check.
    pub authenticity: AuthenticityVerdict,
    /// Length check.
    pub quality: QualityVerdict,
    /// Duplicate check.
    pub uniqueness: UniquenessVerdict,
}

impl ProofVerdicts {
    /// True iff every check passed.
    pub fn all_passed(&self) -> bool {
        self.authenticity.passed && self.quality.passed && self.uniqueness.passed
    }
}

/// Diagnostics of a fully scored proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredAttributes {
    /// Detected language code, or `detection_failed`.
    pub language_detected: DetectedLanguage,
    /// Whether the detected language equals the target.
    pub is_target_language: bool,
    /// Required language code.
    pub target_language: String,
    /// Length in Unicode code points.
    pub content_length: usize,
    /// Whether the length is within bounds.
    pub is_good_length: bool,
    /// SHA-256 of the content, lowercase hex.
    pub content_hash: ContentDigest,
    /// Whether the content hash was unseen.
    pub is_unique: bool,
    /// Inclusive lower length bound.
    pub min_length_required: usize,
    /// Inclusive upper length bound.
    pub max_length_allowed: usize,
}

/// Diagnostics of a proof rejected before any check ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedAttributes {
    /// Why no check ran.
    pub error: String,
}

/// Diagnostic attributes attached to a proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProofAttributes {
    /// All checks ran.
    Scored(ScoredAttributes),
    /// The pipeline stopped before the checks.
    Rejected(RejectedAttributes),
}

/// Proof metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofMetadata {
    /// Pool the proof is scoped to.
    pub pool_id: String,
}

/// Scored attestation for one submitted document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProofRecord {
    pool_id: String,
    valid: bool,
    score: f64,
    ownership: f64,
    authenticity: f64,
    quality: f64,
    uniqueness: f64,
    attributes: ProofAttributes,
    metadata: ProofMetadata,
}

fn unit(passed: bool) -> f64 {
    if passed {
        1.0
    } else {
        0.0
    }
}

impl ProofRecord {
    /// Builds the negative record for an input directory with no document.
    pub fn rejected_no_input(pool_id: impl Into<String>) -> Self {
        let pool_id = pool_id.into();
        Self {
            metadata: ProofMetadata {
                pool_id: pool_id.clone(),
            },
            pool_id,
            valid: false,
            score: 0.0,
            ownership: 0.0,
            authenticity: 0.0,
            quality: 0.0,
            uniqueness: 0.0,
            attributes: ProofAttributes::Rejected(RejectedAttributes {
                error: NO_INPUT_ERROR.to_string(),
            }),
        }
    }

    /// Builds the scored record from the three check verdicts.
    ///
    /// Ownership is not evaluated; it is 1.0 for every scored record.
    pub fn scored(pool_id: impl Into<String>, verdicts: &ProofVerdicts) -> Self {
        let pool_id = pool_id.into();
        let valid = verdicts.all_passed();
        let ProofVerdicts {
            authenticity,
            quality,
            uniqueness,
        } = verdicts;

        Self {
            metadata: ProofMetadata {
                pool_id: pool_id.clone(),
            },
            pool_id,
            valid,
            score: unit(valid),
            ownership: 1.0,
            authenticity: unit(authenticity.passed),
            quality: unit(quality.passed),
            uniqueness: unit(uniqueness.passed),
            attributes: ProofAttributes::Scored(ScoredAttributes {
                language_detected: authenticity.language.clone(),
                is_target_language: authenticity.passed,
                target_language: authenticity.target.clone(),
                content_length: quality.length,
                is_good_length: quality.passed,
                content_hash: uniqueness.digest,
                is_unique: uniqueness.passed,
                min_length_required: quality.min_length,
                max_length_allowed: quality.max_length,
            }),
        }
    }

    /// Pool identifier.
    pub fn pool_id(&self) -> &str {
        &self.pool_id
    }

    /// True iff every check passed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Aggregate score: 1.0 if valid, otherwise 0.0.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Ownership score.
    pub fn ownership(&self) -> f64 {
        self.ownership
    }

    /// Authenticity score.
    pub fn authenticity(&self) -> f64 {
        self.authenticity
    }

    /// Quality score.
    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Uniqueness score.
    pub fn uniqueness(&self) -> f64 {
        self.uniqueness
    }

    /// Diagnostic attributes.
    pub fn attributes(&self) -> &ProofAttributes {
        &self.attributes
    }

    /// Metadata.
    pub fn metadata(&self) -> &ProofMetadata {
        &self.metadata
    }

    /// Content digest, if the checks ran.
    pub fn content_digest(&self) -> Option<&ContentDigest> {
        match &self.attributes {
            ProofAttributes::Scored(attrs) => Some(&attrs.content_hash),
            ProofAttributes::Rejected(_) => None,
        }
    }

    /// Rejection reason, if the checks did not run.
    pub fn error(&self) -> Option<&str> {
        match &self.attributes {
            ProofAttributes::Scored(_) => None,
            ProofAttributes::Rejected(attrs) => Some(&attrs.error),
        }
    }

    /// Serializes the record as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Summarizes each dimension as a check result, in pipeline order.
    pub fn checks(&self) -> Vec<CheckResult> {
        let attrs = match &self.attributes {
            ProofAttributes::Scored(attrs) => attrs,
            ProofAttributes::Rejected(attrs) => {
                return vec![CheckResult::fail("input", attrs.error.clone())];
            }
        };

        vec![
            CheckResult::from_flag(
                "authenticity",
                attrs.is_target_language,
                format!(
                    "detected language {} (required {})",
                    attrs.language_detected, attrs.target_language
                ),
            ),
            CheckResult::from_flag(
                "quality",
                attrs.is_good_length,
                format!(
                    "{} characters (allowed {}..={})",
                    attrs.content_length, attrs.min_length_required, attrs.max_length_allowed
                ),
            ),
            CheckResult::from_flag(
                "uniqueness",
                attrs.is_unique,
                format!("content hash {}", attrs.content_hash),
            ),
            CheckResult::pass("ownership", "assumed for a scored submission"),
        ]
    }
}

/// Severity level of a check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The check passed.
    Pass,
    /// The check failed.
    Failure,
}

/// Human-readable outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Short identifier of the check.
    pub check: String,
    /// What was observed.
    pub message: String,
    /// Outcome.
    pub severity: Severity,
}

impl CheckResult {
    /// Creates a passing result.
    pub fn pass(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            severity: Severity::Pass,
        }
    }

    /// Creates a failure result.
    pub fn fail(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            severity: Severity::Failure,
        }
    }

    fn from_flag(check: &str, passed: bool, message: String) -> Self {
        if passed {
            Self::pass(check, message)
        } else {
            Self::fail(check, message)
        }
    }

    /// Returns true if this result represents a failure.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}
