//! Proof configuration: pool identity, input location, and validation thresholds.
//!
//! A configuration is immutable for the duration of a run. Every constructor
//! validates before returning, so a [`ProofConfig`] in hand is always usable.
//!
//! # File format
//!
//! ```toml
//! pool_id = "hindi-pool"
//! input_directory = "/input"
//!
//! [thresholds]
//! min_length = 50
//! max_length = 5000
//! target_language_code = "hi"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Default inclusive lower bound on document length, in characters.
pub const DEFAULT_MIN_LENGTH: usize = 50;

/// Default inclusive upper bound on document length, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 5000;

/// Default target language (ISO 639-1).
pub const DEFAULT_TARGET_LANGUAGE: &str = "hi";

/// Default suffix identifying metadata sidecar files in the input directory.
pub const DEFAULT_METADATA_SUFFIX: &str = ".json";

/// Validation thresholds applied to the located document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    /// Inclusive lower bound on length in Unicode code points.
    pub min_length: usize,
    /// Inclusive upper bound on length in Unicode code points.
    pub max_length: usize,
    /// ISO 639 code the document must be written in.
    pub target_language_code: String,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            target_language_code: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

impl Thresholds {
    /// Checks that the bounds are ordered and the language code is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBounds`] or [`ConfigError::InvalidLanguageCode`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_length == 0 || self.min_length > self.max_length {
            return Err(ConfigError::InvalidBounds {
                min_length: self.min_length,
                max_length: self.max_length,
            });
        }
        let code = &self.target_language_code;
        if !(2..=3).contains(&code.len()) || !code.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(ConfigError::InvalidLanguageCode { code: code.clone() });
        }
        Ok(())
    }
}

/// Configuration for a single proof run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProofConfig {
    /// Identifier of the contribution pool the proof is scoped to.
    #[serde(alias = "dlp_id")]
    pub pool_id: String,
    /// Directory holding the submitted document and its sidecars.
    #[serde(alias = "input_dir")]
    pub input_directory: PathBuf,
    /// Validation thresholds.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// File-name suffix of metadata sidecars, which are never validated.
    #[serde(default = "default_metadata_suffix")]
    pub metadata_suffix: String,
}

fn default_metadata_suffix() -> String {
    DEFAULT_METADATA_SUFFIX.to_string()
}

impl ProofConfig {
    /// Creates a configuration with default thresholds.
    ///
    /// # Errors
    ///
    /// Returns an error if `pool_id` or `input_directory` is empty.
    pub fn new(
        pool_id: impl Into<String>,
        input_directory: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            pool_id: pool_id.into(),
            input_directory: input_directory.into(),
            thresholds: Thresholds::default(),
            metadata_suffix: default_metadata_suffix(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replaces the thresholds.
    ///
    /// # Errors
    ///
    /// Returns an error if the new thresholds are invalid.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(self)
    }

    /// Replaces the metadata sidecar suffix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingMetadataSuffix`] if `suffix` is empty.
    pub fn with_metadata_suffix(mut self, suffix: impl Into<String>) -> Result<Self, ConfigError> {
        let suffix = suffix.into();
        if suffix.is_empty() {
            return Err(ConfigError::MissingMetadataSuffix);
        }
        self.metadata_suffix = suffix;
        Ok(self)
    }

    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or fails validation.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Validates every field.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_id.trim().is_empty() {
            return Err(ConfigError::MissingPoolId);
        }
        if self.input_directory.as_os_str().is_empty() {
            return Err(ConfigError::MissingInputDirectory);
        }
        if self.metadata_suffix.is_empty() {
            return Err(ConfigError::MissingMetadataSuffix);
        }
        self.thresholds.validate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pool_policy() {
        let config = ProofConfig::new("pool-1", "/input").expect("valid config");
        assert_eq!(config.thresholds.min_length, 50);
        assert_eq!(config.thresholds.max_length, 5000);
        assert_eq!(config.thresholds.target_language_code, "hi");
        assert_eq!(config.metadata_suffix, ".json");
    }

    #[test]
    fn parses_full_toml() {
        let config = ProofConfig::from_toml_str(
            r#"
            pool_id = "tamil-pool"
            input_directory = "/data/in"
            metadata_suffix = ".meta"

            [thresholds]
            min_length = 10
            max_length = 200
            target_language_code = "ta"
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.pool_id, "tamil-pool");
        assert_eq!(config.input_directory, PathBuf::from("/data/in"));
        assert_eq!(config.metadata_suffix, ".meta");
        assert_eq!(
            config.thresholds,
            Thresholds {
                min_length: 10,
                max_length: 200,
                target_language_code: "ta".to_string(),
            }
        );
    }

    #[test]
    fn partial_thresholds_fall_back_to_defaults() {
        let config = ProofConfig::from_toml_str(
            r#"
            pool_id = "p"
            input_directory = "in"
            [thresholds]
            max_length = 900
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.thresholds.min_length, DEFAULT_MIN_LENGTH);
        assert_eq!(config.thresholds.max_length, 900);
        assert_eq!(config.thresholds.target_language_code, "hi");
    }

    #[test]
    fn accepts_legacy_dlp_id_key() {
        let config = ProofConfig::from_toml_str("dlp_id = \"42\"\ninput_dir = \"/input\"\n")
            .expect("valid toml");
        assert_eq!(config.pool_id, "42");
        assert_eq!(config.input_directory, PathBuf::from("/input"));
    }

    #[test]
    fn rejects_missing_pool_id() {
        let err = ProofConfig::new("  ", "/input").unwrap_err();
        assert!(matches!(err, ConfigError::MissingPoolId));
    }

    #[test]
    fn rejects_empty_input_directory() {
        let err = ProofConfig::new("p", "").unwrap_err();
        assert!(matches!(err, ConfigError::MissingInputDirectory));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = ProofConfig::from_toml_str(
            "pool_id = \"p\"\ninput_directory = \"in\"\n[thresholds]\nmin_length = 10\nmax_length = 5\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidBounds {
                min_length: 10,
                max_length: 5
            }
        ));
    }

    #[test]
    fn rejects_zero_max_length() {
        let thresholds = Thresholds {
            min_length: 0,
            max_length: 0,
            ..Thresholds::default()
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn equal_bounds_are_allowed() {
        let thresholds = Thresholds {
            min_length: 7,
            max_length: 7,
            ..Thresholds::default()
        };
        assert!(thresholds.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_language_codes() {
        for code in ["", "h", "HI", "hind", "h1", "ह"] {
            let thresholds = Thresholds {
                target_language_code: code.to_string(),
                ..Thresholds::default()
            };
            assert!(
                matches!(
                    thresholds.validate(),
                    Err(ConfigError::InvalidLanguageCode { .. })
                ),
                "code {code:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_unknown_keys() {
        let err =
            ProofConfig::from_toml_str("pool_id = \"p\"\ninput_directory = \"in\"\nmin_len = 3\n")
                .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_empty_metadata_suffix() {
        let config = ProofConfig::new("p", "in").expect("valid config");
        assert!(matches!(
            config.with_metadata_suffix(""),
            Err(ConfigError::MissingMetadataSuffix)
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ProofConfig::load(Path::new("/nonexistent/langproof.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
