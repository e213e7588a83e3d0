//! Shared fixtures for proof pipeline integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use langproof::{LanguageDetector, ProofConfig};
use tempfile::TempDir;

/// Deterministic detector: Devanagari-dominant text is Hindi, other
/// alphabetic text is English, anything else is undecided.
pub struct ScriptDetector;

impl LanguageDetector for ScriptDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            return None;
        }
        let devanagari = letters
            .iter()
            .filter(|c| ('\u{0900}'..='\u{097F}').contains(*c))
            .count();
        Some(if devanagari * 2 > letters.len() { "hi" } else { "en" }.to_string())
    }
}

/// An input directory populated for one run.
pub struct InputDir {
    pub dir: TempDir,
}

impl InputDir {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create input dir"),
        }
    }

    pub fn with_document(content: &str) -> Self {
        let input = Self::empty();
        input.write("submission.txt", content);
        input.write("submission.json", r#"{"source":"upload"}"#);
        input
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join(name), content).expect("write fixture");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> ProofConfig {
        ProofConfig::new("hindi-pool", self.path()).expect("valid config")
    }
}

/// Hindi text of exactly `chars` code points, built from whole words.
pub fn hindi_text(chars: usize) -> String {
    let base = "भारत की भाषाएँ और संस्कृति बहुत समृद्ध है ";
    let text: String = base.chars().cycle().take(chars).collect();
    assert_eq!(text.chars().count(), chars);
    text
}

pub const ENGLISH_SAMPLE: &str =
    "Hello, this is a test document used for validation purposes only, nothing more.";
