//! Authenticity validator: is the document written in the pool's language?
//!
//! Language identification is an opaque capability behind [`LanguageDetector`].
//! A detector that cannot classify the text is not an error; the verdict
//! records [`DetectedLanguage::DetectionFailed`] and fails.

use std::fmt;

use serde::{Serialize, Serializer};

/// Sentinel recorded when the detector cannot classify the text.
pub const DETECTION_FAILED: &str = "detection_failed";

/// Classifies the dominant language of a text.
pub trait LanguageDetector: Send + Sync {
    /// Returns the ISO 639 code of the dominant language, or `None` if the
    /// detector cannot decide.
    fn detect(&self, text: &str) -> Option<String>;
}

impl<T: LanguageDetector + ?Sized> LanguageDetector for &T {
    fn detect(&self, text: &str) -> Option<String> {
        (**self).detect(text)
    }
}

/// Language detector backed by the `whatlang` trigram models.
///
/// Codes are reported in ISO 639-1 where a two-letter code exists, otherwise
/// in the ISO 639-3 form `whatlang` uses.
#[derive(Debug, Clone, Default)]
pub struct WhatlangDetector {
    min_confidence: f64,
}

impl WhatlangDetector {
    /// Creates a detector that accepts any classification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Treats classifications below `min_confidence` (0.0–1.0) as undecided.
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        tracing::debug!(
            lang = info.lang().code(),
            confidence = info.confidence(),
            reliable = info.is_reliable(),
            "language classified"
        );
        if info.confidence() < self.min_confidence {
            return None;
        }
        Some(iso639_1(info.lang().code()).to_string())
    }
}

/// Maps a `whatlang` ISO 639-3 code to its ISO 639-1 equivalent.
fn iso639_1(code: &'static str) -> &'static str {
    match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        other => other,
    }
}

/// Language reported for the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedLanguage {
    /// The detector classified the text.
    Code(String),
    /// The detector could not classify the text.
    DetectionFailed,
}

impl DetectedLanguage {
    /// Returns the language code or the `detection_failed` sentinel.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Code(code) => code,
            Self::DetectionFailed => DETECTION_FAILED,
        }
    }
}

impl fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DetectedLanguage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of the authenticity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticityVerdict {
    /// Detected language.
    pub language: DetectedLanguage,
    /// Language the document was required to be in.
    pub target: String,
    /// True iff the detected language equals the target.
    pub passed: bool,
}

/// Classifies `text` and compares the result with `target`.
pub fn validate(text: &str, target: &str, detector: &dyn LanguageDetector) -> AuthenticityVerdict {
    let language = match detector.detect(text) {
        Some(code) => DetectedLanguage::Code(code),
        None => {
            tracing::warn!("language detection failed");
            DetectedLanguage::DetectionFailed
        }
    };
    let passed = matches!(&language, DetectedLanguage::Code(code) if code == target);

    AuthenticityVerdict {
        language,
        target: target.to_string(),
        passed,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);

    impl LanguageDetector for Fixed {
        fn detect(&self, _text: &str) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn matching_language_passes() {
        let verdict = validate("text", "hi", &Fixed(Some("hi")));
        assert!(verdict.passed);
        assert_eq!(verdict.language, DetectedLanguage::Code("hi".into()));
    }

    #[test]
    fn other_language_fails() {
        let verdict = validate("text", "hi", &Fixed(Some("en")));
        assert!(!verdict.passed);
        assert_eq!(verdict.language.as_str(), "en");
    }

    #[test]
    fn detector_failure_degrades_to_sentinel() {
        let verdict = validate("", "hi", &Fixed(None));
        assert!(!verdict.passed);
        assert_eq!(verdict.language, DetectedLanguage::DetectionFailed);
        assert_eq!(verdict.language.to_string(), "detection_failed");
    }

    #[test]
    fn sentinel_never_matches_a_target() {
        let verdict = validate("", DETECTION_FAILED, &Fixed(None));
        assert!(!verdict.passed);
    }

    #[test]
    fn whatlang_classifies_english() {
        let detector = WhatlangDetector::new();
        let code = detector.detect(
            "Hello, this is a test document used for validation purposes only, nothing more.",
        );
        assert_eq!(code.as_deref(), Some("en"));
    }

    #[test]
    fn whatlang_classifies_hindi() {
        let detector = WhatlangDetector::new();
        let code = detector.detect(
            "भारत एक विशाल देश है और इसकी संस्कृति बहुत पुरानी है। \
             यहाँ अनेक भाषाएँ बोली जाती हैं और लोग सभी त्योहार मिलकर मनाते हैं।",
        );
        assert_eq!(code.as_deref(), Some("hi"));
    }

    #[test]
    fn whatlang_gives_up_on_text_without_letters() {
        assert_eq!(WhatlangDetector::new().detect(""), None);
        assert_eq!(WhatlangDetector::new().detect("1234 5678 !!"), None);
    }

    #[test]
    fn confidence_floor_rejects_everything_at_one() {
        let detector = WhatlangDetector::new().with_min_confidence(1.1);
        assert_eq!(detector.min_confidence, 1.0);
    }

    #[test]
    fn maps_three_letter_codes() {
        assert_eq!(iso639_1("hin"), "hi");
        assert_eq!(iso639_1("eng"), "en");
        assert_eq!(iso639_1("xyz"), "xyz");
    }

    #[test]
    fn detected_language_serializes_as_string() {
        let json = serde_json::to_string(&DetectedLanguage::DetectionFailed).expect("serialize");
        assert_eq!(json, "\"detection_failed\"");
    }
}
