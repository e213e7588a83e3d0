//! `langproof` — Generates a proof of contribution for one submitted document.
//!
//! Reads the document from the input directory, validates it against the
//! pool's language and length criteria, and writes the proof to
//! `<output-dir>/results.json`.
//!
//! **Usage:**
//! ```text
//! langproof [--config <file>] [--pool-id <id>] [--input-dir <path>] [--output-dir <path>]
//!           [--min-length <n>] [--max-length <n>] [--target-language <code>]
//!           [--dedup-ledger <file>] [--fail-on-invalid]
//! ```
//!
//! Logging is controlled by `LANGPROOF_LOG` (default `langproof=info`).

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Once;

use anyhow::{Context, Result};
use clap::Parser;
use langproof::config::DEFAULT_METADATA_SUFFIX;
use langproof::{
    DedupStore, FileDedupStore, ProofConfig, ProofEngine, ProofRecord, Severity, Thresholds,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File the proof is written to inside the output directory.
const RESULTS_FILE: &str = "results.json";

/// Generate a proof of contribution for a submitted text document.
#[derive(Parser)]
#[command(
    name = "langproof",
    about = "Validate a submitted document and write a scored proof"
)]
struct Args {
    /// TOML configuration file; flags below override its values.
    #[arg(long, env = "LANGPROOF_CONFIG")]
    config: Option<PathBuf>,

    /// Contribution pool identifier.
    #[arg(long, env = "POOL_ID")]
    pool_id: Option<String>,

    /// Directory holding the submitted document.
    #[arg(long, env = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Directory the proof is written to.
    #[arg(long, env = "OUTPUT_DIR", default_value = "/output")]
    output_dir: PathBuf,

    /// Inclusive lower bound on document length, in characters.
    #[arg(long)]
    min_length: Option<usize>,

    /// Inclusive upper bound on document length, in characters.
    #[arg(long)]
    max_length: Option<usize>,

    /// ISO 639 code the document must be written in.
    #[arg(long)]
    target_language: Option<String>,

    /// Ledger of previously accepted content digests.
    #[arg(long, env = "DEDUP_LEDGER")]
    dedup_ledger: Option<PathBuf>,

    /// Exit non-zero when the proof is invalid.
    #[arg(long)]
    fail_on_invalid: bool,
}

static INIT: Once = Once::new();

/// Installs the stderr tracing subscriber once per process.
fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("LANGPROOF_LOG")
            .unwrap_or_else(|_| EnvFilter::new("langproof=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}

/// Merges the config file (if any) with command-line overrides.
fn resolve_config(args: &Args) -> Result<ProofConfig> {
    let file = match &args.config {
        Some(path) => Some(
            ProofConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
        ),
        None => None,
    };

    let (pool_id, input_dir, base) = match file {
        Some(config) => (
            Some(config.pool_id),
            Some(config.input_directory),
            (config.thresholds, config.metadata_suffix),
        ),
        None => (
            None,
            None,
            (Thresholds::default(), DEFAULT_METADATA_SUFFIX.to_string()),
        ),
    };
    let (base_thresholds, metadata_suffix) = base;

    let pool_id = args
        .pool_id
        .clone()
        .or(pool_id)
        .context("pool id is required (--pool-id, POOL_ID, or pool_id in the config file)")?;
    let input_dir = args
        .input_dir
        .clone()
        .or(input_dir)
        .unwrap_or_else(|| PathBuf::from("/input"));

    let thresholds = Thresholds {
        min_length: args.min_length.unwrap_or(base_thresholds.min_length),
        max_length: args.max_length.unwrap_or(base_thresholds.max_length),
        target_language_code: args
            .target_language
            .clone()
            .unwrap_or(base_thresholds.target_language_code),
    };

    let config = ProofConfig::new(pool_id, input_dir)?
        .with_thresholds(thresholds)?
        .with_metadata_suffix(metadata_suffix)?;
    Ok(config)
}

fn print_summary(proof: &ProofRecord) {
    println!("Proof of Contribution — pool {}", proof.pool_id());
    println!("================================");
    println!();

    for check in proof.checks() {
        let status = match check.severity {
            Severity::Pass => "PASS",
            Severity::Failure => "FAIL",
        };
        println!("[{}] {} — {}", status, check.check, check.message);
    }

    println!();
    println!(
        "Scores: ownership {:.1}, authenticity {:.1}, quality {:.1}, uniqueness {:.1}",
        proof.ownership(),
        proof.authenticity(),
        proof.quality(),
        proof.uniqueness()
    );
    println!(
        "Proof {} (score {:.1}).",
        if proof.is_valid() { "VALID" } else { "INVALID" },
        proof.score()
    );
}

/// Writes `proof` to `<output_dir>/results.json`.
fn write_proof(output_dir: &Path, proof: &ProofRecord) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;
    let out_path = output_dir.join(RESULTS_FILE);
    std::fs::write(&out_path, proof.to_json_pretty()?)
        .with_context(|| format!("writing {}", out_path.display()))?;
    tracing::info!(path = %out_path.display(), "proof written");
    Ok(out_path)
}

/// Records the digest of a valid, already written proof in the ledger.
///
/// If the digest was recorded by another submission since `proof` was
/// scored, the proof is regenerated against the ledger and rewritten, so the
/// returned record fails uniqueness.
fn record_accepted(
    engine: &ProofEngine<'_>,
    ledger: &FileDedupStore,
    proof: ProofRecord,
    output_dir: &Path,
) -> Result<ProofRecord> {
    let digest = match proof.content_digest() {
        Some(digest) if proof.is_valid() => *digest,
        _ => return Ok(proof),
    };

    if ledger
        .check_and_record(&digest)
        .context("recording accepted digest")?
    {
        tracing::info!(%digest, ledger = %ledger.path().display(), "recorded accepted digest");
        return Ok(proof);
    }

    tracing::warn!(%digest, "digest already recorded by another submission, rescoring");
    let proof = engine.generate().context("rescoring proof")?;
    write_proof(output_dir, &proof)?;
    Ok(proof)
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = resolve_config(&args)?;

    let ledger = args
        .dedup_ledger
        .as_ref()
        .map(FileDedupStore::open)
        .transpose()
        .context("opening dedup ledger")?;

    let mut engine = ProofEngine::new(&config);
    if let Some(ledger) = &ledger {
        engine = engine.with_dedup_store(ledger);
    }
    let mut proof = engine.generate().context("generating proof")?;

    // The ledger is only touched once the proof is on disk.
    write_proof(&args.output_dir, &proof)?;
    if let Some(ledger) = &ledger {
        proof = record_accepted(&engine, ledger, proof, &args.output_dir)?;
    }

    print_summary(&proof);

    if args.fail_on_invalid && !proof.is_valid() {
        eprintln!("Proof INVALID: submission did not meet the pool criteria.");
        process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use langproof::LanguageDetector;

    struct Hindi;

    impl LanguageDetector for Hindi {
        fn detect(&self, _text: &str) -> Option<String> {
            Some("hi".to_string())
        }
    }

    #[test]
    fn losing_the_ledger_race_rewrites_proof_as_duplicate() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let input = tmp.path().join("input");
        let output = tmp.path().join("output");
        std::fs::create_dir_all(&input).expect("create input dir");
        std::fs::write(input.join("doc.txt"), "नमस्ते दुनिया").expect("write document");

        let config = ProofConfig::new("pool", &input)
            .expect("valid config")
            .with_thresholds(Thresholds {
                min_length: 1,
                max_length: 100,
                target_language_code: "hi".into(),
            })
            .expect("valid thresholds");
        let ledger = FileDedupStore::open(tmp.path().join("ledger.txt")).expect("open ledger");
        let engine = ProofEngine::new(&config)
            .with_detector(Hindi)
            .with_dedup_store(&ledger);

        let proof = engine.generate().expect("generate");
        assert!(proof.is_valid());
        write_proof(&output, &proof).expect("write proof");

        // Another submission of the same content wins the ledger first.
        let digest = *proof.content_digest().expect("digest");
        ledger.record(&digest).expect("record");

        let proof = record_accepted(&engine, &ledger, proof, &output).expect("record accepted");
        assert!(!proof.is_valid());
        assert_eq!(proof.uniqueness(), 0.0);

        let written = std::fs::read_to_string(output.join(RESULTS_FILE)).expect("read results");
        assert!(written.contains("\"is_unique\": false"));
        assert!(written.contains("\"valid\": false"));
    }

    #[test]
    fn first_recording_keeps_the_written_proof() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let input = tmp.path().join("input");
        std::fs::create_dir_all(&input).expect("create input dir");
        std::fs::write(input.join("doc.txt"), "नमस्ते दुनिया").expect("write document");

        let config = ProofConfig::new("pool", &input)
            .expect("valid config")
            .with_thresholds(Thresholds {
                min_length: 1,
                max_length: 100,
                target_language_code: "hi".into(),
            })
            .expect("valid thresholds");
        let ledger = FileDedupStore::open(tmp.path().join("ledger.txt")).expect("open ledger");
        let engine = ProofEngine::new(&config)
            .with_detector(Hindi)
            .with_dedup_store(&ledger);

        let proof = engine.generate().expect("generate");
        let digest = *proof.content_digest().expect("digest");
        let kept = record_accepted(&engine, &ledger, proof.clone(), tmp.path()).expect("record");
        assert_eq!(kept, proof);
        assert!(ledger.exists(&digest).expect("exists"));
    }
}
