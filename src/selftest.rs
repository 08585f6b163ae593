//! Reference self-test
//!
//! Loads every sample under `<root>/<version>/samples/`, re-serializes it to
//! a `reference-<version>-<sample>.rh` file beside it and reloads that file.
//! A sample passes when the reloaded record equals the loaded one. When a
//! reference file already existed, its previous text is compared with the
//! regenerated text to detect format drift.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::{RhError, RhResult};
use crate::observability::Event;
use crate::record::{RecordCodec, DEFAULT_EXTENSION};
use crate::schema::FORMAT_VERSION;

const REFERENCE_PREFIX: &str = "reference-";

/// Result for one sample file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleOutcome {
    pub sample: PathBuf,
    pub reference: PathBuf,
    /// Reloaded reference equals the loaded sample
    pub round_trip: bool,
    /// Previous reference text differed from the regenerated text;
    /// `None` when there was no previous reference
    pub drift: Option<bool>,
}

impl SampleOutcome {
    pub fn passed(&self) -> bool {
        self.round_trip && self.drift != Some(true)
    }
}

/// Result of one self-test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelfTestReport {
    pub version: String,
    pub outcomes: Vec<SampleOutcome>,
}

impl SelfTestReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(SampleOutcome::passed)
    }
}

/// Directory holding the samples of `version`
pub fn samples_dir(root: &Path, version: &str) -> PathBuf {
    root.join(version).join("samples")
}

/// Sample files under `dir`, sorted, excluding generated references
fn list_samples(dir: &Path) -> RhResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| RhError::io(dir, e))?;

    let mut samples = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| RhError::io(dir, e))?.path();
        let is_record = path.extension().map_or(false, |ext| ext == DEFAULT_EXTENSION);
        let is_reference = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| name.starts_with(REFERENCE_PREFIX));
        if path.is_file() && is_record && !is_reference {
            samples.push(path);
        }
    }
    samples.sort();
    Ok(samples)
}

fn reference_path(sample: &Path, version: &str) -> PathBuf {
    let stem = sample
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    sample.with_file_name(format!(
        "{}{}-{}.{}",
        REFERENCE_PREFIX, version, stem, DEFAULT_EXTENSION
    ))
}

/// Runs the self-test for the current format version under `root`.
///
/// # Errors
///
/// `RhError::NotFound` when the samples directory is missing; any load or
/// save error of a sample is returned as is.
pub fn run_self_test(codec: &RecordCodec, root: &Path) -> RhResult<SelfTestReport> {
    let dir = samples_dir(root, FORMAT_VERSION);
    if !dir.is_dir() {
        return Err(RhError::NotFound(dir));
    }

    info!(event = %Event::SelfTestStart, dir = %dir.display(), version = FORMAT_VERSION);

    let mut outcomes = Vec::new();
    for sample in list_samples(&dir)? {
        let record = codec.load(&sample)?;
        let reference = reference_path(&sample, FORMAT_VERSION);

        let previous = match fs::read_to_string(&reference) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(RhError::io(&reference, e)),
        };
        let text = codec.to_text(&record)?;
        let drift = previous.map(|prev| prev != text);
        if drift == Some(true) {
            warn!(
                event = %Event::SelfTestDrift,
                sample = %sample.display(),
                reference = %reference.display(),
                "reference output changed"
            );
        }

        let written = codec.save(&record, &reference)?;
        info!(event = %Event::SelfTestReferenceWritten, path = %written.display());

        let round_trip = codec.load(&written)? == record;

        outcomes.push(SampleOutcome {
            sample,
            reference: written,
            round_trip,
            drift,
        });
    }

    let report = SelfTestReport {
        version: FORMAT_VERSION.to_string(),
        outcomes,
    };
    info!(
        event = %Event::SelfTestComplete,
        samples = report.outcomes.len(),
        passed = report.passed()
    );
    Ok(report)
}
