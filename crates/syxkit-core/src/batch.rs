//! Batch decoding over directories of SysEx files.
//!
//! Per-file failures are captured in the report and never abort the batch;
//! a directory with one corrupt dump still yields results for the rest.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::codec::decoder::SysexDecoder;
use crate::DEFAULT_GENERATED_AT;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Aggregate result of one batch run, in stable file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// RFC3339 timestamp of the batch run.
    pub generated_at: String,
    /// Successfully decoded inputs.
    pub processed: Vec<ProcessedFile>,
    /// Inputs that failed, with their error messages.
    pub failed: Vec<FailedFile>,
    /// Presets decoded across all processed files.
    pub total_presets: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedFile {
    pub input_file: String,
    pub preset_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFile {
    pub file: String,
    pub error: String,
}

/// Decode every `.syx` and `.json` file in `input_dir`.
///
/// With `write_outputs`, decoded presets are written as
/// `<stem>_decoded.json` next to each input; those outputs are excluded
/// from later runs over the same directory.
pub fn batch_decode(
    input_dir: &Path,
    decoder: &SysexDecoder<'_>,
    write_outputs: bool,
) -> Result<BatchReport, BatchError> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_batch_input(path))
        .collect();
    inputs.sort();

    let mut report = BatchReport {
        generated_at: now_rfc3339(),
        processed: Vec::new(),
        failed: Vec::new(),
        total_presets: 0,
    };

    for path in inputs {
        match decoder.decode_file(&path) {
            Ok(presets) => {
                if write_outputs && !presets.is_empty() {
                    if let Err(err) = write_decoded(&path, &presets) {
                        report.failed.push(FailedFile {
                            file: path.display().to_string(),
                            error: err,
                        });
                        continue;
                    }
                }
                report.total_presets += presets.len();
                report.processed.push(ProcessedFile {
                    input_file: path.display().to_string(),
                    preset_count: presets.len(),
                });
            }
            Err(err) => report.failed.push(FailedFile {
                file: path.display().to_string(),
                error: err.to_string(),
            }),
        }
    }

    Ok(report)
}

fn is_batch_input(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if extension == "syx" {
        return true;
    }
    if extension != "json" {
        return false;
    }
    // Outputs of a previous run are not inputs.
    !path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with("_decoded"))
}

fn write_decoded(input: &Path, presets: &[crate::DecodedPreset]) -> Result<(), String> {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("preset");
    let output = input.with_file_name(format!("{stem}_decoded.json"));
    let json = serde_json::to_string_pretty(presets).map_err(|err| err.to_string())?;
    fs::write(&output, json).map_err(|err| err.to_string())
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| DEFAULT_GENERATED_AT.to_string())
}
