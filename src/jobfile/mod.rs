//! The job file: a multi-section text format describing trim/encode jobs.
//!
//! ```text
//! [intro]
//! input = raw.mp4
//! output = intro.mp4
//! crf = 22
//! 00:01:30 00:02:45
//! 05:00 07:30
//! ```
//!
//! Each `[section]` opens a job pre-filled with defaults; `key = value`
//! lines set knobs, anything else is a segment line. Parsing fails fast:
//! any malformed line aborts the whole load before a single job runs.

pub mod segment;
pub mod time;

pub use segment::{SegmentError, parse_segment_line};
pub use time::{TimeError, format_time, parse_time};

use anyhow::Context;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::JobDefaults;
use crate::engine::core::VideoJob;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobFileError {
    #[error("line {line}: the file must start with a [section] header")]
    MissingSectionHeader { line: usize },

    #[error("line {line}: unknown directive: {key}")]
    UnknownDirective { line: usize, key: String },

    #[error("line {line}: {cause}")]
    BadSegment { line: usize, cause: SegmentError },

    #[error("line {line}: previous section invalid: {cause}")]
    InvalidSection { line: usize, cause: ValidationError },

    #[error("final section invalid: {cause}")]
    InvalidFinalSection { cause: ValidationError },

    #[error("no job sections found")]
    NoJobs,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing input file (input=)")]
    MissingInput,

    #[error("missing output file (output=)")]
    MissingOutput,

    #[error("no segments defined")]
    NoSegments,
}

/// Read and parse a job file from disk.
pub fn load_jobs(path: &Path, defaults: &JobDefaults) -> anyhow::Result<Vec<VideoJob>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file: {}", path.display()))?;
    parse_jobs(&text, defaults).map_err(Into::into)
}

/// Parse job file text into an ordered sequence of validated jobs.
///
/// Lines are 1-indexed for error reporting. Blank lines and lines starting
/// with `#` or `;` are skipped. A section is finalized (and validated) when
/// the next header or end of input is reached, so e.g. a missing `output=`
/// is reported against the boundary line, not earlier.
pub fn parse_jobs(text: &str, defaults: &JobDefaults) -> Result<Vec<VideoJob>, JobFileError> {
    let mut jobs: Vec<VideoJob> = Vec::new();
    let mut current: Option<VideoJob> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if let Some(done) = current.take() {
                validate_job(&done)
                    .map_err(|cause| JobFileError::InvalidSection { line: line_no, cause })?;
                jobs.push(done);
            }
            let name = line[1..line.len() - 1].trim().to_string();
            current = Some(VideoJob::with_defaults(name, defaults));
            continue;
        }

        let Some(job) = current.as_mut() else {
            return Err(JobFileError::MissingSectionHeader { line: line_no });
        };

        if let Some((key, value)) = line.split_once('=') {
            apply_directive(job, key.trim(), value.trim(), line_no)?;
        } else {
            let seg = parse_segment_line(line)
                .map_err(|cause| JobFileError::BadSegment { line: line_no, cause })?;
            job.segments.push(seg);
        }
    }

    if let Some(done) = current.take() {
        validate_job(&done).map_err(|cause| JobFileError::InvalidFinalSection { cause })?;
        jobs.push(done);
    }

    if jobs.is_empty() {
        return Err(JobFileError::NoJobs);
    }

    Ok(jobs)
}

// The directive set is closed on purpose: an unknown key fails the whole
// load rather than being silently accepted.
fn apply_directive(
    job: &mut VideoJob,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), JobFileError> {
    match key {
        "input" => job.input_path = PathBuf::from(value),
        "output" => job.output_path = PathBuf::from(value),
        "crf" => job.crf = value.to_string(),
        "preset" => job.preset = value.to_string(),
        "width" => job.width = value.to_string(),
        "height" => job.height = value.to_string(),
        "fps" => job.fps = value.to_string(),
        "hwaccel" => job.hwaccel = value.to_string(),
        "threads" => job.threads = value.to_string(),
        "twopass" => job.two_pass = value.eq_ignore_ascii_case("true") || value == "1",
        "optimize" => job.optimize_for = value.to_string(),
        "extra_args" => job.extra_args = value.to_string(),
        other => {
            return Err(JobFileError::UnknownDirective {
                line,
                key: other.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_job(job: &VideoJob) -> Result<(), ValidationError> {
    if job.input_path.as_os_str().is_empty() {
        return Err(ValidationError::MissingInput);
    }
    if job.output_path.as_os_str().is_empty() {
        return Err(ValidationError::MissingOutput);
    }
    if job.segments.is_empty() {
        return Err(ValidationError::NoSegments);
    }
    Ok(())
}
