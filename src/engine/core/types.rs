use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::JobDefaults;

/// One contiguous region of the source timeline to retain, in seconds.
///
/// Invariant: `end > start`. The parser enforces it; segments are never
/// reordered after parsing (output order = file order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: u64,
    pub end: u64,
}

impl Segment {
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }
}

/// One named unit of work from the job file.
///
/// Built incrementally while scanning a `[section]`, validated when the
/// section closes, immutable afterwards. The knob fields stay strings: they
/// carry encoder-specific semantics and are passed through to ffmpeg as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoJob {
    /// Section header text. Cosmetic, only used in log output.
    pub name: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub segments: Vec<Segment>,

    pub crf: String,
    pub preset: String,
    pub width: String,
    pub height: String,
    pub fps: String,
    pub hwaccel: String,
    pub threads: String,
    /// Part of the schema, currently unused downstream.
    pub two_pass: bool,
    /// Informational (speed|balanced|quality), unused downstream.
    pub optimize_for: String,
    /// Extra ffmpeg arguments, shell-style tokenized before the output path.
    pub extra_args: String,
}

impl VideoJob {
    /// Open a new job pre-populated with the given defaults.
    pub fn with_defaults(name: String, defaults: &JobDefaults) -> Self {
        Self {
            name,
            input_path: PathBuf::new(),
            output_path: PathBuf::new(),
            segments: Vec::new(),
            crf: defaults.crf.clone(),
            preset: defaults.preset.clone(),
            width: defaults.width.clone(),
            height: defaults.height.clone(),
            fps: defaults.fps.clone(),
            hwaccel: defaults.hwaccel.clone(),
            threads: defaults.threads.clone(),
            two_pass: defaults.twopass,
            optimize_for: defaults.optimize.clone(),
            extra_args: String::new(),
        }
    }

    /// Total seconds of source footage the job keeps.
    pub fn kept_duration(&self) -> u64 {
        self.segments.iter().map(Segment::duration).sum()
    }
}
