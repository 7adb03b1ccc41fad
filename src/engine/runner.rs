//! Sequential job execution.
//!
//! Jobs run one at a time, in file order, with ffmpeg's own output relayed
//! live. One failed job never stops the rest of the batch; it only shows up
//! in the final tally.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::process::{Command, Stdio};
use tracing::{info, warn};

use super::core::{VideoJob, encode_args, format_ffmpeg_cmd, probe_duration};
use super::hardware;
use crate::jobfile::format_time;

/// Runner knobs. The program name exists so tests can substitute a stub
/// binary for ffmpeg.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub program: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}

/// Run every job in order and tally the outcomes.
pub fn run_jobs(jobs: &[VideoJob], opts: &RunOptions) -> RunSummary {
    let total = jobs.len();
    let mut succeeded = 0;

    for (i, job) in jobs.iter().enumerate() {
        println!(
            "\n[{}/{}] {}: {} -> {}",
            i + 1,
            total,
            job.name,
            job.input_path.display(),
            job.output_path.display()
        );
        println!(
            "  {}x{}@{}fps, crf {}, preset {}, {} segment(s), keeping {}",
            job.width,
            job.height,
            job.fps,
            job.crf,
            job.preset,
            job.segments.len(),
            format_time(job.kept_duration())
        );

        match run_job(job, opts) {
            Ok(()) => {
                succeeded += 1;
                println!("Completed: {}", job.output_path.display());
            }
            Err(e) => {
                warn!(job = %job.name, "job failed");
                eprintln!("Error processing {}: {:#}", job.input_path.display(), e);
            }
        }
    }

    RunSummary { total, succeeded }
}

fn run_job(job: &VideoJob, opts: &RunOptions) -> Result<()> {
    // Probed per job: a config may mix pinned and auto sections.
    let choice = hardware::resolve_encoder(&job.hwaccel);
    info!(
        job = %job.name,
        accel = choice.accel.as_str(),
        codec = choice.codec,
        two_pass = job.two_pass,
        optimize = %job.optimize_for,
        "encoding via {}",
        choice.description
    );

    if let Ok(duration) = probe_duration(&job.input_path) {
        info!(job = %job.name, "input duration {:.1}s", duration);
    }

    let args = encode_args(job, &choice);
    println!(">> {}", format_ffmpeg_cmd(&opts.program, &args));

    let status = Command::new(&opts.program)
        .args(&args)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to launch {}", opts.program))?;

    if !status.success() {
        bail!("{} exited with status {}", opts.program, status);
    }

    Ok(())
}
