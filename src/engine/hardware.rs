//! Hardware encoder detection via short trial encodes.
//!
//! Candidates are probed in a fixed order (NVENC, QSV, VAAPI) by running a
//! tiny `lavfi testsrc2` encode through each path; the first one that
//! completes wins. Everything falls back to libx264 on the CPU.

use serde::Serialize;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How long a single trial encode may run before it counts as unavailable.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Hardware acceleration paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HwAccel {
    Nvenc,
    Qsv,
    Vaapi,
    Cpu,
}

impl HwAccel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nvenc => "nvenc",
            Self::Qsv => "qsv",
            Self::Vaapi => "vaapi",
            Self::Cpu => "cpu",
        }
    }

    pub fn is_hardware(&self) -> bool {
        !matches!(self, Self::Cpu)
    }

    /// Map a job's `hwaccel` value to a path. Anything that is not a known
    /// hardware name takes the software path, matching how configs have
    /// always behaved.
    pub fn parse(s: &str) -> Self {
        match s {
            "nvenc" => Self::Nvenc,
            "qsv" => Self::Qsv,
            "vaapi" => Self::Vaapi,
            _ => Self::Cpu,
        }
    }
}

/// A resolved encoder path, consumed only by the command synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncoderChoice {
    pub accel: HwAccel,
    pub codec: &'static str,
    pub description: &'static str,
}

impl EncoderChoice {
    pub fn software() -> Self {
        Self {
            accel: HwAccel::Cpu,
            codec: "libx264",
            description: "CPU (libx264)",
        }
    }

    /// Pin a path without probing.
    pub fn pinned(accel: HwAccel) -> Self {
        match accel {
            HwAccel::Cpu => Self::software(),
            hw => {
                let cand = HW_CANDIDATES
                    .iter()
                    .find(|c| c.accel == hw)
                    .unwrap_or(&HW_CANDIDATES[0]);
                cand.choice()
            }
        }
    }
}

/// One entry of the static probe table.
pub struct HwCandidate {
    pub accel: HwAccel,
    pub codec: &'static str,
    pub description: &'static str,
    probe_args: &'static [&'static str],
}

impl HwCandidate {
    pub fn choice(&self) -> EncoderChoice {
        EncoderChoice {
            accel: self.accel,
            codec: self.codec,
            description: self.description,
        }
    }
}

/// Probe order is fixed: discrete NVIDIA first, then Intel QuickSync, then
/// generic VAAPI. Each trial encodes a tenth of a second of test pattern.
pub const HW_CANDIDATES: &[HwCandidate] = &[
    HwCandidate {
        accel: HwAccel::Nvenc,
        codec: "h264_nvenc",
        description: "NVIDIA GPU (NVENC)",
        probe_args: &[
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "lavfi",
            "-i",
            "testsrc2=duration=0.1:size=320x240:rate=1",
            "-c:v",
            "h264_nvenc",
            "-preset",
            "fast",
            "-t",
            "0.1",
            "-f",
            "null",
            "-",
        ],
    },
    HwCandidate {
        accel: HwAccel::Qsv,
        codec: "h264_qsv",
        description: "Intel QuickSync (QSV)",
        probe_args: &[
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "lavfi",
            "-i",
            "testsrc2=duration=0.1:size=320x240:rate=1",
            "-c:v",
            "h264_qsv",
            "-preset",
            "fast",
            "-t",
            "0.1",
            "-f",
            "null",
            "-",
        ],
    },
    HwCandidate {
        accel: HwAccel::Vaapi,
        codec: "h264_vaapi",
        description: "Intel/AMD VAAPI",
        probe_args: &[
            "-hide_banner",
            "-loglevel",
            "error",
            "-init_hw_device",
            "vaapi=foo:/dev/dri/renderD128",
            "-f",
            "lavfi",
            "-i",
            "testsrc2=duration=0.1:size=320x240:rate=1",
            "-vf",
            "format=nv12,hwupload",
            "-c:v",
            "h264_vaapi",
            "-t",
            "0.1",
            "-f",
            "null",
            "-",
        ],
    },
];

/// Pick the first candidate the probe predicate accepts, falling back to
/// software. Pure over the static table, so tests can inject a predicate.
pub fn select_encoder<F>(mut probe: F) -> EncoderChoice
where
    F: FnMut(&HwCandidate) -> bool,
{
    for cand in HW_CANDIDATES {
        if probe(cand) {
            return cand.choice();
        }
    }
    EncoderChoice::software()
}

/// Probe the machine and pick the best available encoder path.
pub fn detect_optimal_encoder() -> EncoderChoice {
    info!("probing hardware encoders");
    let choice = select_encoder(|cand| {
        let available = run_trial_encode(cand);
        debug!(
            encoder = cand.codec,
            available, "trial encode for {}", cand.description
        );
        available
    });
    info!(
        accel = choice.accel.as_str(),
        codec = choice.codec,
        "selected encoder: {}",
        choice.description
    );
    choice
}

/// Resolve a job's `hwaccel` field to an encoder choice, probing only when
/// the field is empty or `auto`.
pub fn resolve_encoder(hwaccel: &str) -> EncoderChoice {
    match hwaccel.trim() {
        "" | "auto" => detect_optimal_encoder(),
        other => EncoderChoice::pinned(HwAccel::parse(other)),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub accel: HwAccel,
    pub codec: &'static str,
    pub description: &'static str,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub results: Vec<ProbeResult>,
    pub selected: EncoderChoice,
}

/// Probe every candidate (not just until the first success), for the
/// `detect` subcommand. The selected path is still the first available one.
pub fn run_probe_report() -> ProbeReport {
    let results: Vec<ProbeResult> = HW_CANDIDATES
        .iter()
        .map(|cand| ProbeResult {
            accel: cand.accel,
            codec: cand.codec,
            description: cand.description,
            available: run_trial_encode(cand),
        })
        .collect();

    let selected = results
        .iter()
        .find(|r| r.available)
        .map(|r| EncoderChoice::pinned(r.accel))
        .unwrap_or_else(EncoderChoice::software);

    ProbeReport { results, selected }
}

// Probe failures are never fatal: a spawn error, non-zero exit, or timeout
// all just mean "not available here".
fn run_trial_encode(cand: &HwCandidate) -> bool {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(cand.probe_args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let Ok(mut child) = cmd.spawn() else {
        return false;
    };

    let deadline = Instant::now() + PROBE_TIMEOUT;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return status.success(),
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return false;
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_software_when_nothing_probes() {
        let choice = select_encoder(|_| false);
        assert_eq!(choice.accel, HwAccel::Cpu);
        assert_eq!(choice.codec, "libx264");
    }

    #[test]
    fn first_available_candidate_wins() {
        let choice = select_encoder(|_| true);
        assert_eq!(choice.accel, HwAccel::Nvenc);
        assert_eq!(choice.codec, "h264_nvenc");

        let choice = select_encoder(|cand| cand.accel == HwAccel::Qsv);
        assert_eq!(choice.accel, HwAccel::Qsv);
        assert_eq!(choice.codec, "h264_qsv");

        let choice = select_encoder(|cand| cand.accel == HwAccel::Vaapi);
        assert_eq!(choice.codec, "h264_vaapi");
    }

    #[test]
    fn probe_order_is_nvenc_qsv_vaapi() {
        let mut seen = Vec::new();
        let _ = select_encoder(|cand| {
            seen.push(cand.accel);
            false
        });
        assert_eq!(seen, vec![HwAccel::Nvenc, HwAccel::Qsv, HwAccel::Vaapi]);
    }

    #[test]
    fn parse_maps_unknown_names_to_cpu() {
        assert_eq!(HwAccel::parse("nvenc"), HwAccel::Nvenc);
        assert_eq!(HwAccel::parse("qsv"), HwAccel::Qsv);
        assert_eq!(HwAccel::parse("vaapi"), HwAccel::Vaapi);
        assert_eq!(HwAccel::parse("cpu"), HwAccel::Cpu);
        assert_eq!(HwAccel::parse("opencl"), HwAccel::Cpu);
    }

    #[test]
    fn pinned_choice_carries_the_matching_codec() {
        assert_eq!(EncoderChoice::pinned(HwAccel::Nvenc).codec, "h264_nvenc");
        assert_eq!(EncoderChoice::pinned(HwAccel::Qsv).codec, "h264_qsv");
        assert_eq!(EncoderChoice::pinned(HwAccel::Vaapi).codec, "h264_vaapi");
        assert_eq!(EncoderChoice::pinned(HwAccel::Cpu).codec, "libx264");
    }
}
