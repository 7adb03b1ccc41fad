// ffmpeg/ffprobe availability and input metadata

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

fn tool_version(tool: &str) -> Result<String> {
    let output = Command::new(tool)
        .arg("-version")
        .output()
        .with_context(|| format!("Failed to execute {tool}. Is it installed and in PATH?"))?;

    if !output.status.success() {
        anyhow::bail!("{tool} command failed with status: {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.lines().next().unwrap_or("Unknown version").to_string())
}

/// Check if ffmpeg is available and return its version line
pub fn ffmpeg_version() -> Result<String> {
    tool_version("ffmpeg")
}

/// Check if ffprobe is available and return its version line
pub fn ffprobe_version() -> Result<String> {
    tool_version("ffprobe")
}

/// Probe a video file to get its duration in seconds
pub fn probe_duration(path: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .context("Failed to execute ffprobe")?;

    if !output.status.success() {
        anyhow::bail!(
            "ffprobe failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    parse_ffprobe_duration(&String::from_utf8_lossy(&output.stdout))
}

/// Parse the duration out of ffprobe's JSON output
pub fn parse_ffprobe_duration(json: &str) -> Result<f64> {
    let probe: FfprobeOutput =
        serde_json::from_str(json).context("Failed to parse ffprobe JSON output")?;

    probe
        .format
        .duration
        .context("No duration found in ffprobe output")?
        .parse::<f64>()
        .context("Failed to parse duration as float")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_duration_from_ffprobe_json() {
        let json = r#"{"format": {"filename": "test.mp4", "duration": "123.456"}}"#;
        assert_eq!(parse_ffprobe_duration(json).unwrap(), 123.456);

        let json = r#"{"format": {"duration": "60"}}"#;
        assert_eq!(parse_ffprobe_duration(json).unwrap(), 60.0);
    }

    #[test]
    fn missing_duration_is_an_error() {
        let json = r#"{"format": {"filename": "test.mp4"}}"#;
        assert!(parse_ffprobe_duration(json).is_err());
    }
}
