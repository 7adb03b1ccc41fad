//! Human time tokens: raw seconds, `MM:SS`, or `HH:MM:SS`.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeError {
    #[error("empty time value")]
    Empty,

    #[error("invalid time format: {0:?}")]
    InvalidFormat(String),

    #[error("cannot parse time: {0:?}")]
    Unparsable(String),
}

/// Parse a time token into a non-negative number of seconds.
///
/// Accepts `SS` (raw seconds), `MM:SS` (seconds <= 59), and `HH:MM:SS`
/// (minutes and seconds <= 59). Hours and raw seconds are unbounded, a
/// source video may be arbitrarily long.
pub fn parse_time(s: &str) -> Result<u64, TimeError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TimeError::Empty);
    }

    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        return match parts.len() {
            2 => {
                let mm = clock_field(parts[0], s)?;
                let ss = clock_field(parts[1], s)?;
                if ss > 59 {
                    return Err(TimeError::InvalidFormat(s.to_string()));
                }
                Ok(mm * 60 + ss)
            }
            3 => {
                let hh = clock_field(parts[0], s)?;
                let mm = clock_field(parts[1], s)?;
                let ss = clock_field(parts[2], s)?;
                if mm > 59 || ss > 59 {
                    return Err(TimeError::InvalidFormat(s.to_string()));
                }
                Ok(hh * 3600 + mm * 60 + ss)
            }
            _ => Err(TimeError::InvalidFormat(s.to_string())),
        };
    }

    s.parse::<u64>()
        .map_err(|_| TimeError::Unparsable(s.to_string()))
}

fn clock_field(part: &str, whole: &str) -> Result<u64, TimeError> {
    part.parse::<u64>()
        .map_err(|_| TimeError::InvalidFormat(whole.to_string()))
}

/// Render seconds as `HH:MM:SS`. `parse_time` is the exact inverse.
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
