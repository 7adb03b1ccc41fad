//! Segment lines: `start end` in any of the time formats.

use thiserror::Error;

use super::time::{TimeError, parse_time};
use crate::engine::core::Segment;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SegmentError {
    #[error("missing times (expected: start end)")]
    MissingTimes,

    #[error("invalid start time: {0}")]
    InvalidStart(TimeError),

    #[error("invalid end time: {0}")]
    InvalidEnd(TimeError),

    #[error("end time must be greater than start time")]
    NonPositiveDuration,
}

/// Parse one segment line into a validated `Segment`.
///
/// The line is split on runs of whitespace and/or commas. Only the first
/// two tokens are consulted; trailing tokens are silently ignored. This is
/// long-standing observable behavior, do not tighten it into an arity check.
pub fn parse_segment_line(line: &str) -> Result<Segment, SegmentError> {
    let mut tokens = line
        .trim()
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty());

    let start_tok = tokens.next().ok_or(SegmentError::MissingTimes)?;
    let end_tok = tokens.next().ok_or(SegmentError::MissingTimes)?;

    let start = parse_time(start_tok).map_err(SegmentError::InvalidStart)?;
    let end = parse_time(end_tok).map_err(SegmentError::InvalidEnd)?;

    if end <= start {
        return Err(SegmentError::NonPositiveDuration);
    }

    Ok(Segment { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_raw_seconds_pair() {
        assert_eq!(
            parse_segment_line("90 105"),
            Ok(Segment { start: 90, end: 105 })
        );
    }

    #[test]
    fn parses_clock_formats() {
        assert_eq!(
            parse_segment_line("01:30 01:45"),
            Ok(Segment { start: 90, end: 105 })
        );
        assert_eq!(
            parse_segment_line("00:01:30 00:02:45"),
            Ok(Segment { start: 90, end: 165 })
        );
    }

    #[test]
    fn commas_and_extra_tokens_are_tolerated() {
        assert_eq!(
            parse_segment_line("00:01:30, 00:02:45 extra"),
            Ok(Segment { start: 90, end: 165 })
        );
        assert_eq!(
            parse_segment_line("90,105,these tokens are ignored"),
            Ok(Segment { start: 90, end: 105 })
        );
    }

    #[test]
    fn rejects_missing_times() {
        assert_eq!(parse_segment_line(""), Err(SegmentError::MissingTimes));
        assert_eq!(parse_segment_line("90"), Err(SegmentError::MissingTimes));
    }

    #[test]
    fn rejects_non_positive_duration() {
        assert_eq!(
            parse_segment_line("10 5"),
            Err(SegmentError::NonPositiveDuration)
        );
        assert_eq!(
            parse_segment_line("5 5"),
            Err(SegmentError::NonPositiveDuration)
        );
    }

    #[test]
    fn wraps_time_errors_with_position() {
        assert_eq!(
            parse_segment_line("abc 105"),
            Err(SegmentError::InvalidStart(TimeError::Unparsable(
                "abc".to_string()
            )))
        );
        assert_eq!(
            parse_segment_line("90 1:60"),
            Err(SegmentError::InvalidEnd(TimeError::InvalidFormat(
                "1:60".to_string()
            )))
        );
    }
}
