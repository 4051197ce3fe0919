//! Timestamps encoded in capture object paths.
//!
//! Capture logs are laid out as `<root>/YYYY/MM/DD/HH/MM-SS-<suffix>`;
//! the trailing five path segments carry the record time. Anything in
//! the final segment after the second is ignored.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Errors from decoding a path-encoded timestamp.
#[derive(Debug, Error)]
pub enum PathTimeError {
    #[error("path {path} has fewer than five segments")]
    TooShort { path: String },

    #[error("path {path}: segment {segment:?} is not a number")]
    BadSegment { path: String, segment: String },

    #[error("path {path} encodes no valid calendar time")]
    OutOfRange { path: String },
}

/// Decode the timestamp encoded in a capture object path.
pub fn timestamp_from_path(path: &str) -> Result<DateTime<Utc>, PathTimeError> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < 5 {
        return Err(PathTimeError::TooShort {
            path: path.to_string(),
        });
    }
    let tail = &segments[segments.len() - 5..];

    let year = parse_segment(path, tail[0])?;
    let month = parse_segment(path, tail[1])?;
    let day = parse_segment(path, tail[2])?;
    let hour = parse_segment(path, tail[3])?;

    let file_parts: Vec<&str> = tail[4].split('-').collect();
    if file_parts.len() < 2 {
        return Err(PathTimeError::BadSegment {
            path: path.to_string(),
            segment: tail[4].to_string(),
        });
    }
    let minute = parse_segment(path, file_parts[0])?;
    let second = parse_segment(path, file_parts[1])?;

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| PathTimeError::OutOfRange {
            path: path.to_string(),
        })
}

fn parse_segment(path: &str, segment: &str) -> Result<u32, PathTimeError> {
    segment.parse().map_err(|_| PathTimeError::BadSegment {
        path: path.to_string(),
        segment: segment.to_string(),
    })
}
