//! Capture log indexing and reading.

pub mod path_time;
pub mod reader;

pub use path_time::{timestamp_from_path, PathTimeError};
pub use reader::{read_capture_file, CaptureRecord, ReadError};

use chrono::{DateTime, Duration, Utc};

/// Select the paths whose encoded timestamp lies in the trailing window
/// `[end - window, end]`, inclusive on both bounds.
///
/// Every listed path must carry a valid encoded timestamp; one bad path
/// fails the whole selection.
pub fn select_window(
    paths: &[String],
    end: DateTime<Utc>,
    window: Duration,
) -> Result<Vec<String>, PathTimeError> {
    let start = end - window;
    let mut selected = Vec::new();
    for path in paths {
        let t = timestamp_from_path(path)?;
        if t >= start && t <= end {
            selected.push(path.clone());
        }
    }
    Ok(selected)
}
