//! File creation time fallback

use chrono::{DateTime, NaiveDateTime};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Read the filesystem birth time of a file.
///
/// Not every platform or filesystem records one; absence is an expected
/// outcome, not an error.
pub fn birth_time(path: &Path) -> Option<NaiveDateTime> {
    let created = match std::fs::metadata(path).and_then(|meta| meta.created()) {
        Ok(created) => created,
        Err(e) => {
            debug!(?path, error = %e, "No birth time available");
            return None;
        }
    };
    system_time_to_naive(created)
}

/// Convert a `SystemTime` to a timezone-naive timestamp in UTC
fn system_time_to_naive(time: SystemTime) -> Option<NaiveDateTime> {
    let elapsed = time.duration_since(UNIX_EPOCH).ok()?;
    let secs = i64::try_from(elapsed.as_secs()).ok()?;
    DateTime::from_timestamp(secs, elapsed.subsec_nanos()).map(|dt| dt.naive_utc())
}
