//! EXIF capture time extraction

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use exif::{Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// EXIF datetime layout: `YYYY:MM:DD hh:mm:ss`
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Extract the capture time recorded in a file's EXIF metadata.
///
/// All fields in the container are scanned flat and the first
/// `DateTimeOriginal` wins, whichever IFD it lives in. Videos and
/// EXIF-less images fail the container parse and come back as
/// `Error::ExifRead`; callers treat that as the source being absent.
pub fn extract_exif_time(path: &Path) -> Result<NaiveDateTime> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| Error::ExifRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    for field in exif.fields() {
        if field.tag != Tag::DateTimeOriginal {
            continue;
        }
        let Some(raw) = ascii_value(&field.value) else {
            continue;
        };
        return match parse_exif_datetime(raw) {
            Some(datetime) => {
                trace!(?path, %datetime, "Found EXIF capture time");
                Ok(datetime)
            }
            None => Err(Error::ExifRead {
                path: path.to_path_buf(),
                message: format!("Unparseable DateTimeOriginal value: {raw}"),
            }),
        };
    }

    Err(Error::ExifRead {
        path: path.to_path_buf(),
        message: "No DateTimeOriginal tag in EXIF data".to_string(),
    })
}

/// Parse the EXIF datetime layout, nothing else. Writers that use a
/// different separator do not count as a capture time.
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, EXIF_DATETIME_FORMAT).ok()
}

/// Pull the text out of an ASCII field, dropping NUL padding
fn ascii_value(value: &Value) -> Option<&str> {
    match value {
        Value::Ascii(lines) => lines
            .first()
            .and_then(|raw| std::str::from_utf8(raw).ok())
            .map(|text| text.trim_end_matches('\0').trim()),
        _ => None,
    }
}
