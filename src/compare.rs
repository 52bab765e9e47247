//! Byte-for-byte file comparison

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Read buffer size for the streamed comparison
const CHUNK_SIZE: usize = 256 * 1024;

/// Compare two files byte for byte.
///
/// Lengths are checked first, so same-name files of different sizes are
/// settled without reading either one. Any IO failure along the way is
/// reported with both paths attached.
pub fn files_identical(source: &Path, destination: &Path) -> Result<bool> {
    compare_contents(source, destination).map_err(|e| Error::Compare {
        source_path: source.to_path_buf(),
        destination: destination.to_path_buf(),
        message: e.to_string(),
    })
}

fn compare_contents(source: &Path, destination: &Path) -> std::io::Result<bool> {
    if fs::metadata(source)?.len() != fs::metadata(destination)?.len() {
        return Ok(false);
    }

    let mut left = File::open(source)?;
    let mut right = File::open(destination)?;
    let mut left_buf = vec![0u8; CHUNK_SIZE];
    let mut right_buf = vec![0u8; CHUNK_SIZE];

    loop {
        let read = left.read(&mut left_buf)?;
        if read == 0 {
            return Ok(true);
        }
        // Lengths already matched, so the right side must yield as much
        right.read_exact(&mut right_buf[..read])?;
        if left_buf[..read] != right_buf[..read] {
            return Ok(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();

        assert!(files_identical(&a, &b).unwrap());
    }

    #[test]
    fn test_same_length_different_content() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        fs::write(&a, b"same length A").unwrap();
        fs::write(&b, b"same length B").unwrap();

        assert!(!files_identical(&a, &b).unwrap());
    }

    #[test]
    fn test_different_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        fs::write(&a, b"short").unwrap();
        fs::write(&b, b"considerably longer").unwrap();

        assert!(!files_identical(&a, &b).unwrap());
    }

    #[test]
    fn test_difference_past_the_first_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");

        let data: Vec<u8> = (0..CHUNK_SIZE + 4096).map(|i| (i % 251) as u8).collect();
        let mut altered = data.clone();
        altered[CHUNK_SIZE + 100] ^= 0xFF;

        fs::write(&a, &data).unwrap();
        fs::write(&b, &data).unwrap();
        assert!(files_identical(&a, &b).unwrap());

        fs::write(&b, &altered).unwrap();
        assert!(!files_identical(&a, &b).unwrap());
    }

    #[test]
    fn test_missing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        fs::write(&a, b"present").unwrap();

        let result = files_identical(&a, &dir.path().join("gone.jpg"));
        assert!(matches!(result, Err(Error::Compare { .. })));
    }
}
