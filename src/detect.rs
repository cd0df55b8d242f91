//! PDF input detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// PDF magic bytes.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Some producers put junk before the header; readers accept it within 1 KiB.
const HEADER_WINDOW: usize = 1024;

/// Return the header version (e.g. "1.7") if `data` holds a PDF header.
pub fn detect_version(data: &[u8]) -> Result<String> {
    let window = &data[..data.len().min(HEADER_WINDOW)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version: String = window[start + PDF_MAGIC.len()..]
        .iter()
        .take_while(|b| b.is_ascii_digit() || **b == b'.')
        .map(|&b| b as char)
        .collect();

    if version.is_empty() {
        return Err(Error::UnknownFormat);
    }
    Ok(version)
}

/// Check the header of a file on disk.
pub fn detect_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = Vec::with_capacity(HEADER_WINDOW);
    File::open(path)?
        .take(HEADER_WINDOW as u64)
        .read_to_end(&mut header)?;
    detect_version(&header)
}

/// Check if a file looks like a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_version_from_path(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_version() {
        assert_eq!(detect_version(b"%PDF-1.7\n%\xE2\xE3").unwrap(), "1.7");
        assert_eq!(detect_version(b"\n\n%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_not_pdf() {
        assert!(matches!(
            detect_version(b"PK\x03\x04 not a pdf"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(detect_version(b"%PDF-"), Err(Error::UnknownFormat)));
        assert!(detect_version(b"").is_err());
    }

    #[test]
    fn test_detect_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4\n1 0 obj\n").unwrap();
        assert!(is_pdf(file.path()));

        let mut other = tempfile::NamedTempFile::new().unwrap();
        other.write_all(b"hello").unwrap();
        assert!(!is_pdf(other.path()));
    }
}
