//! Reading documents from disk with size and binary checks.

use std::path::Path;

use memchr::memchr;
use tokio::io::AsyncReadExt;

use crate::error::ApplyError;

/// Default size limit for documents read from disk (1 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

const BINARY_CHECK_LEN: usize = 8192;

/// Whether the first 8 KiB of `buffer` contain a NUL byte.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = buffer.len().min(BINARY_CHECK_LEN);
    memchr(0, &buffer[..check_len]).is_some()
}

fn decode(path: &Path, buffer: Vec<u8>) -> Result<String, ApplyError> {
    if is_binary(&buffer) {
        return Err(ApplyError::BinaryFile(path.display().to_string()));
    }
    String::from_utf8(buffer).map_err(|_| ApplyError::BinaryFile(path.display().to_string()))
}

/// Read a text document, refusing files over `max_bytes` and binary files.
///
/// Invalid UTF-8 is refused rather than decoded lossily, since the text is
/// written back after editing.
///
/// # Errors
///
/// [`ApplyError::NotFound`], [`ApplyError::TooLarge`],
/// [`ApplyError::BinaryFile`] or [`ApplyError::Io`].
pub fn read_document(path: &Path, max_bytes: u64) -> Result<String, ApplyError> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| ApplyError::NotFound(path.display().to_string()))?;
    if metadata.len() > max_bytes {
        return Err(ApplyError::TooLarge(metadata.len(), max_bytes));
    }
    let buffer = std::fs::read(path)?;
    decode(path, buffer)
}

/// Asynchronous [`read_document`].
///
/// # Errors
///
/// Same as [`read_document`].
pub async fn read_document_async(path: &Path, max_bytes: u64) -> Result<String, ApplyError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| ApplyError::NotFound(path.display().to_string()))?;
    if metadata.len() > max_bytes {
        return Err(ApplyError::TooLarge(metadata.len(), max_bytes));
    }
    let mut file = tokio::fs::File::open(path).await?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or_default());
    file.read_to_end(&mut buffer).await?;
    decode(path, buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text() {
        let dir = TempDir::new().expect("Create temp dir");
        let path = dir.path().join("a.ps1");
        std::fs::write(&path, "Get-Item").expect("write");
        assert_eq!(read_document(&path, 1024).expect("read"), "Get-Item");
    }

    #[test]
    fn test_limits() {
        let dir = TempDir::new().expect("Create temp dir");
        let big = dir.path().join("big.ps1");
        std::fs::write(&big, "x".repeat(64)).expect("write");
        assert!(matches!(
            read_document(&big, 10),
            Err(ApplyError::TooLarge(64, 10))
        ));

        let binary = dir.path().join("bin.dat");
        std::fs::write(&binary, b"ab\x00cd").expect("write");
        assert!(matches!(
            read_document(&binary, 1024),
            Err(ApplyError::BinaryFile(_))
        ));

        assert!(matches!(
            read_document(&dir.path().join("missing"), 1024),
            Err(ApplyError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_read_async() {
        let dir = TempDir::new().expect("Create temp dir");
        let path = dir.path().join("a.ps1");
        tokio::fs::write(&path, "Get-Item").await.expect("write");
        assert_eq!(
            read_document_async(&path, 1024).await.expect("read"),
            "Get-Item"
        );
    }
}
