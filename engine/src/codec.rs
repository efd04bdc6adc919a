//! Gzip compression service.
//!
//! Encodes at the highest compression level and decodes any single-member
//! gzip stream. Backed by `flate2`. The staging operations never call into
//! this module.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;
use crate::error::StageError;

/// Compress `data` into a gzip stream at maximum compression.
pub fn gzip_compress(data: &[u8]) -> Result<Vec<u8>, StageError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .map_err(|e| StageError::CompressionFailed { source: e })?;
    encoder
        .finish()
        .map_err(|e| StageError::CompressionFailed { source: e })
}

/// Decompress a gzip stream.
pub fn gzip_decompress(data: &[u8]) -> Result<Vec<u8>, StageError> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| StageError::DecompressionFailed { source: e })?;
    Ok(out)
}

/// Compress the file at `src` into `dst`, returning the compressed size.
pub fn gzip_file(src: &Path, dst: &Path) -> Result<u64, StageError> {
    let input = File::open(src).map_err(|e| StageError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;
    let output = File::create(dst).map_err(|e| StageError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let mut encoder = GzEncoder::new(BufWriter::new(output), Compression::best());
    let read = io::copy(&mut BufReader::new(input), &mut encoder)
        .map_err(|e| StageError::CompressionFailed { source: e })?;
    encoder
        .finish()
        .and_then(|mut writer| writer.flush())
        .map_err(|e| StageError::CompressionFailed { source: e })?;

    let written = std::fs::metadata(dst).map(|m| m.len()).unwrap_or(0);
    debug!(src = %src.display(), dst = %dst.display(), read, written, "compressed file");
    Ok(written)
}

/// Decompress the gzip file at `src` into `dst`, returning the decompressed size.
pub fn gunzip_file(src: &Path, dst: &Path) -> Result<u64, StageError> {
    let input = File::open(src).map_err(|e| StageError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;
    let output = File::create(dst).map_err(|e| StageError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let mut decoder = GzDecoder::new(BufReader::new(input));
    let mut writer = BufWriter::new(output);
    let written = io::copy(&mut decoder, &mut writer)
        .map_err(|e| StageError::DecompressionFailed { source: e })?;
    writer.flush().map_err(|e| StageError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    debug!(src = %src.display(), dst = %dst.display(), written, "decompressed file");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_then_decompress() {
        let text = "staging ".repeat(512);
        let compressed = gzip_compress(text.as_bytes()).expect("Failed to compress");

        assert_eq!(&compressed[..2], &[0x1f, 0x8b], "gzip magic bytes");
        assert!(compressed.len() < text.len());

        let restored = gzip_decompress(&compressed).expect("Failed to decompress");
        assert_eq!(restored, text.as_bytes());
    }

    #[test]
    fn test_decompress_rejects_garbage() {
        let result = gzip_decompress(b"definitely not gzip");
        assert!(matches!(result, Err(StageError::DecompressionFailed { .. })));
    }

    #[test]
    fn test_file_variants() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let plain = temp_dir.path().join("plain.txt");
        let packed = temp_dir.path().join("plain.txt.gz");
        let unpacked = temp_dir.path().join("unpacked.txt");
        std::fs::write(&plain, b"file body ".repeat(100)).expect("Failed to write file");

        let packed_len = gzip_file(&plain, &packed).expect("Failed to gzip");
        assert!(packed_len > 0);
        let unpacked_len = gunzip_file(&packed, &unpacked).expect("Failed to gunzip");

        assert_eq!(unpacked_len, 1000);
        assert_eq!(
            std::fs::read(&plain).expect("read plain"),
            std::fs::read(&unpacked).expect("read unpacked")
        );
    }
}
