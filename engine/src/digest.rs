//! MD5 digest service.
//!
//! A thin layer over the `md5` crate for callers that shipped the staging
//! engine together with a digest component. The staging operations never
//! call into this module.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use crate::error::StageError;

/// Length of an MD5 digest in bytes.
pub const DIGEST_LEN: usize = 16;

/// Streaming MD5 hasher
pub struct Md5Hasher {
    context: md5::Context,
}

impl Default for Md5Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Md5Hasher {
    pub fn new() -> Self {
        Md5Hasher {
            context: md5::Context::new(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.context.consume(data);
    }

    pub fn finalize(self) -> [u8; DIGEST_LEN] {
        self.context.compute().0
    }
}

/// Digest a byte buffer.
pub fn md5_digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    md5::compute(data).0
}

/// Digest a byte buffer and render it as 32 lowercase hex characters.
pub fn md5_hex(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

/// Render a digest as lowercase hex.
pub fn to_hex(digest: &[u8; DIGEST_LEN]) -> String {
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Digest a file, reading it in 64 KiB blocks.
pub fn file_md5(path: &Path) -> Result<[u8; DIGEST_LEN], StageError> {
    let mut file = File::open(path).map_err(|e| StageError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut buffer = [0u8; 65536];
    let mut hasher = Md5Hasher::new();
    loop {
        match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buffer[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(StageError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        }
    }

    Ok(hasher.finalize())
}
