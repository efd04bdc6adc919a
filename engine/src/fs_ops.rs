//! Filesystem operations module.
//!
//! This module provides the low-level operations behind a commit and a
//! directory removal:
//! - Creating the target directory without failing the batch
//! - Clearing the direct children of a directory
//! - Copying files with metadata preservation

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::error::StageError;
use crate::model::{DirectoryPreparation, EntryKind, EntryOutcome, EntryState, RemoveMode};

/// Create `path` as a single directory level.
///
/// The parent must already exist. Failure is reported in the return value,
/// never as an error.
pub fn create_dir_lenient(path: &Path) -> DirectoryPreparation {
    match fs::create_dir(path) {
        Ok(()) => {
            debug!(path = %path.display(), "created target directory");
            DirectoryPreparation::Created
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => {
            DirectoryPreparation::AlreadyExisted
        }
        Err(e) => {
            let err = StageError::DirectoryCreationFailed {
                path: path.to_path_buf(),
                source: e,
            };
            warn!(path = %path.display(), error = %err.detailed_message(), "target directory not created");
            DirectoryPreparation::Failed {
                error_code: err.raw_os_error(),
                error_message: err.detailed_message(),
            }
        }
    }
}

/// Delete the direct children of `dir`.
///
/// Files are always deleted. Subdirectories are retained under
/// `RemoveMode::SingleLevel` and deleted with their contents under
/// `RemoveMode::Recursive`. Individual failures are recorded and the scan
/// continues.
///
/// # Errors
/// Returns the io::Error if `dir` itself cannot be enumerated.
pub fn clear_directory(dir: &Path, mode: RemoveMode) -> io::Result<Vec<EntryOutcome>> {
    let mut outcomes = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        let outcome = if !is_dir {
            remove_entry(path, EntryKind::File, |p| fs::remove_file(p))
        } else {
            match mode {
                RemoveMode::SingleLevel => {
                    debug!(path = %path.display(), "retaining subdirectory");
                    EntryOutcome {
                        path,
                        kind: EntryKind::Directory,
                        state: EntryState::Retained,
                        error_code: None,
                        error_message: None,
                    }
                }
                RemoveMode::Recursive => {
                    remove_entry(path, EntryKind::Directory, |p| fs::remove_dir_all(p))
                }
            }
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

fn remove_entry(
    path: PathBuf,
    kind: EntryKind,
    remove: impl FnOnce(&Path) -> io::Result<()>,
) -> EntryOutcome {
    match remove(&path) {
        Ok(()) => {
            debug!(path = %path.display(), ?kind, "removed");
            EntryOutcome {
                path,
                kind,
                state: EntryState::Removed,
                error_code: None,
                error_message: None,
            }
        }
        Err(e) => {
            let err = StageError::RemoveFailed {
                path: path.clone(),
                source: e,
            };
            warn!(path = %path.display(), error = %err.detailed_message(), "remove failed");
            EntryOutcome {
                path,
                kind,
                state: EntryState::Failed,
                error_code: err.raw_os_error(),
                error_message: Some(err.detailed_message()),
            }
        }
    }
}

/// Copy a file from source to destination with metadata preservation.
///
/// The source is opened before the destination is created, so a missing
/// source never leaves an empty destination file behind. The destination's
/// parent directory is not created.
///
/// # Returns
/// Number of bytes copied
///
/// # Errors
/// `ReadError` if the source cannot be opened, `WriteError` if the
/// destination cannot be created, `CopyInterrupted` if the byte stream
/// fails part way.
pub fn copy_file_with_metadata(src: &Path, dst: &Path) -> Result<u64, StageError> {
    let mut src_file = fs::File::open(src).map_err(|e| StageError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;

    let src_mtime = src_file.metadata().ok().and_then(|m| m.modified().ok());

    let mut dst_file = fs::File::create(dst).map_err(|e| StageError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let bytes_copied =
        io::copy(&mut src_file, &mut dst_file).map_err(|e| StageError::CopyInterrupted {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            source: e,
        })?;

    // Close the handle before touching the timestamp
    drop(dst_file);

    if let Some(mtime) = src_mtime {
        if let Err(e) = filetime::set_file_mtime(dst, filetime::FileTime::from_system_time(mtime)) {
            debug!(path = %dst.display(), error = %e, "could not preserve modification time");
        }
    }

    Ok(bytes_copied)
}
