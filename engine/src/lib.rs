//! # FileStage Engine - File Staging Library
//!
//! A small, headless library for assembling a directory out of individually
//! chosen files.
//!
//! ## Overview
//!
//! Callers accumulate source files in a `StagingSet`, then commit the batch
//! into a target directory. A commit:
//! - Creates the target directory (one level)
//! - Deletes the files already inside it (subdirectories are left alone)
//! - Copies every staged file in, continuing past individual failures
//! - Leaves the staging set empty
//!
//! Nothing is archived or compressed: the result is a plain directory of
//! byte-identical copies. Per-file outcomes come back in a `CommitReport`.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use filestage::{file_exists, remove_directory, RemoveMode, StagingSet};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut set = StagingSet::new();
//! set.add("/data/", "a.txt")?;
//! set.add("/data/", "b.txt")?;
//!
//! let report = set.commit("/out", "batch1")?;
//! println!("{} copied, {} skipped", report.copied_count(), report.skipped_count());
//! assert!(set.is_empty());
//!
//! assert!(file_exists("a.txt", "/out/batch1"));
//! remove_directory("/out", "batch1", RemoveMode::SingleLevel)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Staged entries, reports and enums
//! - **error**: Error types and handling
//! - **paths**: Path composition rules
//! - **fs_ops**: Low-level filesystem operations
//! - **staging**: Staging set lifecycle (add, commit, exists, remove)
//! - **progress**: Progress callback trait
//! - **digest**: MD5 digest service
//! - **codec**: Gzip compression service

pub mod model;
pub mod error;
pub mod paths;
pub mod fs_ops;
pub mod staging;
pub mod progress;
pub mod digest;
pub mod codec;

// Re-export main types and functions
pub use model::{
    CommitReport, CopyOutcome, CopyState, DirectoryPreparation, EntryKind, EntryOutcome,
    EntryState, RemoveMode, RemoveReport, SkipReason, StagedFile, StagingState,
};
pub use error::StageError;
pub use staging::{file_exists, remove_directory, SharedStagingSet, StagingSet};
pub use progress::ProgressCallback;
pub use digest::{file_md5, md5_digest, md5_hex};
pub use codec::{gunzip_file, gzip_compress, gzip_decompress, gzip_file};
