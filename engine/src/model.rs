//! Core data model for staging batches.
//!
//! This module defines the records produced and consumed by the staging engine:
//! - StagedFile: one source file waiting for the next commit
//! - CommitReport / RemoveReport: per-entry outcomes of the batch operations
//! - StagingState, CopyState, EntryState, RemoveMode: enums controlling and describing behavior

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// A single source file accumulated by `StagingSet::add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFile {
    /// Unique identifier for this entry
    pub id: Uuid,

    /// Base path and relative name concatenated verbatim
    pub source_path: PathBuf,

    /// Name the file receives inside the target directory
    pub file_name: String,

    /// When the entry was added
    pub added_at: DateTime<Utc>,
}

/// The observable state of a staging set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagingState {
    /// Nothing staged
    Empty,
    /// At least one file staged since the last commit
    Accumulating,
}

/// Outcome of creating the commit target directory.
///
/// Creation failures never abort a commit; they are only recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectoryPreparation {
    Created,
    AlreadyExisted,
    Failed {
        error_code: Option<u32>,
        error_message: String,
    },
}

/// What kind of entry a directory clear found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
}

/// What happened to an entry during a directory clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryState {
    /// Deleted
    Removed,
    /// Left in place (a subdirectory under a single-level clear)
    Retained,
    /// Deletion was attempted and failed
    Failed,
}

/// One direct child of a directory visited by a clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOutcome {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub state: EntryState,
    /// OS error code if state is Failed
    pub error_code: Option<u32>,
    pub error_message: Option<String>,
}

/// The state of one staged file after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyState {
    /// Copied into the target directory
    Done,
    /// Not copied; see `SkipReason`
    Skipped,
}

/// Why a staged file was not copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Source missing or unreadable
    SourceUnavailable,
    /// Destination could not be created
    DestinationUnavailable,
    /// An I/O error interrupted the byte stream; the destination may be partial
    CopyInterrupted,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::SourceUnavailable => write!(f, "source unavailable"),
            SkipReason::DestinationUnavailable => write!(f, "destination unavailable"),
            SkipReason::CopyInterrupted => write!(f, "copy interrupted"),
        }
    }
}

/// Result of copying one staged file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyOutcome {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub state: CopyState,
    pub reason: Option<SkipReason>,
    pub bytes_copied: u64,
    pub error_code: Option<u32>,
    pub error_message: Option<String>,
}

/// Everything a commit did, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    /// Identifier of the batch that was drained
    pub batch_id: Uuid,

    /// Directory the batch was copied into
    pub target_dir: PathBuf,

    /// Step 1 outcome
    pub directory: DirectoryPreparation,

    /// Step 2 outcomes, one per pre-existing entry
    pub cleared: Vec<EntryOutcome>,

    /// Step 3 outcomes, in staging order
    pub copied: Vec<CopyOutcome>,

    /// Sum of bytes written for Done entries
    pub bytes_copied: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CommitReport {
    pub fn copied_count(&self) -> usize {
        self.copied.iter().filter(|c| c.state == CopyState::Done).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.copied.iter().filter(|c| c.state == CopyState::Skipped).count()
    }

    /// True if every staged file was copied.
    pub fn is_complete(&self) -> bool {
        self.skipped_count() == 0
    }
}

/// How `remove_directory` treats subdirectories of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RemoveMode {
    /// Delete direct file children only; subdirectories survive and the
    /// final directory removal then fails
    #[default]
    SingleLevel,
    /// Delete subdirectories together with their contents
    Recursive,
}

impl std::fmt::Display for RemoveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoveMode::SingleLevel => write!(f, "single-level"),
            RemoveMode::Recursive => write!(f, "recursive"),
        }
    }
}

/// Everything a directory removal did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveReport {
    pub target_dir: PathBuf,
    pub mode: RemoveMode,

    /// One outcome per direct child found (empty if enumeration failed)
    pub cleared: Vec<EntryOutcome>,

    /// True if the target directory no longer exists
    pub directory_removed: bool,

    /// OS error code from the final directory removal, if it failed
    pub error_code: Option<u32>,
    pub error_message: Option<String>,
}
