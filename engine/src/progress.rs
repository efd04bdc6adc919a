//! Progress reporting trait.
//!
//! This module defines the ProgressCallback trait, which decouples the
//! staging engine from any specific front end. The CLI implements it for
//! verbose per-file output.

use std::path::Path;
use crate::model::{CommitReport, CopyOutcome, StagedFile};

/// Trait for receiving progress updates from a commit.
///
/// All methods are called synchronously on the committing thread.
pub trait ProgressCallback: Send {
    /// Called after the target directory is prepared and cleared, before any copy.
    fn on_commit_started(&self, target_dir: &Path, staged: &[StagedFile]);

    /// Called when a staged file is about to be copied.
    fn on_file_started(&self, file_index: usize, file: &StagedFile);

    /// Called when a staged file is done (copied or skipped).
    fn on_file_completed(&self, file_index: usize, outcome: &CopyOutcome);

    /// Called once the staging set has been reset.
    fn on_commit_completed(&self, report: &CommitReport);
}
