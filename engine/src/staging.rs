//! Staging set orchestration.
//!
//! This module provides the staging lifecycle:
//! - Accumulating source files with `StagingSet::add`
//! - Committing them into a freshly cleared directory with `StagingSet::commit`
//! - The stateless `file_exists` query and `remove_directory` operation
//!
//! A `StagingSet` is an ordinary caller-owned value. Callers that need to
//! share one batch across threads use `SharedStagingSet`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;
use crate::error::{require_non_empty, StageError};
use crate::fs_ops;
use crate::model::{
    CommitReport, CopyOutcome, CopyState, RemoveMode, RemoveReport, SkipReason, StagedFile,
    StagingState,
};
use crate::paths;
use crate::progress::ProgressCallback;

/// An ordered batch of source files waiting to be copied.
///
/// Insertion order is preserved and duplicates are kept. Every commit drains
/// the set, whatever happened to the individual copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingSet {
    batch_id: Uuid,
    created_at: DateTime<Utc>,
    files: Vec<StagedFile>,
}

impl Default for StagingSet {
    fn default() -> Self {
        Self::new()
    }
}

impl StagingSet {
    /// Create an empty staging set with a fresh batch id.
    pub fn new() -> Self {
        StagingSet {
            batch_id: Uuid::new_v4(),
            created_at: Utc::now(),
            files: Vec::new(),
        }
    }

    /// Identifier of the batch currently accumulating.
    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn state(&self) -> StagingState {
        if self.files.is_empty() {
            StagingState::Empty
        } else {
            StagingState::Accumulating
        }
    }

    /// Staged files in insertion order.
    pub fn entries(&self) -> &[StagedFile] {
        &self.files
    }

    /// Drop every staged file without copying anything.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Stage `base_path + relative_name`.
    ///
    /// The two strings are concatenated verbatim: no separator is inserted
    /// and the file is not required to exist. The name the file will carry in
    /// the target directory is the final component of the concatenation.
    ///
    /// # Errors
    /// `EmptyArgument` if either argument is empty, `InvalidFileName` if the
    /// concatenation ends in a separator or a `.`/`..` component.
    pub fn add(&mut self, base_path: &str, relative_name: &str) -> Result<&StagedFile, StageError> {
        require_non_empty("base_path", base_path)?;
        require_non_empty("relative_name", relative_name)?;

        let source = format!("{}{}", base_path, relative_name);
        let file_name = paths::final_component(&source)
            .ok_or_else(|| StageError::InvalidFileName {
                path: source.clone(),
                reason: "path does not end in a file name".to_string(),
            })?
            .to_string();

        debug!(batch_id = %self.batch_id, source = %source, file_name = %file_name, "staged file");

        self.files.push(StagedFile {
            id: Uuid::new_v4(),
            source_path: PathBuf::from(source),
            file_name,
            added_at: Utc::now(),
        });

        Ok(&self.files[self.files.len() - 1])
    }

    /// Copy every staged file into `base_path`/`dir_name` and reset the set.
    ///
    /// See `commit_with_progress`.
    pub fn commit(&mut self, base_path: &str, dir_name: &str) -> Result<CommitReport, StageError> {
        self.commit_with_progress(base_path, dir_name, None)
    }

    /// Copy every staged file into `base_path`/`dir_name` and reset the set.
    ///
    /// 1. Create the target directory (one level; failure is recorded only).
    /// 2. Delete every file directly inside it; subdirectories are retained.
    /// 3. Copy each staged file to `target/<file_name>`, skipping any whose
    ///    source or destination cannot be opened.
    /// 4. The set is empty afterwards, however many copies were skipped.
    ///
    /// # Errors
    /// Only argument errors are returned, and they are checked before any
    /// filesystem work, leaving the set untouched.
    pub fn commit_with_progress(
        &mut self,
        base_path: &str,
        dir_name: &str,
        progress_callback: Option<&dyn ProgressCallback>,
    ) -> Result<CommitReport, StageError> {
        require_non_empty("base_path", base_path)?;
        require_non_empty("dir_name", dir_name)?;

        let started_at = Utc::now();
        let target_dir = paths::compose_target_dir(base_path, dir_name);
        let batch_id = self.batch_id;

        // Drain now so the reset holds on every exit path
        let staged = std::mem::take(&mut self.files);
        self.batch_id = Uuid::new_v4();
        self.created_at = started_at;

        info!(batch_id = %batch_id, dir = %target_dir.display(), files = staged.len(), "committing batch");

        let directory = fs_ops::create_dir_lenient(&target_dir);

        let cleared = match fs_ops::clear_directory(&target_dir, RemoveMode::SingleLevel) {
            Ok(outcomes) => outcomes,
            Err(e) => {
                let err = StageError::EnumerationFailed {
                    path: target_dir.clone(),
                    source: e,
                };
                warn!(error = %err.detailed_message(), "target directory not cleared");
                Vec::new()
            }
        };

        if let Some(callback) = progress_callback {
            callback.on_commit_started(&target_dir, &staged);
        }

        let mut copied = Vec::with_capacity(staged.len());
        let mut bytes_copied = 0;

        for (file_index, file) in staged.iter().enumerate() {
            if let Some(callback) = progress_callback {
                callback.on_file_started(file_index, file);
            }

            let outcome = copy_staged_file(file, &target_dir);
            bytes_copied += outcome.bytes_copied;

            if let Some(callback) = progress_callback {
                callback.on_file_completed(file_index, &outcome);
            }
            copied.push(outcome);
        }

        let report = CommitReport {
            batch_id,
            target_dir,
            directory,
            cleared,
            copied,
            bytes_copied,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            batch_id = %batch_id,
            copied = report.copied_count(),
            skipped = report.skipped_count(),
            bytes = report.bytes_copied,
            "batch committed"
        );

        if let Some(callback) = progress_callback {
            callback.on_commit_completed(&report);
        }

        Ok(report)
    }
}

fn copy_staged_file(file: &StagedFile, target_dir: &Path) -> CopyOutcome {
    let destination_path = target_dir.join(&file.file_name);

    match fs_ops::copy_file_with_metadata(&file.source_path, &destination_path) {
        Ok(bytes_copied) => CopyOutcome {
            source_path: file.source_path.clone(),
            destination_path,
            state: CopyState::Done,
            reason: None,
            bytes_copied,
            error_code: None,
            error_message: None,
        },
        Err(e) => {
            let reason = match &e {
                StageError::ReadError { .. } => SkipReason::SourceUnavailable,
                StageError::WriteError { .. } => SkipReason::DestinationUnavailable,
                _ => SkipReason::CopyInterrupted,
            };
            warn!(
                source = %file.source_path.display(),
                reason = %reason,
                error = %e.detailed_message(),
                "skipping staged file"
            );
            CopyOutcome {
                source_path: file.source_path.clone(),
                destination_path,
                state: CopyState::Skipped,
                reason: Some(reason),
                bytes_copied: 0,
                error_code: e.raw_os_error(),
                error_message: Some(e.detailed_message()),
            }
        }
    }
}

/// True if an entry named `file_name` exists directly under `base_path`.
///
/// A separator is appended to `base_path` when missing. Empty arguments and
/// paths that cannot be queried yield `false`.
pub fn file_exists(file_name: &str, base_path: &str) -> bool {
    if file_name.is_empty() || base_path.is_empty() {
        return false;
    }
    let path = paths::join_with_trailing_separator(base_path, file_name);
    path.try_exists().unwrap_or(false)
}

/// Clear `base_path`/`dir_name` and remove it.
///
/// Under `RemoveMode::SingleLevel` only direct file children are deleted, so
/// a target holding a subdirectory survives the call. A missing target is
/// not an error; the report says `directory_removed: true` because nothing
/// is left.
///
/// # Errors
/// Only argument errors are returned.
pub fn remove_directory(
    base_path: &str,
    dir_name: &str,
    mode: RemoveMode,
) -> Result<RemoveReport, StageError> {
    require_non_empty("base_path", base_path)?;
    require_non_empty("dir_name", dir_name)?;

    let target_dir = paths::compose_target_dir(base_path, dir_name);
    debug!(dir = %target_dir.display(), %mode, "removing directory");

    let cleared = match fs_ops::clear_directory(&target_dir, mode) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            let err = StageError::EnumerationFailed {
                path: target_dir.clone(),
                source: e,
            };
            debug!(error = %err.detailed_message(), "skipping straight to directory removal");
            Vec::new()
        }
    };

    let (error_code, error_message) = match fs::remove_dir(&target_dir) {
        Ok(()) => (None, None),
        Err(e) => {
            let err = StageError::RemoveFailed {
                path: target_dir.clone(),
                source: e,
            };
            warn!(dir = %target_dir.display(), error = %err.detailed_message(), "directory not removed");
            (err.raw_os_error(), Some(err.detailed_message()))
        }
    };

    let directory_removed = !target_dir.exists();

    Ok(RemoveReport {
        target_dir,
        mode,
        cleared,
        directory_removed,
        error_code,
        error_message,
    })
}

/// A cloneable, thread-safe handle to one staging set.
#[derive(Debug, Clone, Default)]
pub struct SharedStagingSet {
    inner: Arc<Mutex<StagingSet>>,
}

impl SharedStagingSet {
    pub fn new(set: StagingSet) -> Self {
        SharedStagingSet {
            inner: Arc::new(Mutex::new(set)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StagingSet> {
        // A panic while holding the lock cannot leave the Vec half-updated
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add(&self, base_path: &str, relative_name: &str) -> Result<StagedFile, StageError> {
        self.lock().add(base_path, relative_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn state(&self) -> StagingState {
        self.lock().state()
    }

    /// Copy of the staged entries at this moment.
    pub fn snapshot(&self) -> StagingSet {
        self.lock().clone()
    }

    /// Commit while holding the lock; concurrent `add` calls wait.
    pub fn commit(
        &self,
        base_path: &str,
        dir_name: &str,
        progress_callback: Option<&dyn ProgressCallback>,
    ) -> Result<CommitReport, StageError> {
        self.lock().commit_with_progress(base_path, dir_name, progress_callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DirectoryPreparation, EntryState};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn base(dir: &Path) -> String {
        format!("{}/", dir.display())
    }

    #[test]
    fn test_add_concatenates_verbatim() {
        let mut set = StagingSet::new();
        let staged = set.add("/data/", "a.txt").expect("Failed to add").clone();
        assert_eq!(staged.source_path, PathBuf::from("/data/a.txt"));
        assert_eq!(staged.file_name, "a.txt");

        // No separator inserted
        let staged = set.add("/data", "b.txt").expect("Failed to add").clone();
        assert_eq!(staged.source_path.to_string_lossy(), "/datab.txt");
        assert_eq!(staged.file_name, "datab.txt");
    }

    #[test]
    fn test_add_keeps_order_and_duplicates() {
        let mut set = StagingSet::new();
        assert_eq!(set.state(), StagingState::Empty);
        set.add("/data/", "a.txt").expect("Failed to add");
        assert_eq!(set.state(), StagingState::Accumulating);
        set.add("/data/", "b.txt").expect("Failed to add");
        set.add("/data/", "a.txt").expect("Failed to add");

        let names: Vec<_> = set.entries().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt", "a.txt"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_add_relative_subpath_uses_final_component() {
        let mut set = StagingSet::new();
        let staged = set.add("/data/", "sub/c.bin").expect("Failed to add");
        assert_eq!(staged.file_name, "c.bin");
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut set = StagingSet::new();
        assert!(matches!(set.add("", "a.txt"), Err(StageError::EmptyArgument { name: "base_path" })));
        assert!(matches!(set.add("/data/", ""), Err(StageError::EmptyArgument { name: "relative_name" })));
        assert!(matches!(set.add("/data/", "sub/"), Err(StageError::InvalidFileName { .. })));
        assert!(set.is_empty());
    }

    #[test]
    fn test_file_exists_with_and_without_separator() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("present.txt"), b"x").expect("Failed to write file");
        let plain = temp_dir.path().to_string_lossy().to_string();

        assert!(file_exists("present.txt", &plain));
        assert!(file_exists("present.txt", &format!("{}/", plain)));
        assert!(!file_exists("absent.txt", &plain));
        assert!(!file_exists("", &plain));
        assert!(!file_exists("present.txt", ""));
    }

    #[test]
    fn test_file_exists_matches_directories() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("sub")).expect("Failed to create sub");
        assert!(file_exists("sub", &temp_dir.path().to_string_lossy()));
    }

    #[test]
    fn test_commit_scenario_replaces_old_contents() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data = temp_dir.path().join("data");
        let out = temp_dir.path().join("out");
        fs::create_dir(&data).expect("Failed to create data");
        fs::create_dir_all(out.join("batch1")).expect("Failed to create batch1");
        fs::write(data.join("a.txt"), b"alpha").expect("Failed to write a.txt");
        fs::write(data.join("b.txt"), b"bravo bytes").expect("Failed to write b.txt");
        fs::write(out.join("batch1").join("old.tmp"), b"stale").expect("Failed to write old.tmp");

        let mut set = StagingSet::new();
        set.add(&base(&data), "a.txt").expect("Failed to add a");
        set.add(&base(&data), "b.txt").expect("Failed to add b");
        let batch_id = set.batch_id();

        let report = set.commit(&base(&out), "batch1").expect("Commit failed");

        let batch1 = out.join("batch1");
        assert!(!batch1.join("old.tmp").exists());
        assert_eq!(fs::read(batch1.join("a.txt")).expect("read a"), b"alpha");
        assert_eq!(fs::read(batch1.join("b.txt")).expect("read b"), b"bravo bytes");
        assert!(set.is_empty());
        assert_ne!(set.batch_id(), batch_id);

        assert_eq!(report.batch_id, batch_id);
        assert_eq!(report.directory, DirectoryPreparation::AlreadyExisted);
        assert_eq!(report.cleared.len(), 1);
        assert_eq!(report.cleared[0].state, EntryState::Removed);
        assert_eq!(report.copied_count(), 2);
        assert!(report.is_complete());
        assert_eq!(report.bytes_copied, 16);
    }

    #[test]
    fn test_commit_continues_past_missing_source() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data = temp_dir.path().join("data");
        fs::create_dir(&data).expect("Failed to create data");
        fs::write(data.join("present.txt"), b"here").expect("Failed to write file");

        let mut set = StagingSet::new();
        set.add(&base(&data), "missing.txt").expect("Failed to add");
        set.add(&base(&data), "present.txt").expect("Failed to add");

        let report = set
            .commit(&temp_dir.path().to_string_lossy(), "out")
            .expect("Commit should not fail on a missing source");

        assert_eq!(report.directory, DirectoryPreparation::Created);
        assert_eq!(report.copied_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.copied[0].reason, Some(SkipReason::SourceUnavailable));
        assert!(report.copied[0].error_message.is_some());
        assert!(!temp_dir.path().join("out").join("missing.txt").exists());
        assert!(temp_dir.path().join("out").join("present.txt").exists());
        assert!(set.is_empty());
    }

    #[test]
    fn test_commit_into_uncreatable_directory_still_resets() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data = temp_dir.path().join("data");
        fs::create_dir(&data).expect("Failed to create data");
        fs::write(data.join("a.txt"), b"a").expect("Failed to write file");

        let mut set = StagingSet::new();
        set.add(&base(&data), "a.txt").expect("Failed to add");

        // Parent missing: creation is not recursive
        let missing_parent = temp_dir.path().join("nope");
        let report = set
            .commit(&missing_parent.to_string_lossy(), "batch")
            .expect("Commit should be best-effort");

        assert!(matches!(report.directory, DirectoryPreparation::Failed { .. }));
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.copied[0].reason, Some(SkipReason::DestinationUnavailable));
        assert!(set.is_empty());
    }

    #[test]
    fn test_commit_empty_set_still_prepares_directory() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let target = temp_dir.path().join("batch");
        fs::create_dir(&target).expect("Failed to create batch");
        fs::write(target.join("old.tmp"), b"old").expect("Failed to write old.tmp");
        fs::create_dir(target.join("keep")).expect("Failed to create keep");

        let mut set = StagingSet::new();
        let report = set
            .commit(&temp_dir.path().to_string_lossy(), "batch")
            .expect("Commit failed");

        assert!(report.copied.is_empty());
        assert!(!target.join("old.tmp").exists());
        assert!(target.join("keep").is_dir());
        assert_eq!(set.state(), StagingState::Empty);

        // Second run on a fresh directory creates it
        let report = set
            .commit(&temp_dir.path().to_string_lossy(), "fresh")
            .expect("Commit failed");
        assert_eq!(report.directory, DirectoryPreparation::Created);
        assert!(temp_dir.path().join("fresh").is_dir());
    }

    #[test]
    fn test_commit_duplicate_names_last_write_wins() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        fs::create_dir(&first).expect("Failed to create first");
        fs::create_dir(&second).expect("Failed to create second");
        fs::write(first.join("same.txt"), b"one").expect("Failed to write");
        fs::write(second.join("same.txt"), b"two").expect("Failed to write");

        let mut set = StagingSet::new();
        set.add(&base(&first), "same.txt").expect("Failed to add");
        set.add(&base(&second), "same.txt").expect("Failed to add");

        let report = set
            .commit(&temp_dir.path().to_string_lossy(), "out")
            .expect("Commit failed");

        assert_eq!(report.copied_count(), 2);
        assert_eq!(fs::read(temp_dir.path().join("out").join("same.txt")).expect("read"), b"two");
    }

    #[test]
    fn test_commit_argument_error_keeps_set() {
        let mut set = StagingSet::new();
        set.add("/data/", "a.txt").expect("Failed to add");
        assert!(set.commit("", "batch").is_err());
        assert!(set.commit("/out", "").is_err());
        assert_eq!(set.len(), 1);
    }

    struct CountingProgress {
        started: AtomicUsize,
        completed: AtomicUsize,
        finished: AtomicUsize,
    }

    impl ProgressCallback for CountingProgress {
        fn on_commit_started(&self, _target_dir: &Path, staged: &[StagedFile]) {
            assert_eq!(staged.len(), 2);
        }

        fn on_file_started(&self, _file_index: usize, _file: &StagedFile) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_completed(&self, _file_index: usize, _outcome: &CopyOutcome) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }

        fn on_commit_completed(&self, report: &CommitReport) {
            assert_eq!(report.copied.len(), 2);
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_commit_reports_progress() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("a.txt"), b"a").expect("Failed to write");

        let mut set = StagingSet::new();
        set.add(&base(temp_dir.path()), "a.txt").expect("Failed to add");
        set.add(&base(temp_dir.path()), "missing.txt").expect("Failed to add");

        let progress = CountingProgress {
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        };
        set.commit_with_progress(&temp_dir.path().to_string_lossy(), "out", Some(&progress))
            .expect("Commit failed");

        assert_eq!(progress.started.load(Ordering::SeqCst), 2);
        assert_eq!(progress.completed.load(Ordering::SeqCst), 2);
        assert_eq!(progress.finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_directory_with_only_files() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let target = temp_dir.path().join("batch");
        fs::create_dir(&target).expect("Failed to create batch");
        fs::write(target.join("a.txt"), b"a").expect("Failed to write");
        fs::write(target.join("b.txt"), b"b").expect("Failed to write");

        let report = remove_directory(&temp_dir.path().to_string_lossy(), "batch", RemoveMode::SingleLevel)
            .expect("Remove failed");

        assert!(report.directory_removed);
        assert!(report.error_message.is_none());
        assert_eq!(report.cleared.len(), 2);
        assert!(!target.exists());
    }

    #[test]
    fn test_remove_directory_single_level_keeps_subdirectory() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let target = temp_dir.path().join("batch");
        fs::create_dir_all(target.join("nested")).expect("Failed to create nested");
        fs::write(target.join("a.txt"), b"a").expect("Failed to write");
        fs::write(target.join("nested").join("n.txt"), b"n").expect("Failed to write");

        let report = remove_directory(&temp_dir.path().to_string_lossy(), "/batch", RemoveMode::SingleLevel)
            .expect("Remove failed");

        assert!(!report.directory_removed);
        assert!(report.error_message.is_some());
        assert!(!target.join("a.txt").exists());
        assert!(target.join("nested").join("n.txt").exists());
    }

    #[test]
    fn test_remove_directory_recursive() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let target = temp_dir.path().join("batch");
        fs::create_dir_all(target.join("nested").join("deeper")).expect("Failed to create nested");
        fs::write(target.join("nested").join("n.txt"), b"n").expect("Failed to write");

        let report = remove_directory(&base(temp_dir.path()), "batch", RemoveMode::Recursive)
            .expect("Remove failed");

        assert!(report.directory_removed);
        assert!(!target.exists());
    }

    #[test]
    fn test_remove_missing_directory_is_quiet() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let report = remove_directory(&temp_dir.path().to_string_lossy(), "absent", RemoveMode::SingleLevel)
            .expect("Remove should not fail for a missing directory");

        assert!(report.cleared.is_empty());
        assert!(report.directory_removed);
        assert!(report.error_message.is_some());
    }

    #[test]
    fn test_remove_directory_rejects_empty_arguments() {
        assert!(remove_directory("", "batch", RemoveMode::SingleLevel).is_err());
        assert!(remove_directory("/out", "", RemoveMode::SingleLevel).is_err());
    }

    #[test]
    fn test_shared_set_accepts_concurrent_adds() {
        let shared = SharedStagingSet::default();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        shared
                            .add("/data/", &format!("t{}-{}.txt", t, i))
                            .expect("Failed to add");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(shared.len(), 100);

        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let report = shared
            .commit(&temp_dir.path().to_string_lossy(), "out", None)
            .expect("Commit failed");
        assert_eq!(report.skipped_count(), 100);
        assert!(shared.is_empty());
    }

    #[test]
    fn test_staging_set_serde_round_trip() {
        let mut set = StagingSet::new();
        set.add("/data/", "a.txt").expect("Failed to add");
        let json = serde_json::to_string(&set).expect("Failed to serialize");
        let restored: StagingSet = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(restored, set);
    }
}
