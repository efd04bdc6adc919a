//! FileStage - Command-line interface for the staging engine.
//!
//! Stages files across several invocations (the batch lives in a JSON
//! manifest), commits them into a directory, and exposes the digest and
//! gzip services.

mod manifest;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use filestage::{
    codec, digest, file_exists, remove_directory, CommitReport, CopyOutcome, CopyState,
    EntryState, ProgressCallback, RemoveMode, RemoveReport, StagedFile,
};
use tracing_subscriber::EnvFilter;

/// FileStage - stage files, then copy them into one directory
#[derive(Parser, Debug)]
#[command(name = "filestage")]
#[command(version = "0.1.0")]
#[command(about = "Stage files and copy them into a directory in one batch")]
struct Args {
    /// Manifest file that carries the staging set between invocations
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "FILESTAGE_MANIFEST",
        default_value = ".filestage.json"
    )]
    manifest: PathBuf,

    /// Enable per-file output and debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stage BASE+NAME for each NAME (concatenated verbatim)
    Add {
        #[arg(long, value_name = "PATH")]
        base: String,

        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,
    },

    /// Show the staged files
    List,

    /// Exit 0 if NAME exists under BASE, 1 otherwise
    Exists {
        #[arg(long, value_name = "PATH")]
        base: String,

        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Clear BASE/DIR and copy every staged file into it
    Commit {
        #[arg(long, value_name = "PATH")]
        base: String,

        #[arg(long, value_name = "NAME")]
        dir: String,

        /// Print the commit report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Delete the files in BASE/DIR, then the directory itself
    Remove {
        #[arg(long, value_name = "PATH")]
        base: String,

        #[arg(long, value_name = "NAME")]
        dir: String,

        /// Also delete nested subdirectories
        #[arg(long)]
        recursive: bool,

        /// Print the removal report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Compress a file with gzip at maximum level
    Gzip(CodecArgs),

    /// Decompress a gzip file
    Gunzip(CodecArgs),

    /// Print the MD5 digest of a file or of literal text
    Md5 {
        #[arg(value_name = "FILE", conflicts_with = "text")]
        file: Option<PathBuf>,

        #[arg(long, value_name = "TEXT")]
        text: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct CodecArgs {
    #[arg(long, value_name = "FILE")]
    input: PathBuf,

    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

/// CLI implementation of ProgressCallback for displaying commit progress
struct CliProgress {
    verbose: bool,
}

impl CliProgress {
    fn new(verbose: bool) -> Self {
        CliProgress { verbose }
    }

    fn format_bytes(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_idx = 0;

        while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
            size /= 1024.0;
            unit_idx += 1;
        }

        format!("{:.2} {}", size, UNITS[unit_idx])
    }

    fn format_duration(report: &CommitReport) -> String {
        let millis = (report.finished_at - report.started_at).num_milliseconds().max(0);
        if millis >= 1000 {
            format!("{:.1}s", millis as f64 / 1000.0)
        } else {
            format!("{}ms", millis)
        }
    }

    fn display_name(path: &Path) -> &str {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("(unknown)")
    }
}

impl ProgressCallback for CliProgress {
    fn on_commit_started(&self, target_dir: &Path, staged: &[StagedFile]) {
        eprintln!("Committing batch...");
        eprintln!("  Target: {}", target_dir.display());
        eprintln!("  Files: {}", staged.len());
        eprintln!();
    }

    fn on_file_started(&self, file_index: usize, file: &StagedFile) {
        if self.verbose {
            eprintln!("[{:3}] Copying: {}", file_index, file.source_path.display());
        }
    }

    fn on_file_completed(&self, file_index: usize, outcome: &CopyOutcome) {
        if self.verbose {
            let name = Self::display_name(&outcome.destination_path);
            match (outcome.state, outcome.reason) {
                (CopyState::Done, _) => eprintln!("[{:3}] Done: {}", file_index, name),
                (CopyState::Skipped, Some(reason)) => {
                    eprintln!("[{:3}] Skipped ({}): {}", file_index, reason, name)
                }
                (CopyState::Skipped, None) => eprintln!("[{:3}] Skipped: {}", file_index, name),
            }
        }
    }

    fn on_commit_completed(&self, report: &CommitReport) {
        let removed = report
            .cleared
            .iter()
            .filter(|e| e.state == EntryState::Removed)
            .count();

        eprintln!("Commit complete!");
        eprintln!(
            "Summary: {} copied, {} skipped, {} old files removed",
            report.copied_count(),
            report.skipped_count(),
            removed
        );
        eprintln!("Bytes copied: {}", Self::format_bytes(report.bytes_copied));
        eprintln!("Elapsed: {}", Self::format_duration(report));

        if report.skipped_count() > 0 {
            eprintln!();
            eprintln!("Skipped files:");
            for outcome in report.copied.iter().filter(|c| c.state == CopyState::Skipped) {
                let message = outcome.error_message.as_deref().unwrap_or("(unknown error)");
                eprintln!("  {}: {}", outcome.source_path.display(), message);
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "filestage=debug,filestage_cli=debug"
    } else {
        "filestage=warn,filestage_cli=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Ignore a second init (tests run several commands in one process)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Parse command-line arguments, then run the selected command
fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let exit_code = match run_cli(&args) {
        Ok(code) => code,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Main CLI logic - separated for testability.
///
/// Returns the process exit code: 0 on success, 1 for a negative `exists`
/// answer or a commit that skipped files.
fn run_cli(args: &Args) -> Result<i32, String> {
    match &args.command {
        Command::Add { base, names } => {
            let mut set = manifest::load(&args.manifest)?;
            for name in names {
                let staged = set
                    .add(base, name)
                    .map_err(|e| format!("Cannot stage '{}': {}", name, e))?;
                if args.verbose {
                    eprintln!("Staged: {} as {}", staged.source_path.display(), staged.file_name);
                }
            }
            manifest::save(&args.manifest, &set)?;
            eprintln!("{} file(s) staged", set.len());
            Ok(0)
        }

        Command::List => {
            let set = manifest::load(&args.manifest)?;
            if set.is_empty() {
                eprintln!("Nothing staged");
            }
            for (index, file) in set.entries().iter().enumerate() {
                println!(
                    "[{:3}] {} -> {} (added {})",
                    index,
                    file.source_path.display(),
                    file.file_name,
                    file.added_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
            Ok(0)
        }

        Command::Exists { base, name } => {
            let exists = file_exists(name, base);
            println!("{}", exists);
            Ok(if exists { 0 } else { 1 })
        }

        Command::Commit { base, dir, json } => {
            let mut set = manifest::load(&args.manifest)?;
            let progress = CliProgress::new(args.verbose);
            let callback: Option<&dyn ProgressCallback> = if *json { None } else { Some(&progress) };

            let report = set
                .commit_with_progress(base, dir, callback)
                .map_err(|e| format!("Commit failed: {}", e))?;
            manifest::save(&args.manifest, &set)?;

            if *json {
                let out = serde_json::to_string_pretty(&report)
                    .map_err(|e| format!("Cannot serialize report: {}", e))?;
                println!("{}", out);
            }

            Ok(if report.is_complete() { 0 } else { 1 })
        }

        Command::Remove { base, dir, recursive, json } => {
            let mode = if *recursive {
                RemoveMode::Recursive
            } else {
                RemoveMode::SingleLevel
            };
            let report = remove_directory(base, dir, mode)
                .map_err(|e| format!("Remove failed: {}", e))?;

            if *json {
                let out = serde_json::to_string_pretty(&report)
                    .map_err(|e| format!("Cannot serialize report: {}", e))?;
                println!("{}", out);
            } else {
                print_remove_summary(&report);
            }

            Ok(if report.directory_removed { 0 } else { 1 })
        }

        Command::Gzip(codec_args) => {
            let written = codec::gzip_file(&codec_args.input, &codec_args.output)
                .map_err(|e| e.detailed_message())?;
            eprintln!("Wrote {} ({})", codec_args.output.display(), CliProgress::format_bytes(written));
            Ok(0)
        }

        Command::Gunzip(codec_args) => {
            let written = codec::gunzip_file(&codec_args.input, &codec_args.output)
                .map_err(|e| e.detailed_message())?;
            eprintln!("Wrote {} ({})", codec_args.output.display(), CliProgress::format_bytes(written));
            Ok(0)
        }

        Command::Md5 { file, text } => {
            let line = match (file, text) {
                (Some(path), _) => {
                    let sum = digest::file_md5(path).map_err(|e| e.detailed_message())?;
                    format!("{}  {}", digest::to_hex(&sum), path.display())
                }
                (None, Some(text)) => digest::md5_hex(text.as_bytes()),
                (None, None) => return Err("Provide a FILE or --text".to_string()),
            };
            println!("{}", line);
            Ok(0)
        }
    }
}

fn print_remove_summary(report: &RemoveReport) {
    let removed = report
        .cleared
        .iter()
        .filter(|e| e.state == EntryState::Removed)
        .count();
    let kept: Vec<_> = report
        .cleared
        .iter()
        .filter(|e| e.state != EntryState::Removed)
        .collect();

    eprintln!("Target: {} ({})", report.target_dir.display(), report.mode);
    eprintln!("Entries removed: {}", removed);
    for entry in &kept {
        eprintln!("  kept {:?}: {}", entry.kind, entry.path.display());
    }
    if report.directory_removed {
        eprintln!("Directory removed");
    } else if let Some(ref msg) = report.error_message {
        eprintln!("Directory not removed: {}", msg);
    }
}
