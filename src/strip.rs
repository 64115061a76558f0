use ahash::AHashSet;
use anyhow::{Context, Result, anyhow};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::config::Config;
use crate::helpers::{self, emojis::*};
use crate::scanner;

/// Directory that is stripped when no paths are given.
pub const DEFAULT_ROOT: &str = "src";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// No comments, the file was left alone.
    Unchanged,
    /// Comments were removed (or would have been, in check mode).
    Stripped,
}

#[derive(Debug)]
pub struct StripSummary {
    pub processed: usize,
    pub changed: usize,
    /// Set when reading or writing a file failed. Processing stops at the
    /// first failure.
    pub error: Option<anyhow::Error>,
}

/// Strip comments from stdin content. Unterminated constructs are logged.
pub fn strip_stdin(content: &str) -> String {
    let stripped = scanner::strip_with_diagnostics(content);
    for diagnostic in &stripped.diagnostics {
        log::warn!("<stdin>:{}", diagnostic);
    }
    stripped.text
}

/// Strip a single file in place. In check mode nothing is written.
pub fn strip_file(path: &Path, check: bool) -> Result<FileOutcome> {
    let original_content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let stripped = scanner::strip_with_diagnostics(&original_content);

    for diagnostic in &stripped.diagnostics {
        log::warn!("{}:{}", path.display(), diagnostic);
    }

    if stripped.text == original_content {
        return Ok(FileOutcome::Unchanged);
    }

    if !check {
        log::debug!("Writing {}", path.display());
        fs::write(path, &stripped.text).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(FileOutcome::Stripped)
}

/// Strip a list of files in parallel.
///
/// - `check`: if true, only check (don't write)
/// - `on_file`: called after each file has been processed
pub fn strip_files(
    files: &[PathBuf],
    check: bool,
    on_file: &(dyn Fn(&Path, FileOutcome) + Send + Sync),
) -> StripSummary {
    let batch_size = 4 * num_cpus::get();
    let processed_count = AtomicUsize::new(0);
    let changed_count = AtomicUsize::new(0);

    let result: Result<()> = files.par_chunks(batch_size).try_for_each(|batch| {
        batch.iter().try_for_each(|file| {
            let outcome = strip_file(file, check)?;
            if outcome == FileOutcome::Stripped {
                changed_count.fetch_add(1, Ordering::SeqCst);
            }
            processed_count.fetch_add(1, Ordering::SeqCst);
            on_file(file, outcome);
            Ok(())
        })
    });

    StripSummary {
        processed: processed_count.load(Ordering::SeqCst),
        changed: changed_count.load(Ordering::SeqCst),
        error: result.err(),
    }
}

fn matches_filter(filter: &Option<Regex>, name: &str) -> bool {
    match filter {
        Some(filter) => filter.is_match(name),
        None => true,
    }
}

fn read_folder(
    path: &Path,
    extensions: &AHashSet<String>,
    ignored: &AHashSet<String>,
    filter: &Option<Regex>,
    files: &mut Vec<PathBuf>,
) -> io::Result<()> {
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        // Symlinked directories are not followed, so the walk cannot loop.
        if entry.file_type()?.is_dir() {
            if ignored.contains(&name) {
                log::debug!("Ignoring {}", entry_path.display());
                continue;
            }
            if let Err(e) = read_folder(&entry_path, extensions, ignored, filter, files) {
                log::error!("Could not read directory {}: {}", entry_path.display(), e);
            }
        } else if entry_path.is_file() && helpers::has_source_extension(&entry_path, extensions) {
            if matches_filter(filter, &name) {
                files.push(entry_path);
            } else {
                log::debug!("Filtered {}", name);
            }
        }
    }

    Ok(())
}

/// Recursively collect all source files below `root`, sorted by path.
pub fn collect_source_files(
    root: &Path,
    extensions: &AHashSet<String>,
    ignored: &AHashSet<String>,
    filter: &Option<Regex>,
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(anyhow!("{} is not a directory", root.display()));
    }

    let mut files = Vec::new();
    read_folder(root, extensions, ignored, filter, &mut files)
        .with_context(|| format!("Could not read directory {}", root.display()))?;
    files.sort();
    Ok(files)
}

/// Resolve the command line paths into the list of files to strip.
/// Files named explicitly are taken as-is; directories are walked.
pub fn resolve_files(paths: &[String], config: &Config) -> Result<Vec<PathBuf>> {
    let extensions = config.extension_set();
    let ignored = config.ignored_dirs();
    let filter = config.filter_regex()?;

    let roots: Vec<PathBuf> = if paths.is_empty() {
        vec![PathBuf::from(DEFAULT_ROOT)]
    } else {
        paths.iter().map(PathBuf::from).collect()
    };

    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root);
        } else {
            files.extend(collect_source_files(&root, &extensions, &ignored, &filter)?);
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn file_message(path: &Path, check: bool, plain_output: bool) -> String {
    match (check, plain_output) {
        (true, true) => format!("[strip check] {}", path.display()),
        (false, true) => format!("stripped: {}", path.display()),
        (true, false) => format!("{}{}", LOOKING_GLASS, style(path.display()).yellow()),
        (false, false) => format!("{}{}", SWEEP, path.display()),
    }
}

fn done_message(changed: usize, processed: usize, seconds: f64, no_timing: bool, plain_output: bool) -> String {
    if plain_output {
        format!("done. files changed: {changed}")
    } else {
        format!(
            "{}{}Stripped {}/{} files{}",
            LINE_CLEAR,
            SPARKLES,
            changed,
            processed,
            helpers::timing(seconds, no_timing)
        )
    }
}

/// Entry point of the command line tool.
///
/// With `stdin`, reads source from stdin and writes the stripped text to
/// stdout. Otherwise strips every selected file below `paths` in place (or
/// just reports them, in `check` mode). Check mode fails when any file
/// still contains comments.
pub fn strip(
    paths: &[String],
    stdin: bool,
    check: bool,
    config: &Config,
    show_progress: bool,
    no_timing: bool,
) -> Result<()> {
    if stdin {
        let mut stdin_content = String::new();
        io::stdin().read_to_string(&mut stdin_content)?;
        io::stdout().write_all(strip_stdin(&stdin_content).as_bytes())?;
        return Ok(());
    }

    let timing_start = Instant::now();
    let files = resolve_files(paths, config)?;
    log::debug!("Found {} source files", files.len());

    let plain_output = !helpers::is_tty();
    let progress = if show_progress && !plain_output {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{prefix} {wide_bar} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_prefix(format!("{}", style("Stripping").bold().dim()));
        bar
    } else {
        ProgressBar::hidden()
    };

    let on_file = |path: &Path, outcome: FileOutcome| {
        progress.inc(1);
        if outcome != FileOutcome::Stripped {
            return;
        }
        let message = file_message(path, check, plain_output);
        if check {
            // Check failures are the result of the run, so they show up
            // regardless of verbosity.
            progress.suspend(|| eprintln!("{message}"));
        } else if show_progress {
            progress.suspend(|| println!("{message}"));
        }
    };

    let summary = strip_files(&files, check, &on_file);
    progress.finish_and_clear();

    if let Some(error) = summary.error {
        if !plain_output {
            eprintln!("{}{}", CROSS, style("Stripping failed").red());
        }
        return Err(error);
    }

    if show_progress {
        println!(
            "{}",
            done_message(
                summary.changed,
                summary.processed,
                timing_start.elapsed().as_secs_f64(),
                no_timing,
                plain_output
            )
        );
    }

    if check && summary.changed > 0 {
        return Err(anyhow!("{} file(s) contain comments", summary.changed));
    }

    Ok(())
}
