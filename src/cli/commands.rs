// CLI command implementations
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use tagsniff::AudioFile;

use crate::cli::config::{Commands, Config};
use crate::cli::output::{filter_fields, OutputFormatter};

/// Dispatch the parsed subcommand
pub fn run(config: Config) -> Result<()> {
    let formatter = OutputFormatter::new(config.format, config.quiet);

    match config.command {
        Commands::Read { files, fields, output } => command_read(&files, &fields, output.as_deref(), &formatter),
        Commands::Detect { files } => command_detect(&files, &formatter),
        Commands::Batch { directory, pattern } => command_batch(&directory, &pattern, &formatter),
    }
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    })
}

/// Read tags from files
fn command_read(files: &[PathBuf], fields: &[String], output: Option<&Path>, formatter: &OutputFormatter) -> Result<()> {
    let mut writer = open_output(output)?;

    for path in files {
        if !path.exists() {
            formatter.print_error(&format!("File not found: {}", path.display()));
            continue;
        }

        let tags = tagsniff::read_tags(path);
        debug!(path = %path.display(), tags = tags.len(), "read tags");
        formatter.output_tags(path, &filter_fields(tags.to_flat_map(), fields), &mut writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Detect file format
fn command_detect(files: &[PathBuf], formatter: &OutputFormatter) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    for path in files {
        match AudioFile::new(path) {
            Ok(AudioFile { file_type: Some(file_type), .. }) => {
                writeln!(writer, "{}: {}", path.display(), file_type)?;
            }
            Ok(_) => {
                writeln!(writer, "{}: unknown", path.display())?;
            }
            Err(e) => {
                formatter.print_error(&format!("{}: {}", path.display(), e));
            }
        }
    }

    Ok(())
}

/// Matching regular files under `directory`. Patterns without wildcards match
/// file names at any depth.
pub fn find_files(directory: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let glob_pattern = if pattern.contains(['*', '?', '[']) {
        directory.join(pattern)
    } else {
        directory.join("**").join(pattern)
    };
    let glob_pattern = glob_pattern.to_string_lossy();

    let mut files = Vec::new();
    for entry in glob::glob(&glob_pattern).with_context(|| format!("invalid glob pattern: {glob_pattern}"))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "skipping unreadable path"),
        }
    }
    Ok(files)
}

/// Read tags from every matching file in a directory
fn command_batch(directory: &Path, pattern: &str, formatter: &OutputFormatter) -> Result<()> {
    if !directory.is_dir() {
        bail!("not a directory: {}", directory.display());
    }

    let files = find_files(directory, pattern)?;
    let total = files.len();
    if total == 0 {
        formatter.print_info("No files found matching pattern");
        return Ok(());
    }
    formatter.print_info(&format!("Processing {} files...", total));

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut recognized = 0;

    for path in &files {
        let tags = tagsniff::read_tags(path);
        if tags.file_type().is_some() {
            recognized += 1;
            formatter.output_tags(path, &tags.to_flat_map(), &mut writer)?;
        } else {
            debug!(path = %path.display(), "unrecognized format");
        }
    }

    formatter.print_success(&format!("Completed: {} recognized, {} skipped", recognized, total - recognized));
    Ok(())
}
