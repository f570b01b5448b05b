//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of generation: rendering the unit in
//! the requested formats and writing each file to disk atomically.
//!
//! ## Output Structure
//!
//! For the default configuration with `--format all`:
//! ```text
//! <output>/
//! ├── rxhttp/wrapper/param/RxHttpParsers.java   # Java backend
//! └── parsers.json                              # Declarative backend
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Determinism**: Identical input renders byte-identical files
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::info;

use crate::config::GeneratorConfig;
use crate::emit::{render_declarative, render_java};
use crate::errors::GeneratorError;
use crate::ir::GeneratedUnit;

/// Which backends to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Java source only
    Java,
    /// Declarative JSON only
    Json,
    /// Both
    #[default]
    All,
}

impl OutputFormat {
    fn includes_java(self) -> bool {
        matches!(self, Self::Java | Self::All)
    }

    fn includes_json(self) -> bool {
        matches!(self, Self::Json | Self::All)
    }
}

/// A rendered file and its path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Relative path of the Java unit: package directories plus `<class>.java`.
pub fn java_path(config: &GeneratorConfig) -> PathBuf {
    let mut path = PathBuf::new();
    for segment in config.output.package.split('.').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push(format!("{}.java", config.output.class_name));
    path
}

/// Renders `unit` in every format `format` selects.
///
/// ## Errors
///
/// Returns `GeneratorError::Serialize` if the JSON backend fails.
pub fn render_files(
    unit: &GeneratedUnit,
    config: &GeneratorConfig,
    format: OutputFormat,
) -> Result<Vec<RenderedFile>, GeneratorError> {
    let mut files = Vec::new();
    if format.includes_java() {
        files.push(RenderedFile {
            path: java_path(config),
            content: render_java(unit),
        });
    }
    if format.includes_json() {
        files.push(RenderedFile {
            path: PathBuf::from(format!("{}.json", config.output.declarative_stem)),
            content: render_declarative(unit)?,
        });
    }
    Ok(files)
}

/// Writes content to a file atomically using temp file + rename.
///
/// This prevents partial writes if the process is interrupted.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if any file operation fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Renders and writes the unit, or prints it when `dry_run` is set.
///
/// ## Arguments
///
/// * `unit` - The synthesized methods
/// * `config` - Supplies file names
/// * `output_dir` - Directory the relative paths are joined onto
/// * `format` - Backends to run
/// * `dry_run` - If true, print files instead of writing them
///
/// ## Returns
///
/// The rendered files, written or not.
///
/// ## Errors
///
/// Returns an error if rendering or writing fails.
pub fn generate_and_write(
    unit: &GeneratedUnit,
    config: &GeneratorConfig,
    output_dir: &Path,
    format: OutputFormat,
    dry_run: bool,
) -> Result<Vec<RenderedFile>, GeneratorError> {
    let files = render_files(unit, config, format)?;

    if dry_run {
        for file in &files {
            println!("=== {} ===\n{}", file.path.display(), file.content);
        }
    } else {
        for file in &files {
            let path = output_dir.join(&file.path);
            write_atomic(&path, &file.content)?;
            info!(path = %path.display(), bytes = file.content.len(), "Wrote generated file");
        }
    }

    Ok(files)
}
