//! Target directory and temporary archive locations for one run

use colored::Colorize;
use std::path::{Path, PathBuf};

/// Absolute paths derived from the export id and the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub export_id: String,
    /// Directory name as given on the command line (or the export id)
    pub target_name: String,
    pub target_dir: PathBuf,
    pub template_zip: PathBuf,
    pub export_zip: PathBuf,
}

impl ProjectPaths {
    /// Resolve everything against `cwd`. `directory` defaults to the export id,
    /// and an empty name counts as not given.
    ///
    /// Neither value is sanitized; an id containing `..` or separators will
    /// produce paths outside `cwd`.
    pub fn resolve(cwd: &Path, export_id: &str, directory: Option<&str>) -> Self {
        let target_name = directory
            .filter(|d| !d.is_empty())
            .unwrap_or(export_id)
            .to_string();
        Self {
            export_id: export_id.to_string(),
            target_dir: cwd.join(&target_name),
            template_zip: cwd.join(format!("template-{}.zip", export_id)),
            export_zip: cwd.join(format!("{}.zip", export_id)),
            target_name,
        }
    }

    /// Delete whichever temporary archives are still on disk.
    ///
    /// Best effort: a failed deletion is reported and skipped. Returns the
    /// paths that were removed.
    pub fn cleanup_archives(&self) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        for path in [&self.template_zip, &self.export_zip] {
            if !path.exists() {
                continue;
            }
            println!("{} {}", "Deleting:".dimmed(), path.display());
            match std::fs::remove_file(path) {
                Ok(()) => removed.push(path.clone()),
                Err(e) => eprintln!(
                    "{} could not delete {}: {}",
                    "Warning:".yellow(),
                    path.display(),
                    e
                ),
            }
        }
        removed
    }
}
