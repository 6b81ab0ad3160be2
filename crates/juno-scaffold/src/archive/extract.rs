//! Zip extraction backends

use crate::error::{IoContext, Result, ScaffoldError};
use colored::Colorize;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path};
use tokio::process::Command;
use zip::ZipArchive;

/// How an archive gets unpacked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Extractor {
    /// In-process extraction with the `zip` crate
    #[default]
    Builtin,
    /// Shell out to the system `unzip` binary
    SystemUnzip,
}

/// What to do when an archive entry already exists on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Replace existing files (overlay)
    Replace,
    /// Leave existing files alone
    Keep,
}

/// Summary of one extraction
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Files written to disk (always 0 for the system `unzip`, which doesn't say)
    pub written: usize,
    /// Entries left out (already present in `Keep` mode, or unsafe paths)
    pub skipped: usize,
    pub stdout: String,
    pub stderr: String,
}

impl Extraction {
    /// Print captured output. Diagnostics on stderr are shown but not fatal.
    pub fn report(&self) {
        let stdout = self.stdout.trim_end();
        if !stdout.is_empty() {
            println!("{} {}", "-->".blue(), stdout);
        }
        let stderr = self.stderr.trim_end();
        if !stderr.is_empty() {
            eprintln!("{} {}", "ERR".yellow(), stderr);
        }
    }
}

impl Extractor {
    /// Unpack `archive` into `dest`, which must already exist
    pub async fn extract(self, archive: &Path, dest: &Path, mode: Overwrite) -> Result<Extraction> {
        match self {
            Extractor::Builtin => {
                let archive = archive.to_path_buf();
                let dest = dest.to_path_buf();
                tokio::task::spawn_blocking(move || extract_builtin(&archive, &dest, mode))
                    .await
                    .map_err(|e| anyhow::anyhow!("extraction task failed: {}", e))?
            }
            Extractor::SystemUnzip => extract_with_unzip(archive, dest, mode).await,
        }
    }
}

fn extraction_error(archive: &Path, reason: impl ToString) -> ScaffoldError {
    ScaffoldError::Extraction {
        archive: archive.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn extract_builtin(archive: &Path, dest: &Path, mode: Overwrite) -> Result<Extraction> {
    let file =
        File::open(archive).io_context(|| format!("Failed to open {}", archive.display()))?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|e| extraction_error(archive, e))?;

    let mut summary = Extraction::default();

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| extraction_error(archive, e))?;

        // Reject entries like `../../etc/passwd` or absolute paths
        let Some(relative) = entry.enclosed_name() else {
            summary
                .stderr
                .push_str(&format!("skipping unsafe entry: {}\n", entry.name()));
            summary.skipped += 1;
            continue;
        };
        let target = dest.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)
                .io_context(|| format!("Failed to create directory: {}", target.display()))?;
            continue;
        }

        let existing = fs::symlink_metadata(&target).ok();
        if mode == Overwrite::Keep && existing.is_some() {
            summary
                .stdout
                .push_str(&format!("kept existing {}\n", relative.display()));
            summary.skipped += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .io_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Never write through a link left by an earlier entry or extraction
        if existing.is_some_and(|m| m.file_type().is_symlink()) {
            fs::remove_file(&target)
                .io_context(|| format!("Failed to replace {}", target.display()))?;
        }

        if entry.is_symlink() {
            let mut link = String::new();
            io::Read::read_to_string(&mut entry, &mut link)
                .map_err(|e| extraction_error(archive, format!("{}: {}", relative.display(), e)))?;

            if !link_stays_inside(&relative, Path::new(&link)) {
                summary.stderr.push_str(&format!(
                    "skipping link escaping the destination: {} -> {}\n",
                    relative.display(),
                    link
                ));
                summary.skipped += 1;
                continue;
            }

            write_link(&target, &link)?;
            summary.written += 1;
            continue;
        }

        let mut out = File::create(&target)
            .io_context(|| format!("Failed to write file: {}", target.display()))?;
        io::copy(&mut entry, &mut out)
            .map_err(|e| extraction_error(archive, format!("{}: {}", relative.display(), e)))?;

        restore_mode(&target, entry.unix_mode())?;

        summary.written += 1;
    }

    Ok(summary)
}

/// True when `link`, resolved from the directory holding `entry`, stays
/// under the extraction root. Checked lexically; nothing is read from disk.
fn link_stays_inside(entry: &Path, link: &Path) -> bool {
    let mut depth: usize = entry
        .parent()
        .map(|p| {
            p.components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .count()
        })
        .unwrap_or(0);

    for component in link.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

#[cfg(unix)]
fn write_link(target: &Path, link: &str) -> Result<()> {
    std::os::unix::fs::symlink(link, target)
        .io_context(|| format!("Failed to create symlink: {}", target.display()))
}

/// No portable symlinks here, so keep the link text as a plain file
#[cfg(not(unix))]
fn write_link(target: &Path, link: &str) -> Result<()> {
    fs::write(target, link).io_context(|| format!("Failed to write file: {}", target.display()))
}

#[cfg(unix)]
fn restore_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(bits) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(bits & 0o777))
            .io_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn restore_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}

async fn extract_with_unzip(archive: &Path, dest: &Path, mode: Overwrite) -> Result<Extraction> {
    let mut cmd = Command::new("unzip");
    cmd.arg(unzip_flag(mode))
        .arg("-q")
        .arg(archive)
        .arg("-d")
        .arg(dest);

    let output = cmd.output().await.map_err(|e| ScaffoldError::Command {
        command: describe(archive, dest, mode),
        reason: e.to_string(),
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(extraction_error(
            archive,
            format!(
                "unzip exited with code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            ),
        ));
    }

    Ok(Extraction {
        written: 0,
        skipped: 0,
        stdout,
        stderr,
    })
}

fn unzip_flag(mode: Overwrite) -> &'static str {
    match mode {
        Overwrite::Replace => "-o",
        Overwrite::Keep => "-n",
    }
}

fn describe(archive: &Path, dest: &Path, mode: Overwrite) -> String {
    format!(
        "unzip {} -q {} -d {}",
        unzip_flag(mode),
        archive.display(),
        dest.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[tokio::test]
    async fn test_builtin_extracts_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        write_zip(
            &archive,
            &[
                ("root/", ""),
                ("root/index.js", "console.log(1)"),
                ("root/src/app.js", "app"),
            ],
        );

        let summary = Extractor::Builtin
            .extract(&archive, &dest, Overwrite::Keep)
            .await
            .unwrap();

        assert_eq!(summary.written, 2);
        assert_eq!(
            fs::read_to_string(dest.join("root/index.js")).unwrap(),
            "console.log(1)"
        );
        assert_eq!(fs::read_to_string(dest.join("root/src/app.js")).unwrap(), "app");
    }

    #[tokio::test]
    async fn test_keep_mode_leaves_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("config.json"), "mine").unwrap();
        write_zip(&archive, &[("config.json", "theirs"), ("new.txt", "new")]);

        let summary = Extractor::Builtin
            .extract(&archive, &dest, Overwrite::Keep)
            .await
            .unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(fs::read_to_string(dest.join("config.json")).unwrap(), "mine");
        assert_eq!(fs::read_to_string(dest.join("new.txt")).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_replace_mode_overlays_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("config.json"), "mine").unwrap();
        fs::write(dest.join("untouched.txt"), "keep me").unwrap();
        write_zip(&archive, &[("config.json", "theirs")]);

        Extractor::Builtin
            .extract(&archive, &dest, Overwrite::Replace)
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(dest.join("config.json")).unwrap(), "theirs");
        assert_eq!(
            fs::read_to_string(dest.join("untouched.txt")).unwrap(),
            "keep me"
        );
    }

    #[tokio::test]
    async fn test_corrupt_archive_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bad.zip");
        fs::write(&archive, b"<html>not a zip</html>").unwrap();

        let err = Extractor::Builtin
            .extract(&archive, dir.path(), Overwrite::Replace)
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::Extraction { .. }));
    }

    #[tokio::test]
    async fn test_system_unzip_overlays_when_available() {
        let available = std::process::Command::new("unzip")
            .arg("-v")
            .output()
            .is_ok_and(|o| o.status.success());
        if !available {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("config.json"), "mine").unwrap();
        write_zip(&archive, &[("config.json", "theirs")]);

        Extractor::SystemUnzip
            .extract(&archive, &dest, Overwrite::Replace)
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(dest.join("config.json")).unwrap(), "theirs");
    }

    #[tokio::test]
    async fn test_system_unzip_keep_mode_when_available() {
        let available = std::process::Command::new("unzip")
            .arg("-v")
            .output()
            .is_ok_and(|o| o.status.success());
        if !available {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("config.json"), "mine").unwrap();
        write_zip(&archive, &[("config.json", "theirs"), ("new.txt", "new")]);

        Extractor::SystemUnzip
            .extract(&archive, &dest, Overwrite::Keep)
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(dest.join("config.json")).unwrap(), "mine");
        assert_eq!(fs::read_to_string(dest.join("new.txt")).unwrap(), "new");
    }

    #[test]
    fn test_link_stays_inside() {
        assert!(link_stays_inside(Path::new("link.txt"), Path::new("real.txt")));
        assert!(link_stays_inside(Path::new("a/b/link"), Path::new("../../real.txt")));
        assert!(link_stays_inside(Path::new("a/link"), Path::new("./c/../d")));
        assert!(!link_stays_inside(Path::new("link"), Path::new("../outside")));
        assert!(!link_stays_inside(Path::new("a/link"), Path::new("../../outside")));
        assert!(!link_stays_inside(Path::new("link"), Path::new("/etc/passwd")));
    }

    #[cfg(unix)]
    fn write_zip_with_link(path: &Path, file: (&str, &str), link: (&str, &str)) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        zip.start_file(file.0, options).unwrap();
        zip.write_all(file.1.as_bytes()).unwrap();
        zip.add_symlink(link.0, link.1, options).unwrap();
        zip.finish().unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_builtin_recreates_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        write_zip_with_link(&archive, ("real.txt", "real"), ("link.txt", "real.txt"));

        let summary = Extractor::Builtin
            .extract(&archive, &dest, Overwrite::Replace)
            .await
            .unwrap();

        let link = dest.join("link.txt");
        assert_eq!(summary.written, 2);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), Path::new("real.txt"));
        assert_eq!(fs::read_to_string(&link).unwrap(), "real");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_builtin_skips_escaping_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        write_zip_with_link(&archive, ("real.txt", "real"), ("evil", "../../etc/passwd"));

        let summary = Extractor::Builtin
            .extract(&archive, &dest, Overwrite::Replace)
            .await
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert!(summary.stderr.contains("evil"));
        assert!(fs::symlink_metadata(dest.join("evil")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_restore_mode_drops_special_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.sh");
        fs::write(&path, "#!/bin/sh").unwrap();

        // setuid + setgid + sticky on top of rwxr-xr-x
        restore_mode(&path, Some(0o107755)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o7777, 0o755);
    }
}
