//! Lift the template's top-level folder into the project root

use crate::error::{IoContext, Result, ScaffoldError};
use std::path::Path;
use tokio::fs;

/// Move every child of `target/root_name` up into `target` and remove the
/// emptied folder. Returns the names that were moved, sorted.
///
/// If `target/root_name` is not a directory, fails with
/// [`ScaffoldError::MissingTemplateRoot`] listing what `target` does contain,
/// and leaves `target` untouched.
pub async fn flatten(target: &Path, root_name: &str) -> Result<Vec<String>> {
    let root = target.join(root_name);

    let is_dir = fs::metadata(&root)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(ScaffoldError::MissingTemplateRoot {
            expected: root,
            contents: list_dir(target).await?,
        });
    }

    // Stage under another name so a child called `root_name` can move up
    let staging = target.join(format!(".{}.flatten", root_name));
    fs::rename(&root, &staging)
        .await
        .io_context(|| format!("Failed to rename {}", root.display()))?;

    let mut moved = Vec::new();
    let mut entries = fs::read_dir(&staging)
        .await
        .io_context(|| format!("Failed to read {}", staging.display()))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .io_context(|| format!("Failed to read {}", staging.display()))?
    {
        let name = entry.file_name();
        let dest = target.join(&name);
        remove_existing(&dest).await?;
        fs::rename(entry.path(), &dest)
            .await
            .io_context(|| format!("Failed to move {}", dest.display()))?;
        moved.push(name.to_string_lossy().into_owned());
    }

    fs::remove_dir(&staging)
        .await
        .io_context(|| format!("Failed to remove {}", staging.display()))?;

    moved.sort();
    Ok(moved)
}

async fn remove_existing(path: &Path) -> Result<()> {
    let Ok(meta) = fs::symlink_metadata(path).await else {
        return Ok(());
    };
    let removed = if meta.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };
    removed.io_context(|| format!("Failed to replace {}", path.display()))
}

/// Sorted entry names of `dir`, for diagnostics
pub(crate) async fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir)
        .await
        .io_context(|| format!("Failed to read {}", dir.display()))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .io_context(|| format!("Failed to read {}", dir.display()))?
    {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
