//! Archive download, extraction and merging
//!
//! This module provides:
//! - Zip extraction, either in-process or through the system `unzip`
//! - Flattening of the template's single top-level folder
//! - The shared download -> extract -> delete sequence used for both archives

pub mod extract;
pub mod flatten;

use crate::error::{IoContext, Result};
use crate::fetch::{ArchiveFetcher, ArchiveKind};
use std::path::Path;
use url::Url;

pub use extract::{Extraction, Extractor, Overwrite};
pub use flatten::flatten;

/// Download `url` to `temp`, unpack it into `target`, then delete `temp`.
///
/// The temporary file is removed whether or not extraction succeeded. A
/// failed download leaves no file behind in the first place.
pub async fn fetch_and_extract(
    fetcher: &ArchiveFetcher,
    extractor: Extractor,
    kind: ArchiveKind,
    url: &Url,
    temp: &Path,
    target: &Path,
    mode: Overwrite,
) -> Result<Extraction> {
    fetcher.download(kind, url, temp).await?;

    let extracted = extractor.extract(temp, target, mode).await;
    let removed = tokio::fs::remove_file(temp)
        .await
        .io_context(|| format!("Failed to delete {}", temp.display()));

    let extraction = extracted?;
    removed?;

    extraction.report();
    Ok(extraction)
}
