//! Download of template and export archives

use crate::error::{IoContext, Result, ScaffoldError};
use colored::Colorize;
use std::fmt;
use std::path::Path;
use tokio::fs;
use url::Url;

/// Which of the two archives a download is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Template,
    Export,
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveKind::Template => write!(f, "template"),
            ArchiveKind::Export => write!(f, "export"),
        }
    }
}

/// Fetches a remote archive into a local file
pub struct ArchiveFetcher {
    client: reqwest::Client,
}

impl ArchiveFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// GET `url` and write the whole body to `dest`.
    ///
    /// Nothing is written unless the status is a success. Returns the number
    /// of bytes written.
    pub async fn download(&self, kind: ArchiveKind, url: &Url, dest: &Path) -> Result<usize> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ScaffoldError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScaffoldError::HttpStatus {
                kind,
                status,
                url: url.to_string(),
            });
        }

        println!("{} {}", status.as_u16().to_string().green(), url);

        let body = response
            .bytes()
            .await
            .map_err(|source| ScaffoldError::Request {
                url: url.to_string(),
                source,
            })?;

        fs::write(dest, &body)
            .await
            .io_context(|| format!("Failed to write {}", dest.display()))?;

        Ok(body.len())
    }
}
