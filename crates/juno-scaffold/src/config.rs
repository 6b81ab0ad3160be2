//! Where archives come from and which tools handle them
//!
//! Defaults point at the production storage bucket and the public template
//! repository. Each value can be overridden from the environment, which is
//! also how tests aim the fetcher at a local mock server.

use crate::archive::Extractor;
use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_STORAGE_URL: &str = "https://kgfipbdrigsksyfqdhrm.supabase.co";
pub const DEFAULT_STORAGE_BUCKET: &str = "exports";
pub const DEFAULT_TEMPLATE_URL: &str =
    "https://github.com/junoworks/juno-template/archive/refs/heads/main.zip";
/// Root folder GitHub puts inside the `main` branch archive
pub const DEFAULT_TEMPLATE_ROOT: &str = "juno-template-main";
pub const DEFAULT_PACKAGE_MANAGER: &str = "npm";

pub const STORAGE_URL_ENV: &str = "JUNO_STORAGE_URL";
pub const STORAGE_BUCKET_ENV: &str = "JUNO_STORAGE_BUCKET";
pub const TEMPLATE_URL_ENV: &str = "JUNO_TEMPLATE_URL";
pub const TEMPLATE_ROOT_ENV: &str = "JUNO_TEMPLATE_ROOT";
pub const PACKAGE_MANAGER_ENV: &str = "JUNO_PACKAGE_MANAGER";

/// Immutable settings for one scaffolding run
#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
    storage_url: Url,
    bucket: String,
    template_url: Url,
    template_root: String,
    package_manager: String,
    extractor: Extractor,
    user_agent: String,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            storage_url: Url::parse(DEFAULT_STORAGE_URL).expect("default storage URL is valid"),
            bucket: DEFAULT_STORAGE_BUCKET.to_string(),
            template_url: Url::parse(DEFAULT_TEMPLATE_URL).expect("default template URL is valid"),
            template_root: DEFAULT_TEMPLATE_ROOT.to_string(),
            package_manager: DEFAULT_PACKAGE_MANAGER.to_string(),
            extractor: Extractor::default(),
            user_agent: format!("create-juno/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ScaffoldConfig {
    /// Defaults with any `JUNO_*` environment overrides applied
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(STORAGE_URL_ENV) {
            config = config.with_storage_url(&url)?;
        }
        if let Some(bucket) = lookup(STORAGE_BUCKET_ENV) {
            config.bucket = bucket;
        }
        if let Some(url) = lookup(TEMPLATE_URL_ENV) {
            config = config.with_template_url(&url)?;
        }
        if let Some(root) = lookup(TEMPLATE_ROOT_ENV) {
            config.template_root = root;
        }
        if let Some(pm) = lookup(PACKAGE_MANAGER_ENV) {
            config.package_manager = pm;
        }

        Ok(config)
    }

    pub fn with_storage_url(mut self, url: &str) -> Result<Self> {
        self.storage_url =
            Url::parse(url).with_context(|| format!("Invalid storage URL: {}", url))?;
        Ok(self)
    }

    pub fn with_template_url(mut self, url: &str) -> Result<Self> {
        self.template_url =
            Url::parse(url).with_context(|| format!("Invalid template URL: {}", url))?;
        Ok(self)
    }

    pub fn with_template_root(mut self, root: impl Into<String>) -> Self {
        self.template_root = root.into();
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn with_package_manager(mut self, program: impl Into<String>) -> Self {
        self.package_manager = program.into();
        self
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Public object URL for an export:
    /// `{storage}/storage/v1/object/public/{bucket}/{export_id}`
    ///
    /// The id is pushed as a single path segment, so characters like `/`
    /// or `?` end up percent-encoded rather than changing the route.
    pub fn export_url(&self, export_id: &str) -> Result<Url> {
        let mut url = self.storage_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", self.storage_url))?
            .pop_if_empty()
            .extend(["storage", "v1", "object", "public"])
            .push(&self.bucket)
            .push(export_id);
        Ok(url)
    }

    pub fn template_url(&self) -> &Url {
        &self.template_url
    }

    pub fn template_root(&self) -> &str {
        &self.template_root
    }

    pub fn package_manager(&self) -> &str {
        &self.package_manager
    }

    pub fn extractor(&self) -> Extractor {
        self.extractor
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
