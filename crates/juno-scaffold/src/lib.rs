//! Juno Scaffold - create and update Juno projects from an export id
//!
//! A project is the public Juno template with a user's export laid on top.
//! Creating one downloads both archives, merges them into a fresh directory,
//! then optionally installs dependencies and starts the dev server. Updating
//! re-downloads only the export and overlays it onto an existing directory.
//!
//! # Architecture
//!
//! - **Building blocks** - `config`, `paths`, `prompt`, `fetch`, `archive`, `package`
//! - **Workflow** - `Scaffolder` runs the create/update sequence and returns a typed outcome
//! - **Dispatch** - `execute` maps the outcome to an exit code and removes temp archives
//! - **TUI** - optional cliclack front-end (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based front-end
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use juno_scaffold::{execute, prompt::AutoConfirm, ProjectPaths, ScaffoldConfig};
//!
//! let config = ScaffoldConfig::from_env()?;
//! let paths = ProjectPaths::resolve(&std::env::current_dir()?, "quickly-light-mouse", None);
//! let code = execute(config, paths, AutoConfirm).await;
//! ```

pub mod archive;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod package;
pub mod paths;
pub mod prompt;
pub mod workflow;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use archive::{fetch_and_extract, flatten, Extraction, Extractor, Overwrite};
pub use config::ScaffoldConfig;
pub use dispatch::{execute, EXIT_FAILURE, EXIT_SUCCESS};
pub use error::ScaffoldError;
pub use fetch::{ArchiveFetcher, ArchiveKind};
pub use package::{DevServer, DevServerExit, PackageManager};
pub use paths::ProjectPaths;
pub use prompt::{confirm, is_negative, Prompter};
pub use workflow::{Outcome, Scaffolder};

#[cfg(feature = "tui")]
pub use tui::{run, RunArgs};
