//! Interactive front-end using cliclack
//!
//! This module is optional and only available when the `tui` feature is enabled.

use crate::config::ScaffoldConfig;
use crate::dispatch::{execute, EXIT_SUCCESS};
use crate::paths::ProjectPaths;
use crate::prompt::{AutoConfirm, ClackPrompter, LinePrompter};
use std::io::IsTerminal;

/// Options for a run, as parsed by the binary
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run with an intro/outro frame and return the process exit code
pub async fn run(config: ScaffoldConfig, paths: ProjectPaths, args: RunArgs) -> i32 {
    let _ = cliclack::intro("create-juno");

    let code = if args.yes {
        execute(config, paths, AutoConfirm).await
    } else if std::io::stdin().is_terminal() {
        execute(config, paths, ClackPrompter).await
    } else {
        // Piped answers: read them line by line
        execute(config, paths, LinePrompter::stdio()).await
    };

    if code == EXIT_SUCCESS {
        let _ = cliclack::outro("Happy coding!");
    } else {
        let _ = cliclack::outro_cancel("Setup did not complete");
    }
    code
}
