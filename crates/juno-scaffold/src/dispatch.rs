//! The single place a run's exit code is decided

use crate::config::ScaffoldConfig;
use crate::error::ScaffoldError;
use crate::paths::ProjectPaths;
use crate::prompt::Prompter;
use crate::workflow::Scaffolder;
use colored::Colorize;
use std::error::Error as _;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Run the scaffolder and map the result to an exit code.
///
/// On any failure the reason is printed and both temporary archives are
/// removed if they are still around.
pub async fn execute<P: Prompter>(config: ScaffoldConfig, paths: ProjectPaths, prompter: P) -> i32 {
    let mut scaffolder = Scaffolder::new(config, paths, prompter);

    let result = scaffolder.run().await;
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            report_failure(&e);
            cleanup(scaffolder.paths());
            EXIT_FAILURE
        }
    }
}

fn report_failure(error: &ScaffoldError) {
    eprintln!();
    match error {
        ScaffoldError::Declined(_) => {
            eprintln!(
                "{}",
                "Please use a different directory name or remove the existing directory.".red()
            );
        }
        ScaffoldError::HttpStatus { kind, status, url } => {
            eprintln!("{} Failed to fetch {}", "ERR".red().bold(), kind);
            eprintln!("{} {}", status.as_u16(), url);
        }
        ScaffoldError::MissingTemplateRoot { expected, contents } => {
            eprintln!(
                "{} Extracted directory not found: {}",
                "ERR".red().bold(),
                expected.display()
            );
            eprintln!("Target path contents: {:?}", contents);
        }
        other => {
            eprintln!("{}", "[ERROR] Unexpected!".red().bold());
            eprintln!("Error message: {}", other);
            let mut source = other.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {}", cause);
                source = cause.source();
            }
            eprintln!("Error name: {}", other.kind());
        }
    }
}

fn cleanup(paths: &ProjectPaths) {
    if !paths.template_zip.exists() && !paths.export_zip.exists() {
        return;
    }
    println!();
    println!("{}", "Cleaning up temporary files...".dimmed());
    paths.cleanup_archives();
}
