//! create-juno - set up or refresh a Juno project from an export id

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use juno_scaffold::{Extractor, ProjectPaths, RunArgs, ScaffoldConfig, EXIT_FAILURE};

const USAGE: &str = "Usage: create-juno <export-id> [directory-name]";
const EXAMPLE: &str = "Example: create-juno quickly-light-mouse";

#[derive(Parser, Debug)]
#[command(name = "create-juno")]
#[command(about = "Create or update a Juno project from an export id")]
#[command(version)]
pub struct Args {
    /// Export id to download
    pub export_id: Option<String>,

    /// Project directory to create or update (defaults to the export id)
    pub directory: Option<String>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Extract archives with the system `unzip` instead of the built-in extractor
    #[arg(long = "system-unzip")]
    pub system_unzip: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    let args = Args::parse();

    let Some(export_id) = args.export_id.as_deref() else {
        eprintln!("{}", USAGE);
        eprintln!();
        eprintln!("{}", EXAMPLE.dimmed());
        std::process::exit(EXIT_FAILURE);
    };

    let mut config = ScaffoldConfig::from_env()?;
    if args.system_unzip {
        config = config.with_extractor(Extractor::SystemUnzip);
    }

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let paths = ProjectPaths::resolve(&cwd, export_id, args.directory.as_deref());

    // Handle Ctrl+C gracefully: no archive is left behind
    let interrupted = paths.clone();
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        interrupted.cleanup_archives();
        std::process::exit(130);
    })
    .ok();

    let code = juno_scaffold::run(config, paths, RunArgs { yes: args.yes }).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    std::process::exit(code);
}
