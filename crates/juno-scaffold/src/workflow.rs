//! Create and update flows
//!
//! A run is strictly sequential: each step has to succeed before the next
//! one starts. The only fork is whether the target directory already exists.
//!
//! - **Update**: overlay the export onto the existing directory, nothing else.
//! - **Create**: template, flatten, export overlay, then the optional install
//!   and dev server steps.

use crate::archive::{self, Overwrite};
use crate::config::ScaffoldConfig;
use crate::error::{IoContext, Result, ScaffoldError};
use crate::fetch::{ArchiveFetcher, ArchiveKind};
use crate::package::{DevServerExit, PackageManager, DEV_ARGS};
use crate::paths::ProjectPaths;
use crate::prompt::{self, Prompter, DEV_SERVER_QUESTION, INSTALL_QUESTION, UPDATE_QUESTION};
use colored::Colorize;
use tokio::fs;

const INSTALL_HINT: &[&str] = &["install"];

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An existing project was refreshed with the latest export
    Updated,
    /// A new project was created
    Created {
        installed: bool,
        /// Set when the dev server was started and has since exited
        dev_server: Option<DevServerExit>,
    },
}

/// Drives one create or update run
pub struct Scaffolder<P> {
    config: ScaffoldConfig,
    paths: ProjectPaths,
    prompter: P,
    fetcher: ArchiveFetcher,
    package_manager: PackageManager,
}

impl<P: Prompter> Scaffolder<P> {
    pub fn new(config: ScaffoldConfig, paths: ProjectPaths, prompter: P) -> Self {
        let fetcher = ArchiveFetcher::new(config.user_agent());
        let package_manager = PackageManager::new(config.package_manager());
        Self {
            config,
            paths,
            prompter,
            fetcher,
            package_manager,
        }
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    pub async fn run(&mut self) -> Result<Outcome> {
        println!("{} {}", "--> Export Id:".cyan(), self.paths.export_id);
        println!("{} {}", "--> Target directory:".cyan(), self.paths.target_name);

        if fs::try_exists(&self.paths.target_dir).await.unwrap_or(false) {
            println!();
            println!(
                "{} {}",
                "--> Directory already exists:".yellow(),
                self.paths.target_dir.display()
            );

            if !self.confirm(UPDATE_QUESTION)? {
                return Err(ScaffoldError::Declined(self.paths.target_dir.clone()));
            }

            println!("{}", "--> Updating existing project...".cyan());
            println!("{} {}", "--> Target path:".cyan(), self.paths.target_dir.display());
            return self.update().await;
        }

        println!("{} {}", "--> Target path:".cyan(), self.paths.target_dir.display());
        self.create().await
    }

    /// Overlay the export onto an existing project. The template is not
    /// fetched, so template files the export doesn't ship stay as they are.
    async fn update(&mut self) -> Result<Outcome> {
        self.apply_export().await?;
        println!("{} Project updated with latest export", " OK".green());

        self.print_next_steps(
            "Update complete! Your project files have been refreshed.",
            &[DEV_ARGS],
        );
        Ok(Outcome::Updated)
    }

    async fn create(&mut self) -> Result<Outcome> {
        fs::create_dir_all(&self.paths.target_dir)
            .await
            .io_context(|| {
                format!(
                    "Failed to create directory: {}",
                    self.paths.target_dir.display()
                )
            })?;

        self.apply_template().await?;
        self.apply_export().await?;
        println!("{} Exported", " OK".green());

        println!();
        if !self.confirm(INSTALL_QUESTION)? {
            self.print_next_steps(
                "Then it's all. To finish setup manually:",
                &[INSTALL_HINT, DEV_ARGS],
            );
            return Ok(Outcome::Created {
                installed: false,
                dev_server: None,
            });
        }

        self.package_manager.install(&self.paths.target_dir).await?;

        if !self.confirm(DEV_SERVER_QUESTION)? {
            self.print_next_steps("Then it's all. To start the dev server, run:", &[DEV_ARGS]);
            return Ok(Outcome::Created {
                installed: true,
                dev_server: None,
            });
        }

        let server = self.package_manager.spawn_dev(&self.paths.target_dir)?;
        match server.pid() {
            Some(pid) => println!("{} Dev server process spawned, PID: {}", " OK".green(), pid),
            None => println!("{} Dev server process spawned", " OK".green()),
        }

        // The terminal belongs to the server from here on
        let exit = server.wait().await?;
        println!();
        println!("{} Dev server exited with {}", "-->".dimmed(), exit);

        Ok(Outcome::Created {
            installed: true,
            dev_server: Some(exit),
        })
    }

    /// Download the template, unpack it and lift its root folder
    async fn apply_template(&self) -> Result<()> {
        archive::fetch_and_extract(
            &self.fetcher,
            self.config.extractor(),
            ArchiveKind::Template,
            self.config.template_url(),
            &self.paths.template_zip,
            &self.paths.target_dir,
            Overwrite::Keep,
        )
        .await?;

        archive::flatten(&self.paths.target_dir, self.config.template_root()).await?;
        Ok(())
    }

    /// Download the export and overlay it onto the target directory
    async fn apply_export(&self) -> Result<()> {
        let url = self.config.export_url(&self.paths.export_id)?;
        archive::fetch_and_extract(
            &self.fetcher,
            self.config.extractor(),
            ArchiveKind::Export,
            &url,
            &self.paths.export_zip,
            &self.paths.target_dir,
            Overwrite::Replace,
        )
        .await?;
        Ok(())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        prompt::confirm(&mut self.prompter, question)
            .io_context(|| format!("Failed to read answer to \"{}\"", question))
    }

    fn print_next_steps(&self, headline: &str, commands: &[&[&str]]) {
        println!();
        println!("{}", headline.green());
        println!();
        println!("  cd {}", self.paths.target_name);
        for args in commands {
            println!("  {}", self.package_manager.command_line(args));
        }
    }
}
