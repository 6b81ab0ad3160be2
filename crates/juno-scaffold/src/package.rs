//! Package manager invocations inside the project directory

use crate::error::{Result, ScaffoldError};
use colored::Colorize;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

pub const INSTALL_ARGS: &[&str] = &["install", "--fund", "false", "--audit", "false"];
pub const DEV_ARGS: &[&str] = &["run", "dev"];

/// Runs `install` and `run dev` with a given package manager binary
#[derive(Debug, Clone)]
pub struct PackageManager {
    program: String,
}

impl PackageManager {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Human-readable command line, used in messages and errors
    pub fn command_line(&self, args: &[&str]) -> String {
        let mut line = self.program.clone();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn command(&self, args: &[&str], dir: &Path) -> Command {
        // npm is a .cmd shim on Windows and needs a shell to resolve
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.program);
            cmd
        } else {
            Command::new(&self.program)
        };
        cmd.args(args).current_dir(dir);
        cmd
    }

    /// Install dependencies, streaming output, and fail on a non-zero exit
    pub async fn install(&self, dir: &Path) -> Result<()> {
        let command_line = self.command_line(INSTALL_ARGS);
        println!();
        println!("{} {}", "Running:".dimmed(), command_line.yellow());
        println!();

        let mut child = self
            .command(INSTALL_ARGS, dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ScaffoldError::Command {
                command: command_line.clone(),
                reason: e.to_string(),
            })?;

        let missing_pipe = || ScaffoldError::Command {
            command: command_line.clone(),
            reason: "output pipe was not captured".to_string(),
        };
        let stdout = child.stdout.take().ok_or_else(missing_pipe)?;
        let stderr = child.stderr.take().ok_or_else(missing_pipe)?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();
        let mut stdout_done = false;
        let mut stderr_done = false;

        while !(stdout_done && stderr_done) {
            tokio::select! {
                line = stdout_reader.next_line(), if !stdout_done => match line {
                    Ok(Some(line)) => println!("  {}", line),
                    Ok(None) => stdout_done = true,
                    Err(e) => {
                        eprintln!("{} {}", "Error reading stdout:".red(), e);
                        stdout_done = true;
                    }
                },
                line = stderr_reader.next_line(), if !stderr_done => match line {
                    Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                    Ok(None) => stderr_done = true,
                    Err(e) => {
                        eprintln!("{} {}", "Error reading stderr:".red(), e);
                        stderr_done = true;
                    }
                },
            }
        }

        let status = child.wait().await.map_err(|e| ScaffoldError::Command {
            command: command_line.clone(),
            reason: format!("failed to wait for process: {}", e),
        })?;
        println!();

        if status.success() {
            Ok(())
        } else {
            Err(ScaffoldError::Command {
                command: command_line,
                reason: format!("exited with code {}", status.code().unwrap_or(-1)),
            })
        }
    }

    /// Start the dev server attached to this terminal
    pub fn spawn_dev(&self, dir: &Path) -> Result<DevServer> {
        let command_line = self.command_line(DEV_ARGS);
        let child = self
            .command(DEV_ARGS, dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ScaffoldError::Command {
                command: command_line,
                reason: e.to_string(),
            })?;

        Ok(DevServer { child })
    }
}

/// A running dev server process
#[derive(Debug)]
pub struct DevServer {
    child: Child,
}

impl DevServer {
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the server to stop on its own or be interrupted
    pub async fn wait(mut self) -> Result<DevServerExit> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| ScaffoldError::Command {
                command: "dev server".to_string(),
                reason: format!("failed to wait for process: {}", e),
            })?;

        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        Ok(DevServerExit {
            code: status.code(),
            signal,
        })
    }
}

/// How the dev server ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevServerExit {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl fmt::Display for DevServerExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self
            .code
            .map_or_else(|| "none".to_string(), |c| c.to_string());
        let signal = self
            .signal
            .map_or_else(|| "none".to_string(), |s| s.to_string());
        write!(f, "code: {}, signal: {}", code, signal)
    }
}
