//! Yes/no confirmation prompts
//!
//! Every question defaults to "yes". Only `n` and `no` (any case, surrounding
//! whitespace ignored) count as a refusal; anything else, including an empty
//! line or garbage, is taken as agreement.

use std::io::{self, BufRead, Write};

pub const UPDATE_QUESTION: &str = "Would you like to update the existing project? (Y/n)";
pub const INSTALL_QUESTION: &str = "Install npm dependencies? (Y/n)";
pub const DEV_SERVER_QUESTION: &str = "Start dev server? (Y/n)";

/// Source of answers to the run's questions
pub trait Prompter {
    /// Show `question` and return the raw answer
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        (**self).ask(question)
    }
}

pub fn is_negative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "n" | "no")
}

/// Ask `question` and interpret the answer with the default-yes rule
pub fn confirm<P: Prompter + ?Sized>(prompter: &mut P, question: &str) -> io::Result<bool> {
    let answer = prompter.ask(question)?;
    Ok(!is_negative(&answer))
}

/// Plain line-based prompt over any reader/writer pair
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}: ", question)?;
        self.output.flush()?;

        // EOF reads as an empty answer, i.e. the default
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line)
    }
}

/// Accepts the default for every question (non-interactive `--yes` mode)
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Prompter for AutoConfirm {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        println!("{}: (auto-confirmed)", question);
        Ok(String::new())
    }
}

/// cliclack text input, keeping the permissive yes/no interpretation
#[cfg(feature = "tui")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ClackPrompter;

#[cfg(feature = "tui")]
impl Prompter for ClackPrompter {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        cliclack::input(question)
            .placeholder("Y")
            .required(false)
            .interact()
    }
}
