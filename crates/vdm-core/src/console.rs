//! Operator console as an injectable dependency.
//!
//! The workflow's prompt loops are unbounded and operator-driven, so all
//! line I/O goes through this trait: the CLI binds it to a real terminal,
//! tests supply a scripted sequence of responses and capture the
//! transcript.

use std::collections::VecDeque;

use anyhow::{bail, Result};

/// Line-oriented operator console.
pub trait Console {
    /// Print a full line of output.
    fn say(&mut self, line: &str) -> Result<()>;

    /// Print a transient status line (no newline, overwrites in place).
    fn status(&mut self, line: &str) -> Result<()>;

    /// Prompt for one line of input.
    fn prompt_line(&mut self, prompt: &str) -> Result<String>;

    /// Prompt for a secret; the input must not echo.
    fn prompt_secret(&mut self, prompt: &str) -> Result<String>;

    /// Block until the operator acknowledges.
    fn pause(&mut self, prompt: &str) -> Result<()>;
}

/// Horizontal rule used between workflow sections.
pub fn rule() -> String {
    "=".repeat(120)
}

/// Console fed from a fixed script of responses. Prompts pop the next
/// response in order; running out of script is an error so tests fail
/// loudly instead of hanging in a re-prompt loop.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    responses: VecDeque<String>,
    /// Everything printed via `say`, one entry per line.
    pub transcript: Vec<String>,
    /// Every prompt shown, in order (line and secret prompts alike).
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
            prompts: Vec::new(),
        }
    }

    /// True when every scripted response has been consumed.
    pub fn exhausted(&self) -> bool {
        self.responses.is_empty()
    }

    fn next_response(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        match self.responses.pop_front() {
            Some(r) => Ok(r),
            None => bail!("console script exhausted at prompt {prompt:?}"),
        }
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, line: &str) -> Result<()> {
        self.transcript.push(line.to_string());
        Ok(())
    }

    fn status(&mut self, _line: &str) -> Result<()> {
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<String> {
        self.next_response(prompt)
    }

    fn prompt_secret(&mut self, prompt: &str) -> Result<String> {
        self.next_response(prompt)
    }

    fn pause(&mut self, prompt: &str) -> Result<()> {
        self.prompts.push(prompt.to_string());
        Ok(())
    }
}
