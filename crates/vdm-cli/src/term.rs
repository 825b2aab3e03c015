//! Real-terminal console: stdout lines, stdin prompts, non-echoing
//! password entry via dialoguer.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use dialoguer::Password;

use vdm_core::console::Console;

pub struct TermConsole;

impl Console for TermConsole {
    fn say(&mut self, line: &str) -> Result<()> {
        println!("{line}");
        Ok(())
    }

    fn status(&mut self, line: &str) -> Result<()> {
        print!("\r{line}");
        io::stdout().flush()?;
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        Ok(response.trim_end_matches(['\r', '\n']).to_string())
    }

    fn prompt_secret(&mut self, prompt: &str) -> Result<String> {
        // dialoguer renders its own "prompt:" suffix.
        let label = prompt.trim_end().trim_end_matches(':').to_string();
        Ok(Password::new().with_prompt(label).interact()?)
    }

    fn pause(&mut self, prompt: &str) -> Result<()> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut ack = String::new();
        io::stdin().lock().read_line(&mut ack)?;
        Ok(())
    }
}
