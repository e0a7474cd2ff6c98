use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

/// Free-form text input seam for commands that ask the player a follow-up
/// question. One blocking request per call; how the text is sourced is the
/// host's decision.
pub trait Prompter {
    fn prompt(&mut self, text: &str) -> Result<String>;
}

/// Serves pre-seeded reply lines in order; errors when the script runs dry.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    lines: VecDeque<String>,
}

impl ScriptedPrompter {
    pub fn new<L>(lines: L) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
    {
        ScriptedPrompter {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, _text: &str) -> Result<String> {
        match self.lines.pop_front() {
            Some(line) => Ok(line),
            None => bail!("prompt script ran out of reply lines"),
        }
    }
}

/// Reads one reply line from the controlling terminal.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn prompt(&mut self, text: &str) -> Result<String> {
        print!("{text}");
        io::stdout().flush().context("flushing prompt")?;

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("reading prompt reply")?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
