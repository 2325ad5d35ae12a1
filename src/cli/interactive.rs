use crate::cli::output;
use crate::fix::Operator;
use crate::SpellingError;
use anyhow::{Context, Result};
use colored::*;
use console::Term;
use std::io::{self, BufRead, Write};

/// An operator answering from the terminal, one keypress per error.
///
/// When stdin is not a terminal, each line read counts as a keypress (its
/// first character) and end of input quits.
pub struct TerminalOperator {
    term: Term,
    colored: bool,
}

impl TerminalOperator {
    pub fn new(colored: bool) -> Self {
        Self {
            term: Term::stdout(),
            colored,
        }
    }

    fn read_key(&mut self) -> Result<char> {
        if self.term.is_term() {
            return self.term.read_char().context("Failed to read key");
        }

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            return Ok('q');
        }
        Ok(line.trim_end_matches(['\n', '\r']).chars().next().unwrap_or(' '))
    }
}

impl Operator for TerminalOperator {
    fn begin_file(&mut self, file: &str) {
        if self.colored {
            println!("\n{}", file.bold().underline());
        } else {
            println!("\n{}", file);
        }
    }

    fn choose(&mut self, error: &SpellingError, suggestions: &[String]) -> Result<char> {
        output::print_interactive_prompt(error, suggestions, self.colored);
        print!("> ");
        io::stdout().flush()?;
        let key = self.read_key()?;
        println!("{}", key);
        Ok(key)
    }

    fn invalid_selection(&mut self, index: usize, available: usize) {
        output::print_invalid_selection(index, available, self.colored);
    }
}
