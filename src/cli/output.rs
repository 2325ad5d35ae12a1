use crate::checker::RunStatus;
use crate::{CheckResult, ScanError, SpellingError};
use anyhow::Result;
use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonError {
    file: String,
    offset: usize,
    line: usize,
    column: usize,
    word: String,
    suggestions: Vec<String>,
    context: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonFailure {
    file: String,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonOutput {
    files_checked: usize,
    total_errors: usize,
    failures: Vec<JsonFailure>,
    errors: Vec<JsonError>,
}

/// Print the errors of one file, each followed by its line and suggestions.
pub fn print_errors(result: &CheckResult, max_suggestions: usize, colored_output: bool) {
    for error in &result.errors {
        let location = error.to_string();
        if colored_output {
            println!("{}", location.bold());
        } else {
            println!("{}", location);
        }
        println!("    {}", highlight(error, colored_output));

        let suggestions = error.known_suggestions();
        if suggestions.is_empty() {
            continue;
        }
        let shown = suggestions.iter().take(max_suggestions);
        if colored_output {
            let joined = shown
                .map(|s| s.green().to_string())
                .collect::<Vec<_>>()
                .join(&", ".dimmed().to_string());
            println!("    {} {}", "→".dimmed(), joined);
        } else {
            let joined = shown.map(String::as_str).collect::<Vec<_>>().join(", ");
            println!("    → {}", joined);
        }
    }
}

/// Per-file diagnostics go to stderr whatever the output format.
pub fn print_failure(failure: &ScanError, colored_output: bool) {
    if !failure.is_failure() {
        log::debug!("{}", failure);
        return;
    }
    if colored_output {
        eprintln!("{} {}", "error:".red().bold(), failure);
    } else {
        eprintln!("error: {}", failure);
    }
}

pub fn print_json(results: &[CheckResult], status: &RunStatus) -> Result<()> {
    let errors = results
        .iter()
        .flat_map(|result| &result.errors)
        .map(|e| JsonError {
            file: e.file.clone(),
            offset: e.offset,
            line: e.line,
            column: e.column,
            word: e.word.clone(),
            suggestions: e.known_suggestions().to_vec(),
            context: e.line_content.clone(),
        })
        .collect();
    let failures = results
        .iter()
        .filter_map(|result| {
            let failure = result.failure.as_ref().filter(|f| f.is_failure())?;
            Some(JsonFailure {
                file: result.file.clone(),
                message: failure.to_string(),
            })
        })
        .collect();

    let output = JsonOutput {
        files_checked: status.files_checked,
        total_errors: status.error_count,
        failures,
        errors,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// The error's line with the word picked out.
fn highlight(error: &SpellingError, colored: bool) -> String {
    let line = error.line_content.as_str();
    let start = line
        .char_indices()
        .nth(error.column - 1)
        .map_or(line.len(), |(i, _)| i);
    let end = (start + error.word.len()).min(line.len());
    let (Some(before), Some(word), Some(after)) =
        (line.get(..start), line.get(start..end), line.get(end..))
    else {
        return line.to_string();
    };

    if colored {
        format!("{}{}{}", before, word.red().bold().underline(), after)
    } else {
        line.to_string()
    }
}

pub fn print_check_summary(status: &RunStatus, colored: bool) {
    println!();
    let files = status.files_checked;
    let file_word = if files == 1 { "file" } else { "files" };
    if status.error_count == 0 {
        let message = format!("✓ No spelling errors found in {} {}", files, file_word);
        if colored {
            println!("{}", message.green().bold());
        } else {
            println!("{}", message);
        }
    } else {
        let error_word = if status.error_count == 1 { "error" } else { "errors" };
        if colored {
            println!(
                "{} {} {} found in {} {}",
                "✗".red().bold(),
                status.error_count.to_string().red().bold(),
                error_word,
                files,
                file_word
            );
        } else {
            println!(
                "✗ {} {} found in {} {}",
                status.error_count, error_word, files, file_word
            );
        }
    }
}

pub fn print_fix_summary(status: &RunStatus, colored: bool) {
    println!();
    if status.fixed_count == 0 {
        if colored {
            println!("{}", "No corrections applied.".yellow().bold());
        } else {
            println!("No corrections applied.");
        }
    } else {
        let fix_word = if status.fixed_count == 1 {
            "correction"
        } else {
            "corrections"
        };
        if colored {
            println!(
                "{} {} {} applied",
                "✓".green().bold(),
                status.fixed_count.to_string().green().bold(),
                fix_word
            );
        } else {
            println!("✓ {} {} applied", status.fixed_count, fix_word);
        }
    }
    if status.quit {
        println!("Stopped before every file was checked.");
    }
}

/// Suggestions offered at the prompt, one per digit key.
const SHOWN_SUGGESTIONS: usize = 10;

/// Show one error and the keys the operator can answer with. At most ten
/// suggestions are offered, one per digit.
pub fn print_interactive_prompt(error: &SpellingError, suggestions: &[String], colored: bool) {
    let location = error.to_string();
    if colored {
        println!("\n{}", location.yellow().bold());
    } else {
        println!("\n{}", location);
    }
    println!("    {}", highlight(error, colored));

    let numbered = suggestions
        .iter()
        .take(SHOWN_SUGGESTIONS)
        .enumerate()
        .map(|(i, s)| {
            if colored {
                format!("{}: {}", i.to_string().cyan(), s.green())
            } else {
                format!("{}: {}", i, s)
            }
        })
        .collect::<Vec<_>>();
    if numbered.is_empty() {
        println!("    (no suggestions)");
    } else {
        println!("    {}", numbered.join(" | "));
    }

    let legend = "[0-9] use suggestion  [a] add to excluded words  [n] next file  [q] quit  [any other key] skip";
    if colored {
        println!("{}", legend.dimmed());
    } else {
        println!("{}", legend);
    }
}

fn invalid_selection_message(index: usize, available: usize) -> String {
    match available.min(SHOWN_SUGGESTIONS) {
        0 => format!("No suggestion {} (there are none)", index),
        shown => format!("No suggestion {} (choose 0-{})", index, shown - 1),
    }
}

pub fn print_invalid_selection(index: usize, available: usize, colored: bool) {
    let message = invalid_selection_message(index, available);
    if colored {
        println!("{}", message.red());
    } else {
        println!("{}", message);
    }
}
