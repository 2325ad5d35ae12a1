use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use log::debug;
use srcspell::checker::dictionary::{read_wordlist, FstDictionary, WordSet};
use srcspell::checker::RunStatus;
use srcspell::cli::interactive::TerminalOperator;
use srcspell::cli::output::{self, OutputFormat};
use srcspell::config::Overrides;
use srcspell::encoding::Encoding;
use srcspell::fix::{Action, Corrector, FirstSuggestion, Operator};
use srcspell::{dict, files, CheckResult, Config, SpellChecker};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "srcspell")]
#[command(version, about = "Spell check the comments, strings and docs of source files", long_about = None)]
struct Cli {
    /// Files or directories to check [default: the base directory]
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Base directory: names are reported relative to it, and it holds
    /// .srcspell.toml and the excluded words file
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    directory: PathBuf,

    /// Correct errors interactively, one keypress per error
    #[arg(short, long, conflicts_with = "fix")]
    interactive: bool,

    /// Replace every misspelling with its first suggestion
    #[arg(long)]
    fix: bool,

    /// Language/dictionary to use (e.g., en_GB, en_US)
    #[arg(short, long)]
    language: Option<String>,

    /// Personal word list [default: .excluded-words]
    #[arg(short = 'e', long, value_name = "FILE")]
    excluded_words: Option<PathBuf>,

    /// Extra glob of files to skip (repeatable)
    #[arg(short = 'I', long = "ignore-patterns", value_name = "GLOB")]
    ignore_patterns: Vec<String>,

    /// Encoding of the checked files (utf-8, latin-1)
    #[arg(short = 'E', long)]
    encoding: Option<Encoding>,

    /// Check against this word list instead of the installed dictionary
    #[arg(long, value_name = "FILE")]
    dictionary: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if errors are found
    #[arg(long)]
    no_fail: bool,

    /// Number of files to check in parallel
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Log what is being checked
    #[arg(short, long)]
    verbose: bool,

    /// Add words to the excluded words file
    #[arg(long, value_name = "WORD")]
    add_to_dict: Vec<String>,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// List installed dictionaries
    List,
    /// Download a dictionary
    Download {
        /// Language code (e.g., en_GB, en_US)
        language: String,
        /// Word list to download instead of the built-in source
        #[arg(long)]
        url: Option<String>,
    },
    /// Build a dictionary from a local word list or hunspell .dic file
    Build {
        /// Language code
        language: String,
        /// Word list file
        source: PathBuf,
    },
    /// Update all dictionaries
    Update,
    /// Show dictionary info
    Info {
        /// Language code
        language: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn run(mut cli: Cli) -> Result<i32> {
    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "srcspell", &mut io::stdout());
        return Ok(0);
    }

    // Handle subcommands
    if let Some(command) = cli.command.take() {
        handle_command(command)?;
        return Ok(0);
    }

    if cli.no_color {
        colored::control::set_override(false);
    }
    let colored = !cli.no_color;

    let base_dir = cli.directory.clone();
    let config = Config::load(
        &base_dir,
        Overrides {
            language: cli.language.clone(),
            excluded_words: cli.excluded_words.clone(),
            ignore_patterns: cli.ignore_patterns.clone(),
            encoding: cli.encoding,
        },
    )?;
    debug!("{:?}", config);

    let checker = build_checker(&config, &base_dir, cli.dictionary.as_deref())?;

    if !cli.add_to_dict.is_empty() {
        for word in &cli.add_to_dict {
            checker.dictionary().add(word)?;
        }
        println!(
            "Added {} {} to {}",
            cli.add_to_dict.len(),
            if cli.add_to_dict.len() == 1 { "word" } else { "words" },
            config.excluded_words_path(&base_dir).display()
        );
        if cli.paths.is_empty() {
            return Ok(0);
        }
    }

    let roots = if cli.paths.is_empty() {
        vec![base_dir.clone()]
    } else {
        cli.paths.clone()
    };
    let paths = files::collect_files(&roots, &config.ignore_patterns)?;

    let status = if cli.interactive {
        correct_files(&checker, &paths, &mut TerminalOperator::new(colored), colored)?
    } else if cli.fix {
        correct_files(&checker, &paths, &mut FirstSuggestion, colored)?
    } else {
        check_files(&checker, &paths, &cli, config.max_suggestions, colored)?
    };

    // Exit with appropriate code
    if cli.no_fail {
        Ok(0)
    } else {
        Ok(status.exit_code())
    }
}

fn build_checker(config: &Config, base_dir: &Path, wordlist: Option<&Path>) -> Result<SpellChecker> {
    let Some(wordlist) = wordlist else {
        return SpellChecker::from_config(config, base_dir);
    };

    let words = WordSet::from_words(&read_wordlist(wordlist)?)?;
    let dictionary = FstDictionary::new(words, config.max_suggestions)
        .with_personal(&config.excluded_words_path(base_dir))?;
    Ok(SpellChecker::new(config, base_dir, Box::new(dictionary)))
}

fn check_files(
    checker: &SpellChecker,
    paths: &[PathBuf],
    cli: &Cli,
    max_suggestions: usize,
    colored: bool,
) -> Result<RunStatus> {
    let results = match cli.jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("Failed to start worker threads")?
            .install(|| checker.check(paths)),
        None => checker.check(paths),
    };

    let mut status = RunStatus::default();
    for result in &results {
        status.record(result);
        if let Some(failure) = &result.failure {
            output::print_failure(failure, colored);
        }
        if cli.format == OutputFormat::Text {
            output::print_errors(result, max_suggestions, colored);
        }
    }

    match cli.format {
        OutputFormat::Text => output::print_check_summary(&status, colored),
        OutputFormat::Json => output::print_json(&results, &status)?,
    }
    Ok(status)
}

/// Visit files one at a time, writing each back before opening the next.
fn correct_files(
    checker: &SpellChecker,
    paths: &[PathBuf],
    operator: &mut dyn Operator,
    colored: bool,
) -> Result<RunStatus> {
    let corrector = Corrector::new(checker.dictionary());
    let mut status = RunStatus::default();

    for path in paths {
        let file = match checker.open(path) {
            Ok(file) => file,
            Err(failure) => {
                output::print_failure(&failure, colored);
                status.record(&CheckResult {
                    file: files::relative_name(path, checker.base_dir()),
                    failure: Some(failure),
                    ..Default::default()
                });
                continue;
            }
        };

        let session = corrector.correct(&file, checker.filter(), operator)?;
        if let Some(failure) = &session.result.failure {
            output::print_failure(failure, colored);
        }

        // Corrections made before a parse failure are still written.
        let write_failed = match session.commit(&file) {
            Ok(_) => false,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                true
            }
        };
        status.record(&session.result);
        if write_failed && !session.result.failed() {
            status.failed_files += 1;
        }

        if session.action == Action::Quit {
            status.quit = true;
            break;
        }
    }

    output::print_fix_summary(&status, colored);
    Ok(status)
}

fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Dict { action } => match action {
            DictCommands::List => {
                dict::manager::list_dictionaries()?;
            }
            DictCommands::Download { language, url } => {
                dict::manager::download_dictionary(&language, url.as_deref())?;
            }
            DictCommands::Build { language, source } => {
                dict::manager::build_dictionary(&language, &source)?;
            }
            DictCommands::Update => {
                dict::manager::update_dictionaries()?;
            }
            DictCommands::Info { language } => {
                dict::manager::show_info(&language)?;
            }
        },
    }
    Ok(())
}
