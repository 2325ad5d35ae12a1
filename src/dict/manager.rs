use crate::checker::dictionary::{parse_wordlist, WordSet};
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Pinned commit so a download always builds the same dictionary.
const WORDLIST_BASE_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/6e4bc58ad764c3e6df8b5be4048671962c9d6a23";
const WORDLIST_VERSION: &str = "2023.12";

/// Languages with a known download source.
const SOURCES: &[(&str, &str)] = &[("en_GB", "words_alpha.txt"), ("en_US", "words_alpha.txt")];

pub struct DictionaryInfo {
    pub language: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

fn data_dir() -> Result<PathBuf> {
    crate::config::Config::data_dir().context("Failed to get data directory")
}

/// Dictionaries built in `dir`, sorted by language.
pub fn installed_in(dir: &Path) -> Result<Vec<DictionaryInfo>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("dict") {
            continue;
        }
        let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        found.push(DictionaryInfo {
            language: language.to_string(),
            size_bytes: fs::metadata(&path)?.len(),
            path,
        });
    }
    found.sort_by(|a, b| a.language.cmp(&b.language));
    Ok(found)
}

pub fn list_dictionaries() -> Result<()> {
    let data_dir = data_dir()?;
    let installed = installed_in(&data_dir)?;

    if installed.is_empty() {
        println!("{}", "No dictionaries installed.".yellow());
        println!(
            "Run {} to download a dictionary.",
            "srcspell dict download en_GB".cyan()
        );
        return Ok(());
    }

    println!("{}", "Installed dictionaries:".bold());
    println!();
    for info in &installed {
        println!(
            "  {} {} ({})",
            "✓".green(),
            info.language.cyan().bold(),
            format!("{}KB", info.size_bytes / 1024).dimmed()
        );
    }
    println!();
    println!(
        "Data directory: {}",
        data_dir.display().to_string().dimmed()
    );

    Ok(())
}

/// Build the dictionary for `language` from a word list file on disk.
pub fn install_from_file(language: &str, source: &Path, dir: &Path) -> Result<PathBuf> {
    let bytes = fs::read(source)
        .with_context(|| format!("Failed to read word list: {}", source.display()))?;
    install_words(language, &String::from_utf8_lossy(&bytes), dir)
}

fn install_words(language: &str, content: &str, dir: &Path) -> Result<PathBuf> {
    let words = parse_wordlist(content);
    if words.is_empty() {
        anyhow::bail!("Word list for '{}' contains no words", language);
    }
    println!("Found {} words", words.len().to_string().yellow());

    let dict_path = dir.join(format!("{}.dict", language));
    WordSet::build_from_words(&words, &dict_path)?;
    debug!("built {}", dict_path.display());
    Ok(dict_path)
}

/// Download a word list for `language` and build its dictionary. `url`
/// overrides the built-in source.
pub fn download_dictionary(language: &str, url: Option<&str>) -> Result<()> {
    let wordlist_url = match url {
        Some(url) => url.to_string(),
        None => match SOURCES.iter().find(|(lang, _)| *lang == language) {
            Some((_, file)) => format!("{}/{}", WORDLIST_BASE_URL, file),
            None => anyhow::bail!(
                "No download source known for '{}'. Pass --url, or build from a local list with `srcspell dict build {} <FILE>`.",
                language,
                language
            ),
        },
    };

    println!(
        "{} dictionary for {} (version: {})...",
        "Downloading".cyan().bold(),
        language.yellow(),
        WORDLIST_VERSION.dimmed()
    );
    println!("Source: {}", wordlist_url.dimmed());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Downloading...");

    let response =
        reqwest::blocking::get(&wordlist_url).context("Failed to download dictionary")?;
    if !response.status().is_success() {
        pb.finish_and_clear();
        anyhow::bail!("Failed to download dictionary: HTTP {}", response.status());
    }
    let content = response.text()?;
    pb.finish_with_message("Download complete");

    println!("{}", "Building dictionary...".cyan());
    let data_dir = data_dir()?;
    let dict_path = install_words(language, &content, &data_dir)?;

    println!(
        "{} Dictionary installed: {}",
        "✓".green().bold(),
        dict_path.display().to_string().cyan()
    );

    Ok(())
}

pub fn build_dictionary(language: &str, source: &Path) -> Result<()> {
    let dict_path = install_from_file(language, source, &data_dir()?)?;
    println!(
        "{} Dictionary installed: {}",
        "✓".green().bold(),
        dict_path.display().to_string().cyan()
    );
    Ok(())
}

pub fn update_dictionaries() -> Result<()> {
    let installed = installed_in(&data_dir()?)?;
    let languages: Vec<&str> = installed
        .iter()
        .map(|info| info.language.as_str())
        .filter(|lang| SOURCES.iter().any(|(known, _)| known == lang))
        .collect();

    if languages.is_empty() {
        println!("{}", "No dictionaries to update.".yellow());
        return Ok(());
    }

    println!(
        "{} {} {}...",
        "Updating".cyan().bold(),
        languages.len(),
        if languages.len() == 1 {
            "dictionary"
        } else {
            "dictionaries"
        }
    );
    println!();

    for language in languages {
        download_dictionary(language, None)?;
        println!();
    }

    println!("{} All dictionaries updated!", "✓".green().bold());

    Ok(())
}

pub fn show_info(language: &str) -> Result<()> {
    let dict_path = WordSet::get_dictionary_path(language)?;

    if !dict_path.exists() {
        println!(
            "{} Dictionary for {} not found.",
            "✗".red().bold(),
            language.yellow()
        );
        println!(
            "Run {} to download it.",
            format!("srcspell dict download {}", language).cyan()
        );
        return Ok(());
    }

    let metadata = fs::metadata(&dict_path)?;

    println!("{}", format!("Dictionary: {}", language).bold());
    println!("  Path: {}", dict_path.display());
    println!("  Size: {} KB", metadata.len() / 1024);
    println!("  Format: FST (Finite State Transducer)");

    match WordSet::load_from_path(&dict_path) {
        Ok(words) => println!("  Words: {}", words.len().to_string().yellow()),
        Err(e) => println!("  {}: {:#}", "Error loading dictionary".red(), e),
    }

    Ok(())
}
