use crate::encoding::Encoding;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG: &str = ".srcspell.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: String,

    /// Personal word list. Relative paths are resolved against the base
    /// directory of the run.
    pub excluded_words: PathBuf,

    /// Extra globs to skip, on top of the built-in ones.
    pub ignore_patterns: Vec<String>,

    pub encoding: Encoding,

    pub max_suggestions: usize,

    pub min_string_length: usize,

    /// File extension -> lexer name.
    pub languages: HashMap<String, String>,
}

fn default_language() -> String {
    "en_GB".to_string()
}

fn default_excluded_words() -> PathBuf {
    PathBuf::from(".excluded-words")
}

fn default_max_suggestions() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            excluded_words: default_excluded_words(),
            ignore_patterns: Vec::new(),
            encoding: Encoding::default(),
            max_suggestions: default_max_suggestions(),
            min_string_length: crate::checker::filter::MIN_STRING_LENGTH,
            languages: HashMap::new(),
        }
    }
}

/// Settings given on the command line. They win over every config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub excluded_words: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,
    pub encoding: Option<Encoding>,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(base_dir: &Path, overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                debug!("loading {}", global_path.display());
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        // Load local config (overrides global)
        let local_path = base_dir.join(LOCAL_CONFIG);
        if local_path.exists() {
            debug!("loading {}", local_path.display());
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        // Apply CLI overrides
        if let Some(language) = overrides.language {
            config.language = language;
        }
        if let Some(path) = overrides.excluded_words {
            config.excluded_words = path;
        }
        if let Some(encoding) = overrides.encoding {
            config.encoding = encoding;
        }
        config.ignore_patterns.extend(overrides.ignore_patterns);

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        // Merge logic: other's values override self's if they differ from defaults
        if other.language != default_language() {
            self.language = other.language;
        }
        if other.excluded_words != default_excluded_words() {
            self.excluded_words = other.excluded_words;
        }
        self.ignore_patterns.extend(other.ignore_patterns);
        if other.encoding != Encoding::default() {
            self.encoding = other.encoding;
        }
        if other.max_suggestions != default_max_suggestions() {
            self.max_suggestions = other.max_suggestions;
        }
        if other.min_string_length != crate::checker::filter::MIN_STRING_LENGTH {
            self.min_string_length = other.min_string_length;
        }
        self.languages.extend(other.languages);
        self
    }

    pub fn excluded_words_path(&self, base_dir: &Path) -> PathBuf {
        if self.excluded_words.is_absolute() {
            self.excluded_words.clone()
        } else {
            base_dir.join(&self.excluded_words)
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "srcspell").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn cache_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "srcspell").map(|dirs| dirs.cache_dir().to_path_buf())
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "srcspell").map(|dirs| dirs.data_dir().to_path_buf())
    }
}
