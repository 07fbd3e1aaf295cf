use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;
use crate::session::Mode;
use crate::story::StoryRequest;

pub const DEFAULT_WORDS: usize = 25;
pub const DEFAULT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModeKind {
    Words,
    Time,
}

/// Preferences remembered between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: ModeKind,
    pub number_of_words: usize,
    pub number_of_secs: u64,
    pub punctuation: bool,
    pub numbers: bool,
    pub alphabet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ModeKind::Words,
            number_of_words: DEFAULT_WORDS,
            number_of_secs: DEFAULT_SECS,
            punctuation: false,
            numbers: false,
            alphabet: false,
        }
    }
}

impl Config {
    pub fn session_mode(&self) -> Mode {
        match self.mode {
            ModeKind::Words => Mode::Words {
                target_length: self.number_of_words,
            },
            ModeKind::Time => Mode::Time {
                limit_seconds: self.number_of_secs,
            },
        }
    }

    /// Time mode has no natural length, so it asks for enough words that
    /// nobody runs out before the clock does.
    pub fn story_request(&self, seed: impl Into<String>) -> StoryRequest {
        let target_word_count = match self.mode {
            ModeKind::Words => self.number_of_words,
            ModeKind::Time => (self.number_of_secs as usize).saturating_mul(4).max(self.number_of_words),
        };

        StoryRequest {
            include_punctuation: self.punctuation,
            include_numbers: self.numbers,
            include_alphabet: self.alphabet,
            target_word_count,
            uniqueness_seed: seed.into(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("typesprint_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no stored config, using defaults");
                return Config::default();
            }
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed config, using defaults");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
