use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::exam::ExamMode;

const MAX_VOCAB_WORDS_PER_SESSION: usize = 50;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_exam_mode")]
    pub default_exam_mode: ExamMode,
    #[serde(default = "default_vocab_words_per_session")]
    pub vocab_words_per_session: usize,
    #[serde(default = "default_vocab_focus_on_weak")]
    pub vocab_focus_on_weak: bool,
    #[serde(default = "default_show_explanations")]
    pub show_explanations: bool,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_exam_mode() -> ExamMode {
    ExamMode::QuickDrill
}
fn default_vocab_words_per_session() -> usize {
    10
}
fn default_vocab_focus_on_weak() -> bool {
    false
}
fn default_show_explanations() -> bool {
    true
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prepdrill")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_exam_mode: default_exam_mode(),
            vocab_words_per_session: default_vocab_words_per_session(),
            vocab_focus_on_weak: default_vocab_focus_on_weak(),
            show_explanations: default_show_explanations(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prepdrill")
            .join("config.toml")
    }

    /// Clamp out-of-range values from hand-edited config files.
    pub fn normalize(&mut self) {
        if self.vocab_words_per_session == 0 {
            self.vocab_words_per_session = default_vocab_words_per_session();
        }
        self.vocab_words_per_session = self
            .vocab_words_per_session
            .min(MAX_VOCAB_WORDS_PER_SESSION);
    }
}
