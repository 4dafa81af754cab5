use crate::error::{Result, SubalignError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub model: String,
    /// Source language of the transcript (the boundary heuristics target English).
    pub source_lang: String,
    /// Target language of the translation (sentence splitting targets Chinese).
    pub target_lang: String,
    /// Character budget per translation batch.
    pub batch_char_limit: usize,
    /// Character budget per subtitle display line.
    pub line_char_limit: usize,
    /// Also request per-fragment (list mode) translation.
    pub list_mode: bool,
    /// Directory for outputs and intermediate artifacts.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: "gemini-2.0-flash".to_string(),
            source_lang: "en".to_string(),
            target_lang: "zh".to_string(),
            batch_char_limit: 10_000,
            line_char_limit: 25,
            list_mode: false,
            output_dir: PathBuf::from("translated"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini_api_key = Some(key);
        }
        if let Ok(model) = std::env::var("SUBALIGN_MODEL") {
            config.model = model;
        }
        if let Ok(lang) = std::env::var("SUBALIGN_SOURCE_LANG") {
            config.source_lang = lang;
        }
        if let Ok(lang) = std::env::var("SUBALIGN_TARGET_LANG") {
            config.target_lang = lang;
        }
        if let Ok(limit) = std::env::var("SUBALIGN_BATCH_CHARS") {
            if let Ok(n) = limit.parse() {
                config.batch_char_limit = n;
            }
        }
        if let Ok(limit) = std::env::var("SUBALIGN_LINE_CHARS") {
            if let Ok(n) = limit.parse() {
                config.line_char_limit = n;
            }
        }
        if let Ok(dir) = std::env::var("SUBALIGN_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Validate the configuration. `require_api_key` is false when running
    /// from previously persisted translation artifacts.
    pub fn validate(&self, require_api_key: bool) -> Result<()> {
        if require_api_key && self.gemini_api_key.is_none() {
            return Err(SubalignError::Config(
                "GEMINI_API_KEY not set. Get one at https://aistudio.google.com/apikey"
                    .to_string(),
            ));
        }

        if self.batch_char_limit == 0 {
            return Err(SubalignError::Config(
                "Batch character limit must be greater than 0".to_string(),
            ));
        }

        if self.line_char_limit == 0 {
            return Err(SubalignError::Config(
                "Line character limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("subalign").join("config.toml"))
    }
}
