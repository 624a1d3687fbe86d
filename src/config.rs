//! Configuration management for the ATS analyzer

use crate::error::{AtsError, Result};
use crate::processing::ats_matcher::DEFAULT_MAX_POSITIONS;
use crate::processing::keyword_extractor::{DEFAULT_MAX_KEYWORDS, DEFAULT_MIN_FREQUENCY};
use crate::processing::skill_matcher::DEFAULT_CRITICAL_WINDOW;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const WEIGHT_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub extraction: ExtractionConfig,
    pub ai: AiConfig,
    pub output: OutputConfig,
}

/// Weights of the four component scores in the overall score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub keyword_weight: f64,
    pub skills_weight: f64,
    pub formatting_weight: f64,
    pub content_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub max_keywords: usize,
    pub min_keyword_frequency: usize,
    pub critical_window: usize,
    pub max_positions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            keyword_weight: 0.4,
            skills_weight: 0.3,
            formatting_weight: 0.2,
            content_weight: 0.1,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_keywords: DEFAULT_MAX_KEYWORDS,
            min_keyword_frequency: DEFAULT_MIN_FREQUENCY,
            critical_window: DEFAULT_CRITICAL_WINDOW,
            max_positions: DEFAULT_MAX_POSITIONS,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            extraction: ExtractionConfig::default(),
            ai: AiConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ScoringConfig {
    pub fn total(&self) -> f64 {
        self.keyword_weight + self.skills_weight + self.formatting_weight + self.content_weight
    }
}

impl AiConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

impl Config {
    /// Load from the default location, creating it with defaults on first use
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| AtsError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-analyzer")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        let weights = [
            ("keyword_weight", s.keyword_weight),
            ("skills_weight", s.skills_weight),
            ("formatting_weight", s.formatting_weight),
            ("content_weight", s.content_weight),
        ];

        if let Some((name, value)) = weights.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(AtsError::Configuration(format!(
                "scoring.{} must be a non-negative number, got {}",
                name, value
            )));
        }

        if (s.total() - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(AtsError::Configuration(format!(
                "Scoring weights must sum to 1.0, got {:.3}",
                s.total()
            )));
        }

        if self.extraction.max_keywords == 0 {
            return Err(AtsError::Configuration(
                "extraction.max_keywords must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Set one dotted key (e.g. `scoring.keyword_weight`), keeping the
    /// TOML type of the value it replaces
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let (section, field) = key.split_once('.').ok_or_else(|| {
            AtsError::Configuration(format!("Key must look like section.field, got '{}'", key))
        })?;

        let mut document = toml::Value::try_from(&*self)
            .map_err(|e| AtsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        let slot = document
            .get_mut(section)
            .and_then(|table| table.get_mut(field))
            .ok_or_else(|| AtsError::Configuration(format!("Unknown configuration key '{}'", key)))?;

        let expected = slot.type_str();
        let coerced = coerce_like(slot, value).ok_or_else(|| {
            AtsError::Configuration(format!(
                "Invalid value '{}' for {} (expected {})",
                value, key, expected
            ))
        })?;
        *slot = coerced;

        let updated: Config = document.try_into()?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn coerce_like(current: &toml::Value, raw: &str) -> Option<toml::Value> {
    let raw = raw.trim();
    match current {
        toml::Value::String(_) => Some(toml::Value::String(raw.to_string())),
        toml::Value::Integer(_) => raw.parse().ok().map(toml::Value::Integer),
        toml::Value::Float(_) => raw.parse().ok().map(toml::Value::Float),
        toml::Value::Boolean(_) => raw.parse().ok().map(toml::Value::Boolean),
        _ => None,
    }
}
