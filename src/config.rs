// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{NavigatorError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub search: SearchConfig,
    pub scoring: ScoringConfig,
    pub snippet: SnippetConfig,
    pub extraction: ExtractionConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchConfig {
    pub fuzzy_enabled: bool,
    /// Minimum similarity ratio (0-100) for a fuzzy hit.
    pub fuzzy_threshold: u8,
    pub max_results: usize,
    /// Content search is skipped once this many headings match.
    pub heading_sufficiency: usize,
    /// Paragraphs at or above this length (in characters) only match by substring.
    pub content_fuzzy_max_chars: usize,
    pub cache_capacity: usize,
    pub slow_search_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoringConfig {
    pub heading_substring_score: f64,
    pub heading_fuzzy_base: f64,
    pub heading_fuzzy_divisor: f64,
    pub content_substring_score: f64,
    pub content_fuzzy_base: f64,
    pub content_fuzzy_divisor: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SnippetConfig {
    pub verbatim_max_chars: usize,
    pub context_before: usize,
    pub context_after: usize,
    pub fallback_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Queries shorter than this are used verbatim when nothing else is extracted.
    pub short_query_chars: usize,
    pub min_cjk_word_chars: usize,
    pub min_latin_word_chars: usize,
    pub min_technical_term_chars: usize,
    pub enable_segmenter: bool,
    pub enable_stopword_tokenizer: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub parallel_workers: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_enabled: true,
            fuzzy_threshold: 70,
            max_results: 30,
            heading_sufficiency: 10,
            content_fuzzy_max_chars: 500,
            cache_capacity: 20,
            slow_search_ms: 500,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            heading_substring_score: 1.0,
            heading_fuzzy_base: 1.0,
            heading_fuzzy_divisor: 100.0,
            content_substring_score: 1.0,
            content_fuzzy_base: 0.5,
            content_fuzzy_divisor: 200.0,
        }
    }
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            verbatim_max_chars: 100,
            context_before: 40,
            context_after: 60,
            fallback_chars: 100,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            short_query_chars: 50,
            min_cjk_word_chars: 2,
            min_latin_word_chars: 3,
            min_technical_term_chars: 4,
            enable_segmenter: true,
            enable_stopword_tokenizer: true,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 4,
        }
    }
}

impl Config {
    /// Layers built-in defaults, the TOML file and `KB_NAVIGATOR__*` environment
    /// overrides. Without an explicit path the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| NavigatorError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("KB_NAVIGATOR")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| NavigatorError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| NavigatorError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            search: SearchConfig::default(),
            scoring: ScoringConfig::default(),
            snippet: SnippetConfig::default(),
            extraction: ExtractionConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_threshold(self.search.fuzzy_threshold)
            .map_err(|e| NavigatorError::Config(e.to_string()))?;

        if self.search.max_results == 0 {
            return Err(NavigatorError::Config(
                "max_results must be greater than 0".to_string(),
            ));
        }

        if self.search.cache_capacity == 0 {
            return Err(NavigatorError::Config(
                "cache_capacity must be greater than 0".to_string(),
            ));
        }

        if self.scoring.heading_fuzzy_divisor == 0.0 || self.scoring.content_fuzzy_divisor == 0.0 {
            return Err(NavigatorError::Config(
                "fuzzy score divisors must be non-zero".to_string(),
            ));
        }

        if self.snippet.verbatim_max_chars == 0 {
            return Err(NavigatorError::Config(
                "verbatim_max_chars must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.parallel_workers == 0 {
            return Err(NavigatorError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
