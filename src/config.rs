use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::core::{CompatibilityScorer, OptimalMatcher, SearchOptions, DEFAULT_MAX_NODES};
use crate::models::WeightProfile;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_hobby_overlap_bonus")]
    pub hobby_overlap_bonus: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            hobby_overlap_bonus: default_hobby_overlap_bonus(),
        }
    }
}

fn default_hobby_overlap_bonus() -> f64 { 1.2 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_sleep_time_weight")]
    pub sleep_time: f64,
    #[serde(default = "default_study_time_weight")]
    pub study_time: f64,
    #[serde(default = "default_cleanliness_weight")]
    pub cleanliness: f64,
    #[serde(default = "default_noise_tolerance_weight")]
    pub noise_tolerance: f64,
    #[serde(default = "default_personality_weight")]
    pub personality: f64,
    #[serde(default = "default_hobbies_weight")]
    pub hobbies: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            sleep_time: default_sleep_time_weight(),
            study_time: default_study_time_weight(),
            cleanliness: default_cleanliness_weight(),
            noise_tolerance: default_noise_tolerance_weight(),
            personality: default_personality_weight(),
            hobbies: default_hobbies_weight(),
        }
    }
}

impl From<&WeightsConfig> for WeightProfile {
    fn from(config: &WeightsConfig) -> Self {
        WeightProfile {
            sleep_time: config.sleep_time,
            study_time: config.study_time,
            cleanliness: config.cleanliness,
            noise_tolerance: config.noise_tolerance,
            personality: config.personality,
            hobbies: config.hobbies,
        }
    }
}

fn default_sleep_time_weight() -> f64 { 0.25 }
fn default_study_time_weight() -> f64 { 0.20 }
fn default_cleanliness_weight() -> f64 { 0.20 }
fn default_noise_tolerance_weight() -> f64 { 0.15 }
fn default_personality_weight() -> f64 { 0.10 }
fn default_hobbies_weight() -> f64 { 0.10 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
    /// Wall-clock limit per search; unset means only the node cap applies
    pub timeout_ms: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            timeout_ms: None,
        }
    }
}

fn default_max_nodes() -> usize { DEFAULT_MAX_NODES }

impl SearchSettings {
    /// Search options for one run; the deadline starts counting now
    pub fn options(&self) -> SearchOptions {
        let options = SearchOptions::default().with_max_nodes(self.max_nodes);
        match self.timeout_ms {
            Some(ms) => options.with_timeout(Duration::from_millis(ms)),
            None => options,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl LoggingSettings {
    /// Filter from `RUST_LOG` when set, otherwise from the configured level
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ROOMMATE_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ROOMMATE__SEARCH__MAX_NODES -> search.max_nodes
            .add_source(
                Environment::with_prefix("ROOMMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ROOMMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(settings)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject weight profiles and search limits the engine cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scorer()?;

        if self.search.max_nodes == 0 {
            return Err(ConfigError::Message(
                "search.max_nodes must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn weights(&self) -> WeightProfile {
        WeightProfile::from(&self.scoring.weights)
    }

    /// Scorer built from the configured weights and bonus
    pub fn scorer(&self) -> Result<CompatibilityScorer, ConfigError> {
        CompatibilityScorer::new(self.weights(), self.scoring.hobby_overlap_bonus)
            .map_err(|e| ConfigError::Message(format!("invalid scoring configuration: {}", e)))
    }

    pub fn matcher(&self) -> Result<OptimalMatcher, ConfigError> {
        Ok(OptimalMatcher::new(self.scorer()?, self.search.options()))
    }
}
