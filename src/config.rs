use crate::core::{
    AgePolicies, AttributeDeriver, BreedSizeTable, CandidateFilter, CompatibilityScorer,
    Recommender, Thresholds,
};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub recommendations: RecommendationSettings,
    #[serde(default)]
    pub breeds: BreedSizeTable,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub age_policies: AgePolicies,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default = "default_top_picks_threshold")]
    pub top_picks_threshold: u8,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            age_policies: AgePolicies::default(),
            thresholds: Thresholds::default(),
            top_picks_threshold: default_top_picks_threshold(),
        }
    }
}

fn default_top_picks_threshold() -> u8 { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> u16 { 6 }
fn default_max_limit() -> usize { 50 }

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
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PAWMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PAWMATCH__SCORING__THRESHOLDS__TRAINING -> scoring.thresholds.training
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Build a recommender wired with these settings
    pub fn recommender(&self) -> Recommender {
        let scorer = CompatibilityScorer::new(
            AttributeDeriver::new(self.breeds.clone()),
            self.scoring.age_policies,
        );
        Recommender::new(
            scorer,
            CandidateFilter::new(self.scoring.thresholds),
            self.scoring.top_picks_threshold,
        )
    }
}

fn environment() -> Environment {
    Environment::with_prefix("PAWMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AgePolicy;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_thresholds() {
        let settings = Settings::default();
        let thresholds = settings.scoring.thresholds;
        assert_eq!(thresholds.training, 30);
        assert_eq!(thresholds.playdate, 40);
        assert_eq!(thresholds.dog_park, 20);
        assert_eq!(thresholds.competition, 50);
        assert_eq!(settings.scoring.top_picks_threshold, 50);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "compact");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = from_toml(
            r#"
            [scoring.thresholds]
            training = 45

            [scoring.age_policies]
            training = "strict"

            [breeds]
            small = ["corgi"]
            "#,
        );

        assert_eq!(settings.scoring.thresholds.training, 45);
        assert_eq!(settings.scoring.thresholds.playdate, 40);
        assert_eq!(settings.scoring.age_policies.training, AgePolicy::Strict);
        assert_eq!(settings.scoring.age_policies.competition, AgePolicy::Strict);
        assert_eq!(settings.breeds.small, vec!["corgi"]);
        assert!(!settings.breeds.large.is_empty());
        assert_eq!(settings.recommendations.max_limit, 50);
    }

    #[test]
    fn test_recommender_uses_breed_table() {
        let settings = from_toml(
            r#"
            [breeds]
            small = ["corgi"]
            large = []
            "#,
        );

        let recommender = settings.recommender();
        let size = recommender.scorer().deriver().estimate_size("Pembroke Corgi");
        assert_eq!(size, crate::models::DogSize::Small);
    }
}
