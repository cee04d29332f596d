use std::path::PathBuf;

use crate::error::{AssessmentError, Result};
use crate::outcome::TierTable;
use crate::recall::DEFAULT_FORGETTING_RATE;

pub const ENV_LOG_LEVEL: &str = "ASSESSMENT_LOG_LEVEL";
pub const ENV_TIER_TABLE: &str = "ASSESSMENT_TIER_TABLE";
pub const ENV_DEFAULT_FORGETTING_RATE: &str = "ASSESSMENT_DEFAULT_FORGETTING_RATE";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub log_level: String,
    pub tier_table: TierTable,
    /// λ used when a survey doesn't carry its own, per year
    pub default_forgetting_rate: f64,
    pub tier_table_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tier_table: TierTable::standard(),
            default_forgetting_rate: DEFAULT_FORGETTING_RATE,
            tier_table_path: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    /// Unparseable numbers fall back to defaults; a tier table file that
    /// can't be read or doesn't validate is an error.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(ENV_LOG_LEVEL).or_else(|| lookup("RUST_LOG")) {
            config.log_level = level;
        }

        if let Some(rate) = lookup(ENV_DEFAULT_FORGETTING_RATE)
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|rate| rate.is_finite() && *rate >= 0.0)
        {
            config.default_forgetting_rate = rate;
        }

        if let Some(path) = lookup(ENV_TIER_TABLE).filter(|p| !p.trim().is_empty()) {
            let path = PathBuf::from(path);
            config.tier_table = TierTable::from_path(&path).map_err(|err| {
                AssessmentError::Config(format!("tier table {}: {err}", path.display()))
            })?;
            config.tier_table_path = Some(path);
        }

        Ok(config)
    }
}
