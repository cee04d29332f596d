//! Evaluation Outcome Classification
//!
//! Maps a score percentage onto a recommendation tier. Tiers come from a
//! versioned [`TierTable`]; a table is validated once when built and never
//! mutated afterwards, so changing boundaries means shipping a new version.
//!
//! Standard table (version 1):
//!
//! | score    | tier             | lock (min) | advance |
//! |----------|------------------|------------|---------|
//! | 0-10     | intensive_review | 60         | no      |
//! | 11-30    | strong_review    | 45         | no      |
//! | 31-60    | moderate_review  | 30         | no      |
//! | 61-69    | light_review     | 15         | no      |
//! | 70-85    | pass_with_review | 0          | yes     |
//! | 86-100   | excellent        | 0          | yes     |
//!
//! Each band stores its inclusive upper bound and a score belongs to the
//! first band whose bound covers it, so fractional scores between two
//! integer bands go to the higher one.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AssessmentError, Result};
use crate::sanitize::{ensure_score, is_valid_score};
use crate::types::{EvaluationScope, SCORE_MAX, SCORE_MIN};

pub const STANDARD_TABLE_VERSION: u32 = 1;

const DEFAULT_FALLBACK_MESSAGE: &str =
    "We couldn't evaluate a score of {score}% for {scope}. Please contact support if this persists.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    IntensiveReview,
    StrongReview,
    ModerateReview,
    LightReview,
    PassWithReview,
    Excellent,
    /// Only for malformed scores
    Default,
}

impl RecommendationTier {
    pub const NAMED: [RecommendationTier; 6] = [
        Self::IntensiveReview,
        Self::StrongReview,
        Self::ModerateReview,
        Self::LightReview,
        Self::PassWithReview,
        Self::Excellent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntensiveReview => "intensive_review",
            Self::StrongReview => "strong_review",
            Self::ModerateReview => "moderate_review",
            Self::LightReview => "light_review",
            Self::PassWithReview => "pass_with_review",
            Self::Excellent => "excellent",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierBand {
    pub tier: RecommendationTier,
    /// Inclusive upper bound of the band
    pub max_score: f64,
    pub lock_minutes: f64,
    pub can_advance: bool,
    /// `{score}` and `{scope}` are substituted when rendering
    pub message_template: String,
}

/// Deserialization always goes through [`TierTable::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTierTable")]
pub struct TierTable {
    version: u32,
    bands: Vec<TierBand>,
    fallback_message: String,
}

/// Wire shape of a tier table before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTierTable {
    version: u32,
    bands: Vec<TierBand>,
    #[serde(default = "default_fallback_message")]
    fallback_message: String,
}

impl TryFrom<RawTierTable> for TierTable {
    type Error = AssessmentError;

    fn try_from(raw: RawTierTable) -> Result<Self> {
        TierTable::new(raw.version, raw.bands, Some(raw.fallback_message))
    }
}

fn default_fallback_message() -> String {
    DEFAULT_FALLBACK_MESSAGE.to_string()
}

/// Classifier output handed back to the caller for persistence/display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub tier: RecommendationTier,
    pub score_percent: f64,
    pub lock_minutes: f64,
    pub can_advance: bool,
    pub message: String,
    pub table_version: u32,
}

impl Default for TierTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TierTable {
    /// Version 1 of the tier table.
    pub fn standard() -> Self {
        let band = |tier, max_score, lock_minutes, can_advance, message: &str| TierBand {
            tier,
            max_score,
            lock_minutes,
            can_advance,
            message_template: message.to_string(),
        };

        Self {
            version: STANDARD_TABLE_VERSION,
            bands: vec![
                band(
                    RecommendationTier::IntensiveReview,
                    10.0,
                    60.0,
                    false,
                    "You scored {score}% on {scope}. Work through the whole module again before your next attempt.",
                ),
                band(
                    RecommendationTier::StrongReview,
                    30.0,
                    45.0,
                    false,
                    "You scored {score}% on {scope}. Review the core lessons and practice exercises before retrying.",
                ),
                band(
                    RecommendationTier::ModerateReview,
                    60.0,
                    30.0,
                    false,
                    "You scored {score}% on {scope}. Revisit the sections you found difficult, then try again.",
                ),
                band(
                    RecommendationTier::LightReview,
                    69.0,
                    15.0,
                    false,
                    "You scored {score}% on {scope}. You're close; a quick review of the key points should do it.",
                ),
                band(
                    RecommendationTier::PassWithReview,
                    85.0,
                    0.0,
                    true,
                    "You passed {scope} with {score}%. Consider reviewing the questions you missed.",
                ),
                band(
                    RecommendationTier::Excellent,
                    100.0,
                    0.0,
                    true,
                    "Excellent work: {score}% on {scope}. You're ready to move on.",
                ),
            ],
            fallback_message: default_fallback_message(),
        }
    }

    /// Builds a validated table. Bands must be sorted by strictly increasing
    /// upper bound, end at 100, and name each of the six tiers exactly once.
    pub fn new(version: u32, bands: Vec<TierBand>, fallback_message: Option<String>) -> Result<Self> {
        let table = Self {
            version,
            bands,
            fallback_message: fallback_message.unwrap_or_else(default_fallback_message),
        };
        table.validate()?;
        Ok(table)
    }

    /// Malformed JSON is a `Json` error; a well-formed but invalid table is
    /// a `Config` error.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawTierTable = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let table = Self::from_json(&content)?;
        debug!(
            path = %path.as_ref().display(),
            version = table.version,
            "loaded tier table"
        );
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bands.is_empty() {
            return Err(AssessmentError::Config("tier table has no bands".to_string()));
        }

        let mut previous = f64::NEG_INFINITY;
        for band in &self.bands {
            if band.tier == RecommendationTier::Default {
                return Err(AssessmentError::Config(
                    "fallback tier cannot own a score band".to_string(),
                ));
            }
            if !band.max_score.is_finite() || band.max_score < SCORE_MIN || band.max_score > SCORE_MAX {
                return Err(AssessmentError::Config(format!(
                    "band {} upper bound {} outside [0, 100]",
                    band.tier.as_str(),
                    band.max_score
                )));
            }
            if band.max_score <= previous {
                return Err(AssessmentError::Config(format!(
                    "band {} overlaps or is out of order",
                    band.tier.as_str()
                )));
            }
            if !band.lock_minutes.is_finite() || band.lock_minutes < 0.0 {
                return Err(AssessmentError::Config(format!(
                    "band {} has invalid lock duration {}",
                    band.tier.as_str(),
                    band.lock_minutes
                )));
            }
            previous = band.max_score;
        }

        if previous != SCORE_MAX {
            return Err(AssessmentError::Config(format!(
                "tier table ends at {previous}, expected {SCORE_MAX}"
            )));
        }

        for tier in RecommendationTier::NAMED {
            let count = self.bands.iter().filter(|b| b.tier == tier).count();
            if count != 1 {
                return Err(AssessmentError::Config(format!(
                    "tier {} appears {count} times",
                    tier.as_str()
                )));
            }
        }

        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn bands(&self) -> &[TierBand] {
        &self.bands
    }

    /// Band covering `score`, `None` for out-of-range or non-finite scores.
    pub fn band_for(&self, score_percent: f64) -> Option<&TierBand> {
        if !is_valid_score(score_percent) {
            return None;
        }
        self.bands.iter().find(|band| score_percent <= band.max_score)
    }

    pub fn band_of(&self, tier: RecommendationTier) -> Option<&TierBand> {
        self.bands.iter().find(|band| band.tier == tier)
    }

    /// Lock duration attached to `tier`; the fallback never locks.
    pub fn lock_minutes(&self, tier: RecommendationTier) -> f64 {
        self.band_of(tier).map(|band| band.lock_minutes).unwrap_or(0.0)
    }
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}

fn render(template: &str, score: f64, scope: EvaluationScope) -> String {
    template
        .replace("{score}", &format_score(score))
        .replace("{scope}", &scope.describe())
}

/// Always yields a tier; malformed scores get [`RecommendationTier::Default`].
pub fn classify(table: &TierTable, score_percent: f64, scope: EvaluationScope) -> Recommendation {
    match table.band_for(score_percent) {
        Some(band) => {
            debug!(
                score_percent,
                tier = band.tier.as_str(),
                version = table.version,
                "classified evaluation score"
            );
            Recommendation {
                tier: band.tier,
                score_percent,
                lock_minutes: band.lock_minutes,
                can_advance: band.can_advance,
                message: render(&band.message_template, score_percent, scope),
                table_version: table.version,
            }
        }
        None => {
            warn!(score_percent, "score outside [0, 100], using fallback tier");
            Recommendation {
                tier: RecommendationTier::Default,
                score_percent,
                lock_minutes: 0.0,
                can_advance: false,
                message: render(&table.fallback_message, score_percent, scope),
                table_version: table.version,
            }
        }
    }
}

/// Like [`classify`] but surfaces malformed scores as a domain error.
pub fn try_classify(table: &TierTable, score_percent: f64, scope: EvaluationScope) -> Result<Recommendation> {
    ensure_score(score_percent)?;
    Ok(classify(table, score_percent, scope))
}
