//! Skill estimate updates.
//!
//! Two channels coexist: the legacy averaged channel smooths noise with
//! `(previous + new) / 2`, the latest channel replaces the estimate with the
//! newest measurement. The caller picks the channel; exactly one policy is
//! applied per call and only `skill_estimate` changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AssessmentError, Result};
use crate::sanitize::{clamp_skill, ensure_finite, ensure_score};
use crate::types::{LearnerProfile, SCORE_MAX, SKILL_MAX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateChannel {
    Averaged,
    Latest,
}

impl UpdateChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Averaged => "averaged",
            Self::Latest => "latest",
        }
    }

    fn apply(&self, previous: f64, new_ability: f64) -> f64 {
        match self {
            Self::Averaged => (previous + new_ability) / 2.0,
            Self::Latest => new_ability,
        }
    }
}

impl fmt::Display for UpdateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateChannel {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "averaged" => Ok(Self::Averaged),
            "latest" => Ok(Self::Latest),
            _ => Err(AssessmentError::UnknownChannel(s.to_string())),
        }
    }
}

/// Score percentage [0, 100] on the 0-5 ability scale.
pub fn ability_from_score(score_percent: f64) -> Result<f64> {
    let score = ensure_score(score_percent)?;
    Ok(score * SKILL_MAX / SCORE_MAX)
}

pub fn update_skill(
    previous: &LearnerProfile,
    new_ability: f64,
    channel: UpdateChannel,
) -> Result<LearnerProfile> {
    let new_ability = ensure_finite("new_ability", new_ability)?;
    let skill = clamp_skill(channel.apply(previous.skill_estimate, new_ability));

    debug!(
        channel = channel.as_str(),
        previous = previous.skill_estimate,
        new_ability,
        updated = skill,
        "skill estimate updated"
    );

    Ok(LearnerProfile {
        skill_estimate: skill,
        ..previous.clone()
    })
}
