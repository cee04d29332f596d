use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Skill scale shared by the selector breakpoints and the skill updater.
pub const SKILL_MIN: f64 = 0.0;
pub const SKILL_MAX: f64 = 5.0;

/// Upper bound (inclusive) of the low band on the 0-5 scale.
pub const LOW_BAND_MAX: f64 = 2.0;
/// Upper bound (inclusive) of the medium band on the 0-5 scale.
pub const MEDIUM_BAND_MAX: f64 = 4.0;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Learner state tracked across evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    /// Ability on the 0-5 scale
    pub skill_estimate: f64,
    /// Estimated retention [0, 1], absent until the first recall computation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recall_level: Option<f64>,
    /// λ, per year
    pub forgetting_rate: f64,
    pub elapsed_time_years: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_recall_update: Option<DateTime<Utc>>,
}

impl Default for LearnerProfile {
    fn default() -> Self {
        Self {
            skill_estimate: SKILL_MIN,
            recall_level: None,
            forgetting_rate: 0.0,
            elapsed_time_years: 0.0,
            last_recall_update: None,
        }
    }
}

/// Declared difficulty of a catalog question: either a label ("easy",
/// "intermediate", ...) or a numeric ordinal on the 0-5 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Difficulty {
    Level(f64),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub prompt_text: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_option_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
    Low,
    #[default]
    Medium,
    High,
}

impl DifficultyBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Band for a value on the 0-5 scale. Used for both learner skill and
    /// numeric question levels so the two always line up.
    pub fn from_level(level: f64) -> Self {
        if level <= LOW_BAND_MAX {
            Self::Low
        } else if level <= MEDIUM_BAND_MAX {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Maps a catalog label. Returns `None` for labels we don't recognise.
    pub fn parse_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "low" | "beginner" | "basic" => Some(Self::Low),
            "medium" | "mid" | "intermediate" => Some(Self::Medium),
            "hard" | "high" | "advanced" | "expert" => Some(Self::High),
            _ => None,
        }
    }

    /// Fill order starting at this band, nearest difficulty first.
    pub fn fill_order(&self) -> [DifficultyBand; 3] {
        match self {
            Self::Low => [Self::Low, Self::Medium, Self::High],
            Self::Medium => [Self::Medium, Self::Low, Self::High],
            Self::High => [Self::High, Self::Medium, Self::Low],
        }
    }
}

impl Difficulty {
    /// Resolved band, or `None` when the declared value is unusable.
    pub fn band(&self) -> Option<DifficultyBand> {
        match self {
            Difficulty::Level(level) if level.is_finite() => Some(DifficultyBand::from_level(*level)),
            Difficulty::Level(_) => None,
            Difficulty::Label(label) => DifficultyBand::parse_label(label),
        }
    }
}

/// One submitted evaluation. `module_index == None` is the course's final
/// evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationAttempt {
    pub learner_id: String,
    pub course_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_index: Option<u32>,
    pub score_percent: f64,
    pub timestamp: DateTime<Utc>,
}

impl EvaluationAttempt {
    pub fn key(&self) -> AttemptKey<'_> {
        AttemptKey {
            learner_id: &self.learner_id,
            course_id: &self.course_id,
            module_index: self.module_index,
        }
    }

    pub fn scope(&self) -> EvaluationScope {
        EvaluationScope::from_module_index(self.module_index)
    }
}

/// (learner, course, module) identity of an evaluation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptKey<'a> {
    pub learner_id: &'a str,
    pub course_id: &'a str,
    pub module_index: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "index")]
pub enum EvaluationScope {
    Module(u32),
    Final,
}

impl EvaluationScope {
    pub fn from_module_index(module_index: Option<u32>) -> Self {
        match module_index {
            Some(index) => Self::Module(index),
            None => Self::Final,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            // Modules are zero-indexed in storage, one-indexed for learners.
            Self::Module(index) => format!("module {}", u64::from(*index) + 1),
            Self::Final => "the final evaluation".to_string(),
        }
    }
}

/// Onboarding survey answer feeding the initial recall baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    /// Months since the learner last worked in the subject area
    pub experience_months: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forgetting_rate: Option<f64>,
}
