//! Assessment Engine - unified entry point
//!
//! Wires the components into the request flow of the host service:
//! survey → baseline recall, quiz request → adaptive selection,
//! submission → tier + lock + skill update, retry → lock gate.
//!
//! The engine holds configuration only. Every call is a pure function of
//! its arguments, so one engine can be shared across threads.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::outcome::{try_classify, Recommendation, TierTable};
use crate::recall::{baseline_from_survey, refresh_batch, refresh_profile, RecallRefreshInput, RecallRefreshResult};
use crate::retry::{check_lock, gate_retry, RetryLockState};
use crate::selection::select_adaptive_questions;
use crate::skill::{ability_from_score, update_skill, UpdateChannel};
use crate::types::{AttemptKey, EvaluationAttempt, LearnerProfile, Question, SurveyResponse};

/// Everything the caller needs to persist after a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
    pub recommendation: Recommendation,
    /// Lock as of the submission time
    pub lock: RetryLockState,
    pub profile: LearnerProfile,
}

#[derive(Debug, Clone, Default)]
pub struct AssessmentEngine {
    config: EngineConfig,
}

impl AssessmentEngine {
    pub fn new(config: EngineConfig) -> Self {
        info!(
            tier_table_version = config.tier_table.version(),
            default_forgetting_rate = config.default_forgetting_rate,
            "assessment engine configured"
        );
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tier_table(&self) -> &TierTable {
        &self.config.tier_table
    }

    pub fn onboard(&self, survey: &SurveyResponse, now: DateTime<Utc>) -> Result<LearnerProfile> {
        baseline_from_survey(survey, self.config.default_forgetting_rate, now)
    }

    pub fn refresh_recall(
        &self,
        profile: &LearnerProfile,
        elapsed_years: f64,
        now: DateTime<Utc>,
    ) -> Result<LearnerProfile> {
        refresh_profile(profile, elapsed_years, now)
    }

    pub fn refresh_recall_batch(&self, inputs: &[RecallRefreshInput], now: DateTime<Utc>) -> Vec<RecallRefreshResult> {
        refresh_batch(inputs, now)
    }

    pub fn draw_questions<R: Rng + ?Sized>(
        &self,
        pool: &[Question],
        profile: &LearnerProfile,
        count: usize,
        rng: &mut R,
    ) -> Vec<Question> {
        select_adaptive_questions(pool, profile.skill_estimate, count, rng)
    }

    /// Classifies the attempt, derives its lock at submission time and folds
    /// the score into the skill estimate through `channel`. Out-of-range
    /// scores are rejected before anything is computed.
    pub fn submit(
        &self,
        profile: &LearnerProfile,
        attempt: &EvaluationAttempt,
        channel: UpdateChannel,
    ) -> Result<EvaluationOutcome> {
        let recommendation = try_classify(&self.config.tier_table, attempt.score_percent, attempt.scope())?;
        let ability = ability_from_score(attempt.score_percent)?;
        let profile = update_skill(profile, ability, channel)?;
        let lock = check_lock(Some(attempt.timestamp), recommendation.lock_minutes, attempt.timestamp);

        info!(
            learner_id = %attempt.learner_id,
            course_id = %attempt.course_id,
            module_index = ?attempt.module_index,
            score_percent = attempt.score_percent,
            tier = recommendation.tier.as_str(),
            can_advance = recommendation.can_advance,
            skill_estimate = profile.skill_estimate,
            "evaluation outcome computed"
        );

        Ok(EvaluationOutcome {
            recommendation,
            lock,
            profile,
        })
    }

    pub fn retry_state(
        &self,
        attempts: &[EvaluationAttempt],
        key: AttemptKey<'_>,
        now: DateTime<Utc>,
    ) -> RetryLockState {
        gate_retry(attempts, key, &self.config.tier_table, now)
    }
}
