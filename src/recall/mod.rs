//! Recall Model - exponential forgetting curve
//!
//! Core theory:
//! - Retained fraction of learned material decays exponentially with time
//! - One formula serves both the onboarding survey and the periodic refresh
//!
//! Mathematical formula:
//! - Recall probability: R = exp(-λ·t)
//!   - t: elapsed time (years)
//!   - λ: forgetting rate (per year), λ = 0 means no forgetting
//!
//! Negative or non-finite inputs are caller-side data corruption and are
//! returned as [`AssessmentError::DomainInput`], never clamped.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{AssessmentError, Result};
use crate::sanitize::ensure_non_negative;
use crate::types::{LearnerProfile, SurveyResponse, MONTHS_PER_YEAR};

// ==================== Constants ====================

/// Default forgetting rate λ (per year) when the survey doesn't supply one
pub const DEFAULT_FORGETTING_RATE: f64 = 0.5;

/// Milliseconds in a 365.25-day year
const MILLIS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0 * 1000.0;

// ==================== Data Structures ====================

/// One learner in a batch refresh
#[derive(Clone, Debug)]
pub struct RecallRefreshInput {
    pub learner_id: String,
    pub profile: LearnerProfile,
    /// Elapsed time chosen by the caller (experience gap or time since last update)
    pub elapsed_years: f64,
}

/// Batch refresh output, in input order
#[derive(Debug)]
pub struct RecallRefreshResult {
    pub learner_id: String,
    pub outcome: Result<LearnerProfile>,
}

// ==================== Core Functions ====================

pub fn months_to_years(months: f64) -> f64 {
    months / MONTHS_PER_YEAR
}

/// R = exp(-λ·t), always in (0, 1]. When λ·t is large enough for the
/// exponential to underflow, the result floors at `f64::MIN_POSITIVE`.
pub fn recall_probability(elapsed_years: f64, forgetting_rate: f64) -> Result<f64> {
    let t = ensure_non_negative("elapsed_years", elapsed_years)?;
    let lambda = ensure_non_negative("forgetting_rate", forgetting_rate)?;

    if t == 0.0 || lambda == 0.0 {
        return Ok(1.0);
    }

    Ok((-lambda * t).exp().max(f64::MIN_POSITIVE))
}

/// Fractional years between two timestamps. `now` earlier than `since` is
/// a domain error.
pub fn elapsed_years_since(since: DateTime<Utc>, now: DateTime<Utc>) -> Result<f64> {
    let millis = (now - since).num_milliseconds();
    if millis < 0 {
        return Err(AssessmentError::domain("elapsed_millis", millis as f64));
    }
    Ok(millis as f64 / MILLIS_PER_YEAR)
}

/// Initial profile for a learner who just completed the onboarding survey.
pub fn baseline_from_survey(
    survey: &SurveyResponse,
    default_forgetting_rate: f64,
    now: DateTime<Utc>,
) -> Result<LearnerProfile> {
    let months = ensure_non_negative("experience_months", survey.experience_months)?;
    let forgetting_rate = survey.forgetting_rate.unwrap_or(default_forgetting_rate);
    let elapsed_years = months_to_years(months);

    let recall = recall_probability(elapsed_years, forgetting_rate)?;
    debug!(elapsed_years, forgetting_rate, recall, "computed survey recall baseline");

    Ok(LearnerProfile {
        recall_level: Some(recall),
        forgetting_rate,
        elapsed_time_years: elapsed_years,
        last_recall_update: Some(now),
        ..LearnerProfile::default()
    })
}

/// Recomputes the recall level with the profile's own λ. Only
/// `recall_level`, `elapsed_time_years` and `last_recall_update` change.
pub fn refresh_profile(
    profile: &LearnerProfile,
    elapsed_years: f64,
    now: DateTime<Utc>,
) -> Result<LearnerProfile> {
    let recall = recall_probability(elapsed_years, profile.forgetting_rate)?;

    Ok(LearnerProfile {
        recall_level: Some(recall),
        elapsed_time_years: elapsed_years,
        last_recall_update: Some(now),
        ..profile.clone()
    })
}

/// Background refresh over many learners using parallel processing.
/// A bad record fails alone; the rest of the batch still completes.
pub fn refresh_batch(inputs: &[RecallRefreshInput], now: DateTime<Utc>) -> Vec<RecallRefreshResult> {
    let results: Vec<RecallRefreshResult> = inputs
        .par_iter()
        .map(|input| RecallRefreshResult {
            learner_id: input.learner_id.clone(),
            outcome: refresh_profile(&input.profile, input.elapsed_years, now),
        })
        .collect();

    let failed = results.iter().filter(|r| r.outcome.is_err()).count();
    debug!(total = results.len(), failed, "recall batch refresh finished");

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const EPSILON: f64 = 1e-12;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    // ==================== months_to_years ====================

    #[test]
    fn test_months_to_years() {
        assert_eq!(months_to_years(12.0), 1.0);
        assert_eq!(months_to_years(0.0), 0.0);
        assert!((months_to_years(18.0) - 1.5).abs() < EPSILON);
    }

    // ==================== recall_probability ====================

    #[test]
    fn test_recall_is_one_without_time_or_decay() {
        assert_eq!(recall_probability(0.0, 3.0).unwrap(), 1.0);
        assert_eq!(recall_probability(7.0, 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_recall_matches_exponential() {
        let r = recall_probability(2.0, 0.5).unwrap();
        assert!((r - (-1.0f64).exp()).abs() < EPSILON);
    }

    #[test]
    fn test_recall_decreases_with_time() {
        let r1 = recall_probability(1.0, 0.3).unwrap();
        let r2 = recall_probability(2.0, 0.3).unwrap();
        let r5 = recall_probability(5.0, 0.3).unwrap();
        assert!(r1 > r2);
        assert!(r2 > r5);
        assert!(r5 > 0.0);
    }

    #[test]
    fn test_recall_stays_positive_for_long_gaps() {
        let r = recall_probability(1000.0, 1.0).unwrap();
        assert!(r > 0.0);
        assert_eq!(r, f64::MIN_POSITIVE);
        assert!(recall_probability(1e300, 1e10).unwrap() > 0.0);
    }

    #[test]
    fn test_recall_rejects_negative_inputs() {
        let err = recall_probability(-1.0, 0.5).unwrap_err();
        assert!(matches!(
            err,
            AssessmentError::DomainInput { field: "elapsed_years", .. }
        ));

        let err = recall_probability(1.0, -0.5).unwrap_err();
        assert!(matches!(
            err,
            AssessmentError::DomainInput { field: "forgetting_rate", .. }
        ));
    }

    #[test]
    fn test_recall_rejects_non_finite_inputs() {
        assert!(recall_probability(f64::NAN, 0.5).is_err());
        assert!(recall_probability(1.0, f64::INFINITY).is_err());
    }

    // ==================== elapsed_years_since ====================

    #[test]
    fn test_elapsed_years_since() {
        let later = t0() + Duration::days(365) + Duration::hours(6);
        let years = elapsed_years_since(t0(), later).unwrap();
        assert!((years - 1.0).abs() < 1e-9);
        assert_eq!(elapsed_years_since(t0(), t0()).unwrap(), 0.0);
        assert!(elapsed_years_since(later, t0()).is_err());
    }

    // ==================== baseline / refresh ====================

    #[test]
    fn test_baseline_from_survey_uses_default_rate() {
        let survey = SurveyResponse {
            experience_months: 24.0,
            forgetting_rate: None,
        };
        let profile = baseline_from_survey(&survey, 0.5, t0()).unwrap();
        assert_eq!(profile.forgetting_rate, 0.5);
        assert!((profile.elapsed_time_years - 2.0).abs() < EPSILON);
        assert!((profile.recall_level.unwrap() - (-1.0f64).exp()).abs() < EPSILON);
        assert_eq!(profile.skill_estimate, 0.0);
        assert_eq!(profile.last_recall_update, Some(t0()));
    }

    #[test]
    fn test_baseline_from_survey_prefers_survey_rate() {
        let survey = SurveyResponse {
            experience_months: 0.0,
            forgetting_rate: Some(2.0),
        };
        let profile = baseline_from_survey(&survey, 0.5, t0()).unwrap();
        assert_eq!(profile.forgetting_rate, 2.0);
        assert_eq!(profile.recall_level, Some(1.0));
    }

    #[test]
    fn test_baseline_rejects_negative_months() {
        let survey = SurveyResponse {
            experience_months: -3.0,
            forgetting_rate: None,
        };
        assert!(baseline_from_survey(&survey, 0.5, t0()).is_err());
    }

    #[test]
    fn test_refresh_profile_only_touches_recall_fields() {
        let profile = LearnerProfile {
            skill_estimate: 3.2,
            recall_level: Some(0.9),
            forgetting_rate: 1.0,
            elapsed_time_years: 0.1,
            last_recall_update: Some(t0()),
        };
        let now = t0() + Duration::days(30);
        let refreshed = refresh_profile(&profile, 1.0, now).unwrap();

        assert_eq!(refreshed.skill_estimate, 3.2);
        assert_eq!(refreshed.forgetting_rate, 1.0);
        assert_eq!(refreshed.elapsed_time_years, 1.0);
        assert_eq!(refreshed.last_recall_update, Some(now));
        assert!((refreshed.recall_level.unwrap() - (-1.0f64).exp()).abs() < EPSILON);
    }

    #[test]
    fn test_refresh_batch_keeps_order_and_isolates_failures() {
        let good = LearnerProfile {
            forgetting_rate: 0.2,
            ..LearnerProfile::default()
        };
        let bad = LearnerProfile {
            forgetting_rate: -1.0,
            ..LearnerProfile::default()
        };
        let inputs: Vec<RecallRefreshInput> = (0..50)
            .map(|i| RecallRefreshInput {
                learner_id: format!("learner-{i}"),
                profile: if i == 7 { bad.clone() } else { good.clone() },
                elapsed_years: i as f64 * 0.1,
            })
            .collect();

        let results = refresh_batch(&inputs, t0());
        assert_eq!(results.len(), 50);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.learner_id, format!("learner-{i}"));
            assert_eq!(result.outcome.is_err(), i == 7);
        }

        // Same formula as the single-learner path
        let single = refresh_profile(&good, inputs[12].elapsed_years, t0()).unwrap();
        assert_eq!(results[12].outcome.as_ref().unwrap().recall_level, single.recall_level);
    }
}
