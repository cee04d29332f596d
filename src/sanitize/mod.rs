//! Input validation
//!
//! Numeric guards shared by the assessment components.
//!
//! Functions:
//! - Domain checks that surface bad caller data as errors
//! - Clamping for values the engine itself produces

use crate::error::{AssessmentError, Result};
use crate::types::{SCORE_MAX, SCORE_MIN, SKILL_MAX, SKILL_MIN};

/// Finite and >= 0, otherwise a domain error naming `field`.
pub fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(AssessmentError::domain(field, value));
    }
    Ok(value)
}

pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(AssessmentError::domain(field, value));
    }
    Ok(value)
}

/// Score percentage in [0, 100].
pub fn ensure_score(value: f64) -> Result<f64> {
    if !is_valid_score(value) {
        return Err(AssessmentError::domain("score_percent", value));
    }
    Ok(value)
}

pub fn is_valid_score(value: f64) -> bool {
    value.is_finite() && (SCORE_MIN..=SCORE_MAX).contains(&value)
}

/// Clamps a skill value into [0, 5].
pub fn clamp_skill(value: f64) -> f64 {
    value.clamp(SKILL_MIN, SKILL_MAX)
}
