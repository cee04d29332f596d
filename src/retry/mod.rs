//! Retry gating after low-scoring attempts.
//!
//! Lock state is derived, never stored: it's recomputed from the most recent
//! attempt's timestamp and the lock duration of the tier that attempt landed in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::outcome::{classify, TierTable};
use crate::types::{AttemptKey, EvaluationAttempt};

const MILLIS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryLockState {
    pub is_locked: bool,
    /// Rounded up to whole minutes while locked
    pub minutes_remaining: f64,
}

impl RetryLockState {
    pub fn unlocked() -> Self {
        Self {
            is_locked: false,
            minutes_remaining: 0.0,
        }
    }
}

pub fn check_lock(
    last_attempt: Option<DateTime<Utc>>,
    lock_minutes: f64,
    now: DateTime<Utc>,
) -> RetryLockState {
    let Some(last_attempt) = last_attempt else {
        return RetryLockState::unlocked();
    };
    if !lock_minutes.is_finite() || lock_minutes < 0.0 {
        warn!(lock_minutes, "invalid lock duration, treating as unlocked");
        return RetryLockState::unlocked();
    }
    if lock_minutes == 0.0 {
        return RetryLockState::unlocked();
    }

    // Clock skew (now before the attempt) counts as no time elapsed.
    let elapsed_minutes = ((now - last_attempt).num_milliseconds().max(0)) as f64 / MILLIS_PER_MINUTE;
    let remaining = (lock_minutes - elapsed_minutes).max(0.0);

    if remaining > 0.0 {
        RetryLockState {
            is_locked: true,
            minutes_remaining: remaining.ceil(),
        }
    } else {
        RetryLockState::unlocked()
    }
}

/// Most recent attempt for (learner, course, module).
pub fn latest_attempt<'a>(attempts: &'a [EvaluationAttempt], key: AttemptKey<'_>) -> Option<&'a EvaluationAttempt> {
    attempts
        .iter()
        .filter(|attempt| attempt.key() == key)
        .max_by_key(|attempt| attempt.timestamp)
}

/// Lock state for `key`: the latest attempt's score picks the tier, the
/// tier's duration drives the lock.
pub fn gate_retry(
    attempts: &[EvaluationAttempt],
    key: AttemptKey<'_>,
    table: &TierTable,
    now: DateTime<Utc>,
) -> RetryLockState {
    let Some(attempt) = latest_attempt(attempts, key) else {
        return RetryLockState::unlocked();
    };

    let recommendation = classify(table, attempt.score_percent, attempt.scope());
    let state = check_lock(Some(attempt.timestamp), recommendation.lock_minutes, now);

    debug!(
        learner_id = key.learner_id,
        course_id = key.course_id,
        module_index = ?key.module_index,
        tier = recommendation.tier.as_str(),
        locked = state.is_locked,
        minutes_remaining = state.minutes_remaining,
        "retry gate checked"
    );

    state
}
