//! # adaptive-assessment - learning assessment core
//!
//! Pure decision logic for an e-learning platform's evaluations:
//!
//! - **Recall Model** - exponential forgetting curve `R = exp(-λ·t)`
//! - **Question Selection** - skill-matched, randomized quiz draws
//! - **Outcome Classification** - score → remediation tier
//! - **Retry Gate** - time-based lock after low scores
//! - **Skill Update** - averaged or latest-value skill channels
//!
//! Persistence, routing and the content catalog live outside this crate;
//! everything here takes plain records in and hands plain records back.
//!
//! ## Modules
//!
//! - [`recall`] - recall probability, survey baseline, batch refresh
//! - [`selection`] - adaptive question selection
//! - [`outcome`] - versioned tier table and classifier
//! - [`retry`] - retry lock state
//! - [`skill`] - skill estimate updates
//! - [`engine`] - facade wiring the above together
//! - [`config`] - environment configuration
//! - [`sanitize`] - input validation helpers
//! - [`types`] - shared records and constants
//!
//! ## Example
//!
//! ```rust
//! use adaptive_assessment::{classify, check_lock, EvaluationScope, TierTable, RecommendationTier};
//!
//! let table = TierTable::standard();
//! let rec = classify(&table, 72.0, EvaluationScope::Final);
//! assert_eq!(rec.tier, RecommendationTier::PassWithReview);
//! assert!(rec.can_advance);
//!
//! let lock = check_lock(None, rec.lock_minutes, chrono::Utc::now());
//! assert!(!lock.is_locked);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod outcome;
pub mod recall;
pub mod retry;
pub mod sanitize;
pub mod selection;
pub mod skill;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use config::EngineConfig;
pub use engine::{AssessmentEngine, EvaluationOutcome};
pub use error::{AssessmentError, Result};
pub use outcome::{classify, try_classify, Recommendation, RecommendationTier, TierBand, TierTable};
pub use recall::{
    baseline_from_survey, elapsed_years_since, months_to_years, recall_probability, refresh_batch,
    refresh_profile, RecallRefreshInput, RecallRefreshResult,
};
pub use retry::{check_lock, gate_retry, latest_attempt, RetryLockState};
pub use selection::{band_counts, band_for_skill, select_adaptive_questions, BandCounts, QuestionSelector};
pub use skill::{ability_from_score, update_skill, UpdateChannel};
