//! Adaptive Question Selection
//!
//! Draws a quiz for a learner from a catalog pool:
//! - Learner skill (0-5) picks a target difficulty band
//! - Questions are bucketed by declared difficulty
//! - The target band is drawn first, then neighbouring bands nearest-first
//! - Each band is shuffled so the order can't be memorised
//!
//! A short or empty pool gives a short result, never an error. Questions
//! with missing or unreadable difficulty land in the medium band.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{DifficultyBand, Question};

/// Per-band pool sizes after de-duplication
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    /// Entries that fell back to the medium band
    pub defaulted: usize,
    pub duplicates: usize,
}

/// Target band for a learner's skill estimate. Non-finite skill is treated
/// as medium.
pub fn band_for_skill(skill_estimate: f64) -> DifficultyBand {
    if !skill_estimate.is_finite() {
        warn!(skill_estimate, "non-finite skill estimate, targeting medium band");
        return DifficultyBand::Medium;
    }
    DifficultyBand::from_level(skill_estimate)
}

/// Band for a catalog question; unusable difficulty defaults to medium.
pub fn question_band(question: &Question) -> (DifficultyBand, bool) {
    match question.difficulty.as_ref().and_then(|d| d.band()) {
        Some(band) => (band, false),
        None => (DifficultyBand::Medium, true),
    }
}

struct Buckets<'a> {
    bands: [Vec<&'a Question>; 3],
    counts: BandCounts,
}

impl<'a> Buckets<'a> {
    fn partition(pool: &'a [Question]) -> Self {
        let mut seen: HashSet<&str> = HashSet::with_capacity(pool.len());
        let mut bands: [Vec<&Question>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        let mut counts = BandCounts::default();

        for question in pool {
            if !seen.insert(question.id.as_str()) {
                counts.duplicates += 1;
                continue;
            }
            let (band, defaulted) = question_band(question);
            if defaulted {
                counts.defaulted += 1;
            }
            match band {
                DifficultyBand::Low => counts.low += 1,
                DifficultyBand::Medium => counts.medium += 1,
                DifficultyBand::High => counts.high += 1,
            }
            bands[band_index(band)].push(question);
        }

        Self { bands, counts }
    }
}

fn band_index(band: DifficultyBand) -> usize {
    match band {
        DifficultyBand::Low => 0,
        DifficultyBand::Medium => 1,
        DifficultyBand::High => 2,
    }
}

pub fn band_counts(pool: &[Question]) -> BandCounts {
    Buckets::partition(pool).counts
}

/// Returns `min(target_count, distinct ids in pool)` questions, target band
/// first. Ids never repeat and every item comes from `pool`.
pub fn select_adaptive_questions<R: Rng + ?Sized>(
    pool: &[Question],
    skill_estimate: f64,
    target_count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let target_band = band_for_skill(skill_estimate);
    let Buckets { mut bands, counts } = Buckets::partition(pool);

    if counts.defaulted > 0 {
        warn!(
            defaulted = counts.defaulted,
            "questions without usable difficulty placed in medium band"
        );
    }
    if counts.duplicates > 0 {
        warn!(duplicates = counts.duplicates, "duplicate question ids skipped");
    }

    let mut selected: Vec<Question> = Vec::with_capacity(target_count.min(pool.len()));

    for band in target_band.fill_order() {
        let needed = target_count - selected.len();
        if needed == 0 {
            break;
        }
        let bucket = &mut bands[band_index(band)];
        bucket.shuffle(rng);
        selected.extend(bucket.iter().take(needed).map(|q| (*q).clone()));
    }

    debug!(
        target_band = target_band.as_str(),
        requested = target_count,
        selected = selected.len(),
        low = counts.low,
        medium = counts.medium,
        high = counts.high,
        "adaptive question selection"
    );

    selected
}

/// Selector owning its own seedable RNG. Use one per request or thread.
pub struct QuestionSelector {
    rng: ChaCha8Rng,
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionSelector {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Reproducible draws (for testing)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn select(&mut self, pool: &[Question], skill_estimate: f64, target_count: usize) -> Vec<Question> {
        select_adaptive_questions(pool, skill_estimate, target_count, &mut self.rng)
    }
}
