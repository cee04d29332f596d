//! Property-Based Tests for the assessment core
//!
//! Tests the following invariants:
//! - Recall stays in (0, 1] and decays monotonically in elapsed time
//! - Selection size is min(target, pool) with unique ids drawn from the pool
//! - Every in-range score maps to a named tier, out-of-range to the fallback
//! - A missing previous attempt never locks; remaining minutes never exceed the lock
//! - Skill updates stay in [0, 5] and leave other fields alone

use std::collections::HashSet;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use adaptive_assessment::{
    check_lock, classify, recall_probability, select_adaptive_questions, update_skill, Difficulty,
    EvaluationScope, LearnerProfile, Question, RecommendationTier, TierTable, UpdateChannel,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_difficulty() -> impl Strategy<Value = Option<Difficulty>> {
    prop_oneof![
        Just(None),
        (0u32..=50u32).prop_map(|v| Some(Difficulty::Level(v as f64 / 10.0))),
        prop::sample::select(vec!["easy", "medium", "hard", "advanced", "bogus"])
            .prop_map(|s| Some(Difficulty::Label(s.to_string()))),
    ]
}

fn arb_pool() -> impl Strategy<Value = Vec<Question>> {
    prop::collection::vec(arb_difficulty(), 0..40).prop_map(|difficulties| {
        difficulties
            .into_iter()
            .enumerate()
            .map(|(i, difficulty)| Question {
                id: format!("q{i}"),
                prompt_text: String::new(),
                options: vec!["a".to_string(), "b".to_string()],
                correct_option_index: 0,
                difficulty,
            })
            .collect()
    })
}

fn arb_channel() -> impl Strategy<Value = UpdateChannel> {
    prop_oneof![Just(UpdateChannel::Averaged), Just(UpdateChannel::Latest)]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_recall_in_unit_interval(t in 0.0f64..50.0, lambda in 0.0f64..5.0) {
        let r = recall_probability(t, lambda).unwrap();
        prop_assert!(r > 0.0 && r <= 1.0);
    }

    #[test]
    fn prop_recall_strictly_decreasing(t in 0.0f64..20.0, dt in 0.01f64..5.0, lambda in 0.01f64..3.0) {
        let earlier = recall_probability(t, lambda).unwrap();
        let later = recall_probability(t + dt, lambda).unwrap();
        prop_assert!(later < earlier);
    }

    #[test]
    fn prop_recall_rejects_negative(t in -100.0f64..-0.001, lambda in 0.0f64..5.0) {
        prop_assert!(recall_probability(t, lambda).is_err());
        prop_assert!(recall_probability(lambda, t).is_err());
    }

    #[test]
    fn prop_selection_size_and_uniqueness(
        pool in arb_pool(),
        skill in 0.0f64..=5.0,
        target in 0usize..50,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let selected = select_adaptive_questions(&pool, skill, target, &mut rng);

        prop_assert_eq!(selected.len(), target.min(pool.len()));

        let ids: HashSet<&str> = selected.iter().map(|q| q.id.as_str()).collect();
        prop_assert_eq!(ids.len(), selected.len());

        for question in &selected {
            prop_assert!(pool.contains(question));
        }
    }

    #[test]
    fn prop_integer_scores_hit_named_tiers(score in 0u32..=100) {
        let rec = classify(&TierTable::standard(), score as f64, EvaluationScope::Final);
        prop_assert_ne!(rec.tier, RecommendationTier::Default);
    }

    #[test]
    fn prop_out_of_range_scores_use_fallback(score in prop_oneof![-1000.0f64..-0.001, 100.001f64..1000.0]) {
        let rec = classify(&TierTable::standard(), score, EvaluationScope::Final);
        prop_assert_eq!(rec.tier, RecommendationTier::Default);
        prop_assert!(!rec.can_advance);
    }

    #[test]
    fn prop_lock_never_set_without_attempt(minutes in 0.0f64..10_000.0, offset in -10_000i64..10_000) {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(offset);
        prop_assert!(!check_lock(None, minutes, now).is_locked);
    }

    #[test]
    fn prop_remaining_bounded_by_lock(lock in 1u32..=120, elapsed_secs in 0i64..10_000) {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let state = check_lock(Some(t0), lock as f64, t0 + Duration::seconds(elapsed_secs));
        prop_assert!(state.minutes_remaining <= lock as f64);
        prop_assert_eq!(state.is_locked, state.minutes_remaining > 0.0);
        prop_assert_eq!(state.minutes_remaining.fract(), 0.0);
    }

    #[test]
    fn prop_skill_update_clamped(
        previous in 0.0f64..=5.0,
        ability in -10.0f64..10.0,
        channel in arb_channel(),
        recall in proptest::option::of(0.0f64..=1.0),
    ) {
        let before = LearnerProfile {
            skill_estimate: previous,
            recall_level: recall,
            forgetting_rate: 0.3,
            elapsed_time_years: 2.0,
            last_recall_update: None,
        };
        let after = update_skill(&before, ability, channel).unwrap();

        prop_assert!((0.0..=5.0).contains(&after.skill_estimate));
        prop_assert_eq!(after.recall_level, before.recall_level);
        prop_assert_eq!(after.forgetting_rate, before.forgetting_rate);
        prop_assert_eq!(after.elapsed_time_years, before.elapsed_time_years);
    }
}
