//! Benchmark suite for adaptive-assessment
//!
//! Run with: cargo bench

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use adaptive_assessment::{
    classify, refresh_batch, Difficulty, EvaluationScope, LearnerProfile, Question,
    QuestionSelector, RecallRefreshInput, TierTable,
};

fn make_pool(size: usize) -> Vec<Question> {
    (0..size)
        .map(|i| Question {
            id: format!("q{i}"),
            prompt_text: String::new(),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_option_index: 0,
            difficulty: Some(Difficulty::Level((i % 6) as f64)),
        })
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_adaptive_questions");
    for size in [50, 500, 5000] {
        let pool = make_pool(size);
        let mut selector = QuestionSelector::with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(selector.select(&pool, 2.5, 20)))
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let table = TierTable::standard();
    c.bench_function("classify_0_to_100", |b| {
        b.iter(|| {
            for s in 0..=100 {
                black_box(classify(&table, s as f64, EvaluationScope::Final));
            }
        })
    });
}

fn bench_refresh_batch(c: &mut Criterion) {
    let inputs: Vec<RecallRefreshInput> = (0..10_000)
        .map(|i| RecallRefreshInput {
            learner_id: format!("learner-{i}"),
            profile: LearnerProfile {
                forgetting_rate: 0.5,
                ..LearnerProfile::default()
            },
            elapsed_years: (i % 120) as f64 / 12.0,
        })
        .collect();
    let now = Utc::now();

    c.bench_function("refresh_batch_10k", |b| {
        b.iter(|| black_box(refresh_batch(&inputs, now)))
    });
}

criterion_group!(benches, bench_select, bench_classify, bench_refresh_batch);
criterion_main!(benches);
