use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizloop_core::model::AnswerResult;
use quizloop_core::scoring::{score_session, ScoringConfig};
use quizloop_core::session::max_streak;

fn make_log(items: usize, attempts_per_item: usize) -> Vec<AnswerResult> {
    let mut log = Vec::with_capacity(items * attempts_per_item);
    for round in 0..attempts_per_item {
        for i in 0..items {
            let correct = round + 1 == attempts_per_item || (i + round) % 3 == 0;
            let answer = if correct { "right" } else { "wrong" };
            log.push(AnswerResult::new(
                format!("w{i}"),
                answer,
                "right",
                (1 + (i + round) % 12) as u32,
            ));
        }
    }
    log
}

fn snapshot(items: usize) -> HashMap<String, f64> {
    (0..items)
        .map(|i| (format!("w{i}"), (i % 10) as f64 / 10.0))
        .collect()
}

fn bench_next_proficiency(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_proficiency");
    let config = ScoringConfig::default();

    group.bench_function("fast", |b| {
        b.iter(|| config.next_proficiency(black_box(0.5), black_box(1.0), black_box(2.0)))
    });

    group.bench_function("interpolated", |b| {
        b.iter(|| config.next_proficiency(black_box(0.5), black_box(0.75), black_box(6.5)))
    });

    group.finish();
}

fn bench_score_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_session");
    let config = ScoringConfig::default();

    for (items, attempts) in [(10, 1), (20, 3), (200, 5)] {
        let log = make_log(items, attempts);
        let existing = snapshot(items);
        group.bench_function(format!("{items}_items_x{attempts}"), |b| {
            b.iter(|| score_session(black_box(&log), black_box(&existing), &config))
        });
    }

    group.finish();
}

fn bench_max_streak(c: &mut Criterion) {
    let log = make_log(200, 5);
    c.bench_function("max_streak_1000", |b| b.iter(|| max_streak(black_box(&log))));
}

criterion_group!(benches, bench_next_proficiency, bench_score_session, bench_max_streak);
criterion_main!(benches);
