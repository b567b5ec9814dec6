use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizloop_core::parser::{parse_lesson_str, validate_lesson};

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    // Generate lesson TOML strings of various sizes
    let small_toml = generate_lesson_toml(5);
    let medium_toml = generate_lesson_toml(50);
    let large_toml = generate_lesson_toml(200);

    group.bench_function("5_items", |b| {
        b.iter(|| parse_lesson_str(black_box(&small_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("50_items", |b| {
        b.iter(|| parse_lesson_str(black_box(&medium_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("200_items", |b| {
        b.iter(|| parse_lesson_str(black_box(&large_toml), black_box("bench.toml".as_ref())))
    });

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let lesson = parse_lesson_str(&generate_lesson_toml(200), "bench.toml".as_ref())
        .expect("generated lesson parses");

    c.bench_function("validate_200_items", |b| {
        b.iter(|| validate_lesson(black_box(&lesson)))
    });
}

fn generate_lesson_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[lesson]
id = "bench"
title = "Benchmark"
"#,
    );
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[new_words]]
id = "word_{i}"
word = "word{i}"
meaning = "meaning of word {i}"

[[items]]
id = "word_{i}"
prompt = "Sentence number {i} needs a ___ here."
options = ["word{i}", "other{i}", "third{i}", "fourth{i}"]
answer = "word{i}"
"#
        ));
    }
    s
}

criterion_group!(benches, bench_toml_parsing, bench_validation);
criterion_main!(benches);
