use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examscore_core::parser::{parse_question_bank_str, validate_question_bank};

fn generate_bank_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[bank]
id = "bench"
name = "Benchmark"
"#,
    );
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[questions]]
id = "q_{i}"
text = "Which option is correct for question {i}?"
category = "technical"
difficulty = "medium"
points = 2
correct_answer = "B"
options = [
    {{ option = "A", text = "First answer {i}" }},
    {{ option = "B", text = "Second answer {i}" }},
    {{ option = "C", text = "Third answer {i}" }},
]
"#
        ));
    }
    s
}

fn bench_bank_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("bank_parsing");

    for n in [5usize, 50, 200] {
        let toml = generate_bank_toml(n);
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| parse_question_bank_str(black_box(&toml), black_box("bench.toml".as_ref())))
        });
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let toml = generate_bank_toml(200);
    let Ok(bank) = parse_question_bank_str(&toml, "bench.toml".as_ref()) else {
        panic!("benchmark bank failed to parse");
    };

    c.bench_function("validate_200_questions", |b| {
        b.iter(|| validate_question_bank(black_box(&bank)))
    });
}

criterion_group!(benches, bench_bank_parsing, bench_validation);
criterion_main!(benches);
