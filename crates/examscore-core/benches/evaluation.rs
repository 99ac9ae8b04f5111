use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examscore_core::evaluator::{AnswerEvaluator, EvaluationOptions};
use examscore_core::model::{Difficulty, McqOption, Question, QuestionCategory, QuestionType};
use examscore_core::similarity::{levenshtein, similarity};

fn make_question(i: usize) -> Question {
    Question {
        id: format!("q{i}"),
        question_text: format!("Question {i}"),
        question_type: QuestionType::Mcq,
        question_category: QuestionCategory::Technical,
        difficulty_level: Difficulty::Medium,
        points: 2,
        correct_answer: Some("B".into()),
        mcq_options: vec![
            McqOption {
                option: "A".into(),
                text: "Linear time in the size of the input".into(),
            },
            McqOption {
                option: "B".into(),
                text: "Logarithmic time in the size of the input".into(),
            },
            McqOption {
                option: "C".into(),
                text: "Constant time".into(),
            },
        ],
        answer_explanation: None,
    }
}

fn bench_levenshtein(c: &mut Criterion) {
    let mut group = c.benchmark_group("levenshtein");

    let long_a = "logarithmic time in the size of the input ".repeat(8);
    let long_b = "logaritmic time in the size of input ".repeat(8);

    group.bench_function("short", |b| {
        b.iter(|| levenshtein(black_box("kitten"), black_box("sitting")))
    });

    group.bench_function("long", |b| {
        b.iter(|| levenshtein(black_box(&long_a), black_box(&long_b)))
    });

    group.bench_function("similarity", |b| {
        b.iter(|| similarity(black_box("polymorphism"), black_box("polymorfism")))
    });

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let question = make_question(0);
    let exact = AnswerEvaluator::new(EvaluationOptions::default());
    let fuzzy = AnswerEvaluator::new(EvaluationOptions {
        enable_fuzzy_matching: true,
        ..Default::default()
    });

    group.bench_function("exact_id", |b| {
        b.iter(|| exact.evaluate(black_box(&question), black_box(" b ")))
    });

    group.bench_function("option_text", |b| {
        b.iter(|| {
            exact.evaluate(
                black_box(&question),
                black_box("Logarithmic time in the size of the input"),
            )
        })
    });

    group.bench_function("fuzzy_miss", |b| {
        b.iter(|| fuzzy.evaluate(black_box(&question), black_box("logaritmic tyme")))
    });

    let questions: Vec<Question> = (0..200).map(make_question).collect();
    let answers: HashMap<String, String> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| (q.id.clone(), if i % 2 == 0 { "B" } else { "A" }.to_string()))
        .collect();

    group.bench_function("batch_200", |b| {
        b.iter(|| fuzzy.batch_evaluate(black_box(&questions), black_box(&answers)))
    });

    group.finish();
}

criterion_group!(benches, bench_levenshtein, bench_evaluate);
criterion_main!(benches);
