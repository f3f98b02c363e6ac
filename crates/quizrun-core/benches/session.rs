use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizrun_core::encoder::encode_responses;
use quizrun_core::model::QuestionRecord;
use quizrun_core::scoring::{normalize_score, Tier};
use quizrun_core::QuizSession;

fn make_questions(n: usize) -> Vec<QuestionRecord> {
    (0..n)
        .map(|i| QuestionRecord {
            id: i as i64,
            question_title: format!("Question {i}"),
            option1: Some(format!("first {i}")),
            option2: Some(format!("second {i}")),
            option3: Some(format!("third {i}")),
            option4: Some(String::new()),
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let questions = make_questions(50);
    let answers: BTreeMap<usize, usize> = (0..50)
        .filter(|i| i % 3 != 0)
        .map(|i| (i, i % 3))
        .collect();

    c.bench_function("encode_responses_50", |b| {
        b.iter(|| encode_responses(black_box(&questions), black_box(&answers)))
    });
}

fn bench_walk(c: &mut Criterion) {
    let questions = make_questions(50);

    c.bench_function("walk_session_50", |b| {
        b.iter(|| {
            let mut session = QuizSession::new(1, questions.clone());
            while session.can_advance() || session.selected_answer().is_none() {
                session.select_answer(1).ok();
                if session.advance().is_err() {
                    break;
                }
            }
            black_box(session.position())
        })
    });
}

fn bench_scoring(c: &mut Criterion) {
    c.bench_function("normalize_score", |b| {
        b.iter(|| normalize_score(black_box(" \"42\" ")))
    });

    c.bench_function("classify_tier", |b| {
        b.iter(|| {
            for score in 0..=50u32 {
                black_box(Tier::classify(score, 50));
            }
        })
    });
}

criterion_group!(benches, bench_encode, bench_walk, bench_scoring);
criterion_main!(benches);
