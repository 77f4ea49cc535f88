use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use afcon_predictor::calibration::Calibration;
use afcon_predictor::ensemble::ensemble;
use afcon_predictor::prediction::PredictionResult;
use afcon_predictor::score_matrix::build_matrix;
use afcon_predictor::strength::ExpectedGoalsPair;
use afcon_predictor::{Estimator, teams};

fn bench_build_matrix(c: &mut Criterion) {
    let rates = ExpectedGoalsPair::new(1.31, 0.60);
    c.bench_function("build_matrix_6", |b| {
        b.iter(|| {
            let m = build_matrix(black_box(rates), black_box(-0.15), black_box(6));
            black_box(m.get(1, 0));
        })
    });
    c.bench_function("build_matrix_15", |b| {
        b.iter(|| {
            let m = build_matrix(black_box(rates), black_box(-0.15), black_box(15));
            black_box(m.get(1, 0));
        })
    });
}

fn bench_ensemble(c: &mut Criterion) {
    let book = teams::builtin_book().unwrap();
    let home = book.get("Nigeria").unwrap();
    let away = book.get("Tanzania").unwrap();
    let cal = Calibration::default();
    c.bench_function("ensemble", |b| {
        b.iter(|| {
            let (m, rates) = ensemble(black_box(home), black_box(away), &cal).unwrap();
            black_box((m.get(0, 0), rates));
        })
    });

    let (matrix, _) = ensemble(home, away, &cal).unwrap();
    c.bench_function("summarize_matrix", |b| {
        b.iter(|| black_box(PredictionResult::from_matrix(black_box(&matrix), 15)))
    });
}

fn bench_round_robin(c: &mut Criterion) {
    let est = Estimator::new(teams::builtin_book().unwrap().clone(), Calibration::default()).unwrap();
    let names = est.book().names();
    c.bench_function("round_robin_builtin", |b| {
        b.iter(|| {
            for home in &names {
                for away in names.iter().filter(|a| *a != home) {
                    let p = est.predict(home, away, 3).unwrap();
                    black_box(p.result.confidence);
                }
            }
        })
    });
}

criterion_group!(benches, bench_build_matrix, bench_ensemble, bench_round_robin);
criterion_main!(benches);
