//! Criterion benchmarks for the Sieve classifier.
//!
//! Covers tokenization, training throughput and classification latency on
//! generated short comments.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sieve::analysis::analyzer::{Analyzer, StandardAnalyzer};
use sieve::classifier::{Model, NaiveBayesClassifier, SnapshotFormat, TrainingSample};
use std::hint::black_box;

const WORDS: &[&str] = &[
    "god", "prayer", "faith", "church", "belief", "scripture", "nature", "river", "forest",
    "mountain", "science", "evidence", "reason", "theory", "beautiful", "works", "real", "is",
    "the", "and", "of", "a", "today", "always",
];

const LABELS: &[&str] = &["theist", "neutral", "skeptic"];

/// Generate labelled comments of varying length.
fn generate_samples(count: usize) -> Vec<TrainingSample> {
    (0..count)
        .map(|i| {
            let length = 5 + (i % 20);
            let text = (0..length)
                .map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" ");
            TrainingSample::new(text, LABELS[i % LABELS.len()])
        })
        .collect()
}

fn bench_analysis(c: &mut Criterion) {
    let analyzer = StandardAnalyzer::new().unwrap();
    let samples = generate_samples(1000);

    let mut group = c.benchmark_group("analysis");
    group.throughput(Throughput::Elements(samples.len() as u64));
    group.bench_function("standard_analyzer", |b| {
        b.iter(|| {
            for sample in &samples {
                black_box(analyzer.analyze_terms(black_box(&sample.text)).unwrap());
            }
        })
    });
    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    for size in [100, 1000, 10000] {
        let samples = generate_samples(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &samples, |b, samples| {
            b.iter(|| {
                let mut classifier = NaiveBayesClassifier::new().unwrap();
                classifier.train(black_box(samples)).unwrap();
                black_box(classifier)
            })
        });
    }
    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let mut classifier = NaiveBayesClassifier::new().unwrap();
    classifier.train(&generate_samples(5000)).unwrap();
    let queries = generate_samples(100);

    let mut group = c.benchmark_group("classification");
    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("classify", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(classifier.classify(black_box(&query.text)).unwrap());
            }
        })
    });
    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut classifier = NaiveBayesClassifier::new().unwrap();
    classifier.train(&generate_samples(5000)).unwrap();
    let model = classifier.model().clone();

    let mut group = c.benchmark_group("snapshot");
    for format in [SnapshotFormat::Json, SnapshotFormat::Binary] {
        let bytes = model.encode(format).unwrap();
        group.bench_function(BenchmarkId::new("encode", format), |b| {
            b.iter(|| black_box(model.encode(format).unwrap()))
        });
        group.bench_function(BenchmarkId::new("decode", format), |b| {
            b.iter(|| black_box(Model::decode(black_box(&bytes)).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_analysis,
    bench_training,
    bench_classification,
    bench_snapshot
);
criterion_main!(benches);
