//! Benchmarks for bookchunk pipeline performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run the pipeline over a synthetic book.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bookchunk::{
    is_noise, Chunker, ContextualUnit, HeadingCriteria, Line, PackOptions, PageMarker, StyleHints,
    TokenPacker, WhitespaceTokenCounter,
};

/// Creates a synthetic book with the given number of chapters.
fn create_test_book(chapters: u32) -> Vec<Line> {
    let italic = StyleHints::new(false, true);
    let mut lines = Vec::new();
    let mut page = 1;

    for chapter in 1..=chapters {
        lines.push(Line::new(format!("CHAPTER {}", chapter), PageMarker::Page(page)));
        for section in 1..=4 {
            lines.push(
                Line::new(format!("Part Of The Story {}", section), PageMarker::Page(page))
                    .with_style(italic),
            );
            for _ in 0..20 {
                lines.push(Line::new(
                    "The river ran quietly past the old mill. Nobody in the village \
                     remembered when it had last turned its wheel!",
                    PageMarker::Page(page),
                ));
            }
            lines.push(Line::new(format!("{}", page), PageMarker::Page(page)));
            page += 1;
        }
    }

    lines
}

/// Benchmark the noise filter.
fn bench_noise_filter(c: &mut Criterion) {
    let samples = [
        "42",
        "Copyright 2021 by the author",
        "The river ran quietly past the old mill.",
        "Introduction ......... 117",
    ];

    c.bench_function("noise_filter", |b| {
        b.iter(|| {
            for sample in samples.iter() {
                black_box(is_noise(black_box(sample)));
            }
        });
    });
}

/// Benchmark the full pipeline at various sizes.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let criteria = HeadingCriteria::default().without_layout();

    for chapters in [1, 10, 50].iter() {
        let lines = create_test_book(*chapters);

        group.bench_function(format!("{}_chapters_parallel", chapters), |b| {
            let chunker = Chunker::new().with_criteria(criteria.clone());
            b.iter(|| chunker.run(black_box(&lines)).unwrap());
        });

        group.bench_function(format!("{}_chapters_sequential", chapters), |b| {
            let chunker = Chunker::new().with_criteria(criteria.clone()).sequential();
            b.iter(|| chunker.run(black_box(&lines)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark packing alone.
fn bench_packer(c: &mut Criterion) {
    let units: Vec<ContextualUnit> = (0..5000)
        .map(|i| {
            ContextualUnit::new(
                "Nobody in the village remembered when it had last turned its wheel.",
                PageMarker::Page(i / 40 + 1),
                format!("CHAPTER {}", i / 500 + 1),
                None,
            )
        })
        .collect();
    let options = PackOptions::default();

    c.bench_function("pack_5000_units", |b| {
        b.iter(|| {
            TokenPacker::new(&WhitespaceTokenCounter, &options).pack(black_box(units.clone()))
        });
    });
}

criterion_group!(benches, bench_noise_filter, bench_pipeline, bench_packer);
criterion_main!(benches);
