//! Benchmarks for outline extraction and section ranking.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic span documents.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use docoutline::{
    analyze_collection, analyze_document, AnalysisOptions, PersonaConfig, SelectionOptions,
    SpanDocument, TextSpan,
};

/// Creates a synthetic document with a numbered chapter per page.
fn create_test_document(name: &str, page_count: u32) -> SpanDocument {
    let mut spans = Vec::new();

    for page in 1..=page_count {
        let mut y = 60.0;
        spans.push(TextSpan::new(format!("{}. Chapter {}", page, page), page, 72.0, y, 18.0).bold());
        y += 30.0;

        for section in 1..=3 {
            spans.push(
                TextSpan::new(
                    format!("{}.{} Revenue Topic {}", page, section, section),
                    page,
                    72.0,
                    y,
                    14.0,
                )
                .bold(),
            );
            y += 22.0;

            for line in 0..12 {
                // Two spans per line to exercise row grouping
                spans.push(TextSpan::new(
                    format!("Line {} discusses market growth and", line),
                    page,
                    72.0,
                    y,
                    10.0,
                ));
                spans.push(TextSpan::new(
                    "quarterly revenue trends in detail",
                    page,
                    260.0,
                    y,
                    10.0,
                ));
                y += 13.0;
            }
        }
    }

    SpanDocument::new(name, spans)
}

fn bench_analyze_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_document");
    let options = AnalysisOptions::default();

    for page_count in [1, 10, 50] {
        let document = create_test_document("bench.pdf", page_count);
        group.bench_with_input(BenchmarkId::from_parameter(page_count), &document, |b, doc| {
            b.iter(|| analyze_document(black_box(doc), &options))
        });
    }

    group.finish();
}

fn bench_analyze_collection(c: &mut Criterion) {
    let documents: Vec<SpanDocument> = (0..5)
        .map(|i| create_test_document(&format!("doc{}.pdf", i), 10))
        .collect();
    let config = PersonaConfig::new("Investment Analyst", "Analyze revenue trends");
    let analysis = AnalysisOptions::sections();
    let selection = SelectionOptions::default();

    c.bench_function("analyze_collection_5x10", |b| {
        b.iter(|| analyze_collection(black_box(&documents), &config, &analysis, &selection))
    });
}

criterion_group!(benches, bench_analyze_document, bench_analyze_collection);
criterion_main!(benches);
