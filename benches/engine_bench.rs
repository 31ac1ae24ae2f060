//! Throughput of feature extraction, full analysis and bootstrap batches.
//!
//! ```bash
//! cargo bench --bench engine_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use veracity::{text, Analyzer};

const PARAGRAPH: &str = "The city council voted on Tuesday to approve a new budget for the coming year. \
    The plan adds funding for public schools, road repairs and the local library. \
    Several members said they wanted more time to study the proposal before the vote. \
    Critics called the decision a shocking scandal and warned of a secret deal. ";

fn article(paragraphs: usize) -> String {
    PARAGRAPH.repeat(paragraphs)
}

fn bench_tokenize(c: &mut Criterion) {
    let text = article(20);
    c.bench_function("tokenize_20_paragraphs", |b| {
        b.iter(|| text::tokenize(black_box(&text)).word_count())
    });
}

fn bench_analyze(c: &mut Criterion) {
    let analyzer = Analyzer::default();
    let mut group = c.benchmark_group("analyze");
    for paragraphs in [1, 10, 50] {
        let text = article(paragraphs);
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &text, |b, text| {
            b.iter(|| analyzer.analyze_text(black_box(text)))
        });
    }
    group.finish();
}

fn bench_bootstrap(c: &mut Criterion) {
    let analyzer = Analyzer::default();
    let text = article(10);
    let mut group = c.benchmark_group("bootstrap_batch");
    group.sample_size(20);
    for samples in [10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(samples), &samples, |b, &n| {
            b.iter(|| analyzer.bootstrap_batch(black_box(&text), n, Some(42)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_analyze, bench_bootstrap);
criterion_main!(benches);
