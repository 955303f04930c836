use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use icetok::{split_into_sentences, tokenize, Options};

const SAMPLE: &str = include_str!("../tests/sample.txt");

fn benchmark(cr: &mut Criterion) {
    icetok::init();
    let mut gr = cr.benchmark_group("static");

    let size = SAMPLE.len() as u64;

    gr.throughput(Throughput::Bytes(size)).bench_with_input(
        BenchmarkId::new("tokenize", size),
        SAMPLE,
        |b, text| b.iter(|| tokenize(text, &Options::default()).count()),
    );

    gr.throughput(Throughput::Bytes(size)).bench_with_input(
        BenchmarkId::new("sentences", size),
        SAMPLE,
        |b, text| b.iter(|| split_into_sentences(text, &Options::default())),
    );

    gr.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
