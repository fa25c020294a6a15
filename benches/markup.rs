//! Markup parser benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tessera::markup;

fn bench_parse_plain_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("markup");

    // No tags at all
    let plain_text = "Hello, World! ".repeat(1000);
    group.throughput(Throughput::Bytes(plain_text.len() as u64));

    group.bench_function("plain_text", |b| {
        b.iter(|| black_box(markup::parse(black_box(&plain_text))))
    });

    group.finish();
}

fn bench_parse_tags(c: &mut Criterion) {
    let mut group = c.benchmark_group("markup");

    let tagged = "[[f:#ff0000]]Red [[b:#00ff00]]on green [[f:#fff|b:#000]]reset ".repeat(200);
    group.throughput(Throughput::Bytes(tagged.len() as u64));

    group.bench_function("tags", |b| {
        b.iter(|| black_box(markup::parse(black_box(&tagged))))
    });

    group.finish();
}

fn bench_parse_malformed(c: &mut Criterion) {
    let mut group = c.benchmark_group("markup");

    // Almost-tags that have to be kept verbatim
    let malformed = "[[f:#ff00]] [[x:#fff]] [b:#000] [[f:#fff ".repeat(200);
    group.throughput(Throughput::Bytes(malformed.len() as u64));

    group.bench_function("malformed", |b| {
        b.iter(|| black_box(markup::parse(black_box(&malformed))))
    });

    group.finish();
}

criterion_group!(benches, bench_parse_plain_text, bench_parse_tags, bench_parse_malformed);

criterion_main!(benches);
