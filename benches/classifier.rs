//! Benchmarks for TTL classification and output parsing

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ttlprobe::{classify, classify_detailed, extract_ttl};

/// Benchmark the rule table across the full TTL range
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    group.bench_function("all_ttls", |b| {
        b.iter(|| {
            for ttl in 0..=u8::MAX {
                black_box(classify(black_box(ttl)));
            }
        })
    });

    group.bench_function("detailed_all_ttls", |b| {
        b.iter(|| {
            for ttl in 0..=u8::MAX {
                black_box(classify_detailed(black_box(ttl)));
            }
        })
    });

    group.finish();
}

/// Benchmark TTL extraction from typical ping transcripts
fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_ttl");

    let linux = "PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.\n\
                 64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=12.3 ms\n";
    let windows = "Pinging 10.0.0.1 with 32 bytes of data:\r\n\
                   Reply from 10.0.0.1: bytes=32 time<1ms TTL=128\r\n";
    let timeout = "Request timed out.\r\n";

    group.bench_function("linux", |b| b.iter(|| extract_ttl(black_box(linux))));
    group.bench_function("windows", |b| b.iter(|| extract_ttl(black_box(windows))));
    group.bench_function("no_reply", |b| b.iter(|| extract_ttl(black_box(timeout))));

    group.finish();
}

criterion_group!(benches, bench_classify, bench_extract);
criterion_main!(benches);
