//! Benchmarks for the event-extraction hot path

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndt7_monitor::extract;
use ndt7_monitor::output::{format_mbps, format_ms};
use serde_json::json;

fn bench_extraction(c: &mut Criterion) {
    let direct = json!({
        "type": "download",
        "data": {"MeanClientMbps": 94.37, "MinRTTMs": 11.2}
    });
    let derived = json!({
        "type": "upload",
        "data": {"TCPInfo": {
            "ElapsedTime": 9_500_000,
            "BytesSent": 112_000_000,
            "RTT": 11_900
        }}
    });
    let empty = json!({"type": "measurement", "data": {}});

    c.bench_function("throughput_direct_field", |b| {
        b.iter(|| extract::throughput_mbps(black_box(&direct)))
    });

    c.bench_function("throughput_tcp_info_fallback", |b| {
        b.iter(|| extract::throughput_mbps(black_box(&derived)))
    });

    c.bench_function("latency_probe_chain", |b| {
        b.iter(|| extract::latency_ms(black_box(&derived)))
    });

    c.bench_function("extraction_miss", |b| {
        b.iter(|| {
            (
                extract::throughput_mbps(black_box(&empty)),
                extract::latency_ms(black_box(&empty)),
            )
        })
    });
}

fn bench_formatting(c: &mut Criterion) {
    c.bench_function("format_throughput", |b| {
        b.iter(|| format_mbps(black_box(Some(94.37))))
    });

    c.bench_function("format_latency_absent", |b| {
        b.iter(|| format_ms(black_box(None)))
    });
}

criterion_group!(benches, bench_extraction, bench_formatting);
criterion_main!(benches);
