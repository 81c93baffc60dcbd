//! Performance benchmarks for the event framer
//!
//! Measures throughput for whole-body pushes and for bodies arriving in
//! small transport chunks.
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use agent_stream::session::Utf8StreamDecoder;
use agent_stream::sse::SseParser;

/// Generate an SSE body of `frames` answer events.
fn generate_body(frames: usize) -> String {
    (0..frames)
        .map(|i| {
            format!(
                "event: answer\ndata: {{\"answer\":\"chunk {} of the response, with some text\"}}\n\n",
                i
            )
        })
        .collect()
}

/// Benchmark pushing an entire body at once
fn bench_single_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_single_push");

    for frames in [1, 10, 100, 1000].iter() {
        let body = generate_body(*frames);
        group.throughput(Throughput::Bytes(body.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(frames), &body, |b, body| {
            b.iter(|| {
                let mut parser = SseParser::new();
                black_box(parser.push(black_box(body)))
            });
        });
    }

    group.finish();
}

/// Benchmark bodies delivered in small byte chunks through the UTF-8 decoder
fn bench_small_chunks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_small_chunks");
    let body = generate_body(100);
    group.throughput(Throughput::Bytes(body.len() as u64));

    for chunk_size in [7, 64, 512].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let mut decoder = Utf8StreamDecoder::new();
                    let mut parser = SseParser::new();
                    let mut count = 0;
                    for chunk in body.as_bytes().chunks(chunk_size) {
                        count += parser.push(&decoder.decode(chunk)).len();
                    }
                    black_box(count)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark one large frame arriving in many pieces
fn bench_large_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_large_frame");
    let payload = "x".repeat(256 * 1024);
    let body = format!("data: {}\n\n", payload);
    group.throughput(Throughput::Bytes(body.len() as u64));

    group.bench_function("4k_chunks", |b| {
        b.iter(|| {
            let mut parser = SseParser::new();
            let mut count = 0;
            for chunk in body.as_bytes().chunks(4096) {
                if let Ok(text) = std::str::from_utf8(chunk) {
                    count += parser.push(text).len();
                }
            }
            black_box(count)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_push,
    bench_small_chunks,
    bench_large_frame
);
criterion_main!(benches);
