//! Criterion benchmarks for newline framing and inbound parsing.
//!
//! Run with:
//! ```bash
//! cargo bench --package nel-core --bench framing_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nel_core::framing::LineBuffer;
use nel_core::protocol::InboundLine;

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn roles_line(items: usize) -> String {
    let roles: Vec<String> = (0..items)
        .map(|i| format!(r#"{{"id":"role-{i}","name":"角色{i}"}}"#))
        .collect();
    format!(r#"{{"type":"server_roles","items":[{}]}}"#, roles.join(","))
}

fn stream_of(lines: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    for i in 0..lines {
        bytes.extend_from_slice(roles_line(i % 8).as_bytes());
        bytes.push(b'\n');
    }
    bytes
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_framing_chunk_sizes(c: &mut Criterion) {
    let stream = stream_of(256);
    let mut group = c.benchmark_group("framing");

    for chunk_size in [1usize, 64, 4096] {
        group.bench_with_input(
            BenchmarkId::new("chunk", chunk_size),
            &chunk_size,
            |b, &size| {
                b.iter(|| {
                    let mut buf = LineBuffer::new();
                    let mut count = 0usize;
                    for chunk in stream.chunks(size) {
                        buf.extend(black_box(chunk));
                        while buf.next_line().is_some() {
                            count += 1;
                        }
                    }
                    black_box(count)
                })
            },
        );
    }

    group.finish();
}

fn bench_inbound_parse(c: &mut Criterion) {
    let roles = roles_line(8);
    c.bench_function("inbound_parse_server_roles", |b| {
        b.iter(|| {
            let line = InboundLine::parse(black_box(roles.as_str()));
            black_box(line.first_role_id())
        })
    });

    c.bench_function("inbound_parse_plain_text", |b| {
        b.iter(|| black_box(InboundLine::parse(black_box("connected")).message_type()))
    });
}

criterion_group!(benches, bench_framing_chunk_sizes, bench_inbound_parse);
criterion_main!(benches);
