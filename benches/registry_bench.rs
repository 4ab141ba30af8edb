//! Registry and ingestion benchmarks.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `ingest` | Wire packet → `RawRecord` for text-only and grip-heavy packets |
//! | `registry_fill` | Populating a registry of N keys, overwrite vs strict |
//! | `fixture_parse` | Parsing the bundled corpus in map and lines layouts |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench registry_bench
//! ```

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use msgprep_core::{InsertMode, RawRecord, Registry};
use msgprep_fixtures::{console_api_registry, parse_fixture, write_fixture_lines, CONSOLE_API};
use serde_json::{json, Value};

fn text_packet(i: usize) -> Value {
    json!({
        "level": "log",
        "arguments": [format!("message {i}"), i, true],
        "filename": "https://example.com/app.js",
        "lineNumber": 10,
        "columnNumber": 3,
        "timeStamp": 1_700_000_000_000u64
    })
}

fn grip_packet() -> Value {
    json!({
        "level": "log",
        "arguments": ["mymap", {
            "_grip": {
                "type": "object",
                "actor": "obj45",
                "class": "Map",
                "ownPropertyLength": 0,
                "preview": {
                    "kind": "MapLike",
                    "size": 2,
                    "entries": [["key1", "value1"], ["key2", "value2"]]
                }
            },
            "actorID": "obj45"
        }]
    })
}

fn ingest_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    group.throughput(Throughput::Elements(1));

    for (name, packet) in [("text", text_packet(0)), ("grip", grip_packet())] {
        group.bench_with_input(BenchmarkId::new(name, ""), &packet, |b, packet| {
            b.iter_batched(
                || packet.clone(),
                |packet| black_box(RawRecord::from_packet(packet)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn registry_fill_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_fill");

    for size in [100usize, 1_000, 10_000] {
        let packets: Vec<(String, Value)> = (0..size)
            .map(|i| (format!("key {i}"), text_packet(i)))
            .collect();
        group.throughput(Throughput::Elements(size as u64));

        for mode in [InsertMode::Overwrite, InsertMode::Strict] {
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}").to_lowercase(), size),
                &packets,
                |b, packets| {
                    b.iter_batched(
                        || packets.clone(),
                        |packets| {
                            let mut registry = Registry::with_mode(mode);
                            for (key, packet) in packets {
                                let _ = registry.ingest(key, packet);
                            }
                            black_box(registry)
                        },
                        BatchSize::LargeInput,
                    )
                },
            );
        }
    }

    group.finish();
}

fn fixture_parse_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixture_parse");
    let Ok(registry) = console_api_registry() else {
        return;
    };
    let lines = write_fixture_lines(&registry);
    group.throughput(Throughput::Bytes(CONSOLE_API.len() as u64));

    group.bench_function("map_layout", |b| {
        b.iter(|| black_box(parse_fixture(CONSOLE_API, InsertMode::Overwrite)))
    });
    group.bench_function("lines_layout", |b| {
        b.iter(|| black_box(parse_fixture(&lines, InsertMode::Overwrite)))
    });

    group.finish();
}

criterion_group!(benches, ingest_bench, registry_fill_bench, fixture_parse_bench);
criterion_main!(benches);
