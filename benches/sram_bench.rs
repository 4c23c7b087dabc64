// SRAM Benchmarks
// Performance benchmarks for high score SRAM encoding and write tracking

use a7800_frontend::highscore::{sram, SRAM_SIZE};
use a7800_frontend::{EventBus, Logger, ManualClock, MemoryStore, ScoreStore};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::rc::Rc;

/// Benchmark encoding and decoding the full SRAM image
fn bench_sram_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("sram_codec");

    let image = sram::default_sram();
    let encoded = sram::encode(&image);

    group.bench_function("encode", |b| {
        b.iter(|| sram::encode(black_box(&image)));
    });

    group.bench_function("decode", |b| {
        let mut target = [0u8; SRAM_SIZE];
        b.iter(|| sram::decode_into(black_box(&encoded), &mut target));
    });

    group.finish();
}

/// Benchmark the write path the runtime hits on every SRAM store
fn bench_notify_write(c: &mut Criterion) {
    c.bench_function("notify_write", |b| {
        let mut store = ScoreStore::new(
            MemoryStore::new(),
            Vec::new(),
            Rc::new(ManualClock::new()),
            Rc::new(EventBus::new()),
            Rc::new(Logger::silent()),
        );
        let mut value = 0u8;

        b.iter(|| {
            value = value.wrapping_add(1);
            store.notify_write(black_box(0x1400), value);
        });
    });
}

criterion_group!(benches, bench_sram_codec, bench_notify_write);
criterion_main!(benches);
