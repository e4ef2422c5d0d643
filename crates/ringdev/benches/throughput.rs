//! Benchmark – `ringdev::Channel` write/read throughput
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ringdev::{Channel, ChannelOptions, RingStore};

const CAPACITY: usize = 64 * 1024;

/// Deterministic payload of `len` bytes. With `triggers` set, roughly one
/// position in sixteen completes the default trigger.
fn make_payload(len: usize, triggers: bool) -> Vec<u8> {
    let pattern: &[u8] = if triggers {
        b"lorem UCF ipsum."
    } else {
        b"lorem ABC ipsum."
    };
    pattern.iter().copied().cycle().take(len).collect()
}

fn options(substitution: bool) -> ChannelOptions {
    ChannelOptions {
        capacity: CAPACITY,
        substitution: substitution.then(Default::default),
    }
}

/// Fill the channel in `chunk`-sized writes, draining it whenever it refuses
/// bytes, and return the total number of bytes read back.
fn pump(channel: &Channel, payload: &[u8], chunk: usize) -> usize {
    let mut delivered = 0;
    let mut rest = payload;
    while !rest.is_empty() {
        let take = chunk.min(rest.len());
        let n = channel.write(&rest[..take]);
        rest = &rest[n..];
        if n < take {
            let Ok(read) = channel.read_with(usize::MAX, |a, b| {
                black_box((a, b));
                Ok::<(), core::convert::Infallible>(())
            });
            delivered += read;
        }
    }
    let Ok(read) = channel.read_with(usize::MAX, |a, b| {
        black_box((a, b));
        Ok::<(), core::convert::Infallible>(())
    });
    delivered + read
}

fn bench_channel(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_pump");

    for &substitution in &[false, true] {
        let payload = make_payload(1 << 20, substitution);
        group.throughput(Throughput::Bytes(payload.len() as u64));
        for &chunk in &[64usize, 4096] {
            let name = if substitution { "substitution" } else { "plain" };
            group.bench_with_input(BenchmarkId::new(name, chunk), &chunk, |b, &chunk| {
                let channel = Channel::new(options(substitution)).unwrap();
                b.iter(|| black_box(pump(&channel, black_box(&payload), chunk)));
            });
        }
    }

    group.finish();
}

fn bench_store_bytewise(c: &mut Criterion) {
    let payload = make_payload(CAPACITY, false);
    let mut group = c.benchmark_group("store_bytewise");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    group.bench_function("add_then_get", |b| {
        let mut store = RingStore::new(options(false)).unwrap();
        b.iter(|| {
            for &byte in &payload {
                store.add_byte(byte);
            }
            let mut sum = 0u64;
            while let Ok(byte) = store.get_byte() {
                sum += u64::from(byte);
            }
            black_box(sum)
        });
    });

    group.bench_function("add_then_get_bytes", |b| {
        let mut store = RingStore::new(options(false)).unwrap();
        b.iter(|| {
            for &byte in &payload {
                store.add_byte(byte);
            }
            let count = store.count();
            black_box(store.get_bytes(count).map(|(a, b)| a.len() + b.len()))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_channel, bench_store_bytewise);
criterion_main!(benches);
