//! Performance benchmarks for the hash-state backends
//!
//! Compares the inline low-level contexts with the handle backend, and
//! measures the dispatcher's overhead against the raw RustCrypto digests.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tls_hash_core::{FixedMode, HashAlgorithm, HashState};

fn state(certified: bool) -> HashState {
    let mut state = HashState::with_mode(FixedMode(certified)).unwrap();
    state.allow_md5_for_fips().unwrap();
    state
}

/// Benchmark each algorithm on both backends
fn benchmark_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("backends");

    let sizes = vec![
        64,        // One block
        1_024,     // Typical handshake message
        16_384,    // One TLS record
        1_048_576, // Bulk transcript
    ];

    for size in sizes {
        let data = generate_test_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        for alg in [
            HashAlgorithm::MD5,
            HashAlgorithm::SHA1,
            HashAlgorithm::SHA256,
            HashAlgorithm::SHA384,
            HashAlgorithm::MD5SHA1,
        ] {
            for (label, certified) in [("low_level", false), ("handle", true)] {
                // Certified mode refuses the composite
                if certified && alg == HashAlgorithm::MD5SHA1 {
                    continue;
                }
                let mut state = state(certified);
                group.bench_with_input(
                    BenchmarkId::new(format!("{alg}/{label}"), format_size(size)),
                    &data,
                    |b, data| {
                        b.iter(|| {
                            state.init(alg).unwrap();
                            state.update(black_box(data)).unwrap();
                            black_box(state.finish().unwrap());
                        })
                    },
                );
            }
        }
    }

    group.finish();
}

/// Benchmark forking a transcript, as done for every handshake signature
fn benchmark_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy");
    let data = generate_test_data(4_096);

    for (label, certified) in [("low_level", false), ("handle", true)] {
        let mut source = state(certified);
        source.init(HashAlgorithm::SHA256).unwrap();
        source.update(&data).unwrap();
        let mut target = state(certified);

        group.bench_function(label, |b| {
            b.iter(|| {
                target.copy_from(black_box(&source)).unwrap();
                black_box(target.finish().unwrap());
            })
        });
    }

    group.finish();
}

/// Benchmark dispatcher overhead vs the raw digest
fn benchmark_implementation_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("implementation_overhead");

    let data = generate_test_data(1_048_576);
    group.throughput(Throughput::Bytes(1_048_576));

    let mut state = state(false);
    group.bench_function("hash_state_sha256", |b| {
        b.iter(|| {
            state.init(HashAlgorithm::SHA256).unwrap();
            state.update(black_box(&data)).unwrap();
            black_box(state.finish().unwrap());
        })
    });

    group.bench_function("raw_sha256", |b| {
        use sha2::{Digest, Sha256};
        b.iter(|| {
            let mut hasher = Sha256::new();
            hasher.update(black_box(&data));
            black_box(hasher.finalize());
        })
    });

    group.finish();
}

// Helper functions

fn generate_test_data(size: usize) -> Vec<u8> {
    // Deterministic data for reproducible benchmarks
    let mut data = Vec::with_capacity(size);
    let mut seed = 0x12345678u32;

    for _ in 0..size {
        data.push((seed & 0xFF) as u8);
        seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    }

    data
}

fn format_size(size: usize) -> String {
    if size >= 1_048_576 {
        format!("{}MB", size / 1_048_576)
    } else if size >= 1_024 {
        format!("{}KB", size / 1_024)
    } else {
        format!("{size}B")
    }
}

criterion_group!(
    benches,
    benchmark_backends,
    benchmark_copy,
    benchmark_implementation_overhead
);

criterion_main!(benches);
