//! # Counter-Contract Toolkit Benchmarks
//!
//! | Crate | Operation | Target |
//! |-------|-----------|--------|
//! | tc-01 Cell Codec | representation hash of a storage cell | < 10µs |
//! | tc-01 Cell Codec | BOC serialize / parse of trees up to 85 cells | < 1ms |
//! | tc-02 Address Deriver | derive contract address | < 20µs |
//! | tc-03 Message Protocol | encode + decode operation body | < 10µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tc_01_cell_codec::{Address, Builder, Cell};
use tc_02_address_deriver::derive_address;
use tc_03_message_protocol::{decode_storage_cell, ContractStorage, DecodeMode, Operation};

fn storage_cell() -> Cell {
    ContractStorage {
        counter: 7,
        recent_sender: Address::new(0, [0x11; 32]),
        owner_address: Address::new(0, [0x22; 32]),
    }
    .to_cell()
    .expect("storage fits one cell")
}

/// Balanced tree with `width` children per level, `depth` levels deep.
fn tree(depth: usize, width: usize, seed: u64) -> Cell {
    let mut builder = Builder::new();
    builder.store_uint(seed, 64).expect("64 bits fit");
    if depth > 0 {
        for i in 0..width {
            builder
                .store_ref(tree(depth - 1, width, seed * 31 + i as u64))
                .expect("at most four refs");
        }
    }
    builder.end_cell()
}

// ============================================================================
// TC-01: Cell Codec
// ============================================================================

fn bench_cell_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("tc-01-cell-codec");
    let storage = storage_cell();

    group.bench_function("storage_cell_build_and_hash", |b| {
        b.iter(|| {
            let cell = Cell::new(
                storage.data().to_vec(),
                black_box(storage.bit_len()),
                Vec::new(),
            )
            .expect("valid cell");
            black_box(cell.hash())
        })
    });

    group.bench_function("decode_storage_strict", |b| {
        b.iter(|| black_box(decode_storage_cell(&storage, DecodeMode::Strict).is_ok()))
    });

    group.finish();
}

fn bench_boc(c: &mut Criterion) {
    let mut group = c.benchmark_group("tc-01-boc");

    for depth in [1usize, 2, 3] {
        let root = tree(depth, 4, 1);
        let bytes = root.to_boc();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("serialize", depth), &root, |b, root| {
            b.iter(|| black_box(root.to_boc()))
        });
        group.bench_with_input(BenchmarkId::new("parse", depth), &bytes, |b, bytes| {
            b.iter(|| black_box(Cell::from_boc(bytes).is_ok()))
        });
    }

    group.finish();
}

// ============================================================================
// TC-02 / TC-03: Derivation and bodies
// ============================================================================

fn bench_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("tc-02-address-deriver");
    let code = tree(1, 2, 0xdead_beef);
    let data = storage_cell();

    group.bench_function("derive_address", |b| {
        b.iter(|| black_box(derive_address(0, &code, &data)))
    });
    group.finish();
}

fn bench_bodies(c: &mut Criterion) {
    let mut group = c.benchmark_group("tc-03-message-protocol");
    let operations = [
        Operation::Increment { amount: 5 },
        Operation::Deposit,
        Operation::Withdraw {
            amount: 1_000_000_000,
        },
    ];

    for operation in operations {
        group.bench_function(format!("round_trip_{}", operation.name()), |b| {
            b.iter(|| {
                let body = operation.encode().expect("body fits one cell");
                black_box(Operation::decode(&body).is_ok())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_cell_hashing,
    bench_boc,
    bench_derivation,
    bench_bodies
);
criterion_main!(benches);
