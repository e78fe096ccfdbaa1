use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use delta_merkle::MerkleTree;
use sha2::Sha256;

pub fn generate_random_leaves(count: usize) -> Vec<[u8; 32]> {
    (0..count).map(|_| rand::random()).collect()
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Tree Construction");

    for height in [8, 12, 16] {
        let leaves = generate_random_leaves(1 << height);
        group.bench_with_input(BenchmarkId::from_parameter(height), &leaves, |b, leaves| {
            b.iter(|| black_box(MerkleTree::<32, Sha256>::new(height, leaves.clone())).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_construction);
criterion_main!(benches);
