use criterion::{black_box, criterion_group, criterion_main, Criterion};
use delta_merkle::{verify_delta, verify_inclusion, MerkleTree};
use sha2::Sha256;

const HEIGHT: usize = 12;

fn setup_tree() -> MerkleTree<32, Sha256> {
    let leaves = (0..1 << HEIGHT).map(|_| rand::random()).collect();
    MerkleTree::new(HEIGHT, leaves).unwrap()
}

fn random_indices(count: usize) -> Vec<usize> {
    (0..count).map(|_| rand::random::<usize>() % (1 << HEIGHT)).collect()
}

fn bench_proof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Proof Generation");
    let tree = setup_tree();
    let indices = random_indices(100);

    group.bench_function("Inclusion Proof", |b| {
        b.iter(|| {
            for index in &indices {
                black_box(tree.inclusion_proof(HEIGHT, *index)).unwrap();
            }
        })
    });

    group.bench_function("Delta Proof", |b| {
        b.iter(|| {
            for index in &indices {
                black_box(tree.delta_proof(HEIGHT, *index, [0xab; 32])).unwrap();
            }
        })
    });

    group.finish();
}

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Proof Verification");
    let tree = setup_tree();
    let indices = random_indices(100);
    let proofs = indices
        .iter()
        .map(|index| tree.inclusion_proof(HEIGHT, *index).unwrap())
        .collect::<Vec<_>>();
    let deltas = indices
        .iter()
        .map(|index| tree.delta_proof(HEIGHT, *index, [0xab; 32]).unwrap())
        .collect::<Vec<_>>();

    group.bench_function("Inclusion Proof", |b| {
        b.iter(|| {
            for proof in &proofs {
                assert!(verify_inclusion::<32, Sha256>(black_box(proof)));
            }
        })
    });

    group.bench_function("Delta Proof", |b| {
        b.iter(|| {
            for delta in &deltas {
                assert!(verify_delta::<32, Sha256>(black_box(delta)));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_proof_generation, bench_proof_verification);
criterion_main!(benches);
