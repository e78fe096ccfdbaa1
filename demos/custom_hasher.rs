//! Example of implementing a custom hasher for the binary merkle tree
//!
//! This example demonstrates:
//! - Creating a custom hasher implementation
//! - Using it with the tree
//! - Proofs only verify with the hasher the tree was built with

use delta_merkle::{Hasher, MerkleTree, TreeError};
use sha2::{Digest, Sha256};

// Custom hasher that uses SHA256 but adds a prefix to the input
struct PrefixedSha256;

impl Hasher<32> for PrefixedSha256 {
    fn hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        // Add a custom prefix to the input
        hasher.update(b"custom_prefix:");
        hasher.update(data);
        hasher.finalize().into()
    }
}

fn main() -> Result<(), TreeError> {
    let leaves = (0..4u8).map(|i| [i; 32]).collect::<Vec<_>>();

    // Create a new tree with our custom hasher
    let tree = MerkleTree::<32, PrefixedSha256>::new(2, leaves.clone())?;
    println!("Root hash with custom hasher: {}", hex::encode(tree.root()));

    // Compare with standard SHA256
    let standard_tree = MerkleTree::<32, Sha256>::new(2, leaves)?;
    println!(
        "Root hash with standard SHA256: {}",
        hex::encode(standard_tree.root())
    );

    let proof = tree.inclusion_proof(2, 1)?;
    println!(
        "Proof verifies with custom hasher: {}",
        proof.verify::<PrefixedSha256>()
    );
    println!(
        "Proof verifies with standard SHA256: {}",
        proof.verify::<Sha256>()
    );
    Ok(())
}
