//! Basic example of using the binary merkle tree
//!
//! This example demonstrates:
//! - Building a tree from pre-hashed leaves
//! - Getting the root hash
//! - Generating and verifying an inclusion proof
//! - Walking a leaf's merkle path

use delta_merkle::{path_to_root, verify_inclusion, MerkleTree, TreeError};
use sha2::Sha256;

fn leaf(value: u8) -> [u8; 32] {
    let mut leaf = [0; 32];
    leaf[31] = value;
    leaf
}

fn main() -> Result<(), TreeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // 8 leaves give a tree of height 3
    let leaves = [1, 3, 3, 7, 4, 2, 0, 6].into_iter().map(leaf).collect();
    let tree = MerkleTree::<32, Sha256>::new(3, leaves)?;
    println!("Root hash: {}", hex::encode(tree.root()));

    // The merkle path of N(3,5) and the siblings a proof has to reveal
    let path = path_to_root(3, 5).collect::<Vec<_>>();
    let siblings = path
        .iter()
        .map(|node| node.sibling())
        .collect::<Result<Vec<_>, _>>()?;
    println!(
        "Merkle path: {}",
        path.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    );
    println!(
        "Merkle path siblings: {}",
        siblings.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    );

    // Prove and verify leaf 5
    let proof = tree.inclusion_proof(3, 5)?;
    println!("{}", proof);
    println!(
        "Proof verification: {}",
        verify_inclusion::<32, Sha256>(&proof)
    );
    Ok(())
}
