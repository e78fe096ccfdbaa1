//! Example of certifying a single leaf update with a delta proof
//!
//! This example demonstrates:
//! - Generating a delta proof without rebuilding the tree
//! - Serializing it to JSON, as a verifier on the other side would receive it
//! - Verifying the decoded proof
//!
//! Run with `cargo run --example delta_update --features serde`.

use delta_merkle::{verify_delta, DeltaProof, MerkleTree};
use sha2::Sha256;

fn leaf(value: u8) -> [u8; 32] {
    let mut leaf = [0; 32];
    leaf[31] = value;
    leaf
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let leaves = [1, 3, 3, 7, 4, 9, 0, 6].into_iter().map(leaf).collect();
    let tree = MerkleTree::<32, Sha256>::new(3, leaves)?;

    // Change N(3,5) from 9 to 8
    let delta = tree.delta_proof(3, 5, leaf(8))?;
    let json = serde_json::to_string_pretty(&delta)?;
    println!("Delta merkle proof of changing N(3,5) from 9 to 8:\n{}", json);

    let received: DeltaProof<32> = serde_json::from_str(&json)?;
    println!(
        "Delta proof verification: {}",
        verify_delta::<32, Sha256>(&received)
    );

    // The new root is the root of the tree with the leaf replaced
    let updated = MerkleTree::<32, Sha256>::new(
        3,
        [1, 3, 3, 7, 4, 8, 0, 6].into_iter().map(leaf).collect(),
    )?;
    println!(
        "New root matches rebuilt tree: {}",
        received.new_root() == &updated.root()
    );

    // A proof that does not fit the tree shape is rejected on decode
    let malformed = json.replace("\"index\": 5", "\"index\": 50");
    let rejected = serde_json::from_str::<DeltaProof<32>>(&malformed);
    println!("Malformed proof rejected: {}", rejected.is_err());

    Ok(())
}
