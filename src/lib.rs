//! Binary Merkle tree with inclusion and delta proofs
//!
//! This crate commits to a fixed, power-of-two sized set of pre-hashed leaves
//! and provides:
//! - Root computation in a single bottom-up pass
//! - Inclusion proofs for any node, leaf or internal
//! - Delta proofs certifying that a single node changed from one value to another
//! - Stateless verification of both proof kinds against a claimed root
//! - Pluggable hashing through the `Hasher` trait (SHA-256 provided)

mod error;
mod node;
mod proof;
mod tree;

pub use error::TreeError;
pub use node::{parent, path_to_root, sibling, Digest, Hasher, MerklePath, NodeRef, ThreadSafe};
pub use proof::{recompute_root, verify_delta, verify_inclusion, DeltaProof, InclusionProof};
pub use tree::MerkleTree;
