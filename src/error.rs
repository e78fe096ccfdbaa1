//! Error types for the binary merkle tree

use thiserror::Error;

/// Error type for tree, path and proof operations.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TreeError {
    /// The leaf count is not `2^height`.
    #[error("a tree of height {height} needs 2^{height} leaves, got {leaves}")]
    InvalidShape { height: usize, leaves: usize },
    /// The requested node does not exist in this tree.
    #[error("node ({level}, {index}) is outside the tree")]
    OutOfRange { level: usize, index: usize },
    /// Sibling or parent lookup on the root.
    #[error("the root node has no {0}")]
    InvalidNode(&'static str),
    /// The proof index does not fit in the row implied by its sibling count.
    #[error("index {index} does not fit a merkle path of depth {depth}")]
    MalformedProof { index: usize, depth: usize },
    /// Two inclusion proofs do not describe the same position.
    #[error("proofs do not share the same index and siblings")]
    MismatchedProofs,
}
