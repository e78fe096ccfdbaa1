mod path;

use sha2::{Digest as _, Sha256};

pub use path::{parent, path_to_root, sibling, MerklePath, NodeRef};

/// A node value: the output of the tree's hasher.
pub type Digest<const HASH_SIZE: usize> = [u8; HASH_SIZE];

/// Thread safety marker trait
#[cfg(feature = "multi-thread")]
pub trait ThreadSafe: Send + Sync {}
#[cfg(feature = "multi-thread")]
impl<T: Send + Sync> ThreadSafe for T {}

#[cfg(not(feature = "multi-thread"))]
pub trait ThreadSafe {}
#[cfg(not(feature = "multi-thread"))]
impl<T> ThreadSafe for T {}

/// Hash primitive used to derive every internal node of the tree.
///
/// Leaves are supplied already hashed, so the tree only ever hashes pairs of
/// children through [`Hasher::combine`]. The combination is order sensitive:
/// `combine(a, b)` and `combine(b, a)` differ, which is what binds a child to
/// its left or right position.
///
/// # Type Parameters
/// * `HASH_SIZE` - The size of the hash digest in bytes
pub trait Hasher<const HASH_SIZE: usize>: ThreadSafe {
    fn hash(data: &[u8]) -> Digest<HASH_SIZE>;

    /// Parent value of `left` and `right`: `hash(left || right)`.
    fn combine(left: &Digest<HASH_SIZE>, right: &Digest<HASH_SIZE>) -> Digest<HASH_SIZE> {
        Self::hash([left.as_slice(), right.as_slice()].concat().as_slice())
    }
}

impl Hasher<32> for Sha256 {
    fn hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    fn combine(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}
