//! Fixed-height binary merkle tree

mod levels;

use std::fmt::Debug;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::{
    node::{Digest, Hasher, MerklePath, NodeRef},
    proof::{recompute_root, DeltaProof, InclusionProof},
    TreeError,
};

use levels::{build_levels, leaf_count_for};

/// Complete binary merkle tree over `2^height` pre-hashed leaves.
///
/// Every node value is computed once at construction and kept per level, so
/// node lookups and proof generation never hash anything. The tree is
/// immutable afterwards: updating a leaf is expressed as a [`DeltaProof`]
/// rather than a mutation.
/// * `HASH_SIZE` - size of the hash digest in bytes.
/// * `H` - Hasher that will be used to combine nodes.
pub struct MerkleTree<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>> {
    height: usize,
    /// `levels[l][i]` is the value of node `(l, i)`.
    levels: Vec<Vec<Digest<HASH_SIZE>>>,
    _phantom: PhantomData<H>,
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>> MerkleTree<HASH_SIZE, H> {
    /// Builds a tree of the given height. `leaves` must hold exactly `2^height` digests.
    pub fn new(height: usize, leaves: Vec<Digest<HASH_SIZE>>) -> Result<Self, TreeError> {
        if leaf_count_for(height) != Some(leaves.len()) {
            return Err(TreeError::InvalidShape {
                height,
                leaves: leaves.len(),
            });
        }
        let levels = build_levels::<HASH_SIZE, H>(leaves);
        let tree = Self {
            height,
            levels,
            _phantom: PhantomData,
        };
        debug!(
            height,
            leaves = tree.leaf_count(),
            root = %hex::encode(tree.root()),
            "built merkle tree"
        );
        Ok(tree)
    }

    /// Builds a tree whose height is implied by the number of leaves.
    pub fn from_leaves(leaves: Vec<Digest<HASH_SIZE>>) -> Result<Self, TreeError> {
        if !leaves.len().is_power_of_two() {
            return Err(TreeError::InvalidShape {
                height: leaves.len().checked_ilog2().unwrap_or(0) as usize,
                leaves: leaves.len(),
            });
        }
        Self::new(leaves.len().trailing_zeros() as usize, leaves)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    pub fn leaves(&self) -> &[Digest<HASH_SIZE>] {
        &self.levels[self.height]
    }

    /// Root of the tree, node `(0, 0)`. NO HASHING IS DONE HERE.
    pub fn root(&self) -> Digest<HASH_SIZE> {
        self.levels[0][0]
    }

    /// All node values at `level`, left to right.
    pub fn level(&self, level: usize) -> Result<&[Digest<HASH_SIZE>], TreeError> {
        self.levels
            .get(level)
            .map(Vec::as_slice)
            .ok_or(TreeError::OutOfRange { level, index: 0 })
    }

    pub fn contains(&self, node: NodeRef) -> bool {
        self.levels
            .get(node.level)
            .is_some_and(|row| node.index < row.len())
    }

    /// Value of the node at (`level`, `index`).
    pub fn node_value(&self, level: usize, index: usize) -> Result<Digest<HASH_SIZE>, TreeError> {
        self.levels
            .get(level)
            .and_then(|row| row.get(index))
            .copied()
            .ok_or(TreeError::OutOfRange { level, index })
    }

    /// Merkle path of an existing node, from the node up to but excluding the root.
    pub fn merkle_path(&self, level: usize, index: usize) -> Result<MerklePath, TreeError> {
        let node = NodeRef::new(level, index);
        if !self.contains(node) {
            return Err(TreeError::OutOfRange { level, index });
        }
        Ok(node.path_to_root())
    }

    /// Values of the siblings along the merkle path of (`level`, `index`), leaf side first.
    pub fn sibling_values(
        &self,
        level: usize,
        index: usize,
    ) -> Result<Vec<Digest<HASH_SIZE>>, TreeError> {
        self.merkle_path(level, index)?
            .map(|node| {
                let sibling = node.sibling()?;
                self.node_value(sibling.level, sibling.index)
            })
            .collect()
    }

    /// Inclusion proof of the node at (`level`, `index`) against the current root.
    ///
    /// Works for internal nodes as well as leaves; the proof then holds `level`
    /// siblings instead of `height`.
    pub fn inclusion_proof(
        &self,
        level: usize,
        index: usize,
    ) -> Result<InclusionProof<HASH_SIZE>, TreeError> {
        let value = self.node_value(level, index)?;
        let siblings = self.sibling_values(level, index)?;
        trace!(level, index, siblings = siblings.len(), "generated inclusion proof");
        InclusionProof::new(self.root(), index, value, siblings)
    }

    /// Proof that replacing the node at (`level`, `index`) with `new_value`
    /// moves the root from [`Self::root`] to the returned `new_root`.
    ///
    /// The new root is recomputed from the old proof's siblings; the tree
    /// itself is left untouched.
    pub fn delta_proof(
        &self,
        level: usize,
        index: usize,
        new_value: Digest<HASH_SIZE>,
    ) -> Result<DeltaProof<HASH_SIZE>, TreeError> {
        let (old_root, _, old_value, siblings) = self.inclusion_proof(level, index)?.into_parts();
        let new_root = recompute_root::<HASH_SIZE, H>(&siblings, index, &new_value);
        trace!(
            level,
            index,
            new_root = %hex::encode(new_root),
            "generated delta proof"
        );
        DeltaProof::new(index, siblings, old_root, old_value, new_root, new_value)
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>> Clone for MerkleTree<HASH_SIZE, H> {
    fn clone(&self) -> Self {
        Self {
            height: self.height,
            levels: self.levels.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>> Debug for MerkleTree<HASH_SIZE, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MerkleTree {{ height: {}, leaves: {}, root: {} }}",
            self.height,
            self.leaf_count(),
            hex::encode(self.root())
        )
    }
}

#[cfg(test)]
mod test {
    use sha2::Sha256;

    use super::MerkleTree;
    use crate::{Hasher, NodeRef, TreeError};

    fn leaves(count: u8) -> Vec<[u8; 32]> {
        (0..count).map(|i| [i; 32]).collect()
    }

    #[test]
    fn test_tree_new_rejects_wrong_leaf_count() {
        assert_eq!(
            MerkleTree::<32, Sha256>::new(3, leaves(7)).unwrap_err(),
            TreeError::InvalidShape {
                height: 3,
                leaves: 7
            }
        );
        assert_eq!(
            MerkleTree::<32, Sha256>::new(2, leaves(8)).unwrap_err(),
            TreeError::InvalidShape {
                height: 2,
                leaves: 8
            }
        );
        assert_eq!(
            MerkleTree::<32, Sha256>::new(0, Vec::new()).unwrap_err(),
            TreeError::InvalidShape {
                height: 0,
                leaves: 0
            }
        );
        assert!(MerkleTree::<32, Sha256>::new(usize::MAX, leaves(1)).is_err());
    }

    #[test]
    fn test_tree_from_leaves() {
        let tree = MerkleTree::<32, Sha256>::from_leaves(leaves(16)).unwrap();
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.leaf_count(), 16);
        assert_eq!(
            tree.root(),
            MerkleTree::<32, Sha256>::new(4, leaves(16)).unwrap().root()
        );
        assert_eq!(
            MerkleTree::<32, Sha256>::from_leaves(leaves(6)).unwrap_err(),
            TreeError::InvalidShape {
                height: 2,
                leaves: 6
            }
        );
        assert!(MerkleTree::<32, Sha256>::from_leaves(Vec::new()).is_err());
    }

    #[test]
    fn test_height_zero_tree() {
        let tree = MerkleTree::<32, Sha256>::new(0, vec![[9; 32]]).unwrap();
        assert_eq!(tree.root(), [9; 32]);
        let proof = tree.inclusion_proof(0, 0).unwrap();
        assert!(proof.siblings().is_empty());
        assert!(proof.verify::<Sha256>());
        let delta = tree.delta_proof(0, 0, [1; 32]).unwrap();
        assert_eq!(delta.new_root(), &[1; 32]);
        assert!(delta.verify::<Sha256>());
    }

    #[test]
    fn test_node_values() {
        let leaves = leaves(4);
        let tree = MerkleTree::<32, Sha256>::new(2, leaves.clone()).unwrap();
        let left = Sha256::combine(&leaves[0], &leaves[1]);
        let right = Sha256::combine(&leaves[2], &leaves[3]);
        assert_eq!(tree.node_value(2, 3).unwrap(), leaves[3]);
        assert_eq!(tree.node_value(1, 0).unwrap(), left);
        assert_eq!(tree.node_value(1, 1).unwrap(), right);
        assert_eq!(tree.node_value(0, 0).unwrap(), Sha256::combine(&left, &right));
        assert_eq!(tree.root(), tree.node_value(0, 0).unwrap());
        assert_eq!(tree.level(1).unwrap(), &[left, right]);
        assert_eq!(tree.leaves(), leaves.as_slice());
    }

    #[test]
    fn test_out_of_range_queries() {
        let tree = MerkleTree::<32, Sha256>::new(2, leaves(4)).unwrap();
        assert_eq!(
            tree.node_value(3, 0).unwrap_err(),
            TreeError::OutOfRange { level: 3, index: 0 }
        );
        assert_eq!(
            tree.node_value(1, 2).unwrap_err(),
            TreeError::OutOfRange { level: 1, index: 2 }
        );
        assert_eq!(
            tree.inclusion_proof(2, 4).unwrap_err(),
            TreeError::OutOfRange { level: 2, index: 4 }
        );
        assert_eq!(
            tree.delta_proof(5, 0, [0; 32]).unwrap_err(),
            TreeError::OutOfRange { level: 5, index: 0 }
        );
        assert!(tree.merkle_path(0, 1).is_err());
        assert!(tree.level(3).is_err());
        assert!(!tree.contains(NodeRef::new(2, 4)));
        assert!(tree.contains(NodeRef::new(2, 3)));
        // the tree stays usable after a rejected query
        assert!(tree.inclusion_proof(2, 3).unwrap().verify::<Sha256>());
    }

    #[test]
    fn test_inclusion_proof_of_internal_node() {
        let tree = MerkleTree::<32, Sha256>::new(3, leaves(8)).unwrap();
        let proof = tree.inclusion_proof(1, 1).unwrap();
        assert_eq!(proof.siblings(), &[tree.node_value(1, 0).unwrap()]);
        assert_eq!(proof.value(), &tree.node_value(1, 1).unwrap());
        assert_eq!(proof.node(), NodeRef::new(1, 1));
        assert!(proof.verify::<Sha256>());

        let root_proof = tree.inclusion_proof(0, 0).unwrap();
        assert!(root_proof.siblings().is_empty());
        assert_eq!(root_proof.value(), &tree.root());
        assert!(root_proof.verify::<Sha256>());
    }

    #[test]
    fn test_sibling_values_follow_path() {
        let tree = MerkleTree::<32, Sha256>::new(3, leaves(8)).unwrap();
        let path = tree.merkle_path(3, 2).unwrap().collect::<Vec<_>>();
        let siblings = tree.sibling_values(3, 2).unwrap();
        assert_eq!(path.len(), siblings.len());
        for (node, value) in path.iter().zip(siblings.iter()) {
            let sibling = node.sibling().unwrap();
            assert_eq!(&tree.node_value(sibling.level, sibling.index).unwrap(), value);
        }
    }

    #[test]
    fn test_delta_proof_does_not_mutate_tree() {
        let tree = MerkleTree::<32, Sha256>::new(3, leaves(8)).unwrap();
        let root = tree.root();
        let delta = tree.delta_proof(3, 6, [0xff; 32]).unwrap();
        assert_eq!(tree.root(), root);
        assert_eq!(delta.old_root(), &root);
        assert_ne!(delta.new_root(), &root);
        assert_eq!(tree.node_value(3, 6).unwrap(), [6; 32]);
    }

    #[test]
    fn test_tree_debug() {
        let tree = MerkleTree::<32, Sha256>::new(0, vec![[0; 32]]).unwrap();
        assert_eq!(
            format!("{:?}", tree),
            "MerkleTree { height: 0, leaves: 1, root: 0000000000000000000000000000000000000000000000000000000000000000 }"
        );
    }
}
