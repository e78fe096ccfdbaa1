//! Inclusion and delta proofs, and the stateless functions that verify them.
//!
//! A proof never refers back to the tree it was generated from: verifying it
//! only needs the proof itself and the hasher the tree was built with.
//!
//! Siblings are always ordered leaf side first. The parity of the proven
//! node's index at each step tells whether the running value is the left
//! (even) or the right (odd) operand of the next combination.

#[cfg(feature = "serde")]
mod hex_serde;

use std::fmt::Display;

use tracing::debug;

use crate::{
    node::{Digest, Hasher, NodeRef},
    TreeError,
};

/// Recomputes the root from a node value, its index in its row and the
/// siblings along its merkle path.
///
/// This is the single-path counterpart of the tree's bottom-up build, so for
/// any node of a tree it yields exactly that tree's root.
pub fn recompute_root<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    siblings: &[Digest<HASH_SIZE>],
    index: usize,
    value: &Digest<HASH_SIZE>,
) -> Digest<HASH_SIZE> {
    let mut current = *value;
    let mut index = index;
    for sibling in siblings {
        // order the children based on the path
        current = if index % 2 == 0 {
            H::combine(&current, sibling)
        } else {
            H::combine(sibling, &current)
        };
        index /= 2;
    }
    current
}

/// Verify an inclusion proof against the root it claims.
pub fn verify_inclusion<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    proof: &InclusionProof<HASH_SIZE>,
) -> bool {
    proof.verify::<H>()
}

/// Verify both sides of a delta proof.
pub fn verify_delta<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    proof: &DeltaProof<HASH_SIZE>,
) -> bool {
    proof.verify::<H>()
}

/// `index` must address a node in the row that sits `depth` levels below the root.
fn check_index(index: usize, depth: usize) -> Result<(), TreeError> {
    let fits = u32::try_from(depth)
        .ok()
        .and_then(|depth| 1usize.checked_shl(depth))
        .map_or(true, |row_len| index < row_len);
    if fits {
        Ok(())
    } else {
        Err(TreeError::MalformedProof { index, depth })
    }
}

fn root_matches<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    siblings: &[Digest<HASH_SIZE>],
    index: usize,
    value: &Digest<HASH_SIZE>,
    root: &Digest<HASH_SIZE>,
) -> bool {
    let computed = recompute_root::<HASH_SIZE, H>(siblings, index, value);
    if &computed != root {
        debug!(
            index,
            expected = %hex::encode(root),
            computed = %hex::encode(computed),
            "merkle proof rejected"
        );
        return false;
    }
    true
}

/// A merkle proof that `value` sits at `index` under `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        rename_all = "camelCase",
        try_from = "hex_serde::InclusionProofRepr<HASH_SIZE>"
    )
)]
pub struct InclusionProof<const HASH_SIZE: usize> {
    #[cfg_attr(feature = "serde", serde(with = "hex_serde::digest"))]
    root: Digest<HASH_SIZE>,
    index: usize,
    #[cfg_attr(feature = "serde", serde(with = "hex_serde::digest"))]
    value: Digest<HASH_SIZE>,
    #[cfg_attr(feature = "serde", serde(with = "hex_serde::digests"))]
    siblings: Vec<Digest<HASH_SIZE>>,
}

impl<const HASH_SIZE: usize> InclusionProof<HASH_SIZE> {
    /// Creates a new proof. Fails if `index` is outside the row reached by `siblings.len()` steps.
    pub fn new(
        root: Digest<HASH_SIZE>,
        index: usize,
        value: Digest<HASH_SIZE>,
        siblings: Vec<Digest<HASH_SIZE>>,
    ) -> Result<Self, TreeError> {
        check_index(index, siblings.len())?;
        Ok(Self {
            root,
            index,
            value,
            siblings,
        })
    }

    pub fn root(&self) -> &Digest<HASH_SIZE> {
        &self.root
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn value(&self) -> &Digest<HASH_SIZE> {
        &self.value
    }

    /// Sibling values, leaf side first.
    pub fn siblings(&self) -> &[Digest<HASH_SIZE>] {
        &self.siblings
    }

    /// Distance from the proven node to the root.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Position of the proven node in the tree.
    pub fn node(&self) -> NodeRef {
        NodeRef::new(self.depth(), self.index)
    }

    pub fn into_parts(self) -> (Digest<HASH_SIZE>, usize, Digest<HASH_SIZE>, Vec<Digest<HASH_SIZE>>) {
        (self.root, self.index, self.value, self.siblings)
    }

    /// Root implied by the proof's value, index and siblings.
    pub fn compute_root<H: Hasher<HASH_SIZE>>(&self) -> Digest<HASH_SIZE> {
        recompute_root::<HASH_SIZE, H>(&self.siblings, self.index, &self.value)
    }

    /// Whether the implied root equals the claimed one. A mismatch is not an error.
    pub fn verify<H: Hasher<HASH_SIZE>>(&self) -> bool {
        root_matches::<HASH_SIZE, H>(&self.siblings, self.index, &self.value, &self.root)
    }
}

impl<const HASH_SIZE: usize> Display for InclusionProof<HASH_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "InclusionProof {{ root: {}, index: {}, value: {}, siblings: [{}] }}",
            hex::encode(self.root),
            self.index,
            hex::encode(self.value),
            self.siblings
                .iter()
                .map(hex::encode)
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// Proof that changing a single node from `old_value` to `new_value` moves
/// the root from `old_root` to `new_root`.
///
/// Both states share one set of siblings. None of the siblings on a node's
/// merkle path is an ancestor of that node: each one roots a subtree that
/// is disjoint from the path. Changing the node therefore only changes the
/// nodes on its path, never a sibling, and the siblings proven against the
/// old root are exactly the ones needed for the new root.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        rename_all = "camelCase",
        try_from = "hex_serde::DeltaProofRepr<HASH_SIZE>"
    )
)]
pub struct DeltaProof<const HASH_SIZE: usize> {
    index: usize,
    #[cfg_attr(feature = "serde", serde(with = "hex_serde::digests"))]
    siblings: Vec<Digest<HASH_SIZE>>,
    #[cfg_attr(feature = "serde", serde(with = "hex_serde::digest"))]
    old_root: Digest<HASH_SIZE>,
    #[cfg_attr(feature = "serde", serde(with = "hex_serde::digest"))]
    old_value: Digest<HASH_SIZE>,
    #[cfg_attr(feature = "serde", serde(with = "hex_serde::digest"))]
    new_root: Digest<HASH_SIZE>,
    #[cfg_attr(feature = "serde", serde(with = "hex_serde::digest"))]
    new_value: Digest<HASH_SIZE>,
}

impl<const HASH_SIZE: usize> DeltaProof<HASH_SIZE> {
    pub fn new(
        index: usize,
        siblings: Vec<Digest<HASH_SIZE>>,
        old_root: Digest<HASH_SIZE>,
        old_value: Digest<HASH_SIZE>,
        new_root: Digest<HASH_SIZE>,
        new_value: Digest<HASH_SIZE>,
    ) -> Result<Self, TreeError> {
        check_index(index, siblings.len())?;
        Ok(Self {
            index,
            siblings,
            old_root,
            old_value,
            new_root,
            new_value,
        })
    }

    /// Pairs the proofs of one node before and after its update.
    pub fn from_proofs(
        old: InclusionProof<HASH_SIZE>,
        new: InclusionProof<HASH_SIZE>,
    ) -> Result<Self, TreeError> {
        if old.index != new.index || old.siblings != new.siblings {
            return Err(TreeError::MismatchedProofs);
        }
        Ok(Self {
            index: old.index,
            siblings: old.siblings,
            old_root: old.root,
            old_value: old.value,
            new_root: new.root,
            new_value: new.value,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn siblings(&self) -> &[Digest<HASH_SIZE>] {
        &self.siblings
    }

    pub fn old_root(&self) -> &Digest<HASH_SIZE> {
        &self.old_root
    }

    pub fn old_value(&self) -> &Digest<HASH_SIZE> {
        &self.old_value
    }

    pub fn new_root(&self) -> &Digest<HASH_SIZE> {
        &self.new_root
    }

    pub fn new_value(&self) -> &Digest<HASH_SIZE> {
        &self.new_value
    }

    pub fn node(&self) -> NodeRef {
        NodeRef::new(self.siblings.len(), self.index)
    }

    /// Inclusion proof of the old value under the old root.
    pub fn old_proof(&self) -> InclusionProof<HASH_SIZE> {
        InclusionProof {
            root: self.old_root,
            index: self.index,
            value: self.old_value,
            siblings: self.siblings.clone(),
        }
    }

    /// Inclusion proof of the new value under the new root.
    pub fn new_proof(&self) -> InclusionProof<HASH_SIZE> {
        InclusionProof {
            root: self.new_root,
            index: self.index,
            value: self.new_value,
            siblings: self.siblings.clone(),
        }
    }

    /// Verifies the old and the new state against the shared siblings.
    /// Equivalent to verifying [`Self::old_proof`] and [`Self::new_proof`].
    pub fn verify<H: Hasher<HASH_SIZE>>(&self) -> bool {
        root_matches::<HASH_SIZE, H>(&self.siblings, self.index, &self.old_value, &self.old_root)
            && root_matches::<HASH_SIZE, H>(
                &self.siblings,
                self.index,
                &self.new_value,
                &self.new_root,
            )
    }
}

impl<const HASH_SIZE: usize> Display for DeltaProof<HASH_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DeltaProof {{ index: {}, old_root: {}, old_value: {}, new_root: {}, new_value: {}, siblings: {} }}",
            self.index,
            hex::encode(self.old_root),
            hex::encode(self.old_value),
            hex::encode(self.new_root),
            hex::encode(self.new_value),
            self.siblings.len()
        )
    }
}
