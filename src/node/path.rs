use std::fmt::Display;
use std::iter::FusedIterator;

use crate::TreeError;

/// Position of a node in a complete binary tree.
///
/// Level 0 holds the root, level `height` holds the leaves, and level `l`
/// has `2^l` nodes indexed left to right from 0. The identities below hold
/// for any tree height, so `NodeRef` never needs to know which tree it
/// belongs to; bounds are checked by the tree that resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRef {
    pub level: usize,
    pub index: usize,
}

impl NodeRef {
    pub const ROOT: NodeRef = NodeRef { level: 0, index: 0 };

    pub const fn new(level: usize, index: usize) -> Self {
        Self { level, index }
    }

    pub const fn is_root(&self) -> bool {
        self.level == 0
    }

    /// Whether this node is the left child of its parent (even index).
    pub const fn is_left(&self) -> bool {
        self.index % 2 == 0
    }

    /// The other child of this node's parent.
    pub fn sibling(&self) -> Result<NodeRef, TreeError> {
        if self.is_root() {
            return Err(TreeError::InvalidNode("sibling"));
        }
        let index = if self.is_left() {
            self.index + 1
        } else {
            self.index - 1
        };
        Ok(Self::new(self.level, index))
    }

    pub fn parent(&self) -> Result<NodeRef, TreeError> {
        if self.is_root() {
            return Err(TreeError::InvalidNode("parent"));
        }
        Ok(Self::new(self.level - 1, self.index / 2))
    }

    /// Nodes from `self` up to, but excluding, the root.
    pub fn path_to_root(&self) -> MerklePath {
        MerklePath { current: *self }
    }
}

impl Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "N({},{})", self.level, self.index)
    }
}

/// Iterator over a node's merkle path, leaf side first.
///
/// Yields exactly `level` items for a node at `level`.
#[derive(Debug, Clone)]
pub struct MerklePath {
    current: NodeRef,
}

impl Iterator for MerklePath {
    type Item = NodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current;
        let parent = node.parent().ok()?;
        self.current = parent;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.current.level, Some(self.current.level))
    }
}

impl ExactSizeIterator for MerklePath {}
impl FusedIterator for MerklePath {}

/// Sibling of the node at (`level`, `index`).
pub fn sibling(level: usize, index: usize) -> Result<NodeRef, TreeError> {
    NodeRef::new(level, index).sibling()
}

/// Parent of the node at (`level`, `index`): `(level - 1, index / 2)`.
pub fn parent(level: usize, index: usize) -> Result<NodeRef, TreeError> {
    NodeRef::new(level, index).parent()
}

/// Merkle path of the node at (`level`, `index`), excluding the root.
pub fn path_to_root(level: usize, index: usize) -> MerklePath {
    NodeRef::new(level, index).path_to_root()
}

#[cfg(test)]
mod test {
    use super::{parent, path_to_root, sibling, NodeRef};
    use crate::TreeError;

    #[test]
    fn test_sibling_of_even_and_odd() {
        assert_eq!(sibling(3, 4).unwrap(), NodeRef::new(3, 5));
        assert_eq!(sibling(3, 5).unwrap(), NodeRef::new(3, 4));
        assert_eq!(sibling(1, 0).unwrap(), NodeRef::new(1, 1));
    }

    #[test]
    fn test_root_has_no_sibling() {
        assert_eq!(sibling(0, 0).unwrap_err(), TreeError::InvalidNode("sibling"));
        assert_eq!(sibling(0, 7).unwrap_err(), TreeError::InvalidNode("sibling"));
        assert_eq!(parent(0, 0).unwrap_err(), TreeError::InvalidNode("parent"));
    }

    #[test]
    fn test_sibling_involution() {
        for level in 1..8 {
            for index in 0..(1usize << level) {
                let node = NodeRef::new(level, index);
                assert_eq!(node.sibling().unwrap().sibling().unwrap(), node);
                assert_ne!(node.sibling().unwrap(), node);
            }
        }
    }

    #[test]
    fn test_siblings_share_parent() {
        for index in 0..16 {
            let node = NodeRef::new(4, index);
            assert_eq!(node.parent(), node.sibling().unwrap().parent());
        }
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent(3, 5).unwrap(), NodeRef::new(2, 2));
        assert_eq!(parent(2, 2).unwrap(), NodeRef::new(1, 1));
        assert_eq!(parent(1, 1).unwrap(), NodeRef::ROOT);
    }

    #[test]
    fn test_path_to_root() {
        let path: Vec<_> = path_to_root(3, 5).collect();
        assert_eq!(
            path,
            vec![NodeRef::new(3, 5), NodeRef::new(2, 2), NodeRef::new(1, 1)]
        );
        let siblings: Vec<_> = path.iter().map(|node| node.sibling().unwrap()).collect();
        assert_eq!(
            siblings,
            vec![NodeRef::new(3, 4), NodeRef::new(2, 3), NodeRef::new(1, 0)]
        );
    }

    #[test]
    fn test_path_length_matches_level() {
        assert_eq!(path_to_root(0, 0).count(), 0);
        for level in 0..10 {
            let path = path_to_root(level, (1 << level) - 1);
            assert_eq!(path.len(), level);
            assert_eq!(path.count(), level);
        }
    }

    #[test]
    fn test_node_display() {
        assert_eq!(format!("{}", NodeRef::new(3, 5)), "N(3,5)");
        assert_eq!(format!("{}", NodeRef::ROOT), "N(0,0)");
    }
}
