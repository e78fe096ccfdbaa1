use crate::node::{Digest, Hasher};

/// Number of leaves in a complete tree of `height`, or `None` if it doesn't fit in a `usize`.
pub(crate) fn leaf_count_for(height: usize) -> Option<usize> {
    u32::try_from(height)
        .ok()
        .and_then(|height| 1usize.checked_shl(height))
}

/// Hashes every internal node once, bottom-up.
///
/// Returns the rows indexed by level: `levels[0]` is `[root]` and
/// `levels[height]` is the leaf row. The leaf count must be a power of two.
pub(crate) fn build_levels<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    leaves: Vec<Digest<HASH_SIZE>>,
) -> Vec<Vec<Digest<HASH_SIZE>>> {
    debug_assert!(leaves.len().is_power_of_two());
    let mut levels = vec![leaves];
    while let Some(row) = levels.last().filter(|row| row.len() > 1) {
        let parents = row
            .chunks_exact(2)
            .map(|pair| H::combine(&pair[0], &pair[1]))
            .collect::<Vec<_>>();
        levels.push(parents);
    }
    levels.reverse();
    levels
}
