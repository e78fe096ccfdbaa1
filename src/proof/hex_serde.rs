//! Hex encoding of digests for serde, and the validated wire shapes of the proofs.

use serde::Deserialize;

use super::{DeltaProof, InclusionProof};
use crate::{node::Digest, TreeError};

fn decode<const HASH_SIZE: usize, E: serde::de::Error>(
    encoded: &str,
) -> Result<Digest<HASH_SIZE>, E> {
    let mut digest = [0u8; HASH_SIZE];
    hex::decode_to_slice(encoded, &mut digest).map_err(E::custom)?;
    Ok(digest)
}

pub(crate) mod digest {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::node::Digest;

    pub fn serialize<const HASH_SIZE: usize, S: Serializer>(
        digest: &Digest<HASH_SIZE>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(digest))
    }

    pub fn deserialize<'de, const HASH_SIZE: usize, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Digest<HASH_SIZE>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        super::decode(&encoded)
    }
}

pub(crate) mod digests {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::node::Digest;

    #[allow(clippy::ptr_arg)]
    pub fn serialize<const HASH_SIZE: usize, S: Serializer>(
        digests: &Vec<Digest<HASH_SIZE>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(digests.iter().map(hex::encode))
    }

    pub fn deserialize<'de, const HASH_SIZE: usize, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Digest<HASH_SIZE>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|encoded| super::decode(encoded))
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InclusionProofRepr<const HASH_SIZE: usize> {
    #[serde(with = "digest")]
    root: Digest<HASH_SIZE>,
    index: usize,
    #[serde(with = "digest")]
    value: Digest<HASH_SIZE>,
    #[serde(with = "digests")]
    siblings: Vec<Digest<HASH_SIZE>>,
}

impl<const HASH_SIZE: usize> TryFrom<InclusionProofRepr<HASH_SIZE>> for InclusionProof<HASH_SIZE> {
    type Error = TreeError;

    fn try_from(repr: InclusionProofRepr<HASH_SIZE>) -> Result<Self, Self::Error> {
        Self::new(repr.root, repr.index, repr.value, repr.siblings)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeltaProofRepr<const HASH_SIZE: usize> {
    index: usize,
    #[serde(with = "digests")]
    siblings: Vec<Digest<HASH_SIZE>>,
    #[serde(with = "digest")]
    old_root: Digest<HASH_SIZE>,
    #[serde(with = "digest")]
    old_value: Digest<HASH_SIZE>,
    #[serde(with = "digest")]
    new_root: Digest<HASH_SIZE>,
    #[serde(with = "digest")]
    new_value: Digest<HASH_SIZE>,
}

impl<const HASH_SIZE: usize> TryFrom<DeltaProofRepr<HASH_SIZE>> for DeltaProof<HASH_SIZE> {
    type Error = TreeError;

    fn try_from(repr: DeltaProofRepr<HASH_SIZE>) -> Result<Self, Self::Error> {
        Self::new(
            repr.index,
            repr.siblings,
            repr.old_root,
            repr.old_value,
            repr.new_root,
            repr.new_value,
        )
    }
}
