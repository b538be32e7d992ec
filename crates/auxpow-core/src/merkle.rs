//! Merkle branches carried by AuxPoW headers.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cursor::{encode_varint, ByteCursor};
use crate::error::Result;
use crate::hash::{double_sha256, Hash256};

/// Size of one branch hash on the wire.
const BRANCH_HASH_SIZE: usize = 32;

/// A merkle branch: sibling hashes from leaf to root plus a side mask.
///
/// Bit `i` of `side_mask` set means the running hash is the right-hand
/// child at level `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleBranch {
    pub hashes: Vec<Hash256>,
    pub side_mask: i32,
}

impl MerkleBranch {
    /// Decode `varint(count) || count * hash || i32 side_mask`.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let count = cursor.read_count("merkle_branch.count", BRANCH_HASH_SIZE)?;

        let mut hashes = Vec::with_capacity(count);
        for _ in 0..count {
            hashes.push(cursor.read_hash("merkle_branch.hash")?);
        }
        let side_mask = cursor.read_i32_le("merkle_branch.side_mask")?;

        trace!(count, side_mask, "decoded merkle branch");
        Ok(MerkleBranch { hashes, side_mask })
    }

    pub fn serialize_into(&self, out: &mut Vec<u8>) {
        encode_varint(self.hashes.len() as u64, out);
        for hash in &self.hashes {
            out.extend_from_slice(hash.as_bytes());
        }
        out.extend_from_slice(&self.side_mask.to_le_bytes());
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.hashes.len() * BRANCH_HASH_SIZE + 4);
        self.serialize_into(&mut out);
        out
    }

    /// Fold the branch over `leaf` and return the implied root.
    ///
    /// The decoders never call this; checking the result against a header is
    /// left to validation layers.
    pub fn root_from(&self, leaf: Hash256) -> Hash256 {
        let mut current = leaf;
        for (level, sibling) in self.hashes.iter().enumerate() {
            let right_side = level < 32 && (self.side_mask >> level) & 1 == 1;

            let mut combined = [0u8; 64];
            if right_side {
                combined[..32].copy_from_slice(sibling.as_bytes());
                combined[32..].copy_from_slice(current.as_bytes());
            } else {
                combined[..32].copy_from_slice(current.as_bytes());
                combined[32..].copy_from_slice(sibling.as_bytes());
            }
            current = Hash256::from_bytes(double_sha256(&combined));
        }
        current
    }
}

/// Compute the merkle root from a list of transaction IDs.
///
/// For a single transaction the merkle root is simply the txid itself.
/// For multiple transactions, we build a binary tree of hashes.
pub fn compute_merkle_root(txids: &[Hash256]) -> Hash256 {
    if txids.is_empty() {
        return Hash256::ZERO;
    }

    let mut current_level: Vec<Hash256> = txids.to_vec();

    while current_level.len() > 1 {
        let mut next_level = Vec::with_capacity((current_level.len() + 1) / 2);

        for pair in current_level.chunks(2) {
            let left = pair[0];
            // If odd number of elements, duplicate the last one
            let right = pair.get(1).copied().unwrap_or(left);

            let mut combined = [0u8; 64];
            combined[..32].copy_from_slice(left.as_bytes());
            combined[32..].copy_from_slice(right.as_bytes());
            next_level.push(Hash256::from_bytes(double_sha256(&combined)));
        }

        current_level = next_level;
    }

    current_level[0]
}
