//! AuxPoW headers and the blocks that carry them.
//!
//! A merge-mined block is a normal block header followed, when version bit
//! `0x0100` is set, by an AuxPoW header proving that a parent-chain block
//! committed to this block's hash. The transaction list comes last in both
//! cases:
//!
//! ```text
//! header || [coinbase_tx || block_hash || coinbase_branch
//!            || blockchain_branch || parent_header] || varint(n) || n * tx
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::codec::{BlockCodec, VersionedHeader, WireCodec};
use crate::cursor::{encode_varint, ByteCursor};
use crate::error::{DecodeError, FormatError, Result};
use crate::hash::Hash256;
use crate::header::{BlockHeader, VERSION_AUXPOW};
use crate::merkle::MerkleBranch;
use crate::transaction::Transaction;

/// Proof that a parent-chain block committed to an auxiliary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxHeader<T = Transaction, H = BlockHeader> {
    /// Parent chain coinbase carrying the merged-mining commitment.
    pub coinbase_tx: T,
    /// Hash of the parent block as recorded by the merge miner.
    pub block_hash: Hash256,
    /// Links the coinbase to the parent block's merkle root.
    pub coinbase_branch: MerkleBranch,
    /// Links this chain's block hash into the merged-mining tree.
    pub blockchain_branch: MerkleBranch,
    /// Header of the parent-chain block that did the work.
    pub parent_header: H,
}

impl<T, H> AuxHeader<T, H> {
    /// Decode an AuxPoW header using `codec` for the embedded transaction
    /// and parent header.
    pub fn decode_with<C>(cursor: &mut ByteCursor<'_>, codec: &C) -> Result<Self>
    where
        C: BlockCodec<Header = H, Transaction = T>,
    {
        let coinbase_tx = codec.decode_transaction(cursor)?;
        let block_hash = cursor.read_hash("auxpow.block_hash")?;
        let coinbase_branch = MerkleBranch::decode(cursor)?;
        let blockchain_branch = MerkleBranch::decode(cursor)?;
        let parent_header = codec.decode_header(cursor)?;

        trace!(
            coinbase_branch = coinbase_branch.hashes.len(),
            blockchain_branch = blockchain_branch.hashes.len(),
            "decoded auxpow header"
        );

        Ok(AuxHeader {
            coinbase_tx,
            block_hash,
            coinbase_branch,
            blockchain_branch,
            parent_header,
        })
    }
}

impl AuxHeader {
    /// Decode an AuxPoW header in the standard wire formats.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Self::decode_with(cursor, &WireCodec)
    }

    /// Append the wire encoding of this header to `out`.
    pub fn serialize_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.coinbase_tx.serialize());
        out.extend_from_slice(self.block_hash.as_bytes());
        self.coinbase_branch.serialize_into(out);
        self.blockchain_branch.serialize_into(out);
        out.extend_from_slice(&self.parent_header.serialize());
    }
}

/// A block that may carry an AuxPoW header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxBlock<T = Transaction, H = BlockHeader> {
    /// This chain's block header.
    pub header: H,
    /// Present exactly when the header version has bit `0x0100` set.
    pub aux_pow: Option<AuxHeader<T, H>>,
    /// Transactions in wire order.
    pub transactions: Vec<T>,
}

impl<T, H: VersionedHeader> AuxBlock<T, H> {
    /// Decode a block using `codec` for headers and transactions.
    ///
    /// The cursor is left directly after the last transaction.
    pub fn decode_with<C>(cursor: &mut ByteCursor<'_>, codec: &C) -> Result<Self>
    where
        C: BlockCodec<Header = H, Transaction = T>,
    {
        let header = codec.decode_header(cursor)?;
        let version = header.version();

        let aux_pow = if version & VERSION_AUXPOW != 0 {
            Some(AuxHeader::decode_with(cursor, codec)?)
        } else {
            None
        };

        let tx_count = cursor.read_count("block.tx_count", C::MIN_TRANSACTION_LEN)?;
        let mut transactions = Vec::with_capacity(tx_count);
        for _ in 0..tx_count {
            transactions.push(codec.decode_transaction(cursor)?);
        }

        debug!(
            version,
            auxpow = aux_pow.is_some(),
            tx_count,
            "decoded block"
        );

        Ok(AuxBlock {
            header,
            aux_pow,
            transactions,
        })
    }

    pub fn is_auxpow(&self) -> bool {
        self.aux_pow.is_some()
    }
}

impl AuxBlock {
    /// Decode a complete block from raw bytes.
    ///
    /// Unlike [`AuxBlock::decode_with`], the whole input must be consumed.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        let block = Self::decode_with(&mut cursor, &WireCodec).map_err(|err| {
            debug!(position = cursor.position(), error = %err, "block decode failed");
            err
        })?;

        if !cursor.is_empty() {
            let trailing = cursor.remaining();
            debug!(trailing, "block followed by trailing bytes");
            return Err(FormatError::TrailingBytes(trailing).into());
        }
        Ok(block)
    }

    /// Decode a complete block from hex, as returned by a node's
    /// `getblock <hash> 0` RPC.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| DecodeError::from(FormatError::InvalidHex(e.to_string())))?;
        Self::from_bytes(&bytes)
    }

    /// Re-encode the block in wire format.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(256);
        out.extend_from_slice(&self.header.serialize());
        if let Some(aux_pow) = &self.aux_pow {
            aux_pow.serialize_into(&mut out);
        }
        encode_varint(self.transactions.len() as u64, &mut out);
        for tx in &self.transactions {
            out.extend_from_slice(&tx.serialize());
        }
        out
    }

    /// The block identifier (double SHA256 of the header).
    pub fn hash(&self) -> Hash256 {
        self.header.hash()
    }

    /// Merkle root recomputed from the decoded transactions.
    pub fn compute_merkle_root(&self) -> Hash256 {
        let txids: Vec<Hash256> = self.transactions.iter().map(Transaction::txid).collect();
        crate::merkle::compute_merkle_root(&txids)
    }
}
