//! Header and transaction decoding capabilities used by the AuxPoW decoders.

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::header::BlockHeader;
use crate::transaction::{Transaction, MIN_TRANSACTION_SIZE};

/// Exposes the version field the AuxPoW flag is read from.
pub trait VersionedHeader {
    fn version(&self) -> i32;
}

impl VersionedHeader for BlockHeader {
    fn version(&self) -> i32 {
        self.version
    }
}

/// Decoders for the block header and transaction formats embedded in an
/// AuxPoW block.
///
/// Implementations read from the shared cursor and must leave it positioned
/// directly after the value they decoded. Errors of their own should be
/// surfaced through [`DecodeError::collaborator`](crate::DecodeError::collaborator).
pub trait BlockCodec {
    type Header: VersionedHeader;
    type Transaction;

    /// Lower bound on the encoded size of one transaction. Used to reject
    /// transaction counts the remaining input cannot hold.
    const MIN_TRANSACTION_LEN: usize = 1;

    fn decode_header(&self, cursor: &mut ByteCursor<'_>) -> Result<Self::Header>;

    fn decode_transaction(&self, cursor: &mut ByteCursor<'_>) -> Result<Self::Transaction>;
}

/// The Bitcoin wire formats shared by Dogecoin and its merge-mining parents.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireCodec;

impl BlockCodec for WireCodec {
    type Header = BlockHeader;
    type Transaction = Transaction;

    const MIN_TRANSACTION_LEN: usize = MIN_TRANSACTION_SIZE;

    fn decode_header(&self, cursor: &mut ByteCursor<'_>) -> Result<BlockHeader> {
        BlockHeader::decode(cursor)
    }

    fn decode_transaction(&self, cursor: &mut ByteCursor<'_>) -> Result<Transaction> {
        Transaction::decode(cursor)
    }
}
