//! Block header decoding and serialization.

use serde::{Deserialize, Serialize};

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::hash::Hash256;

/// Size of a block header in bytes.
pub const BLOCK_HEADER_SIZE: usize = 80;

/// Version bit marking a block that carries an AuxPoW header.
pub const VERSION_AUXPOW: i32 = 0x0100;

/// A Bitcoin-format block header (80 bytes).
///
/// Dogecoin and its merge-mining parents share this layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block version. For AuxPoW-era Dogecoin blocks the upper 16 bits
    /// carry the chain id and bit 8 flags the AuxPoW section.
    pub version: i32,
    /// Hash of the previous block (internal byte order).
    pub prev_block_hash: Hash256,
    /// Merkle root of all transactions.
    pub merkle_root: Hash256,
    /// Block timestamp (Unix time).
    pub timestamp: u32,
    /// Difficulty target in compact "bits" format.
    pub bits: u32,
    /// Nonce for proof of work.
    pub nonce: u32,
}

impl BlockHeader {
    /// Decode an 80-byte header from the cursor.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(BlockHeader {
            version: cursor.read_i32_le("header.version")?,
            prev_block_hash: cursor.read_hash("header.prev_block_hash")?,
            merkle_root: cursor.read_hash("header.merkle_root")?,
            timestamp: cursor.read_u32_le("header.timestamp")?,
            bits: cursor.read_u32_le("header.bits")?,
            nonce: cursor.read_u32_le("header.nonce")?,
        })
    }

    /// Serialize the block header to 80 bytes.
    pub fn serialize(&self) -> [u8; BLOCK_HEADER_SIZE] {
        let mut header = [0u8; BLOCK_HEADER_SIZE];

        header[0..4].copy_from_slice(&self.version.to_le_bytes());
        header[4..36].copy_from_slice(self.prev_block_hash.as_bytes());
        header[36..68].copy_from_slice(self.merkle_root.as_bytes());
        header[68..72].copy_from_slice(&self.timestamp.to_le_bytes());
        header[72..76].copy_from_slice(&self.bits.to_le_bytes());
        header[76..80].copy_from_slice(&self.nonce.to_le_bytes());

        header
    }

    /// Compute the block hash (double SHA256 of the serialized header).
    ///
    /// This is the block's identifier, not its proof-of-work hash.
    pub fn hash(&self) -> Hash256 {
        Hash256::hash(&self.serialize())
    }

    /// Whether the version flags an AuxPoW section after this header.
    pub fn is_auxpow(&self) -> bool {
        self.version & VERSION_AUXPOW != 0
    }

    /// Chain id from the upper 16 bits of the version.
    pub fn chain_id(&self) -> u16 {
        (self.version as u32 >> 16) as u16
    }

    /// Version with the chain id and AuxPoW flag stripped.
    pub fn base_version(&self) -> i32 {
        self.version & 0xff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header(version: i32) -> BlockHeader {
        BlockHeader {
            version,
            prev_block_hash: Hash256::from_bytes([0x12; 32]),
            merkle_root: Hash256::from_bytes([0x34; 32]),
            timestamp: 1700000000,
            bits: 0x1a01f9ea,
            nonce: 0xDEADBEEF,
        }
    }

    #[test]
    fn test_block_header_serialization() {
        let header = sample_header(0x00620102);
        let serialized = header.serialize();

        // Version (0x00620102 in little-endian)
        assert_eq!(&serialized[0..4], &[0x02, 0x01, 0x62, 0x00]);

        // Verify prev_hash
        assert_eq!(&serialized[4..36], &[0x12; 32]);

        // Verify merkle_root
        assert_eq!(&serialized[36..68], &[0x34; 32]);

        // Verify nonce (0xDEADBEEF in little-endian)
        assert_eq!(&serialized[76..80], &[0xEF, 0xBE, 0xAD, 0xDE]);

        let mut cursor = ByteCursor::new(&serialized);
        assert_eq!(BlockHeader::decode(&mut cursor).unwrap(), header);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_version_fields() {
        let merged = sample_header(0x00620102);
        assert!(merged.is_auxpow());
        assert_eq!(merged.chain_id(), 0x62);
        assert_eq!(merged.base_version(), 2);

        let plain = sample_header(1);
        assert!(!plain.is_auxpow());
        assert_eq!(plain.chain_id(), 0);

        // Bit 0x0100 only, not neighbouring bits
        assert!(!sample_header(0x0080).is_auxpow());
        assert!(!sample_header(0x0200).is_auxpow());
        assert!(sample_header(0x0101).is_auxpow());
    }

    #[test]
    fn test_truncated_header() {
        let serialized = sample_header(1).serialize();
        let mut cursor = ByteCursor::new(&serialized[..79]);

        let err = BlockHeader::decode(&mut cursor).unwrap_err();
        assert!(err.is_truncated());
    }
}
