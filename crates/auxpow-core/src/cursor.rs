//! Sequential reader over a byte slice and Bitcoin varint encoding.

use crate::error::{DecodeError, FormatError, Result};
use crate::hash::Hash256;

/// A forward-only reader over borrowed wire bytes.
///
/// The position only advances on a successful read, so a failed read leaves
/// the cursor where the failing field began.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0 }
    }

    /// Current offset from the start of the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True when every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodeError::TruncatedInput {
                field,
                needed: len,
                remaining,
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, field)?);
        Ok(out)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.read_array::<1>(field)?[0])
    }

    pub fn read_u16_le(&mut self, field: &'static str) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array(field)?))
    }

    pub fn read_u32_le(&mut self, field: &'static str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array(field)?))
    }

    pub fn read_i32_le(&mut self, field: &'static str) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array(field)?))
    }

    pub fn read_u64_le(&mut self, field: &'static str) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array(field)?))
    }

    /// Read a raw 32-byte hash in internal byte order.
    pub fn read_hash(&mut self, field: &'static str) -> Result<Hash256> {
        Ok(Hash256::from_bytes(self.read_array(field)?))
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Read a Bitcoin variable-length integer.
    ///
    /// Values must use their shortest encoding; anything wider is rejected
    /// the same way the reference node rejects it.
    pub fn read_varint(&mut self, field: &'static str) -> Result<u64> {
        let start = self.pos;
        let marker = self.read_u8(field)?;
        let (value, min) = match marker {
            0xfd => (self.read_u16_le(field)? as u64, 0xfd),
            0xfe => (self.read_u32_le(field)? as u64, 0x1_0000),
            0xff => (self.read_u64_le(field)?, 0x1_0000_0000),
            b => return Ok(b as u64),
        };

        if value < min {
            self.pos = start;
            return Err(FormatError::NonCanonicalVarInt { marker, value }.into());
        }
        Ok(value)
    }

    /// Read a varint count prefix for elements of at least `min_elem_len`
    /// bytes each.
    ///
    /// Fails before the caller allocates anything if the remaining input
    /// cannot possibly hold `count` such elements.
    pub fn read_count(&mut self, field: &'static str, min_elem_len: usize) -> Result<usize> {
        let start = self.pos;
        let raw = self.read_varint(field)?;
        let count = usize::try_from(raw).map_err(|_| {
            self.pos = start;
            FormatError::CountTooLarge { field, count: raw }
        })?;

        let remaining = self.remaining();
        let needed = count.saturating_mul(min_elem_len.max(1));
        if needed > remaining {
            self.pos = start;
            return Err(DecodeError::TruncatedInput {
                field,
                needed,
                remaining,
            });
        }
        Ok(count)
    }
}

/// Encode a variable-length integer (Bitcoin varint).
pub fn encode_varint(value: u64, output: &mut Vec<u8>) {
    if value < 0xfd {
        output.push(value as u8);
    } else if value <= 0xffff {
        output.push(0xfd);
        output.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xffffffff {
        output.push(0xfe);
        output.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        output.push(0xff);
        output.extend_from_slice(&value.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_varint() {
        let mut output = Vec::new();

        // Small value (< 0xfd)
        encode_varint(100, &mut output);
        assert_eq!(output, vec![100]);

        // Medium value (0xfd - 0xffff)
        output.clear();
        encode_varint(0x1234, &mut output);
        assert_eq!(output, vec![0xfd, 0x34, 0x12]);

        // Boundary between one and three bytes
        output.clear();
        encode_varint(0xfd, &mut output);
        assert_eq!(output, vec![0xfd, 0xfd, 0x00]);
    }

    #[test]
    fn test_read_varint_widths() {
        let data = [
            0xfc, // 252
            0xfd, 0xfd, 0x00, // 253
            0xfe, 0x00, 0x00, 0x01, 0x00, // 65536
            0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // 2^32
        ];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_varint("v").unwrap(), 252);
        assert_eq!(cursor.read_varint("v").unwrap(), 253);
        assert_eq!(cursor.read_varint("v").unwrap(), 65536);
        assert_eq!(cursor.read_varint("v").unwrap(), 1 << 32);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_varint_rejects_non_canonical() {
        // 5 encoded with the three-byte form
        let data = [0xfd, 0x05, 0x00];
        let mut cursor = ByteCursor::new(&data);

        let err = cursor.read_varint("count").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Format(FormatError::NonCanonicalVarInt { marker: 0xfd, value: 5 })
        ));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_read_varint_truncated() {
        let data = [0xfe, 0x01, 0x02];
        let mut cursor = ByteCursor::new(&data);

        let err = cursor.read_varint("count").unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_read_bytes_does_not_advance_on_failure() {
        let data = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_bytes(2, "a").unwrap(), &[1, 2]);
        match cursor.read_bytes(2, "b") {
            Err(DecodeError::TruncatedInput { field, needed, remaining }) => {
                assert_eq!(field, "b");
                assert_eq!(needed, 2);
                assert_eq!(remaining, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_read_count_bounded_by_remaining() {
        // Claims 0xffffffff elements of 32 bytes with 4 bytes left
        let data = [0xfe, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0];
        let mut cursor = ByteCursor::new(&data);

        let err = cursor.read_count("hashes", 32).unwrap_err();
        match err {
            DecodeError::TruncatedInput { needed, remaining, .. } => {
                assert_eq!(needed, 0xffff_ffff * 32);
                assert_eq!(remaining, 4);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_read_le_integers() {
        let data = [0x01, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_u32_le("a").unwrap(), 1);
        assert_eq!(cursor.read_i32_le("b").unwrap(), -1);
    }
}
