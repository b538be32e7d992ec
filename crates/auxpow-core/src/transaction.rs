//! Bitcoin-format transaction decoding and serialization.
//!
//! Both the legacy layout and the BIP144 witness layout are accepted, since a
//! merge-mining parent chain may include witness data in its coinbase.

use serde::{Deserialize, Serialize};

use crate::cursor::{encode_varint, ByteCursor};
use crate::error::{FormatError, Result};
use crate::hash::{hex_bytes, Hash256};

/// Smallest possible encoding: version, two empty counts, lock time.
pub const MIN_TRANSACTION_SIZE: usize = 10;

/// Smallest input: outpoint, empty script, sequence.
const MIN_INPUT_SIZE: usize = 32 + 4 + 1 + 4;

/// Smallest output: value and empty script.
const MIN_OUTPUT_SIZE: usize = 8 + 1;

/// Reference to an output of an earlier transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: Hash256,
    pub vout: u32,
}

impl OutPoint {
    /// The null outpoint spent by coinbase inputs.
    pub const NULL: OutPoint = OutPoint {
        txid: Hash256::ZERO,
        vout: u32::MAX,
    };

    pub fn is_null(&self) -> bool {
        *self == OutPoint::NULL
    }
}

/// A transaction input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    pub previous_output: OutPoint,
    #[serde(with = "hex_bytes")]
    pub script_sig: Vec<u8>,
    pub sequence: u32,
    /// Witness stack; empty for legacy transactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub witness: Vec<Vec<u8>>,
}

/// A transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    /// Value in the chain's smallest unit.
    pub value: u64,
    #[serde(with = "hex_bytes")]
    pub script_pubkey: Vec<u8>,
}

/// A decoded transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    /// Decode a transaction from the cursor.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let version = cursor.read_i32_le("tx.version")?;

        // BIP144: a zero marker where the input count belongs announces witness data
        let segwit = cursor.peek_u8() == Some(0x00);
        if segwit {
            cursor.read_u8("tx.marker")?;
            let flag = cursor.read_u8("tx.flag")?;
            if flag != 0x01 {
                return Err(FormatError::InvalidWitnessFlag(flag).into());
            }
        }

        let input_count = cursor.read_count("tx.input_count", MIN_INPUT_SIZE)?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(decode_input(cursor)?);
        }

        let output_count = cursor.read_count("tx.output_count", MIN_OUTPUT_SIZE)?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(TxOut {
                value: cursor.read_u64_le("tx.output.value")?,
                script_pubkey: read_script(cursor, "tx.output.script_pubkey")?,
            });
        }

        if segwit {
            for input in inputs.iter_mut() {
                let item_count = cursor.read_count("tx.witness.item_count", 1)?;
                let mut stack = Vec::with_capacity(item_count);
                for _ in 0..item_count {
                    stack.push(read_script(cursor, "tx.witness.item")?);
                }
                input.witness = stack;
            }

            // The marker must be followed by at least one non-empty stack
            if inputs.iter().all(|input| input.witness.is_empty()) {
                return Err(FormatError::SuperfluousWitness.into());
            }
        }

        let lock_time = cursor.read_u32_le("tx.lock_time")?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    /// Whether any input carries witness data.
    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness.is_empty())
    }

    /// A coinbase has exactly one input spending the null outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_output.is_null()
    }

    /// Serialize in the form it was decoded from (witness layout if any
    /// input carries witness data).
    pub fn serialize(&self) -> Vec<u8> {
        self.serialize_inner(self.has_witness())
    }

    /// Serialize without witness data (the form hashed for the txid).
    pub fn serialize_without_witness(&self) -> Vec<u8> {
        self.serialize_inner(false)
    }

    /// Transaction ID (double SHA256 of the non-witness serialization).
    pub fn txid(&self) -> Hash256 {
        Hash256::hash(&self.serialize_without_witness())
    }

    fn serialize_inner(&self, with_witness: bool) -> Vec<u8> {
        let mut raw_tx = Vec::with_capacity(MIN_TRANSACTION_SIZE + self.inputs.len() * 64);

        // Version (4 bytes, little-endian)
        raw_tx.extend_from_slice(&self.version.to_le_bytes());

        if with_witness {
            raw_tx.push(0x00); // Marker
            raw_tx.push(0x01); // Flag
        }

        encode_varint(self.inputs.len() as u64, &mut raw_tx);
        for input in &self.inputs {
            raw_tx.extend_from_slice(input.previous_output.txid.as_bytes());
            raw_tx.extend_from_slice(&input.previous_output.vout.to_le_bytes());
            encode_varint(input.script_sig.len() as u64, &mut raw_tx);
            raw_tx.extend_from_slice(&input.script_sig);
            raw_tx.extend_from_slice(&input.sequence.to_le_bytes());
        }

        encode_varint(self.outputs.len() as u64, &mut raw_tx);
        for output in &self.outputs {
            raw_tx.extend_from_slice(&output.value.to_le_bytes());
            encode_varint(output.script_pubkey.len() as u64, &mut raw_tx);
            raw_tx.extend_from_slice(&output.script_pubkey);
        }

        if with_witness {
            for input in &self.inputs {
                encode_varint(input.witness.len() as u64, &mut raw_tx);
                for item in &input.witness {
                    encode_varint(item.len() as u64, &mut raw_tx);
                    raw_tx.extend_from_slice(item);
                }
            }
        }

        raw_tx.extend_from_slice(&self.lock_time.to_le_bytes());
        raw_tx
    }
}

fn decode_input(cursor: &mut ByteCursor<'_>) -> Result<TxIn> {
    let txid = cursor.read_hash("tx.input.prev_txid")?;
    let vout = cursor.read_u32_le("tx.input.prev_vout")?;
    let script_sig = read_script(cursor, "tx.input.script_sig")?;
    let sequence = cursor.read_u32_le("tx.input.sequence")?;

    Ok(TxIn {
        previous_output: OutPoint { txid, vout },
        script_sig,
        sequence,
        witness: Vec::new(),
    })
}

fn read_script(cursor: &mut ByteCursor<'_>, field: &'static str) -> Result<Vec<u8>> {
    let len = cursor.read_count(field, 1)?;
    Ok(cursor.read_bytes(len, field)?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    fn coinbase(tag: &[u8]) -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![TxIn {
                previous_output: OutPoint::NULL,
                script_sig: tag.to_vec(),
                sequence: 0xffffffff,
                witness: Vec::new(),
            }],
            outputs: vec![TxOut {
                value: 10_000 * 100_000_000,
                script_pubkey: vec![0x76, 0xa9, 0x14, 0x00, 0x88, 0xac],
            }],
            lock_time: 0,
        }
    }

    #[test]
    fn test_legacy_roundtrip() {
        let tx = coinbase(b"/merged/");
        let raw = tx.serialize();

        let mut cursor = ByteCursor::new(&raw);
        let decoded = Transaction::decode(&mut cursor).unwrap();

        assert!(cursor.is_empty());
        assert_eq!(decoded, tx);
        assert!(decoded.is_coinbase());
        assert!(!decoded.has_witness());
        assert_eq!(decoded.txid(), Hash256::hash(&raw));
    }

    #[test]
    fn test_witness_transaction() {
        let mut tx = coinbase(b"\x03\x01\x02\x03");
        tx.inputs[0].witness = vec![vec![0u8; 32]];

        let raw = tx.serialize();
        assert_eq!(&raw[4..6], &[0x00, 0x01]);

        let mut cursor = ByteCursor::new(&raw);
        let decoded = Transaction::decode(&mut cursor).unwrap();

        assert!(cursor.is_empty());
        assert_eq!(decoded.inputs[0].witness, vec![vec![0u8; 32]]);
        // txid ignores the witness
        assert_eq!(decoded.txid(), Hash256::hash(&tx.serialize_without_witness()));
    }

    #[test]
    fn test_invalid_witness_flag() {
        let mut raw = coinbase(b"x").serialize_without_witness();
        raw.splice(4..4, [0x00, 0x02]);

        let err = Transaction::decode(&mut ByteCursor::new(&raw)).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Format(FormatError::InvalidWitnessFlag(0x02))
        ));
    }

    #[test]
    fn test_empty_witness_section_rejected() {
        // Marker and flag followed by a single empty witness stack
        let legacy = coinbase(b"x").serialize_without_witness();
        let mut raw = legacy[..4].to_vec();
        raw.extend_from_slice(&[0x00, 0x01]);
        raw.extend_from_slice(&legacy[4..legacy.len() - 4]);
        raw.push(0x00);
        raw.extend_from_slice(&legacy[legacy.len() - 4..]);

        let err = Transaction::decode(&mut ByteCursor::new(&raw)).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Format(FormatError::SuperfluousWitness)
        ));
    }

    #[test]
    fn test_oversized_script_length() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&1i32.to_le_bytes());
        raw.push(0x01);
        raw.extend_from_slice(&[0u8; 36]);
        // Script claims 0xffff bytes with almost nothing left
        raw.extend_from_slice(&[0xfd, 0xff, 0xff]);
        raw.extend_from_slice(&[0u8; 8]);

        let err = Transaction::decode(&mut ByteCursor::new(&raw)).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_serde_renders_scripts_as_hex() {
        let tx = coinbase(&[0xab, 0xcd]);
        let json = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["inputs"][0]["script_sig"], "abcd");
        assert!(json["inputs"][0].get("witness").is_none());
        assert_eq!(
            json["inputs"][0]["previous_output"]["txid"],
            "0".repeat(64)
        );
    }
}
