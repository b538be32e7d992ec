//! Decoding of Dogecoin blocks that may carry merged-mining proofs.
//!
//! This crate provides pure Rust implementations of:
//! - A bounded byte cursor with Bitcoin varint support
//! - Merkle branch, AuxPoW header and AuxPoW block decoding
//! - Block header and transaction wire formats (pluggable via [`BlockCodec`])
//! - Dogecoin network parameters and genesis blocks
//!
//! Decoding is purely structural: proof-of-work, merkle branches and the
//! committed block hash are not checked.

pub mod auxpow;
pub mod codec;
pub mod cursor;
pub mod error;
pub mod hash;
pub mod header;
pub mod merkle;
pub mod network;
pub mod transaction;

pub use auxpow::{AuxBlock, AuxHeader};
pub use codec::{BlockCodec, VersionedHeader, WireCodec};
pub use cursor::ByteCursor;
pub use error::{DecodeError, FormatError, Result};
pub use hash::{double_sha256, Hash256};
pub use header::{BlockHeader, VERSION_AUXPOW};
pub use merkle::{compute_merkle_root, MerkleBranch};
pub use network::Network;
pub use transaction::{OutPoint, Transaction, TxIn, TxOut};
