//! Dogecoin network definitions and constants.

use serde::{Deserialize, Serialize};

use crate::hash::Hash256;
use crate::header::BlockHeader;

/// Dogecoin network type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Dogecoin mainnet
    #[default]
    Mainnet,
    /// Dogecoin testnet (version 3)
    Testnet,
}

/// Merged-mining chain id Dogecoin places in the upper version bits.
pub const AUXPOW_CHAIN_ID: u16 = 0x0062;

/// Number of decimal places in one coin.
pub const DECIMALS: u32 = 8;

/// Smallest units in one coin (10^8).
pub const KOINU_PER_DOGE: u64 = 100_000_000;

/// Merkle root shared by the mainnet and testnet genesis blocks.
const GENESIS_MERKLE_ROOT: [u8; 32] = [
    0x69, 0x6a, 0xd2, 0x0e, 0x2d, 0xd4, 0x36, 0x5c,
    0x74, 0x59, 0xb4, 0xa4, 0xa5, 0xaf, 0x74, 0x3d,
    0x5e, 0x92, 0xc6, 0xda, 0x32, 0x29, 0xe6, 0x53,
    0x2c, 0xd6, 0x05, 0xf6, 0x53, 0x3f, 0x2a, 0x5b,
];

const MAINNET_GENESIS_HASH: [u8; 32] = [
    0x91, 0x56, 0x35, 0x2c, 0x18, 0x18, 0xb3, 0x2e,
    0x90, 0xc9, 0xe7, 0x92, 0xef, 0xd6, 0xa1, 0x1a,
    0x82, 0xfe, 0x79, 0x56, 0xa6, 0x30, 0xf0, 0x3b,
    0xbe, 0xe2, 0x36, 0xce, 0xda, 0xe3, 0x91, 0x1a,
];

const TESTNET_GENESIS_HASH: [u8; 32] = [
    0x9e, 0x55, 0x50, 0x73, 0xd0, 0xc4, 0xf3, 0x64,
    0x56, 0xdb, 0x89, 0x51, 0xf4, 0x49, 0x70, 0x4d,
    0x54, 0x4d, 0x28, 0x26, 0xd9, 0xaa, 0x60, 0x63,
    0x6b, 0x40, 0x37, 0x46, 0x26, 0x78, 0x0a, 0xbb,
];

/// Parse a display-order hash at compile time.
const fn display_hash(hex: &str) -> Hash256 {
    const fn nibble(c: u8) -> u8 {
        match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            _ => panic!("invalid hex digit in checkpoint hash"),
        }
    }

    let digits = hex.as_bytes();
    assert!(digits.len() == 64, "checkpoint hash must be 64 hex digits");

    let mut bytes = [0u8; 32];
    let mut i = 0;
    while i < 32 {
        bytes[31 - i] = (nibble(digits[2 * i]) << 4) | nibble(digits[2 * i + 1]);
        i += 1;
    }
    Hash256::from_bytes(bytes)
}

static MAINNET_CHECKPOINTS: [(u32, Hash256); 13] = [
    (0, display_hash("1a91e3dace36e2be3bf030a65679fe821aa1d6ef92e7c9902eb318182c355691")),
    (104_679, display_hash("35eb87ae90d44b98898fec8c39577b76cb1eb08e1261cfc10706c8ce9a1d01cf")),
    (145_000, display_hash("cc47cae70d7c5c92828d3214a266331dde59087d4a39071fa76ddfff9b7bde72")),
    (371_337, display_hash("60323982f9c5ff1b5a954eac9dc1269352835f47c2c5222691d80f0d50dcf053")),
    (450_000, display_hash("d279277f8f846a224d776450aa04da3cf978991a182c6f3075db4c48b173bbd7")),
    (771_275, display_hash("1b7d789ed82cbdc640952e7e7a54966c6488a32eaad54fc39dff83f310dbaaed")),
    (1_000_000, display_hash("6aae55bea74235f0c80bd066349d4440c31f2d0f27d54265ecd484d8c1d11b47")),
    (1_250_000, display_hash("00c7a442055c1a990e11eea5371ca5c1c02a0677b33cc88ec728c45edc4ec060")),
    (1_500_000, display_hash("f1d32d6920de7b617d51e74bdf4e58adccaa582ffdc8657464454f16a952fca6")),
    (1_750_000, display_hash("5c8e7327984f0d6f59447d89d143e5f6eafc524c82ad95d176c5cec082ae2001")),
    (2_000_000, display_hash("9914f0e82e39bbf21950792e8816620d71b9965bdbbc14e72a95e3ab9618fea8")),
    (2_031_142, display_hash("893297d89afb7599a3c571ca31a3b80e8353f4cf39872400ad0f57d26c4c5d42")),
    (2_510_150, display_hash("77e3f4a4bcb4a2c15e8015525e3d15b466f6c022f6ca82698f329edef7d9777e")),
];

static TESTNET_CHECKPOINTS: [(u32, Hash256); 15] = [
    (0, display_hash("bb0a78264637406b6360aad926284d544d7049f45189db5664f3c4d07350559e")),
    (483_173, display_hash("a804201ca0aceb7e937ef7a3c613a9b7589245b10cc095148c4ce4965b0b73b5")),
    (591_117, display_hash("5f6b93b2c28cedf32467d900369b8be6700f0649388a7dbfd3ebd4a01b1ffad8")),
    (658_924, display_hash("ed6c8324d9a77195ee080f225a0fca6346495e08ded99bcda47a8eea5a8a620b")),
    (703_635, display_hash("839fa54617adcd582d53030a37455c14a87a806f6615aa8213f13e196230ff7d")),
    (1_000_000, display_hash("1fe4d44ea4d1edb031f52f0d7c635db8190dc871a190654c41d2450086b8ef0e")),
    (1_202_214, display_hash("a2179767a87ee4e95944703976fee63578ec04fa3ac2fc1c9c2c83587d096977")),
    (1_250_000, display_hash("b46affb421872ca8efa30366b09694e2f9bf077f7258213be14adb05a9f41883")),
    (1_500_000, display_hash("0caa041b47b4d18a4f44bdc05cef1a96d5196ce7b2e32ad3e4eb9ba505144917")),
    (1_750_000, display_hash("8042462366d854ad39b8b95ed2ca12e89a526ceee5a90042d55ebb24d5aab7e9")),
    (2_000_000, display_hash("d6acde73e1b42fc17f29dcc76f63946d378ae1bd4eafab44d801a25be784103c")),
    (2_250_000, display_hash("c4342ae6d9a522a02e5607411df1b00e9329563ef844a758d762d601d42c86dc")),
    (2_500_000, display_hash("3a66ec4933fbb348c9b1889aaf2f732fe429fd9a8f74fee6895eae061ac897e2")),
    (2_750_000, display_hash("473ea9f625d59f534ffcc9738ffc58f7b7b1e0e993078614f5484a9505885563")),
    (3_062_910, display_hash("113c41c00934f940a41f99d18b2ad9aefd183a4b7fe80527e1e6c12779bd0246")),
];

impl Network {
    /// Message start bytes prefixed to every P2P message.
    pub fn magic(&self) -> [u8; 4] {
        match self {
            Network::Mainnet => [0xc0, 0xc0, 0xc0, 0xc0],
            Network::Testnet => [0xfc, 0xc1, 0xb7, 0xdc],
        }
    }

    /// Get the default P2P port for this network.
    pub fn default_port(&self) -> u16 {
        match self {
            Network::Mainnet => 22556,
            Network::Testnet => 44556,
        }
    }

    /// Get the default RPC port for this network.
    pub fn default_rpc_port(&self) -> u16 {
        match self {
            Network::Mainnet => 22555,
            Network::Testnet => 44555,
        }
    }

    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Network::Mainnet => "DOGE",
            Network::Testnet => "tDOGE",
        }
    }

    /// First height at which AuxPoW blocks are accepted.
    pub fn auxpow_start_height(&self) -> u32 {
        match self {
            Network::Mainnet => 371_337,
            Network::Testnet => 158_100,
        }
    }

    /// Chain id expected in merge-mined block versions.
    pub fn auxpow_chain_id(&self) -> u16 {
        AUXPOW_CHAIN_ID
    }

    /// The genesis block header.
    pub fn genesis_header(&self) -> BlockHeader {
        let (timestamp, nonce) = match self {
            // 2013-12-06 10:25:40 UTC
            Network::Mainnet => (1_386_325_540, 99_943),
            // 2014-02-04 08:41:29 UTC
            Network::Testnet => (1_391_503_289, 997_879),
        };

        BlockHeader {
            version: 1,
            prev_block_hash: Hash256::ZERO,
            merkle_root: Hash256::from_bytes(GENESIS_MERKLE_ROOT),
            timestamp,
            bits: 0x1e0ffff0,
            nonce,
        }
    }

    /// Hash of the genesis block.
    pub fn genesis_hash(&self) -> Hash256 {
        match self {
            Network::Mainnet => Hash256::from_bytes(MAINNET_GENESIS_HASH),
            Network::Testnet => Hash256::from_bytes(TESTNET_GENESIS_HASH),
        }
    }

    /// Known-good block hashes by height, in ascending height order.
    pub fn checkpoints(&self) -> &'static [(u32, Hash256)] {
        match self {
            Network::Mainnet => &MAINNET_CHECKPOINTS,
            Network::Testnet => &TESTNET_CHECKPOINTS,
        }
    }

    /// Checkpointed hash at `height`, if there is one.
    pub fn checkpoint(&self, height: u32) -> Option<Hash256> {
        self.checkpoints()
            .binary_search_by_key(&height, |&(h, _)| h)
            .ok()
            .map(|i| self.checkpoints()[i].1)
    }

    /// Parse network from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" | "dogecoin" => Some(Network::Mainnet),
            "testnet" | "testnet3" | "test" => Some(Network::Testnet),
            _ => None,
        }
    }

    /// Get network name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Mainnet => "Dogecoin Mainnet",
            Network::Testnet => "Dogecoin Testnet",
        }
    }
}

impl core::fmt::Display for Network {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}
