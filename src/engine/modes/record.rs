use crate::engine::core::{Block, RoundTrace};

/// Where the AES input of a unit came from, besides the data itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feed {
    /// ECB: the data block goes straight into AES.
    Direct,
    /// CBC encryption: data block XOR chaining value goes into AES.
    ChainBefore { chain: Block, source: Source },
    /// CBC decryption: AES output XOR chaining value is the plaintext block.
    ChainAfter { chain: Block, source: Source },
    /// Stream modes: AES encrypts the register, the result is the keystream for this unit.
    Keystream { register: Block, source: Source },
}

/// Origin of a chaining value or feedback register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Iv,
    PreviousCiphertext,
    PreviousKeystream,
    /// CTR counter block `nonce + offset` (128-bit, wrapping).
    Counter { offset: u128 },
}

/// Real bytes seen while processing one 16-byte unit. For stream modes the last unit may
/// carry fewer than 16 data bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockRecord {
    /// Zero-based unit index.
    pub index: usize,
    /// Data bytes fed to the mode for this unit.
    pub input: Vec<u8>,
    pub feed: Feed,
    /// Block handed to the AES block function.
    pub cipher_input: Block,
    pub rounds: Vec<RoundTrace>,
    /// Block returned by the AES block function.
    pub cipher_output: Block,
    /// Data bytes produced for this unit.
    pub output: Vec<u8>,
}

/// Output of a mode of operation, together with the record of every unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transformed {
    pub output: Vec<u8>,
    pub blocks: Vec<BlockRecord>,
}

impl Transformed {
    pub(crate) fn from_blocks(blocks: Vec<BlockRecord>) -> Self {
        let output = blocks.iter().flat_map(|b| b.output.iter().copied()).collect();
        Self { output, blocks }
    }
}
