use crate::engine::core::{Block, RoundKeys, encrypt_block_traced};
use crate::engine::modes::record::{BlockRecord, Feed, Source, Transformed};
use crate::engine::modes::util::xor_chunk;

/// Core OFB function. The keystream is the IV encrypted over and over, independent of the data,
/// so encryption and decryption are the same operation.
pub fn ofb_core(input: &[u8], round_keys: &RoundKeys, iv: &Block) -> Transformed {
    let mut register = *iv;
    let mut blocks = Vec::with_capacity(input.len().div_ceil(16));

    for (index, chunk) in input.chunks(16).enumerate() {
        let source = if index == 0 { Source::Iv } else { Source::PreviousKeystream };
        let (keystream, rounds) = encrypt_block_traced(&register, round_keys);
        blocks.push(BlockRecord {
            index,
            input: chunk.to_vec(),
            feed: Feed::Keystream { register, source },
            cipher_input: register,
            rounds,
            cipher_output: keystream,
            output: xor_chunk(&keystream, chunk),
        });
        register = keystream;
    }

    Transformed::from_blocks(blocks)
}
