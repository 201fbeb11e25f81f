use crate::engine::core::{BLOCK_SIZE, RoundKeys, decrypt_block_traced, encrypt_block_traced};
use crate::engine::error::*;
use crate::engine::modes::record::{BlockRecord, Feed, Transformed};
use crate::engine::modes::util::{map_blocks, to_block};

/// Core ECB encryption. Each 16-byte block is encrypted independently; input must already be
/// padded to a multiple of 16 bytes.
pub fn ecb_encrypt(plaintext: &[u8], round_keys: &RoundKeys) -> Result<Transformed> {
    check_aligned(plaintext, "ECB input not a multiple of 16 bytes")?;

    let blocks = map_blocks(plaintext, |index, pt| {
        let block = to_block(pt);
        let (ct, rounds) = encrypt_block_traced(&block, round_keys);
        BlockRecord {
            index,
            input: pt.to_vec(),
            feed: Feed::Direct,
            cipher_input: block,
            rounds,
            cipher_output: ct,
            output: ct.to_vec(),
        }
    });

    Ok(Transformed::from_blocks(blocks))
}

/// Core ECB decryption. Padding is left in place.
pub fn ecb_decrypt(ciphertext: &[u8], round_keys: &RoundKeys) -> Result<Transformed> {
    // ECB ciphertext should (and must) always be a multiple of 16 bytes.
    check_aligned(ciphertext, "ECB ciphertext not a multiple of 16 bytes")?;

    let blocks = map_blocks(ciphertext, |index, ct| {
        let block = to_block(ct);
        let (pt, rounds) = decrypt_block_traced(&block, round_keys);
        BlockRecord {
            index,
            input: ct.to_vec(),
            feed: Feed::Direct,
            cipher_input: block,
            rounds,
            cipher_output: pt,
            output: pt.to_vec(),
        }
    });

    Ok(Transformed::from_blocks(blocks))
}

/// Block modes need a non-empty input made of whole blocks.
pub(crate) fn check_aligned(input: &[u8], context: &'static str) -> Result<()> {
    if input.is_empty() || input.len() % BLOCK_SIZE != 0 {
        return Err(Error::InvalidCiphertext {
            len: input.len(),
            context,
        });
    }
    Ok(())
}
