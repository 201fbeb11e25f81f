use crate::engine::core::{Block, RoundKeys, decrypt_block_traced, encrypt_block_traced};
use crate::engine::error::*;
use crate::engine::modes::ecb::check_aligned;
use crate::engine::modes::record::{BlockRecord, Feed, Source, Transformed};
use crate::engine::modes::util::{map_blocks, to_block, xor_blocks};

/// Core CBC encryption. Each plaintext block is `XOR`'d with the previous ciphertext block
/// (the IV for the first block) before encryption, so blocks are processed in order.
pub fn cbc_encrypt(plaintext: &[u8], round_keys: &RoundKeys, iv: &Block) -> Result<Transformed> {
    check_aligned(plaintext, "CBC input not a multiple of 16 bytes")?;

    let mut chain = *iv;
    let mut blocks = Vec::with_capacity(plaintext.len() / 16);

    for (index, pt) in plaintext.chunks(16).enumerate() {
        let source = if index == 0 { Source::Iv } else { Source::PreviousCiphertext };
        let mixed = xor_blocks(&to_block(pt), &chain);
        let (ct, rounds) = encrypt_block_traced(&mixed, round_keys);
        blocks.push(BlockRecord {
            index,
            input: pt.to_vec(),
            feed: Feed::ChainBefore { chain, source },
            cipher_input: mixed,
            rounds,
            cipher_output: ct,
            output: ct.to_vec(),
        });
        chain = ct;
    }

    Ok(Transformed::from_blocks(blocks))
}

/// Core CBC decryption. Every chaining value is already known from the ciphertext, so blocks
/// are independent and may be decrypted in parallel. Padding is left in place.
pub fn cbc_decrypt(ciphertext: &[u8], round_keys: &RoundKeys, iv: &Block) -> Result<Transformed> {
    check_aligned(ciphertext, "CBC ciphertext not a multiple of 16 bytes")?;

    let blocks = map_blocks(ciphertext, |index, ct| {
        let (chain, source) = match index {
            0 => (*iv, Source::Iv),
            _ => (
                to_block(&ciphertext[(index - 1) * 16..index * 16]),
                Source::PreviousCiphertext,
            ),
        };
        let block = to_block(ct);
        let (decrypted, rounds) = decrypt_block_traced(&block, round_keys);
        BlockRecord {
            index,
            input: ct.to_vec(),
            feed: Feed::ChainAfter { chain, source },
            cipher_input: block,
            rounds,
            cipher_output: decrypted,
            output: xor_blocks(&decrypted, &chain).to_vec(),
        }
    });

    Ok(Transformed::from_blocks(blocks))
}

#[cfg(test)]
mod test_cbc {
    use super::*;
    use crate::engine::core::expand_key;
    use crate::engine::key::Key;
    use crate::engine::modes::util::test_util::{IV, KEY_256, PLAINTEXT, hex_to_bytes};

    // F.2.5 CBC-AES256.Encrypt
    const EXPECTED: &str = "
        f58c4c04d6e5f1ba779eabfb5f7bfbd6\
        9cfc4e967edb808d679f777bc6702c7d\
        39f23369a9d9bacfa530e26304231461\
        b2eb05e2c39be9fcda6c19078c6a9d1b";

    #[test]
    fn aes_cbc_256_encrypt() -> Result<()> {
        let round_keys = expand_key(&Key::try_from_slice(&KEY_256)?);
        let encrypted = cbc_encrypt(&PLAINTEXT, &round_keys, &IV)?;

        assert_eq!(hex_to_bytes(EXPECTED), encrypted.output);
        Ok(())
    }

    #[test]
    fn aes_cbc_256_decrypt() -> Result<()> {
        let round_keys = expand_key(&Key::try_from_slice(&KEY_256)?);
        let decrypted = cbc_decrypt(&hex_to_bytes(EXPECTED), &round_keys, &IV)?;

        assert_eq!(PLAINTEXT.to_vec(), decrypted.output);
        Ok(())
    }

    #[test]
    fn chaining_values_are_recorded() -> Result<()> {
        let round_keys = expand_key(&Key::try_from_slice(&KEY_256)?);
        let encrypted = cbc_encrypt(&PLAINTEXT, &round_keys, &IV)?;

        let first = &encrypted.blocks[0];
        assert_eq!(first.feed, Feed::ChainBefore { chain: IV, source: Source::Iv });
        assert_eq!(first.cipher_input, xor_blocks(&to_block(&PLAINTEXT[..16]), &IV));

        let second = &encrypted.blocks[1];
        assert_eq!(
            second.feed,
            Feed::ChainBefore { chain: first.cipher_output, source: Source::PreviousCiphertext }
        );
        Ok(())
    }

    #[test]
    fn repeated_blocks_differ() -> Result<()> {
        let round_keys = expand_key(&Key::try_from_slice(&KEY_256)?);
        let input = [0x41u8; 32];
        let out = cbc_encrypt(&input, &round_keys, &IV)?.output;
        assert_ne!(out[..16], out[16..]);
        Ok(())
    }
}
