use crate::engine::core::{Block, RoundKeys, encrypt_block_traced};
use crate::engine::modes::record::{BlockRecord, Feed, Source, Transformed};
use crate::engine::modes::util::{counter_block, map_blocks, xor_chunk};

/// Core CTR function. Unit `i` is XOR'd with the encryption of `nonce + i` (big-endian 128-bit,
/// wrapping), so every unit is independent. Encryption and decryption are the same operation.
pub fn ctr_core(input: &[u8], round_keys: &RoundKeys, nonce: &Block) -> Transformed {
    let blocks = map_blocks(input, |index, chunk| {
        let offset = index as u128;
        let counter = counter_block(nonce, offset);
        let (keystream, rounds) = encrypt_block_traced(&counter, round_keys);
        BlockRecord {
            index,
            input: chunk.to_vec(),
            feed: Feed::Keystream {
                register: counter,
                source: Source::Counter { offset },
            },
            cipher_input: counter,
            rounds,
            cipher_output: keystream,
            output: xor_chunk(&keystream, chunk),
        }
    });

    Transformed::from_blocks(blocks)
}

#[cfg(test)]
mod test_ctr {
    use super::*;
    use crate::engine::core::expand_key;
    use crate::engine::error::Result;
    use crate::engine::key::Key;
    use crate::engine::modes::util::test_util::{CTR_NONCE, KEY_256, PLAINTEXT, hex_to_bytes};

    // F.5.5 CTR-AES256.Encrypt
    const EXPECTED: &str = "
        601ec313775789a5b7a7f504bbf3d228\
        f443e3ca4d62b59aca84e990cacaf5c5\
        2b0930daa23de94ce87017ba2d84988d\
        dfc9c58db67aada613c2dd08457941a6";

    #[test]
    fn aes_ctr_256_encrypt() -> Result<()> {
        let round_keys = expand_key(&Key::try_from_slice(&KEY_256)?);
        let encrypted = ctr_core(&PLAINTEXT, &round_keys, &CTR_NONCE);

        assert_eq!(hex_to_bytes(EXPECTED), encrypted.output);
        Ok(())
    }

    #[test]
    fn aes_ctr_256_decrypt() -> Result<()> {
        let round_keys = expand_key(&Key::try_from_slice(&KEY_256)?);
        let decrypted = ctr_core(&hex_to_bytes(EXPECTED), &round_keys, &CTR_NONCE);

        assert_eq!(PLAINTEXT.to_vec(), decrypted.output);
        Ok(())
    }

    #[test]
    fn partial_final_unit() -> Result<()> {
        let round_keys = expand_key(&Key::try_from_slice(&KEY_256)?);
        let encrypted = ctr_core(&PLAINTEXT[..20], &round_keys, &CTR_NONCE);

        assert_eq!(encrypted.output, hex_to_bytes("601ec313775789a5b7a7f504bbf3d228f443e3ca"));
        Ok(())
    }

    #[test]
    fn counter_wraps_around() -> Result<()> {
        let round_keys = expand_key(&Key::try_from_slice(&KEY_256)?);
        let nonce = [0xffu8; 16];
        let out = ctr_core(&[0u8; 32], &round_keys, &nonce);

        assert_eq!(out.blocks[1].cipher_input, [0u8; 16]);
        assert_eq!(
            out.output,
            hex_to_bytes("3b3c2921c85a24de9ac606ce6d1d60cce568f68194cf76d6174d4cc04310a854")
        );
        Ok(())
    }
}
