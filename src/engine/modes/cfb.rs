use crate::engine::core::{Block, RoundKeys, encrypt_block_traced};
use crate::engine::modes::record::{BlockRecord, Feed, Source, Transformed};
use crate::engine::modes::util::{map_blocks, to_block, xor_chunk};

/// Core CFB encryption with 128-bit feedback. The register starts as the IV and is replaced by
/// each ciphertext block, so units are processed in order. Output length equals input length.
pub fn cfb_encrypt(plaintext: &[u8], round_keys: &RoundKeys, iv: &Block) -> Transformed {
    let mut register = *iv;
    let mut blocks = Vec::with_capacity(plaintext.len().div_ceil(16));

    for (index, pt) in plaintext.chunks(16).enumerate() {
        let source = if index == 0 { Source::Iv } else { Source::PreviousCiphertext };
        let (keystream, rounds) = encrypt_block_traced(&register, round_keys);
        let ct = xor_chunk(&keystream, pt);
        blocks.push(BlockRecord {
            index,
            input: pt.to_vec(),
            feed: Feed::Keystream { register, source },
            cipher_input: register,
            rounds,
            cipher_output: keystream,
            output: ct.clone(),
        });
        // a short final chunk ends the stream, its register is never used
        register = to_block(&ct);
    }

    Transformed::from_blocks(blocks)
}

/// Core CFB decryption. Each register is a ciphertext block that is already known, so units
/// are independent. AES still runs forwards.
pub fn cfb_decrypt(ciphertext: &[u8], round_keys: &RoundKeys, iv: &Block) -> Transformed {
    let blocks = map_blocks(ciphertext, |index, ct| {
        let (register, source) = match index {
            0 => (*iv, Source::Iv),
            _ => (
                to_block(&ciphertext[(index - 1) * 16..index * 16]),
                Source::PreviousCiphertext,
            ),
        };
        let (keystream, rounds) = encrypt_block_traced(&register, round_keys);
        BlockRecord {
            index,
            input: ct.to_vec(),
            feed: Feed::Keystream { register, source },
            cipher_input: register,
            rounds,
            cipher_output: keystream,
            output: xor_chunk(&keystream, ct),
        }
    });

    Transformed::from_blocks(blocks)
}

#[cfg(test)]
mod test_cfb {
    use super::*;
    use crate::engine::core::expand_key;
    use crate::engine::error::Result;
    use crate::engine::key::Key;
    use crate::engine::modes::util::test_util::{IV, KEY_256, PLAINTEXT, hex_to_bytes};

    // F.3.17 CFB128-AES256.Encrypt
    const EXPECTED: &str = "
        dc7e84bfda79164b7ecd8486985d3860\
        39ffed143b28b1c832113c6331e5407b\
        df10132415e54b92a13ed0a8267ae2f9\
        75a385741ab9cef82031623d55b1e471";

    #[test]
    fn aes_cfb_256_encrypt() -> Result<()> {
        let round_keys = expand_key(&Key::try_from_slice(&KEY_256)?);
        let encrypted = cfb_encrypt(&PLAINTEXT, &round_keys, &IV);

        assert_eq!(hex_to_bytes(EXPECTED), encrypted.output);
        Ok(())
    }

    #[test]
    fn aes_cfb_256_decrypt() -> Result<()> {
        let round_keys = expand_key(&Key::try_from_slice(&KEY_256)?);
        let decrypted = cfb_decrypt(&hex_to_bytes(EXPECTED), &round_keys, &IV);

        assert_eq!(PLAINTEXT.to_vec(), decrypted.output);
        Ok(())
    }

    #[test]
    fn partial_final_unit() -> Result<()> {
        let round_keys = expand_key(&Key::try_from_slice(&KEY_256)?);
        let encrypted = cfb_encrypt(&PLAINTEXT[..20], &round_keys, &IV);

        assert_eq!(encrypted.output, hex_to_bytes("dc7e84bfda79164b7ecd8486985d386039ffed14"));
        assert_eq!(encrypted.blocks.len(), 2);
        assert_eq!(encrypted.blocks[1].output.len(), 4);

        let decrypted = cfb_decrypt(&encrypted.output, &round_keys, &IV);
        assert_eq!(decrypted.output, PLAINTEXT[..20].to_vec());
        Ok(())
    }
}
