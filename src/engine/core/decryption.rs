use super::constants::SBOX_INV;
use super::round::{RoundOp, RoundRecorder, RoundTrace};
use super::util::{add_round_key, dbl};
use super::{Block, ROUNDS, RoundKeys};

/// Core AES decryption function. Decrypts 16 byte block using provided round keys.
#[inline]
pub fn decrypt_block(ciphertext: &Block, round_keys: &RoundKeys) -> Block {
    decrypt_block_with(ciphertext, round_keys, |_, _, _| {})
}

/// Decrypts one block and returns the state after every primitive, grouped by stage.
pub fn decrypt_block_traced(ciphertext: &Block, round_keys: &RoundKeys) -> (Block, Vec<RoundTrace>) {
    let mut recorder = RoundRecorder::new(*ciphertext);
    let out = decrypt_block_with(ciphertext, round_keys, |stage, op, state| {
        recorder.record(stage, op, state)
    });
    (out, recorder.into_rounds())
}

/// Inverse cipher (FIPS-197 section 5.3). Stage 0 removes the last round key, stages 1..=13
/// undo one full round each, and stage 14 undoes the initial round.
#[inline(always)]
pub(crate) fn decrypt_block_with<F>(ciphertext: &Block, round_keys: &RoundKeys, mut observe: F) -> Block
where
    F: FnMut(usize, RoundOp, &Block),
{
    let mut state = *ciphertext;

    add_round_key(&mut state, &round_keys[ROUNDS]);
    observe(0, RoundOp::AddRoundKey(ROUNDS), &state);

    for stage in 1..ROUNDS {
        let key_idx = ROUNDS - stage;
        shift_rows_inv(&mut state);
        observe(stage, RoundOp::InvShiftRows, &state);
        sub_bytes_inv(&mut state);
        observe(stage, RoundOp::InvSubBytes, &state);
        add_round_key(&mut state, &round_keys[key_idx]);
        observe(stage, RoundOp::AddRoundKey(key_idx), &state);
        mix_columns_inv(&mut state);
        observe(stage, RoundOp::InvMixColumns, &state);
    }

    shift_rows_inv(&mut state);
    observe(ROUNDS, RoundOp::InvShiftRows, &state);
    sub_bytes_inv(&mut state);
    observe(ROUNDS, RoundOp::InvSubBytes, &state);
    add_round_key(&mut state, &round_keys[0]);
    observe(ROUNDS, RoundOp::AddRoundKey(0), &state);

    state
}

/// Inverse SubBytes step. Each byte is substituted using the inverse SBOX.
#[inline(always)]
pub(crate) fn sub_bytes_inv(state: &mut Block) {
    for byte in state {
        *byte = SBOX_INV[*byte as usize];
    }
}

/// Inverse ShiftRows step.
/// The 0th row does not change.
/// The first row shifts right by one position.
/// The second row shifts right by two positions.
/// The third row shifts right by three positions.
/// [
///     01 02 03 04   ---->   01 02 03 04
///     06 07 08 05   ---->   05 06 07 08
///     11 12 09 10   ---->   09 10 11 12
///     16 13 14 15   ---->   13 14 15 16
/// ]
#[inline(always)]
pub(crate) fn shift_rows_inv(state: &mut Block) {
    // for row,col of updated state, old value is at ((col + 4 - row) & 3) * 4 + row
    let s = *state;
    for row in 0..4 {
        for col in 0..4 {
            state[col * 4 + row] = s[((col + 4 - row) & 3) * 4 + row];
        }
    }
}

/// Inverse MixColumns step. Each column is multiplied by a constant matrix using Galois field multiplication.
/// [ b0 ]      [ 14  11  13  09 ]  [ d0 ]
/// | b1 |  =   | 09  14  11  13 |  | d1 |
/// | b2 |      | 13  09  14  11 |  | d2 |
/// [ b3 ]      [ 11  13  09  14 ]  [ d3 ]
#[inline(always)]
pub(crate) fn mix_columns_inv(state: &mut Block) {
    // optimisation technique from https://crypto.stackexchange.com/a/71206
    for col in 0..4 {
        let i = col * 4;
        let (a, b, c, d) = (state[i], state[i + 1], state[i + 2], state[i + 3]);
        let x = dbl(a ^ b ^ c ^ d); /* 2a + 2b + 2c + 2d */
        let y = dbl(x ^ a ^ c); /* 6a + 4b + 6c + 4d */
        let z = dbl(x ^ b ^ d); /* 4a + 6b + 4c + 6d */
        state[i] = dbl(y ^ a ^ b) ^ b ^ c ^ d; /* 14a + 11b + 13c + 09d */
        state[i + 1] = dbl(z ^ b ^ c) ^ c ^ d ^ a; /* 09a + 14b + 11c + 13d */
        state[i + 2] = dbl(y ^ c ^ d) ^ d ^ a ^ b; /* 13a + 09b + 14c + 11d */
        state[i + 3] = dbl(z ^ d ^ a) ^ a ^ b ^ c; /* 11a + 13b + 09c + 14d */
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::encryption::{encrypt_block, mix_columns, shift_rows, sub_bytes};
    use crate::engine::core::expand_key;
    use crate::engine::error::Result;
    use crate::engine::key::Key;
    use hex_literal::hex;

    const STATE: Block = hex!("00010203 04050607 08090a0b 0c0d0e0f");

    #[test]
    fn test_shift_rows() {
        let mut actual = STATE;
        shift_rows(&mut actual);
        shift_rows_inv(&mut actual);
        assert_eq!(actual, STATE, "shift rows inverse does not exactly reverse shift rows");
    }

    #[test]
    fn test_sub_bytes() {
        let mut actual = STATE;
        sub_bytes(&mut actual);
        sub_bytes_inv(&mut actual);
        assert_eq!(actual, STATE, "sub bytes inverse does not exactly reverse sub bytes");
    }

    #[test]
    fn test_mix_columns() {
        let mut actual = STATE;
        mix_columns(&mut actual);
        mix_columns_inv(&mut actual);
        assert_eq!(actual, STATE, "mix columns inverse does not exactly reverse mix columns");
    }

    #[test]
    fn test_decrypt_block_fips197_c3() -> Result<()> {
        let key = Key::try_from_slice(&hex!(
            "000102030405060708090a0b0c0d0e0f 101112131415161718191a1b1c1d1e1f"
        ))?;
        let ciphertext = hex!("8ea2b7ca516745bfeafc49904b496089");

        let actual = decrypt_block(&ciphertext, &expand_key(&key));

        assert_eq!(actual, hex!("00112233445566778899aabbccddeeff"));
        Ok(())
    }

    #[test]
    fn test_decrypt_block() -> Result<()> {
        let key = Key::try_from_slice(&hex!(
            "603DEB1015CA71BE2B73AEF0857D7781 1F352C073B6108D72D9810A30914DFF4"
        ))?;
        let plaintext = hex!("6BC1BEE22E409F96E93D7E117393172A");

        let round_keys = expand_key(&key);
        let encrypted = encrypt_block(&plaintext, &round_keys);
        let decrypted = decrypt_block(&encrypted, &round_keys);

        assert_eq!(decrypted, plaintext, "decrypt block does not exactly reverse encrypt block");
        Ok(())
    }

    #[test]
    fn traced_inverse_rounds() -> Result<()> {
        let key = Key::try_from_slice(&hex!(
            "000102030405060708090a0b0c0d0e0f 101112131415161718191a1b1c1d1e1f"
        ))?;
        let round_keys = expand_key(&key);
        let ciphertext = hex!("8ea2b7ca516745bfeafc49904b496089");

        let (out, rounds) = decrypt_block_traced(&ciphertext, &round_keys);

        assert_eq!(out, hex!("00112233445566778899aabbccddeeff"));
        assert_eq!(rounds.len(), 15);
        assert_eq!(rounds[0].ops, vec![(RoundOp::AddRoundKey(14), rounds[0].output())]);
        // stage 1 uses round key 13 and ends with InvMixColumns
        assert!(rounds[1].applies(RoundOp::AddRoundKey(13)));
        assert_eq!(rounds[1].ops.last().map(|(op, _)| *op), Some(RoundOp::InvMixColumns));
        // the last stage undoes the initial round: no InvMixColumns, RoundKey[0]
        assert!(!rounds[14].mixes_columns());
        assert!(rounds[14].applies(RoundOp::AddRoundKey(0)));
        Ok(())
    }
}
