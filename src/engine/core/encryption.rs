use super::constants::SBOX;
use super::round::{RoundOp, RoundRecorder, RoundTrace};
use super::util::{add_round_key, dbl};
use super::{Block, ROUNDS, RoundKeys};

/// Core AES encryption function. Encrypts 16 byte block using provided round keys.
#[inline]
pub fn encrypt_block(plaintext: &Block, round_keys: &RoundKeys) -> Block {
    encrypt_block_with(plaintext, round_keys, |_, _, _| {})
}

/// Encrypts one block and returns the state after every primitive, grouped by round.
pub fn encrypt_block_traced(plaintext: &Block, round_keys: &RoundKeys) -> (Block, Vec<RoundTrace>) {
    let mut recorder = RoundRecorder::new(*plaintext);
    let out = encrypt_block_with(plaintext, round_keys, |stage, op, state| {
        recorder.record(stage, op, state)
    });
    (out, recorder.into_rounds())
}

/// Forward cipher. `observe` is called after each primitive with the round number, the
/// primitive, and the resulting state.
#[inline(always)]
pub(crate) fn encrypt_block_with<F>(plaintext: &Block, round_keys: &RoundKeys, mut observe: F) -> Block
where
    F: FnMut(usize, RoundOp, &Block),
{
    let mut state = *plaintext;

    // add first round key to state
    add_round_key(&mut state, &round_keys[0]);
    observe(0, RoundOp::AddRoundKey(0), &state);

    // perform all rounds except for the last
    for round in 1..ROUNDS {
        sub_bytes(&mut state);
        observe(round, RoundOp::SubBytes, &state);
        shift_rows(&mut state);
        observe(round, RoundOp::ShiftRows, &state);
        mix_columns(&mut state);
        observe(round, RoundOp::MixColumns, &state);
        add_round_key(&mut state, &round_keys[round]);
        observe(round, RoundOp::AddRoundKey(round), &state);
    }

    // last round skips mixcolumns step
    sub_bytes(&mut state);
    observe(ROUNDS, RoundOp::SubBytes, &state);
    shift_rows(&mut state);
    observe(ROUNDS, RoundOp::ShiftRows, &state);
    add_round_key(&mut state, &round_keys[ROUNDS]);
    observe(ROUNDS, RoundOp::AddRoundKey(ROUNDS), &state);

    state
}

/// SubBytes step. Each byte is substituted using the SBOX.
#[inline(always)]
pub(crate) fn sub_bytes(state: &mut Block) {
    for byte in state {
        *byte = SBOX[*byte as usize];
    }
}

/// ShiftRows step.
/// The 0th row does not change.
/// The first row shifts left by one position.
/// The second row shifts left by two positions.
/// The third row shifts left by three positions.
#[inline(always)]
pub(crate) fn shift_rows(state: &mut Block) {
    // state is stored as columns: for row,col of updated state, old value is at
    // ((col + row) & 3) * 4 + row
    let s = *state;
    for row in 0..4 {
        for col in 0..4 {
            state[col * 4 + row] = s[((col + row) & 3) * 4 + row];
        }
    }
}

/// MixColumns step. Each column is multiplied by a constant matrix using Galois field multiplication.
/// [ d0 ]      [ 2  3  1  1 ]  [ b0 ]
/// | d1 |  =   | 1  2  3  1 |  | b1 |
/// | d2 |      | 1  1  2  3 |  | b2 |
/// [ d3 ]      [ 3  1  1  2 ]  [ b3 ]
#[inline(always)]
pub(crate) fn mix_columns(state: &mut Block) {
    // optimisation technique from https://crypto.stackexchange.com/a/71206
    for col in 0..4 {
        let i = col * 4;
        let (a, b, c, d) = (state[i], state[i + 1], state[i + 2], state[i + 3]);
        state[i] = dbl(a ^ b) ^ b ^ c ^ d; /* 2a + 3b + 1c + 1d */
        state[i + 1] = dbl(b ^ c) ^ c ^ d ^ a; /* 1a + 2b + 3c + 1d */
        state[i + 2] = dbl(c ^ d) ^ d ^ a ^ b; /* 1a + 1b + 2c + 3d */
        state[i + 3] = dbl(d ^ a) ^ a ^ b ^ c; /* 3a + 1b + 1c + 2d */
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::expand_key;
    use crate::engine::error::Result;
    use crate::engine::key::Key;
    use hex_literal::hex;

    #[test]
    fn test_mix_columns() {
        // test cases from https://en.wikipedia.org/wiki/Rijndael_MixColumns
        // expressed as 4 columns of 4 bytes; we store column-major in [u8; 16].
        let mut test1 = hex!("6347a2f0 f20a225c 01010101 c6c6c6c6");
        let mut test2 = hex!("01010101 c6c6c6c6 d4d4d4d5 2d26314c");

        mix_columns(&mut test1);
        mix_columns(&mut test2);

        assert_eq!(
            test1,
            hex!("5de070bb 9fdc589d 01010101 c6c6c6c6"),
            "mix columns test case 1 does not match"
        );
        assert_eq!(
            test2,
            hex!("01010101 c6c6c6c6 d5d5d7d6 4d7ebdf8"),
            "mix columns test case 2 does not match"
        );
    }

    #[test]
    fn test_shift_rows() {
        let mut state = hex!("00010203 04050607 08090a0b 0c0d0e0f");
        shift_rows(&mut state);
        assert_eq!(state, hex!("00050a0f 04090e03 080d0207 0c01060b"));
    }

    #[test]
    fn test_sub_bytes() {
        let mut state = hex!("00010203 04050607 08090a0b 0c0d0e0f");
        sub_bytes(&mut state);
        assert_eq!(state, hex!("637c777b f26b6fc5 3001672b fed7ab76"));
    }

    #[test]
    fn test_encrypt_block_256() -> Result<()> {
        // test case from:
        // https://csrc.nist.gov/CSRC/media/Projects/Cryptographic-Standards-and-Guidelines/documents/examples/AES_Core256.pdf
        let key = Key::try_from_slice(&hex!(
            "603DEB1015CA71BE2B73AEF0857D7781 1F352C073B6108D72D9810A30914DFF4"
        ))?;
        let plaintext = hex!("6BC1BEE22E409F96E93D7E117393172A");
        let expected = hex!("F3EED1BDB5D2A03C064B5A7E3DB181F8");

        let actual = encrypt_block(&plaintext, &expand_key(&key));

        assert_eq!(actual, expected, "incorrect AES-256 encryption of block");
        Ok(())
    }

    #[test]
    fn test_encrypt_block_fips197_c3() -> Result<()> {
        // FIPS-197 Appendix C.3
        let key = Key::try_from_slice(&hex!(
            "000102030405060708090a0b0c0d0e0f 101112131415161718191a1b1c1d1e1f"
        ))?;
        let plaintext = hex!("00112233445566778899aabbccddeeff");

        let actual = encrypt_block(&plaintext, &expand_key(&key));

        assert_eq!(actual, hex!("8ea2b7ca516745bfeafc49904b496089"));
        Ok(())
    }

    #[test]
    fn traced_rounds_match_fips197_c3() -> Result<()> {
        let key = Key::try_from_slice(&hex!(
            "000102030405060708090a0b0c0d0e0f 101112131415161718191a1b1c1d1e1f"
        ))?;
        let round_keys = expand_key(&key);
        let plaintext = hex!("00112233445566778899aabbccddeeff");

        let (out, rounds) = encrypt_block_traced(&plaintext, &round_keys);

        assert_eq!(out, encrypt_block(&plaintext, &round_keys));
        assert_eq!(rounds.len(), 15);

        // round[1].start and round[2].start in appendix C.3
        assert_eq!(rounds[0].output(), hex!("00102030405060708090a0b0c0d0e0f0"));
        assert_eq!(rounds[1].output(), hex!("4f63760643e0aa85efa7213201a4e705"));
        assert_eq!(rounds[13].output(), hex!("627bceb9999d5aaac945ecf423f56da5"));
        assert_eq!(rounds[14].output(), out);

        // initial round is AddRoundKey only, final round has no MixColumns
        assert_eq!(rounds[0].ops.len(), 1);
        assert!(rounds[1..14].iter().all(|r| r.ops.len() == 4 && r.mixes_columns()));
        assert_eq!(rounds[14].ops.len(), 3);
        assert!(!rounds[14].mixes_columns());

        // each round starts where the previous one ended
        for pair in rounds.windows(2) {
            assert_eq!(pair[1].input, pair[0].output());
        }
        Ok(())
    }
}
