use super::constants::{RCON, SBOX};
use super::util::xor_words;
use super::{NK, ROUNDS, RoundKeys};
use crate::engine::key::Key;

/// AES-256 key schedule. Returns the 15 round keys; the first is the initial round key,
/// which is simply the first half of the original key.
pub fn expand_key(key: &Key) -> RoundKeys {
    let key = key.as_bytes();

    // Variable names match FIPS-197, NIST specification: https://doi.org/10.6028/NIST.FIPS.197-upd1
    // Nk   The number of 32-bit words comprising the key (8)
    // Nr   The number of rounds (14)
    // w    The result of the key schedule, an array of words that form round keys
    // Nw   The total number of words generated by the key schedule (including initial key)
    const NW: usize = (ROUNDS + 1) * 4;

    let mut w = [[0u8; 4]; NW];

    // first nk words of w are filled with the initial key
    for (i, byte) in key.iter().enumerate() {
        w[i / 4][i % 4] = *byte;
    }

    let mut temp = w[NK - 1];
    for i in NK..NW {
        if i % NK == 0 {
            // rot_word, sub_word, and rcon on temp
            temp = [
                SBOX[temp[1] as usize] ^ RCON[i / NK],
                SBOX[temp[2] as usize],
                SBOX[temp[3] as usize],
                SBOX[temp[0] as usize],
            ];
        } else if i % NK == 4 {
            // extra sub_word halfway through each 8-word group, AES-256 only
            temp = [
                SBOX[temp[0] as usize],
                SBOX[temp[1] as usize],
                SBOX[temp[2] as usize],
                SBOX[temp[3] as usize],
            ];
        }

        // w[i] = temp ⊕ w[i − Nk]
        w[i] = xor_words(&temp, &w[i - NK]);
        temp = w[i];
    }

    // words are columns of the round key blocks
    let mut round_keys = [[0u8; 16]; ROUNDS + 1];
    for (round, round_key) in round_keys.iter_mut().enumerate() {
        for col in 0..4 {
            round_key[col * 4..col * 4 + 4].copy_from_slice(&w[round * 4 + col]);
        }
    }

    round_keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::Result;
    use hex_literal::hex;

    #[test]
    fn key_schedule_256() -> Result<()> {
        // run key schedule on 256 bit sample key from FIPS-197 Appendix A.3
        let key = Key::try_from_slice(&hex!(
            "603deb1015ca71be2b73aef0857d7781 1f352c073b6108d72d9810a30914dff4"
        ))?;
        let round_keys = expand_key(&key);

        assert_eq!(round_keys.len(), 15);
        // first two round keys are the key itself
        assert_eq!(round_keys[0], hex!("603deb1015ca71be2b73aef0857d7781"));
        assert_eq!(round_keys[1], hex!("1f352c073b6108d72d9810a30914dff4"));
        // w[8..12] and the last round key from the sample schedule in A.3
        assert_eq!(round_keys[2], hex!("9ba354118e6925afa51a8b5f2067fcde"));
        assert_eq!(round_keys[14], hex!("fe4890d1e6188d0b046df344706c631e"));
        Ok(())
    }

    #[test]
    fn key_schedule_sequential_key() -> Result<()> {
        // FIPS-197 Appendix C.3 key
        let key = Key::try_from_slice(&hex!(
            "000102030405060708090a0b0c0d0e0f 101112131415161718191a1b1c1d1e1f"
        ))?;
        let round_keys = expand_key(&key);
        assert_eq!(round_keys[14], hex!("24fc79ccbf0979e9371ac23c6d68de36"));
        Ok(())
    }
}
