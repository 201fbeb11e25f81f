use crate::engine::config::PaddingPolicy;
use crate::engine::core::BLOCK_SIZE;
use crate::engine::error::*;

/// What [unpad] found at the end of the decrypted bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Unpadding {
    /// `n` bytes of valid PKCS#7 padding were removed.
    Stripped(usize),
    /// Last byte is 0 or above 16: the plaintext was block aligned and nothing was appended.
    Aligned(u8),
    /// Last byte is in `1..=16` but the trailing bytes disagree. Only reached under
    /// [PaddingPolicy::Lenient]; the bytes are returned unstripped.
    Inconsistent(u8),
}

/// PKCS#7 padding for ECB and CBC. Input that is already a multiple of 16 bytes is returned
/// unchanged; otherwise `16 - len % 16` bytes of that value are appended.
pub(crate) fn pad(plaintext: &[u8]) -> (Vec<u8>, usize) {
    let rem = plaintext.len() % BLOCK_SIZE;
    let pad_len = if rem == 0 { 0 } else { BLOCK_SIZE - rem };

    let mut out = Vec::with_capacity(plaintext.len() + pad_len);
    out.extend_from_slice(plaintext);
    out.resize(plaintext.len() + pad_len, pad_len as u8);
    (out, pad_len)
}

/// Removes PKCS#7 padding in place according to `policy`.
pub(crate) fn unpad(input: &mut Vec<u8>, policy: PaddingPolicy) -> Result<Unpadding> {
    let Some(&last) = input.last() else {
        return Err(Error::InvalidCiphertext {
            len: 0,
            context: "attempted to unpad empty input",
        });
    };

    let pad = last as usize;
    if pad == 0 || pad > BLOCK_SIZE {
        return Ok(Unpadding::Aligned(last));
    }

    let consistent = pad <= input.len() && input[input.len() - pad..].iter().all(|&b| b == last);
    match (consistent, policy) {
        (true, _) => {
            input.truncate(input.len() - pad);
            Ok(Unpadding::Stripped(pad))
        }
        (false, PaddingPolicy::Lenient) => Ok(Unpadding::Inconsistent(last)),
        (false, PaddingPolicy::Strict) => Err(Error::InvalidPadding { value: last }),
    }
}
