//! Defines [`Key`], a 256-bit AES key, and [`Iv`], the 16-byte IV/nonce used by every mode
//! except ECB. Both can be randomly generated or built from an existing byte slice.

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::engine::error::{Error, Result};
use crate::engine::mode::Mode;

/// Byte length of an AES-256 key.
pub const KEY_LEN: usize = 32;

/// Byte length of an IV or CTR nonce.
pub const IV_LEN: usize = 16;

/// Contains a valid AES-256 key. Can be instantiated with a random key, or built from a slice
/// of exactly 32 bytes.
///
/// ## Examples
/// ```
/// # fn main() -> aes_steps::Result<()> {
/// use aes_steps::Key;
///
/// let random = Key::rand_key_256()?;
/// assert_eq!(random.as_bytes().len(), 32);
///
/// let key = Key::try_from_slice(b"MySecretKey123456789012345678901")?;
/// assert_eq!(key.as_bytes(), b"MySecretKey123456789012345678901");
///
/// // anything other than 32 bytes is rejected
/// assert!(Key::try_from_slice(b"too short").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Key {
    bytes: [u8; KEY_LEN],
}

impl Key {
    /// Generate a random 256-bit key. Returns Error if OsRng fails.
    pub fn rand_key_256() -> Result<Self> {
        let mut k = [0u8; KEY_LEN];
        OsRng.try_fill_bytes(&mut k)?;
        Ok(Self { bytes: k })
    }

    /// Attempts to build a key from a slice of bytes. Will return an InvalidKeyLength error
    /// if the input slice is anything other than 32 bytes long.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| Error::InvalidKeyLength { len: bytes.len() })?;
        Ok(Self { bytes })
    }

    /// Returns a reference to the internal key as an array of bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// 16-byte initialisation vector. For CTR it is the initial counter block (the nonce).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Iv {
    bytes: [u8; IV_LEN],
}

impl Iv {
    /// Generate a random IV from the OS RNG.
    pub fn random() -> Result<Self> {
        let mut iv = [0u8; IV_LEN];
        OsRng.try_fill_bytes(&mut iv)?;
        Ok(Self { bytes: iv })
    }

    /// Placeholder for modes that never read the IV.
    pub(crate) fn zeroed() -> Self {
        Self { bytes: [0; IV_LEN] }
    }

    /// Builds an IV for `mode` from a slice, which must be exactly 16 bytes long.
    pub fn try_from_slice(mode: Mode, bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; IV_LEN] = bytes.try_into().map_err(|_| Error::InvalidIvLength {
            mode,
            len: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.bytes
    }
}

impl From<[u8; IV_LEN]> for Iv {
    fn from(bytes: [u8; IV_LEN]) -> Self {
        Self { bytes }
    }
}

impl From<[u8; KEY_LEN]> for Key {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ErrorKind;

    #[test]
    fn rejects_31_byte_key() {
        let err = Key::try_from_slice(&[0u8; 31]).unwrap_err();
        assert!(matches!(err, Error::InvalidKeyLength { len: 31 }));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn rejects_wrong_iv_length() {
        let err = Iv::try_from_slice(Mode::Ctr, &[0u8; 12]).unwrap_err();
        assert!(matches!(err, Error::InvalidIvLength { mode: Mode::Ctr, len: 12 }));
        assert!(err.to_string().starts_with("invalid Nonce length for CTR"));
    }

    #[test]
    fn random_ivs_differ() -> Result<()> {
        // 2^-128 chance of a false failure
        assert_ne!(Iv::random()?, Iv::random()?);
        Ok(())
    }
}
