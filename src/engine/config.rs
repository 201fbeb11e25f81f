use tracing::debug;

use crate::engine::error::Result;
use crate::engine::key::{Iv, Key};
use crate::engine::mode::Mode;

/// How decryption treats trailing bytes that are not valid PKCS#7 padding in ECB/CBC.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PaddingPolicy {
    /// Inconsistent padding is left in place and the bytes are returned unstripped.
    #[default]
    Lenient,
    /// A last byte `p` in `1..=16` whose trailing `p` bytes are not all `p` is an error.
    /// A last byte of 0 or above 16 still means "aligned plaintext, nothing was appended".
    Strict,
}

/// Immutable configuration of a [Cipher](crate::Cipher): key, mode, IV/nonce and padding policy.
///
/// The IV is always present. For modes that need one it is either the caller's 16 bytes or
/// generated from the OS RNG; for ECB it is all zeroes unless given, and never used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CipherConfig {
    key: Key,
    mode: Mode,
    iv: Iv,
    iv_generated: bool,
    padding: PaddingPolicy,
}

impl CipherConfig {
    pub fn new(key: Key, mode: Mode, iv: Option<Iv>) -> Result<Self> {
        let (iv, iv_generated) = match iv {
            Some(iv) => (iv, false),
            // ECB never reads the IV
            None if !mode.needs_iv() => (Iv::zeroed(), false),
            None => {
                debug!(%mode, "no {} supplied, generating one", mode.iv_label());
                (Iv::random()?, true)
            }
        };
        debug!(%mode, iv_generated, "cipher configured");
        Ok(Self {
            key,
            mode,
            iv,
            iv_generated,
            padding: PaddingPolicy::default(),
        })
    }

    /// Builds a configuration from raw key bytes, a mode name and optional IV bytes.
    ///
    /// Fails if the key is not 32 bytes, the mode is unknown, or (for modes other than ECB)
    /// the IV is not 16 bytes. An IV passed for ECB is ignored.
    pub fn from_bytes(key: &[u8], mode: &str, iv: Option<&[u8]>) -> Result<Self> {
        let key = Key::try_from_slice(key)?;
        let mode: Mode = mode.parse()?;
        let iv = match iv {
            Some(bytes) if mode.needs_iv() => Some(Iv::try_from_slice(mode, bytes)?),
            _ => None,
        };
        Self::new(key, mode, iv)
    }

    pub fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn iv(&self) -> &Iv {
        &self.iv
    }

    /// True if the IV came from the OS RNG rather than the caller.
    pub fn iv_generated(&self) -> bool {
        self.iv_generated
    }

    pub fn padding(&self) -> PaddingPolicy {
        self.padding
    }
}
