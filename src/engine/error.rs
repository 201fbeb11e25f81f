use std::string::FromUtf8Error;

use rand::rand_core;
use thiserror::Error;

use super::mode::Mode;

/// AES-steps Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [Error], as reported to callers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad key, IV or mode at construction. The operation never starts.
    Config,
    /// Malformed input to a single call. The cipher stays usable.
    Validation,
    /// Decrypted bytes are not UTF-8 text.
    Decode,
}

/// AES-steps Error type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Attempted to instantiate an AES-256 key from anything other than 32 bytes.
    #[error("invalid key length: {len} bytes (expected 32 for AES-256)")]
    InvalidKeyLength { len: usize },

    /// Mode name is not one of ECB, CBC, CFB, OFB, CTR.
    #[error("unsupported mode: {0:?} (expected one of ECB, CBC, CFB, OFB, CTR)")]
    UnsupportedMode(String),

    /// Supplied IV/nonce is not 16 bytes for a mode that uses one.
    #[error("invalid {} length for {mode}: {len} bytes (expected 16)", mode.iv_label())]
    InvalidIvLength { mode: Mode, len: usize },

    /// OS RNG failed during IV or key generation.
    #[error("OS RNG failed while generating random bytes")]
    Rng(#[from] rand_core::OsError),

    /// Plaintext is shorter than the 16-byte minimum.
    #[error("input must be at least 16 bytes, got {len} bytes")]
    InputTooShort { len: usize },

    #[error("invalid Base64 input: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("empty ciphertext data")]
    EmptyCiphertext,

    /// Provided ciphertext that did not match the expected framing of the mode of operation.
    #[error("invalid ciphertext length: {len} bytes ({context})")]
    InvalidCiphertext { len: usize, context: &'static str },

    /// Trailing bytes look like PKCS#7 padding but are inconsistent. Only raised under
    /// [PaddingPolicy::Strict](crate::PaddingPolicy::Strict).
    #[error("invalid PKCS#7 padding (last byte {value:#04x})")]
    InvalidPadding { value: u8 },

    /// Wrong key, corrupted ciphertext, or data that never was text. Without an
    /// authentication tag these cannot be told apart.
    #[error("decryption failed: result is not valid UTF-8 (wrong key or corrupted ciphertext?)")]
    Decode(#[from] FromUtf8Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidKeyLength { .. }
            | Error::UnsupportedMode(_)
            | Error::InvalidIvLength { .. }
            | Error::Rng(_) => ErrorKind::Config,
            Error::InputTooShort { .. }
            | Error::InvalidBase64(_)
            | Error::EmptyCiphertext
            | Error::InvalidCiphertext { .. }
            | Error::InvalidPadding { .. } => ErrorKind::Validation,
            Error::Decode(_) => ErrorKind::Decode,
        }
    }
}
