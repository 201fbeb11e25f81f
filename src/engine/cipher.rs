use std::mem;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, instrument, warn};

use crate::engine::config::CipherConfig;
use crate::engine::core::{BLOCK_SIZE, RoundKeys, expand_key};
use crate::engine::error::{Error, Result};
use crate::engine::key::{IV_LEN, Iv, Key};
use crate::engine::mode::Mode;
use crate::engine::modes::*;
use crate::engine::narrate;
use crate::engine::util::{Unpadding, pad, unpad};
use crate::trace::{Operation, Trace};

/// Smallest accepted plaintext, in UTF-8 bytes.
pub const MIN_INPUT_LEN: usize = 16;

/// Result of a traced operation together with the steps that led to it. The trace is returned
/// even when the operation failed, ending in an `Error` step.
#[derive(Debug)]
pub struct Traced<T> {
    pub operation: Operation,
    pub result: Result<T>,
    pub trace: Trace,
}

impl<T> Traced<T> {
    pub fn into_parts(self) -> (Result<T>, Trace) {
        (self.result, self.trace)
    }
}

/// AES-256 text cipher over one of five modes ([ECB](Mode::Ecb), [CBC](Mode::Cbc),
/// [CFB](Mode::Cfb), [OFB](Mode::Ofb), [CTR](Mode::Ctr)) that narrates every step it takes.
///
/// Instantiated with a [CipherConfig]; the key is expanded into round keys once and stored in
/// the instance. Encryption takes UTF-8 text and returns Base64 of `IV || ciphertext` (just the
/// ciphertext for ECB). Decryption reverses it.
///
/// [encrypt](Cipher::encrypt) and [decrypt](Cipher::decrypt) keep the trace of the most recent
/// call in the instance, readable through [steps](Cipher::steps). The `_traced` variants take
/// `&self` and hand the trace back with the result instead, so a single instance can serve
/// concurrent callers.
///
/// ## Examples
/// ```
/// # fn main() -> aes_steps::Result<()> {
/// use aes_steps::{Cipher, CipherConfig};
///
/// let config = CipherConfig::from_bytes(b"MySecretKey123456789012345678901", "ecb", None)?;
/// let mut cipher = Cipher::new(config);
///
/// let encrypted = cipher.encrypt("Hello World!!!!!")?;
/// assert_eq!(encrypted, "a/81PRbCptq94NGt4gWv9Q==");
/// assert_eq!(cipher.steps().steps()[0].title, "1. Input Preparation");
///
/// assert_eq!(cipher.decrypt(&encrypted)?, "Hello World!!!!!");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Cipher {
    config: CipherConfig,
    round_keys: RoundKeys,
    trace: Trace,
}

impl Cipher {
    /// Expands the configured key and returns a ready instance with an empty trace.
    pub fn new(config: CipherConfig) -> Self {
        let round_keys = expand_key(config.key());
        debug!(mode = %config.mode(), "round keys expanded");
        Self {
            config,
            round_keys,
            trace: Trace::new(),
        }
    }

    /// Builds an instance from raw key bytes, a mode name (case-insensitive) and optional IV
    /// bytes. A random IV is generated when none is given.
    pub fn from_parts(key: &[u8], mode: &str, iv: Option<&[u8]>) -> Result<Self> {
        Ok(Self::new(CipherConfig::from_bytes(key, mode, iv)?))
    }

    /// Shorthand for a cipher with a caller-chosen IV (ignored for ECB).
    pub fn with_iv(key: Key, mode: Mode, iv: Iv) -> Result<Self> {
        Ok(Self::new(CipherConfig::new(key, mode, Some(iv))?))
    }

    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode()
    }

    /// Getter for internal round keys: 15 blocks of 16 bytes.
    pub fn get_round_keys(&self) -> &RoundKeys {
        &self.round_keys
    }

    /// Encrypts `plaintext` and keeps the trace of this call, replacing the previous one.
    pub fn encrypt(&mut self, plaintext: &str) -> Result<String> {
        let (result, trace) = self.encrypt_traced(plaintext).into_parts();
        self.trace = trace;
        result
    }

    /// Decrypts Base64 `ciphertext` and keeps the trace of this call, replacing the previous one.
    pub fn decrypt(&mut self, ciphertext: &str) -> Result<String> {
        let (result, trace) = self.decrypt_traced(ciphertext).into_parts();
        self.trace = trace;
        result
    }

    /// Trace of the most recent [encrypt](Cipher::encrypt) or [decrypt](Cipher::decrypt).
    pub fn steps(&self) -> &Trace {
        &self.trace
    }

    /// Moves the most recent trace out, leaving an empty one.
    pub fn take_steps(&mut self) -> Trace {
        mem::take(&mut self.trace)
    }

    /// Encrypts `plaintext` and returns the result with a fresh trace.
    ///
    /// Fails with [InputTooShort](Error::InputTooShort) when the text is under 16 UTF-8 bytes.
    #[instrument(skip_all, fields(mode = %self.config.mode()))]
    pub fn encrypt_traced(&self, plaintext: &str) -> Traced<String> {
        let mut trace = Trace::new();
        let result = self.run_encrypt(plaintext, &mut trace);
        if let Err(e) = &result {
            warn!(error = %e, "encryption failed");
            trace.push("Error", format!("Encryption failed: {e}"));
        }
        Traced {
            operation: Operation::Encrypt,
            result,
            trace,
        }
    }

    /// Decrypts Base64 `ciphertext` and returns the result with a fresh trace.
    ///
    /// Returns:
    /// - [InvalidBase64](Error::InvalidBase64) or [EmptyCiphertext](Error::EmptyCiphertext) for a
    ///   payload that does not decode to anything.
    /// - [InvalidCiphertext](Error::InvalidCiphertext) when the payload is shorter than 17 bytes
    ///   for a mode with an IV, or is not whole blocks for ECB and CBC.
    /// - [InvalidPadding](Error::InvalidPadding) under [Strict](crate::PaddingPolicy::Strict) padding.
    /// - [Decode](Error::Decode) when the decrypted bytes are not UTF-8.
    #[instrument(skip_all, fields(mode = %self.config.mode()))]
    pub fn decrypt_traced(&self, ciphertext: &str) -> Traced<String> {
        let mut trace = Trace::new();
        let result = self.run_decrypt(ciphertext, &mut trace);
        if let Err(e) = &result {
            warn!(error = %e, "decryption failed");
            let detail = match e {
                // already reads "decryption failed: ..."
                Error::Decode(_) => e.to_string(),
                _ => format!("Decryption failed: {e}"),
            };
            trace.push("Error", detail);
        }
        Traced {
            operation: Operation::Decrypt,
            result,
            trace,
        }
    }

    fn run_encrypt(&self, plaintext: &str, trace: &mut Trace) -> Result<String> {
        let mode = self.config.mode();
        let data = plaintext.as_bytes();

        narrate::input_preparation(trace, plaintext, data);
        narrate::key_preparation(trace, self.config.key(), &self.round_keys);

        if data.len() < MIN_INPUT_LEN {
            return Err(Error::InputTooShort { len: data.len() });
        }

        // stream modes process the exact input length
        let prepared = if mode.is_block_mode() {
            let (padded, pad_len) = pad(data);
            debug!(pad_len, "padding applied");
            padded
        } else {
            data.to_vec()
        };
        narrate::input_processing(trace, mode, data, &prepared);
        narrate::mode_setup(trace, &self.config);
        narrate::division(trace, mode, prepared.len());

        let iv = self.config.iv().as_bytes();
        let transformed = match mode {
            Mode::Ecb => ecb_encrypt(&prepared, &self.round_keys)?,
            Mode::Cbc => cbc_encrypt(&prepared, &self.round_keys, iv)?,
            Mode::Cfb => cfb_encrypt(&prepared, &self.round_keys, iv),
            Mode::Ofb => ofb_core(&prepared, &self.round_keys, iv),
            Mode::Ctr => ctr_core(&prepared, &self.round_keys, iv),
        };
        debug!(units = transformed.blocks.len(), "encrypted");

        narrate::units(trace, Operation::Encrypt, mode, &self.round_keys, &transformed.blocks);
        narrate::all_encrypted(
            trace,
            mode,
            &prepared,
            &transformed.output,
            transformed.blocks.len(),
        );

        // prepend IV / nonce to ciphertext for every mode that uses one
        let mut framed = Vec::with_capacity(IV_LEN + transformed.output.len());
        if mode.needs_iv() {
            framed.extend_from_slice(iv);
        }
        framed.extend_from_slice(&transformed.output);
        let encoded = STANDARD.encode(&framed);

        narrate::final_output(trace, mode, &transformed.output, &framed, &encoded);
        Ok(encoded)
    }

    fn run_decrypt(&self, ciphertext: &str, trace: &mut Trace) -> Result<String> {
        let mode = self.config.mode();
        let encoded = ciphertext.trim();

        let decoded = STANDARD.decode(encoded)?;
        narrate::ciphertext_preparation(trace, encoded, &decoded);
        if decoded.is_empty() {
            return Err(Error::EmptyCiphertext);
        }

        narrate::key_preparation(trace, self.config.key(), &self.round_keys);

        // extract IV / nonce, which the payload always carries for modes that use one
        let (iv, ct) = if mode.needs_iv() {
            if decoded.len() <= IV_LEN {
                return Err(Error::InvalidCiphertext {
                    len: decoded.len(),
                    context: "payload must hold a 16-byte IV/nonce and at least 1 byte of ciphertext",
                });
            }
            let (iv, ct) = decoded.split_at(IV_LEN);
            (Some(Iv::try_from_slice(mode, iv)?), ct)
        } else {
            (None, decoded.as_slice())
        };
        narrate::extraction(trace, mode, iv.as_ref().map(|iv| &iv.as_bytes()[..]), ct);

        if mode.is_block_mode() && ct.len() % BLOCK_SIZE != 0 {
            return Err(Error::InvalidCiphertext {
                len: ct.len(),
                context: "ciphertext is not aligned to the 16-byte block size",
            });
        }
        narrate::analysis(trace, mode, ct.len());

        // ECB ignores the IV, every other arm has one
        let iv = iv.unwrap_or(*self.config.iv());
        let iv = iv.as_bytes();
        let transformed = match mode {
            Mode::Ecb => ecb_decrypt(ct, &self.round_keys)?,
            Mode::Cbc => cbc_decrypt(ct, &self.round_keys, iv)?,
            Mode::Cfb => cfb_decrypt(ct, &self.round_keys, iv),
            Mode::Ofb => ofb_core(ct, &self.round_keys, iv),
            Mode::Ctr => ctr_core(ct, &self.round_keys, iv),
        };
        debug!(units = transformed.blocks.len(), "decrypted");

        narrate::units(trace, Operation::Decrypt, mode, &self.round_keys, &transformed.blocks);
        narrate::all_decrypted(trace, mode, ct, &transformed.output, transformed.blocks.len());

        let mut plain = transformed.output;
        if mode.is_block_mode() {
            let decrypted = plain.clone();
            let outcome = unpad(&mut plain, self.config.padding())?;
            if let Unpadding::Inconsistent(value) = outcome {
                warn!(value, "inconsistent padding left in place");
            }
            narrate::padding_removal(trace, &decrypted, &plain, outcome);
        } else {
            narrate::stream_final(trace, &plain);
        }

        let text = String::from_utf8(plain)?;
        narrate::final_result(trace, &text);
        Ok(text)
    }
}
