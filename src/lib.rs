//! AES-256 in ECB, CBC, CFB, OFB and CTR modes, implemented from the FIPS-197 primitives up,
//! with a step-by-step trace of every operation.
//!
//! ```
//! # fn main() -> aes_steps::Result<()> {
//! use aes_steps::Cipher;
//!
//! let mut cipher = Cipher::from_parts(
//!     b"MySecretKey123456789012345678901",
//!     "cbc",
//!     Some(b"1234567890123456"),
//! )?;
//! let encrypted = cipher.encrypt("Hello World!!!!!Hello World!!!!!")?;
//! for step in cipher.steps() {
//!     println!("{}\n{}\n", step.title, step.detail);
//! }
//! assert_eq!(cipher.decrypt(&encrypted)?, "Hello World!!!!!Hello World!!!!!");
//! # Ok(())
//! # }
//! ```

mod engine;
pub mod export;
pub mod response;
pub mod trace;

pub use engine::{
    Cipher, CipherConfig, Error, ErrorKind, IV_LEN, Iv, KEY_LEN, Key, MIN_INPUT_LEN, Mode,
    PaddingPolicy, Result, Traced, Unpadding,
};
pub use engine::core::{
    BLOCK_SIZE, Block, ROUNDS, RoundKeys, RoundOp, RoundTrace, decrypt_block,
    decrypt_block_traced, encrypt_block, encrypt_block_traced, expand_key,
};
pub use engine::modes::{BlockRecord, Feed, PARALLEL_THRESHOLD, Source, Transformed};
pub use trace::{Operation, Trace, TraceStep};
