//! Core AES-256 implementation: key schedule plus encryption and decryption of a 16 byte block,
//! with optional observation of every round.

pub mod constants;
mod decryption;
mod encryption;
mod key_schedule;
mod round;
mod util;

pub use decryption::{decrypt_block, decrypt_block_traced};
pub use encryption::{encrypt_block, encrypt_block_traced};
pub use key_schedule::expand_key;
pub use round::{RoundOp, RoundTrace};

/// The AES block: 16 bytes, loaded into the state column by column.
pub type Block = [u8; 16];

/// Expanded AES-256 key: 15 round keys of 16 bytes (240 bytes).
pub type RoundKeys = [Block; ROUNDS + 1];

/// Number of 32-bit words in an AES-256 key.
pub const NK: usize = 8;

/// Number of AES-256 rounds.
pub const ROUNDS: usize = 14;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;
