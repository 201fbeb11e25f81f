mod cipher;
mod config;
pub mod core;
mod error;
mod key;
mod mode;
pub mod modes;
mod narrate;
mod util;

pub use cipher::{Cipher, MIN_INPUT_LEN, Traced};
pub use config::{CipherConfig, PaddingPolicy};
pub use error::{Error, ErrorKind, Result};
pub use key::{IV_LEN, Iv, KEY_LEN, Key};
pub use mode::Mode;
pub use util::Unpadding;
