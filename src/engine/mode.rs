use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::Error;

/// AES mode of operation.
///
/// ECB and CBC are block modes: input is PKCS#7 padded and processed in whole 16-byte blocks.
/// CFB, OFB and CTR are stream modes: AES generates a keystream that is `XOR`'d with the data,
/// so the output is always exactly as long as the input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Ecb,
    Cbc,
    Cfb,
    Ofb,
    Ctr,
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Ecb, Mode::Cbc, Mode::Cfb, Mode::Ofb, Mode::Ctr];

    /// Whether an IV (or nonce, for CTR) is framed in front of the ciphertext.
    pub fn needs_iv(self) -> bool {
        !matches!(self, Mode::Ecb)
    }

    /// Block modes are padded and require whole 16-byte blocks of ciphertext.
    pub fn is_block_mode(self) -> bool {
        matches!(self, Mode::Ecb | Mode::Cbc)
    }

    pub fn is_stream_mode(self) -> bool {
        !self.is_block_mode()
    }

    pub fn iv_label(self) -> &'static str {
        match self {
            Mode::Ctr => "Nonce",
            _ => "IV",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Mode::Ecb => "Electronic Codebook",
            Mode::Cbc => "Cipher Block Chaining",
            Mode::Cfb => "Cipher Feedback",
            Mode::Ofb => "Output Feedback",
            Mode::Ctr => "Counter",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Ecb => "ECB",
            Mode::Cbc => "CBC",
            Mode::Cfb => "CFB",
            Mode::Ofb => "OFB",
            Mode::Ctr => "CTR",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnsupportedMode(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ErrorKind;

    #[test]
    fn parses_any_case() {
        assert_eq!("cbc".parse::<Mode>().unwrap(), Mode::Cbc);
        assert_eq!("Ofb".parse::<Mode>().unwrap(), Mode::Ofb);
        assert_eq!(" CTR ".parse::<Mode>().unwrap(), Mode::Ctr);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "GCM".parse::<Mode>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("GCM"));
    }

    #[test]
    fn iv_requirements() {
        assert!(!Mode::Ecb.needs_iv());
        assert!(Mode::ALL[1..].iter().all(|m| m.needs_iv()));
        assert_eq!(Mode::Ctr.iv_label(), "Nonce");
        assert_eq!(Mode::Cfb.iv_label(), "IV");
    }

    #[test]
    fn display_round_trips() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }
}
