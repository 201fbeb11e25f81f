//! Request/response boundary of the engine: the checks a form front end performs before
//! building a [Cipher], and the JSON shape it returns.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::core::BLOCK_SIZE;
use crate::engine::{Cipher, KEY_LEN, IV_LEN, MIN_INPUT_LEN, Mode};
use crate::trace::{Operation, Trace};

/// Largest plaintext [process] accepts, in UTF-8 bytes. Every 16-byte block adds about twenty
/// steps to the trace.
pub const MAX_TEXT_LEN: usize = 8 * 1024;

/// Longest accepted `text` for `action`: the plaintext cap, or the Base64 length of the framed
/// ciphertext such a plaintext encrypts to.
pub fn max_text_len(action: Operation) -> usize {
    match action {
        Operation::Encrypt => MAX_TEXT_LEN,
        Operation::Decrypt => (IV_LEN + MAX_TEXT_LEN.next_multiple_of(BLOCK_SIZE)).div_ceil(3) * 4,
    }
}

/// One encrypt or decrypt request, as submitted by a form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub action: Operation,
    /// Plaintext for encryption, Base64 for decryption.
    pub text: String,
    pub key: String,
    pub mode: String,
    /// Empty or missing means "generate one".
    #[serde(default)]
    pub iv: Option<String>,
}

/// Serializes as `{"result", "steps"}` or `{"error"[, "error_ar"]}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Success {
        result: String,
        steps: Trace,
    },
    Failure {
        error: String,
        /// Arabic translation, only given for the minimum length check.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error_ar: Option<String>,
    },
}

impl Response {
    fn failure(error: impl Into<String>) -> Self {
        Response::Failure {
            error: error.into(),
            error_ar: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }
}

/// Validates `request`, runs the operation on a fresh [Cipher] and packages the outcome.
/// Never panics: every problem becomes a [Response::Failure].
pub fn process(request: &Request) -> Response {
    if request.key.chars().count() != KEY_LEN {
        return Response::failure("Key must be 32 characters (256-bit).");
    }

    if request.text.trim().is_empty() {
        return Response::failure("Text input cannot be empty.");
    }

    let len = request.text.len();
    if len < MIN_INPUT_LEN {
        return Response::Failure {
            error: format!(
                "Text must be at least 16 bytes long. Current length: {len} bytes. \
                 Please add more text to reach minimum 16 bytes."
            ),
            error_ar: Some(format!(
                "يجب أن يكون النص 16 بايت على الأقل. الطول الحالي: {len} بايت. \
                 يرجى إضافة المزيد من النص للوصول إلى 16 بايت كحد أدنى."
            )),
        };
    }

    let limit = max_text_len(request.action);
    if len > limit {
        return Response::failure(format!(
            "Text must be at most {limit} bytes long. Current length: {len} bytes."
        ));
    }

    let mode: Mode = match request.mode.parse() {
        Ok(mode) => mode,
        Err(e) => return Response::failure(e.to_string()),
    };

    let iv = request.iv.as_deref().filter(|iv| !iv.is_empty());
    if mode.needs_iv() && iv.is_some_and(|iv| iv.chars().count() != IV_LEN) {
        return Response::failure(format!(
            "{} must be 16 characters for {mode} mode.",
            mode.iv_label()
        ));
    }

    let iv = iv.map(str::as_bytes);
    let cipher = match Cipher::from_parts(request.key.as_bytes(), mode.as_str(), iv) {
        Ok(cipher) => cipher,
        Err(e) => return Response::failure(e.to_string()),
    };

    let traced = match request.action {
        Operation::Encrypt => cipher.encrypt_traced(&request.text),
        Operation::Decrypt => cipher.decrypt_traced(&request.text),
    };
    debug!(action = %request.action, %mode, ok = traced.result.is_ok(), "request processed");

    match traced.result {
        Ok(result) => Response::Success {
            result,
            steps: traced.trace,
        },
        Err(e) => Response::failure(e.to_string()),
    }
}
