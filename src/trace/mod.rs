//! Ordered record of what an encrypt or decrypt call did, step by step.
//!
//! A [Trace] only ever grows while an operation runs. It is plain data: rendering and export
//! live in [crate::export].

mod format;

use std::fmt;
use std::slice;

use serde::{Deserialize, Serialize};
use tracing::trace;

pub use format::{changed_bytes, compare_blocks, state_grid, to_hex};

/// One checkpoint of an operation: a short title and free-form detail text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    #[serde(rename = "step")]
    pub title: String,
    pub detail: String,
}

impl TraceStep {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

/// Which public operation produced a trace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Encrypt,
    Decrypt,
}

impl Operation {
    /// Root title used when the trace is rendered as a tree.
    pub fn root_title(self) -> &'static str {
        match self {
            Operation::Encrypt => "AES-256 Encryption Steps",
            Operation::Decrypt => "AES-256 Decryption Steps",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
        })
    }
}

/// Append-only sequence of [TraceStep]s in the order they happened.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    steps: Vec<TraceStep>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn push(&mut self, title: impl Into<String>, detail: impl Into<String>) {
        let step = TraceStep::new(title, detail);
        trace!(title = %step.title, "trace step");
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, TraceStep> {
        self.steps.iter()
    }

    /// First step whose title is exactly `title`.
    pub fn find(&self, title: &str) -> Option<&TraceStep> {
        self.steps.iter().find(|s| s.title == title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.title.as_str())
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceStep;
    type IntoIter = slice::Iter<'a, TraceStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
