use serde::{Deserialize, Serialize};

use crate::trace::{Operation, Trace};

/// Title of the single sheet of an exported mind map.
pub const SHEET_TITLE: &str = "AES-256 Process";

/// Node of the mind-map tree. Steps become topics with their detail as plain notes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Topic>,
}

/// Tree document built from a [Trace]: one sheet, one root topic naming the operation, and one
/// child per step in trace order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMap {
    pub sheet: String,
    pub root: Topic,
}

impl MindMap {
    pub fn from_trace(trace: &Trace, operation: Operation) -> Self {
        let children = trace
            .iter()
            .map(|step| Topic {
                title: step.title.clone(),
                notes: Some(step.detail.clone()),
                children: Vec::new(),
            })
            .collect();

        Self {
            sheet: SHEET_TITLE.to_string(),
            root: Topic {
                title: operation.root_title().to_string(),
                notes: None,
                children,
            },
        }
    }

    /// Plain-text rendering: root title, a rule, then every step numbered from 1 with its
    /// title underlined and its detail below.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.root.title);
        out.push('\n');
        out.push_str(&"=".repeat(40));
        out.push_str("\n\n");

        for (i, topic) in self.root.children.iter().enumerate() {
            let heading = format!("{}. {}", i + 1, topic.title);
            out.push_str(&heading);
            out.push('\n');
            out.push_str(&"-".repeat(heading.chars().count()));
            out.push('\n');
            if let Some(notes) = &topic.notes {
                out.push_str(notes);
            }
            out.push_str("\n\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trace {
        let mut trace = Trace::new();
        trace.push("1. Input Preparation", "Plaintext: hi");
        trace.push("Error", "boom");
        trace
    }

    #[test]
    fn one_child_per_step() {
        let map = MindMap::from_trace(&sample(), Operation::Decrypt);
        assert_eq!(map.sheet, "AES-256 Process");
        assert_eq!(map.root.title, "AES-256 Decryption Steps");
        assert_eq!(map.root.children.len(), 2);
        assert_eq!(map.root.children[1].notes.as_deref(), Some("boom"));
    }

    #[test]
    fn text_layout() {
        let text = MindMap::from_trace(&sample(), Operation::Encrypt).to_text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "AES-256 Encryption Steps");
        assert_eq!(lines[1], "=".repeat(40));
        assert_eq!(lines[3], "1. 1. Input Preparation");
        assert_eq!(lines[4], "-".repeat("1. 1. Input Preparation".len()));
        assert_eq!(lines[5], "Plaintext: hi");
        assert_eq!(lines[7], "2. Error");
    }
}
