//! Writes a [Trace] to disk as a mind-map tree, either as a JSON document or as plain text.

mod mindmap;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::trace::{Operation, Trace};

pub use mindmap::{MindMap, SHEET_TITLE, Topic};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write trace export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize trace export: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format of [export_trace].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// [MindMap] serialized as pretty JSON.
    #[default]
    Json,
    /// [MindMap::to_text].
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }
}

/// Writes `trace` to `path`, creating missing parent directories. The trace is only read.
/// Returns the path written.
pub fn export_trace(
    trace: &Trace,
    operation: Operation,
    path: impl AsRef<Path>,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let map = MindMap::from_trace(trace, operation);
    let contents = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&map)?,
        ExportFormat::Text => map.to_text(),
    };
    fs::write(path, contents)?;

    debug!(path = %path.display(), steps = trace.len(), ?format, "trace exported");
    Ok(path.to_path_buf())
}
