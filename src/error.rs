use std::path::PathBuf;

use thiserror::Error;

/// Failures of notice resolution. Every variant aborts the whole invocation:
/// a compliance report must never silently omit obligations.
#[derive(Error, Debug)]
pub enum NoticeError {
    #[error("No root targets given")]
    NoRoots,

    #[error("Root target not found in graph: {0}")]
    RootNotFound(String),

    #[error("Graph incomplete: '{from}' depends on missing target '{missing}'")]
    GraphIncomplete { from: String, missing: String },

    #[error("Malformed edge '{from}' -> '{to}': {reason}")]
    MalformedEdge {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Cycle detected: traversal from '{root}' did not terminate at '{at}'")]
    CycleDetected { root: String, at: String },

    #[error("Failed to read license text {}: {source}", path.display())]
    LicenseText {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, NoticeError>;
