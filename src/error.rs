//! Error types for weaver

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::filter::Mode;

/// Main error type for weaver operations.
///
/// Matching itself never fails; every variant here comes from configuration,
/// rule loading, traversal or output.
#[derive(Error, Debug)]
pub enum Error {
    /// A rule line is not a valid glob pattern. The whole rule source is rejected.
    #[error("{origin}: line {line}: invalid pattern {pattern:?}: {reason}")]
    Compile {
        origin: String,
        line: usize,
        pattern: String,
        reason: String,
    },

    /// A rule file exists but could not be read.
    #[error("read rule source {}: {source}", .path.display())]
    RuleSourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Context for a rule source that failed while building rule sets.
    #[error("load {mode} rules from {origin}: {source}")]
    LoadRules {
        mode: Mode,
        origin: String,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid root {}: {reason}", .path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    #[error("walk: {0}")]
    Walk(#[from] ignore::Error),

    #[error("read {display}: {source}")]
    ReadFile {
        display: String,
        #[source]
        source: io::Error,
    },

    #[error("create output {}: {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("build tree: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{0}")]
    Config(String),
}

/// Result type alias for weaver operations
pub type Result<T> = std::result::Result<T, Error>;
