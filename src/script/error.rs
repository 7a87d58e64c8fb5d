//! Errors raised while loading a script document.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to obtain a usable script before any test runs.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("cannot read script {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The script is not valid JSON or does not match the document shape.
    #[error("cannot parse script: {0}")]
    Parse(#[source] serde_json::Error),
}
