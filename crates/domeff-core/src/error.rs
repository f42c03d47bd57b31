//! Error type shared by extraction, analysis, and the track store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the library. Per-event anomalies (missing fields,
/// ambiguous candidates, undefined geometry) are not errors: those events are
/// skipped during extraction. Errors here are file-level or fatal.
#[derive(Debug, Error)]
pub enum DomeffError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("track encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("track decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// Fatal: analysis cannot start without sensor geometry.
    #[error("no sensor geometry found in {0}")]
    GeometryMissing(PathBuf),

    #[error("{path}: not a track file (bad header)")]
    BadHeader { path: PathBuf },

    #[error("{path}: unsupported track file version {found} (expected {expected})")]
    Version {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

pub type Result<T> = std::result::Result<T, DomeffError>;
