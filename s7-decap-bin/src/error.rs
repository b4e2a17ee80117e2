use config::ConfigError;
use pcap_file::PcapError;
use serde_json::Error as SerdeJsonError;
use std::{io::Error as IoError, path::PathBuf};
use thiserror::Error;
use tokio::task::JoinError;

pub type DecapResult<T, E = DecapError> = anyhow::Result<T, E>;

/// Fatal conditions: anything here aborts the run with a non-zero status.
///
/// Per-packet problems never end up here, the dissector skips them.
#[derive(Error, Debug)]
pub enum DecapError {
    #[error("{0}")]
    IoError(#[from] IoError),
    #[error("cannot open capture {path}: {source}")]
    OpenCapture {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("{0}")]
    PcapError(#[from] PcapError),
    #[error("unsupported capture link type: {0}")]
    UnsupportedLinkType(String),
    #[error("{0}")]
    ConfigError(#[from] ConfigError),
    #[error("{0}")]
    Json(#[from] SerdeJsonError),
    #[error("{0}")]
    JoinError(#[from] JoinError),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Initialization error: {0}")]
    InitializationError(String),
}
