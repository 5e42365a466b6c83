//! ---
//! sl_section: "05-upload"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Cloud upload of staged media with bounded concurrency."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single file transfer. Never aborts the rest of a batch.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("storage rejected upload with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("{path} has no usable file name")]
    InvalidPath { path: PathBuf },
    /// The API refused the upload and said why.
    #[error("upload of {remote} failed: {message}")]
    Remote { remote: String, message: String },
}
