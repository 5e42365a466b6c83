//! ---
//! sl_section: "04-device"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Camera control contract, media listing and the HTTP backend."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::path::PathBuf;

use thiserror::Error;

/// Device-level failure: timeouts, protocol errors and local write failures.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera request '{operation}' failed: {source}")]
    Request {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("camera rejected '{operation}' with HTTP {status}")]
    Status { operation: &'static str, status: u16 },
    #[error("invalid camera url: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid MAC address '{0}'")]
    InvalidMac(String),
    #[error("wake-on-lan packet could not be sent: {0}")]
    Wake(#[source] std::io::Error),
    /// Failure reported by a backend without a richer representation.
    #[error("camera {operation} failed: {message}")]
    Device { operation: String, message: String },
}

impl CameraError {
    pub fn device(operation: impl Into<String>, message: impl Into<String>) -> Self {
        CameraError::Device {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
