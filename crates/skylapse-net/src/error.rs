//! ---
//! sl_section: "03-network"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Wifi adapter control and home/camera network switching."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use thiserror::Error;

/// Adapter-level failure reported by a [`crate::WifiControl`] backend.
#[derive(Debug, Error)]
pub enum WifiError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    Exit {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("`{command}` replied {reply:?}")]
    Rejected { command: String, reply: String },
    #[error("interface is not connected")]
    NotConnected,
}

#[derive(Debug, Error)]
pub enum NetError {
    /// The SSID is not among the host's saved networks.
    #[error("network '{ssid}' is not among the host's saved networks")]
    UnknownProfile { ssid: String },
    /// The SSID is not currently broadcasting.
    #[error("network '{ssid}' is not broadcasting")]
    Unavailable { ssid: String },
    #[error("wifi {operation} failed: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: WifiError,
    },
}

impl NetError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, NetError::UnknownProfile { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, NetError::Unavailable { .. })
    }

    pub(crate) fn operation(operation: &'static str) -> impl FnOnce(WifiError) -> NetError {
        move |source| NetError::Operation { operation, source }
    }
}
