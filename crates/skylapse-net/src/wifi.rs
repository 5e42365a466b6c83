//! ---
//! sl_section: "03-network"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Wifi adapter control and home/camera network switching."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::fmt::{self, Debug};

use async_trait::async_trait;

use crate::error::WifiError;

/// Opaque handle the adapter uses to refer to a saved network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkId(pub String);

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A network saved in the host's wifi configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownNetwork {
    pub ssid: String,
    pub id: NetworkId,
}

/// A network seen in the most recent scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleNetwork {
    pub ssid: String,
    pub signal_dbm: Option<i32>,
}

/// Control surface of the host's wifi adapter.
#[async_trait]
pub trait WifiControl: Debug + Send + Sync {
    async fn list_known_networks(&self) -> Result<Vec<KnownNetwork>, WifiError>;

    async fn scan_visible_networks(&self) -> Result<Vec<VisibleNetwork>, WifiError>;

    /// Request association; returns before the link is usable.
    async fn connect(&self, id: &NetworkId) -> Result<(), WifiError>;

    async fn disconnect(&self) -> Result<(), WifiError>;
}
