//! ---
//! sl_section: "03-network"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Wifi adapter control and home/camera network switching."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
//! Network switching between the home network and the camera's own network.

mod error;
mod switcher;
mod wifi;
mod wpa_cli;

pub use error::{NetError, WifiError};
pub use switcher::{NetworkProfile, NetworkProfiles, NetworkSwitcher, SettleDelays};
pub use wifi::{KnownNetwork, NetworkId, VisibleNetwork, WifiControl};
pub use wpa_cli::WpaCliWifi;
