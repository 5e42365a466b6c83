//! ---
//! sl_section: "03-network"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Wifi adapter control and home/camera network switching."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use skylapse_common::config::TimingConfig;
use skylapse_rt::settle;
use tracing::{debug, info, warn};

use crate::error::{NetError, WifiError};
use crate::wifi::{KnownNetwork, NetworkId, WifiControl};

/// A saved network resolved against the adapter's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub ssid: String,
    pub id: NetworkId,
}

/// The two networks a run switches between. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfiles {
    pub home: NetworkProfile,
    pub device: NetworkProfile,
}

impl NetworkProfiles {
    /// Match configured SSIDs against the saved network list.
    pub fn resolve(
        known: &[KnownNetwork],
        home_ssid: &str,
        device_ssid: &str,
    ) -> Result<Self, NetError> {
        let find = |ssid: &str| {
            known
                .iter()
                .find(|network| network.ssid == ssid)
                .map(|network| NetworkProfile {
                    ssid: network.ssid.clone(),
                    id: network.id.clone(),
                })
                .ok_or_else(|| NetError::UnknownProfile {
                    ssid: ssid.to_owned(),
                })
        };
        Ok(Self {
            home: find(home_ssid)?,
            device: find(device_ssid)?,
        })
    }
}

/// Settle delays applied after each link change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleDelays {
    pub after_disconnect: Duration,
    pub after_device_connect: Duration,
    pub after_home_connect: Duration,
}

impl SettleDelays {
    pub fn from_config(timing: &TimingConfig) -> Self {
        Self {
            after_disconnect: timing.after_disconnect,
            after_device_connect: timing.after_device_connect,
            after_home_connect: timing.after_home_connect,
        }
    }
}

/// Moves the host between its home network and the camera network.
#[derive(Debug, Clone)]
pub struct NetworkSwitcher {
    wifi: Arc<dyn WifiControl>,
    profiles: NetworkProfiles,
    delays: SettleDelays,
}

impl NetworkSwitcher {
    /// Query the saved network list once and resolve both profiles.
    pub async fn resolve(
        wifi: Arc<dyn WifiControl>,
        home_ssid: &str,
        device_ssid: &str,
        delays: SettleDelays,
    ) -> Result<Self, NetError> {
        let known = wifi
            .list_known_networks()
            .await
            .map_err(NetError::operation("list networks"))?;
        debug!(count = known.len(), "saved networks listed");
        let profiles = NetworkProfiles::resolve(&known, home_ssid, device_ssid)?;
        info!(
            home = %profiles.home.ssid,
            home_id = %profiles.home.id,
            device = %profiles.device.ssid,
            device_id = %profiles.device.id,
            "network profiles resolved"
        );
        Ok(Self::new(wifi, profiles, delays))
    }

    pub fn new(wifi: Arc<dyn WifiControl>, profiles: NetworkProfiles, delays: SettleDelays) -> Self {
        Self {
            wifi,
            profiles,
            delays,
        }
    }

    pub fn profiles(&self) -> &NetworkProfiles {
        &self.profiles
    }

    pub fn home(&self) -> &NetworkProfile {
        &self.profiles.home
    }

    pub fn device(&self) -> &NetworkProfile {
        &self.profiles.device
    }

    /// Fail with [`NetError::Unavailable`] unless `ssid` shows up in a fresh scan.
    pub async fn verify_presence(&self, ssid: &str) -> Result<(), NetError> {
        info!(%ssid, "verifying network presence");
        let visible = self
            .wifi
            .scan_visible_networks()
            .await
            .map_err(NetError::operation("scan"))?;
        if visible.iter().any(|network| network.ssid == ssid) {
            debug!(%ssid, "network is broadcasting");
            Ok(())
        } else {
            warn!(%ssid, seen = visible.len(), "network unavailable");
            Err(NetError::Unavailable {
                ssid: ssid.to_owned(),
            })
        }
    }

    /// Drop the current link and wait for the interface to release.
    ///
    /// Disconnecting an already idle interface is not an error.
    pub async fn disconnect(&self) -> Result<(), NetError> {
        info!("disconnecting from wifi");
        match self.wifi.disconnect().await {
            Ok(()) => {}
            Err(WifiError::NotConnected) => debug!("interface already disconnected"),
            Err(err) => return Err(NetError::operation("disconnect")(err)),
        }
        settle(self.delays.after_disconnect, "disconnect").await;
        Ok(())
    }

    /// Associate with `profile` and wait until the link is usable.
    pub async fn connect_to(&self, profile: &NetworkProfile) -> Result<(), NetError> {
        info!(ssid = %profile.ssid, "connecting");
        self.wifi
            .connect(&profile.id)
            .await
            .map_err(NetError::operation("connect"))?;
        let delay = if *profile == self.profiles.device {
            self.delays.after_device_connect
        } else {
            self.delays.after_home_connect
        };
        settle(delay, "association").await;
        info!(ssid = %profile.ssid, "connected");
        Ok(())
    }
}
