//! ---
//! sl_section: "09-testing"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Scripted collaborator fakes for session and driver tests."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;
use skylapse_net::{KnownNetwork, NetworkId, VisibleNetwork, WifiControl, WifiError};

use crate::log::{CallLog, FailurePlan};

/// Wifi adapter with a fixed saved-network list and toggleable broadcasts.
#[derive(Debug)]
pub struct FakeWifi {
    log: CallLog,
    failures: FailurePlan,
    known: Vec<KnownNetwork>,
    hidden: Mutex<HashSet<String>>,
    connected: Mutex<Option<String>>,
}

impl FakeWifi {
    /// Saved networks get ids `0..n` in the order given; all start visible.
    pub fn new(log: CallLog, failures: FailurePlan, saved: &[&str]) -> Self {
        let known = saved
            .iter()
            .enumerate()
            .map(|(index, ssid)| KnownNetwork {
                ssid: (*ssid).to_owned(),
                id: NetworkId(index.to_string()),
            })
            .collect();
        Self {
            log,
            failures,
            known,
            hidden: Mutex::new(HashSet::new()),
            connected: Mutex::new(None),
        }
    }

    /// Stop `ssid` from showing up in scans.
    pub fn hide(&self, ssid: &str) {
        self.hidden.lock().insert(ssid.to_owned());
    }

    pub fn show(&self, ssid: &str) {
        self.hidden.lock().remove(ssid);
    }

    /// SSID of the network currently associated, if any.
    pub fn connected(&self) -> Option<String> {
        self.connected.lock().clone()
    }

    fn call(&self, operation: &'static str, entry: String) -> Result<(), WifiError> {
        self.log.record(entry);
        if self.failures.should_fail(operation) {
            return Err(WifiError::Rejected {
                command: operation.to_owned(),
                reply: "FAIL".to_owned(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WifiControl for FakeWifi {
    async fn list_known_networks(&self) -> Result<Vec<KnownNetwork>, WifiError> {
        self.call("wifi.list", "wifi.list".into())?;
        Ok(self.known.clone())
    }

    async fn scan_visible_networks(&self) -> Result<Vec<VisibleNetwork>, WifiError> {
        self.call("wifi.scan", "wifi.scan".into())?;
        let hidden = self.hidden.lock();
        Ok(self
            .known
            .iter()
            .filter(|network| !hidden.contains(&network.ssid))
            .map(|network| VisibleNetwork {
                ssid: network.ssid.clone(),
                signal_dbm: Some(-50),
            })
            .collect())
    }

    async fn connect(&self, id: &NetworkId) -> Result<(), WifiError> {
        let ssid = self
            .known
            .iter()
            .find(|network| &network.id == id)
            .map(|network| network.ssid.clone())
            .unwrap_or_else(|| format!("#{}", id));
        self.call("wifi.connect", format!("wifi.connect {}", ssid))?;
        *self.connected.lock() = Some(ssid);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), WifiError> {
        self.call("wifi.disconnect", "wifi.disconnect".into())?;
        match self.connected.lock().take() {
            Some(_) => Ok(()),
            None => Err(WifiError::NotConnected),
        }
    }
}
