//! ---
//! sl_section: "03-network"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Wifi adapter control and home/camera network switching."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::WifiError;
use crate::wifi::{KnownNetwork, NetworkId, VisibleNetwork, WifiControl};

const DEFAULT_PROGRAM: &str = "wpa_cli";

/// [`WifiControl`] backed by `wpa_cli` talking to the host's wpa_supplicant.
#[derive(Debug, Clone)]
pub struct WpaCliWifi {
    program: String,
    interface: String,
    scan_wait: Duration,
}

impl WpaCliWifi {
    pub fn new(interface: impl Into<String>, scan_wait: Duration) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_owned(),
            interface: interface.into(),
            scan_wait,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn run(&self, args: &[&str]) -> Result<String, WifiError> {
        let command = format!("{} -i {} {}", self.program, self.interface, args.join(" "));
        trace!(%command, "running wpa_cli");
        let output = Command::new(&self.program)
            .arg("-i")
            .arg(&self.interface)
            .args(args)
            .output()
            .await
            .map_err(|source| WifiError::Spawn {
                command: command.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(WifiError::Exit {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a command whose only successful reply is `OK`.
    async fn run_ok(&self, args: &[&str]) -> Result<(), WifiError> {
        let reply = self.run(args).await?;
        if reply.trim() == "OK" {
            Ok(())
        } else {
            Err(WifiError::Rejected {
                command: args.join(" "),
                reply: reply.trim().to_owned(),
            })
        }
    }
}

#[async_trait]
impl WifiControl for WpaCliWifi {
    async fn list_known_networks(&self) -> Result<Vec<KnownNetwork>, WifiError> {
        let output = self.run(&["list_networks"]).await?;
        Ok(parse_list_networks(&output))
    }

    async fn scan_visible_networks(&self) -> Result<Vec<VisibleNetwork>, WifiError> {
        match self.run_ok(&["scan"]).await {
            Ok(()) => {}
            // A scan already in flight still refreshes the results we read below.
            Err(WifiError::Rejected { reply, .. }) if reply.starts_with("FAIL-BUSY") => {
                debug!("scan already in progress");
            }
            Err(err) => return Err(err),
        }
        tokio::time::sleep(self.scan_wait).await;
        let output = self.run(&["scan_results"]).await?;
        Ok(parse_scan_results(&output))
    }

    async fn connect(&self, id: &NetworkId) -> Result<(), WifiError> {
        self.run_ok(&["select_network", &id.0]).await?;
        self.run_ok(&["reconnect"]).await
    }

    async fn disconnect(&self) -> Result<(), WifiError> {
        self.run_ok(&["disconnect"]).await
    }
}

/// Parse `list_networks` output: `id<TAB>ssid<TAB>bssid<TAB>flags`.
fn parse_list_networks(output: &str) -> Vec<KnownNetwork> {
    output
        .lines()
        .filter(|line| !line.starts_with("network id"))
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let id = fields.next()?.trim();
            let ssid = fields.next()?;
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            Some(KnownNetwork {
                ssid: ssid.to_owned(),
                id: NetworkId(id.to_owned()),
            })
        })
        .collect()
}

/// Parse `scan_results` output: `bssid<TAB>freq<TAB>signal<TAB>flags<TAB>ssid`.
fn parse_scan_results(output: &str) -> Vec<VisibleNetwork> {
    output
        .lines()
        .filter(|line| !line.starts_with("bssid"))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 5 || fields[4].is_empty() {
                return None;
            }
            Some(VisibleNetwork {
                ssid: fields[4].to_owned(),
                signal_dbm: fields[2].trim().parse().ok(),
            })
        })
        .collect()
}
