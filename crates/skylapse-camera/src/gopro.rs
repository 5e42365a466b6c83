//! ---
//! sl_section: "04-device"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Camera control contract, media listing and the HTTP backend."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use skylapse_common::config::CameraConfig;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use crate::control::{CameraControl, CameraStatus};
use crate::error::CameraError;
use crate::media::{MediaDirectory, MediaList};
use crate::wol::{parse_mac, send_magic_packet};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP control of a HERO-style action camera reachable on its own network.
#[derive(Debug, Clone)]
pub struct GoProCamera {
    http: Client,
    address: String,
    control_base: Url,
    media_base: Url,
    mac: Option<[u8; 6]>,
    request_timeout: Duration,
}

impl GoProCamera {
    pub fn from_config(config: &CameraConfig) -> Result<Self, CameraError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|source| CameraError::Request {
                operation: "build client",
                source,
            })?;
        let control_base = Url::parse(&format!("http://{}/", config.address))?;
        let media_base = Url::parse(&format!(
            "http://{}:{}/",
            config.address, config.media_port
        ))?;
        let mac = config.mac.as_deref().map(parse_mac).transpose()?;
        Ok(Self {
            http,
            address: config.address.clone(),
            control_base,
            media_base,
            mac,
            request_timeout: config.request_timeout,
        })
    }

    async fn get(&self, operation: &'static str, path: &str) -> Result<Response, CameraError> {
        let url = self.control_base.join(path)?;
        self.send(operation, url, Some(self.request_timeout)).await
    }

    async fn send(
        &self,
        operation: &'static str,
        url: Url,
        timeout: Option<Duration>,
    ) -> Result<Response, CameraError> {
        debug!(%operation, %url, "camera request");
        let mut request = self.http.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request
            .send()
            .await
            .map_err(|source| CameraError::Request { operation, source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(CameraError::Status {
                operation,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn command(&self, operation: &'static str, path: &str) -> Result<(), CameraError> {
        self.get(operation, path).await.map(|_| ())
    }
}

#[async_trait]
impl CameraControl for GoProCamera {
    async fn power_on(&self) -> Result<(), CameraError> {
        match &self.mac {
            Some(mac) => {
                info!(address = %self.address, "waking camera");
                send_magic_packet(&self.address, mac).await
            }
            None => {
                debug!("no MAC configured; assuming camera is awake");
                Ok(())
            }
        }
    }

    async fn status(&self) -> Result<CameraStatus, CameraError> {
        let response = self.get("status", "gp/gpControl/status").await?;
        response
            .json::<CameraStatus>()
            .await
            .map_err(|source| CameraError::Request {
                operation: "status",
                source,
            })
    }

    async fn set_mode(&self, mode: u32, submode: u32) -> Result<(), CameraError> {
        self.command(
            "set mode",
            &format!(
                "gp/gpControl/command/sub_mode?mode={}&sub_mode={}",
                mode, submode
            ),
        )
        .await
    }

    async fn set_setting(&self, key: u32, value: u32) -> Result<(), CameraError> {
        self.command(
            "set setting",
            &format!("gp/gpControl/setting/{}/{}", key, value),
        )
        .await
    }

    async fn start_capture(&self) -> Result<(), CameraError> {
        self.command("start capture", "gp/gpControl/command/shutter?p=1")
            .await
    }

    async fn stop_capture(&self) -> Result<(), CameraError> {
        self.command("stop capture", "gp/gpControl/command/shutter?p=0")
            .await
    }

    async fn list_media(&self) -> Result<Vec<MediaDirectory>, CameraError> {
        let url = self.media_base.join("gp/gpMediaList")?;
        let response = self
            .send("list media", url, Some(self.request_timeout))
            .await?;
        let list = response
            .json::<MediaList>()
            .await
            .map_err(|source| CameraError::Request {
                operation: "list media",
                source,
            })?;
        Ok(list.into_directories())
    }

    async fn retrieve_file(
        &self,
        directory: &str,
        filename: &str,
        destination: &Path,
    ) -> Result<u64, CameraError> {
        let url = self
            .media_base
            .join(&format!("videos/DCIM/{}/{}", directory, filename))?;
        // Transfers of large files may outlast the command timeout.
        let mut response = self.send("retrieve file", url, None).await?;

        let io_error = |source| CameraError::Io {
            path: destination.to_path_buf(),
            source,
        };
        let mut file = File::create(destination).await.map_err(io_error)?;
        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|source| CameraError::Request {
                operation: "retrieve file",
                source,
            })?
        {
            file.write_all(&chunk).await.map_err(io_error)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(io_error)?;
        Ok(written)
    }

    async fn delete_all_media(&self) -> Result<(), CameraError> {
        self.command("delete all", "gp/gpControl/command/storage/delete/all")
            .await
    }

    async fn power_off(&self) -> Result<(), CameraError> {
        self.command("power off", "gp/gpControl/command/system/sleep")
            .await
    }
}
