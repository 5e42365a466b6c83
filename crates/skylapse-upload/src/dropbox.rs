//! ---
//! sl_section: "05-upload"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Cloud upload of staged media with bounded concurrency."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client};
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::UploadError;
use crate::storage::CloudStorage;

const API_ARG_HEADER: &str = "Dropbox-API-Arg";
/// Status the API uses for endpoint-specific errors with a JSON body.
const API_ERROR_STATUS: u16 = 409;

#[derive(Debug, Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: &'static str,
    autorename: bool,
    mute: bool,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error_summary: String,
}

/// Single-request uploads to the Dropbox content API.
#[derive(Clone)]
pub struct DropboxClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl fmt::Debug for DropboxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropboxClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl DropboxClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self, UploadError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl CloudStorage for DropboxClient {
    async fn upload(&self, local: &Path, remote: &str) -> Result<(), UploadError> {
        let io_error = |source| UploadError::Io {
            path: local.to_path_buf(),
            source,
        };
        let file = File::open(local).await.map_err(io_error)?;
        let length = file.metadata().await.map_err(io_error)?.len();
        let arg = api_arg(&UploadArg {
            path: remote,
            mode: "add",
            autorename: true,
            mute: false,
        });

        debug!(local = %local.display(), %remote, bytes = length, "sending upload request");
        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, length)
            .header(API_ARG_HEADER, arg)
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(rejection(status.as_u16(), body, remote))
    }
}

/// Map a non-2xx reply to an error, keeping the API's own summary when the
/// body carries one.
fn rejection(status: u16, body: String, remote: &str) -> UploadError {
    if status == API_ERROR_STATUS {
        if let Ok(api) = serde_json::from_str::<ApiError>(&body) {
            return UploadError::Remote {
                remote: remote.to_owned(),
                message: api.error_summary,
            };
        }
    }
    UploadError::Rejected { status, body }
}

/// JSON argument for the API header. HTTP headers must be ASCII, so every
/// non-ASCII character is written as a `\uXXXX` escape.
fn api_arg(arg: &UploadArg<'_>) -> String {
    let json = serde_json::to_string(arg).unwrap_or_default();
    let mut escaped = String::with_capacity(json.len());
    for ch in json.chars() {
        if ch.is_ascii() {
            escaped.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    escaped
}
