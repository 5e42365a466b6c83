//! ---
//! sl_section: "05-upload"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Cloud upload of staged media with bounded concurrency."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;

use crate::error::UploadError;

/// Remote storage accepting whole-file uploads.
///
/// Implementations are shared across concurrent transfers.
#[async_trait]
pub trait CloudStorage: Debug + Send + Sync {
    async fn upload(&self, local: &Path, remote: &str) -> Result<(), UploadError>;
}
