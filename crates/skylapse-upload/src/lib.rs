//! ---
//! sl_section: "05-upload"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Cloud upload of staged media with bounded concurrency."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
//! Moving staged media to cloud storage.
//!
//! [`UploadScheduler`] fans transfers out to a [`CloudStorage`] backend with
//! a concurrency cap and deletes each local file only once its upload has
//! been acknowledged.

mod destination;
mod dropbox;
mod error;
mod scheduler;
mod storage;
mod task;

pub use destination::RemoteDestination;
pub use dropbox::DropboxClient;
pub use error::UploadError;
pub use scheduler::{UploadReport, UploadScheduler};
pub use storage::CloudStorage;
pub use task::{TaskState, UploadTask};
