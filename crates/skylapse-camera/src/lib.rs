//! ---
//! sl_section: "04-device"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Camera control contract, media listing and the HTTP backend."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
//! Camera control: the [`CameraControl`] contract consumed by capture
//! sessions, the media listing model, and [`GoProCamera`], which talks to
//! the camera over its own wireless network.

mod control;
mod error;
mod gopro;
pub mod media;
mod wol;

pub use control::{CameraControl, CameraStatus};
pub use error::CameraError;
pub use gopro::GoProCamera;
pub use media::{MediaDirectory, MediaItem, MediaList};
pub use wol::{magic_packet, parse_mac};
